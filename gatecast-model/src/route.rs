use crate::error::ModelError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Page routes a funnel can navigate between.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Route {
    Landing,
    SecondVideo,
    NotFound,
    Custom(String),
}

impl Route {
    pub fn path(&self) -> &str {
        match self {
            Route::Landing => "/",
            Route::SecondVideo => "/secondo-video",
            Route::NotFound => "*",
            Route::Custom(path) => path,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        match raw.trim() {
            "/" | "landing" => Ok(Route::Landing),
            "/secondo-video" | "second-video" => Ok(Route::SecondVideo),
            "*" | "not-found" => Ok(Route::NotFound),
            path if path.starts_with('/') && !path.contains(char::is_whitespace) => {
                Ok(Route::Custom(path.to_string()))
            }
            _ => Err(ModelError::InvalidRoute(raw.to_string())),
        }
    }
}

impl TryFrom<String> for Route {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Route::parse(&value)
    }
}

impl From<Route> for String {
    fn from(value: Route) -> Self {
        value.path().to_string()
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_aliases_and_paths() {
        assert_eq!(Route::parse("landing").unwrap(), Route::Landing);
        assert_eq!(Route::parse("/secondo-video").unwrap(), Route::SecondVideo);
        assert_eq!(
            Route::parse("/bridge").unwrap(),
            Route::Custom("/bridge".into())
        );
        assert!(Route::parse("bridge").is_err());
    }
}
