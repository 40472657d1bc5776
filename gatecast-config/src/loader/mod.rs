pub mod error;

use anyhow::anyhow;
use gatecast_core::funnel::FunnelDefinition;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use self::error::ConfigLoadError;
use super::{
    models::FunnelConfig,
    validation::{self, ConfigWarnings},
};

pub const CONFIG_PATH_VAR: &str = "GATECAST_CONFIG_PATH";
pub const CONFIG_JSON_VAR: &str = "GATECAST_CONFIG_JSON";

const DEFAULT_CONFIG_LOCATIONS: &[&str] = &[
    "gatecast.toml",
    "gatecast.json",
    "config/gatecast.toml",
    "config/gatecast.json",
];

/// Source that produced the funnel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => f.write_str("built-in default funnel"),
            ConfigSource::EnvPath(path) => {
                write!(f, "{} ({CONFIG_PATH_VAR})", path.display())
            }
            ConfigSource::EnvInline => write!(f, "inline JSON ({CONFIG_JSON_VAR})"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The environment variables the loader looks at, captured once.
#[derive(Debug, Default, Clone)]
pub struct EnvSnapshot {
    pub config_path: Option<PathBuf>,
    pub config_json: Option<String>,
}

impl EnvSnapshot {
    pub fn gather() -> Self {
        Self {
            config_path: non_blank(CONFIG_PATH_VAR).map(PathBuf::from),
            config_json: non_blank(CONFIG_JSON_VAR),
        }
    }
}

fn non_blank(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    /// Explicit file, e.g. from `--config`. Wins over the environment.
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Directory the default file names are resolved against.
    pub search_root: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: FunnelConfig,
    pub definition: FunnelDefinition,
    pub source: ConfigSource,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_search_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.options.search_root = Some(root.into());
        self
    }

    /// Read `.env`, then resolve the configuration from the process
    /// environment.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };
        debug!(env_file_loaded, "environment prepared");

        self.load_with_env(&EnvSnapshot::gather())
    }

    /// Evaluation order:
    /// 1) the explicit path from the options,
    /// 2) `$GATECAST_CONFIG_PATH` (TOML or JSON file),
    /// 3) `$GATECAST_CONFIG_JSON` (inline JSON),
    /// 4) the first default file that exists,
    /// 5) the built-in funnel.
    pub fn load_with_env(
        &self,
        env: &EnvSnapshot,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (config, source) = self.resolve(env)?;
        debug!(%source, steps = config.steps.len(), "funnel configuration resolved");

        let warnings = validation::apply_guard_rails(&config)?;
        let definition = config.to_definition()?;

        Ok(ConfigLoad {
            config,
            definition,
            source,
            warnings,
        })
    }

    fn resolve(
        &self,
        env: &EnvSnapshot,
    ) -> Result<(FunnelConfig, ConfigSource), ConfigLoadError> {
        if let Some(path) = &self.options.config_path {
            let config = load_from_file(path)?;
            return Ok((config, ConfigSource::File(path.clone())));
        }

        if let Some(path) = &env.config_path {
            let config = load_from_file(path)?;
            return Ok((config, ConfigSource::EnvPath(path.clone())));
        }

        if let Some(raw) = &env.config_json {
            let config = parse_json(raw).map_err(|source| {
                ConfigLoadError::Parse {
                    origin: CONFIG_JSON_VAR.to_string(),
                    source,
                }
            })?;
            return Ok((config, ConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((FunnelConfig::default(), ConfigSource::Default))
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        let root = self
            .options
            .search_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        DEFAULT_CONFIG_LOCATIONS
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.exists())
    }
}

pub fn load_from_file(path: &Path) -> Result<FunnelConfig, ConfigLoadError> {
    if !path.exists() {
        return Err(ConfigLoadError::MissingConfig {
            path: path.to_path_buf(),
        });
    }

    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let origin = path.display().to_string();
    let parsed = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_json(&contents),
        Some("toml") | Some("tml") => toml::from_str(&contents)
            .map_err(|err| anyhow!("toml error: {err}")),
        _ => parse_from_str(&contents),
    };

    parsed.map_err(|source| ConfigLoadError::Parse { origin, source })
}

pub fn parse_from_str(contents: &str) -> anyhow::Result<FunnelConfig> {
    // Try TOML first, then JSON for convenience.
    toml::from_str(contents).or_else(|toml_err| {
        serde_json::from_str(contents).map_err(|json_err| {
            anyhow!("toml error: {toml_err}; json error: {json_err}")
        })
    })
}

pub fn parse_json(raw: &str) -> anyhow::Result<FunnelConfig> {
    serde_json::from_str(raw).map_err(|err| anyhow!("json error: {err}"))
}
