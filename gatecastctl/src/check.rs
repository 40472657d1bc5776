use anyhow::Result;
use gatecast_config::{
    BackendConfig, ConfigLoad, ConfigLoader, ConfigLoaderOptions, NextConfig,
};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

impl CheckOptions {
    pub fn loader(&self) -> ConfigLoader {
        ConfigLoader::with_options(ConfigLoaderOptions {
            config_path: self.config_path.clone(),
            env_file: self.env_file.clone(),
            search_root: None,
        })
    }
}

/// Load the funnel and run the guard rails. A guard-rail violation is an
/// error; warnings come back in the load.
pub fn run_config_check(opts: &CheckOptions) -> Result<ConfigLoad> {
    Ok(opts.loader().load()?)
}

pub fn render_check(load: &ConfigLoad) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "source: {}", load.source);
    let _ = writeln!(out, "steps:");
    for step in &load.config.steps {
        let next = match &step.next {
            Some(NextConfig::Navigate(route)) => format!("navigate {route}"),
            Some(NextConfig::Link(url)) => format!("link {url}"),
            None => "none".to_string(),
        };
        let _ = write!(
            out,
            "  {} [{}{}] next: {next}",
            step.route,
            step.backend.kind(),
            describe_length(&step.backend),
        );
        if let Some(access) = &step.access {
            let _ = write!(
                out,
                ", access window {}",
                humantime::format_duration(access.window)
            );
        }
        let _ = writeln!(out);
    }
    match &load.config.in_app_notice {
        Some(notice) => {
            let _ = writeln!(
                out,
                "in-app browser notice: continue after {}",
                humantime::format_duration(notice.continue_after)
            );
        }
        None => {
            let _ = writeln!(out, "in-app browser notice: off");
        }
    }

    if load.warnings.is_empty() {
        let _ = writeln!(out, "[ok] no warnings");
    } else {
        let _ = writeln!(out, "Warnings:");
        for warning in &load.warnings.items {
            match &warning.hint {
                Some(hint) => {
                    let _ = writeln!(out, "  - {} (hint: {})", warning.message, hint);
                }
                None => {
                    let _ = writeln!(out, "  - {}", warning.message);
                }
            }
        }
    }
    out
}

fn describe_length(backend: &BackendConfig) -> String {
    backend
        .duration()
        .map(|duration| format!(", {}", humantime::format_duration(duration)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatecast_config::EnvSnapshot;
    use tempfile::TempDir;

    #[test]
    fn default_funnel_renders_steps_without_warnings() {
        let dir = TempDir::new().unwrap();
        let load = ConfigLoader::new()
            .with_search_root(dir.path())
            .load_with_env(&EnvSnapshot::default())
            .unwrap();

        let text = render_check(&load);
        assert!(text.starts_with("source: built-in default funnel\n"));
        assert!(text.contains("/ [embed-api] next: navigate /secondo-video"), "{text}");
        assert!(text.contains("access window 2m"), "{text}");
        assert!(text.contains("in-app browser notice: continue after 0s"), "{text}");
        assert!(text.contains("[ok] no warnings"));
    }
}
