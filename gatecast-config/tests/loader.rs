use gatecast_config::{
    ConfigGuardRailError, ConfigLoadError, ConfigLoader, ConfigSource,
    EnvSnapshot,
};
use gatecast_core::backend::BackendSpec;
use gatecast_model::Route;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const TWO_STEPS: &str = r#"
[playback]
max_silent_retries = 2

[[steps]]
route = "/"
backend = { kind = "simulated", duration = "1m" }
next = { navigate = "/secondo-video" }

[[steps]]
route = "/secondo-video"
backend = { kind = "simulated", duration = "3s" }
next = { link = "https://esempio-questionario.com/" }
popup = "on_reveal"
access = { window = "2m", block_for = "10m", opens = "on_reveal" }
"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

fn isolated(dir: &TempDir) -> ConfigLoader {
    ConfigLoader::new().with_search_root(dir.path())
}

#[test]
fn falls_back_to_the_built_in_funnel() {
    let dir = TempDir::new().unwrap();
    let load = isolated(&dir).load_with_env(&EnvSnapshot::default()).unwrap();

    assert_eq!(load.source, ConfigSource::Default);
    assert!(load.warnings.is_empty());
    assert_eq!(load.definition.entry().route, Route::Landing);
    assert_eq!(load.definition.steps().len(), 2);
}

#[test]
fn default_file_is_found_under_config_dir() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "config/gatecast.toml", TWO_STEPS);

    let load = isolated(&dir).load_with_env(&EnvSnapshot::default()).unwrap();
    assert_eq!(load.source, ConfigSource::File(path));
    assert_eq!(load.definition.settings().max_silent_retries, 2);
    assert_eq!(
        load.definition.entry().backend,
        BackendSpec::Simulated {
            duration: Duration::from_secs(60)
        }
    );
}

#[test]
fn env_path_wins_over_inline_json_and_default_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "gatecast.toml", "this is not toml");
    let env_path = write(dir.path(), "elsewhere/funnel.toml", TWO_STEPS);

    let env = EnvSnapshot {
        config_path: Some(env_path.clone()),
        config_json: Some("{ not json".into()),
    };
    let load = isolated(&dir).load_with_env(&env).unwrap();
    assert_eq!(load.source, ConfigSource::EnvPath(env_path));
}

#[test]
fn inline_json_is_used_when_no_path_is_set() {
    let dir = TempDir::new().unwrap();
    let env = EnvSnapshot {
        config_path: None,
        config_json: Some(
            r#"{"steps":[{"route":"/","backend":{"kind":"simulated","duration":"5s"},
                "next":{"link":"https://esempio-questionario.com/"}}]}"#
                .into(),
        ),
    };

    let load = isolated(&dir).load_with_env(&env).unwrap();
    assert_eq!(load.source, ConfigSource::EnvInline);
    assert_eq!(load.definition.steps().len(), 1);
}

#[test]
fn explicit_path_must_exist() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = isolated(&dir)
        .with_config_path(&missing)
        .load_with_env(&EnvSnapshot::default())
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { path } if path == missing));
}

#[test]
fn unknown_extension_tries_toml_then_json() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "funnel.conf",
        r#"{"steps":[{"route":"/","backend":{"kind":"simulated","duration":3}}]}"#,
    );
    let load = isolated(&dir)
        .with_config_path(&path)
        .load_with_env(&EnvSnapshot::default())
        .unwrap();
    // the only step has no next action
    assert_eq!(load.warnings.len(), 1);

    let garbage = write(dir.path(), "garbage.conf", "=");
    let err = isolated(&dir)
        .with_config_path(&garbage)
        .load_with_env(&EnvSnapshot::default())
        .unwrap_err();
    let text = err.to_string();
    assert!(text.contains("toml error") && text.contains("json error"), "{text}");
}

#[test]
fn guard_rails_reject_unknown_navigate_targets() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "gatecast.toml",
        r#"
[[steps]]
route = "/"
backend = { kind = "simulated", duration = "3s" }
next = { navigate = "/missing" }
"#,
    );

    let err = isolated(&dir)
        .with_config_path(path)
        .load_with_env(&EnvSnapshot::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::UnknownNavigateTarget { .. })
    ));
}

#[test]
fn guard_rails_reject_zero_durations_from_files() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "gatecast.json",
        r#"{"steps":[{"route":"/","backend":{"kind":"simulated","duration":"0s"}}]}"#,
    );

    let err = isolated(&dir)
        .with_config_path(path)
        .load_with_env(&EnvSnapshot::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::ZeroDuration { .. })
    ));
}
