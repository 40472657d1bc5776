use gatecast_model::Route;
use std::collections::HashSet;
use thiserror::Error;

use super::models::{
    BackendConfig, DEFAULT_FRAME_DURATION, FunnelConfig, NextConfig,
};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("funnel defines no steps")]
    NoSteps,
    #[error("{field} must be longer than zero")]
    ZeroDuration { field: String },
    #[error("route {route} is defined more than once")]
    DuplicateRoute { route: Route },
    #[error("step {from} navigates to {to}, which is not part of the funnel")]
    UnknownNavigateTarget { from: Route, to: Route },
    #[error("initial volume {value} is outside [0, 1]")]
    VolumeOutOfRange { value: f64 },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(
    config: &FunnelConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.steps.is_empty() {
        return Err(ConfigGuardRailError::NoSteps);
    }

    let volume = config.playback.initial_volume;
    if !(0.0..=1.0).contains(&volume) {
        return Err(ConfigGuardRailError::VolumeOutOfRange { value: volume });
    }

    require_nonzero(config.controls.hide_after, || {
        "controls.hide_after".to_string()
    })?;

    let mut seen = HashSet::new();
    for step in &config.steps {
        if !seen.insert(&step.route) {
            return Err(ConfigGuardRailError::DuplicateRoute {
                route: step.route.clone(),
            });
        }
    }

    for step in &config.steps {
        let route = &step.route;

        if let Some(duration) = step.backend.duration() {
            require_nonzero(duration, || format!("{route} backend duration"))?;
        }

        if let BackendConfig::Frame { duration: None, .. } = step.backend {
            warnings.push_with_hint(
                format!("step {route} uses a plain frame without a duration"),
                format!(
                    "Progress cannot be observed inside a plain frame; it will be simulated for {}",
                    humantime::format_duration(DEFAULT_FRAME_DURATION)
                ),
            );
        }

        if let Some(access) = &step.access {
            require_nonzero(access.window, || {
                format!("{route} access window")
            })?;
            match access.block_for {
                Some(block_for) => require_nonzero(block_for, || {
                    format!("{route} access block_for")
                })?,
                None => warnings.push_with_hint(
                    format!("step {route} has an access window but no block period"),
                    "Set access.block_for to keep visitors from retrying straight after expiry",
                ),
            }
        }

        if let Some(NextConfig::Navigate(target)) = &step.next
            && !seen.contains(target)
        {
            return Err(ConfigGuardRailError::UnknownNavigateTarget {
                from: route.clone(),
                to: target.clone(),
            });
        }
    }

    if let Some(last) = config.steps.last()
        && last.next.is_none()
    {
        warnings.push_with_hint(
            format!("final step {} has no next action", last.route),
            "Add `next = { link = \"...\" }` so the call-to-action leads somewhere",
        );
    }

    if config.playback.max_silent_retries == 0 {
        warnings.push_with_hint(
            "playback.max_silent_retries is 0; every playback failure shows the error banner",
            "Allow at least one silent retry to ride out transient network errors",
        );
    }

    Ok(warnings)
}

fn require_nonzero(
    duration: std::time::Duration,
    field: impl FnOnce() -> String,
) -> Result<(), ConfigGuardRailError> {
    if duration.is_zero() {
        return Err(ConfigGuardRailError::ZeroDuration { field: field() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccessConfig, PopupSetting, StepConfig};
    use gatecast_model::WindowOpens;
    use std::time::Duration;
    use url::Url;

    fn simulated(route: Route, next: Option<NextConfig>) -> StepConfig {
        StepConfig {
            route,
            backend: BackendConfig::Simulated {
                duration: Duration::from_secs(3),
            },
            next,
            popup: PopupSetting::Never,
            access: None,
        }
    }

    fn link() -> Option<NextConfig> {
        Some(NextConfig::Link(
            Url::parse("https://esempio-questionario.com/").unwrap(),
        ))
    }

    fn funnel(steps: Vec<StepConfig>) -> FunnelConfig {
        FunnelConfig {
            steps,
            ..FunnelConfig::default()
        }
    }

    #[test]
    fn default_funnel_passes_cleanly() {
        let warnings = apply_guard_rails(&FunnelConfig::default()).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn zero_durations_are_rejected() {
        let mut step = simulated(Route::Landing, link());
        step.backend = BackendConfig::Simulated {
            duration: Duration::ZERO,
        };
        assert!(matches!(
            apply_guard_rails(&funnel(vec![step])),
            Err(ConfigGuardRailError::ZeroDuration { .. })
        ));

        let mut step = simulated(Route::Landing, link());
        step.access = Some(AccessConfig {
            window: Duration::ZERO,
            block_for: Some(Duration::from_secs(600)),
            opens: WindowOpens::OnReveal,
        });
        let err = apply_guard_rails(&funnel(vec![step])).unwrap_err();
        assert_eq!(err.to_string(), "/ access window must be longer than zero");
    }

    #[test]
    fn duplicate_routes_are_rejected() {
        let steps = vec![
            simulated(Route::Landing, link()),
            simulated(Route::Landing, link()),
        ];
        assert!(matches!(
            apply_guard_rails(&funnel(steps)),
            Err(ConfigGuardRailError::DuplicateRoute { route }) if route == Route::Landing
        ));
    }

    #[test]
    fn navigate_must_target_a_known_route() {
        let steps = vec![simulated(
            Route::Landing,
            Some(NextConfig::Navigate(Route::Custom("/bridge".into()))),
        )];
        assert!(matches!(
            apply_guard_rails(&funnel(steps)),
            Err(ConfigGuardRailError::UnknownNavigateTarget { .. })
        ));
    }

    #[test]
    fn volume_must_be_a_unit_fraction() {
        let mut config = funnel(vec![simulated(Route::Landing, link())]);
        config.playback.initial_volume = 1.5;
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::VolumeOutOfRange { .. })
        ));
    }

    #[test]
    fn soft_problems_become_warnings() {
        let mut frame = simulated(Route::Landing, None);
        frame.backend = BackendConfig::Frame {
            src: Url::parse("https://player.example.com/42").unwrap(),
            duration: None,
        };
        frame.access = Some(AccessConfig {
            window: Duration::from_secs(60),
            block_for: None,
            opens: WindowOpens::OnActivate,
        });
        let mut config = funnel(vec![frame]);
        config.playback.max_silent_retries = 0;

        let warnings = apply_guard_rails(&config).unwrap();
        assert_eq!(warnings.len(), 4);
        assert!(warnings.items.iter().all(|warning| warning.hint.is_some()));
        assert!(warnings.items[0].message.contains("plain frame"));
    }
}
