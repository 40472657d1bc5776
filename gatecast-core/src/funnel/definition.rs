use gatecast_model::{Route, Volume, WindowOpens};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::backend::BackendSpec;
use crate::error::{CoreError, Result};
use crate::funnel::notice::NoticeConfig;
use crate::gate::{AccessPolicy, GateConfig, NextAction, PopupTrigger};
use crate::shell::ControlsConfig;

pub const DEFAULT_INITIAL_VOLUME: f64 = 0.7;
pub const DEFAULT_MAX_SILENT_RETRIES: u32 = 1;

pub const LANDING_PROVIDER: &str = "vimeo";
pub const LANDING_VIDEO_ID: &str = "1089786027";
pub const SECOND_VIDEO_DURATION: Duration = Duration::from_secs(3);
pub const ACCESS_WINDOW: Duration = Duration::from_secs(120);
pub const ACCESS_BLOCK_PERIOD: Duration = Duration::from_secs(10 * 60);
pub const QUESTIONNAIRE_URL: &str = "https://esempio-questionario.com/";

/// Player behaviour shared by every step of a funnel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSettings {
    pub controls: ControlsConfig,
    pub initial_volume: Volume,
    /// Failures retried without showing the error banner.
    pub max_silent_retries: u32,
    /// Try to start playback as soon as the step mounts.
    pub autoplay: bool,
}

impl Default for StepSettings {
    fn default() -> Self {
        Self {
            controls: ControlsConfig::default(),
            initial_volume: Volume::new(DEFAULT_INITIAL_VOLUME),
            max_silent_retries: DEFAULT_MAX_SILENT_RETRIES,
            autoplay: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepDefinition {
    pub route: Route,
    pub backend: BackendSpec,
    pub gate: GateConfig,
}

/// Ordered steps of a funnel; the first one is the entry point.
///
/// An optional in-app browser notice is shown ahead of the entry step.
#[derive(Debug, Clone, PartialEq)]
pub struct FunnelDefinition {
    steps: Vec<StepDefinition>,
    settings: StepSettings,
    notice: Option<NoticeConfig>,
}

impl FunnelDefinition {
    pub fn new(steps: Vec<StepDefinition>, settings: StepSettings) -> Result<Self> {
        if steps.is_empty() {
            return Err(CoreError::EmptyFunnel);
        }
        Ok(Self {
            steps,
            settings,
            notice: None,
        })
    }

    pub fn with_notice(mut self, notice: Option<NoticeConfig>) -> Self {
        self.notice = notice;
        self
    }

    pub fn notice(&self) -> Option<&NoticeConfig> {
        self.notice.as_ref()
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn settings(&self) -> &StepSettings {
        &self.settings
    }

    pub fn entry(&self) -> &StepDefinition {
        // `new` refuses empty funnels
        &self.steps[0]
    }

    pub fn step(&self, route: &Route) -> Option<&StepDefinition> {
        self.steps.iter().find(|step| &step.route == route)
    }

    pub fn require_step(&self, route: &Route) -> Result<&StepDefinition> {
        self.step(route)
            .ok_or_else(|| CoreError::UnknownRoute(route.clone()))
    }

    /// Replace every backend with a timer-driven stand-in of the same
    /// length. Steps whose length is unknown get `fallback`.
    pub fn simulated(&self, fallback: Duration) -> Self {
        let steps = self
            .steps
            .iter()
            .map(|step| {
                let backend = step.backend.simulated_stand_in().unwrap_or_else(|| {
                    debug!(route = %step.route, ?fallback, "no known duration; using fallback");
                    BackendSpec::Simulated { duration: fallback }
                });
                StepDefinition {
                    backend,
                    ..step.clone()
                }
            })
            .collect();
        Self {
            steps,
            settings: self.settings,
            notice: self.notice,
        }
    }
}

impl Default for FunnelDefinition {
    /// Landing video, then a short second video whose end opens a
    /// two-minute questionnaire window. In-app browsers see the notice
    /// first.
    fn default() -> Self {
        let landing = StepDefinition {
            route: Route::Landing,
            backend: BackendSpec::EmbedApi {
                provider: LANDING_PROVIDER.to_string(),
                video_id: LANDING_VIDEO_ID.to_string(),
                duration_hint: None,
            },
            gate: GateConfig {
                next: Some(NextAction::Navigate(Route::SecondVideo)),
                popup: PopupTrigger::OnActivate,
                access: None,
            },
        };

        let second = StepDefinition {
            route: Route::SecondVideo,
            backend: BackendSpec::Simulated {
                duration: SECOND_VIDEO_DURATION,
            },
            gate: GateConfig {
                next: Url::parse(QUESTIONNAIRE_URL).ok().map(NextAction::OpenLink),
                popup: PopupTrigger::OnReveal,
                access: Some(AccessPolicy {
                    window: ACCESS_WINDOW,
                    block_for: ACCESS_BLOCK_PERIOD,
                    opens: WindowOpens::OnReveal,
                }),
            },
        };

        Self {
            steps: vec![landing, second],
            settings: StepSettings::default(),
            notice: Some(NoticeConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_funnel_is_rejected() {
        assert!(matches!(
            FunnelDefinition::new(Vec::new(), StepSettings::default()),
            Err(CoreError::EmptyFunnel)
        ));
    }

    #[test]
    fn default_funnel_chains_landing_to_second_video() {
        let funnel = FunnelDefinition::default();
        assert_eq!(funnel.entry().route, Route::Landing);
        assert_eq!(
            funnel.entry().gate.next,
            Some(NextAction::Navigate(Route::SecondVideo))
        );
        let second = funnel.require_step(&Route::SecondVideo).unwrap();
        assert!(matches!(second.gate.next, Some(NextAction::OpenLink(_))));
        assert!(funnel.require_step(&Route::NotFound).is_err());
        assert_eq!(funnel.notice(), Some(&NoticeConfig::default()));
    }

    #[test]
    fn simulated_copy_uses_fallback_for_unknown_lengths() {
        let funnel = FunnelDefinition::default().simulated(Duration::from_secs(30));
        assert_eq!(
            funnel.entry().backend,
            BackendSpec::Simulated {
                duration: Duration::from_secs(30)
            }
        );
        assert_eq!(
            funnel.steps()[1].backend,
            BackendSpec::Simulated {
                duration: SECOND_VIDEO_DURATION
            }
        );
    }
}
