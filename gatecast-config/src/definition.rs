//! Turns a parsed [`FunnelConfig`] into the engine's [`FunnelDefinition`].

use gatecast_core::CoreError;
use gatecast_core::backend::BackendSpec;
use gatecast_core::funnel::{
    FunnelDefinition, NoticeConfig, StepDefinition, StepSettings,
};
use gatecast_core::gate::{AccessPolicy, GateConfig, NextAction, PopupTrigger};
use gatecast_core::shell::ControlsConfig;
use gatecast_model::Volume;
use std::time::Duration;

use super::models::{
    AccessConfig, BackendConfig, DEFAULT_FRAME_DURATION, FunnelConfig,
    NextConfig, NoticeSection, PopupSetting, StepConfig,
};

impl FunnelConfig {
    pub fn settings(&self) -> StepSettings {
        StepSettings {
            controls: ControlsConfig {
                hide_after: self.controls.hide_after,
                coarse_pointer: self.controls.coarse_pointer,
            },
            initial_volume: Volume::new(self.playback.initial_volume),
            max_silent_retries: self.playback.max_silent_retries,
            autoplay: self.playback.autoplay,
        }
    }

    /// Assumes the guard rails already passed; only an empty step list is
    /// refused here.
    pub fn to_definition(&self) -> Result<FunnelDefinition, CoreError> {
        let steps = self.steps.iter().map(StepConfig::to_definition).collect();
        Ok(FunnelDefinition::new(steps, self.settings())?
            .with_notice(self.in_app_notice.map(NoticeSection::to_config)))
    }
}

impl NoticeSection {
    pub fn to_config(self) -> NoticeConfig {
        NoticeConfig {
            continue_after: self.continue_after,
        }
    }
}

impl StepConfig {
    pub fn to_definition(&self) -> StepDefinition {
        StepDefinition {
            route: self.route.clone(),
            backend: self.backend.to_spec(),
            gate: GateConfig {
                next: self.next.as_ref().map(NextConfig::to_action),
                popup: self.popup.into(),
                access: self.access.as_ref().map(AccessConfig::to_policy),
            },
        }
    }
}

impl BackendConfig {
    pub fn to_spec(&self) -> BackendSpec {
        match self {
            BackendConfig::Simulated { duration } => BackendSpec::Simulated {
                duration: *duration,
            },
            BackendConfig::Native { src, duration } => {
                BackendSpec::NativeElement {
                    src: src.clone(),
                    duration_hint: *duration,
                }
            }
            BackendConfig::Embed {
                provider,
                video_id,
                duration,
            } => BackendSpec::EmbedApi {
                provider: provider.clone(),
                video_id: video_id.clone(),
                duration_hint: *duration,
            },
            BackendConfig::Frame { src, duration } => BackendSpec::PlainFrame {
                src: src.clone(),
                duration: duration.unwrap_or(DEFAULT_FRAME_DURATION),
            },
        }
    }
}

impl NextConfig {
    pub fn to_action(&self) -> NextAction {
        match self {
            NextConfig::Navigate(route) => NextAction::Navigate(route.clone()),
            NextConfig::Link(url) => NextAction::OpenLink(url.clone()),
        }
    }
}

impl From<PopupSetting> for PopupTrigger {
    fn from(value: PopupSetting) -> Self {
        match value {
            PopupSetting::Never => PopupTrigger::Never,
            PopupSetting::OnReveal => PopupTrigger::OnReveal,
            PopupSetting::OnActivate => PopupTrigger::OnActivate,
        }
    }
}

impl AccessConfig {
    pub fn to_policy(&self) -> AccessPolicy {
        AccessPolicy {
            window: self.window,
            block_for: self.block_for.unwrap_or(Duration::ZERO),
            opens: self.opens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn default_config_matches_the_built_in_funnel() {
        let definition = FunnelConfig::default().to_definition().unwrap();
        assert_eq!(definition, FunnelDefinition::default());
    }

    #[test]
    fn frame_without_duration_gets_the_stand_in_length() {
        let backend = BackendConfig::Frame {
            src: Url::parse("https://player.example.com/42").unwrap(),
            duration: None,
        };
        assert!(matches!(
            backend.to_spec(),
            BackendSpec::PlainFrame { duration, .. } if duration == DEFAULT_FRAME_DURATION
        ));
    }

    #[test]
    fn missing_block_period_blocks_nobody() {
        let access = AccessConfig {
            window: Duration::from_secs(60),
            block_for: None,
            opens: Default::default(),
        };
        assert_eq!(access.to_policy().block_for, Duration::ZERO);
    }

    #[test]
    fn notice_follows_the_config_section() {
        let config = FunnelConfig {
            in_app_notice: Some(NoticeSection {
                continue_after: Duration::from_secs(3),
            }),
            ..FunnelConfig::default()
        };
        assert_eq!(
            config.to_definition().unwrap().notice(),
            Some(&NoticeConfig {
                continue_after: Duration::from_secs(3)
            })
        );

        let config = FunnelConfig {
            in_app_notice: None,
            ..FunnelConfig::default()
        };
        assert_eq!(config.to_definition().unwrap().notice(), None);
    }

    #[test]
    fn empty_config_is_refused() {
        let config = FunnelConfig {
            steps: Vec::new(),
            ..FunnelConfig::default()
        };
        assert!(matches!(config.to_definition(), Err(CoreError::EmptyFunnel)));
    }
}
