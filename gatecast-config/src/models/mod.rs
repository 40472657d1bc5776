pub mod duration;

use gatecast_core::funnel::definition::{
    ACCESS_BLOCK_PERIOD, ACCESS_WINDOW, DEFAULT_INITIAL_VOLUME,
    DEFAULT_MAX_SILENT_RETRIES, LANDING_PROVIDER, LANDING_VIDEO_ID,
    QUESTIONNAIRE_URL, SECOND_VIDEO_DURATION,
};
use gatecast_core::shell::controls::DEFAULT_HIDE_AFTER;
use gatecast_model::{BackendKind, Route, WindowOpens};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Where the CLI keeps access blocks unless told otherwise.
pub const DEFAULT_STORE_PATH: &str = "gatecast-blocks.json";

/// Stand-in length for a plain frame whose duration was left out.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_secs(60);

/// Funnel configuration as written in `gatecast.toml` or JSON.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FunnelConfig {
    pub steps: Vec<StepConfig>,
    #[serde(default)]
    pub controls: ControlsSection,
    #[serde(default)]
    pub playback: PlaybackSection,
    #[serde(default)]
    pub storage: StorageSection,
    /// Notice shown to visitors inside an in-app browser; left out means
    /// every visitor starts on the first step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_app_notice: Option<NoticeSection>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StepConfig {
    pub route: Route,
    pub backend: BackendConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<NextConfig>,
    #[serde(default)]
    pub popup: PopupSetting,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<AccessConfig>,
}

/// Player backend for a step, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    Simulated {
        #[serde(with = "duration")]
        duration: Duration,
    },
    Native {
        src: Url,
        #[serde(
            default,
            with = "duration::option",
            skip_serializing_if = "Option::is_none"
        )]
        duration: Option<Duration>,
    },
    Embed {
        provider: String,
        video_id: String,
        #[serde(
            default,
            with = "duration::option",
            skip_serializing_if = "Option::is_none"
        )]
        duration: Option<Duration>,
    },
    Frame {
        src: Url,
        #[serde(
            default,
            with = "duration::option",
            skip_serializing_if = "Option::is_none"
        )]
        duration: Option<Duration>,
    },
}

impl BackendConfig {
    pub fn kind(&self) -> BackendKind {
        match self {
            BackendConfig::Simulated { .. } => BackendKind::Simulated,
            BackendConfig::Native { .. } => BackendKind::NativeElement,
            BackendConfig::Embed { .. } => BackendKind::EmbedApi,
            BackendConfig::Frame { .. } => BackendKind::PlainFrame,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            BackendConfig::Simulated { duration } => Some(*duration),
            BackendConfig::Native { duration, .. }
            | BackendConfig::Embed { duration, .. }
            | BackendConfig::Frame { duration, .. } => *duration,
        }
    }
}

/// What the call-to-action does once the gate completes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextConfig {
    Navigate(Route),
    Link(Url),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupSetting {
    #[default]
    Never,
    OnReveal,
    OnActivate,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AccessConfig {
    #[serde(with = "duration")]
    pub window: Duration,
    /// Left out means expiry blocks nobody.
    #[serde(
        default,
        with = "duration::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub block_for: Option<Duration>,
    #[serde(default)]
    pub opens: WindowOpens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSection {
    #[serde(with = "duration")]
    pub hide_after: Duration,
    pub coarse_pointer: bool,
}

impl Default for ControlsSection {
    fn default() -> Self {
        Self {
            hide_after: DEFAULT_HIDE_AFTER,
            coarse_pointer: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSection {
    pub initial_volume: f64,
    pub max_silent_retries: u32,
    pub autoplay: bool,
}

impl Default for PlaybackSection {
    fn default() -> Self {
        Self {
            initial_volume: DEFAULT_INITIAL_VOLUME,
            max_silent_retries: DEFAULT_MAX_SILENT_RETRIES,
            autoplay: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSection {
    pub path: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NoticeSection {
    #[serde(with = "duration")]
    pub continue_after: Duration,
}

impl Default for FunnelConfig {
    /// The built-in two-step funnel: landing video, then a short second
    /// video that opens a two-minute questionnaire window.
    fn default() -> Self {
        let landing = StepConfig {
            route: Route::Landing,
            backend: BackendConfig::Embed {
                provider: LANDING_PROVIDER.to_string(),
                video_id: LANDING_VIDEO_ID.to_string(),
                duration: None,
            },
            next: Some(NextConfig::Navigate(Route::SecondVideo)),
            popup: PopupSetting::OnActivate,
            access: None,
        };

        let second = StepConfig {
            route: Route::SecondVideo,
            backend: BackendConfig::Simulated {
                duration: SECOND_VIDEO_DURATION,
            },
            next: Url::parse(QUESTIONNAIRE_URL).ok().map(NextConfig::Link),
            popup: PopupSetting::OnReveal,
            access: Some(AccessConfig {
                window: ACCESS_WINDOW,
                block_for: Some(ACCESS_BLOCK_PERIOD),
                opens: WindowOpens::OnReveal,
            }),
        };

        Self {
            steps: vec![landing, second],
            controls: ControlsSection::default(),
            playback: PlaybackSection::default(),
            storage: StorageSection::default(),
            in_app_notice: Some(NoticeSection::default()),
        }
    }
}

impl FunnelConfig {
    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
