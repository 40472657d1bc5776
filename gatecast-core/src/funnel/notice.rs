//! Notice shown ahead of the funnel to visitors browsing inside a social
//! app's built-in browser, asking them to reopen the page externally.
//!
//! Nothing about the notice is persisted: every visit from an in-app
//! browser sees it again.

use gatecast_model::EpochMillis;
use std::time::Duration;
use tracing::debug;

/// User-agent fragments (lowercase) of in-app browsers that get the notice.
pub const IN_APP_BROWSER_MARKERS: &[&str] = &["instagram"];

pub fn is_in_app_browser(user_agent: &str) -> bool {
    let user_agent = user_agent.to_lowercase();
    IN_APP_BROWSER_MARKERS
        .iter()
        .any(|marker| user_agent.contains(marker))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoticeConfig {
    /// Delay before the continue button appears.
    pub continue_after: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeView {
    pub continue_visible: bool,
}

#[derive(Debug, Clone)]
pub struct InAppNotice {
    config: NoticeConfig,
    shown_at: EpochMillis,
    dismissed: bool,
}

impl InAppNotice {
    pub fn new(config: NoticeConfig, shown_at: EpochMillis) -> Self {
        Self {
            config,
            shown_at,
            dismissed: false,
        }
    }

    pub fn shown_at(&self) -> EpochMillis {
        self.shown_at
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn continue_visible(&self, now: EpochMillis) -> bool {
        !self.dismissed && now >= self.continue_at()
    }

    fn continue_at(&self) -> EpochMillis {
        self.shown_at.saturating_add(self.config.continue_after)
    }

    /// When the continue button appears, if that is still ahead.
    pub fn next_wake(&self, now: EpochMillis) -> Option<EpochMillis> {
        let at = self.continue_at();
        (!self.dismissed && at > now).then_some(at)
    }

    /// Press the continue button. Returns `true` the one time the press
    /// is accepted.
    pub fn press_continue(&mut self, now: EpochMillis) -> bool {
        if !self.continue_visible(now) {
            debug!(%now, "continue pressed while unavailable");
            return false;
        }
        self.dismissed = true;
        true
    }

    pub fn view(&self, now: EpochMillis) -> NoticeView {
        NoticeView {
            continue_visible: self.continue_visible(now),
        }
    }
}
