use gatecast_model::{
    AccessBlock, ClientId, EpochMillis, GatePhase, Route, WindowOpens,
};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::gate::access::AccessBlockStore;

/// What completing a step leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAction {
    Navigate(Route),
    /// Opened in a new tab; the visitor stays on the step.
    OpenLink(Url),
}

/// When the end-of-video popup appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupTrigger {
    #[default]
    Never,
    /// As soon as the call-to-action is revealed.
    OnReveal,
    /// When the visitor activates the call-to-action; confirming the popup
    /// then proceeds.
    OnActivate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    pub window: Duration,
    /// How long an expired window keeps the client out. Zero writes no
    /// block.
    pub block_for: Duration,
    pub opens: WindowOpens,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GateConfig {
    pub next: Option<NextAction>,
    pub popup: PopupTrigger,
    pub access: Option<AccessPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateSignal {
    /// The call-to-action became reachable.
    Revealed,
    ShowPopup,
    WindowOpened { expires_at: EpochMillis },
    /// Carries the step's next action; emitted once.
    Completed(Option<NextAction>),
    /// The window ran out. `blocked_until` is `None` when no block was
    /// written.
    Expired { blocked_until: Option<EpochMillis> },
    /// A block recorded earlier is still in force for this client.
    Blocked { until: EpochMillis },
}

/// Sequences one step's gate:
/// `Locked → Unlocked → [WindowOpen] → Completed | Expired`.
///
/// The call-to-action is unreachable until [`GateSequencer::on_video_ended`]
/// has been called, and `Completed`/`Expired` are terminal.
#[derive(Debug)]
pub struct GateSequencer {
    config: GateConfig,
    client: ClientId,
    blocks: AccessBlockStore,
    phase: GatePhase,
    popup_shown: bool,
}

impl GateSequencer {
    pub fn new(
        config: GateConfig,
        client: ClientId,
        blocks: AccessBlockStore,
    ) -> Self {
        Self {
            config,
            client,
            blocks,
            phase: GatePhase::Locked,
            popup_shown: false,
        }
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn client(&self) -> &ClientId {
        &self.client
    }

    pub fn blocks(&self) -> &AccessBlockStore {
        &self.blocks
    }

    pub fn popup_shown(&self) -> bool {
        self.popup_shown
    }

    /// Time left in an open access window.
    pub fn remaining(&self, now: EpochMillis) -> Option<Duration> {
        self.phase.expires_at().map(|expires_at| now.until(expires_at))
    }

    /// Check for a block left by an earlier visit. A block in force puts
    /// the gate straight into `Expired`.
    pub fn mount(&mut self, now: EpochMillis) -> Vec<GateSignal> {
        if self.config.access.is_none() {
            return Vec::new();
        }
        match self.blocks.active_block(&self.client, now) {
            Ok(Some(block)) => {
                info!(client = %self.client, until = %block.blocked_until, "client still blocked");
                self.phase = GatePhase::Expired;
                vec![GateSignal::Blocked {
                    until: block.blocked_until,
                }]
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "could not read access block; treating as none");
                Vec::new()
            }
        }
    }

    /// The video ended. Repeated calls are ignored.
    pub fn on_video_ended(&mut self, now: EpochMillis) -> Vec<GateSignal> {
        if self.phase != GatePhase::Locked {
            return Vec::new();
        }
        self.phase = GatePhase::Unlocked;
        info!(client = %self.client, "call-to-action revealed");

        let mut signals = vec![GateSignal::Revealed];
        if self.config.popup == PopupTrigger::OnReveal {
            self.popup_shown = true;
            signals.push(GateSignal::ShowPopup);
        }
        if let Some(policy) = self.config.access
            && policy.opens == WindowOpens::OnReveal
        {
            signals.push(self.open_window(policy, now));
        }
        signals
    }

    /// The visitor activated the call-to-action (or confirmed the popup).
    pub fn activate(&mut self, now: EpochMillis) -> Vec<GateSignal> {
        match self.phase {
            GatePhase::Locked => {
                debug!("call-to-action activated while locked");
                Vec::new()
            }
            GatePhase::Unlocked => {
                if self.config.popup == PopupTrigger::OnActivate
                    && !self.popup_shown
                {
                    self.popup_shown = true;
                    return vec![GateSignal::ShowPopup];
                }
                match self.config.access {
                    Some(policy) if policy.opens == WindowOpens::OnActivate => {
                        vec![self.open_window(policy, now)]
                    }
                    _ => self.complete(now),
                }
            }
            GatePhase::WindowOpen { .. } => self.complete(now),
            GatePhase::Completed | GatePhase::Expired => Vec::new(),
        }
    }

    /// Close the popup without proceeding. A popup shown on activation
    /// shows again on the next activation.
    pub fn dismiss_popup(&mut self) {
        if self.config.popup == PopupTrigger::OnActivate
            && self.phase == GatePhase::Unlocked
        {
            self.popup_shown = false;
        }
    }

    /// Finish the step, if the gate allows it at `now`.
    pub fn complete(&mut self, now: EpochMillis) -> Vec<GateSignal> {
        match self.phase {
            GatePhase::Unlocked => {}
            GatePhase::WindowOpen { expires_at } if now < expires_at => {}
            GatePhase::WindowOpen { .. } => return self.expire(now),
            _ => return Vec::new(),
        }
        self.phase = GatePhase::Completed;
        info!(client = %self.client, next = ?self.config.next, "gate completed");
        vec![GateSignal::Completed(self.config.next.clone())]
    }

    /// Expire an open window whose deadline has passed.
    pub fn tick(&mut self, now: EpochMillis) -> Vec<GateSignal> {
        match self.phase {
            GatePhase::WindowOpen { expires_at } if now >= expires_at => {
                self.expire(now)
            }
            _ => Vec::new(),
        }
    }

    fn open_window(
        &mut self,
        policy: AccessPolicy,
        now: EpochMillis,
    ) -> GateSignal {
        let expires_at = now.saturating_add(policy.window);
        self.phase = GatePhase::WindowOpen { expires_at };
        info!(client = %self.client, %expires_at, "access window opened");
        GateSignal::WindowOpened { expires_at }
    }

    fn expire(&mut self, now: EpochMillis) -> Vec<GateSignal> {
        self.phase = GatePhase::Expired;
        let block_for = self
            .config
            .access
            .map(|policy| policy.block_for)
            .unwrap_or_default();

        let blocked_until = if block_for.is_zero() {
            None
        } else {
            let until = now.saturating_add(block_for);
            match self.blocks.block(&self.client, until) {
                Ok(AccessBlock { blocked_until, .. }) => Some(blocked_until),
                Err(err) => {
                    warn!(%err, client = %self.client, "failed to record access block");
                    None
                }
            }
        };
        info!(client = %self.client, ?blocked_until, "access window expired");
        vec![GateSignal::Expired { blocked_until }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use gatecast_contracts::storage::KeyValueStore;

    fn gate(config: GateConfig) -> (GateSequencer, MemoryStore) {
        let store = MemoryStore::new();
        let blocks = AccessBlockStore::new(Box::new(store.clone()));
        let client = ClientId::new("192.168.1.42").unwrap();
        (GateSequencer::new(config, client, blocks), store)
    }

    fn windowed(window: Duration, opens: WindowOpens) -> GateConfig {
        GateConfig {
            next: Some(NextAction::OpenLink(
                Url::parse("https://forms.example.com/q").unwrap(),
            )),
            popup: PopupTrigger::Never,
            access: Some(AccessPolicy {
                window,
                block_for: Duration::from_secs(600),
                opens,
            }),
        }
    }

    #[test]
    fn call_to_action_is_unreachable_while_locked() {
        let (mut gate, _) = gate(GateConfig::default());
        assert!(gate.activate(EpochMillis(0)).is_empty());
        assert!(gate.complete(EpochMillis(0)).is_empty());
        assert_eq!(gate.phase(), GatePhase::Locked);
    }

    #[test]
    fn repeated_end_reveals_once() {
        let (mut gate, _) = gate(GateConfig::default());
        assert_eq!(gate.on_video_ended(EpochMillis(0)), vec![GateSignal::Revealed]);
        assert!(gate.on_video_ended(EpochMillis(1)).is_empty());
    }

    #[test]
    fn popup_on_activate_then_confirm_navigates() {
        let (mut gate, _) = gate(GateConfig {
            next: Some(NextAction::Navigate(Route::SecondVideo)),
            popup: PopupTrigger::OnActivate,
            access: None,
        });
        gate.on_video_ended(EpochMillis(0));
        assert_eq!(gate.activate(EpochMillis(1)), vec![GateSignal::ShowPopup]);
        gate.dismiss_popup();
        assert_eq!(gate.activate(EpochMillis(2)), vec![GateSignal::ShowPopup]);
        assert_eq!(
            gate.activate(EpochMillis(3)),
            vec![GateSignal::Completed(Some(NextAction::Navigate(
                Route::SecondVideo
            )))]
        );
        assert!(gate.activate(EpochMillis(4)).is_empty());
    }

    #[test]
    fn window_opened_on_reveal_completes_in_time() {
        let (mut gate, store) =
            gate(windowed(Duration::from_secs(120), WindowOpens::OnReveal));
        let signals = gate.on_video_ended(EpochMillis(1_000));
        assert_eq!(
            signals,
            vec![
                GateSignal::Revealed,
                GateSignal::WindowOpened {
                    expires_at: EpochMillis(121_000)
                }
            ]
        );
        assert_eq!(
            gate.remaining(EpochMillis(61_000)),
            Some(Duration::from_secs(60))
        );
        assert!(matches!(
            gate.activate(EpochMillis(120_999)).as_slice(),
            [GateSignal::Completed(Some(NextAction::OpenLink(_)))]
        ));
        assert!(gate.tick(EpochMillis(200_000)).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn lapsed_window_expires_and_blocks() {
        let (mut gate, store) =
            gate(windowed(Duration::ZERO, WindowOpens::OnActivate));
        gate.on_video_ended(EpochMillis(5_000));
        gate.activate(EpochMillis(5_000));

        let signals = gate.tick(EpochMillis(5_000));
        assert_eq!(
            signals,
            vec![GateSignal::Expired {
                blocked_until: Some(EpochMillis(605_000))
            }]
        );
        assert_eq!(gate.phase(), GatePhase::Expired);
        assert_eq!(
            store.get("blocked_192.168.1.42").unwrap().as_deref(),
            Some("605000")
        );
        assert!(gate.activate(EpochMillis(5_001)).is_empty());
    }

    #[test]
    fn active_block_expires_gate_on_mount() {
        let (mut gate, store) =
            gate(windowed(Duration::from_secs(120), WindowOpens::OnReveal));
        let mut raw = store.clone();
        raw.set("blocked_192.168.1.42", "50000").unwrap();

        assert_eq!(
            gate.mount(EpochMillis(10_000)),
            vec![GateSignal::Blocked {
                until: EpochMillis(50_000)
            }]
        );
        assert_eq!(gate.phase(), GatePhase::Expired);
        assert!(gate.on_video_ended(EpochMillis(10_001)).is_empty());
    }
}
