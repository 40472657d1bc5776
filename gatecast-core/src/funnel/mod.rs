//! Funnel steps and the funnel that moves between them.

pub mod client;
pub mod definition;
pub mod notice;
pub mod step;

pub use client::{simulated_client_id, simulated_client_id_with};
pub use definition::{FunnelDefinition, StepDefinition, StepSettings};
pub use notice::{InAppNotice, NoticeConfig, NoticeView, is_in_app_browser};
pub use step::{FunnelStep, StepEffect, StepEvent, StepPorts, UserAction};

use gatecast_contracts::clock::Clock;
use gatecast_model::{ClientId, EpochMillis, Route};
use std::fmt::Debug;
use tracing::{debug, info};

use crate::error::Result;
use crate::shell::ShellView;

/// Hands out host ports for each step the funnel mounts.
pub trait PortsProvider: Debug {
    fn ports(&mut self, route: &Route) -> StepPorts;
}

#[derive(Debug)]
enum Stage {
    Notice(InAppNotice),
    Step(FunnelStep),
}

/// What the host renders for the funnel right now.
#[derive(Debug, Clone, PartialEq)]
pub enum FunnelView {
    Notice(NoticeView),
    Step(ShellView),
}

impl FunnelView {
    pub fn step(&self) -> Option<&ShellView> {
        match self {
            FunnelView::Step(view) => Some(view),
            FunnelView::Notice(_) => None,
        }
    }
}

/// A running funnel: the in-app browser notice or the current step, plus
/// everything needed to build the next step when one navigates.
#[derive(Debug)]
pub struct Funnel {
    definition: FunnelDefinition,
    client: ClientId,
    provider: Box<dyn PortsProvider>,
    clock: Box<dyn Clock>,
    stage: Stage,
}

impl Funnel {
    /// Build and mount the entry step. Returns the mount effects alongside
    /// the funnel.
    pub fn start(
        definition: FunnelDefinition,
        client: ClientId,
        provider: Box<dyn PortsProvider>,
        clock: Box<dyn Clock>,
    ) -> Result<(Self, Vec<StepEffect>)> {
        Self::enter(definition, client, false, provider, clock)
    }

    /// Like [`Funnel::start`], but visitors inside an in-app browser are
    /// held on the definition's notice until they press continue.
    pub fn enter(
        definition: FunnelDefinition,
        client: ClientId,
        in_app_browser: bool,
        mut provider: Box<dyn PortsProvider>,
        clock: Box<dyn Clock>,
    ) -> Result<(Self, Vec<StepEffect>)> {
        let now = clock.now();
        let notice = definition.notice().copied().filter(|_| in_app_browser);

        let (stage, effects) = match notice {
            Some(config) => {
                info!(client = %client, "funnel opened on the in-app browser notice");
                (
                    Stage::Notice(InAppNotice::new(config, now)),
                    vec![StepEffect::InAppNoticeShown],
                )
            }
            None => {
                let (step, effects) =
                    mount_entry(&definition, &client, provider.as_mut(), now)?;
                info!(client = %client, route = %step.route(), "funnel started");
                (Stage::Step(step), effects)
            }
        };

        Ok((
            Self {
                definition,
                client,
                provider,
                clock,
                stage,
            },
            effects,
        ))
    }

    /// The mounted step, or `None` while the notice is showing.
    pub fn current(&self) -> Option<&FunnelStep> {
        match &self.stage {
            Stage::Step(step) => Some(step),
            Stage::Notice(_) => None,
        }
    }

    pub fn notice(&self) -> Option<&InAppNotice> {
        match &self.stage {
            Stage::Notice(notice) => Some(notice),
            Stage::Step(_) => None,
        }
    }

    /// Route of the mounted step; the entry route while the notice shows.
    pub fn route(&self) -> &Route {
        match &self.stage {
            Stage::Step(step) => step.route(),
            Stage::Notice(_) => &self.definition.entry().route,
        }
    }

    pub fn client(&self) -> &ClientId {
        &self.client
    }

    pub fn definition(&self) -> &FunnelDefinition {
        &self.definition
    }

    pub fn view(&self) -> FunnelView {
        let now = self.clock.now();
        match &self.stage {
            Stage::Notice(notice) => FunnelView::Notice(notice.view(now)),
            Stage::Step(step) => FunnelView::Step(step.view(now)),
        }
    }

    /// Next instant something changes without an event from the host.
    pub fn next_wake(&self) -> Option<EpochMillis> {
        match &self.stage {
            Stage::Notice(notice) => notice.next_wake(self.clock.now()),
            Stage::Step(step) => step.next_wake(),
        }
    }

    /// Leave the notice for the entry step. Ignored until the continue
    /// button is visible, and after the first accepted press.
    pub fn continue_past_notice(&mut self) -> Result<Vec<StepEffect>> {
        let now = self.clock.now();
        let Stage::Notice(notice) = &mut self.stage else {
            return Ok(Vec::new());
        };
        if !notice.press_continue(now) {
            return Ok(Vec::new());
        }

        let (mut step, mounted) =
            mount_entry(&self.definition, &self.client, self.provider.as_mut(), now)?;
        let mut effects = vec![step.route_here()];
        effects.extend(mounted);
        info!(client = %self.client, route = %step.route(), "continued past the in-app browser notice");
        self.stage = Stage::Step(step);
        Ok(effects)
    }

    /// Deliver an event to the current step. When the step navigates to a
    /// route of this funnel, the step is unmounted and the target mounted;
    /// its mount effects are appended. Events reaching the notice are
    /// ignored.
    pub fn dispatch(&mut self, event: StepEvent) -> Result<Vec<StepEffect>> {
        let now = self.clock.now();
        let Stage::Step(current) = &mut self.stage else {
            debug!(?event, "ignoring event while the notice shows");
            return Ok(Vec::new());
        };
        let mut effects = current.handle(event, now);

        let target = effects.iter().find_map(|effect| match effect {
            StepEffect::Navigated(route) => Some(route.clone()),
            _ => None,
        });
        if let Some(route) = target {
            match self.definition.step(&route) {
                Some(definition) => {
                    let mut next = FunnelStep::new(
                        definition,
                        *self.definition.settings(),
                        self.client.clone(),
                        self.provider.ports(&route),
                    )?;
                    current.unmount();
                    effects.extend(next.mount(now));
                    self.stage = Stage::Step(next);
                    info!(client = %self.client, %route, "moved to next step");
                }
                None => debug!(%route, "navigation leaves the funnel"),
            }
        }
        Ok(effects)
    }
}

fn mount_entry(
    definition: &FunnelDefinition,
    client: &ClientId,
    provider: &mut dyn PortsProvider,
    now: EpochMillis,
) -> Result<(FunnelStep, Vec<StepEffect>)> {
    let entry = definition.entry();
    let mut step = FunnelStep::new(
        entry,
        *definition.settings(),
        client.clone(),
        provider.ports(&entry.route),
    )?;
    let effects = step.mount(now);
    Ok((step, effects))
}
