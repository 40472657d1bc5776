//! Headless funnel runs.
//!
//! Every backend is swapped for its simulated stand-in and time advances in
//! fixed ticks of simulated time. `speed` only changes how much wall time a
//! tick takes, so a run at `speed = 100` produces the same effects as one
//! at `speed = 1`.

use anyhow::{Result, bail};
use gatecast_contracts::clock::{Clock, SystemClock};
use gatecast_core::funnel::{
    Funnel, FunnelDefinition, FunnelView, StepEffect, StepEvent, UserAction,
    simulated_client_id,
};
use gatecast_model::{ClientId, EpochMillis, PlaybackStatus, Route};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use url::Url;

use crate::ports::{BlockStoreLocation, HeadlessPorts};

pub const DEFAULT_TICK: Duration = Duration::from_millis(250);
/// Length given to steps whose backend does not know its duration.
pub const DEFAULT_FALLBACK: Duration = Duration::from_secs(30);
pub const DEFAULT_LIMIT: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
pub struct SimulateOptions {
    /// Visitor identity; a simulated LAN address when absent.
    pub client: Option<ClientId>,
    /// Delay between a call-to-action appearing and the visitor pressing
    /// it. `None` means the visitor never does.
    pub activate_after: Option<Duration>,
    pub speed: f64,
    pub tick: Duration,
    pub fallback: Duration,
    /// Simulated time after which the run gives up.
    pub limit: Duration,
    /// Open the funnel as an in-app browser would, behind its notice.
    pub in_app_browser: bool,
}

impl Default for SimulateOptions {
    fn default() -> Self {
        Self {
            client: None,
            activate_after: None,
            speed: 1.0,
            tick: DEFAULT_TICK,
            fallback: DEFAULT_FALLBACK,
            limit: DEFAULT_LIMIT,
            in_app_browser: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationOutcome {
    /// The last gate completed: a link opened, the funnel navigated away,
    /// or the step had nothing further to do.
    Completed { route: Route, link: Option<Url> },
    Expired {
        route: Route,
        blocked_until: Option<EpochMillis>,
    },
    /// A block from an earlier run was still active when the step mounted.
    Blocked { route: Route, until: EpochMillis },
    /// Nothing will happen without a visitor action that never comes.
    Stalled { route: Route },
    TimedOut { route: Route },
}

impl std::fmt::Display for SimulationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationOutcome::Completed { route, link: Some(link) } => {
                write!(f, "completed on {route}, opened {link}")
            }
            SimulationOutcome::Completed { route, link: None } => {
                write!(f, "completed on {route}")
            }
            SimulationOutcome::Expired {
                route,
                blocked_until: Some(until),
            } => write!(f, "access window expired on {route}, blocked until {until}"),
            SimulationOutcome::Expired {
                route,
                blocked_until: None,
            } => write!(f, "access window expired on {route}"),
            SimulationOutcome::Blocked { route, until } => {
                write!(f, "blocked on {route} until {until}")
            }
            SimulationOutcome::Stalled { route } => {
                write!(f, "stalled on {route} waiting for the visitor")
            }
            SimulationOutcome::TimedOut { route } => {
                write!(f, "gave up on {route} after the time limit")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub client: ClientId,
    pub outcome: SimulationOutcome,
    /// Simulated time the run covered.
    pub elapsed: Duration,
    pub effects: Vec<StepEffect>,
}

/// Clock the simulation advances by hand, one tick at a time.
#[derive(Debug, Clone)]
pub struct SimulatedClock(Rc<Cell<EpochMillis>>);

impl SimulatedClock {
    pub fn starting_at(now: EpochMillis) -> Self {
        Self(Rc::new(Cell::new(now)))
    }

    pub fn advance(&self, by: Duration) -> EpochMillis {
        let next = self.0.get().saturating_add(by);
        self.0.set(next);
        next
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> EpochMillis {
        self.0.get()
    }
}

/// Visitor behaviour: press continue on the in-app browser notice, then
/// the call-to-action (or confirm its popup), once either has been visible
/// for long enough.
#[derive(Debug, Default)]
struct Visitor {
    revealed_at: Option<EpochMillis>,
    acted_at: Option<EpochMillis>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum VisitorMove {
    Continue,
    Act(UserAction),
}

impl Visitor {
    fn observe(&mut self, effects: &[StepEffect], now: EpochMillis) {
        for effect in effects {
            match effect {
                StepEffect::CallToActionRevealed => self.revealed_at = Some(now),
                StepEffect::Navigated(_) => self.revealed_at = None,
                _ => {}
            }
        }
    }

    fn next_move(
        &self,
        funnel: &Funnel,
        activate_after: Option<Duration>,
        now: EpochMillis,
    ) -> Option<VisitorMove> {
        let delay = activate_after?;
        // at most one action per instant
        if self.acted_at == Some(now) {
            return None;
        }

        match funnel.view() {
            FunnelView::Notice(view) => {
                let shown_at = funnel.notice()?.shown_at();
                (view.continue_visible && now >= shown_at.saturating_add(delay))
                    .then_some(VisitorMove::Continue)
            }
            FunnelView::Step(view) => {
                let revealed_at = self.revealed_at?;
                if now < revealed_at.saturating_add(delay) {
                    None
                } else if view.popup_visible {
                    Some(VisitorMove::Act(UserAction::ConfirmPopup))
                } else if view.cta_visible {
                    Some(VisitorMove::Act(UserAction::ActivateCallToAction))
                } else {
                    None
                }
            }
        }
    }

    fn will_act(&self, funnel: &Funnel, activate_after: Option<Duration>) -> bool {
        activate_after.is_some()
            && (self.revealed_at.is_some() || funnel.notice().is_some())
    }
}

fn outcome_of(
    effects: &[StepEffect],
    funnel: &Funnel,
) -> Option<SimulationOutcome> {
    let route = funnel.route().clone();

    if let Some(until) = effects.iter().find_map(|effect| match effect {
        StepEffect::AccessBlocked { until } => Some(*until),
        _ => None,
    }) {
        return Some(SimulationOutcome::Blocked { route, until });
    }

    for effect in effects {
        match effect {
            StepEffect::LinkOpened(url) => {
                return Some(SimulationOutcome::Completed {
                    route,
                    link: Some(url.clone()),
                });
            }
            StepEffect::AccessExpired { blocked_until } => {
                return Some(SimulationOutcome::Expired {
                    route,
                    blocked_until: *blocked_until,
                });
            }
            _ => {}
        }
    }

    let completed = effects.contains(&StepEffect::Completed);
    let moved_on = effects.iter().any(|effect| {
        matches!(effect, StepEffect::Navigated(target) if funnel.definition().step(target).is_some())
    });
    if completed && !moved_on {
        return Some(SimulationOutcome::Completed { route, link: None });
    }

    None
}

fn log_effects(effects: &[StepEffect], route: &Route) {
    for effect in effects {
        match effect {
            StepEffect::CallToActionRevealed
            | StepEffect::AccessWindowOpened { .. }
            | StepEffect::Completed
            | StepEffect::Navigated(_)
            | StepEffect::LinkOpened(_)
            | StepEffect::AccessExpired { .. }
            | StepEffect::AccessBlocked { .. } => {
                info!(%route, ?effect, "gate");
            }
            StepEffect::ErrorShown { message } => {
                warn!(%route, %message, "playback error shown");
            }
            other => debug!(%route, effect = ?other, "step"),
        }
    }
}

/// Run `definition` with simulated backends until it completes, expires,
/// stalls or hits the time limit.
pub async fn run_simulation(
    definition: &FunnelDefinition,
    store: BlockStoreLocation,
    options: &SimulateOptions,
) -> Result<SimulationReport> {
    if !options.speed.is_finite() || options.speed <= 0.0 {
        bail!("speed must be a positive number, got {}", options.speed);
    }
    if options.tick.is_zero() {
        bail!("tick must be longer than zero");
    }

    let client = match &options.client {
        Some(client) => client.clone(),
        None => simulated_client_id()?,
    };
    let clock = SimulatedClock::starting_at(SystemClock.now());
    let started = clock.now();

    let (mut funnel, mut effects) = Funnel::enter(
        definition.simulated(options.fallback),
        client.clone(),
        options.in_app_browser,
        Box::new(HeadlessPorts::new(store)),
        Box::new(clock.clone()),
    )?;
    info!(%client, speed = options.speed, in_app_browser = options.in_app_browser, "simulation started");

    let mut visitor = Visitor::default();
    let mut seen = Vec::new();
    let mut now = started;

    let period = Duration::from_secs_f64(options.tick.as_secs_f64() / options.speed);
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let outcome = loop {
        let route = funnel.route().clone();
        log_effects(&effects, &route);
        visitor.observe(&effects, now);
        let finished = outcome_of(&effects, &funnel);
        seen.append(&mut effects);
        if let Some(outcome) = finished {
            break outcome;
        }

        if let Some(next) =
            visitor.next_move(&funnel, options.activate_after, now)
        {
            debug!(%route, ?next, "visitor acts");
            visitor.acted_at = Some(now);
            effects = match next {
                VisitorMove::Continue => funnel.continue_past_notice()?,
                VisitorMove::Act(action) => funnel.dispatch(StepEvent::User(action))?,
            };
            continue;
        }

        let playing = funnel
            .current()
            .is_some_and(|step| step.session().status() == PlaybackStatus::Playing);
        if !playing
            && funnel.next_wake().is_none()
            && !visitor.will_act(&funnel, options.activate_after)
        {
            break SimulationOutcome::Stalled { route };
        }

        if started.until(now) >= options.limit {
            break SimulationOutcome::TimedOut { route };
        }

        interval.tick().await;
        now = clock.advance(options.tick);
        effects = funnel.dispatch(StepEvent::Tick)?;
    };

    let elapsed = started.until(now);
    info!(%client, %outcome, elapsed = %humantime::format_duration(elapsed), "simulation finished");

    Ok(SimulationReport {
        client,
        outcome,
        elapsed,
        effects: seen,
    })
}
