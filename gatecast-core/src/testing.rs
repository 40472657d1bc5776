//! In-memory fakes of every host port.
//!
//! Each fake is a cheap handle over shared state: clone it, box one clone
//! into the engine and keep the other to drive and inspect it.

use gatecast_contracts::adapter::BackendFailure;
use gatecast_contracts::clock::Clock;
use gatecast_contracts::element::{ElementError, MediaElement, MediaEventKind};
use gatecast_contracts::embed::{EmbedChannel, EmbedError};
use gatecast_contracts::fullscreen::{
    FullscreenPort, FullscreenVariant, ListenerId, OrientationPort, PortError,
};
use gatecast_contracts::host::MediaHost;
use gatecast_contracts::navigation::Navigator;
use gatecast_model::{EpochMillis, Route};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;
use url::Url;

use crate::funnel::{PortsProvider, StepPorts};
use crate::storage::MemoryStore;

#[derive(Debug)]
struct ElementState {
    paused: bool,
    volume: f64,
    muted: bool,
    duration: f64,
    current_time: f64,
    error: Option<(u16, String)>,
    play_rejection: Option<ElementError>,
    listeners: BTreeSet<&'static str>,
    play_calls: usize,
    load_calls: usize,
}

/// A `<video>` element that plays whenever asked unless told to refuse.
#[derive(Debug, Clone)]
pub struct FakeElement(Rc<RefCell<ElementState>>);

impl Default for FakeElement {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeElement {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(ElementState {
            paused: true,
            volume: 1.0,
            muted: false,
            duration: f64::NAN,
            current_time: 0.0,
            error: None,
            play_rejection: None,
            listeners: BTreeSet::new(),
            play_calls: 0,
            load_calls: 0,
        })))
    }

    pub fn reject_play(&self, error: ElementError) {
        self.0.borrow_mut().play_rejection = Some(error);
    }

    pub fn allow_play(&self) {
        self.0.borrow_mut().play_rejection = None;
    }

    pub fn set_duration(&self, duration: f64) {
        self.0.borrow_mut().duration = duration;
    }

    pub fn set_current_time(&self, time: f64) {
        self.0.borrow_mut().current_time = time;
    }

    pub fn set_error(&self, code: u16, message: &str) {
        self.0.borrow_mut().error = Some((code, message.to_string()));
    }

    pub fn set_user_volume(&self, volume: f64, muted: bool) {
        let mut state = self.0.borrow_mut();
        state.volume = volume;
        state.muted = muted;
    }

    pub fn listener_count(&self) -> usize {
        self.0.borrow().listeners.len()
    }

    pub fn play_calls(&self) -> usize {
        self.0.borrow().play_calls
    }

    pub fn load_calls(&self) -> usize {
        self.0.borrow().load_calls
    }

    pub fn is_paused(&self) -> bool {
        self.0.borrow().paused
    }

    pub fn volume_and_muted(&self) -> (f64, bool) {
        let state = self.0.borrow();
        (state.volume, state.muted)
    }
}

impl MediaElement for FakeElement {
    fn play(&mut self) -> Result<(), ElementError> {
        let mut state = self.0.borrow_mut();
        state.play_calls += 1;
        if let Some(error) = state.play_rejection.clone() {
            return Err(error);
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.0.borrow_mut().paused = true;
    }

    fn paused(&self) -> bool {
        self.0.borrow().paused
    }

    fn set_volume(&mut self, volume: f64) {
        self.0.borrow_mut().volume = volume;
    }

    fn volume(&self) -> f64 {
        self.0.borrow().volume
    }

    fn set_muted(&mut self, muted: bool) {
        self.0.borrow_mut().muted = muted;
    }

    fn muted(&self) -> bool {
        self.0.borrow().muted
    }

    fn duration(&self) -> f64 {
        self.0.borrow().duration
    }

    fn current_time(&self) -> f64 {
        self.0.borrow().current_time
    }

    fn error(&self) -> Option<(u16, String)> {
        self.0.borrow().error.clone()
    }

    fn load(&mut self) {
        let mut state = self.0.borrow_mut();
        state.load_calls += 1;
        state.current_time = 0.0;
        state.error = None;
    }

    fn add_listener(&mut self, kind: MediaEventKind) {
        self.0.borrow_mut().listeners.insert(kind.dom_name());
    }

    fn remove_listener(&mut self, kind: MediaEventKind) {
        self.0.borrow_mut().listeners.remove(kind.dom_name());
    }
}

#[derive(Debug)]
struct EmbedState {
    volume: f64,
    duration: Result<f64, EmbedError>,
    play_rejection: Option<EmbedError>,
    subscriptions: Vec<String>,
    play_calls: usize,
    pause_calls: usize,
    unload_calls: usize,
}

/// An iframe player whose scripting API answers synchronously.
#[derive(Debug, Clone)]
pub struct FakeEmbed(Rc<RefCell<EmbedState>>);

impl Default for FakeEmbed {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeEmbed {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(EmbedState {
            volume: 1.0,
            duration: Ok(0.0),
            play_rejection: None,
            subscriptions: Vec::new(),
            play_calls: 0,
            pause_calls: 0,
            unload_calls: 0,
        })))
    }

    pub fn set_duration(&self, duration: f64) {
        self.0.borrow_mut().duration = Ok(duration);
    }

    pub fn fail_get_duration(&self) {
        self.0.borrow_mut().duration =
            Err(EmbedError::Unavailable("player not ready".to_string()));
    }

    pub fn reject_play(&self, error: EmbedError) {
        self.0.borrow_mut().play_rejection = Some(error);
    }

    pub fn allow_play(&self) {
        self.0.borrow_mut().play_rejection = None;
    }

    pub fn subscriptions(&self) -> Vec<String> {
        self.0.borrow().subscriptions.clone()
    }

    pub fn volume(&self) -> f64 {
        self.0.borrow().volume
    }

    pub fn play_calls(&self) -> usize {
        self.0.borrow().play_calls
    }

    pub fn pause_calls(&self) -> usize {
        self.0.borrow().pause_calls
    }

    pub fn unload_calls(&self) -> usize {
        self.0.borrow().unload_calls
    }
}

impl EmbedChannel for FakeEmbed {
    fn play(&mut self) -> Result<(), EmbedError> {
        let mut state = self.0.borrow_mut();
        state.play_calls += 1;
        match state.play_rejection.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn pause(&mut self) -> Result<(), EmbedError> {
        self.0.borrow_mut().pause_calls += 1;
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) -> Result<(), EmbedError> {
        self.0.borrow_mut().volume = volume;
        Ok(())
    }

    fn get_duration(&mut self) -> Result<f64, EmbedError> {
        self.0.borrow().duration.clone()
    }

    fn on(&mut self, event: &str) -> Result<(), EmbedError> {
        self.0.borrow_mut().subscriptions.push(event.to_string());
        Ok(())
    }

    fn off(&mut self, event: &str) {
        self.0
            .borrow_mut()
            .subscriptions
            .retain(|subscribed| subscribed != event);
    }

    fn unload(&mut self) -> Result<(), EmbedError> {
        self.0.borrow_mut().unload_calls += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct FullscreenState {
    supported: Vec<FullscreenVariant>,
    requests: Vec<FullscreenVariant>,
    exits: Vec<FullscreenVariant>,
    subscribers: BTreeSet<u64>,
    next_id: u64,
}

/// Fullscreen API that accepts only the given vendor variants.
#[derive(Debug, Clone, Default)]
pub struct RecordingFullscreen(Rc<RefCell<FullscreenState>>);

impl RecordingFullscreen {
    pub fn supporting(variants: &[FullscreenVariant]) -> Self {
        Self(Rc::new(RefCell::new(FullscreenState {
            supported: variants.to_vec(),
            ..FullscreenState::default()
        })))
    }

    pub fn requests(&self) -> Vec<FullscreenVariant> {
        self.0.borrow().requests.clone()
    }

    pub fn exits(&self) -> Vec<FullscreenVariant> {
        self.0.borrow().exits.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.borrow().subscribers.len()
    }

    fn answer(&self, variant: FullscreenVariant) -> Result<(), PortError> {
        if self.0.borrow().supported.contains(&variant) {
            Ok(())
        } else {
            Err(PortError::Unsupported(format!("{variant:?} fullscreen")))
        }
    }
}

impl FullscreenPort for RecordingFullscreen {
    fn request(&mut self, variant: FullscreenVariant) -> Result<(), PortError> {
        self.0.borrow_mut().requests.push(variant);
        self.answer(variant)
    }

    fn exit(&mut self, variant: FullscreenVariant) -> Result<(), PortError> {
        self.0.borrow_mut().exits.push(variant);
        self.answer(variant)
    }

    fn subscribe(&mut self) -> ListenerId {
        let mut state = self.0.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        state.subscribers.insert(id);
        ListenerId(id)
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.0.borrow_mut().subscribers.remove(&id.0);
    }
}

#[derive(Debug)]
struct OrientationState {
    supported: bool,
    locked: bool,
    lock_calls: usize,
}

#[derive(Debug, Clone)]
pub struct RecordingOrientation(Rc<RefCell<OrientationState>>);

impl Default for RecordingOrientation {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingOrientation {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(OrientationState {
            supported: true,
            locked: false,
            lock_calls: 0,
        })))
    }

    /// Desktop browsers reject orientation locks outright.
    pub fn unsupported() -> Self {
        let orientation = Self::new();
        orientation.0.borrow_mut().supported = false;
        orientation
    }

    pub fn is_locked(&self) -> bool {
        self.0.borrow().locked
    }

    pub fn lock_calls(&self) -> usize {
        self.0.borrow().lock_calls
    }
}

impl OrientationPort for RecordingOrientation {
    fn lock_landscape(&mut self) -> Result<(), PortError> {
        let mut state = self.0.borrow_mut();
        state.lock_calls += 1;
        if !state.supported {
            return Err(PortError::Unsupported("screen.orientation.lock".into()));
        }
        state.locked = true;
        Ok(())
    }

    fn unlock(&mut self) -> Result<(), PortError> {
        self.0.borrow_mut().locked = false;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct NavigatorState {
    routes: Vec<Route>,
    links: Vec<Url>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator(Rc<RefCell<NavigatorState>>);

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.0.borrow().routes.clone()
    }

    pub fn links(&self) -> Vec<Url> {
        self.0.borrow().links.clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, route: &Route) {
        self.0.borrow_mut().routes.push(route.clone());
    }

    fn open_link(&mut self, url: &Url) {
        self.0.borrow_mut().links.push(url.clone());
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<i64>>);

impl ManualClock {
    pub fn starting_at(millis: i64) -> Self {
        Self(Rc::new(Cell::new(millis)))
    }

    pub fn set(&self, now: EpochMillis) {
        self.0.set(now.0);
    }

    pub fn advance(&self, by: Duration) -> EpochMillis {
        let next = EpochMillis(self.0.get()).saturating_add(by);
        self.0.set(next.0);
        next
    }
}

impl Clock for ManualClock {
    fn now(&self) -> EpochMillis {
        EpochMillis(self.0.get())
    }
}

/// Media host handing out clones of one fake element and one fake embed.
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    pub element: FakeElement,
    pub embed: FakeEmbed,
    refuse: Rc<Cell<bool>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `create_*` call fail.
    pub fn refuse(&self) {
        self.refuse.set(true);
    }
}

impl MediaHost for FakeHost {
    fn create_element(
        &mut self,
        src: &Url,
    ) -> Result<Box<dyn MediaElement>, BackendFailure> {
        if self.refuse.get() {
            return Err(BackendFailure::Network(format!("cannot load {src}")));
        }
        Ok(Box::new(self.element.clone()))
    }

    fn create_embed(
        &mut self,
        provider: &str,
        video_id: &str,
    ) -> Result<Box<dyn EmbedChannel>, BackendFailure> {
        if self.refuse.get() {
            return Err(BackendFailure::Embed(format!(
                "{provider} player for {video_id} did not load"
            )));
        }
        Ok(Box::new(self.embed.clone()))
    }
}

/// Every fake wired together; each step gets clones of the same ports.
#[derive(Debug, Clone)]
pub struct FakePorts {
    pub fullscreen: RecordingFullscreen,
    pub orientation: Option<RecordingOrientation>,
    pub navigator: RecordingNavigator,
    pub store: MemoryStore,
    pub host: FakeHost,
}

impl Default for FakePorts {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePorts {
    pub fn new() -> Self {
        Self {
            fullscreen: RecordingFullscreen::supporting(&FullscreenVariant::ATTEMPT_ORDER),
            orientation: None,
            navigator: RecordingNavigator::new(),
            store: MemoryStore::new(),
            host: FakeHost::new(),
        }
    }

    pub fn step_ports(&self) -> StepPorts {
        StepPorts {
            fullscreen: Box::new(self.fullscreen.clone()),
            orientation: self
                .orientation
                .clone()
                .map(|orientation| Box::new(orientation) as Box<dyn OrientationPort>),
            navigator: Box::new(self.navigator.clone()),
            store: Box::new(self.store.clone()),
            media: Box::new(self.host.clone()),
        }
    }
}

impl PortsProvider for FakePorts {
    fn ports(&mut self, _route: &Route) -> StepPorts {
        self.step_ports()
    }
}
