#![allow(dead_code)]

use gatecast_core::prelude::*;
use gatecast_core::testing::FakePorts;
use std::time::Duration;
use url::Url;

pub const T0: EpochMillis = EpochMillis(1_700_000_000_000);

pub fn at(offset: Duration) -> EpochMillis {
    T0.saturating_add(offset)
}

pub fn secs(secs: u64) -> Duration {
    Duration::from_secs(secs)
}

pub fn client() -> ClientId {
    ClientId::new("192.168.1.77").unwrap()
}

pub fn manual_start() -> StepSettings {
    StepSettings {
        autoplay: false,
        ..StepSettings::default()
    }
}

pub fn native_video() -> BackendSpec {
    BackendSpec::NativeElement {
        src: Url::parse("https://cdn.example.com/intro.mp4").unwrap(),
        duration_hint: None,
    }
}

pub fn native_video_lasting(duration: Duration) -> BackendSpec {
    BackendSpec::NativeElement {
        src: Url::parse("https://cdn.example.com/intro.mp4").unwrap(),
        duration_hint: Some(duration),
    }
}

pub fn questionnaire_gate(window: Duration, opens: WindowOpens) -> GateConfig {
    GateConfig {
        next: Some(NextAction::OpenLink(
            Url::parse("https://esempio-questionario.com/").unwrap(),
        )),
        popup: PopupTrigger::OnReveal,
        access: Some(AccessPolicy {
            window,
            block_for: Duration::from_secs(600),
            opens,
        }),
    }
}

pub fn navigate_gate() -> GateConfig {
    GateConfig {
        next: Some(NextAction::Navigate(Route::SecondVideo)),
        popup: PopupTrigger::Never,
        access: None,
    }
}

pub fn step(
    backend: BackendSpec,
    gate: GateConfig,
    settings: StepSettings,
    ports: &FakePorts,
) -> FunnelStep {
    let definition = StepDefinition {
        route: Route::Landing,
        backend,
        gate,
    };
    FunnelStep::new(&definition, settings, client(), ports.step_ports()).unwrap()
}

pub fn count(effects: &[StepEffect], wanted: &StepEffect) -> usize {
    effects.iter().filter(|effect| *effect == wanted).count()
}
