use gatecast_config::FunnelConfig;
use gatecast_core::funnel::{FunnelDefinition, StepEffect};
use gatecast_core::storage::MemoryStore;
use gatecast_model::{ClientId, Route};
use gatecastctl::{
    BlockStoreLocation, SimulateOptions, SimulationOutcome, run_simulation,
};
use std::time::Duration;

fn client() -> ClientId {
    ClientId::new("192.168.1.23").unwrap()
}

fn options(activate_after: Option<Duration>) -> SimulateOptions {
    SimulateOptions {
        client: Some(client()),
        activate_after,
        speed: 50.0,
        ..SimulateOptions::default()
    }
}

fn second_step_only() -> FunnelDefinition {
    let default = FunnelConfig::default();
    FunnelConfig {
        steps: vec![default.steps[1].clone()],
        ..default
    }
    .to_definition()
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn prompt_visitor_reaches_the_questionnaire() {
    let report = run_simulation(
        &FunnelDefinition::default(),
        BlockStoreLocation::Memory(MemoryStore::new()),
        &options(Some(Duration::from_secs(1))),
    )
    .await
    .unwrap();

    match &report.outcome {
        SimulationOutcome::Completed { route, link: Some(link) } => {
            assert_eq!(route, &Route::SecondVideo);
            assert_eq!(link.as_str(), "https://esempio-questionario.com/");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(
        report
            .effects
            .contains(&StepEffect::Navigated(Route::SecondVideo))
    );
    let reveals = report
        .effects
        .iter()
        .filter(|effect| **effect == StepEffect::CallToActionRevealed)
        .count();
    assert_eq!(reveals, 2);
    // 30s stand-in for the landing embed plus the 3s second video
    assert!(report.elapsed >= Duration::from_secs(33), "{:?}", report.elapsed);
}

#[tokio::test(start_paused = true)]
async fn idle_visitor_stalls_on_the_landing_page() {
    let report = run_simulation(
        &FunnelDefinition::default(),
        BlockStoreLocation::Memory(MemoryStore::new()),
        &options(None),
    )
    .await
    .unwrap();

    assert_eq!(
        report.outcome,
        SimulationOutcome::Stalled {
            route: Route::Landing
        }
    );
}

#[tokio::test(start_paused = true)]
async fn idle_visitor_lets_the_window_expire_and_stays_blocked() {
    let store = MemoryStore::new();

    let first = run_simulation(
        &second_step_only(),
        BlockStoreLocation::Memory(store.clone()),
        &options(None),
    )
    .await
    .unwrap();
    let SimulationOutcome::Expired {
        route,
        blocked_until: Some(until),
    } = first.outcome
    else {
        panic!("unexpected outcome {:?}", first.outcome);
    };
    assert_eq!(route, Route::SecondVideo);
    assert_eq!(store.len(), 1);
    // 3s of video, then the two-minute window
    assert!(first.elapsed >= Duration::from_secs(123));

    let second = run_simulation(
        &second_step_only(),
        BlockStoreLocation::Memory(store.clone()),
        &options(Some(Duration::ZERO)),
    )
    .await
    .unwrap();
    assert_eq!(
        second.outcome,
        SimulationOutcome::Blocked {
            route: Route::SecondVideo,
            until
        }
    );
}

#[tokio::test(start_paused = true)]
async fn in_app_visitor_continues_past_the_notice_first() {
    let report = run_simulation(
        &FunnelDefinition::default(),
        BlockStoreLocation::Memory(MemoryStore::new()),
        &SimulateOptions {
            in_app_browser: true,
            ..options(Some(Duration::from_secs(1)))
        },
    )
    .await
    .unwrap();

    assert!(matches!(
        report.outcome,
        SimulationOutcome::Completed { route: Route::SecondVideo, link: Some(_) }
    ));
    assert_eq!(report.effects[0], StepEffect::InAppNoticeShown);
    assert_eq!(report.effects[1], StepEffect::Navigated(Route::Landing));
    // one second on the notice, then the same run as a regular visitor
    assert!(report.elapsed >= Duration::from_secs(34), "{:?}", report.elapsed);
}

#[tokio::test(start_paused = true)]
async fn idle_in_app_visitor_stays_on_the_notice() {
    let report = run_simulation(
        &FunnelDefinition::default(),
        BlockStoreLocation::Memory(MemoryStore::new()),
        &SimulateOptions {
            in_app_browser: true,
            ..options(None)
        },
    )
    .await
    .unwrap();

    assert_eq!(
        report.outcome,
        SimulationOutcome::Stalled {
            route: Route::Landing
        }
    );
    assert_eq!(report.effects, vec![StepEffect::InAppNoticeShown]);
}

#[tokio::test]
async fn rejects_a_non_positive_speed() {
    let err = run_simulation(
        &FunnelDefinition::default(),
        BlockStoreLocation::Memory(MemoryStore::new()),
        &SimulateOptions {
            speed: 0.0,
            ..SimulateOptions::default()
        },
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("speed"));
}
