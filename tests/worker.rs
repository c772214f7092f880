mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ScriptedApi, recent, stats};
use matchup_terminal::demo_api::DemoStatsApi;
use matchup_terminal::session::SessionOrchestrator;
use matchup_terminal::state::Slot;

const SETTLE: Duration = Duration::from_secs(5);

#[test]
fn worker_session_settles_after_roster_and_stats() {
    let api = Arc::new(
        ScriptedApi::with_roster(&["A", "B", "C"])
            .with_stats(stats("B", 10, 0.5, 12.3), vec![recent("B", "C", true)]),
    );
    let mut session = SessionOrchestrator::with_worker(api);

    session.load_team_roster();
    assert!(session.wait_idle(SETTLE));
    assert_eq!(session.state.roster, vec!["A", "B", "C"]);

    session.select_team_and_fetch_stats("B");
    assert!(session.wait_idle(SETTLE));
    assert_eq!(session.state.team_stats, Slot::Present(stats("B", 10, 0.5, 12.3)));
    assert!(session.state.error.is_none());
}

#[test]
fn overlapping_predictions_both_reach_history() {
    let api = Arc::new(
        ScriptedApi::with_roster(&["A", "B", "C"])
            .with_prediction("A", "B", "A", 0.65)
            .with_prediction("A", "C", "C", 0.58),
    );
    let mut session = SessionOrchestrator::with_worker(api);

    session.predict(Some("A"), Some("B"));
    session.predict(Some("A"), Some("C"));
    assert_eq!(session.state.in_flight.len(), 2);
    assert!(session.wait_idle(SETTLE));

    let mut winners: Vec<&str> = session
        .state
        .history
        .iter()
        .map(|e| e.winner.as_str())
        .collect();
    winners.sort();
    assert_eq!(winners, vec!["A", "C"]);
    assert!(session.state.result.is_present());
    assert!(session.state.error.is_none());
}

#[test]
fn demo_source_runs_a_full_attempt() {
    let mut session = SessionOrchestrator::with_worker(Arc::new(DemoStatsApi::new()));

    session.load_team_roster();
    assert!(session.wait_idle(SETTLE));
    assert!(session.state.roster.len() >= 2);

    session.predict(Some("Spirit"), Some("Vitality"));
    assert!(session.wait_idle(SETTLE));
    let state = &session.state;
    assert_eq!(state.history.len(), 1);
    assert_eq!(
        state.last_match.present().map(|m| m.winner.as_str()),
        Some("Spirit")
    );
    let shown = state.history[0].display().percent;
    assert!((55.0..=80.0).contains(&shown));
}

#[test]
fn overlapping_stats_loads_settle_only_after_both_land() {
    let api = Arc::new(
        ScriptedApi::with_roster(&["A", "B"])
            .with_stats(stats("B", 10, 0.5, 12.3), vec![recent("B", "A", true)])
            .with_stats(stats("A", 12, 0.58, 13.1), vec![recent("A", "B", false)])
            .with_stats_delay("B", Duration::from_millis(300)),
    );
    let mut session = SessionOrchestrator::with_worker(api.clone());

    session.select_team_and_fetch_stats("B");
    session.select_team_and_fetch_stats("A");
    assert_eq!(session.state.stats_pending, 2);
    assert!(session.wait_idle(SETTLE));

    assert_eq!(session.state.stats_pending, 0);
    assert!(api.calls().contains(&"GET /recent_matches/B".to_string()));
    assert_eq!(session.state.team_stats, Slot::Present(stats("B", 10, 0.5, 12.3)));
    assert_eq!(session.state.recent_matches, vec![recent("B", "A", true)]);
}
