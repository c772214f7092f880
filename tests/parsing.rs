mod common;

use common::read_fixture;
use matchup_terminal::api::{
    parse_last_match_json, parse_prediction_json, parse_recent_matches_json,
    parse_team_stats_json, parse_teams_json,
};

#[test]
fn parses_teams_fixture() {
    let teams = parse_teams_json(&read_fixture("teams.json")).expect("fixture should parse");
    assert_eq!(teams, vec!["A", "B", "C"]);
}

#[test]
fn parses_team_stats_fixture() {
    let stats =
        parse_team_stats_json(&read_fixture("team_stats_b.json")).expect("fixture should parse");
    assert_eq!(stats.team, "B");
    assert_eq!(stats.games_played, 10);
    assert_eq!(stats.win_rate, 0.5);
    assert_eq!(stats.avg_score, 12.3);
    assert_eq!(stats.win_rate_text(), "50.0%");
    assert_eq!(stats.avg_score_text(), "12.3");
}

#[test]
fn recent_matches_keep_service_order() {
    let matches = parse_recent_matches_json(&read_fixture("recent_matches_b.json"))
        .expect("fixture should parse");
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].opponent, "C");
    assert_eq!(matches[0].winner(), "B");
    assert_eq!(matches[1].opponent, "A");
    assert_eq!(matches[1].winner(), "A");
}

#[test]
fn parses_prediction_with_partial_stats() {
    let result =
        parse_prediction_json(&read_fixture("predict_a_b.json")).expect("fixture should parse");
    assert_eq!(result.predicted_winner, "A");
    assert_eq!(result.confidence, 0.65);
    assert_eq!(result.team1_stats.as_ref().map(|s| s.games_played), Some(12));
    assert!(result.team2_stats.is_none());
    assert_eq!(result.display().label(), "High");
}

#[test]
fn parses_last_match_fixture() {
    let last =
        parse_last_match_json(&read_fixture("last_match_a_b.json")).expect("fixture should parse");
    assert_eq!(last.team1, "A");
    assert_eq!(last.team2, "B");
    assert_eq!(last.winner, "B");
}
