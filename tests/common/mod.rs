#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};

use matchup_terminal::api::StatsApi;
use matchup_terminal::state::{LastMatch, PredictionResult, RecentMatch, TeamStats};

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub fn stats(team: &str, games_played: u32, win_rate: f64, avg_score: f64) -> TeamStats {
    TeamStats {
        team: team.to_string(),
        games_played,
        win_rate,
        avg_score,
    }
}

pub fn recent(team: &str, opponent: &str, won: bool) -> RecentMatch {
    RecentMatch {
        opponent: opponent.to_string(),
        team: team.to_string(),
        won,
    }
}

/// Canned service. A missing entry answers like a failing endpoint.
#[derive(Default)]
pub struct ScriptedApi {
    pub teams: Option<Vec<String>>,
    pub stats: HashMap<String, TeamStats>,
    pub matches: HashMap<String, Vec<RecentMatch>>,
    pub predictions: HashMap<(String, String), PredictionResult>,
    pub last_matches: HashMap<(String, String), LastMatch>,
    /// Extra latency before answering a team's stats request.
    pub stats_delays: HashMap<String, Duration>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn with_roster(teams: &[&str]) -> Self {
        Self {
            teams: Some(teams.iter().map(|t| t.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn with_stats(mut self, stats: TeamStats, matches: Vec<RecentMatch>) -> Self {
        self.matches.insert(stats.team.clone(), matches);
        self.stats.insert(stats.team.clone(), stats);
        self
    }

    pub fn with_prediction(mut self, team1: &str, team2: &str, winner: &str, confidence: f64) -> Self {
        self.predictions.insert(
            (team1.to_string(), team2.to_string()),
            PredictionResult {
                predicted_winner: winner.to_string(),
                confidence,
                team1_stats: self.stats.get(team1).cloned(),
                team2_stats: self.stats.get(team2).cloned(),
            },
        );
        self
    }

    pub fn with_last_match(mut self, team1: &str, team2: &str, winner: &str) -> Self {
        self.last_matches.insert(
            (team1.to_string(), team2.to_string()),
            LastMatch {
                team1: team1.to_string(),
                team2: team2.to_string(),
                winner: winner.to_string(),
            },
        );
        self
    }

    pub fn with_stats_delay(mut self, team: &str, delay: Duration) -> Self {
        self.stats_delays.insert(team.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

fn pair(team1: &str, team2: &str) -> (String, String) {
    (team1.to_string(), team2.to_string())
}

impl StatsApi for ScriptedApi {
    fn teams(&self) -> Result<Vec<String>> {
        self.record("GET /teams".to_string());
        self.teams
            .clone()
            .ok_or_else(|| anyhow!("http 503 Service Unavailable"))
    }

    fn team_stats(&self, team: &str) -> Result<TeamStats> {
        self.record(format!("GET /team_stats/{team}"));
        if let Some(delay) = self.stats_delays.get(team) {
            thread::sleep(*delay);
        }
        self.stats
            .get(team)
            .cloned()
            .ok_or_else(|| anyhow!("http 404 Not Found"))
    }

    fn recent_matches(&self, team: &str) -> Result<Vec<RecentMatch>> {
        self.record(format!("GET /recent_matches/{team}"));
        self.matches
            .get(team)
            .cloned()
            .ok_or_else(|| anyhow!("http 500 Internal Server Error"))
    }

    fn predict(&self, team1: &str, team2: &str) -> Result<PredictionResult> {
        self.record(format!("POST /predict {team1} {team2}"));
        self.predictions
            .get(&pair(team1, team2))
            .cloned()
            .ok_or_else(|| anyhow!("connection refused"))
    }

    fn last_match(&self, team1: &str, team2: &str) -> Result<LastMatch> {
        self.record(format!("GET /last_match/{team1}/{team2}"));
        self.last_matches
            .get(&pair(team1, team2))
            .cloned()
            .ok_or_else(|| anyhow!("http 404 Not Found"))
    }
}
