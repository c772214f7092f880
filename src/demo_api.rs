use anyhow::{Result, anyhow};

use crate::api::StatsApi;
use crate::state::{LastMatch, PredictionResult, RecentMatch, TeamStats};

/// Offline stand-in for the stats service, selected with `STATS_SOURCE=demo`.
pub struct DemoStatsApi {
    teams: Vec<TeamStats>,
    // (winner, loser), oldest first.
    results: Vec<(String, String)>,
}

impl Default for DemoStatsApi {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoStatsApi {
    pub fn new() -> Self {
        Self {
            teams: seed_teams(),
            results: seed_results(),
        }
    }

    fn stats_for(&self, team: &str) -> Result<&TeamStats> {
        self.teams
            .iter()
            .find(|t| t.team == team)
            .ok_or_else(|| anyhow!("unknown team: {team}"))
    }
}

impl StatsApi for DemoStatsApi {
    fn teams(&self) -> Result<Vec<String>> {
        Ok(self.teams.iter().map(|t| t.team.clone()).collect())
    }

    fn team_stats(&self, team: &str) -> Result<TeamStats> {
        self.stats_for(team).cloned()
    }

    fn recent_matches(&self, team: &str) -> Result<Vec<RecentMatch>> {
        self.stats_for(team)?;
        Ok(self
            .results
            .iter()
            .rev()
            .filter(|(winner, loser)| winner == team || loser == team)
            .take(5)
            .map(|(winner, loser)| {
                let won = winner == team;
                RecentMatch {
                    opponent: if won { loser.clone() } else { winner.clone() },
                    team: team.to_string(),
                    won,
                }
            })
            .collect())
    }

    fn predict(&self, team1: &str, team2: &str) -> Result<PredictionResult> {
        let s1 = self.stats_for(team1)?;
        let s2 = self.stats_for(team2)?;
        let edge = s1.win_rate - s2.win_rate;
        let predicted_winner = if edge >= 0.0 { team1 } else { team2 };
        let confidence = (0.5 + edge.abs() * 0.6).min(0.75);
        Ok(PredictionResult {
            predicted_winner: predicted_winner.to_string(),
            confidence,
            team1_stats: Some(s1.clone()),
            team2_stats: Some(s2.clone()),
        })
    }

    fn last_match(&self, team1: &str, team2: &str) -> Result<LastMatch> {
        self.results
            .iter()
            .rev()
            .find(|(w, l)| (w == team1 && l == team2) || (w == team2 && l == team1))
            .map(|(winner, _)| LastMatch {
                team1: team1.to_string(),
                team2: team2.to_string(),
                winner: winner.clone(),
            })
            .ok_or_else(|| anyhow!("no previous match between {team1} and {team2}"))
    }
}

fn team(name: &str, games_played: u32, win_rate: f64, avg_score: f64) -> TeamStats {
    TeamStats {
        team: name.to_string(),
        games_played,
        win_rate,
        avg_score,
    }
}

fn seed_teams() -> Vec<TeamStats> {
    vec![
        team("Vitality", 48, 0.71, 14.2),
        team("Spirit", 45, 0.64, 13.8),
        team("MOUZ", 51, 0.59, 13.1),
        team("FaZe", 44, 0.52, 12.6),
        team("G2", 47, 0.55, 12.9),
        team("NAVI", 50, 0.61, 13.4),
        team("Liquid", 39, 0.46, 11.9),
        team("Heroic", 36, 0.42, 11.5),
    ]
}

fn seed_results() -> Vec<(String, String)> {
    [
        ("Vitality", "Spirit"),
        ("NAVI", "G2"),
        ("MOUZ", "FaZe"),
        ("Spirit", "NAVI"),
        ("G2", "Liquid"),
        ("Vitality", "MOUZ"),
        ("FaZe", "Heroic"),
        ("Spirit", "Vitality"),
        ("NAVI", "MOUZ"),
        ("Liquid", "Heroic"),
        ("G2", "FaZe"),
        ("Vitality", "NAVI"),
    ]
    .into_iter()
    .map(|(w, l)| (w.to_string(), l.to_string()))
    .collect()
}
