use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceDisplay;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    Compare,
}

/// A value that is either loaded, explicitly cleared, or never loaded yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Slot<T> {
    #[default]
    Unloaded,
    Cleared,
    Present(T),
}

impl<T> Slot<T> {
    pub fn present(&self) -> Option<&T> {
        match self {
            Slot::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Slot::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        !self.is_present()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub team: String,
    pub games_played: u32,
    pub win_rate: f64,
    pub avg_score: f64,
}

impl TeamStats {
    pub fn win_rate_text(&self) -> String {
        format!("{:.1}%", self.win_rate * 100.0)
    }

    pub fn avg_score_text(&self) -> String {
        format!("{:.1}", self.avg_score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentMatch {
    pub opponent: String,
    pub team: String,
    pub won: bool,
}

impl RecentMatch {
    pub fn winner(&self) -> &str {
        if self.won { &self.team } else { &self.opponent }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_winner: String,
    pub confidence: f64,
    #[serde(default)]
    pub team1_stats: Option<TeamStats>,
    #[serde(default)]
    pub team2_stats: Option<TeamStats>,
}

impl PredictionResult {
    pub fn display(&self) -> ConfidenceDisplay {
        ConfidenceDisplay::from_raw(self.confidence)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastMatch {
    pub team1: String,
    pub team2: String,
    pub winner: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub team1: String,
    pub team2: String,
    pub winner: String,
    /// Raw model confidence, not the display value.
    pub confidence: f64,
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn from_prediction(
        team1: &str,
        team2: &str,
        result: &PredictionResult,
        timestamp: String,
    ) -> Self {
        Self {
            team1: team1.to_string(),
            team2: team2.to_string(),
            winner: result.predicted_winner.clone(),
            confidence: result.confidence,
            timestamp,
        }
    }

    pub fn display(&self) -> ConfidenceDisplay {
        ConfidenceDisplay::from_raw(self.confidence)
    }

    pub fn line(&self) -> String {
        let display = self.display();
        format!(
            "{}: {} vs {} → {} ({}, {})",
            self.timestamp,
            self.team1,
            self.team2,
            self.winner,
            display.percent_text(),
            display.label()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RosterLoad,
    StatsLoad,
    Validation,
    Prediction,
}

impl FailureKind {
    pub fn message(self) -> &'static str {
        match self {
            FailureKind::RosterLoad => "Failed to load team list.",
            FailureKind::StatsLoad => "Could not fetch team stats.",
            FailureKind::Validation => "Please select both teams.",
            FailureKind::Prediction => "Prediction failed.",
        }
    }
}

/// Progress of the most recent prediction attempt. `AppState::phase` keeps the
/// last phase reached so a failure stays visible; `AppState::current_phase`
/// reports `Idle` once that phase is terminal and nothing is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    Idle,
    Validating,
    Requesting,
    ResultReady,
    LastMatchReady,
    LastMatchFailed,
    HistoryAppended,
    Failed,
}

impl AttemptPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, AttemptPhase::Failed | AttemptPhase::HistoryAppended)
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    RosterLoaded(Vec<String>),
    RosterFailed(String),
    TeamStatsLoaded {
        stats: TeamStats,
        matches: Vec<RecentMatch>,
    },
    TeamStatsFailed {
        team: String,
        reason: String,
    },
    PredictionReady {
        attempt: AttemptId,
        result: PredictionResult,
    },
    PredictionFailed {
        attempt: AttemptId,
        reason: String,
    },
    LastMatchReady {
        attempt: AttemptId,
        last_match: LastMatch,
    },
    LastMatchFailed {
        attempt: AttemptId,
        reason: String,
    },
    HistoryAppended {
        attempt: AttemptId,
        entry: HistoryEntry,
    },
    Log(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCommand {
    LoadRoster,
    FetchTeamStats {
        team: String,
    },
    Predict {
        attempt: AttemptId,
        team1: String,
        team2: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub view: View,
    pub roster: Vec<String>,
    pub roster_pending: usize,
    pub cursor: usize,
    pub selected_team: Option<String>,
    pub team_stats: Slot<TeamStats>,
    pub recent_matches: Vec<RecentMatch>,
    pub stats_pending: usize,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub result: Slot<PredictionResult>,
    pub last_match: Slot<LastMatch>,
    pub history: Vec<HistoryEntry>,
    pub error: Option<String>,
    pub next_attempt: u64,
    pub in_flight: Vec<AttemptId>,
    pub phase: AttemptPhase,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: View::Overview,
            roster: Vec::new(),
            roster_pending: 0,
            cursor: 0,
            selected_team: None,
            team_stats: Slot::Unloaded,
            recent_matches: Vec::new(),
            stats_pending: 0,
            team1: None,
            team2: None,
            result: Slot::Unloaded,
            last_match: Slot::Unloaded,
            history: Vec::new(),
            error: None,
            next_attempt: 1,
            in_flight: Vec::new(),
            phase: AttemptPhase::Idle,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Overview => View::Compare,
            View::Compare => View::Overview,
        };
    }

    pub fn cursor_team(&self) -> Option<&str> {
        self.roster.get(self.cursor).map(String::as_str)
    }

    pub fn select_next(&mut self) {
        if self.roster.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1).min(self.roster.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.roster.len().saturating_sub(1));
    }

    pub fn pick_team1(&mut self) {
        self.team1 = self.cursor_team().map(str::to_string);
    }

    pub fn pick_team2(&mut self) {
        self.team2 = self.cursor_team().map(str::to_string);
    }

    pub fn clear_picks(&mut self) {
        self.team1 = None;
        self.team2 = None;
    }

    pub fn request_roster(&mut self) -> ProviderCommand {
        self.roster_pending += 1;
        ProviderCommand::LoadRoster
    }

    /// Returns `None` when no team is selected.
    pub fn request_team_stats(&mut self, team: &str) -> Option<ProviderCommand> {
        let team = team.trim();
        if team.is_empty() {
            return None;
        }
        self.selected_team = Some(team.to_string());
        self.stats_pending += 1;
        Some(ProviderCommand::FetchTeamStats {
            team: team.to_string(),
        })
    }

    /// Starts a prediction attempt. Prior result, last match and error are
    /// cleared before validation; `None` means validation failed.
    pub fn request_prediction(
        &mut self,
        team1: Option<&str>,
        team2: Option<&str>,
    ) -> Option<ProviderCommand> {
        self.result = Slot::Cleared;
        self.last_match = Slot::Cleared;
        self.error = None;
        self.phase = AttemptPhase::Validating;

        let team1 = team1.map(str::trim).filter(|t| !t.is_empty());
        let team2 = team2.map(str::trim).filter(|t| !t.is_empty());
        let (Some(team1), Some(team2)) = (team1, team2) else {
            self.fail(FailureKind::Validation);
            self.phase = AttemptPhase::Failed;
            return None;
        };

        let attempt = AttemptId(self.next_attempt);
        self.next_attempt += 1;
        self.in_flight.push(attempt);
        self.phase = AttemptPhase::Requesting;
        Some(ProviderCommand::Predict {
            attempt,
            team1: team1.to_string(),
            team2: team2.to_string(),
        })
    }

    /// `Idle` between attempts, otherwise the phase the latest attempt is in.
    pub fn current_phase(&self) -> AttemptPhase {
        if self.phase.is_terminal() && self.in_flight.is_empty() {
            AttemptPhase::Idle
        } else {
            self.phase
        }
    }

    pub fn roster_loading(&self) -> bool {
        self.roster_pending > 0
    }

    pub fn stats_loading(&self) -> bool {
        self.stats_pending > 0
    }

    pub fn is_in_flight(&self, attempt: AttemptId) -> bool {
        self.in_flight.contains(&attempt)
    }

    fn fail(&mut self, kind: FailureKind) {
        self.error = Some(kind.message().to_string());
    }

    fn finish_attempt(&mut self, attempt: AttemptId) {
        self.in_flight.retain(|a| *a != attempt);
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::RosterLoaded(teams) => {
            state.roster_pending = state.roster_pending.saturating_sub(1);
            state.push_log(format!("[INFO] Loaded {} teams", teams.len()));
            state.roster = teams;
            state.clamp_cursor();
        }
        Delta::RosterFailed(reason) => {
            state.roster_pending = state.roster_pending.saturating_sub(1);
            state.roster.clear();
            state.cursor = 0;
            state.fail(FailureKind::RosterLoad);
            state.push_log(format!("[WARN] Team list error: {reason}"));
        }
        Delta::TeamStatsLoaded { stats, matches } => {
            state.stats_pending = state.stats_pending.saturating_sub(1);
            state.team_stats = Slot::Present(stats);
            state.recent_matches = matches;
        }
        Delta::TeamStatsFailed { team, reason } => {
            state.stats_pending = state.stats_pending.saturating_sub(1);
            state.team_stats = Slot::Cleared;
            state.recent_matches.clear();
            state.fail(FailureKind::StatsLoad);
            state.push_log(format!("[WARN] Stats error for {team}: {reason}"));
        }
        Delta::PredictionReady { result, .. } => {
            // Overlapping attempts are not de-duplicated; the latest delta wins.
            state.result = Slot::Present(result);
            state.phase = AttemptPhase::ResultReady;
        }
        Delta::PredictionFailed { attempt, reason } => {
            state.finish_attempt(attempt);
            state.fail(FailureKind::Prediction);
            state.phase = AttemptPhase::Failed;
            state.push_log(format!("[WARN] Prediction #{} error: {reason}", attempt.0));
        }
        Delta::LastMatchReady { last_match, .. } => {
            state.last_match = Slot::Present(last_match);
            state.phase = AttemptPhase::LastMatchReady;
        }
        Delta::LastMatchFailed { attempt, reason } => {
            state.phase = AttemptPhase::LastMatchFailed;
            state.push_log(format!(
                "[WARN] Last match lookup #{} error: {reason}",
                attempt.0
            ));
        }
        Delta::HistoryAppended { attempt, entry } => {
            state.finish_attempt(attempt);
            state.history.insert(0, entry);
            state.phase = AttemptPhase::HistoryAppended;
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
