use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::api::StatsApi;
use crate::provider;
use crate::state::{AppState, Delta, ProviderCommand, apply_delta};

enum Dispatch {
    /// Commands run to completion on the caller's thread.
    Inline(Arc<dyn StatsApi>),
    /// Commands are queued to the provider thread; deltas arrive via `pump`.
    Worker {
        cmd_tx: Sender<ProviderCommand>,
        delta_rx: Receiver<Delta>,
    },
}

/// Owns the session state and turns user actions into provider commands.
pub struct SessionOrchestrator {
    pub state: AppState,
    dispatch: Dispatch,
}

impl SessionOrchestrator {
    pub fn inline(api: Arc<dyn StatsApi>) -> Self {
        Self {
            state: AppState::new(),
            dispatch: Dispatch::Inline(api),
        }
    }

    pub fn with_worker(api: Arc<dyn StatsApi>) -> Self {
        let (tx, delta_rx) = mpsc::channel();
        let (cmd_tx, cmd_rx) = mpsc::channel();
        provider::spawn_provider(api, tx, cmd_rx);
        Self {
            state: AppState::new(),
            dispatch: Dispatch::Worker { cmd_tx, delta_rx },
        }
    }

    pub fn load_team_roster(&mut self) {
        let cmd = self.state.request_roster();
        self.submit(cmd);
    }

    pub fn select_team_and_fetch_stats(&mut self, team: &str) {
        if let Some(cmd) = self.state.request_team_stats(team) {
            self.submit(cmd);
        }
    }

    pub fn predict(&mut self, team1: Option<&str>, team2: Option<&str>) {
        if let Some(cmd) = self.state.request_prediction(team1, team2) {
            self.submit(cmd);
        }
    }

    /// Predicts with the teams currently picked in the Compare view.
    pub fn predict_picked(&mut self) {
        let team1 = self.state.team1.clone();
        let team2 = self.state.team2.clone();
        self.predict(team1.as_deref(), team2.as_deref());
    }

    /// Applies every delta that has arrived so far. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let Dispatch::Worker { delta_rx, .. } = &self.dispatch else {
            return 0;
        };
        let mut applied = 0;
        while let Ok(delta) = delta_rx.try_recv() {
            apply_delta(&mut self.state, delta);
            applied += 1;
        }
        applied
    }

    /// Blocks until no prediction is in flight and no stats/roster load is
    /// pending, or until `timeout` passes. Returns whether the session settled.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.pump();
            if self.is_idle() {
                return true;
            }
            let Dispatch::Worker { delta_rx, .. } = &self.dispatch else {
                return self.is_idle();
            };
            let remaining = deadline.saturating_duration_since(Instant::now());
            match delta_rx.recv_timeout(remaining) {
                Ok(delta) => apply_delta(&mut self.state, delta),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return self.is_idle();
                }
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state.in_flight.is_empty() && !self.state.stats_loading() && !self.state.roster_loading()
    }

    fn submit(&mut self, cmd: ProviderCommand) {
        match &self.dispatch {
            Dispatch::Inline(api) => {
                let api = Arc::clone(api);
                let state = &mut self.state;
                provider::execute(api.as_ref(), cmd, &mut |delta| apply_delta(state, delta));
            }
            Dispatch::Worker { cmd_tx, .. } => {
                if cmd_tx.send(cmd).is_err() {
                    self.state.roster_pending = 0;
                    self.state.stats_pending = 0;
                    self.state.in_flight.clear();
                    self.state.push_log("[WARN] Provider unavailable; request dropped");
                }
            }
        }
    }
}
