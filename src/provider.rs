use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use chrono::Local;

use crate::api::StatsApi;
use crate::state::{Delta, HistoryEntry, ProviderCommand};

/// Runs one command against `api`, reporting every outcome through `emit`.
/// Sub-requests run strictly in order; later ones depend on earlier successes.
pub fn execute(api: &dyn StatsApi, cmd: ProviderCommand, emit: &mut dyn FnMut(Delta)) {
    match cmd {
        ProviderCommand::LoadRoster => match api.teams() {
            Ok(teams) => emit(Delta::RosterLoaded(teams)),
            Err(err) => emit(Delta::RosterFailed(format!("{err:#}"))),
        },
        ProviderCommand::FetchTeamStats { team } => {
            // Stats and recent matches land together or not at all.
            let loaded = api
                .team_stats(&team)
                .and_then(|stats| api.recent_matches(&team).map(|matches| (stats, matches)));
            match loaded {
                Ok((stats, matches)) => emit(Delta::TeamStatsLoaded { stats, matches }),
                Err(err) => emit(Delta::TeamStatsFailed {
                    team,
                    reason: format!("{err:#}"),
                }),
            }
        }
        ProviderCommand::Predict {
            attempt,
            team1,
            team2,
        } => {
            let result = match api.predict(&team1, &team2) {
                Ok(result) => result,
                Err(err) => {
                    emit(Delta::PredictionFailed {
                        attempt,
                        reason: format!("{err:#}"),
                    });
                    return;
                }
            };
            emit(Delta::PredictionReady {
                attempt,
                result: result.clone(),
            });

            match api.last_match(&team1, &team2) {
                Ok(last_match) => emit(Delta::LastMatchReady {
                    attempt,
                    last_match,
                }),
                Err(err) => emit(Delta::LastMatchFailed {
                    attempt,
                    reason: format!("{err:#}"),
                }),
            }

            let entry = HistoryEntry::from_prediction(&team1, &team2, &result, wall_clock());
            emit(Delta::HistoryAppended { attempt, entry });
        }
    }
}

pub fn wall_clock() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Spawns the provider loop. Each command gets its own thread, so overlapping
/// commands are neither serialized nor cancelled.
pub fn spawn_provider(
    api: Arc<dyn StatsApi>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let api = Arc::clone(&api);
            let tx = tx.clone();
            thread::spawn(move || {
                execute(api.as_ref(), cmd, &mut |delta| {
                    let _ = tx.send(delta);
                });
            });
        }
    })
}
