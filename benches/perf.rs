use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use matchup_terminal::api::parse_prediction_json;
use matchup_terminal::confidence::{ConfidenceDisplay, display_percent};
use matchup_terminal::state::{AppState, Delta, HistoryEntry, ProviderCommand, apply_delta};

const PREDICT_JSON: &str = r#"{
  "predicted_winner": "Vitality",
  "confidence": 0.6431,
  "team1_stats": { "team": "Vitality", "games_played": 48, "win_rate": 0.71, "avg_score": 14.2 },
  "team2_stats": { "team": "Spirit", "games_played": 45, "win_rate": 0.64, "avg_score": 13.8 }
}"#;

fn bench_display_percent(c: &mut Criterion) {
    c.bench_function("display_percent_grid", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for i in 0..=1000 {
                total += display_percent(black_box(i as f64 / 1000.0));
            }
            black_box(total);
        })
    });

    c.bench_function("confidence_display", |b| {
        b.iter(|| black_box(ConfidenceDisplay::from_raw(black_box(0.6431)).label()))
    });
}

fn bench_prediction_parse(c: &mut Criterion) {
    c.bench_function("prediction_parse", |b| {
        b.iter(|| {
            let result = parse_prediction_json(black_box(PREDICT_JSON)).unwrap();
            black_box(result.confidence);
        })
    });
}

fn bench_history_append(c: &mut Criterion) {
    c.bench_function("history_append_500", |b| {
        b.iter(|| {
            let mut state = AppState::new();
            for i in 0..500 {
                let Some(ProviderCommand::Predict { attempt, .. }) =
                    state.request_prediction(Some("Vitality"), Some("Spirit"))
                else {
                    continue;
                };
                apply_delta(
                    &mut state,
                    Delta::HistoryAppended {
                        attempt,
                        entry: HistoryEntry {
                            team1: "Vitality".to_string(),
                            team2: "Spirit".to_string(),
                            winner: "Vitality".to_string(),
                            confidence: 0.5 + (i % 20) as f64 / 100.0,
                            timestamp: "12:00:00".to_string(),
                        },
                    },
                );
            }
            black_box(state.history.len());
        })
    });
}

criterion_group!(
    benches,
    bench_display_percent,
    bench_prediction_parse,
    bench_history_append
);
criterion_main!(benches);
