use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::state::HistoryEntry;

const HEADERS: [&str; 7] = [
    "Time",
    "Team 1",
    "Team 2",
    "Predicted Winner",
    "Raw Confidence",
    "Display %",
    "Label",
];

/// Writes the session history, newest first, to an `.xlsx` workbook.
/// Returns the number of data rows written.
pub fn export_history(path: &Path, history: &[HistoryEntry]) -> Result<usize> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("History")?;
        write_header(sheet)?;
        for (idx, entry) in history.iter().enumerate() {
            write_entry(sheet, idx as u32 + 1, entry)?;
        }
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(history.len())
}

pub fn default_export_path(dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("prediction_history_{stamp}.xlsx"))
}

fn write_header(sheet: &mut Worksheet) -> Result<()> {
    for (col, title) in HEADERS.iter().enumerate() {
        sheet
            .write_string(0, col as u16, *title)
            .with_context(|| format!("write header {col}"))?;
    }
    Ok(())
}

fn write_entry(sheet: &mut Worksheet, row: u32, entry: &HistoryEntry) -> Result<()> {
    let display = entry.display();
    let texts = [
        (0u16, entry.timestamp.as_str()),
        (1, entry.team1.as_str()),
        (2, entry.team2.as_str()),
        (3, entry.winner.as_str()),
        (6, display.label()),
    ];
    for (col, value) in texts {
        sheet
            .write_string(row, col, value)
            .with_context(|| format!("write cell ({row},{col})"))?;
    }
    sheet
        .write_number(row, 4, entry.confidence)
        .with_context(|| format!("write cell ({row},4)"))?;
    sheet
        .write_number(row, 5, display.percent)
        .with_context(|| format!("write cell ({row},5)"))?;
    Ok(())
}
