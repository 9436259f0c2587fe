//! Read persisted jam data back off disk for report generation.

use std::fs;

use jamscrape_core::error::AppError;
use jamscrape_core::layout::Layout;
use jamscrape_core::models::{GameRecord, JamMetadata};

/// Load a jam's metadata and every persisted game record.
///
/// Per-submission `game.json` files are preferred; when a jam was scraped
/// in line-delimited mode, `games.jsonl` is read instead. Records come back
/// sorted by numeric id so downstream rendering is stable.
pub fn load_jam(layout: &Layout, jam_id: &str) -> Result<(JamMetadata, Vec<GameRecord>), AppError> {
    let meta_path = layout.jam_meta_path(jam_id);
    if !meta_path.exists() {
        return Err(AppError::NotFound(format!(
            "no scraped data for jam '{jam_id}' under {}",
            layout.root().display()
        )));
    }
    let meta: JamMetadata = serde_json::from_str(&fs::read_to_string(&meta_path)?)?;

    let mut records = load_submission_records(layout, jam_id)?;
    if records.is_empty() {
        records = load_jsonl_records(layout, jam_id)?;
    }

    records.sort_by_key(|record| record.id.parse::<u64>().unwrap_or(u64::MAX));
    Ok((meta, records))
}

fn load_submission_records(layout: &Layout, jam_id: &str) -> Result<Vec<GameRecord>, AppError> {
    let submissions_dir = layout.jam_dir(jam_id).join("submissions");
    let mut records = Vec::new();
    if !submissions_dir.is_dir() {
        return Ok(records);
    }
    for entry in fs::read_dir(&submissions_dir)? {
        let entry = entry?;
        let record_path = entry.path().join("game.json");
        if !record_path.is_file() {
            continue;
        }
        match serde_json::from_str::<GameRecord>(&fs::read_to_string(&record_path)?) {
            Ok(record) => records.push(record),
            // One corrupt record should not sink the whole report.
            Err(e) => {
                tracing::warn!(path = %record_path.display(), error = %e, "Skipping unreadable record");
            }
        }
    }
    Ok(records)
}

fn load_jsonl_records(layout: &Layout, jam_id: &str) -> Result<Vec<GameRecord>, AppError> {
    let path = layout.games_jsonl_path(jam_id);
    let mut records = Vec::new();
    if !path.is_file() {
        return Ok(records);
    }
    for (number, line) in fs::read_to_string(&path)?.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<GameRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), line = number + 1, error = %e, "Skipping unreadable record");
            }
        }
    }
    Ok(records)
}
