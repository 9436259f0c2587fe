//! Filesystem-backed [`RecordSink`].

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use jamscrape_core::error::AppError;
use jamscrape_core::layout::Layout;
use jamscrape_core::models::{GameRecord, JamMetadata};
use jamscrape_core::traits::RecordSink;

use crate::report;

/// Encoding used for game records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One pretty-printed `game.json` per submission.
    #[default]
    Json,
    /// One compact line per record, appended to the jam's `games.jsonl`.
    JsonLines,
    /// Per-submission JSON plus a rendered Markdown report.
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "jsonlines" => Ok(Self::JsonLines),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(AppError::Generic(format!(
                "unknown output format '{other}' (expected json, jsonl or markdown)"
            ))),
        }
    }
}

/// Writes records under the configured output root.
///
/// Clones share the append lock, so concurrent line-delimited writes from
/// different game tasks never interleave within a line.
#[derive(Clone)]
pub struct FsSink {
    layout: Layout,
    format: OutputFormat,
    append_lock: Arc<Mutex<()>>,
}

impl FsSink {
    pub fn new(layout: Layout, format: OutputFormat) -> Self {
        Self {
            layout,
            format,
            append_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn append_jsonl(&self, jam_id: &str, record: &GameRecord) -> Result<(), AppError> {
        let line = serde_json::to_string(record)?;
        let _guard = self
            .append_lock
            .lock()
            .map_err(|_| AppError::Generic("record append lock poisoned".to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.layout.games_jsonl_path(jam_id))?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    fn write_pretty_record(
        &self,
        jam_id: &str,
        game_id: &str,
        record: &GameRecord,
    ) -> Result<(), AppError> {
        let path = self.layout.game_record_path(jam_id, game_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(record)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl RecordSink for FsSink {
    fn ensure_container(&self, jam_id: &str) -> Result<(), AppError> {
        fs::create_dir_all(self.layout.jam_dir(jam_id))?;
        Ok(())
    }

    fn write_jam_metadata(&self, jam_id: &str, meta: &JamMetadata) -> Result<(), AppError> {
        let path = self.layout.jam_meta_path(jam_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(meta)?;
        fs::write(&path, json)?;
        tracing::debug!(jam_id, path = %path.display(), "Wrote jam metadata");
        Ok(())
    }

    fn write_game_record(
        &self,
        jam_id: &str,
        game_id: &str,
        record: &GameRecord,
    ) -> Result<(), AppError> {
        match self.format {
            OutputFormat::Json | OutputFormat::Markdown => {
                self.write_pretty_record(jam_id, game_id, record)
            }
            OutputFormat::JsonLines => self.append_jsonl(jam_id, record),
        }
    }

    fn write_report(
        &self,
        jam_id: &str,
        meta: &JamMetadata,
        records: &[GameRecord],
    ) -> Result<(), AppError> {
        let path = self.layout.report_path(jam_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, report::render_report(meta, records))?;
        tracing::info!(jam_id, path = %path.display(), "Wrote report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jamscrape_core::testutil::{make_test_entry, make_test_metadata};

    fn record(id: u64) -> GameRecord {
        GameRecord::from_entry(make_test_entry(id))
    }

    #[test]
    fn format_parses_known_names() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "JSONL".parse::<OutputFormat>().unwrap(),
            OutputFormat::JsonLines
        );
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn metadata_lands_at_the_layout_path() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let sink = FsSink::new(layout.clone(), OutputFormat::Json);

        sink.ensure_container("test-jam").unwrap();
        sink.write_jam_metadata("test-jam", &make_test_metadata("test-jam"))
            .unwrap();

        let raw = fs::read_to_string(layout.jam_meta_path("test-jam")).unwrap();
        let back: JamMetadata = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.id, "test-jam");
        assert_eq!(back.internal_id, "424242");
    }

    #[test]
    fn json_format_writes_one_file_per_game() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let sink = FsSink::new(layout.clone(), OutputFormat::Json);

        sink.write_game_record("test-jam", "1", &record(1)).unwrap();
        sink.write_game_record("test-jam", "2", &record(2)).unwrap();

        let raw = fs::read_to_string(layout.game_record_path("test-jam", "1")).unwrap();
        let back: GameRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.id, "1");
        assert!(layout.game_record_path("test-jam", "2").exists());
        assert!(!layout.games_jsonl_path("test-jam").exists());
    }

    #[test]
    fn jsonl_format_appends_one_line_per_game() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let sink = FsSink::new(layout.clone(), OutputFormat::JsonLines);

        sink.ensure_container("test-jam").unwrap();
        sink.write_game_record("test-jam", "1", &record(1)).unwrap();
        sink.write_game_record("test-jam", "2", &record(2)).unwrap();

        let raw = fs::read_to_string(layout.games_jsonl_path("test-jam")).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: GameRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.id, "1");
    }

    #[test]
    fn repeated_json_write_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let sink = FsSink::new(layout.clone(), OutputFormat::Json);
        let rec = record(7);

        sink.write_game_record("test-jam", "7", &rec).unwrap();
        let first = fs::read(layout.game_record_path("test-jam", "7")).unwrap();
        sink.write_game_record("test-jam", "7", &rec).unwrap();
        let second = fs::read(layout.game_record_path("test-jam", "7")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn report_lands_under_the_reports_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let sink = FsSink::new(layout.clone(), OutputFormat::Markdown);

        sink.write_report("test-jam", &make_test_metadata("test-jam"), &[record(1)])
            .unwrap();

        let body = fs::read_to_string(layout.report_path("test-jam")).unwrap();
        assert!(body.starts_with("# "));
        assert!(body.contains("Game 1"));
    }
}
