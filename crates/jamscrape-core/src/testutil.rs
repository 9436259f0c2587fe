//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AppError;
use crate::models::{
    Author, DownloadEntry, EntriesFeed, GameDetail, GameListing, GameRecord, JamEntry, JamMetadata,
};
use crate::reporter::{IngestEvent, IngestReporter};
use crate::traits::{JamClient, RecordSink};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Minimal jam metadata with a resolvable internal id.
pub fn make_test_metadata(jam_id: &str) -> JamMetadata {
    JamMetadata {
        id: jam_id.to_string(),
        title: format!("{jam_id} (jam)"),
        internal_id: "424242".to_string(),
        hosts: vec![],
        start_date: "February 1st 2025".to_string(),
        end_date: "February 8th 2025".to_string(),
        submission_date: "February 8th 2025".to_string(),
        theme: String::new(),
        submission_count: String::new(),
        rating_count: String::new(),
        comments_count: String::new(),
        cover_url: None,
    }
}

/// One feed entry for the given game id.
pub fn make_test_entry(game_id: u64) -> JamEntry {
    JamEntry {
        id: game_id * 10,
        created_at: "2025-02-01 10:00:00".to_string(),
        contributors: vec![],
        coolness: 1,
        rating_count: 2,
        url: format!("https://itch.io/jam/test/rate/{game_id}"),
        game: GameListing {
            id: game_id,
            title: format!("Game {game_id}"),
            url: format!("https://dev.itch.io/game-{game_id}"),
            cover: Some(format!("https://img.itch.zone/{game_id}/cover.png")),
            cover_color: None,
            short_text: None,
            platforms: vec!["html5".to_string()],
            user: Author {
                name: "dev".to_string(),
                url: "https://dev.itch.io".to_string(),
                id: Some(7),
            },
        },
    }
}

/// A feed containing one entry per id, in order.
pub fn make_test_feed(game_ids: &[u64]) -> EntriesFeed {
    EntriesFeed {
        entries: game_ids.iter().copied().map(make_test_entry).collect(),
        generated_on: 0.0,
    }
}

// ---------------------------------------------------------------------------
// MockJamClient
// ---------------------------------------------------------------------------

/// Mock extraction client with configurable per-method responses and call
/// recording. Queued responses pop front; empty queues fall back to benign
/// defaults so simple tests stay short.
#[derive(Clone, Default)]
pub struct MockJamClient {
    resolve_map: Arc<Mutex<HashMap<String, String>>>,
    metadata_responses: Arc<Mutex<Vec<Result<JamMetadata, AppError>>>>,
    entries_responses: Arc<Mutex<Vec<Result<EntriesFeed, AppError>>>>,
    detail_map: Arc<Mutex<HashMap<String, Result<GameDetail, AppError>>>>,
    failing_downloads: Arc<Mutex<HashSet<String>>>,
    detail_delay: Arc<Mutex<Duration>>,
    /// Every (url, dest) pair passed to `download_binary`.
    pub downloads: Arc<Mutex<Vec<(String, PathBuf)>>>,
    /// Total network-touching calls (metadata, entries, detail, download).
    pub network_calls: Arc<AtomicUsize>,
    active_details: Arc<AtomicUsize>,
    /// High-water mark of concurrent detail fetches.
    pub max_active_details: Arc<AtomicUsize>,
}

impl MockJamClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolve(self, url: &str, jam_id: &str) -> Self {
        self.resolve_map
            .lock()
            .unwrap()
            .insert(url.to_string(), jam_id.to_string());
        self
    }

    pub fn with_metadata(self, meta: JamMetadata) -> Self {
        self.metadata_responses.lock().unwrap().push(Ok(meta));
        self
    }

    pub fn with_metadata_error(self, error: AppError) -> Self {
        self.metadata_responses.lock().unwrap().push(Err(error));
        self
    }

    pub fn with_entries(self, feed: EntriesFeed) -> Self {
        self.entries_responses.lock().unwrap().push(Ok(feed));
        self
    }

    pub fn with_entries_error(self, error: AppError) -> Self {
        self.entries_responses.lock().unwrap().push(Err(error));
        self
    }

    pub fn with_detail(self, game_id: &str, detail: GameDetail) -> Self {
        self.detail_map
            .lock()
            .unwrap()
            .insert(game_id.to_string(), Ok(detail));
        self
    }

    pub fn with_detail_error(self, game_id: &str, error: AppError) -> Self {
        self.detail_map
            .lock()
            .unwrap()
            .insert(game_id.to_string(), Err(error));
        self
    }

    pub fn with_failing_download(self, url: &str) -> Self {
        self.failing_downloads.lock().unwrap().insert(url.to_string());
        self
    }

    /// Make each detail fetch take this long, for admission-bound tests.
    pub fn with_detail_delay(self, delay: Duration) -> Self {
        *self.detail_delay.lock().unwrap() = delay;
        self
    }

    pub fn download_count(&self) -> usize {
        self.downloads.lock().unwrap().len()
    }
}

impl JamClient for MockJamClient {
    async fn resolve_jam_id(&self, url: &str) -> Result<String, AppError> {
        self.resolve_map
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("no jam id in {url}")))
    }

    async fn fetch_jam_metadata(&self, jam_id: &str) -> Result<JamMetadata, AppError> {
        self.network_calls.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.metadata_responses.lock().unwrap();
        if queue.is_empty() {
            Ok(make_test_metadata(jam_id))
        } else {
            queue.remove(0)
        }
    }

    async fn fetch_entries(&self, _internal_id: &str) -> Result<EntriesFeed, AppError> {
        self.network_calls.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.entries_responses.lock().unwrap();
        if queue.is_empty() {
            Ok(make_test_feed(&[]))
        } else {
            queue.remove(0)
        }
    }

    async fn fetch_game_detail(&self, _jam_id: &str, game_id: &str) -> Result<GameDetail, AppError> {
        self.network_calls.fetch_add(1, Ordering::SeqCst);
        let active = self.active_details.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_details.fetch_max(active, Ordering::SeqCst);
        let delay = *self.detail_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.active_details.fetch_sub(1, Ordering::SeqCst);
        // Each id is fetched at most once per run (dedup), so consuming
        // the configured response is safe.
        let configured = self.detail_map.lock().unwrap().remove(game_id);
        match configured {
            Some(result) => result,
            None => Ok(GameDetail::default()),
        }
    }

    async fn download_binary(&self, url: &str, dest: &Path) -> Result<(), AppError> {
        self.network_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_downloads.lock().unwrap().contains(url) {
            return Err(AppError::Http(format!("HTTP 404 for {url}")));
        }
        self.downloads
            .lock()
            .unwrap()
            .push((url.to_string(), dest.to_path_buf()));
        Ok(())
    }

    async fn resolve_game_download(
        &self,
        _jam_id: &str,
        _game_id: &str,
        _entry: &DownloadEntry,
    ) -> Result<String, AppError> {
        Err(AppError::Unsupported(
            "game file download resolution requires authentication".to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// MockSink
// ---------------------------------------------------------------------------

/// Mock persistence sink that records writes and returns configurable errors.
#[derive(Clone, Default)]
pub struct MockSink {
    pub containers: Arc<Mutex<Vec<String>>>,
    pub jam_writes: Arc<Mutex<Vec<(String, JamMetadata)>>>,
    pub game_writes: Arc<Mutex<Vec<(String, String, GameRecord)>>>,
    pub reports: Arc<Mutex<Vec<String>>>,
    ensure_error: Arc<Mutex<Option<AppError>>>,
    jam_write_error: Arc<Mutex<Option<AppError>>>,
    failing_game_ids: Arc<Mutex<HashSet<String>>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ensure_error(self, error: AppError) -> Self {
        *self.ensure_error.lock().unwrap() = Some(error);
        self
    }

    pub fn with_jam_write_error(self, error: AppError) -> Self {
        *self.jam_write_error.lock().unwrap() = Some(error);
        self
    }

    /// Fail every `write_game_record` for this game id.
    pub fn with_failing_game(self, game_id: &str) -> Self {
        self.failing_game_ids
            .lock()
            .unwrap()
            .insert(game_id.to_string());
        self
    }

    pub fn saved_game_ids(&self) -> Vec<String> {
        self.game_writes
            .lock()
            .unwrap()
            .iter()
            .map(|(_, game_id, _)| game_id.clone())
            .collect()
    }
}

impl RecordSink for MockSink {
    fn ensure_container(&self, jam_id: &str) -> Result<(), AppError> {
        if let Some(e) = self.ensure_error.lock().unwrap().take() {
            return Err(e);
        }
        self.containers.lock().unwrap().push(jam_id.to_string());
        Ok(())
    }

    fn write_jam_metadata(&self, jam_id: &str, meta: &JamMetadata) -> Result<(), AppError> {
        if let Some(e) = self.jam_write_error.lock().unwrap().take() {
            return Err(e);
        }
        self.jam_writes
            .lock()
            .unwrap()
            .push((jam_id.to_string(), meta.clone()));
        Ok(())
    }

    fn write_game_record(
        &self,
        jam_id: &str,
        game_id: &str,
        record: &GameRecord,
    ) -> Result<(), AppError> {
        if self.failing_game_ids.lock().unwrap().contains(game_id) {
            return Err(AppError::Io(std::io::Error::other("disk full")));
        }
        self.game_writes.lock().unwrap().push((
            jam_id.to_string(),
            game_id.to_string(),
            record.clone(),
        ));
        Ok(())
    }

    fn write_report(
        &self,
        jam_id: &str,
        _meta: &JamMetadata,
        _records: &[GameRecord],
    ) -> Result<(), AppError> {
        self.reports.lock().unwrap().push(jam_id.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingReporter
// ---------------------------------------------------------------------------

/// Reporter that records `(label, subject)` pairs for assertions.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    pub events: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(label, _)| label.clone())
            .collect()
    }

    pub fn count(&self, label: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| l == label)
            .count()
    }

    pub fn subjects(&self, label: &str) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| l == label)
            .map(|(_, subject)| subject.clone())
            .collect()
    }
}

impl IngestReporter for RecordingReporter {
    fn report(&self, event: IngestEvent<'_>) {
        let (label, subject) = match &event {
            IngestEvent::JamStarted { jam_id } => ("JamStarted", jam_id.to_string()),
            IngestEvent::MetadataSaved { jam_id, .. } => ("MetadataSaved", jam_id.to_string()),
            IngestEvent::CoverFailed { jam_id, .. } => ("CoverFailed", jam_id.to_string()),
            IngestEvent::EntriesFetched { jam_id, .. } => ("EntriesFetched", jam_id.to_string()),
            IngestEvent::GameStarted { game_id, .. } => ("GameStarted", game_id.to_string()),
            IngestEvent::GameDeduplicated { game_id, .. } => {
                ("GameDeduplicated", game_id.to_string())
            }
            IngestEvent::GameDegraded { game_id, .. } => ("GameDegraded", game_id.to_string()),
            IngestEvent::GameSaved { game_id, enriched, .. } => {
                ("GameSaved", format!("{game_id}:{enriched}"))
            }
            IngestEvent::GameSaveFailed { game_id, .. } => ("GameSaveFailed", game_id.to_string()),
            IngestEvent::MediaItemFailed { game_id, .. } => {
                ("MediaItemFailed", game_id.to_string())
            }
            IngestEvent::FileDownloadFailed { game_id, .. } => {
                ("FileDownloadFailed", game_id.to_string())
            }
            IngestEvent::FilesSkippedUnsupported { game_id, count } => {
                ("FilesSkippedUnsupported", format!("{game_id}:{count}"))
            }
            IngestEvent::JamFinished { jam_id, .. } => ("JamFinished", jam_id.to_string()),
            IngestEvent::JamFailed { jam_id, .. } => ("JamFailed", jam_id.to_string()),
        };
        self.events
            .lock()
            .unwrap()
            .push((label.to_string(), subject));
    }
}
