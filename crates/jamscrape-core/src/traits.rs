use std::future::Future;
use std::path::Path;

use crate::error::AppError;
use crate::models::{DownloadEntry, EntriesFeed, GameDetail, GameRecord, JamMetadata};

/// Extraction client: one rate-limited network fetch per call, returning a
/// strongly-typed result. Implementations own the shared connection client
/// and the inter-request pacing.
pub trait JamClient: Send + Sync + Clone {
    /// Resolve a jam URL to its human-readable slug.
    fn resolve_jam_id(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;

    /// Scrape the jam's landing page.
    fn fetch_jam_metadata(
        &self,
        jam_id: &str,
    ) -> impl Future<Output = Result<JamMetadata, AppError>> + Send;

    /// Fetch the entries feed addressed by the jam's internal numeric id.
    fn fetch_entries(
        &self,
        internal_id: &str,
    ) -> impl Future<Output = Result<EntriesFeed, AppError>> + Send;

    /// Scrape a game's rate page for enrichment fields.
    fn fetch_game_detail(
        &self,
        jam_id: &str,
        game_id: &str,
    ) -> impl Future<Output = Result<GameDetail, AppError>> + Send;

    /// Download a binary asset to the given path, creating parent
    /// directories as needed.
    fn download_binary(
        &self,
        url: &str,
        dest: &Path,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Resolve the real download URL for a listed game file.
    ///
    /// Requires authenticated access the system does not provide;
    /// implementations return [`AppError::Unsupported`] so callers can tell
    /// "not attempted" apart from "attempted and failed".
    fn resolve_game_download(
        &self,
        jam_id: &str,
        game_id: &str,
        entry: &DownloadEntry,
    ) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Persistence sink: typed records in, files out. Encoding is the sink's
/// concern; the coordinator only sees the save/append contract.
pub trait RecordSink: Send + Sync + Clone {
    /// Create the jam's output container. Must succeed before any network
    /// work for the jam begins.
    fn ensure_container(&self, jam_id: &str) -> Result<(), AppError>;

    /// Durably record jam metadata (whole-object overwrite).
    fn write_jam_metadata(&self, jam_id: &str, meta: &JamMetadata) -> Result<(), AppError>;

    /// Persist one game record, possibly partial.
    fn write_game_record(
        &self,
        jam_id: &str,
        game_id: &str,
        record: &GameRecord,
    ) -> Result<(), AppError>;

    /// Render the human-readable aggregate report over already-persisted
    /// records. Never invoked by the per-jam pipeline.
    fn write_report(
        &self,
        jam_id: &str,
        meta: &JamMetadata,
        records: &[GameRecord],
    ) -> Result<(), AppError>;
}
