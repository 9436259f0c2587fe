//! Pipeline events, decoupled from logging.

/// Events emitted by the ingestion pipeline for monitoring/logging.
#[derive(Debug, Clone)]
pub enum IngestEvent<'a> {
    JamStarted {
        jam_id: &'a str,
    },
    MetadataSaved {
        jam_id: &'a str,
        title: &'a str,
    },
    CoverFailed {
        jam_id: &'a str,
        error: &'a str,
    },
    EntriesFetched {
        jam_id: &'a str,
        count: usize,
    },
    GameStarted {
        jam_id: &'a str,
        game_id: &'a str,
    },
    GameDeduplicated {
        jam_id: &'a str,
        game_id: &'a str,
    },
    /// Detail fetch failed; the base record continues through the pipeline.
    GameDegraded {
        jam_id: &'a str,
        game_id: &'a str,
        error: &'a str,
    },
    GameSaved {
        jam_id: &'a str,
        game_id: &'a str,
        enriched: bool,
    },
    /// Persist failed; this game's remaining stages are skipped.
    GameSaveFailed {
        jam_id: &'a str,
        game_id: &'a str,
        error: &'a str,
    },
    MediaItemFailed {
        game_id: &'a str,
        url: &'a str,
        error: &'a str,
    },
    FileDownloadFailed {
        game_id: &'a str,
        filename: &'a str,
        error: &'a str,
    },
    /// The file stage was not attempted: download resolution is a
    /// permanent capability gap, not a failure.
    FilesSkippedUnsupported {
        game_id: &'a str,
        count: usize,
    },
    JamFinished {
        jam_id: &'a str,
        games: usize,
    },
    JamFailed {
        jam_id: &'a str,
        error: &'a str,
    },
}

/// Trait for receiving pipeline events (decoupled logging).
pub trait IngestReporter: Send + Sync {
    fn report(&self, event: IngestEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl IngestReporter for TracingReporter {
    fn report(&self, event: IngestEvent<'_>) {
        match event {
            IngestEvent::JamStarted { jam_id } => {
                tracing::info!(%jam_id, "Jam run started");
            }
            IngestEvent::MetadataSaved { jam_id, title } => {
                tracing::info!(%jam_id, %title, "Jam metadata saved");
            }
            IngestEvent::CoverFailed { jam_id, error } => {
                tracing::warn!(%jam_id, %error, "Jam cover download failed");
            }
            IngestEvent::EntriesFetched { jam_id, count } => {
                tracing::info!(%jam_id, %count, "Entries feed fetched");
            }
            IngestEvent::GameStarted { jam_id, game_id } => {
                tracing::info!(%jam_id, %game_id, "Processing game");
            }
            IngestEvent::GameDeduplicated { jam_id, game_id } => {
                tracing::debug!(%jam_id, %game_id, "Game already claimed, skipping");
            }
            IngestEvent::GameDegraded {
                jam_id,
                game_id,
                error,
            } => {
                tracing::warn!(%jam_id, %game_id, %error, "Detail fetch failed, keeping base record");
            }
            IngestEvent::GameSaved {
                jam_id,
                game_id,
                enriched,
            } => {
                tracing::info!(%jam_id, %game_id, %enriched, "Game record saved");
            }
            IngestEvent::GameSaveFailed {
                jam_id,
                game_id,
                error,
            } => {
                tracing::warn!(%jam_id, %game_id, %error, "Game record save failed");
            }
            IngestEvent::MediaItemFailed {
                game_id,
                url,
                error,
            } => {
                tracing::warn!(%game_id, %url, %error, "Media download failed");
            }
            IngestEvent::FileDownloadFailed {
                game_id,
                filename,
                error,
            } => {
                tracing::warn!(%game_id, %filename, %error, "Game file download failed");
            }
            IngestEvent::FilesSkippedUnsupported { game_id, count } => {
                tracing::info!(%game_id, %count, "Game file downloads skipped: resolution requires authentication");
            }
            IngestEvent::JamFinished { jam_id, games } => {
                tracing::info!(%jam_id, %games, "Jam run finished");
            }
            IngestEvent::JamFailed { jam_id, error } => {
                tracing::error!(%jam_id, %error, "Jam run failed");
            }
        }
    }
}
