//! The ingestion coordinator.
//!
//! Decomposes a jam into game sub-tasks, schedules them under two
//! independent concurrency bounds (jam level and game level), deduplicates
//! per-game work within a run, and isolates per-task failures so that one
//! game's failure never aborts the batch.
//!
//! Fatality is positional: only container creation, the metadata
//! fetch/persist, and the entries fetch abort a jam run. Everything
//! downstream degrades or drops the affected sub-task and continues.

use tokio::task::JoinSet;

use crate::config::IngestConfig;
use crate::dedup::DedupCache;
use crate::error::AppError;
use crate::layout::Layout;
use crate::models::{DownloadEntry, GameRecord, JamEntry};
use crate::pool::AdmissionGate;
use crate::reporter::{IngestEvent, IngestReporter};
use crate::traits::{JamClient, RecordSink};

/// Result of one jam URL in a batch run.
#[derive(Debug)]
pub struct JamOutcome {
    pub url: String,
    /// `None` when the URL could not be resolved to a jam id.
    pub jam_id: Option<String>,
    pub result: Result<(), AppError>,
}

/// Orchestrates jam ingestion over injected client and sink implementations.
///
/// Generic over all external collaborators via traits, enabling dependency
/// injection and testability without real HTTP or filesystem access.
#[derive(Clone)]
pub struct IngestService<C, S, R>
where
    C: JamClient,
    S: RecordSink,
    R: IngestReporter + Clone,
{
    client: C,
    sink: S,
    reporter: R,
    layout: Layout,
    config: IngestConfig,
}

impl<C, S, R> IngestService<C, S, R>
where
    C: JamClient + 'static,
    S: RecordSink + 'static,
    R: IngestReporter + Clone + 'static,
{
    pub fn new(client: C, sink: S, reporter: R, layout: Layout, config: IngestConfig) -> Self {
        Self {
            client,
            sink,
            reporter,
            layout,
            config,
        }
    }

    /// Run every jam URL under the jam-level admission bound.
    ///
    /// Each URL is resolved and processed independently; one jam's fatal
    /// error never disturbs the others. Outcomes arrive in completion
    /// order.
    pub async fn run_batch(&self, urls: &[String], jam_workers: usize) -> Vec<JamOutcome> {
        let gate = AdmissionGate::new(jam_workers);
        let mut tasks: JoinSet<JamOutcome> = JoinSet::new();

        for url in urls {
            let url = url.trim().to_string();
            if url.is_empty() {
                continue;
            }
            let permit = match gate.admit().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!(error = %e, "Jam admission failed");
                    break;
                }
            };
            let service = self.clone();
            tasks.spawn(async move {
                let _permit = permit;
                service.run_one(url).await
            });
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => tracing::error!(error = %e, "Jam task panicked"),
            }
        }
        outcomes
    }

    async fn run_one(&self, url: String) -> JamOutcome {
        let jam_id = match self.client.resolve_jam_id(&url).await {
            Ok(jam_id) => jam_id,
            Err(e) => {
                let msg = e.to_string();
                self.reporter.report(IngestEvent::JamFailed {
                    jam_id: &url,
                    error: &msg,
                });
                return JamOutcome {
                    url,
                    jam_id: None,
                    result: Err(e),
                };
            }
        };

        let result = self.process_jam(&jam_id).await;
        if let Err(e) = &result {
            let msg = e.to_string();
            self.reporter.report(IngestEvent::JamFailed {
                jam_id: &jam_id,
                error: &msg,
            });
        }
        JamOutcome {
            url,
            jam_id: Some(jam_id),
            result,
        }
    }

    /// Ingest one jam: container, metadata, optional cover, entries feed,
    /// then a bounded fan-out of game tasks with a completion barrier.
    ///
    /// Returns `Err` only from the fatal steps; individual game failures
    /// are isolated and surface solely through the reporter.
    pub async fn process_jam(&self, jam_id: &str) -> Result<(), AppError> {
        self.reporter.report(IngestEvent::JamStarted { jam_id });

        // Container first: nothing downstream can proceed without a place
        // to write, and no network call may happen before this succeeds.
        self.sink.ensure_container(jam_id)?;

        let meta = self.client.fetch_jam_metadata(jam_id).await?;

        // Metadata is durably recorded before any game work begins.
        self.sink.write_jam_metadata(jam_id, &meta)?;
        self.reporter.report(IngestEvent::MetadataSaved {
            jam_id,
            title: &meta.title,
        });

        // Cover art is not the primary artifact; failure is non-fatal.
        if self.config.download_media {
            if let Some(cover_url) = &meta.cover_url {
                let dest = self.layout.jam_cover_path(jam_id, cover_url);
                if let Err(e) = self.client.download_binary(cover_url, &dest).await {
                    let msg = e.to_string();
                    self.reporter.report(IngestEvent::CoverFailed {
                        jam_id,
                        error: &msg,
                    });
                }
            }
        }

        let feed = self.client.fetch_entries(&meta.internal_id).await?;
        self.reporter.report(IngestEvent::EntriesFetched {
            jam_id,
            count: feed.entries.len(),
        });

        // The dedup cache lives for exactly this run and is shared by all
        // of this jam's game tasks. The game gate is per jam run too, so
        // a jam with many games cannot starve other jams.
        let dedup = DedupCache::new();
        let gate = AdmissionGate::new(self.config.game_workers);
        let mut tasks = JoinSet::new();
        let mut spawned = 0usize;

        for entry in feed.entries {
            let game_id = entry.game.id.to_string();
            if !dedup.claim(&game_id) {
                self.reporter.report(IngestEvent::GameDeduplicated {
                    jam_id,
                    game_id: &game_id,
                });
                continue;
            }

            let permit = gate.admit().await?;
            let service = self.clone();
            let jam = jam_id.to_string();
            tasks.spawn(async move {
                // Held for the task's whole lifetime; drops (and releases
                // the slot) on every exit path.
                let _permit = permit;
                service.process_game(&jam, entry).await;
            });
            spawned += 1;
        }

        // Barrier: the jam run returns only after every game task exits.
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!(%jam_id, error = %e, "Game task panicked");
            }
        }

        self.reporter.report(IngestEvent::JamFinished {
            jam_id,
            games: spawned,
        });
        Ok(())
    }

    /// One game's pipeline: assemble, enrich, persist, media, files.
    /// Stages are strictly sequential and independently recoverable;
    /// nothing here propagates to the jam-level caller.
    async fn process_game(&self, jam_id: &str, entry: JamEntry) {
        let game_id = entry.game.id.to_string();
        self.reporter.report(IngestEvent::GameStarted {
            jam_id,
            game_id: &game_id,
        });

        // Stage 1: base record straight from the feed, no network call.
        let mut record = GameRecord::from_entry(entry);

        // Stage 2: a failed detail fetch degrades the record, it never
        // discards it.
        match self.client.fetch_game_detail(jam_id, &game_id).await {
            Ok(detail) => record.apply_detail(detail),
            Err(e) => {
                let msg = e.to_string();
                self.reporter.report(IngestEvent::GameDegraded {
                    jam_id,
                    game_id: &game_id,
                    error: &msg,
                });
            }
        }

        // Stage 3: media and file stages key off the persisted record, so
        // a failed save ends this game task.
        if let Err(e) = self.sink.write_game_record(jam_id, &game_id, &record) {
            let msg = e.to_string();
            self.reporter.report(IngestEvent::GameSaveFailed {
                jam_id,
                game_id: &game_id,
                error: &msg,
            });
            return;
        }
        self.reporter.report(IngestEvent::GameSaved {
            jam_id,
            game_id: &game_id,
            enriched: record.is_enriched(),
        });

        if self.config.download_media {
            self.download_game_media(jam_id, &game_id, &record).await;
        }
        if self.config.download_games {
            self.download_game_files(jam_id, &game_id, &record).await;
        }
    }

    /// Stage 4: cover then screenshots, each item independent.
    async fn download_game_media(&self, jam_id: &str, game_id: &str, record: &GameRecord) {
        if let Some(cover_url) = &record.cover.url {
            let dest = self.layout.game_cover_path(jam_id, game_id, cover_url);
            if let Err(e) = self.client.download_binary(cover_url, &dest).await {
                let msg = e.to_string();
                self.reporter.report(IngestEvent::MediaItemFailed {
                    game_id,
                    url: cover_url,
                    error: &msg,
                });
            }
        }

        for (index, shot_url) in record.screenshots.iter().flatten().enumerate() {
            let dest = self.layout.screenshot_path(jam_id, game_id, index, shot_url);
            if let Err(e) = self.client.download_binary(shot_url, &dest).await {
                let msg = e.to_string();
                self.reporter.report(IngestEvent::MediaItemFailed {
                    game_id,
                    url: shot_url,
                    error: &msg,
                });
            }
        }
    }

    /// Stage 5: best-effort file downloads. Resolution is a permanent
    /// capability gap today, reported as "skipped", never as a failure.
    async fn download_game_files(&self, jam_id: &str, game_id: &str, record: &GameRecord) {
        let downloads: &[DownloadEntry] = record.downloads.as_deref().unwrap_or(&[]);
        if downloads.is_empty() {
            return;
        }

        let mut skipped = 0usize;
        for entry in downloads {
            match self.client.resolve_game_download(jam_id, game_id, entry).await {
                Ok(url) => {
                    // Listing filenames are untrusted; keep them inside the
                    // files directory.
                    let name = entry.filename.replace(['/', '\\'], "_");
                    let dest = self.layout.game_files_dir(jam_id, game_id).join(name);
                    if let Err(e) = self.client.download_binary(&url, &dest).await {
                        let msg = e.to_string();
                        self.reporter.report(IngestEvent::FileDownloadFailed {
                            game_id,
                            filename: &entry.filename,
                            error: &msg,
                        });
                    }
                }
                Err(e) if e.is_unsupported() => skipped += 1,
                Err(e) => {
                    let msg = e.to_string();
                    self.reporter.report(IngestEvent::FileDownloadFailed {
                        game_id,
                        filename: &entry.filename,
                        error: &msg,
                    });
                }
            }
        }

        if skipped > 0 {
            self.reporter.report(IngestEvent::FilesSkippedUnsupported {
                game_id,
                count: skipped,
            });
        }
    }
}
