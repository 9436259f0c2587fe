/// Knobs the coordinator consumes. Network-level settings (user agent,
/// delay, timeout) belong to the client; output settings to the sink.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Bound on simultaneous game tasks within one jam run.
    pub game_workers: usize,
    /// Download cover images and screenshots.
    pub download_media: bool,
    /// Attempt game-file downloads (currently always skipped as
    /// unsupported; see the coordinator's file stage).
    pub download_games: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            game_workers: 2,
            download_media: true,
            download_games: false,
        }
    }
}
