//! On-disk layout of a scrape run.
//!
//! One container per jam holding its metadata and optional cover asset,
//! nested per-game containers each holding the record, a media subdirectory
//! and a files subdirectory placeholder. The coordinator uses this to
//! compose download destinations; the sink uses it for record paths.

use std::path::{Path, PathBuf};

/// Path composition rooted at the configured output directory.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn jam_dir(&self, jam_id: &str) -> PathBuf {
        self.root.join("jams").join(jam_id)
    }

    pub fn jam_meta_path(&self, jam_id: &str) -> PathBuf {
        self.jam_dir(jam_id).join("meta.json")
    }

    /// Destination for the jam's cover asset, extension taken from the URL.
    pub fn jam_cover_path(&self, jam_id: &str, cover_url: &str) -> PathBuf {
        self.jam_dir(jam_id)
            .join(format!("cover{}", url_file_ext(cover_url)))
    }

    /// Line-delimited output file shared by all of a jam's records.
    pub fn games_jsonl_path(&self, jam_id: &str) -> PathBuf {
        self.jam_dir(jam_id).join("games.jsonl")
    }

    pub fn game_dir(&self, jam_id: &str, game_id: &str) -> PathBuf {
        self.jam_dir(jam_id).join("submissions").join(game_id)
    }

    pub fn game_record_path(&self, jam_id: &str, game_id: &str) -> PathBuf {
        self.game_dir(jam_id, game_id).join("game.json")
    }

    pub fn game_media_dir(&self, jam_id: &str, game_id: &str) -> PathBuf {
        self.game_dir(jam_id, game_id).join("media")
    }

    pub fn game_cover_path(&self, jam_id: &str, game_id: &str, cover_url: &str) -> PathBuf {
        self.game_media_dir(jam_id, game_id)
            .join(format!("cover{}", url_file_ext(cover_url)))
    }

    /// Screenshots are numbered from 1 in page order.
    pub fn screenshot_path(
        &self,
        jam_id: &str,
        game_id: &str,
        index: usize,
        url: &str,
    ) -> PathBuf {
        self.game_media_dir(jam_id, game_id)
            .join(format!("screenshot{}{}", index + 1, url_file_ext(url)))
    }

    /// Placeholder for game-file downloads (see the unsupported-capability
    /// handling in the coordinator).
    pub fn game_files_dir(&self, jam_id: &str, game_id: &str) -> PathBuf {
        self.game_dir(jam_id, game_id).join("files")
    }

    pub fn report_path(&self, jam_id: &str) -> PathBuf {
        self.root
            .join("reports")
            .join(format!("{jam_id}-report.md"))
    }
}

/// Extract a file extension (including the dot) from a URL's path segment.
/// Returns an empty string when the URL has none worth keeping.
pub fn url_file_ext(raw_url: &str) -> String {
    let path = match url::Url::parse(raw_url) {
        Ok(u) => u.path().to_string(),
        // Relative or otherwise unparseable: fall back to the raw string
        // with any query/fragment stripped.
        Err(_) => raw_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let name = path.rsplit('/').next().unwrap_or("");
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= 5
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{ext}")
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths_nest_under_root() {
        let layout = Layout::new("/data");
        assert_eq!(
            layout.jam_meta_path("test-jam"),
            PathBuf::from("/data/jams/test-jam/meta.json")
        );
        assert_eq!(
            layout.game_record_path("test-jam", "42"),
            PathBuf::from("/data/jams/test-jam/submissions/42/game.json")
        );
        assert_eq!(
            layout.game_media_dir("test-jam", "42"),
            PathBuf::from("/data/jams/test-jam/submissions/42/media")
        );
        assert_eq!(
            layout.report_path("test-jam"),
            PathBuf::from("/data/reports/test-jam-report.md")
        );
        assert_eq!(
            layout.games_jsonl_path("test-jam"),
            PathBuf::from("/data/jams/test-jam/games.jsonl")
        );
    }

    #[test]
    fn screenshot_paths_are_one_indexed() {
        let layout = Layout::new("/data");
        assert_eq!(
            layout.screenshot_path("j", "1", 0, "https://img.itch.zone/a.png"),
            PathBuf::from("/data/jams/j/submissions/1/media/screenshot1.png")
        );
        assert_eq!(
            layout.screenshot_path("j", "1", 2, "https://img.itch.zone/c.gif"),
            PathBuf::from("/data/jams/j/submissions/1/media/screenshot3.gif")
        );
    }

    #[test]
    fn url_file_ext_handles_common_shapes() {
        assert_eq!(url_file_ext("https://img.itch.zone/abc/cover.png"), ".png");
        assert_eq!(
            url_file_ext("https://img.itch.zone/abc/cover.jpeg?w=300"),
            ".jpeg"
        );
        assert_eq!(url_file_ext("https://img.itch.zone/abc/cover"), "");
        assert_eq!(url_file_ext("relative/path/shot.gif"), ".gif");
        assert_eq!(url_file_ext(""), "");
        // Suspiciously long or non-alphanumeric "extensions" are not extensions.
        assert_eq!(url_file_ext("https://x.example/file.tar%20gz"), "");
    }
}
