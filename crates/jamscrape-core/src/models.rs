use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A jam host shown in the page header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Metadata scraped from a jam's landing page.
///
/// Date and count fields are opaque text — the upstream format is free-form
/// and not guaranteed stable, so they are stored verbatim and never parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JamMetadata {
    /// Human-readable jam slug (e.g. "brackeys-13").
    pub id: String,
    pub title: String,
    /// Numeric id embedded in the page, required to address the entries feed.
    pub internal_id: String,
    #[serde(default)]
    pub hosts: Vec<Host>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub submission_date: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub submission_count: String,
    #[serde(default)]
    pub rating_count: String,
    #[serde(default)]
    pub comments_count: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

/// An author or contributor of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

/// The entries feed for a jam, as served by the JSON endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntriesFeed {
    #[serde(rename = "jam_games")]
    pub entries: Vec<JamEntry>,
    #[serde(default)]
    pub generated_on: f64,
}

/// One entry row in the feed: jam-level fields plus the nested game listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JamEntry {
    pub id: u64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub contributors: Vec<Author>,
    #[serde(default)]
    pub coolness: i64,
    #[serde(default)]
    pub rating_count: i64,
    #[serde(default)]
    pub url: String,
    pub game: GameListing,
}

/// The game object nested inside a feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameListing {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_text: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub user: Author,
}

/// A game's cover image reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A downloadable file listed on a game's page.
///
/// The actual download URL requires authenticated resolution, which this
/// system does not provide — only the listing metadata is captured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadEntry {
    pub filename: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub upload_date: String,
}

/// A comment posted on a game's rate page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<u32>,
}

/// Enrichment fields scraped from a game's detail page.
///
/// This is the result contract of the detail fetch; the coordinator layers
/// it onto a [`GameRecord`] when (and only when) the fetch succeeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub downloads: Vec<DownloadEntry>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Keyed by normalized question text (lowercase, '?' stripped,
    /// spaces replaced by underscores).
    #[serde(default)]
    pub criteria_responses: BTreeMap<String, String>,
}

/// A persisted game submission.
///
/// Base fields come from the entries feed and are always present.
/// Enrichment fields are `Some` only when the detail fetch succeeded —
/// a partial record is valid and is persisted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Primary owner first, then contributors in listing order.
    pub authors: Vec<Author>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub coolness: i64,
    #[serde(default)]
    pub rating_count: i64,
    #[serde(default)]
    pub cover: CoverImage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshots: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<Vec<DownloadEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria_responses: Option<BTreeMap<String, String>>,
}

impl GameRecord {
    /// Assemble the base record from an already-fetched feed entry.
    /// No network call is involved.
    pub fn from_entry(entry: JamEntry) -> Self {
        let JamEntry {
            created_at,
            contributors,
            coolness,
            rating_count,
            game,
            ..
        } = entry;

        let mut authors = Vec::with_capacity(1 + contributors.len());
        authors.push(game.user);
        authors.extend(contributors);

        Self {
            id: game.id.to_string(),
            title: game.title,
            url: game.url,
            authors,
            platforms: game.platforms,
            created_at,
            coolness,
            rating_count,
            cover: CoverImage {
                url: game.cover,
                color: game.cover_color,
            },
            short_text: game.short_text,
            description: None,
            screenshots: None,
            downloads: None,
            comments: None,
            criteria_responses: None,
        }
    }

    /// Layer detail-page enrichment onto the base record.
    pub fn apply_detail(&mut self, detail: GameDetail) {
        self.description = detail.description;
        self.screenshots = Some(detail.screenshots);
        self.downloads = Some(detail.downloads);
        self.comments = Some(detail.comments);
        self.criteria_responses = Some(detail.criteria_responses);
    }

    /// Whether the detail fetch succeeded for this record.
    pub fn is_enriched(&self) -> bool {
        self.screenshots.is_some()
    }
}
