//! URL shapes for the jam site.

use regex::Regex;

/// Extract the jam slug from a canonical jam URL
/// (e.g. `https://itch.io/jam/brackeys-13` → `brackeys-13`).
pub fn jam_slug_from_url(jam_url: &str) -> Option<String> {
    let re = Regex::new(r"itch\.io/jam/([^/?#]+)").expect("static regex");
    re.captures(jam_url)
        .map(|caps| caps[1].to_string())
}

pub fn jam_page_url(base: &str, jam_id: &str) -> String {
    format!("{base}/jam/{jam_id}")
}

/// The entries feed is addressed by the jam's internal numeric id,
/// not its slug.
pub fn entries_feed_url(base: &str, internal_id: &str) -> String {
    format!("{base}/jam/{internal_id}/entries.json")
}

pub fn game_rate_url(base: &str, jam_id: &str, game_id: &str) -> String {
    format!("{base}/jam/{jam_id}/rate/{game_id}")
}
