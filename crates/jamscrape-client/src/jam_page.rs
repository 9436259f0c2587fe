//! Field extraction for a jam's landing page.
//!
//! Selector mappings are page-specific and mechanical; everything here is
//! best-effort except the internal numeric id, which the entries feed
//! cannot be addressed without.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use jamscrape_core::error::AppError;
use jamscrape_core::models::{Host, JamMetadata};

fn sel(selector: &'static str) -> Selector {
    Selector::parse(selector).expect("static selector")
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parse jam metadata out of the landing page HTML.
///
/// Dates and counts are free-text on the page and are captured verbatim.
/// Fails only when the embedded internal id is missing.
pub fn parse_jam_metadata(html: &str, jam_id: &str) -> Result<JamMetadata, AppError> {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&sel(".jam_title_header"))
        .next()
        .map(element_text)
        .unwrap_or_default();

    let internal_id = extract_internal_id(&doc)?;

    let mut hosts = Vec::new();
    for link in doc.select(&sel(".jam_host_header a")) {
        hosts.push(Host {
            name: element_text(link),
            url: link.value().attr("href").unwrap_or_default().to_string(),
        });
    }

    let mut submission_count = String::new();
    let mut rating_count = String::new();
    let mut comments_count = String::new();
    for stat in doc.select(&sel(".stat_box")) {
        let label = stat
            .select(&sel(".stat_label"))
            .next()
            .map(element_text)
            .unwrap_or_default();
        let value = stat
            .select(&sel(".stat_value"))
            .next()
            .map(element_text)
            .unwrap_or_default();
        match label.to_lowercase().as_str() {
            "entries" => submission_count = value,
            "ratings" => rating_count = value,
            "comments" => comments_count = value,
            _ => {}
        }
    }

    let mut start_date = String::new();
    let mut end_date = String::new();
    let mut submission_date = String::new();
    for line in doc.select(&sel(".jam_details_widget .line")) {
        let label = line
            .select(&sel(".label"))
            .next()
            .map(element_text)
            .unwrap_or_default()
            .to_lowercase();
        let value = line
            .select(&sel(".date_countdown"))
            .next()
            .map(element_text)
            .unwrap_or_default();
        if label.contains("start") {
            start_date = value;
        } else if label.contains("end") {
            end_date = value;
        } else if label.contains("submission") {
            submission_date = value;
        }
    }

    let theme = doc
        .select(&sel(".jam_theme_display"))
        .next()
        .map(element_text)
        .unwrap_or_default();

    let cover_url = doc
        .select(&sel(".jam_cover"))
        .next()
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(str::to_string);

    Ok(JamMetadata {
        id: jam_id.to_string(),
        title,
        internal_id,
        hosts,
        start_date,
        end_date,
        submission_date,
        theme,
        submission_count,
        rating_count,
        comments_count,
        cover_url,
    })
}

/// The internal numeric id is embedded in inline script content.
fn extract_internal_id(doc: &Html) -> Result<String, AppError> {
    let re = Regex::new(r#""id":(\d+)"#).expect("static regex");
    for script in doc.select(&sel("script")) {
        let text = script.text().collect::<String>();
        if let Some(caps) = re.captures(&text) {
            return Ok(caps[1].to_string());
        }
    }
    Err(AppError::Parse(
        "internal jam id not found in page".to_string(),
    ))
}

/// Extract the internal id from the randomizer link, for jam URLs whose
/// slug cannot be read off the URL itself.
pub fn internal_id_from_randomizer(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let href = doc
        .select(&sel("a.randomizer_link"))
        .next()
        .and_then(|a| a.value().attr("href"))?;
    let re = Regex::new(r"jam_id=(\d+)").expect("static regex");
    re.captures(href).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAM_PAGE: &str = r##"
    <html><head>
      <script>window.ItchPage = {"jam":{"id":424242,"slug":"test-jam"}};</script>
    </head><body>
      <img class="jam_cover" src="https://img.itch.zone/jam-cover.png">
      <h1 class="jam_title_header">Test Jam 2025</h1>
      <div class="jam_host_header">Hosted by
        <a href="https://hosta.itch.io">Host A</a> and
        <a href="https://hostb.itch.io">Host B</a>
      </div>
      <div class="stat_box"><div class="stat_value">1,234</div><div class="stat_label">Entries</div></div>
      <div class="stat_box"><div class="stat_value">9,999</div><div class="stat_label">Ratings</div></div>
      <div class="stat_box"><div class="stat_value">456</div><div class="stat_label">Comments</div></div>
      <div class="jam_details_widget">
        <div class="line"><span class="label">Started</span> <span class="date_countdown">February 1st 2025 at 5:00 PM</span></div>
        <div class="line"><span class="label">Ends</span> <span class="date_countdown">February 8th 2025 at 5:00 PM</span></div>
        <div class="line"><span class="label">Submissions due</span> <span class="date_countdown">February 8th 2025 at 5:00 PM</span></div>
      </div>
      <div class="jam_theme_display">GRAVITY</div>
    </body></html>
    "##;

    #[test]
    fn parses_all_metadata_fields() {
        let meta = parse_jam_metadata(JAM_PAGE, "test-jam").unwrap();
        assert_eq!(meta.id, "test-jam");
        assert_eq!(meta.title, "Test Jam 2025");
        assert_eq!(meta.internal_id, "424242");
        assert_eq!(meta.hosts.len(), 2);
        assert_eq!(meta.hosts[0].name, "Host A");
        assert_eq!(meta.hosts[1].url, "https://hostb.itch.io");
        assert_eq!(meta.submission_count, "1,234");
        assert_eq!(meta.rating_count, "9,999");
        assert_eq!(meta.comments_count, "456");
        assert_eq!(meta.start_date, "February 1st 2025 at 5:00 PM");
        assert_eq!(meta.end_date, "February 8th 2025 at 5:00 PM");
        assert_eq!(meta.submission_date, "February 8th 2025 at 5:00 PM");
        assert_eq!(meta.theme, "GRAVITY");
        assert_eq!(
            meta.cover_url.as_deref(),
            Some("https://img.itch.zone/jam-cover.png")
        );
    }

    #[test]
    fn dates_are_kept_as_opaque_text() {
        let meta = parse_jam_metadata(JAM_PAGE, "test-jam").unwrap();
        // Free-form page text goes through untouched, no date parsing.
        assert!(meta.start_date.contains("at 5:00 PM"));
    }

    #[test]
    fn missing_internal_id_is_an_error() {
        let err = parse_jam_metadata("<html><body>no scripts</body></html>", "x").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn missing_optional_fields_default_empty() {
        let html = r#"<html><script>{"id":7}</script><body></body></html>"#;
        let meta = parse_jam_metadata(html, "bare").unwrap();
        assert_eq!(meta.internal_id, "7");
        assert_eq!(meta.title, "");
        assert!(meta.hosts.is_empty());
        assert!(meta.cover_url.is_none());
    }

    #[test]
    fn randomizer_link_yields_internal_id() {
        let html = r#"<html><body>
            <a class="randomizer_link" href="/randomizer?jam_id=98765">Random game</a>
        </body></html>"#;
        assert_eq!(
            internal_id_from_randomizer(html),
            Some("98765".to_string())
        );
        assert_eq!(internal_id_from_randomizer("<html></html>"), None);
    }
}
