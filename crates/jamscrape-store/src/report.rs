//! Markdown report rendering over already-persisted records.

use std::fmt::Write;

use jamscrape_core::models::{GameRecord, JamMetadata};

/// Render the human-readable aggregate report for a jam.
///
/// Records are rendered in the order given; callers sort before rendering
/// so repeated runs produce identical output.
pub fn render_report(meta: &JamMetadata, records: &[GameRecord]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}\n", meta.title);
    if !meta.hosts.is_empty() {
        let hosts: Vec<&str> = meta.hosts.iter().map(|h| h.name.as_str()).collect();
        let _ = writeln!(out, "Hosted by {}\n", hosts.join(", "));
    }
    if !meta.theme.is_empty() {
        let _ = writeln!(out, "**Theme:** {}\n", meta.theme);
    }
    if !meta.start_date.is_empty() || !meta.end_date.is_empty() {
        let _ = writeln!(out, "**Runs:** {} to {}\n", meta.start_date, meta.end_date);
    }

    let _ = writeln!(out, "## Stats\n");
    let _ = writeln!(out, "- Entries: {}", display_count(&meta.submission_count));
    let _ = writeln!(out, "- Ratings: {}", display_count(&meta.rating_count));
    let _ = writeln!(out, "- Comments: {}", display_count(&meta.comments_count));
    let _ = writeln!(out, "- Records captured: {}", records.len());
    let _ = writeln!(out);

    let _ = writeln!(out, "## Submissions\n");
    for record in records {
        render_record(&mut out, record);
    }

    out
}

fn render_record(out: &mut String, record: &GameRecord) {
    let _ = writeln!(out, "### {}\n", record.title);
    let _ = writeln!(out, "- URL: {}", record.url);

    let authors: Vec<&str> = record.authors.iter().map(|a| a.name.as_str()).collect();
    if !authors.is_empty() {
        let _ = writeln!(out, "- Authors: {}", authors.join(", "));
    }
    if !record.platforms.is_empty() {
        let _ = writeln!(out, "- Platforms: {}", record.platforms.join(", "));
    }
    let _ = writeln!(out, "- Ratings: {}", record.rating_count);

    if let Some(text) = record
        .short_text
        .as_deref()
        .filter(|text| !text.is_empty())
    {
        let _ = writeln!(out, "\n> {text}");
    }

    if let Some(downloads) = record.downloads.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "\n**Files:**\n");
        for file in downloads {
            let platforms = if file.platforms.is_empty() {
                String::new()
            } else {
                format!(" [{}]", file.platforms.join(", "))
            };
            let _ = writeln!(out, "- {} ({}){platforms}", file.filename, file.size);
        }
    }

    if let Some(responses) = record.criteria_responses.as_ref().filter(|r| !r.is_empty()) {
        let _ = writeln!(out, "\n**Jam questions:**\n");
        for (key, answer) in responses {
            let _ = writeln!(out, "- **{}:** {answer}", prettify_criteria_key(key));
        }
    }

    if let Some(comments) = record.comments.as_deref() {
        let _ = writeln!(out, "\n{} comment(s) captured.", comments.len());
    }

    let _ = writeln!(out);
}

/// Turn a normalized criteria key back into readable text, capitalizing
/// every word ("how_does_it_fit_the_theme" becomes "How Does It Fit The
/// Theme").
pub fn prettify_criteria_key(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn display_count(raw: &str) -> &str {
    if raw.is_empty() { "unknown" } else { raw }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jamscrape_core::models::GameDetail;
    use jamscrape_core::testutil::{make_test_entry, make_test_metadata};

    #[test]
    fn report_covers_metadata_and_records() {
        let meta = make_test_metadata("test-jam");
        let mut enriched = GameRecord::from_entry(make_test_entry(1));
        enriched.apply_detail(GameDetail {
            criteria_responses: [(
                "how_does_it_fit_the_theme".to_string(),
                "Everything falls.".to_string(),
            )]
            .into_iter()
            .collect(),
            ..GameDetail::default()
        });
        let partial = GameRecord::from_entry(make_test_entry(2));

        let body = render_report(&meta, &[enriched, partial]);

        assert!(body.contains("### Game 1"));
        assert!(body.contains("### Game 2"));
        assert!(body.contains("- Records captured: 2"));
        assert!(body.contains("**How Does It Fit The Theme:** Everything falls."));
        // Partial records render without the enrichment sections.
        assert!(body.contains("0 comment(s) captured.") || !body.contains("### Game 2\n\n**Files"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let meta = make_test_metadata("test-jam");
        let records = vec![
            GameRecord::from_entry(make_test_entry(1)),
            GameRecord::from_entry(make_test_entry(2)),
        ];
        assert_eq!(render_report(&meta, &records), render_report(&meta, &records));
    }

    #[test]
    fn prettify_capitalizes_every_word() {
        assert_eq!(
            prettify_criteria_key("how_does_it_fit_the_theme"),
            "How Does It Fit The Theme"
        );
        assert_eq!(prettify_criteria_key("solo_or_team"), "Solo Or Team");
        assert_eq!(prettify_criteria_key("theme"), "Theme");
        assert_eq!(prettify_criteria_key(""), "");
    }

    #[test]
    fn empty_counts_render_as_unknown() {
        let mut meta = make_test_metadata("test-jam");
        meta.rating_count = String::new();
        let body = render_report(&meta, &[]);
        assert!(body.contains("- Ratings: unknown"));
    }
}
