//! Field extraction for a game's rate page (the enrichment fetch).

use scraper::{ElementRef, Html, Selector};

use jamscrape_core::error::AppError;
use jamscrape_core::models::{Comment, DownloadEntry, GameDetail};

fn sel(selector: &'static str) -> Selector {
    Selector::parse(selector).expect("static selector")
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parse the enrichment fields out of a rate page. Every field is
/// best-effort; an empty page yields an empty (but successful) detail.
pub fn parse_game_detail(html: &str) -> Result<GameDetail, AppError> {
    let doc = Html::parse_document(html);
    let mut detail = GameDetail {
        description: doc
            .select(&sel(".formatted_description"))
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty()),
        ..GameDetail::default()
    };

    for shot in doc.select(&sel("[data-screenshot_id]")) {
        if let Some(src) = shot.value().attr("data-screenshot_src") {
            if !src.is_empty() {
                detail.screenshots.push(src.to_string());
            }
        }
    }

    for upload in doc.select(&sel(".upload_list_widget .upload")) {
        let filename = upload
            .select(&sel(".upload_name"))
            .next()
            .map(element_text)
            .unwrap_or_default();
        let size = upload
            .select(&sel(".file_size"))
            .next()
            .map(element_text)
            .unwrap_or_default();
        let platforms = upload
            .select(&sel(".download_platforms .platform_tag"))
            .map(element_text)
            .collect();
        let upload_date = upload
            .select(&sel(".upload_date"))
            .next()
            .map(element_text)
            .unwrap_or_default();
        detail.downloads.push(DownloadEntry {
            filename,
            size,
            platforms,
            upload_date,
        });
    }

    for response in doc.select(&sel(".field_responses p")) {
        let question = response
            .select(&sel("strong"))
            .next()
            .map(element_text)
            .unwrap_or_default();
        if question.is_empty() {
            continue;
        }
        // Text nodes come out in document order: question first, then the
        // answer that follows the <strong> element.
        let full = element_text(response);
        let answer = full
            .strip_prefix(question.as_str())
            .unwrap_or(&full)
            .trim()
            .to_string();
        if !answer.is_empty() {
            detail
                .criteria_responses
                .insert(normalize_criteria_key(&question), answer);
        }
    }

    for post in doc.select(&sel(".community_post")) {
        let upvotes = post
            .select(&sel(".vote_button_count"))
            .next()
            .map(element_text)
            .and_then(|text| parse_count(&text));
        detail.comments.push(Comment {
            author: post
                .select(&sel(".post_author"))
                .next()
                .map(element_text)
                .unwrap_or_default(),
            content: post
                .select(&sel(".post_body"))
                .next()
                .map(element_text)
                .unwrap_or_default(),
            timestamp: post
                .select(&sel(".post_date"))
                .next()
                .map(element_text)
                .unwrap_or_default(),
            upvotes,
        });
    }

    Ok(detail)
}

/// Criteria responses are keyed by normalized question text: lowercase,
/// '?' stripped, spaces replaced with underscores.
pub fn normalize_criteria_key(question: &str) -> String {
    question.to_lowercase().replace('?', "").replace(' ', "_")
}

/// Parse a count out of loosely formatted text ("12 upvotes", "+3").
fn parse_count(text: &str) -> Option<u32> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}
