// src/pipeline/summarize.rs

//! Short bullet summaries of posting descriptions.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::JobPosting;
use crate::utils::text::{collapse_whitespace, decode_entities, strip_tags, truncate_graphemes};

pub const DEFAULT_MAX_BULLETS: usize = 5;

/// Longest summary item, in graphemes.
pub const MAX_ITEM_CHARS: usize = 160;

const BULLET: &str = "• ";

static LI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li[^>]*>").expect("valid li regex"));
static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid br regex"));
static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(responsib|require|qualif|skills|experience|you will)")
        .expect("valid summary key regex")
});

/// Flatten HTML to one line, turning list items into bullet markers.
fn flatten(html: &str) -> String {
    let decoded = decode_entities(&decode_entities(html));
    let marked = LI_RE.replace_all(&decoded, BULLET);
    let broken = BR_RE.replace_all(&marked, "\n");
    collapse_whitespace(&strip_tags(&broken)).trim().to_string()
}

/// Sentences end at whitespace following a period.
fn sentences(text: &str) -> Vec<&str> {
    text.split_inclusive(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Summarize a description into at most `max_bullets` short items.
///
/// List items are used verbatim when present; otherwise sentences mentioning
/// responsibilities or requirements are preferred over the opening sentences.
pub fn summarize_html(html: &str, max_bullets: usize) -> Vec<String> {
    let text = flatten(html);
    if text.is_empty() {
        return Vec::new();
    }

    let picked: Vec<&str> = if text.contains(BULLET) {
        text.split(BULLET)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .take(max_bullets)
            .collect()
    } else {
        let all = sentences(&text);
        let keyed: Vec<&str> = all
            .iter()
            .copied()
            .filter(|s| KEY_RE.is_match(s))
            .take(max_bullets)
            .collect();
        if keyed.is_empty() {
            all.into_iter().take(max_bullets).collect()
        } else {
            keyed
        }
    };

    picked
        .into_iter()
        .map(|item| truncate_graphemes(item, MAX_ITEM_CHARS))
        .collect()
}

/// Attach a summary to a posting.
pub fn enrich_summary(job: &mut JobPosting) {
    job.summary = Some(summarize_html(&job.description_html, DEFAULT_MAX_BULLETS));
}
