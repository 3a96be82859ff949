//! Per-field extractors.
//!
//! Each extractor tries a precise regex first and, where a field has a
//! natural keyword, falls back to fuzzy segment search. `None` means the
//! field is not specified.

use super::search::{smart_search, Segment};
use crate::lexicon::{DURATION_KEYWORDS, SCOPE_KEYWORDS, TITLE_KEYWORDS};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:project\s*(?:name|title)|subject|work of|name of work)\b[:\-]?\s*(.*)")
        .unwrap()
});

static RE_NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-](?:\d{4}|\d{2})\b").unwrap());

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

static RE_DAY_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:day\s+of\s+)?(?:{MONTHS})\.?,?\s+\d{{4}}\b"
    ))
    .unwrap()
});

static RE_MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{MONTHS})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}\b"
    ))
    .unwrap()
});

static RE_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:₹|\brs\.?|\binr\b)\s*(\d[\d,]*(?:\.\d+)?)").unwrap());

static RE_PARTIES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\bbetween\s+(.*?)\s+and\s+").unwrap());

static RE_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bwithin\s+\d+\s+(?:\([a-z\s-]+\)\s+)?(?:calendar\s+|working\s+)?(?:days|weeks|months|years)\b",
    )
    .unwrap()
});

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn collapse(s: &str) -> String {
    RE_WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Project title from a labelled line (`Project name:`, `Subject:`,
/// `Name of work:`), else the best fuzzy hit truncated to `max_chars`.
///
/// A label alone on its line takes the next non-blank line as its value.
pub fn extract_title(
    text: &str,
    segments: &[Segment],
    threshold: f64,
    max_chars: usize,
) -> Option<String> {
    let labelled = RE_TITLE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().trim_start_matches([':', '-']).trim())
        .find(|t| !t.is_empty());
    if let Some(title) = labelled {
        return Some(collapse(title));
    }

    smart_search(segments, TITLE_KEYWORDS, threshold)
        .map(|hit| hit.segment.chars().take(max_chars).collect::<String>())
        .map(|t| t.trim_end().to_string())
}

/// First numeric date (`15/04/2024`, `1-2-24`), else the first written one
/// (`15th April 2024`, `April 15, 2024`).
pub fn extract_date(text: &str) -> Option<String> {
    if let Some(m) = RE_NUMERIC_DATE.find(text) {
        return Some(m.as_str().to_string());
    }
    [RE_DAY_MONTH_YEAR.find(text), RE_MONTH_DAY_YEAR.find(text)]
        .into_iter()
        .flatten()
        .min_by_key(|m| m.start())
        .map(|m| collapse(m.as_str()))
}

/// Contract figure following `₹`, `Rs`, `Rs.` or `INR`, without the symbol.
pub fn extract_amount(text: &str) -> Option<String> {
    RE_AMOUNT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches(',').to_string())
}

/// First party named in a `between X and Y` phrase.
pub fn extract_parties(text: &str) -> Option<String> {
    RE_PARTIES
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| collapse(m.as_str()).trim_end_matches(',').to_string())
        .filter(|p| !p.is_empty())
}

/// Sentence describing the scope of work.
pub fn extract_scope(segments: &[Segment], threshold: f64) -> Option<String> {
    smart_search(segments, SCOPE_KEYWORDS, threshold).map(|hit| hit.segment)
}

/// `within N [calendar] months`-style period, else the best completion sentence.
pub fn extract_duration(text: &str, segments: &[Segment], threshold: f64) -> Option<String> {
    if let Some(m) = RE_DURATION.find(text) {
        return Some(collapse(m.as_str()).to_lowercase());
    }
    smart_search(segments, DURATION_KEYWORDS, threshold).map(|hit| hit.segment)
}
