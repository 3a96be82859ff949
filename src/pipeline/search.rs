//! Sentence segmentation and keyword search.
//!
//! Agreements are split into sentence-like segments on `.`; every keyword is
//! scored against every segment with [`partial_ratio`] and the single best
//! segment wins if it clears the threshold.

use super::fuzzy::partial_ratio;
use once_cell::sync::Lazy;
use regex::Regex;

/// Keywords up to this many characters must appear as a whole word;
/// fuzzy-scoring "nda" would match "and" or "calendar".
const SHORT_KEYWORD_CHARS: usize = 4;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// One sentence-like piece of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Text as it appears in the document, whitespace collapsed.
    pub text: String,
    /// Lower-cased copy used for scoring.
    pub lower: String,
}

/// A keyword hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub segment: String,
    pub keyword: String,
    pub score: f64,
}

/// Split text on `.` into trimmed, non-empty segments.
pub fn segments(text: &str) -> Vec<Segment> {
    text.split('.')
        .map(|s| RE_WHITESPACE.replace_all(s.trim(), " ").into_owned())
        .filter(|s| !s.is_empty())
        .map(|text| Segment {
            lower: text.to_lowercase(),
            text,
        })
        .collect()
}

/// Best-scoring segment over all keywords, regardless of threshold.
///
/// Keywords are tried in order and segments in document order; a later
/// candidate replaces the current best only with a strictly higher score.
/// Returns `None` when nothing scores above zero.
pub fn best_match<S: AsRef<str>>(segments: &[Segment], keywords: &[S]) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    for keyword in keywords {
        let keyword = keyword.as_ref().trim().to_lowercase();
        if keyword.is_empty() {
            continue;
        }
        let whole_word = whole_word_matcher(&keyword);
        for segment in segments {
            let score = match &whole_word {
                Some(re) => {
                    if re.is_match(&segment.lower) {
                        100.0
                    } else {
                        0.0
                    }
                }
                None => partial_ratio(&keyword, &segment.lower),
            };
            if score > best.as_ref().map_or(0.0, |h| h.score) {
                best = Some(Hit {
                    segment: segment.text.clone(),
                    keyword: keyword.clone(),
                    score,
                });
            }
        }
    }
    best
}

/// Best segment whose score is strictly above `threshold`.
pub fn smart_search<S: AsRef<str>>(
    segments: &[Segment],
    keywords: &[S],
    threshold: f64,
) -> Option<Hit> {
    best_match(segments, keywords).filter(|hit| hit.score > threshold)
}

fn whole_word_matcher(keyword: &str) -> Option<Regex> {
    if keyword.chars().count() > SHORT_KEYWORD_CHARS {
        return None;
    }
    Regex::new(&format!(r"\b{}\b", regex::escape(keyword))).ok()
}
