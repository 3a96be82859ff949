//! Result types produced by an analysis run.

use crate::error::PageError;
use crate::lexicon::NOT_SPECIFIED;
use serde::{Deserialize, Serialize};

/// Fields pulled out of an agreement, plus the clause checklist and the
/// composed summary paragraph.
///
/// Every field is `None` when the heuristics found nothing; renderers show
/// [`NOT_SPECIFIED`] in that case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgreementSummary {
    pub title: Option<String>,
    pub date: Option<String>,
    /// Figure only, e.g. `5,000`; see [`AgreementSummary::amount_display`].
    pub amount: Option<String>,
    pub currency_symbol: String,
    pub parties: Option<String>,
    pub scope: Option<String>,
    pub duration: Option<String>,
    pub clauses: Vec<ClauseCheck>,
    pub paragraph: String,
}

impl AgreementSummary {
    /// Amount with the currency symbol, e.g. `₹5,000`.
    pub fn amount_display(&self) -> Option<String> {
        self.amount
            .as_ref()
            .map(|a| format!("{}{}", self.currency_symbol, a))
    }

    /// Labelled fields in display order.
    pub fn fields(&self) -> [(&'static str, Option<String>); 6] {
        [
            ("Title of Project", self.title.clone()),
            ("Agreement Date", self.date.clone()),
            ("Parties Involved", self.parties.clone()),
            ("Amount", self.amount_display()),
            ("Scope of Work", self.scope.clone()),
            ("Duration", self.duration.clone()),
        ]
    }

    /// Number of fields that were found.
    pub fn fields_found(&self) -> usize {
        self.fields().iter().filter(|(_, v)| v.is_some()).count()
    }

    /// Names of the clauses detected in the document.
    pub fn included_clauses(&self) -> Vec<&str> {
        self.clauses
            .iter()
            .filter(|c| c.present)
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Render an optional field, falling back to the sentinel.
pub fn or_not_specified(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_SPECIFIED)
}

/// Outcome of checking one clause rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseCheck {
    pub name: String,
    pub present: bool,
    /// Best-matching sentence when present.
    pub evidence: Option<String>,
    /// Best fuzzy score seen (0–100), even when below the threshold.
    pub score: f64,
}

/// Text read from a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page_num: usize,
    pub text: String,
    pub error: Option<PageError>,
}

impl PageText {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Document-level metadata from the PDF info dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

/// Counters and timings for one analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub total_pages: usize,
    pub extracted_pages: usize,
    pub failed_pages: usize,
    pub empty_pages: usize,
    pub total_chars: usize,
    pub fields_found: usize,
    pub clauses_found: usize,
    pub extract_duration_ms: u64,
    pub analysis_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Everything produced for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// Where the document came from (path or URL as given).
    pub source: String,
    pub summary: AgreementSummary,
    /// Normalised, assembled document text the heuristics ran on.
    pub text: String,
    pub pages: Vec<PageText>,
    pub metadata: DocumentMetadata,
    pub stats: AnalysisStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_found_counts_present_values() {
        let summary = AgreementSummary {
            title: Some("Road repair".into()),
            amount: Some("5,000".into()),
            ..Default::default()
        };
        assert_eq!(summary.fields_found(), 2);
    }

    #[test]
    fn amount_display_prefixes_symbol() {
        let summary = AgreementSummary {
            amount: Some("5,000".into()),
            currency_symbol: "₹".into(),
            ..Default::default()
        };
        assert_eq!(summary.amount_display().as_deref(), Some("₹5,000"));
        assert_eq!(summary.fields()[3].1.as_deref(), Some("₹5,000"));
    }

    #[test]
    fn sentinel_for_missing_field() {
        assert_eq!(or_not_specified(None), "Not specified");
        assert_eq!(or_not_specified(Some("12/03/2024")), "12/03/2024");
    }

    #[test]
    fn included_clauses_keeps_order() {
        let check = |name: &str, present| ClauseCheck {
            name: name.into(),
            present,
            evidence: None,
            score: 0.0,
        };
        let summary = AgreementSummary {
            clauses: vec![
                check("Confidentiality", true),
                check("Termination", false),
                check("Signatures", true),
            ],
            ..Default::default()
        };
        assert_eq!(summary.included_clauses(), ["Confidentiality", "Signatures"]);
    }

    #[test]
    fn page_char_count_is_unicode_aware() {
        let page = PageText {
            page_num: 1,
            text: "₹5,000".into(),
            error: None,
        };
        assert_eq!(page.char_count(), 6);
    }
}
