//! Keyword tables driving the field and clause heuristics.
//!
//! Every keyword the analyser searches for lives here. Callers can replace the clause
//! checklist through [`crate::config::AnalysisConfig::clause_rules`]; the
//! field keyword lists are fixed.

use crate::error::AnalyzerError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fallback keywords for the project title when no labelled line exists.
pub const TITLE_KEYWORDS: &[&str] = &["project", "work of", "tender"];

/// Keywords locating the scope-of-work sentence.
pub const SCOPE_KEYWORDS: &[&str] = &[
    "scope of work",
    "the work includes",
    "responsibility",
    "project includes",
];

/// Fallback keywords for the completion period.
pub const DURATION_KEYWORDS: &[&str] = &["completion", "calendar months", "time period"];

/// Sentinel shown for any field the heuristics could not fill.
pub const NOT_SPECIFIED: &str = "Not specified";

/// A named clause and the keywords that signal its presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl ClauseRule {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// The built-in clause checklist.
pub fn default_clause_rules() -> Vec<ClauseRule> {
    vec![
        ClauseRule::new("Confidentiality", &["confidentiality", "non-disclosure", "nda"]),
        ClauseRule::new("Termination", &["termination", "cancelled", "terminate"]),
        ClauseRule::new(
            "Dispute Resolution",
            &["arbitration", "dispute", "resolved", "decision of commissioner"],
        ),
        ClauseRule::new(
            "Jurisdiction",
            &["jurisdiction", "governing law", "court", "legal"],
        ),
        ClauseRule::new(
            "Force Majeure",
            &["force majeure", "natural events", "act of god", "unforeseen"],
        ),
        ClauseRule::new(
            "Signatures",
            &["signed by", "signature", "authorized signatory"],
        ),
    ]
}

/// Parse a JSON array of clause rules.
///
/// Rules with a blank name or no non-blank keywords are rejected; an empty
/// array is allowed and disables the checklist.
pub fn parse_clause_rules(json: &str) -> Result<Vec<ClauseRule>, String> {
    let mut rules: Vec<ClauseRule> = serde_json::from_str(json).map_err(|e| e.to_string())?;
    for rule in &mut rules {
        rule.name = rule.name.trim().to_string();
        rule.keywords.retain(|k| !k.trim().is_empty());
        if rule.name.is_empty() {
            return Err("clause rule with an empty name".into());
        }
        if rule.keywords.is_empty() {
            return Err(format!("clause '{}' has no keywords", rule.name));
        }
    }
    Ok(rules)
}

/// Load clause rules from a JSON file.
pub fn load_clause_rules(path: &Path) -> Result<Vec<ClauseRule>, AnalyzerError> {
    let raw = std::fs::read_to_string(path).map_err(|e| AnalyzerError::InvalidClauseRules {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    parse_clause_rules(&raw).map_err(|detail| AnalyzerError::InvalidClauseRules {
        path: path.to_path_buf(),
        detail,
    })
}
