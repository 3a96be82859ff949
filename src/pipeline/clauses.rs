//! Clause checklist.

use super::search::{best_match, Segment};
use crate::lexicon::ClauseRule;
use crate::output::ClauseCheck;
use tracing::debug;

/// Check every rule against the document segments.
///
/// A clause is present when its best keyword hit scores strictly above
/// `threshold`. The best score is kept even for absent clauses so callers
/// can see how close a miss was.
pub fn check_clauses(segments: &[Segment], rules: &[ClauseRule], threshold: f64) -> Vec<ClauseCheck> {
    rules
        .iter()
        .map(|rule| {
            let hit = best_match(segments, &rule.keywords);
            let score = hit.as_ref().map_or(0.0, |h| h.score);
            let present = score > threshold;
            debug!(
                clause = %rule.name,
                score,
                present,
                keyword = hit.as_ref().map(|h| h.keyword.as_str()).unwrap_or(""),
                "clause checked"
            );
            ClauseCheck {
                name: rule.name.clone(),
                present,
                evidence: hit.filter(|_| present).map(|h| h.segment),
                score,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::default_clause_rules;
    use crate::pipeline::search::segments;

    fn find<'a>(checks: &'a [ClauseCheck], name: &str) -> &'a ClauseCheck {
        checks.iter().find(|c| c.name == name).unwrap()
    }

    #[test]
    fn detects_listed_clauses() {
        let text = "Any dispute shall be referred to arbitration. \
                    The employer may terminate this contract. \
                    Signed by the authorized signatory.";
        let checks = check_clauses(&segments(text), &default_clause_rules(), 60.0);

        assert_eq!(checks.len(), 6);
        assert!(find(&checks, "Dispute Resolution").present);
        assert!(find(&checks, "Termination").present);
        let signatures = find(&checks, "Signatures");
        assert!(signatures.present);
        assert_eq!(
            signatures.evidence.as_deref(),
            Some("Signed by the authorized signatory")
        );
    }

    #[test]
    fn absent_clause_has_no_evidence() {
        let rules = vec![ClauseRule::new("Force Majeure", &["force majeure"])];
        let checks = check_clauses(&segments("Payment shall be made monthly."), &rules, 60.0);
        assert!(!checks[0].present);
        assert!(checks[0].evidence.is_none());
        assert!(checks[0].score < 60.0);
    }

    #[test]
    fn custom_rules_are_honoured() {
        let rules = vec![ClauseRule::new("Warranty", &["defect liability"])];
        let checks = check_clauses(
            &segments("The defect liability period is twelve months."),
            &rules,
            60.0,
        );
        assert!(checks[0].present);
        assert_eq!(checks[0].score, 100.0);
    }

    #[test]
    fn empty_document_has_no_clauses() {
        let checks = check_clauses(&[], &default_clause_rules(), 60.0);
        assert!(checks.iter().all(|c| !c.present && c.score == 0.0));
    }
}
