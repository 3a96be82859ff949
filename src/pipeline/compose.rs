//! Summary paragraph composition.

use crate::output::AgreementSummary;

/// Stitch the found fields into a short prose paragraph.
///
/// Missing fields are left out rather than rendered as `Not specified`.
/// When nothing at all was found the paragraph says so.
pub fn summary_paragraph(summary: &AgreementSummary) -> String {
    let mut sentences: Vec<String> = Vec::new();

    let mut opening = None;
    if summary.parties.is_some() || summary.date.is_some() || summary.scope.is_some() {
        let mut s = String::from("This agreement");
        if let Some(parties) = &summary.parties {
            s.push_str(&format!(" is made between {parties}"));
        }
        if let Some(date) = &summary.date {
            s.push_str(&format!(" on {date}"));
        }
        if let Some(scope) = &summary.scope {
            s.push_str(&format!(", covering work such as: {scope}"));
        }
        opening = Some(s);
    }

    match (summary.amount_display(), &summary.duration) {
        (Some(amount), duration) => {
            sentences.extend(opening);
            let mut s = format!("The total contract value is {amount}");
            if let Some(d) = duration {
                s.push_str(&format!(", expected to be completed {d}"));
            }
            sentences.push(s);
        }
        (None, Some(d)) => match opening {
            Some(mut s) => {
                s.push_str(&format!(", expected to be completed {d}"));
                sentences.push(s);
            }
            None => sentences.push(format!("This agreement is expected to be completed {d}")),
        },
        (None, None) => sentences.extend(opening),
    }

    let included = summary.included_clauses();
    if sentences.is_empty() && included.is_empty() {
        return "No key terms could be identified in this agreement.".to_string();
    }

    let mut paragraph = sentences
        .iter()
        .map(|s| format!("{}.", s.trim_end_matches('.')))
        .collect::<Vec<_>>()
        .join(" ");
    if !included.is_empty() {
        if !paragraph.is_empty() {
            paragraph.push(' ');
        }
        paragraph.push_str(&format!("It includes clauses like: {}.", included.join(", ")));
    }
    paragraph
}
