//! Rendering an [`AnalysisOutput`] as text, Markdown, JSON or HTML.
//!
//! The plain-text layout is the one shown to users on screen: a field list,
//! a ✅/❌ clause checklist and the summary paragraph. The other formats
//! carry the same content for files and downstream tooling.

use crate::error::AnalyzerError;
use crate::output::{
    or_not_specified, AgreementSummary, AnalysisOutput, AnalysisStats, DocumentMetadata, PageText,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Output format for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Emoji-labelled plain text. (default)
    #[default]
    Text,
    /// Markdown with a field table and a task-list of clauses.
    Markdown,
    /// Pretty-printed JSON of the full output.
    Json,
    /// Self-contained, unstyled HTML page.
    Html,
}

impl ReportFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
        }
    }
}

/// What to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub format: ReportFormat,
    /// Append the extracted document text after the summary.
    pub include_text: bool,
}

/// Render a report.
pub fn render(output: &AnalysisOutput, options: &ReportOptions) -> Result<String, AnalyzerError> {
    let rendered = match options.format {
        ReportFormat::Text => render_text(output, options.include_text),
        ReportFormat::Markdown => render_markdown(output, options.include_text),
        ReportFormat::Json => render_json(output, options.include_text)?,
        ReportFormat::Html => render_html(output, options.include_text),
    };
    Ok(rendered)
}

fn field_value(value: &Option<String>) -> &str {
    or_not_specified(value.as_deref())
}

// ── Text ─────────────────────────────────────────────────────────────────────

const FIELD_ICONS: [&str; 6] = ["📌", "📅", "👥", "💰", "📦", "⏱"];

/// The on-screen summary block for a summary.
pub fn summary_text(summary: &AgreementSummary) -> String {
    let mut out = String::from("📄 Agreement Summary:\n\n");
    for (icon, (label, value)) in FIELD_ICONS.iter().zip(summary.fields().iter()) {
        let _ = writeln!(out, "{icon} {label} – {}", field_value(value));
    }
    out.push_str("\n🧾 Legal Clauses:\n");
    for clause in &summary.clauses {
        let mark = if clause.present { "✅" } else { "❌" };
        let _ = writeln!(out, "{mark} {}", clause.name);
    }
    let _ = write!(out, "\n🧠 Summary Paragraph:\n{}\n", summary.paragraph);
    out
}

fn render_text(output: &AnalysisOutput, include_text: bool) -> String {
    let mut out = summary_text(&output.summary);
    if include_text {
        let _ = write!(out, "\n📑 Extracted Text:\n{}\n", output.text);
    }
    out
}

// ── Markdown ─────────────────────────────────────────────────────────────────

fn md_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// Backslash-escape characters that would open or close inline markup.
fn md_inline(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '_' | '*' | '`' | '[' | ']' | '<' | '>') {
            out.push('\\');
        }
        out.push(if c == '\n' { ' ' } else { c });
    }
    out
}

/// A backtick fence longer than any backtick run inside `body`.
fn code_fence(body: &str) -> String {
    let longest = body
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

fn render_markdown(output: &AnalysisOutput, include_text: bool) -> String {
    let summary = &output.summary;
    let mut out = String::from("# Agreement Summary\n\n");
    let _ = writeln!(out, "_Source: {}_\n", output.source);

    out.push_str("| Field | Value |\n| --- | --- |\n");
    for (label, value) in summary.fields().iter() {
        let _ = writeln!(out, "| {label} | {} |", md_cell(field_value(value)));
    }

    out.push_str("\n## Legal Clauses\n\n");
    if summary.clauses.is_empty() {
        out.push_str("_No clause rules configured._\n");
    }
    for clause in &summary.clauses {
        match (&clause.evidence, clause.present) {
            (Some(evidence), true) => {
                let _ = writeln!(
                    out,
                    "- [x] {} — _{}_",
                    md_inline(&clause.name),
                    md_inline(evidence)
                );
            }
            (None, true) => {
                let _ = writeln!(out, "- [x] {}", md_inline(&clause.name));
            }
            (_, false) => {
                let _ = writeln!(out, "- [ ] {}", md_inline(&clause.name));
            }
        }
    }

    let _ = write!(out, "\n## Summary\n\n{}\n", summary.paragraph);

    if include_text {
        let fence = code_fence(&output.text);
        let _ = write!(
            out,
            "\n## Extracted Text\n\n{fence}text\n{}\n{fence}\n",
            output.text
        );
    }
    out
}

// ── JSON ─────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    summary: &'a AgreementSummary,
    metadata: &'a DocumentMetadata,
    stats: &'a AnalysisStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pages: Option<&'a [PageText]>,
}

fn render_json(output: &AnalysisOutput, include_text: bool) -> Result<String, AnalyzerError> {
    let report = JsonReport {
        source: &output.source,
        summary: &output.summary,
        metadata: &output.metadata,
        stats: &output.stats,
        text: include_text.then_some(output.text.as_str()),
        pages: include_text.then_some(output.pages.as_slice()),
    };
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}

// ── HTML ─────────────────────────────────────────────────────────────────────

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_html(output: &AnalysisOutput, include_text: bool) -> String {
    let summary = &output.summary;
    let mut out = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(
        out,
        "<title>Agreement Summary — {}</title>\n</head>\n<body>",
        escape_html(&output.source)
    );
    out.push_str("<h1>Agreement Summary</h1>\n<table>\n");
    for (label, value) in summary.fields().iter() {
        let _ = writeln!(
            out,
            "<tr><th>{}</th><td>{}</td></tr>",
            label,
            escape_html(field_value(value))
        );
    }
    out.push_str("</table>\n<h2>Legal Clauses</h2>\n<ul>\n");
    for clause in &summary.clauses {
        let mark = if clause.present { "✅" } else { "❌" };
        let _ = writeln!(out, "<li>{mark} {}</li>", escape_html(&clause.name));
    }
    out.push_str("</ul>\n<h2>Summary</h2>\n");
    let _ = writeln!(out, "<p>{}</p>", escape_html(&summary.paragraph));
    if include_text {
        let _ = writeln!(
            out,
            "<h2>Extracted Text</h2>\n<pre>{}</pre>",
            escape_html(&output.text)
        );
    }
    out.push_str("</body>\n</html>\n");
    out
}
