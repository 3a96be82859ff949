//! Deterministic cleanup of text pulled from a PDF text layer.
//!
//! pdfium returns text the way it was laid out on the page: CR line endings
//! on some producers, non-breaking spaces between words, words hyphenated
//! across line breaks, zero-width characters from copy-pasted templates. The
//! heuristics downstream split on `.` and match keywords, so each of these
//! artefacts costs matches. Every rule is a pure `&str → String` pass.
//!
//! ## Rule Order
//!
//! Line endings are normalised first so the hyphenation and whitespace rules
//! only ever see `\n`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to one page (or a whole document) of raw text.
///
/// 1. Normalise line endings (CRLF / CR → LF)
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, …)
/// 3. Replace non-breaking and figure spaces with plain spaces
/// 4. Rejoin words hyphenated across a line break
/// 5. Trim trailing whitespace per line
/// 6. Collapse 3+ consecutive blank lines down to 2
/// 7. Trim trailing whitespace at the end of the text
pub fn clean_text(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = normalise_spaces(&s);
    let s = rejoin_hyphenated(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim_end().to_string()
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 3: Non-breaking spaces ──────────────────────────────────────────────

fn normalise_spaces(input: &str) -> String {
    input.replace(['\u{00A0}', '\u{2007}', '\u{202F}'], " ")
}

// ── Rule 4: Rejoin hyphenated words ─────────────────────────────────────────
//
// Only a lower-case continuation is joined: "arbi-\ntration" becomes
// "arbitration" but "Pune-\nNashik" keeps its hyphen and line break.

static RE_HYPHEN_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\p{L})-[ \t]*\n[ \t]*(\p{Ll})").unwrap());

fn rejoin_hyphenated(input: &str) -> String {
    RE_HYPHEN_BREAK.replace_all(input, "$1$2").into_owned()
}

// ── Rule 5: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 6: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}
