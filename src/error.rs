//! Error types for the agreement-analyzer library.
//!
//! Two error types for two failure modes:
//!
//! * [`AnalyzerError`] - **Fatal**: the document cannot be analysed at all
//!   (bad input file, wrong password, pdfium unavailable). Returned as
//!   `Err(AnalyzerError)` from the top-level `analyze*` functions.
//!
//! * [`PageError`] - **Non-fatal**: one page's text layer could not be read
//!   but the rest of the document is fine. Stored inside
//!   [`crate::output::PageText`]; the heuristics simply run on less text.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the agreement-analyzer library.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("Failed to extract text from '{path}': the PDF is corrupt ({detail})")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// None of the selected page numbers exist in the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the report file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A clause-rule file could not be read or parsed.
    #[error("Invalid clause rules in '{path}': {detail}")]
    InvalidClauseRules { path: PathBuf, detail: String },

    /// The analysis output could not be serialised.
    #[error("Failed to serialise report: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Text extraction needs the pdfium shared library. You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or its directory).\n\
  • Place libpdfium next to the working directory.\n\
  • Install pdfium system-wide so the dynamic loader can find it.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// pdfium could not load the page at all.
    #[error("Page {page}: failed to load: {detail}")]
    LoadFailed { page: usize, detail: String },

    /// The page loaded but its text layer could not be read.
    #[error("Page {page}: text layer unreadable: {detail}")]
    TextUnavailable { page: usize, detail: String },
}

impl PageError {
    /// 1-indexed page number the error refers to.
    pub fn page(&self) -> usize {
        match self {
            PageError::LoadFailed { page, .. } | PageError::TextUnavailable { page, .. } => *page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_pdf_display_mentions_extraction() {
        let e = AnalyzerError::CorruptPdf {
            path: PathBuf::from("deal.pdf"),
            detail: "bad xref".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Failed to extract text"), "got: {msg}");
        assert!(msg.contains("bad xref"));
    }

    #[test]
    fn page_out_of_range_display() {
        let e = AnalyzerError::PageOutOfRange { page: 9, total: 4 };
        assert!(e.to_string().contains("4 pages"));
    }

    #[test]
    fn page_error_reports_page_number() {
        let e = PageError::TextUnavailable {
            page: 3,
            detail: "no text layer".into(),
        };
        assert_eq!(e.page(), 3);
        assert!(e.to_string().starts_with("Page 3"));
    }

    #[test]
    fn serde_error_converts() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: AnalyzerError = bad.into();
        assert!(matches!(e, AnalyzerError::Serialization(_)));
    }
}
