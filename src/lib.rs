//! # agreement-analyzer
//!
//! Summarise contract and work-order PDFs: pull out the project title, date,
//! amount, parties, scope of work and duration, check which standard legal
//! clauses are present, and write a short prose summary.
//!
//! ## How it works
//!
//! Agreements issued by public bodies and contractors follow loose templates
//! rather than a fixed schema, so there is nothing to parse. Instead the text
//! layer is split into sentence-like segments and each field is located by
//! a labelled-line regex or, failing that, by fuzzy keyword search: the
//! best-scoring segment above a threshold wins, otherwise the field is
//! reported as `Not specified`.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     resolve local file or download from URL
//!  ├─ 2. Extract   metadata + per-page text via pdfium (spawn_blocking)
//!  ├─ 3. Clean     line endings, invisible chars, hyphenation, blank lines
//!  ├─ 4. Search    sentence segments scored by fuzzy partial match
//!  ├─ 5. Fields    title, date, amount, parties, scope, duration
//!  ├─ 6. Clauses   confidentiality, termination, disputes, …
//!  ├─ 7. Compose   one-paragraph summary
//!  └─ 8. Report    text / Markdown / JSON / HTML
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agreement_analyzer::{analyze, render, AnalysisConfig, ReportOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::default();
//!     let output = analyze("agreement.pdf", &config).await?;
//!     print!("{}", render(&output, &ReportOptions::default())?);
//!     Ok(())
//! }
//! ```
//!
//! Text that is already in memory skips pdfium entirely:
//!
//! ```rust
//! use agreement_analyzer::{analyze_text, AnalysisConfig};
//!
//! let summary = analyze_text(
//!     "This contract is between the Water Board and Sai Pipes. Payable: Rs 5,000.",
//!     &AnalysisConfig::default(),
//! );
//! assert_eq!(summary.amount.as_deref(), Some("5,000"));
//! assert_eq!(summary.parties.as_deref(), Some("the Water Board"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `agreement` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! agreement-analyzer = { version = "0.1", default-features = false }
//! ```
//!
//! ## pdfium
//!
//! The pdfium shared library is loaded at run time. Set `PDFIUM_LIB_PATH`
//! to the library file or its directory; otherwise the current directory and
//! then the system library path are searched.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{
    analyze, analyze_from_bytes, analyze_many, analyze_sync, analyze_text, analyze_to_file,
    inspect, write_report,
};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, PageSelection, PageSeparator};
pub use error::{AnalyzerError, PageError};
pub use lexicon::{default_clause_rules, load_clause_rules, ClauseRule, NOT_SPECIFIED};
pub use output::{
    AgreementSummary, AnalysisOutput, AnalysisStats, ClauseCheck, DocumentMetadata, PageText,
};
pub use pipeline::report::{render, ReportFormat, ReportOptions};
pub use progress::{AnalysisProgressCallback, NoopProgressCallback, ProgressCallback};
