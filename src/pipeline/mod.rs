//! Pipeline stages for agreement analysis.
//!
//! Each submodule implements one step. The PDF-facing stages (`input`,
//! `extract`) do I/O; everything after `normalize` is a pure function of the
//! text, which is what [`crate::analyze::analyze_text`] runs on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ normalize ──▶ search ──▶ fields ─┐
//! (URL/path) (pdfium)   (cleanup)    (segments)  clauses ─┼─▶ compose ──▶ report
//!                                     + fuzzy            ┘  (paragraph)  (txt/md/json/html)
//! ```
//!
//! 1. [`input`]     - canonicalise the user-supplied path or URL to a local PDF
//! 2. [`extract`]   - metadata and per-page text; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 3. [`normalize`] - deterministic cleanup of text-layer artefacts
//! 4. [`search`]    - sentence segmentation and best-keyword lookup, scored by
//!    [`fuzzy`]
//! 5. [`fields`]    - title, date, amount, parties, scope and duration
//! 6. [`clauses`]   - presence checklist for the configured clause rules
//! 7. [`compose`]   - the summary paragraph
//! 8. [`report`]    - rendering for the screen or a file

pub mod clauses;
pub mod compose;
pub mod extract;
pub mod fields;
pub mod fuzzy;
pub mod input;
pub mod normalize;
pub mod report;
pub mod search;
