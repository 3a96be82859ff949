//! Analysis entry points.
//!
//! [`analyze`] runs the whole pipeline on one PDF and returns once every
//! selected page has been read and summarised. [`analyze_many`] fans out
//! over several independent documents, and [`analyze_text`] runs only the
//! heuristics on text the caller already has.

use crate::config::AnalysisConfig;
use crate::error::AnalyzerError;
use crate::output::{AgreementSummary, AnalysisOutput, AnalysisStats, DocumentMetadata, PageText};
use crate::pipeline::report::{self, ReportOptions};
use crate::pipeline::{clauses, compose, extract, fields, input, normalize, search};
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Analyse a PDF file or URL.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input` - Local file path, `file://` path or HTTP/HTTPS URL to a PDF
/// * `config` - Analysis configuration
///
/// # Returns
/// `Ok(AnalysisOutput)` whenever the document could be opened, even if some
/// pages failed or no field was found (check `output.stats`).
///
/// # Errors
/// Returns `Err(AnalyzerError)` only for fatal errors:
/// - File not found / permission denied / download failure
/// - Not a PDF, corrupt PDF, missing or wrong password
/// - Page selection outside the document
pub async fn analyze(
    input_str: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzerError> {
    let input_str = input_str.as_ref();
    run(input_str.trim(), input_str, config).await
}

/// Analyse PDF bytes held in memory.
///
/// The bytes are written to a managed [`tempfile`] that is removed when the
/// call returns. The output's `source` is `<bytes>`.
///
/// # Example
/// ```rust,no_run
/// use agreement_analyzer::{analyze_from_bytes, AnalysisConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes: Vec<u8> = std::fs::read("agreement.pdf")?;
/// let output = analyze_from_bytes(&bytes, &AnalysisConfig::default()).await?;
/// println!("{}", output.summary.paragraph);
/// # Ok(())
/// # }
/// ```
pub async fn analyze_from_bytes(
    bytes: &[u8],
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzerError> {
    let mut tmp = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| AnalyzerError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.flush())
        .map_err(|e| AnalyzerError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();
    // `tmp` is dropped (and the file deleted) when `run` returns
    run("<bytes>", &path, config).await
}

/// Analyse a PDF and write a rendered report to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn analyze_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    options: &ReportOptions,
    config: &AnalysisConfig,
) -> Result<AnalysisStats, AnalyzerError> {
    let output = analyze(input_str, config).await?;
    let rendered = report::render(&output, options)?;
    write_report(output_path.as_ref(), &rendered).await?;
    Ok(output.stats)
}

/// Write `contents` to `path` atomically, creating parent directories.
pub async fn write_report(path: &Path, contents: &str) -> Result<(), AnalyzerError> {
    let write_failed = |e: std::io::Error| AnalyzerError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(write_failed)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(write_failed)?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Analyse several documents with at most `config.concurrency` in flight.
///
/// Documents are independent: one failing does not stop the others. Results
/// come back in input order, each paired with the input string it belongs to.
pub async fn analyze_many<I, S>(
    inputs: I,
    config: &AnalysisConfig,
) -> Vec<(String, Result<AnalysisOutput, AnalyzerError>)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let inputs: Vec<String> = inputs
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    info!(
        "Analysing {} documents (concurrency {})",
        inputs.len(),
        config.concurrency
    );

    let mut results: Vec<(usize, String, Result<AnalysisOutput, AnalyzerError>)> =
        stream::iter(inputs.into_iter().enumerate().map(|(idx, input)| async move {
            let result = analyze(&input, config).await;
            if let Err(ref e) = result {
                warn!("{}: {}", input, e);
            }
            (idx, input, result)
        }))
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;

    results.sort_by_key(|(idx, _, _)| *idx);
    results
        .into_iter()
        .map(|(_, input, result)| (input, result))
        .collect()
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    input_str: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzerError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| AnalyzerError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(analyze(input_str, config))
}

/// Read PDF metadata without extracting or analysing any text.
///
/// `download_timeout_secs` applies when `input_str` is a URL.
pub async fn inspect(
    input_str: impl AsRef<str>,
    password: Option<&str>,
    download_timeout_secs: u64,
) -> Result<DocumentMetadata, AnalyzerError> {
    let resolved = input::resolve_input(input_str.as_ref(), download_timeout_secs).await?;
    extract::extract_metadata(resolved.path(), password).await
}

/// Run the field heuristics on text that did not come from a PDF.
///
/// The text is cleaned the same way extracted page text is.
///
/// ```rust
/// use agreement_analyzer::{analyze_text, AnalysisConfig};
///
/// let summary = analyze_text("Payment of Rs 5,000 is due.", &AnalysisConfig::default());
/// assert_eq!(summary.amount.as_deref(), Some("5,000"));
/// ```
pub fn analyze_text(text: &str, config: &AnalysisConfig) -> AgreementSummary {
    summarize(&normalize::clean_text(text), config)
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn run(
    source: &str,
    input_str: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzerError> {
    let total_start = Instant::now();
    info!("Starting analysis: {}", source);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;

    // ── Step 2: Extract text ─────────────────────────────────────────────
    let extract_start = Instant::now();
    let document = extract::extract_document(
        resolved.path(),
        config.password.as_deref(),
        &config.pages,
        config.progress_callback.clone(),
    )
    .await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    info!(
        "Extracted {} pages in {}ms",
        document.pages.len(),
        extract_duration_ms
    );

    // ── Step 3: Normalise and assemble ───────────────────────────────────
    let pages: Vec<PageText> = document
        .pages
        .into_iter()
        .map(|mut page| {
            if page.error.is_none() {
                page.text = normalize::clean_text(&page.text);
            }
            page
        })
        .collect();
    let text = config.page_separator.join(
        pages
            .iter()
            .filter(|p| p.error.is_none())
            .map(|p| (p.page_num, p.text.as_str())),
    );

    if text.trim().is_empty() {
        warn!(
            "No extractable text in {}; scanned documents need OCR before analysis",
            source
        );
    }

    // ── Step 4: Heuristics ───────────────────────────────────────────────
    let analysis_start = Instant::now();
    let summary = summarize(&text, config);
    let analysis_duration_ms = analysis_start.elapsed().as_millis() as u64;

    // ── Step 5: Stats ────────────────────────────────────────────────────
    let extracted = pages.iter().filter(|p| p.error.is_none()).count();
    let stats = AnalysisStats {
        total_pages: document.metadata.page_count,
        extracted_pages: extracted,
        failed_pages: pages.len() - extracted,
        empty_pages: pages
            .iter()
            .filter(|p| p.error.is_none() && p.text.trim().is_empty())
            .count(),
        total_chars: pages.iter().map(PageText::char_count).sum(),
        fields_found: summary.fields_found(),
        clauses_found: summary.included_clauses().len(),
        extract_duration_ms,
        analysis_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Analysis complete: {} fields, {} clauses, {}ms total",
        stats.fields_found, stats.clauses_found, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_analysis_complete(pages.len(), extracted, stats.fields_found);
    }

    Ok(AnalysisOutput {
        source: source.to_string(),
        summary,
        text,
        pages,
        metadata: document.metadata,
        stats,
    })
}

/// Field extraction, clause checks and paragraph on already-cleaned text.
fn summarize(text: &str, config: &AnalysisConfig) -> AgreementSummary {
    let segments = search::segments(text);
    let threshold = config.match_threshold;
    debug!("{} segments to search", segments.len());

    let mut summary = AgreementSummary {
        title: fields::extract_title(text, &segments, threshold, config.title_max_chars),
        date: fields::extract_date(text),
        amount: fields::extract_amount(text),
        currency_symbol: config.currency_symbol.clone(),
        parties: fields::extract_parties(text),
        scope: fields::extract_scope(&segments, threshold),
        duration: fields::extract_duration(text, &segments, threshold),
        clauses: clauses::check_clauses(&segments, &config.clause_rules, threshold),
        paragraph: String::new(),
    };
    summary.paragraph = compose::summary_paragraph(&summary);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::ClauseRule;

    const WORK_ORDER: &str = "WORK ORDER\n\
        Name of Work: Desilting of storm water drains, Zone 4\n\
        This agreement is made on 2nd March 2023 between the Executive Engineer, \
        Storm Water Drains and Shree Ganesh Enterprises.\n\
        The agreed sum is INR 8,40,000 payable in two instalments.\n\
        The contractor shall finish the job within 45 days of the order.\n";

    #[test]
    fn summarize_labelled_work_order() {
        let summary = analyze_text(WORK_ORDER, &AnalysisConfig::default());
        assert_eq!(
            summary.title.as_deref(),
            Some("Desilting of storm water drains, Zone 4")
        );
        assert_eq!(summary.date.as_deref(), Some("2nd March 2023"));
        assert_eq!(summary.amount.as_deref(), Some("8,40,000"));
        assert_eq!(
            summary.parties.as_deref(),
            Some("the Executive Engineer, Storm Water Drains")
        );
        assert_eq!(summary.duration.as_deref(), Some("within 45 days"));
        assert!(summary.paragraph.contains("The total contract value is ₹8,40,000"));
    }

    #[test]
    fn empty_text_yields_sentinels() {
        let summary = analyze_text("", &AnalysisConfig::default());
        assert_eq!(summary.fields_found(), 0);
        assert!(summary.clauses.iter().all(|c| !c.present));
        assert_eq!(
            summary.paragraph,
            "No key terms could be identified in this agreement."
        );
    }

    #[test]
    fn currency_symbol_follows_config() {
        let config = AnalysisConfig::builder()
            .currency_symbol("Rs. ")
            .clause_rules(vec![ClauseRule::new("Penalty", &["liquidated damages"])])
            .build()
            .unwrap();
        let summary = analyze_text("Total cost ₹ 1,200. Liquidated damages apply.", &config);
        assert_eq!(summary.amount_display().as_deref(), Some("Rs. 1,200"));
        assert_eq!(summary.clauses.len(), 1);
        assert!(summary.clauses[0].present);
    }

    #[tokio::test]
    async fn write_report_is_atomic_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("summary.txt");
        write_report(&path, "hello\n").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
        assert!(!dir.path().join("reports").join("summary.txt.tmp").exists());
    }

    #[tokio::test]
    async fn analyze_rejects_non_pdf_before_binding_pdfium() {
        let mut f = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        f.write_all(b"PK\x03\x04 not a pdf").unwrap();
        let err = analyze(f.path().to_str().unwrap(), &AnalysisConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::NotAPdf { .. }));
    }

    #[test]
    fn analyze_sync_runs_outside_a_runtime() {
        let err = analyze_sync("/missing/deed.pdf", &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn inspect_validates_input_before_binding_pdfium() {
        let mut f = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        f.write_all(b"<html>not a pdf</html>").unwrap();
        let err = inspect(f.path().to_str().unwrap(), None, 5).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::NotAPdf { .. }));

        let err = inspect("   ", None, 5).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn analyze_many_keeps_input_order() {
        let inputs = ["/missing/a.pdf", "/missing/b.pdf", "/missing/c.pdf"];
        let config = AnalysisConfig::builder().concurrency(2).build().unwrap();
        let results = analyze_many(inputs, &config).await;
        let names: Vec<&str> = results.iter().map(|(i, _)| i.as_str()).collect();
        assert_eq!(names, inputs);
        assert!(results
            .iter()
            .all(|(_, r)| matches!(r, Err(AnalyzerError::FileNotFound { .. }))));
    }
}
