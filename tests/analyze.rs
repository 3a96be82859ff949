//! Integration tests for agreement-analyzer.
//!
//! The first group drives the public API without pdfium: the heuristics via
//! `analyze_text`, report rendering, and the input errors that are raised
//! before a PDF is opened.
//!
//! The second group reads `./test_cases/sample_agreement.pdf` through pdfium
//! and is gated behind the `E2E_ENABLED` environment variable.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/path/to/pdfium cargo test --test analyze -- --nocapture

use agreement_analyzer::{
    analyze, analyze_from_bytes, analyze_many, analyze_text, analyze_to_file, inspect,
    load_clause_rules, render, AgreementSummary, AnalysisConfig, AnalysisOutput,
    AnalysisProgressCallback, AnalysisStats, AnalyzerError, DocumentMetadata, PageSelection,
    PageSeparator, ReportFormat, ReportOptions,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

const ROAD_AGREEMENT: &str = "CONTRACT AGREEMENT
Name of Work: Resurfacing of Ward 12 internal roads
This agreement is entered into on 15/04/2024 between the Municipal
Corporation of Pune and M/s Deccan Infra Builders, Pune.
The contract value is Rs. 12,50,000 inclusive of all taxes.
The scope of work includes milling, laying of bituminous concrete and road marking.
The contractor shall complete the work within 6 calendar months from the start date.
All disputes shall be referred to arbitration under the Arbitration and Conciliation Act.
This agreement may be terminated by either party with 30 days notice.
Signed by the authorized signatory of both parties.
";

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

fn wrap(summary: AgreementSummary, text: &str) -> AnalysisOutput {
    AnalysisOutput {
        source: "road.pdf".into(),
        summary,
        text: text.into(),
        pages: vec![],
        metadata: DocumentMetadata::default(),
        stats: AnalysisStats::default(),
    }
}

fn clause_present(summary: &AgreementSummary, name: &str) -> bool {
    summary
        .clauses
        .iter()
        .any(|c| c.name == name && c.present)
}

/// Library logs go to the test writer; filter with `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Skip this test if E2E_ENABLED is not set *or* no PDF file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run pdfium-backed tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        init_tracing();
        p
    }};
}

// ── Heuristics ───────────────────────────────────────────────────────────────

#[test]
fn road_agreement_fields() {
    let summary = analyze_text(ROAD_AGREEMENT, &AnalysisConfig::default());

    assert_eq!(
        summary.title.as_deref(),
        Some("Resurfacing of Ward 12 internal roads")
    );
    assert_eq!(summary.date.as_deref(), Some("15/04/2024"));
    assert_eq!(summary.amount.as_deref(), Some("12,50,000"));
    assert_eq!(summary.amount_display().as_deref(), Some("₹12,50,000"));
    assert_eq!(
        summary.parties.as_deref(),
        Some("the Municipal Corporation of Pune")
    );
    assert_eq!(
        summary.scope.as_deref(),
        Some("The scope of work includes milling, laying of bituminous concrete and road marking")
    );
    assert_eq!(summary.duration.as_deref(), Some("within 6 calendar months"));
    assert_eq!(summary.fields_found(), 6);
}

#[test]
fn road_agreement_clauses() {
    let summary = analyze_text(ROAD_AGREEMENT, &AnalysisConfig::default());

    assert_eq!(summary.clauses.len(), 6);
    assert!(clause_present(&summary, "Termination"));
    assert!(clause_present(&summary, "Dispute Resolution"));
    assert!(clause_present(&summary, "Signatures"));

    let disputes = summary
        .clauses
        .iter()
        .find(|c| c.name == "Dispute Resolution")
        .unwrap();
    assert!(disputes
        .evidence
        .as_deref()
        .unwrap()
        .contains("referred to arbitration"));
}

#[test]
fn road_agreement_paragraph() {
    let summary = analyze_text(ROAD_AGREEMENT, &AnalysisConfig::default());

    assert!(summary.paragraph.starts_with(
        "This agreement is made between the Municipal Corporation of Pune on 15/04/2024, \
         covering work such as: The scope of work includes milling, laying of bituminous \
         concrete and road marking. The total contract value is ₹12,50,000, expected to be \
         completed within 6 calendar months. It includes clauses like: "
    ));
    assert!(summary.paragraph.contains("Termination"));
    assert!(summary.paragraph.ends_with('.'));
}

#[test]
fn amount_after_rs_prefix() {
    let summary = analyze_text("Payment of Rs 5,000 shall be made.", &AnalysisConfig::default());
    assert_eq!(summary.amount.as_deref(), Some("5,000"));
}

#[test]
fn text_without_terms_uses_sentinels() {
    let summary = analyze_text(
        "Minutes of the weekly meeting. Tea was served.",
        &AnalysisConfig::default(),
    );
    assert_eq!(summary.title, None);
    assert_eq!(summary.amount, None);
    assert_eq!(summary.parties, None);
    assert!(summary.fields().iter().all(|(_, v)| v.is_none()));
}

#[test]
fn custom_clause_file_replaces_checklist() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(
        br#"[{"name": "Penalty", "keywords": ["liquidated damages"]},
            {"name": "Insurance", "keywords": ["insurance cover"]}]"#,
    )
    .unwrap();
    let rules = load_clause_rules(f.path()).unwrap();
    let config = AnalysisConfig::builder().clause_rules(rules).build().unwrap();

    let summary = analyze_text(
        "Liquidated damages of 0.5% per week of delay shall apply.",
        &config,
    );
    let names: Vec<&str> = summary.clauses.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Penalty", "Insurance"]);
    assert!(clause_present(&summary, "Penalty"));
    assert!(!clause_present(&summary, "Insurance"));
}

#[test]
fn higher_threshold_never_finds_more() {
    let loose = analyze_text(ROAD_AGREEMENT, &AnalysisConfig::default());
    let strict = analyze_text(
        ROAD_AGREEMENT,
        &AnalysisConfig::builder().match_threshold(99.0).build().unwrap(),
    );
    assert!(strict.included_clauses().len() <= loose.included_clauses().len());
    assert!(strict.fields_found() <= loose.fields_found());
}

// ── Reports ──────────────────────────────────────────────────────────────────

#[test]
fn text_report_lists_every_field_and_clause() {
    let summary = analyze_text(ROAD_AGREEMENT, &AnalysisConfig::default());
    let output = wrap(summary, ROAD_AGREEMENT);
    let report = render(&output, &ReportOptions::default()).unwrap();

    for label in [
        "Title of Project",
        "Agreement Date",
        "Parties Involved",
        "Amount",
        "Scope of Work",
        "Duration",
    ] {
        assert!(report.contains(label), "missing {label}");
    }
    assert!(report.contains("✅ Termination"));
    assert!(report.contains("🧠 Summary Paragraph:"));
    assert!(!report.contains("Extracted Text"));
}

#[test]
fn json_report_round_trips_summary() {
    let summary = analyze_text(ROAD_AGREEMENT, &AnalysisConfig::default());
    let output = wrap(summary.clone(), ROAD_AGREEMENT);
    let options = ReportOptions {
        format: ReportFormat::Json,
        include_text: true,
    };
    let json = render(&output, &options).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let back: AgreementSummary = serde_json::from_value(value["summary"].clone()).unwrap();
    assert_eq!(back, summary);
    assert_eq!(value["text"].as_str(), Some(ROAD_AGREEMENT));
}

// ── Input errors (no pdfium needed) ──────────────────────────────────────────

#[tokio::test]
async fn missing_file_is_fatal() {
    let err = analyze("/no/such/agreement.pdf", &AnalysisConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::FileNotFound { .. }));
}

#[tokio::test]
async fn bytes_that_are_not_a_pdf() {
    let err = analyze_from_bytes(b"<html>not a pdf</html>", &AnalysisConfig::default())
        .await
        .unwrap_err();
    match err {
        AnalyzerError::NotAPdf { magic, .. } => assert_eq!(&magic, b"<htm"),
        other => panic!("expected NotAPdf, got {other:?}"),
    }
}

#[tokio::test]
async fn many_inputs_fail_independently() {
    let dir = tempfile::tempdir().unwrap();
    let docx = dir.path().join("letter.docx");
    std::fs::write(&docx, b"PK\x03\x04word").unwrap();
    let inputs = vec![
        "/no/such/one.pdf".to_string(),
        docx.display().to_string(),
        "   ".to_string(),
    ];

    let results = analyze_many(&inputs, &AnalysisConfig::default()).await;
    assert_eq!(results.len(), 3);
    assert_eq!(results[1].0, inputs[1]);
    assert!(matches!(results[0].1, Err(AnalyzerError::FileNotFound { .. })));
    assert!(matches!(results[1].1, Err(AnalyzerError::NotAPdf { .. })));
    assert!(matches!(results[2].1, Err(AnalyzerError::InvalidInput { .. })));
}

#[test]
fn blocking_callers_can_drive_the_async_api() {
    let err = tokio_test::block_on(analyze("/no/such/file.pdf", &AnalysisConfig::default()))
        .unwrap_err();
    assert!(err.to_string().contains("/no/such/file.pdf"));
}

// ── pdfium-backed tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_inspect_sample_agreement() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample_agreement.pdf"));

    let meta = inspect(path.to_str().unwrap(), None, 30)
        .await
        .expect("inspect() should succeed");

    assert_eq!(meta.page_count, 2);
    assert_eq!(
        meta.title.as_deref(),
        Some("Ward 12 Road Resurfacing Agreement")
    );
    println!("Metadata: {:?}", meta);
}

#[tokio::test]
async fn test_analyze_sample_agreement() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample_agreement.pdf"));

    struct Counter {
        pages: AtomicUsize,
        completed: AtomicUsize,
    }
    impl AnalysisProgressCallback for Counter {
        fn on_page_extracted(&self, _page: usize, _total: usize, _chars: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }
        fn on_analysis_complete(&self, _total: usize, _ok: usize, _fields: usize) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
    }
    let counter = Arc::new(Counter {
        pages: AtomicUsize::new(0),
        completed: AtomicUsize::new(0),
    });

    let config = AnalysisConfig::builder()
        .progress_callback(counter.clone())
        .build()
        .unwrap();
    let output = analyze(path.to_str().unwrap(), &config)
        .await
        .expect("analyze() should succeed");

    let summary = &output.summary;
    assert_eq!(summary.date.as_deref(), Some("15/04/2024"));
    assert_eq!(summary.amount.as_deref(), Some("12,50,000"));
    assert_eq!(summary.duration.as_deref(), Some("within 6 calendar months"));
    assert!(summary
        .title
        .as_deref()
        .is_some_and(|t| t.contains("Resurfacing")));
    assert!(clause_present(summary, "Dispute Resolution"));

    assert_eq!(output.stats.total_pages, 2);
    assert_eq!(output.stats.extracted_pages, 2);
    assert_eq!(output.stats.failed_pages, 0);
    assert_eq!(counter.pages.load(Ordering::SeqCst), 2);
    assert_eq!(counter.completed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_page_selection_and_markers() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample_agreement.pdf"));

    let config = AnalysisConfig::builder()
        .pages(PageSelection::Single(2))
        .page_separator(PageSeparator::Marker)
        .build()
        .unwrap();
    let output = analyze(path.to_str().unwrap(), &config).await.unwrap();

    assert_eq!(output.pages.len(), 1);
    assert!(output.text.contains("--- Page 2 ---"));
    assert!(!output.text.contains("--- Page 1 ---"));
    assert_eq!(output.summary.date, None);
    assert!(output.summary.scope.is_some());
}

#[tokio::test]
async fn test_page_out_of_range() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample_agreement.pdf"));

    let config = AnalysisConfig::builder()
        .pages(PageSelection::Single(9))
        .build()
        .unwrap();
    let err = analyze(path.to_str().unwrap(), &config).await.unwrap_err();
    assert!(matches!(
        err,
        AnalyzerError::PageOutOfRange { page: 9, total: 2 }
    ));
}

#[tokio::test]
async fn test_analyze_to_file_and_from_bytes() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample_agreement.pdf"));
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("summary.md");

    let options = ReportOptions {
        format: ReportFormat::Markdown,
        include_text: false,
    };
    let stats = analyze_to_file(path.to_str().unwrap(), &out, &options, &AnalysisConfig::default())
        .await
        .unwrap();
    assert!(stats.fields_found >= 4);
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("# Agreement Summary"));

    let bytes = std::fs::read(&path).unwrap();
    let from_bytes = analyze_from_bytes(&bytes, &AnalysisConfig::default())
        .await
        .unwrap();
    assert_eq!(from_bytes.source, "<bytes>");
    assert_eq!(from_bytes.summary.amount.as_deref(), Some("12,50,000"));
}
