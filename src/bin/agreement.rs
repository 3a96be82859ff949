//! CLI binary for agreement-analyzer.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `AnalysisConfig` and prints or writes reports.

use agreement_analyzer::{
    analyze, analyze_many, analyze_to_file, inspect, load_clause_rules, render, write_report,
    AnalysisConfig, AnalysisOutput, AnalysisProgressCallback, AnalyzerError, DocumentMetadata,
    PageSelection, PageSeparator, ProgressCallback, ReportFormat, ReportOptions,
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Spinner until `on_analysis_start` reports the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Reading");
    }
}

impl AnalysisProgressCallback for CliProgressCallback {
    fn on_analysis_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Reading {total_pages} pages…"))
        ));
    }

    fn on_page_extracted(&self, page_num: usize, total: usize, chars: usize) {
        let note = if chars == 0 {
            red("no text layer")
        } else {
            dim(&format!("{chars:>6} chars"))
        };
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            note
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        let msg = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg)
        ));
        self.bar.inc(1);
    }

    fn on_analysis_complete(&self, total_pages: usize, success_count: usize, fields_found: usize) {
        let failed = total_pages.saturating_sub(success_count);
        self.bar.finish_and_clear();

        let mark = if failed == 0 { green("✔") } else { cyan("⚠") };
        eprintln!(
            "{} {}/{} pages read, {} of 6 fields found{}",
            mark,
            bold(&success_count.to_string()),
            total_pages,
            bold(&fields_found.to_string()),
            if failed > 0 {
                format!("  ({} failed)", red(&failed.to_string()))
            } else {
                String::new()
            }
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summary on screen
  agreement contract.pdf

  # Include the extracted text under the summary
  agreement --show-text contract.pdf

  # Markdown report to a file
  agreement --format markdown contract.pdf -o contract-summary.md

  # Several agreements, one JSON report each, into a directory
  agreement --format json tenders/*.pdf -o reports/

  # Only the first three pages, stricter matching
  agreement --pages 1-3 --threshold 75 contract.pdf

  # Custom clause checklist
  agreement --clauses clauses.json contract.pdf

  # Inspect PDF metadata only
  agreement --inspect-only contract.pdf

CLAUSE FILE FORMAT:
  [
    {"name": "Confidentiality", "keywords": ["confidentiality", "nda"]},
    {"name": "Penalty",         "keywords": ["liquidated damages", "penalty"]}
  ]

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  RUST_LOG                Override log filter (e.g. agreement_analyzer=debug)
  AGREEMENT_*             Every flag can also be set from the environment

NOTES:
  Only the PDF text layer is read. Scanned agreements without a text layer
  report every field as "Not specified".
"#;

/// Summarise agreement PDFs: key fields, legal clauses and a short paragraph.
#[derive(Parser, Debug)]
#[command(
    name = "agreement",
    version,
    about = "Summarise agreement PDFs: key fields, legal clauses and a short paragraph",
    long_about = "Read contract and work-order PDFs (local files or URLs), pull out the project \
title, date, amount, parties, scope of work and duration, check for standard legal clauses and \
compose a one-paragraph summary.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file paths or HTTP/HTTPS URLs.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Write the report to this file (one input) or directory (several inputs).
    #[arg(short, long, env = "AGREEMENT_OUTPUT")]
    output: Option<PathBuf>,

    /// Report format.
    #[arg(long, env = "AGREEMENT_FORMAT", value_enum, default_value = "text")]
    format: FormatArg,

    /// Append the extracted document text to the report.
    #[arg(long, env = "AGREEMENT_SHOW_TEXT")]
    show_text: bool,

    /// Page separator in the extracted text: none, marker, or custom string.
    #[arg(long, env = "AGREEMENT_SEPARATOR", default_value = "none")]
    separator: String,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "AGREEMENT_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "AGREEMENT_PASSWORD")]
    password: Option<String>,

    /// Fuzzy match threshold (0–100); a sentence must score above it.
    #[arg(long, env = "AGREEMENT_THRESHOLD", default_value_t = 60.0)]
    threshold: f64,

    /// Maximum characters kept for a title found by keyword search.
    #[arg(long, env = "AGREEMENT_TITLE_MAX_CHARS", default_value_t = 80)]
    title_max_chars: usize,

    /// JSON file replacing the built-in clause checklist.
    #[arg(long, env = "AGREEMENT_CLAUSES")]
    clauses: Option<PathBuf>,

    /// Currency symbol shown before the amount.
    #[arg(long, env = "AGREEMENT_CURRENCY", default_value = "₹")]
    currency: String,

    /// Number of documents analysed at once.
    #[arg(short, long, env = "AGREEMENT_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Print PDF metadata only, no analysis.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "AGREEMENT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "AGREEMENT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the report.
    #[arg(short, long, env = "AGREEMENT_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "AGREEMENT_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Text,
    Markdown,
    Json,
    Html,
}

impl From<FormatArg> for ReportFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Markdown => ReportFormat::Markdown,
            FormatArg::Json => ReportFormat::Json,
            FormatArg::Html => ReportFormat::Html,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; --verbose always wins.
    let single = cli.inputs.len() == 1;
    let show_progress = single && !cli.quiet && !cli.no_progress && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        for input in &cli.inputs {
            let meta = inspect(input, cli.password.as_deref(), cli.download_timeout)
                .await
                .with_context(|| format!("Failed to inspect {input}"))?;
            print_metadata(input, &meta, matches!(cli.format, FormatArg::Json))?;
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn AnalysisProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;
    let options = ReportOptions {
        format: cli.format.into(),
        include_text: cli.show_text,
    };

    // ── Run analysis ─────────────────────────────────────────────────────
    if single {
        run_single(&cli, &cli.inputs[0], &config, &options).await
    } else {
        run_many(&cli, &config, &options).await
    }
}

async fn run_single(
    cli: &Cli,
    input: &str,
    config: &AnalysisConfig,
    options: &ReportOptions,
) -> Result<()> {
    if let Some(ref output_path) = cli.output {
        let stats = analyze_to_file(input, output_path, options, config)
            .await
            .map_err(with_hint)
            .context("Analysis failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} fields, {} clauses  {}ms  →  {}",
                green("✔"),
                stats.fields_found,
                stats.clauses_found,
                stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
    } else {
        let output = analyze(input, config)
            .await
            .map_err(with_hint)
            .context("Analysis failed")?;
        print_report(&output, options)?;

        if !cli.quiet && cli.no_progress {
            eprintln!(
                "Analysed {}/{} pages in {}ms",
                output.stats.extracted_pages,
                output.stats.extracted_pages + output.stats.failed_pages,
                output.stats.total_duration_ms
            );
        }
    }
    Ok(())
}

async fn run_many(cli: &Cli, config: &AnalysisConfig, options: &ReportOptions) -> Result<()> {
    let results = analyze_many(&cli.inputs, config).await;
    let mut used_names = HashSet::new();
    let mut failures = 0usize;

    for (input, result) in results {
        let output = match result {
            Ok(output) => output,
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {:#}", red("✗"), input, with_hint(e));
                continue;
            }
        };

        match cli.output {
            Some(ref dir) => {
                let path = report_path(dir, &input, options.format, &mut used_names);
                let rendered = render(&output, options)?;
                write_report(&path, &rendered)
                    .await
                    .with_context(|| format!("Failed to write report for {input}"))?;
                if !cli.quiet {
                    eprintln!(
                        "{} {}  {} fields, {} clauses  →  {}",
                        green("✔"),
                        input,
                        output.stats.fields_found,
                        output.stats.clauses_found,
                        bold(&path.display().to_string())
                    );
                }
            }
            None => {
                println!("==> {input} <==");
                print_report(&output, options)?;
                println!();
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} documents failed", cli.inputs.len());
    }
    Ok(())
}

fn print_report(output: &AnalysisOutput, options: &ReportOptions) -> Result<()> {
    let rendered = render(output, options).context("Failed to render report")?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(rendered.as_bytes())
        .context("Failed to write to stdout")?;
    if !rendered.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}

fn print_metadata(input: &str, meta: &DocumentMetadata, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(meta).context("Failed to serialize metadata")?
        );
        return Ok(());
    }
    println!("File:         {}", input);
    if let Some(ref t) = meta.title {
        println!("Title:        {}", t);
    }
    if let Some(ref a) = meta.author {
        println!("Author:       {}", a);
    }
    if let Some(ref s) = meta.subject {
        println!("Subject:      {}", s);
    }
    println!("Pages:        {}", meta.page_count);
    println!("PDF Version:  {}", meta.pdf_version);
    if let Some(ref d) = meta.creation_date {
        println!("Created:      {}", d);
    }
    if let Some(ref p) = meta.producer {
        println!("Producer:     {}", p);
    }
    if let Some(ref c) = meta.creator {
        println!("Creator:      {}", c);
    }
    Ok(())
}

/// Attach a setup hint to errors the user can fix from the shell.
fn with_hint(e: AnalyzerError) -> anyhow::Error {
    match e {
        AnalyzerError::PdfiumBindingFailed(_) => anyhow::Error::new(e)
            .context("pdfium not found; set PDFIUM_LIB_PATH to libpdfium or its directory"),
        AnalyzerError::PasswordRequired { .. } => {
            anyhow::Error::new(e).context("pass --password or set AGREEMENT_PASSWORD")
        }
        other => anyhow::Error::new(other),
    }
}

/// `<dir>/<input stem>.<ext>`, suffixed with `-2`, `-3`, … on name clashes.
fn report_path(
    dir: &Path,
    input: &str,
    format: ReportFormat,
    used: &mut HashSet<String>,
) -> PathBuf {
    let stem = Path::new(input.trim_end_matches('/'))
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "agreement".to_string());

    let mut name = stem.clone();
    let mut n = 1;
    while !used.insert(name.clone()) {
        n += 1;
        name = format!("{stem}-{n}");
    }
    dir.join(format!("{name}.{}", format.extension()))
}

/// Map CLI args to `AnalysisConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<AnalysisConfig> {
    let pages = parse_pages(&cli.pages)?;
    let separator = parse_separator(&cli.separator);

    let mut builder = AnalysisConfig::builder()
        .match_threshold(cli.threshold)
        .title_max_chars(cli.title_max_chars)
        .currency_symbol(cli.currency.clone())
        .pages(pages)
        .page_separator(separator)
        .concurrency(cli.concurrency)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref path) = cli.clauses {
        let rules = load_clause_rules(path)
            .with_context(|| format!("Failed to load clause rules from {:?}", path))?;
        builder = builder.clause_rules(rules);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .with_context(|| format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(&p) = pages.iter().find(|&&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

/// Parse `--separator` string into `PageSeparator`.
fn parse_separator(s: &str) -> PageSeparator {
    match s.to_lowercase().as_str() {
        "none" => PageSeparator::None,
        "marker" | "page" => PageSeparator::Marker,
        _ => PageSeparator::Custom(s.to_string()),
    }
}
