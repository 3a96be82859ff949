//! Configuration types for agreement analysis.
//!
//! All analysis behaviour is controlled through [`AnalysisConfig`], built via
//! its [`AnalysisConfigBuilder`].

use crate::error::AnalyzerError;
use crate::lexicon::{default_clause_rules, ClauseRule};
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for analysing one or more agreements.
///
/// # Example
/// ```rust
/// use agreement_analyzer::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .match_threshold(70.0)
///     .title_max_chars(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.title_max_chars, 60);
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Minimum fuzzy score a sentence must exceed to count as a hit. Range: 0–100. Default: 60.
    ///
    /// Lower values find more fields and more clauses at the cost of false
    /// positives; 60 keeps single-word keywords like "court" from matching
    /// unrelated short sentences.
    pub match_threshold: f64,

    /// Maximum characters kept for a title found by fuzzy search. Default: 80.
    ///
    /// Labelled titles (`Project name: …`) are never truncated.
    pub title_max_chars: usize,

    /// Clause checklist. Default: [`default_clause_rules`].
    pub clause_rules: Vec<ClauseRule>,

    /// Symbol prefixed to the amount when rendering. Default: "₹".
    pub currency_symbol: String,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// Separator between pages in the assembled text. Default: None.
    pub page_separator: PageSeparator,

    /// Maximum documents analysed at once by [`crate::analyze::analyze_many`]. Default: 4.
    pub concurrency: usize,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional progress callback invoked during extraction.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            match_threshold: 60.0,
            title_max_chars: 80,
            clause_rules: default_clause_rules(),
            currency_symbol: "₹".to_string(),
            password: None,
            pages: PageSelection::default(),
            page_separator: PageSeparator::default(),
            concurrency: 4,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("match_threshold", &self.match_threshold)
            .field("title_max_chars", &self.title_max_chars)
            .field("clause_rules", &self.clause_rules.len())
            .field("currency_symbol", &self.currency_symbol)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pages", &self.pages)
            .field("page_separator", &self.page_separator)
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn AnalysisProgressCallback>"),
            )
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl fmt::Debug for AnalysisConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl AnalysisConfigBuilder {
    pub fn match_threshold(mut self, threshold: f64) -> Self {
        self.config.match_threshold = threshold.clamp(0.0, 100.0);
        self
    }

    pub fn title_max_chars(mut self, n: usize) -> Self {
        self.config.title_max_chars = n;
        self
    }

    pub fn clause_rules(mut self, rules: Vec<ClauseRule>) -> Self {
        self.config.clause_rules = rules;
        self
    }

    pub fn currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.config.currency_symbol = symbol.into();
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn page_separator(mut self, sep: PageSeparator) -> Self {
        self.config.page_separator = sep;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, AnalyzerError> {
        let c = &self.config;
        if !c.match_threshold.is_finite() {
            return Err(AnalyzerError::InvalidConfig(
                "Match threshold must be a number between 0 and 100".into(),
            ));
        }
        if c.title_max_chars == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "Title length limit must be ≥ 1".into(),
            ));
        }
        if let Some(rule) = c.clause_rules.iter().find(|r| r.keywords.is_empty()) {
            return Err(AnalyzerError::InvalidConfig(format!(
                "Clause '{}' has no keywords",
                rule.name
            )));
        }
        if let PageSelection::Range(start, end) = c.pages {
            if start == 0 || start > end {
                return Err(AnalyzerError::InvalidConfig(format!(
                    "Invalid page range {start}-{end}"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF to read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Read all pages (default).
    #[default]
    All,
    /// Read a single page (1-indexed).
    Single(usize),
    /// Read a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Read specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// How pages are joined in the assembled document text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSeparator {
    /// Pages joined with a single newline. (default)
    #[default]
    None,
    /// `--- Page N ---` banner before each page.
    Marker,
    /// Custom string inserted between pages.
    Custom(String),
}

impl PageSeparator {
    /// Join `(page_num, text)` pairs (1-indexed page numbers) into one string.
    pub fn join<'a>(&self, pages: impl IntoIterator<Item = (usize, &'a str)>) -> String {
        let mut out = String::new();
        for (i, (page_num, text)) in pages.into_iter().enumerate() {
            match self {
                PageSeparator::None => {
                    if i > 0 {
                        out.push('\n');
                    }
                }
                PageSeparator::Marker => {
                    out.push_str(&format!("\n\n--- Page {page_num} ---\n\n"));
                }
                PageSeparator::Custom(s) => {
                    if i > 0 {
                        out.push_str(&format!("\n\n{s}\n\n"));
                    }
                }
            }
            out.push_str(text);
        }
        out
    }
}
