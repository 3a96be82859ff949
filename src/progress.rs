//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn AnalysisProgressCallback>`] via
//! [`crate::config::AnalysisConfigBuilder::progress_callback`] to receive
//! events while the pipeline reads each page of an agreement.
//!
//! # Example
//!
//! ```rust
//! use agreement_analyzer::{AnalysisConfig, AnalysisProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     pages: AtomicUsize,
//! }
//!
//! impl AnalysisProgressCallback for CountingCallback {
//!     fn on_page_extracted(&self, page_num: usize, total_pages: usize, chars: usize) {
//!         self.pages.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} read ({} chars)", page_num, total_pages, chars);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { pages: AtomicUsize::new(0) });
//!
//! let config = AnalysisConfig::builder()
//!     .progress_callback(counter as Arc<dyn AnalysisProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the pipeline as it processes a document.
///
/// Text extraction runs on a blocking worker thread and
/// [`crate::analyze::analyze_many`] runs several documents at once, so
/// implementations must be `Send + Sync`. Every method has a no-op default.
pub trait AnalysisProgressCallback: Send + Sync {
    /// Called once the page count is known, before any text is read.
    fn on_analysis_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page's text has been read.
    ///
    /// # Arguments
    /// * `page_num`    - 1-indexed page number
    /// * `total_pages` - pages selected for this run
    /// * `chars`       - characters of text found on the page
    fn on_page_extracted(&self, page_num: usize, total_pages: usize, chars: usize) {
        let _ = (page_num, total_pages, chars);
    }

    /// Called when a page's text could not be read.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once the summary has been produced.
    ///
    /// # Arguments
    /// * `total_pages`    - pages selected for this run
    /// * `success_count`  - pages whose text was read
    /// * `fields_found`   - summary fields that are not `Not specified`
    fn on_analysis_complete(&self, total_pages: usize, success_count: usize, fields_found: usize) {
        let _ = (total_pages, success_count, fields_found);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl AnalysisProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::AnalysisConfig`].
pub type ProgressCallback = Arc<dyn AnalysisProgressCallback>;
