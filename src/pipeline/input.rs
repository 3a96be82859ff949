//! Input resolution: normalise a user-supplied path or URL to a local file.
//!
//! pdfium opens documents from a file-system path, so URLs are downloaded
//! into a `TempDir` that is cleaned up when the [`ResolvedInput`] is dropped.
//! The `%PDF` magic bytes are checked up front so a mistyped path to a Word
//! document produces [`AnalyzerError::NotAPdf`] rather than a pdfium error.

use crate::error::AnalyzerError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// A local path, or a downloaded temp file kept alive with its directory.
#[derive(Debug)]
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; the PDF lives in a temp directory kept alive here.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like an HTTP(S) URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local PDF file path.
///
/// `file://` prefixes are accepted for local files.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, AnalyzerError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AnalyzerError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input.strip_prefix("file://").unwrap_or(input))
    }
}

/// Validate a local file: it must exist, be a readable file and start with `%PDF`.
fn resolve_local(path_str: &str) -> Result<ResolvedInput, AnalyzerError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(AnalyzerError::FileNotFound { path });
    }
    if path.is_dir() {
        return Err(AnalyzerError::InvalidInput {
            input: path_str.to_string(),
        });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            let read = f.read(&mut magic).unwrap_or(0);
            check_magic(&path, &magic[..read])?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(AnalyzerError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(AnalyzerError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Error unless `head` begins with the PDF magic bytes.
fn check_magic(path: &Path, head: &[u8]) -> Result<(), AnalyzerError> {
    if head.starts_with(b"%PDF") {
        return Ok(());
    }
    let mut magic = [0u8; 4];
    let n = head.len().min(4);
    magic[..n].copy_from_slice(&head[..n]);
    Err(AnalyzerError::NotAPdf {
        path: path.to_path_buf(),
        magic,
    })
}

/// Download a URL to a temporary directory and return the path.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, AnalyzerError> {
    info!("Downloading PDF from: {}", url);

    let download_failed = |reason: String| AnalyzerError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| download_failed(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            AnalyzerError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            download_failed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(download_failed(format!("HTTP {}", response.status())));
    }

    let filename = filename_from_url(url);
    let temp_dir = TempDir::new().map_err(|e| AnalyzerError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| download_failed(e.to_string()))?;

    check_magic(&file_path, &bytes)?;

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| AnalyzerError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded {} bytes to: {}", bytes.len(), file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Last path segment of the URL if it looks like a file name.
fn filename_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|last| !last.is_empty() && last.contains('.'))
        .unwrap_or_else(|| "downloaded.pdf".to_string())
}
