//! Text extraction: read metadata and per-page text via pdfium.
//!
//! ## Threading
//!
//! `pdfium-render` wraps the pdfium C++ library, which is synchronous. All
//! pdfium calls run inside `tokio::task::spawn_blocking`, one document per
//! blocking task, so [`crate::analyze::analyze_many`] can read several
//! agreements at once.
//!
//! ## Failure policy
//!
//! A document that cannot be opened is fatal ([`AnalyzerError`]). A single
//! page whose text layer cannot be read is not: it becomes a [`PageText`]
//! carrying a [`PageError`] and the remaining pages are still analysed.

use crate::config::PageSelection;
use crate::error::{AnalyzerError, PageError};
use crate::output::{DocumentMetadata, PageText};
use crate::progress::ProgressCallback;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Metadata and the text of every selected page.
#[derive(Debug)]
pub struct ExtractedDocument {
    pub metadata: DocumentMetadata,
    pub pages: Vec<PageText>,
}

/// Bind to a pdfium library.
///
/// Lookup order: `PDFIUM_LIB_PATH` (a library file or the directory holding
/// it), the current directory, then the system library path.
pub fn bind_pdfium() -> Result<Pdfium, AnalyzerError> {
    if let Ok(env_path) = std::env::var("PDFIUM_LIB_PATH") {
        let bound = if Path::new(&env_path).is_dir() {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&env_path))
        } else {
            Pdfium::bind_to_library(&env_path)
        };
        match bound {
            Ok(bindings) => {
                debug!("Bound pdfium from PDFIUM_LIB_PATH={}", env_path);
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => warn!(
                "PDFIUM_LIB_PATH '{}' could not be loaded ({:?}); trying defaults",
                env_path, e
            ),
        }
    }

    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| AnalyzerError::PdfiumBindingFailed(format!("{:?}", e)))
}

/// Read metadata and the text of the selected pages.
pub async fn extract_document(
    pdf_path: &Path,
    password: Option<&str>,
    selection: &PageSelection,
    progress: Option<ProgressCallback>,
) -> Result<ExtractedDocument, AnalyzerError> {
    let path = pdf_path.to_path_buf();
    let password = password.map(|s| s.to_string());
    let selection = selection.clone();

    tokio::task::spawn_blocking(move || {
        extract_document_blocking(&path, password.as_deref(), &selection, progress)
    })
    .await
    .map_err(|e| AnalyzerError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Read document metadata without touching page text.
pub async fn extract_metadata(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, AnalyzerError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(|s| s.to_string());

    tokio::task::spawn_blocking(move || {
        let pdfium = bind_pdfium()?;
        let document = open_document(&pdfium, &path, pwd.as_deref())?;
        Ok(read_metadata(&document))
    })
    .await
    .map_err(|e| AnalyzerError::Internal(format!("Metadata task panicked: {}", e)))?
}

fn extract_document_blocking(
    pdf_path: &Path,
    password: Option<&str>,
    selection: &PageSelection,
    progress: Option<ProgressCallback>,
) -> Result<ExtractedDocument, AnalyzerError> {
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, pdf_path, password)?;
    let metadata = read_metadata(&document);
    let total_pages = metadata.page_count;
    info!("PDF loaded: {} pages", total_pages);

    let indices = selection.to_indices(total_pages);
    if indices.is_empty() {
        return Err(AnalyzerError::PageOutOfRange {
            page: first_requested_page(selection),
            total: total_pages,
        });
    }
    let selected = indices.len();
    if let Some(ref cb) = progress {
        cb.on_analysis_start(selected);
    }

    let pages = document.pages();
    let mut results = Vec::with_capacity(selected);

    for idx in indices {
        let page_num = idx + 1;
        let text = pages
            .get(idx as u16)
            .map_err(|e| PageError::LoadFailed {
                page: page_num,
                detail: format!("{:?}", e),
            })
            .and_then(|page| {
                page.text()
                    .map(|t| t.all())
                    .map_err(|e| PageError::TextUnavailable {
                        page: page_num,
                        detail: format!("{:?}", e),
                    })
            });

        match text {
            Ok(text) => {
                let chars = text.chars().count();
                debug!("Page {} → {} chars", page_num, chars);
                if let Some(ref cb) = progress {
                    cb.on_page_extracted(page_num, selected, chars);
                }
                results.push(PageText {
                    page_num,
                    text,
                    error: None,
                });
            }
            Err(e) => {
                warn!("{}", e);
                if let Some(ref cb) = progress {
                    cb.on_page_error(page_num, selected, &e.to_string());
                }
                results.push(PageText {
                    page_num,
                    text: String::new(),
                    error: Some(e),
                });
            }
        }
    }

    Ok(ExtractedDocument {
        metadata,
        pages: results,
    })
}

fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, AnalyzerError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                AnalyzerError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                AnalyzerError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            AnalyzerError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

fn read_metadata(document: &PdfDocument<'_>) -> DocumentMetadata {
    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().trim().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    }
}

/// Page number reported when a selection matches nothing.
fn first_requested_page(selection: &PageSelection) -> usize {
    match selection {
        PageSelection::All => 0,
        PageSelection::Single(p) => *p,
        PageSelection::Range(start, _) => *start,
        PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_requested_page_per_selection() {
        assert_eq!(first_requested_page(&PageSelection::All), 0);
        assert_eq!(first_requested_page(&PageSelection::Single(7)), 7);
        assert_eq!(first_requested_page(&PageSelection::Range(4, 9)), 4);
        assert_eq!(first_requested_page(&PageSelection::Set(vec![9, 5])), 5);
    }
}
