//! PDF text-layer extraction via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which keeps thread-local
//! state and is not safe to call from async contexts. Extraction runs on
//! tokio's blocking pool so the worker threads stay free.
//!
//! ## Mapping
//!
//! pdfium exposes a page as a flat list of page objects. Every text object
//! becomes one [`Block`]; each line of its text becomes one [`Line`] holding a
//! single [`Span`] coloured with the object's fill colour. Non-text objects
//! (paths, images, forms) are skipped.

use crate::document::{Block, Document, Line, Page, Span};
use crate::error::Mantra2AudioError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a pdfium shared library, or a directory holding one.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Check that `path` exists, is readable and starts with the `%PDF` magic bytes.
///
/// Callers get a meaningful error here rather than an opaque pdfium failure.
pub fn validate_pdf(path: &Path) -> Result<(), Mantra2AudioError> {
    if !path.exists() {
        return Err(Mantra2AudioError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
                return Err(Mantra2AudioError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Mantra2AudioError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(Mantra2AudioError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Validated PDF: {}", path.display());
    Ok(())
}

/// `*.pdf` files (case-insensitive) directly inside `dir`, sorted by file name.
pub fn collect_pdf_files(dir: &Path) -> Result<Vec<PathBuf>, Mantra2AudioError> {
    if !dir.is_dir() {
        return Err(Mantra2AudioError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => Mantra2AudioError::PermissionDenied {
            path: dir.to_path_buf(),
        },
        _ => Mantra2AudioError::DirectoryNotFound {
            path: dir.to_path_buf(),
        },
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_pdf_extension(p))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Extract the styled text layer of a PDF.
///
/// Runs inside `spawn_blocking` since pdfium operations are blocking.
pub async fn extract_document(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Document, Mantra2AudioError> {
    let path = pdf_path.to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || extract_document_blocking(&path, password.as_deref()))
        .await
        .map_err(|e| Mantra2AudioError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Bind to pdfium: `PDFIUM_LIB_PATH` first, then the system library.
pub fn bind_pdfium() -> Result<Pdfium, Mantra2AudioError> {
    if let Ok(configured) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        let configured = PathBuf::from(configured);
        let lib_path = if configured.is_dir() {
            Pdfium::pdfium_platform_library_name_at_path(&configured)
        } else {
            configured
        };
        let bindings = Pdfium::bind_to_library(&lib_path).map_err(|e| {
            Mantra2AudioError::PdfiumBindingFailed(format!("{}: {:?}", lib_path.display(), e))
        })?;
        return Ok(Pdfium::new(bindings));
    }

    let bindings = Pdfium::bind_to_system_library()
        .map_err(|e| Mantra2AudioError::PdfiumBindingFailed(format!("{:?}", e)))?;
    Ok(Pdfium::new(bindings))
}

fn extract_document_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Document, Mantra2AudioError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                Mantra2AudioError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                Mantra2AudioError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            Mantra2AudioError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let mut out = Document::default();
    for idx in 0..total_pages {
        let page = pages
            .get(idx as u16)
            .map_err(|e| Mantra2AudioError::ExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;

        let mut blocks = Vec::new();
        for object in page.objects().iter() {
            let Some(text_object) = object.as_text_object() else {
                continue;
            };
            let color = match text_object.fill_color() {
                Ok(c) => Span::pack_rgb(c.red(), c.green(), c.blue()),
                Err(e) => {
                    debug!("Page {}: unreadable fill colour, skipping: {:?}", idx + 1, e);
                    continue;
                }
            };
            if let Some(block) = text_block(&text_object.text(), color) {
                blocks.push(block);
            }
        }

        debug!("Page {} → {} text blocks", idx + 1, blocks.len());
        out.pages.push(Page { blocks });
    }

    Ok(out)
}

/// One block per text object, one single-span line per text line.
fn text_block(text: &str, color: u32) -> Option<Block> {
    let lines: Vec<Line> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| Line {
            spans: vec![Span::new(l, color)],
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(Block { lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn validate_rejects_missing_file() {
        let err = validate_pdf(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, Mantra2AudioError::FileNotFound { .. }));
    }

    #[test]
    fn validate_rejects_non_pdf() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello world").unwrap();
        let err = validate_pdf(f.path()).unwrap_err();
        match err {
            Mantra2AudioError::NotAPdf { magic, .. } => assert_eq!(&magic, b"hell"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_tiny_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%P").unwrap();
        assert!(matches!(
            validate_pdf(f.path()),
            Err(Mantra2AudioError::NotAPdf { .. })
        ));
    }

    #[test]
    fn validate_accepts_pdf_magic() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.7\n").unwrap();
        assert!(validate_pdf(f.path()).is_ok());
    }

    #[test]
    fn collects_pdfs_sorted_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "A.PDF", "c.txt", "a2.Pdf"] {
            std::fs::write(dir.path().join(name), b"%PDF").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let files = collect_pdf_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A.PDF", "a2.Pdf", "b.pdf"]);
    }

    #[test]
    fn collect_rejects_missing_dir() {
        assert!(matches!(
            collect_pdf_files(Path::new("/no/such/dir")),
            Err(Mantra2AudioError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn text_block_splits_lines_and_drops_blank() {
        let block = text_block("oṃ vajra\n\n  \nsvāhā", 0).unwrap();
        assert_eq!(block.lines.len(), 2);
        assert_eq!(block.lines[1].spans[0].text, "svāhā");
        assert!(text_block("  \n", 0).is_none());
    }
}
