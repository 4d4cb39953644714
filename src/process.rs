//! Processing entry points: one PDF, PDF bytes, a parsed document, a folder.
//!
//! A document is handled strictly in order. The whole text layer is
//! segmented first, then every passage is cleaned, filtered, written to the
//! report and synthesized one at a time. A failed synthesis is recorded on
//! its passage and the loop moves on; a failed extraction aborts that
//! document only.

use crate::config::ProcessingConfig;
use crate::document::Document;
use crate::error::{Mantra2AudioError, PassageError};
use crate::output::{
    BatchOutput, DocumentFailure, DocumentOutput, InspectReport, InspectedPassage,
    PassageResult, ProcessingStats,
};
use crate::pipeline::{clean_passage, extract, phonetic, segment};
use crate::report::ReportWriter;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Extract mantra passages from a PDF and synthesize one audio file per passage.
///
/// The report and audio files are written directly into `output_dir`, which
/// is created on demand.
///
/// # Returns
/// `Ok(DocumentOutput)` even when some passages failed to synthesize
/// (check `output.stats.audio_failed`) or when nothing was found.
///
/// # Errors
/// Returns `Err(Mantra2AudioError)` only for fatal errors:
/// - File not found, unreadable, or not a PDF
/// - Corrupt or encrypted PDF, pdfium unavailable
/// - Report or output directory not writable
pub async fn process_pdf(
    pdf_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ProcessingConfig,
) -> Result<DocumentOutput, Mantra2AudioError> {
    run_pdf(pdf_path.as_ref(), output_dir.as_ref(), config, ReportMode::Replace).await
}

async fn run_pdf(
    pdf_path: &Path,
    output_dir: &Path,
    config: &ProcessingConfig,
    report_mode: ReportMode,
) -> Result<DocumentOutput, Mantra2AudioError> {
    info!("Processing {}", pdf_path.display());

    extract::validate_pdf(pdf_path)?;
    let document = extract::extract_document(pdf_path, config.password.as_deref()).await?;

    run_document(&document, &display_name(pdf_path), output_dir, config, report_mode).await
}

/// Synchronous wrapper around [`process_pdf`].
///
/// Creates a temporary tokio runtime internally.
pub fn process_pdf_sync(
    pdf_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ProcessingConfig,
) -> Result<DocumentOutput, Mantra2AudioError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Mantra2AudioError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(process_pdf(pdf_path, output_dir, config))
}

/// Process PDF bytes held in memory.
///
/// pdfium needs a file path, so the bytes go to a managed [`tempfile`] that
/// is removed when this returns. `source_name` labels the document in logs
/// and in the returned output.
pub async fn process_pdf_bytes(
    bytes: &[u8],
    source_name: &str,
    output_dir: impl AsRef<Path>,
    config: &ProcessingConfig,
) -> Result<DocumentOutput, Mantra2AudioError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| Mantra2AudioError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| Mantra2AudioError::Internal(format!("tempfile write: {e}")))?;

    extract::validate_pdf(tmp.path())?;
    let document = extract::extract_document(tmp.path(), config.password.as_deref()).await?;
    process_document(&document, source_name, output_dir, config).await
}

/// Run segmentation, cleaning, reporting and synthesis over a parsed document.
///
/// This is the whole pipeline minus pdfium, so callers with their own text
/// extraction (or tests) can drive it directly.
pub async fn process_document(
    document: &Document,
    source: &str,
    output_dir: impl AsRef<Path>,
    config: &ProcessingConfig,
) -> Result<DocumentOutput, Mantra2AudioError> {
    run_document(document, source, output_dir.as_ref(), config, ReportMode::Replace).await
}

/// Whether a document's report replaces an existing file or extends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportMode {
    Replace,
    Append,
}

async fn run_document(
    document: &Document,
    source: &str,
    output_dir: &Path,
    config: &ProcessingConfig,
    report_mode: ReportMode,
) -> Result<DocumentOutput, Mantra2AudioError> {
    let start = Instant::now();

    let mut stats = ProcessingStats {
        pages: document.page_count(),
        spans: document.span_count(),
        ink_spans: count_ink_spans(document, config.ink_color),
        ..Default::default()
    };

    let passages = segment::segment(document, config.ink_color);
    let total = passages.len();
    stats.passages_found = total;
    info!(
        "{}: {} pages, {} spans ({} ink), {} passages found",
        source, stats.pages, stats.spans, stats.ink_spans, total
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_document_start(source, total);
    }

    let mut results = Vec::new();
    let mut report_path = None;

    if total == 0 {
        warn!("{}: no mantra passages found; nothing written", source);
    } else {
        let synthesizer = if config.synthesize_audio {
            Some(config.resolve_synthesizer()?)
        } else {
            None
        };
        let report_file = output_dir.join(&config.report_file_name);
        let mut report = match report_mode {
            ReportMode::Replace => ReportWriter::new(report_file),
            ReportMode::Append => ReportWriter::appending(report_file),
        };
        let mut seen_tokens = HashSet::new();

        for (i, passage) in passages.iter().enumerate() {
            let index = i + 1;

            let Some(cleaned) = clean_passage(passage, config.min_body_chars) else {
                stats.passages_filtered += 1;
                warn!(
                    "{}: passage {} ({}) filtered out: body too short or only noise",
                    source, index, passage.raw_title
                );
                if let Some(ref cb) = config.progress_callback {
                    cb.on_passage_skipped(index, total, "body too short or only noise");
                }
                continue;
            };

            if let Some(ref cb) = config.progress_callback {
                cb.on_passage_start(index, total, &cleaned.title);
            }

            if report.records() == 0 {
                ensure_dir(output_dir).await?;
            }
            if !seen_tokens.insert(cleaned.filename_token.clone()) {
                warn!(
                    "{}: passage {} reuses file name '{}'; earlier audio will be overwritten",
                    source, index, cleaned.filename_token
                );
            }
            report.append(&passage.raw_title, &cleaned.body, &cleaned.filename_token)?;
            stats.passages_accepted += 1;

            let phonetic = phonetic::to_phonetic(&cleaned.body);
            debug!("Passage {}: phonetic text {:?}", index, phonetic);

            let mut audio_path = None;
            let mut passage_error = None;

            if let Some(ref synth) = synthesizer {
                let file_name = format!("{}.{}", cleaned.filename_token, config.audio_extension);
                let path = output_dir.join(&file_name);

                match synth.synthesize(&phonetic, &config.language, &path).await {
                    Ok(()) => {
                        info!("Passage {}/{}: wrote {}", index, total, path.display());
                        stats.audio_written += 1;
                        audio_path = Some(path);
                        if config.synthesis_delay_ms > 0 {
                            tokio::time::sleep(Duration::from_millis(config.synthesis_delay_ms))
                                .await;
                        }
                    }
                    Err(e) => {
                        error!(
                            "Passage {}/{} ({}): {} synthesis failed: {}",
                            index,
                            total,
                            cleaned.filename_token,
                            synth.name(),
                            e
                        );
                        stats.audio_failed += 1;
                        if let Some(ref cb) = config.progress_callback {
                            cb.on_passage_error(index, total, &e.to_string());
                        }
                        passage_error = Some(PassageError::SynthesisFailed {
                            passage: index,
                            detail: e.to_string(),
                        });
                    }
                }
            }

            if let Some(ref cb) = config.progress_callback {
                let audio_file = audio_path
                    .as_deref()
                    .and_then(Path::file_name)
                    .and_then(|n| n.to_str());
                cb.on_passage_complete(index, total, audio_file);
            }

            results.push(PassageResult {
                index,
                raw_title: passage.raw_title.clone(),
                passage: cleaned,
                phonetic,
                audio_path,
                error: passage_error,
            });
        }

        report_path = report.finish()?;
        if stats.passages_accepted == 0 {
            warn!(
                "{}: all {} passages were filtered out; nothing written",
                source, total
            );
        }
    }

    stats.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "{}: {}/{} passages accepted, {} audio files, {} failed, {}ms",
        source,
        stats.passages_accepted,
        total,
        stats.audio_written,
        stats.audio_failed,
        stats.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_document_complete(stats.passages_accepted, stats.audio_written);
    }

    Ok(DocumentOutput {
        source: source.to_string(),
        output_dir: output_dir.to_path_buf(),
        report_path,
        passages: results,
        stats,
    })
}

/// Process every `*.pdf` in `input_dir`, in file-name order.
///
/// With [`ProcessingConfig::subdir_per_document`] each PDF writes into
/// `output_dir/<file stem>/`; otherwise everything lands in `output_dir` and
/// the documents share one report. The first document that writes a record
/// replaces any stale report, the ones after it append.
/// A document that fails is logged, recorded in [`BatchOutput::failures`],
/// and the batch continues.
///
/// # Errors
/// Only when `input_dir` itself cannot be listed.
pub async fn process_folder(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ProcessingConfig,
) -> Result<BatchOutput, Mantra2AudioError> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();

    let files = extract::collect_pdf_files(input_dir)?;
    if files.is_empty() {
        warn!("No PDF files found in {}", input_dir.display());
    } else {
        info!("Found {} PDF files in {}", files.len(), input_dir.display());
    }

    let mut batch = BatchOutput::default();
    let mut shared_report_started = false;
    for file in files {
        let target = document_output_dir(&file, output_dir, config.subdir_per_document);
        let report_mode = if !config.subdir_per_document && shared_report_started {
            ReportMode::Append
        } else {
            ReportMode::Replace
        };
        match run_pdf(&file, &target, config, report_mode).await {
            Ok(doc) => {
                shared_report_started |= doc.report_path.is_some();
                batch.documents.push(doc);
            }
            Err(e) => {
                error!("Failed to process {}: {}", file.display(), e);
                batch.failures.push(DocumentFailure {
                    path: file,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        "Batch complete: {} documents, {} failed, {} passages, {} audio files",
        batch.documents.len(),
        batch.failures.len(),
        batch.total_accepted(),
        batch.total_audio_written()
    );
    Ok(batch)
}

/// Show what segmentation and cleaning find in a PDF without writing anything.
///
/// Does not need network access.
pub async fn inspect(
    pdf_path: impl AsRef<Path>,
    config: &ProcessingConfig,
) -> Result<InspectReport, Mantra2AudioError> {
    let pdf_path = pdf_path.as_ref();
    extract::validate_pdf(pdf_path)?;
    let document = extract::extract_document(pdf_path, config.password.as_deref()).await?;
    Ok(inspect_document(&document, &display_name(pdf_path), config))
}

/// [`inspect`] for an already parsed document.
pub fn inspect_document(
    document: &Document,
    source: &str,
    config: &ProcessingConfig,
) -> InspectReport {
    let passages = segment::segment(document, config.ink_color)
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let cleaned = clean_passage(&raw, config.min_body_chars);
            InspectedPassage {
                index: i + 1,
                raw,
                cleaned,
            }
        })
        .collect();

    InspectReport {
        source: source.to_string(),
        pages: document.page_count(),
        spans: document.span_count(),
        ink_spans: count_ink_spans(document, config.ink_color),
        passages,
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn count_ink_spans(document: &Document, ink_color: u32) -> usize {
    document.spans().filter(|s| s.color == ink_color).count()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Where a document's files go in folder mode.
fn document_output_dir(pdf: &Path, output_root: &Path, per_document: bool) -> PathBuf {
    match pdf.file_stem() {
        Some(stem) if per_document => output_root.join(stem),
        _ => output_root.to_path_buf(),
    }
}

async fn ensure_dir(dir: &Path) -> Result<(), Mantra2AudioError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| Mantra2AudioError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source,
        })
}
