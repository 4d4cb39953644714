//! # mantra2audio
//!
//! Extract romanized-Sanskrit mantra passages from typeset PDF catalogues and
//! synthesize one audio file per passage.
//!
//! ## Why this crate?
//!
//! Mantra catalogues interleave Chinese headings, translator credits,
//! commentary and the romanized mantra itself, often split across many small
//! text runs. Copy-pasting them by hand is slow and error-prone. This crate
//! walks the PDF text layer span by span, keeps only the ink-coloured text,
//! groups it into (title, mantra) passages with a small state machine,
//! cleans both halves, and reads each mantra aloud through a speech
//! synthesizer using a Romanian phonetic respelling.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract   pdfium text objects → page/block/line/span tree (spawn_blocking)
//!  ├─ 2. Segment   classify each span, group into raw (title, body) passages
//!  ├─ 3. Clean     title label, body noise removal, length filter
//!  ├─ 4. Name      filesystem-safe audio file stem
//!  ├─ 5. Respell   Sanskrit diacritics → Romanian orthography
//!  └─ 6. Output    processed_content.txt report + one .mp3 per passage
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mantra2audio::{process_pdf, ProcessingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProcessingConfig::default();
//!     let output = process_pdf("pdf/mantras.pdf", "output", &config).await?;
//!     eprintln!(
//!         "{} passages, {} audio files",
//!         output.stats.passages_accepted, output.stats.audio_written
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mantra2audio` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! mantra2audio = { version = "0.1", default-features = false }
//! ```
//!
//! ## pdfium
//!
//! Text extraction binds to a pdfium shared library at runtime. Set
//! `PDFIUM_LIB_PATH` to the library file or its directory, or install it where
//! the system loader finds it.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod report;
pub mod tts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ProcessingConfig, ProcessingConfigBuilder};
pub use document::{Block, Document, Line, Page, Span};
pub use error::{Mantra2AudioError, PassageError, SynthesisError};
pub use output::{
    BatchOutput, CleanedPassage, DocumentFailure, DocumentOutput, InspectReport,
    InspectedPassage, PassageResult, ProcessingStats,
};
pub use pipeline::classify::{classify, SpanClass};
pub use pipeline::segment::{segment, Passage, SegmentState};
pub use process::{
    inspect, inspect_document, process_document, process_folder, process_pdf, process_pdf_bytes,
    process_pdf_sync,
};
pub use progress::{NoopProgressCallback, ProcessingProgressCallback, ProgressCallback};
pub use tts::{GoogleTranslateTts, SpeechSynthesizer};
