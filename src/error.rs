//! Error types for the mantra2audio library.
//!
//! Three error types reflect three failure scopes:
//!
//! * [`Mantra2AudioError`]. **Fatal for one document.** The PDF cannot be
//!   extracted (missing file, not a PDF, corrupt, encrypted) or the output
//!   directory/report cannot be written. Returned as `Err` from the
//!   `process_*` entry points. The batch driver logs it and moves on to the
//!   next file.
//!
//! * [`PassageError`]. **Non-fatal.** A single passage's audio could not be
//!   produced. Stored inside [`crate::output::PassageResult`]; the report
//!   entry for that passage is still written.
//!
//! * [`SynthesisError`]: returned by a [`crate::tts::SpeechSynthesizer`]
//!   implementation. The orchestrator wraps it into a [`PassageError`]
//!   tagged with the passage index.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the mantra2audio library.
#[derive(Debug, Error)]
pub enum Mantra2AudioError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Input directory for a batch run does not exist.
    #[error("Input directory not found: '{path}'")]
    DirectoryNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium returned an error while reading the text layer of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    ExtractionFailed { page: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory or write the report.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The default speech synthesizer could not be constructed.
    #[error("Speech synthesizer could not be initialised: {0}")]
    SynthesizerUnavailable(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium (file or directory), or install\n\
libpdfium where the system loader can find it.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single passage.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PassageError {
    /// The synthesizer rejected the text or the backend failed.
    #[error("Passage {passage}: synthesis failed: {detail}")]
    SynthesisFailed { passage: usize, detail: String },
}

/// Errors returned by a speech synthesizer.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Nothing to say after trimming.
    #[error("refusing to synthesize empty text")]
    EmptyText,

    /// Connection, TLS, proxy or timeout failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status} from speech endpoint")]
    Http { status: u16 },

    /// The endpoint answered successfully but with no audio payload.
    #[error("speech endpoint returned an empty audio body")]
    EmptyAudio,

    /// Could not persist the audio.
    #[error("failed to write audio '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
