//! Progress-callback trait for per-passage processing events.
//!
//! Inject an [`Arc<dyn ProcessingProgressCallback>`] via
//! [`crate::config::ProcessingConfigBuilder::progress_callback`] to receive
//! events as the orchestrator works through a document's passages.
//!
//! # Example
//!
//! ```rust
//! use mantra2audio::{ProcessingProgressCallback, ProcessingConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl ProcessingProgressCallback for CountingCallback {
//!     fn on_passage_complete(&self, index: usize, total: usize, audio_file: Option<&str>) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Passage {}/{} done ({:?})", index, total, audio_file);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ProcessingConfig::builder()
//!     .progress_callback(counter as Arc<dyn ProcessingProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the orchestrator as it processes each passage of a document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Passage indices are 1-based and count passages found
/// by segmentation, including ones the post-filter later rejects.
pub trait ProcessingProgressCallback: Send + Sync {
    /// Called once per document after segmentation.
    ///
    /// # Arguments
    /// * `source`: display name of the document (usually its file name)
    /// * `total_passages`: passages found by segmentation
    fn on_document_start(&self, source: &str, total_passages: usize) {
        let _ = (source, total_passages);
    }

    /// Called when an accepted passage is about to be written and synthesized.
    fn on_passage_start(&self, index: usize, total: usize, title: &str) {
        let _ = (index, total, title);
    }

    /// Called when a passage has been fully handled.
    ///
    /// `audio_file` is the written file name, or `None` when audio is disabled
    /// or synthesis failed (in which case [`Self::on_passage_error`] has
    /// already been called for the same index).
    fn on_passage_complete(&self, index: usize, total: usize, audio_file: Option<&str>) {
        let _ = (index, total, audio_file);
    }

    /// Called when synthesis failed for a passage. Its report entry is kept.
    fn on_passage_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }

    /// Called when the post-filter rejects a passage.
    fn on_passage_skipped(&self, index: usize, total: usize, reason: &str) {
        let _ = (index, total, reason);
    }

    /// Called once after every passage has been attempted.
    ///
    /// # Arguments
    /// * `accepted`: passages that survived the post-filter
    /// * `audio_written`: audio files produced
    fn on_document_complete(&self, accepted: usize, audio_written: usize) {
        let _ = (accepted, audio_written);
    }
}

/// A no-op implementation, used when no callback is configured.
pub struct NoopProgressCallback;

impl ProcessingProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ProcessingConfig`].
pub type ProgressCallback = Arc<dyn ProcessingProgressCallback>;
