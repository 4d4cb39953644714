//! Pipeline stages for mantra extraction.
//!
//! Each submodule implements one transformation step; all but [`extract`]
//! are pure functions over strings and spans, so each is tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ segment ──▶ title + clean ──▶ post_filter ──▶ filename + phonetic
//! (pdfium)   (classify)   (raw → cleaned)  (length gate)   (audio name, TTS text)
//! ```
//!
//! 1. [`extract`]: read the PDF text layer into a [`crate::document::Document`];
//!    runs in `spawn_blocking` because pdfium is not async-safe
//! 2. [`segment`]: walk spans in document order and group them into raw
//!    (title, body) passages, using [`classify`] for the per-span verdict
//! 3. [`title`], [`clean`]: normalise the title and strip noise from the body
//! 4. [`clean::post_filter`]: trim trailing residue and reject short bodies
//! 5. [`filename`], [`phonetic`]: derive the audio file stem and the text
//!    the synthesizer reads

pub mod classify;
pub mod clean;
pub mod extract;
pub mod filename;
pub mod lexicon;
pub mod phonetic;
pub mod segment;
pub mod title;

use crate::output::CleanedPassage;
use segment::Passage;

/// Clean a raw passage, or `None` if the post-filter rejects its body.
pub fn clean_passage(passage: &Passage, min_body_chars: usize) -> Option<CleanedPassage> {
    let body = clean::clean_mantra_text(&passage.raw_body);
    let body = clean::post_filter(&body, min_body_chars)?;
    let title = title::clean_title(&passage.raw_title);
    let filename_token = filename::sanitize_filename(&title);

    Some(CleanedPassage {
        title,
        filename_token,
        body,
    })
}
