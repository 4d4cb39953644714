//! Span classification: the per-span verdict that drives segmentation.
//!
//! ## Rule Order
//!
//! Rules are checked top to bottom and the first match wins:
//!
//! 1. Non-ink colour → [`SpanClass::Discard`]
//! 2. Blank after trimming → [`SpanClass::Discard`]
//! 3. Numbering (`M05.12`), `卍`, or a mantra keyword → [`SpanClass::TitleStart`]
//! 4. In title mode and a bracketed fragment or a piece of a title keyword
//!    → [`SpanClass::TitleContinuation`]
//! 5. Any Sanskrit diacritic, or only ASCII letters and whitespace → [`SpanClass::Body`]
//! 6. Anything else → [`SpanClass::Irrelevant`]
//!
//! Rule 3 precedes rule 5 so a heading such as `M05.3 oṃ` opens a title
//! rather than feeding a body.

use super::lexicon::{
    has_keyword_char, has_mantra_keyword, has_numbering, is_bracket, is_sanskrit_diacritic, CLOSE_BRACKETS,
    OPEN_BRACKETS, SWASTIKA,
};
use serde::{Deserialize, Serialize};

/// What a single span contributes to the current segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanClass {
    /// Not ink-coloured, or blank.
    Discard,
    /// Opens (or extends) a title.
    TitleStart,
    /// A trailing bracketed annotation of the title currently being read.
    TitleContinuation,
    /// Romanized mantra text.
    Body,
    /// Ink text that is neither title nor mantra (commentary, page furniture).
    Irrelevant,
}

/// Classify one span.
///
/// Pure: the verdict depends only on the arguments.
pub fn classify(text: &str, color: u32, ink_color: u32, in_title_mode: bool) -> SpanClass {
    if color != ink_color {
        return SpanClass::Discard;
    }

    let text = text.trim();
    if text.is_empty() {
        return SpanClass::Discard;
    }

    if has_numbering(text) || text.contains(SWASTIKA) || has_mantra_keyword(text) {
        return SpanClass::TitleStart;
    }

    if in_title_mode && is_title_fragment(text) {
        return SpanClass::TitleContinuation;
    }

    if text.chars().any(is_sanskrit_diacritic) || is_plain_latin(text) {
        return SpanClass::Body;
    }

    SpanClass::Irrelevant
}

fn is_title_fragment(text: &str) -> bool {
    text.starts_with(OPEN_BRACKETS)
        || text.ends_with(CLOSE_BRACKETS)
        || text.chars().any(is_bracket)
        || has_keyword_char(text)
}

fn is_plain_latin(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
}
