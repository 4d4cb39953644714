//! The styled-text tree the segmentation pipeline walks.
//!
//! A [`Document`] mirrors the shape of a PDF text layer:
//! pages → blocks → lines → spans. Only the span level carries data the
//! pipeline cares about (literal text and the fill colour); the outer levels
//! exist so the traversal order is explicit and so tests can build documents
//! by hand without a PDF.

use serde::{Deserialize, Serialize};

/// Smallest styled text unit: literal text plus an integer `0xRRGGBB` fill colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub color: u32,
}

impl Span {
    pub fn new(text: impl Into<String>, color: u32) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }

    /// Pack 8-bit RGB components into the integer colour used by [`Span::color`].
    pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
        (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub spans: Vec<Span>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub blocks: Vec<Block>,
}

/// A whole document's text layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    /// Build a one-page, one-block document with a line per span.
    ///
    /// Convenient for tests and for callers that already hold a flat span list.
    pub fn from_spans(spans: impl IntoIterator<Item = Span>) -> Self {
        let lines = spans
            .into_iter()
            .map(|span| Line { spans: vec![span] })
            .collect();
        Self {
            pages: vec![Page {
                blocks: vec![Block { lines }],
            }],
        }
    }

    /// Iterate spans in document order: page, then block, then line, then span.
    pub fn spans(&self) -> impl Iterator<Item = &Span> + '_ {
        self.pages
            .iter()
            .flat_map(|p| p.blocks.iter())
            .flat_map(|b| b.lines.iter())
            .flat_map(|l| l.spans.iter())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn span_count(&self) -> usize {
        self.spans().count()
    }
}
