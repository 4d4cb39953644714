//! Segmentation: group the classified span stream into (title, body) passages.
//!
//! Titles and mantra bodies interleave unpredictably across the physical
//! line/block boundaries of a typeset page. A title may arrive in several
//! non-contiguous spans (main heading, then a trailing parenthetical) before
//! its body starts, and a body may trickle in across many small spans before
//! the next title appears. The state machine below tolerates both.
//!
//! The machine is an explicit value ([`SegmentState`]) threaded through a
//! pure [`step`] function, so each transition can be tested in isolation:
//!
//! ```text
//!                 TitleStart / TitleContinuation
//!        ┌──────────────────────────────────────────┐
//!        ▼                                          │
//!   ┌─────────┐   Body (block active)   ┌─────────┐ │
//!   │  title  │ ──────────────────────▶ │  body   │─┘  TitleStart with a body
//!   │  mode   │                         │ accum.  │    accumulated emits a
//!   └─────────┘ ◀─ Irrelevant/Discard ─ └─────────┘    Passage first
//! ```

use super::classify::{classify, SpanClass};
use super::lexicon::has_numbering;
use crate::document::{Document, Span};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One extracted (title, body) pair, before any cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub raw_title: String,
    pub raw_body: String,
}

/// The live segment accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentState {
    pub ink_color: u32,
    pub current_title: String,
    pub current_body: String,
    pub in_title_mode: bool,
    /// Set once a title has been seen since the last emitted passage; body
    /// spans arriving while it is clear are dropped.
    pub mantra_block_active: bool,
    /// Passages emitted so far.
    pub emitted: usize,
}

impl SegmentState {
    pub fn new(ink_color: u32) -> Self {
        Self {
            ink_color,
            current_title: String::new(),
            current_body: String::new(),
            in_title_mode: false,
            mantra_block_active: false,
            emitted: 0,
        }
    }

    /// Classify `span` against this state's ink colour and title mode.
    pub fn classify(&self, span: &Span) -> SpanClass {
        classify(&span.text, span.color, self.ink_color, self.in_title_mode)
    }

    fn take_passage(&mut self) -> Passage {
        self.emitted += 1;
        let raw_title = if self.current_title.is_empty() {
            format!("Section {}", self.emitted)
        } else {
            self.current_title.clone()
        };
        let raw_body = std::mem::take(&mut self.current_body);
        self.mantra_block_active = false;
        Passage {
            raw_title,
            raw_body,
        }
    }
}

/// Advance the state machine by one span.
///
/// Returns the new state and, when `span` closes a segment, the finished
/// passage.
pub fn step(mut state: SegmentState, span: &Span) -> (SegmentState, Option<Passage>) {
    let class = state.classify(span);
    let text = span.text.trim();
    let mut emitted = None;

    match class {
        SpanClass::TitleStart => {
            if !state.current_body.is_empty() {
                let passage = state.take_passage();
                debug!(
                    "Segment boundary at {:?}: emitting passage {}",
                    text, state.emitted
                );
                emitted = Some(passage);
            }
            if !state.current_title.is_empty() && has_numbering(text) {
                state.current_title = text.to_string();
            } else {
                append_spaced(&mut state.current_title, text);
            }
            state.in_title_mode = true;
            state.mantra_block_active = true;
        }
        SpanClass::TitleContinuation => {
            append_spaced(&mut state.current_title, text);
            state.in_title_mode = true;
            state.mantra_block_active = true;
        }
        SpanClass::Body => {
            if state.mantra_block_active {
                append_spaced(&mut state.current_body, text);
            } else {
                debug!("Dropping body span outside a mantra block: {:?}", text);
            }
            state.in_title_mode = false;
        }
        SpanClass::Irrelevant | SpanClass::Discard => {
            state.in_title_mode = false;
        }
    }

    (state, emitted)
}

/// Flush the final segment at end of document.
pub fn finish(mut state: SegmentState) -> Option<Passage> {
    if state.current_body.is_empty() {
        None
    } else {
        Some(state.take_passage())
    }
}

/// Run the state machine over every span of `document`.
pub fn segment(document: &Document, ink_color: u32) -> Vec<Passage> {
    let mut passages = Vec::new();
    let mut state = SegmentState::new(ink_color);

    for span in document.spans() {
        let (next, emitted) = step(state, span);
        state = next;
        passages.extend(emitted);
    }
    passages.extend(finish(state));

    passages
}

fn append_spaced(target: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: u32 = 0;

    fn ink(text: &str) -> Span {
        Span::new(text, INK)
    }

    fn run(spans: Vec<Span>) -> Vec<Passage> {
        segment(&Document::from_spans(spans), INK)
    }

    #[test]
    fn title_start_sets_title_mode() {
        let (state, out) = step(SegmentState::new(INK), &ink("M05.12 金刚陀罗尼"));
        assert!(out.is_none());
        assert!(state.in_title_mode);
        assert!(state.mantra_block_active);
        assert_eq!(state.current_title, "M05.12 金刚陀罗尼");
    }

    #[test]
    fn continuation_appends_with_space() {
        let (state, _) = step(SegmentState::new(INK), &ink("大悲心陀罗尼"));
        let (state, out) = step(state, &ink("  (唐 不空 译) "));
        assert!(out.is_none());
        assert_eq!(state.current_title, "大悲心陀罗尼 (唐 不空 译)");
        assert!(state.in_title_mode);
    }

    #[test]
    fn heading_split_across_spans_is_rejoined() {
        let passages = run(vec![
            ink("M05.9 大悲心陀"),
            ink("罗尼经"),
            ink("namo ratna trayāya"),
        ]);
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].raw_title, "M05.9 大悲心陀 罗尼经");
        assert_eq!(passages[0].raw_body, "namo ratna trayāya");
    }

    #[test]
    fn body_outside_block_is_dropped() {
        let (state, out) = step(SegmentState::new(INK), &ink("oṃ vajra"));
        assert!(out.is_none());
        assert!(state.current_body.is_empty());
    }

    #[test]
    fn body_leaves_title_mode() {
        let (state, _) = step(SegmentState::new(INK), &ink("真言"));
        let (state, _) = step(state, &ink("oṃ"));
        assert!(!state.in_title_mode);
        assert_eq!(state.current_body, "oṃ");
        let (state, _) = step(state, &ink("hūṃ"));
        assert_eq!(state.current_body, "oṃ hūṃ");
    }

    #[test]
    fn irrelevant_clears_title_mode_only() {
        let (state, _) = step(SegmentState::new(INK), &ink("真言"));
        let (state, out) = step(state, &ink("第三卷"));
        assert!(out.is_none());
        assert!(!state.in_title_mode);
        assert!(state.mantra_block_active);
        assert_eq!(state.current_title, "真言");
        // the bracket no longer continues the title
        let (state, _) = step(state, &ink("(唐 不空 译)"));
        assert_eq!(state.current_title, "真言");
    }

    #[test]
    fn numbered_title_after_body_replaces_title() {
        let (state, _) = step(SegmentState::new(INK), &ink("M05.1 甲陀罗尼"));
        let (state, _) = step(state, &ink("oṃ a"));
        let (state, out) = step(state, &ink("M05.2 乙陀罗尼"));
        let passage = out.expect("boundary emits");
        assert_eq!(passage.raw_title, "M05.1 甲陀罗尼");
        assert_eq!(passage.raw_body, "oṃ a");
        assert_eq!(state.current_title, "M05.2 乙陀罗尼");
        assert!(state.current_body.is_empty());
    }

    #[test]
    fn unnumbered_title_after_body_appends() {
        let (state, _) = step(SegmentState::new(INK), &ink("M05.1 甲陀罗尼"));
        let (state, _) = step(state, &ink("oṃ a"));
        let (state, out) = step(state, &ink("心真言"));
        assert!(out.is_some());
        assert_eq!(state.current_title, "M05.1 甲陀罗尼 心真言");
    }

    #[test]
    fn numbered_title_without_body_replaces_accumulated_title() {
        let (state, _) = step(SegmentState::new(INK), &ink("卍"));
        let (state, out) = step(state, &ink("M05.3 丙陀罗尼"));
        assert!(out.is_none());
        assert_eq!(state.current_title, "M05.3 丙陀罗尼");
    }

    #[test]
    fn finish_uses_section_placeholder_without_title() {
        let mut state = SegmentState::new(INK);
        state.current_body = "oṃ".into();
        state.emitted = 2;
        let passage = finish(state).unwrap();
        assert_eq!(passage.raw_title, "Section 3");
    }

    #[test]
    fn finish_without_body_emits_nothing() {
        let (state, _) = step(SegmentState::new(INK), &ink("真言"));
        assert!(finish(state).is_none());
    }

    #[test]
    fn scenario_single_passage() {
        let passages = run(vec![ink("M05.12 金刚陀罗尼"), ink("oṃ vajra svāhā")]);
        assert_eq!(passages.len(), 1);
        assert!(passages[0].raw_title.contains("M05.12"));
        assert_eq!(passages[0].raw_body, "oṃ vajra svāhā");
    }

    #[test]
    fn scenario_non_ink_mantra_is_ignored() {
        let passages = run(vec![
            ink("M05.12 金刚陀罗尼"),
            Span::new("oṃ vajra svāhā", 0xFF0000),
        ]);
        assert!(passages.is_empty());
    }

    #[test]
    fn body_spans_accumulate_across_lines_and_pages() {
        use crate::document::{Block, Line, Page};
        let doc = Document {
            pages: vec![
                Page {
                    blocks: vec![Block {
                        lines: vec![
                            Line {
                                spans: vec![ink("M05.4 丁陀罗尼"), ink("(宋 法天 译)")],
                            },
                            Line {
                                spans: vec![ink("namo")],
                            },
                        ],
                    }],
                },
                Page {
                    blocks: vec![Block {
                        lines: vec![Line {
                            spans: vec![ink("bhagavate"), ink("12"), ink("svāhā")],
                        }],
                    }],
                },
            ],
        };
        let passages = segment(&doc, INK);
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].raw_title, "M05.4 丁陀罗尼 (宋 法天 译)");
        assert_eq!(passages[0].raw_body, "namo bhagavate svāhā");
    }

    #[test]
    fn segmentation_is_deterministic() {
        let spans = vec![
            ink("M05.1 甲陀罗尼"),
            ink("oṃ"),
            ink("M05.2 乙真言"),
            ink("hūṃ phaṭ"),
        ];
        assert_eq!(run(spans.clone()), run(spans));
    }
}
