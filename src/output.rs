//! Result types returned by the processing entry points.

use crate::error::PassageError;
use crate::pipeline::segment::Passage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A passage after title cleaning, body cleaning and the post-filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedPassage {
    /// Cleaned display title, e.g. `M0512_金刚陀罗尼`.
    pub title: String,
    /// Audio file stem. Filesystem-safe, non-empty, at most 200 characters.
    pub filename_token: String,
    /// Cleaned mantra text written to the report.
    pub body: String,
}

/// Outcome for one accepted passage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassageResult {
    /// 1-based index among the passages found by segmentation.
    pub index: usize,
    pub raw_title: String,
    pub passage: CleanedPassage,
    /// Text actually sent to the synthesizer.
    pub phonetic: String,
    /// Written audio file, if synthesis ran and succeeded.
    pub audio_path: Option<PathBuf>,
    pub error: Option<PassageError>,
}

impl PassageResult {
    pub fn has_audio(&self) -> bool {
        self.audio_path.is_some()
    }
}

/// Counters for one document run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub pages: usize,
    pub spans: usize,
    /// Spans in the configured ink colour.
    pub ink_spans: usize,
    pub passages_found: usize,
    pub passages_accepted: usize,
    pub passages_filtered: usize,
    pub audio_written: usize,
    pub audio_failed: usize,
    pub duration_ms: u64,
}

/// Everything produced for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOutput {
    /// Display name of the input (file name, or a caller-chosen label).
    pub source: String,
    pub output_dir: PathBuf,
    /// The report path, if at least one passage was accepted.
    pub report_path: Option<PathBuf>,
    pub passages: Vec<PassageResult>,
    pub stats: ProcessingStats,
}

/// A document that could not be processed during a folder run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Everything produced for a folder of documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutput {
    pub documents: Vec<DocumentOutput>,
    pub failures: Vec<DocumentFailure>,
}

impl BatchOutput {
    pub fn total_accepted(&self) -> usize {
        self.documents.iter().map(|d| d.stats.passages_accepted).sum()
    }

    pub fn total_audio_written(&self) -> usize {
        self.documents.iter().map(|d| d.stats.audio_written).sum()
    }
}

/// Dry-run view of a document: what segmentation sees, nothing written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectReport {
    pub source: String,
    pub pages: usize,
    pub spans: usize,
    pub ink_spans: usize,
    pub passages: Vec<InspectedPassage>,
}

/// One passage as [`crate::inspect`] reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectedPassage {
    pub index: usize,
    pub raw: Passage,
    /// `None` when the post-filter would reject it.
    pub cleaned: Option<CleanedPassage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(accepted: usize, audio: usize) -> DocumentOutput {
        DocumentOutput {
            source: "x.pdf".into(),
            output_dir: PathBuf::from("out"),
            report_path: None,
            passages: vec![],
            stats: ProcessingStats {
                passages_accepted: accepted,
                audio_written: audio,
                ..Default::default()
            },
        }
    }

    #[test]
    fn batch_totals_sum_documents() {
        let batch = BatchOutput {
            documents: vec![doc(3, 2), doc(4, 4)],
            failures: vec![],
        };
        assert_eq!(batch.total_accepted(), 7);
        assert_eq!(batch.total_audio_written(), 6);
    }

    #[test]
    fn passage_result_serializes_error() {
        let result = PassageResult {
            index: 3,
            raw_title: "M05.3 真言".into(),
            passage: CleanedPassage {
                title: "M0503_真言".into(),
                filename_token: "M0503_真言".into(),
                body: "oṃ hūṃ phaṭ".into(),
            },
            phonetic: "om hum pat".into(),
            audio_path: None,
            error: Some(PassageError::SynthesisFailed {
                passage: 3,
                detail: "HTTP 429 from speech endpoint".into(),
            }),
        };
        assert!(!result.has_audio());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["index"], 3);
        assert_eq!(json["passage"]["filename_token"], "M0503_真言");
        assert!(json["error"]["SynthesisFailed"].is_object());
    }
}
