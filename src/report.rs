//! The human-readable per-document report.
//!
//! One record per accepted passage, appended in document order. The file is
//! only created when the first record is written, so a document that yields
//! no passages leaves nothing behind.
//!
//! A fresh writer replaces whatever report was there before. An appending
//! writer (see [`ReportWriter::appending`]) extends it instead, for several
//! documents sharing one output directory.

use crate::error::Mantra2AudioError;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Separator line closing every record.
pub const RECORD_SEPARATOR: &str = "==================================================";

/// Lazily-created, append-only report writer.
#[derive(Debug)]
pub struct ReportWriter {
    path: PathBuf,
    file: Option<BufWriter<File>>,
    records: usize,
    append: bool,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
            records: 0,
            append: false,
        }
    }

    /// Like [`ReportWriter::new`], but keeps existing records in the file.
    pub fn appending(path: impl Into<PathBuf>) -> Self {
        Self {
            append: true,
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Append one record; opens the file on first use, truncating it unless
    /// the writer is appending.
    pub fn append(
        &mut self,
        raw_title: &str,
        body: &str,
        filename_token: &str,
    ) -> Result<(), Mantra2AudioError> {
        let record = format_record(raw_title, body, filename_token);
        let path = self.path.clone();
        let io_err = |source| Mantra2AudioError::OutputWriteFailed {
            path: path.clone(),
            source,
        };

        if self.file.is_none() {
            debug!(
                "Opening report {} ({})",
                self.path.display(),
                if self.append { "append" } else { "truncate" }
            );
            let file = OpenOptions::new()
                .create(true)
                .write(!self.append)
                .append(self.append)
                .truncate(!self.append)
                .open(&self.path)
                .map_err(io_err)?;
            self.file = Some(BufWriter::new(file));
        }

        if let Some(writer) = self.file.as_mut() {
            writer.write_all(record.as_bytes()).map_err(io_err)?;
            // keep the report readable while a long synthesis run is in progress
            writer.flush().map_err(io_err)?;
        }
        self.records += 1;
        Ok(())
    }

    /// Flush and close. Returns the path if anything was written.
    pub fn finish(mut self) -> Result<Option<PathBuf>, Mantra2AudioError> {
        match self.file.take() {
            Some(mut writer) => {
                writer
                    .flush()
                    .map_err(|source| Mantra2AudioError::OutputWriteFailed {
                        path: self.path.clone(),
                        source,
                    })?;
                Ok(Some(self.path))
            }
            None => Ok(None),
        }
    }
}

/// Render one report record.
pub fn format_record(raw_title: &str, body: &str, filename_token: &str) -> String {
    format!(
        "原文内容：\n\n{raw_title}\n\n处理内容：\n\n音频：{body}\n\n音频名字：{filename_token}\n{RECORD_SEPARATOR}\n\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout() {
        let record = format_record("M05.12 金刚陀罗尼", "oṃ vajra svāhā", "M0512_金刚陀罗尼");
        let expected = "原文内容：\n\nM05.12 金刚陀罗尼\n\n处理内容：\n\n音频：oṃ vajra svāhā\n\n\
                        音频名字：M0512_金刚陀罗尼\n\
                        ==================================================\n\n";
        assert_eq!(record, expected);
        assert_eq!(RECORD_SEPARATOR.len(), 50);
    }

    #[test]
    fn file_is_created_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed_content.txt");
        let writer = ReportWriter::new(&path);
        assert!(!path.exists());
        assert_eq!(writer.finish().unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn records_are_appended_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed_content.txt");
        std::fs::write(&path, "stale content from an earlier run").unwrap();

        let mut writer = ReportWriter::new(&path);
        writer.append("first", "oṃ a", "first").unwrap();
        writer.append("second", "oṃ b", "second").unwrap();
        assert_eq!(writer.records(), 2);
        assert_eq!(writer.finish().unwrap(), Some(path.clone()));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert_eq!(content.matches(RECORD_SEPARATOR).count(), 2);
        assert!(content.find("first").unwrap() < content.find("second").unwrap());
    }

    #[test]
    fn appending_writer_keeps_earlier_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed_content.txt");

        let mut first = ReportWriter::new(&path);
        first.append("甲", "oṃ a", "甲").unwrap();
        first.finish().unwrap();

        let mut second = ReportWriter::appending(&path);
        second.append("乙", "oṃ b", "乙").unwrap();
        assert_eq!(second.records(), 1);
        second.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches(RECORD_SEPARATOR).count(), 2);
        assert!(content.find("甲").unwrap() < content.find("乙").unwrap());
    }

    #[test]
    fn appending_writer_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed_content.txt");
        let mut writer = ReportWriter::appending(&path);
        writer.append("t", "oṃ", "t").unwrap();
        assert_eq!(writer.finish().unwrap(), Some(path.clone()));
        assert!(path.exists());
    }

    #[test]
    fn unwritable_location_is_an_output_error() {
        let mut writer = ReportWriter::new("/nonexistent-dir/for/report.txt");
        let err = writer.append("t", "b", "f").unwrap_err();
        assert!(matches!(err, Mantra2AudioError::OutputWriteFailed { .. }));
    }
}
