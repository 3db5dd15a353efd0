// file: src/answers/report.rs
// description: plain-text question and answer report writer
// reference: buffered file output

use crate::error::{PipelineError, Result};
use crate::models::AnswerRecord;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Holds the report open for the whole answer loop. Creating it truncates
/// any earlier report at the same path.
pub struct ReportWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    records: usize,
}

impl ReportWriter {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PipelineError::FileOperation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            records: 0,
        })
    }

    pub fn write_record(&mut self, record: &AnswerRecord) -> Result<()> {
        write!(self.writer, "{}", record).map_err(|source| self.io_error(source))?;
        self.records += 1;
        Ok(())
    }

    pub fn records(&self) -> usize {
        self.records
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|source| self.io_error(source))
    }

    pub fn finish(mut self) -> Result<usize> {
        self.flush()?;
        Ok(self.records)
    }

    fn io_error(&self, source: std::io::Error) -> PipelineError {
        PipelineError::FileOperation {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SEPARATOR;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_writes_blocks_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("answers.txt");

        let mut writer = ReportWriter::create(&path).unwrap();
        writer
            .write_record(&AnswerRecord::new(1, "A?".to_string(), "a".to_string()))
            .unwrap();
        writer
            .write_record(&AnswerRecord::new(2, "B?".to_string(), "b".to_string()))
            .unwrap();
        assert_eq!(writer.finish().unwrap(), 2);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            format!(
                "Question 1: A?\nAnswer: a\n{sep}\n\nQuestion 2: B?\nAnswer: b\n{sep}\n\n",
                sep = SEPARATOR
            )
        );
    }

    #[test]
    fn test_create_truncates_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.txt");
        fs::write(&path, "stale content").unwrap();

        let writer = ReportWriter::create(&path).unwrap();
        assert_eq!(writer.finish().unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
