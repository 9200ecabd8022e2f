use crate::domain::model::{Record, Schema};
use crate::domain::ports::RecordSink;
use crate::utils::error::Result;
use csv::{Writer, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Append-only CSV destination, written after every page.
///
/// The header goes out with the first non-empty batch, and only if the file
/// was empty when it was opened. A file left behind by an earlier run is
/// appended to without a second header, even if its columns differ.
pub struct IncrementalCsvSink {
    path: PathBuf,
    schema: Schema,
    writer: Writer<File>,
    header_pending: bool,
    rows_written: usize,
}

impl IncrementalCsvSink {
    pub fn open<P: AsRef<Path>>(path: P, schema: Schema) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let position = file.seek(SeekFrom::End(0))?;
        tracing::debug!("Opened {} at offset {}", path.display(), position);

        let writer = WriterBuilder::new().has_headers(false).from_writer(file);

        Ok(Self {
            path,
            schema,
            writer,
            header_pending: position == 0,
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}

impl RecordSink for IncrementalCsvSink {
    fn append(&mut self, records: &[Record]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        if self.header_pending {
            self.writer.write_record(self.schema.columns())?;
            self.header_pending = false;
        }

        for record in records {
            self.writer.write_record(record.to_row(&self.schema))?;
        }
        self.writer.flush()?;

        self.rows_written += records.len();
        Ok(records.len())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        tracing::debug!(
            "Closed {} after appending {} rows",
            self.path().display(),
            self.rows_written()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn schema() -> Schema {
        Schema::new(["company_name", "rating", "reviews"])
    }

    fn record(name: &str, rating: Option<&str>) -> Record {
        Record::new()
            .with("company_name", Some(name.to_string()))
            .with("rating", rating.map(str::to_string))
    }

    #[test]
    fn test_header_written_once_across_batches() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = IncrementalCsvSink::open(&path, schema()).unwrap();

        sink.append(&[record("TCS", Some("3.7"))]).unwrap();
        sink.append(&[]).unwrap();
        sink.append(&[record("Infosys", None), record("Wipro", Some("3.6"))])
            .unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "company_name,rating,reviews",
                "TCS,3.7,",
                "Infosys,,",
                "Wipro,3.6,",
            ]
        );
        assert_eq!(sink.rows_written(), 3);
    }

    #[test]
    fn test_empty_batches_leave_file_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = IncrementalCsvSink::open(&path, schema()).unwrap();

        assert_eq!(sink.append(&[]).unwrap(), 0);
        sink.finish().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("scrapped").join("out.csv");
        let mut sink = IncrementalCsvSink::open(&path, schema()).unwrap();
        sink.append(&[record("HCL", Some("3.5"))]).unwrap();

        assert!(path.exists());
        assert_eq!(sink.path(), path.as_path());
    }

    #[test]
    fn test_values_with_commas_are_quoted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = IncrementalCsvSink::open(&path, Schema::new(["Name", "Type"])).unwrap();
        let row = Record::new()
            .with("Name", Some("Ledyba".to_string()))
            .with("Type", Some("bug, flying".to_string()));
        sink.append(&[row]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Ledyba,\"bug, flying\""));
    }
}
