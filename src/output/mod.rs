//! Output module for writing final record files and run summaries
//!
//! This module handles:
//! - Encoding record streams as JSON lines, CSV or plain text
//! - Writing the final `data_qa.<ext>` and `data_discussion.<ext>` files
//! - Recording crawl statistics

mod formats;
pub mod stats;
mod traits;

pub use formats::{read_csv, read_jsonl, write_csv, write_jsonl, write_text, OutputFormat};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, Record};

use crate::extract::{DiscussionRecord, QARecord};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Paths of the files written by `write_outputs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub qa: PathBuf,
    pub discussions: PathBuf,
}

/// Final file path of a record stream
pub fn output_path<R: Record>(dir: &Path, format: OutputFormat) -> PathBuf {
    dir.join(format!("data_{}.{}", R::STREAM, format.extension()))
}

/// Writes both record streams into `dir`
///
/// Each file is written to a temporary sibling first and renamed into
/// place, so a reader never sees a half-written final file.
///
/// # Arguments
///
/// * `dir` - The output directory (created if missing)
/// * `format` - The encoding
/// * `qa` - Accepted pairs
/// * `discussions` - Accepted discussions
///
/// # Returns
///
/// * `Ok(OutputPaths)` - Where the files were written
/// * `Err(OutputError)` - A file could not be written
pub fn write_outputs(
    dir: &Path,
    format: OutputFormat,
    qa: &[QARecord],
    discussions: &[DiscussionRecord],
) -> OutputResult<OutputPaths> {
    fs::create_dir_all(dir).map_err(|e| OutputError::io(dir, e))?;

    let paths = OutputPaths {
        qa: write_stream(dir, format, qa)?,
        discussions: write_stream(dir, format, discussions)?,
    };

    tracing::info!(
        "Wrote {} pairs to {} and {} discussions to {}",
        qa.len(),
        paths.qa.display(),
        discussions.len(),
        paths.discussions.display()
    );

    Ok(paths)
}

fn write_stream<R: Record>(dir: &Path, format: OutputFormat, records: &[R]) -> OutputResult<PathBuf> {
    let path = output_path::<R>(dir, format);
    let tmp = path.with_extension(format!("{}.tmp", format.extension()));

    let file = File::create(&tmp).map_err(|e| OutputError::io(&tmp, e))?;
    format.encode(records, BufWriter::new(file))?;
    fs::rename(&tmp, &path).map_err(|e| OutputError::io(&path, e))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;
    use tempfile::TempDir;

    fn records() -> (Vec<QARecord>, Vec<DiscussionRecord>) {
        (
            vec![QARecord::new("What is this?", "A test of the output writer.", "https://example.com/").unwrap()],
            vec![DiscussionRecord::new("Thread", "First reply\n\nSecond reply", "https://example.com/t")],
        )
    }

    #[test]
    fn test_write_outputs_jsonl() {
        let dir = TempDir::new().unwrap();
        let (qa, discussions) = records();
        let paths = write_outputs(dir.path(), OutputFormat::Jsonl, &qa, &discussions).unwrap();

        assert_eq!(paths.qa, dir.path().join("data_qa.jsonl"));
        assert_eq!(paths.discussions, dir.path().join("data_discussion.jsonl"));

        let file = BufReader::new(File::open(&paths.qa).unwrap());
        let decoded: Vec<QARecord> = read_jsonl(file).unwrap();
        assert_eq!(decoded, qa);
        assert!(!dir.path().join("data_qa.jsonl.tmp").exists());
    }

    #[test]
    fn test_write_outputs_csv_and_txt() {
        let dir = TempDir::new().unwrap();
        let (qa, discussions) = records();

        let paths = write_outputs(dir.path(), OutputFormat::Csv, &qa, &discussions).unwrap();
        let decoded: Vec<DiscussionRecord> = read_csv(File::open(&paths.discussions).unwrap()).unwrap();
        assert_eq!(decoded, discussions);

        let paths = write_outputs(dir.path(), OutputFormat::Txt, &qa, &[]).unwrap();
        let text = fs::read_to_string(&paths.qa).unwrap();
        assert_eq!(text, "Q: What is this?\nA: A test of the output writer.\nSource: https://example.com/\n\n");
        assert_eq!(fs::read_to_string(&paths.discussions).unwrap(), "");
    }

    #[test]
    fn test_unwritable_directory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let result = write_outputs(&blocker.join("out"), OutputFormat::Jsonl, &[], &[]);
        assert!(matches!(result, Err(OutputError::Io { .. })));
    }
}
