//! File-backed checkpoint store
//!
//! Layout inside the output directory:
//! - `data_qa_intermediate.jsonl`: one accepted pair per line
//! - `data_discussion_intermediate.jsonl`: one accepted discussion per line
//! - `crawl_state.json`: frontier snapshot, replaced via temp file + rename

use crate::extract::{DiscussionRecord, QARecord};
use crate::state::CrawlState;
use crate::storage::traits::{CheckpointError, CheckpointRecords, CheckpointResult, CheckpointStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const QA_INTERMEDIATE: &str = "data_qa_intermediate.jsonl";
pub const DISCUSSION_INTERMEDIATE: &str = "data_discussion_intermediate.jsonl";
pub const STATE_FILE: &str = "crawl_state.json";

/// How existing intermediate files are treated when opening
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointMode {
    /// Start over: existing files are truncated
    Fresh,
    /// Continue: new records are appended after the existing ones
    Resume,
}

/// Checkpoint store writing JSON lines into a directory
#[derive(Debug)]
pub struct FileCheckpoint {
    dir: PathBuf,
    qa_file: Option<File>,
    discussion_file: Option<File>,
}

impl FileCheckpoint {
    /// Opens the store for writing, creating the directory if needed
    ///
    /// # Arguments
    ///
    /// * `dir` - The output directory
    /// * `mode` - Whether to truncate or continue existing files
    ///
    /// # Returns
    ///
    /// * `Ok(FileCheckpoint)` - Both record files are open for appending
    /// * `Err(CheckpointError)` - The directory or files are not writable
    pub fn open(dir: &Path, mode: CheckpointMode) -> CheckpointResult<Self> {
        fs::create_dir_all(dir).map_err(|e| CheckpointError::io(dir, e))?;

        let qa_path = dir.join(QA_INTERMEDIATE);
        let discussion_path = dir.join(DISCUSSION_INTERMEDIATE);

        match mode {
            CheckpointMode::Resume => {
                drop_partial_line(&qa_path)?;
                drop_partial_line(&discussion_path)?;
            }
            // A snapshot must never outlive the records it refers to
            CheckpointMode::Fresh => remove_if_present(&dir.join(STATE_FILE))?,
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            qa_file: Some(open_records_file(&qa_path, mode)?),
            discussion_file: Some(open_records_file(&discussion_path, mode)?),
        })
    }

    /// Opens the store for reading only
    pub fn reader(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            qa_file: None,
            discussion_file: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn qa_path(&self) -> PathBuf {
        self.dir.join(QA_INTERMEDIATE)
    }

    pub fn discussion_path(&self) -> PathBuf {
        self.dir.join(DISCUSSION_INTERMEDIATE)
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    /// True if any intermediate data is present
    pub fn exists(&self) -> bool {
        self.qa_path().exists() || self.discussion_path().exists() || self.state_path().exists()
    }
}

impl CheckpointStore for FileCheckpoint {
    // ===== Records =====

    fn append_page(
        &mut self,
        qa: &[QARecord],
        discussions: &[DiscussionRecord],
    ) -> CheckpointResult<()> {
        let qa_path = self.qa_path();
        let discussion_path = self.discussion_path();
        if let Some(file) = self.qa_file.as_mut() {
            append_lines(file, &qa_path, qa)?;
        }
        if let Some(file) = self.discussion_file.as_mut() {
            append_lines(file, &discussion_path, discussions)?;
        }
        Ok(())
    }

    fn load_records(&self) -> CheckpointResult<CheckpointRecords> {
        let (qa, qa_truncated) = read_lines::<QARecord>(&self.qa_path())?;
        let (discussions, discussion_truncated) =
            read_lines::<DiscussionRecord>(&self.discussion_path())?;

        Ok(CheckpointRecords {
            qa,
            discussions,
            truncated_lines: qa_truncated + discussion_truncated,
        })
    }

    // ===== Crawl State =====

    fn save_state(&mut self, state: &CrawlState) -> CheckpointResult<()> {
        let path = self.state_path();
        let tmp = path.with_extension("json.tmp");

        let file = File::create(&tmp).map_err(|e| CheckpointError::io(&tmp, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, state)?;
        writer.flush().map_err(|e| CheckpointError::io(&tmp, e))?;
        writer
            .get_ref()
            .sync_data()
            .map_err(|e| CheckpointError::io(&tmp, e))?;
        drop(writer);

        fs::rename(&tmp, &path).map_err(|e| CheckpointError::io(&path, e))
    }

    fn load_state(&self) -> CheckpointResult<Option<CrawlState>> {
        let path = self.state_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CheckpointError::io(&path, e)),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    // ===== Lifecycle =====

    fn clear(&mut self) -> CheckpointResult<()> {
        self.qa_file = None;
        self.discussion_file = None;

        for path in [self.qa_path(), self.discussion_path(), self.state_path()] {
            remove_if_present(&path)?;
        }
        Ok(())
    }
}

fn remove_if_present(path: &Path) -> CheckpointResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CheckpointError::io(path, e)),
    }
}

fn open_records_file(path: &Path, mode: CheckpointMode) -> CheckpointResult<File> {
    let mut options = OpenOptions::new();
    match mode {
        CheckpointMode::Fresh => options.write(true).create(true).truncate(true),
        CheckpointMode::Resume => options.append(true).create(true),
    };
    options.open(path).map_err(|e| CheckpointError::io(path, e))
}

/// Writes one JSON object per line, then forces the data to disk
fn append_lines<T: Serialize>(file: &mut File, path: &Path, records: &[T]) -> CheckpointResult<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut buffer = Vec::new();
    for record in records {
        serde_json::to_writer(&mut buffer, record)?;
        buffer.push(b'\n');
    }

    file.write_all(&buffer)
        .and_then(|_| file.flush())
        .and_then(|_| file.sync_data())
        .map_err(|e| CheckpointError::io(path, e))
}

/// Reads JSON lines, ignoring a trailing line cut off by an interrupted write
///
/// Returns the records and the number of ignored lines.
fn read_lines<T: DeserializeOwned>(path: &Path) -> CheckpointResult<(Vec<T>, usize)> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), 0)),
        Err(e) => return Err(CheckpointError::io(path, e)),
    };

    let complete = content.ends_with('\n');
    let lines: Vec<&str> = content.lines().collect();
    let mut records = Vec::with_capacity(lines.len());
    let mut truncated = 0;

    for (i, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => records.push(record),
            Err(_) if !complete && i + 1 == lines.len() => {
                tracing::warn!(
                    "Ignoring partially written last line of {}",
                    path.display()
                );
                truncated += 1;
            }
            Err(e) => {
                return Err(CheckpointError::Corrupt {
                    path: path.display().to_string(),
                    line: i + 1,
                    message: e.to_string(),
                })
            }
        }
    }

    Ok((records, truncated))
}

/// Cuts a file back to its last newline so appends start on a fresh line
fn drop_partial_line(path: &Path) -> CheckpointResult<()> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(CheckpointError::io(path, e)),
    };

    if content.is_empty() || content.ends_with(b"\n") {
        return Ok(());
    }

    let keep = content
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |at| at + 1);
    tracing::warn!(
        "Dropping {} bytes of a partially written record in {}",
        content.len() - keep,
        path.display()
    );

    let file = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|e| CheckpointError::io(path, e))?;
    file.set_len(keep as u64)
        .map_err(|e| CheckpointError::io(path, e))
}
