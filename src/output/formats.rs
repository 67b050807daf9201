//! Record encodings: JSON lines, CSV and plain text

use super::traits::{OutputError, OutputResult, Record};
use serde::Deserialize;
use std::fmt;
use std::io::{BufRead, Read, Write};

/// Encoding of the final output files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Jsonl,
    /// Comma-separated values with a header row
    Csv,
    /// Human-readable text, display only
    Txt,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jsonl => "jsonl",
            Self::Csv => "csv",
            Self::Txt => "txt",
        }
    }

    /// Writes `records` to `out` in this encoding
    pub fn encode<R: Record, W: Write>(&self, records: &[R], out: W) -> OutputResult<()> {
        match self {
            Self::Jsonl => write_jsonl(records, out),
            Self::Csv => write_csv(records, out),
            Self::Txt => write_text(records, out),
        }
    }

    /// Reads records back; plain text is lossy and cannot be decoded
    pub fn decode<R: Record, I: BufRead>(&self, input: I) -> OutputResult<Vec<R>> {
        match self {
            Self::Jsonl => read_jsonl(input),
            Self::Csv => read_csv(input),
            Self::Txt => Err(OutputError::NotDecodable("txt")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

pub fn write_jsonl<R: Record, W: Write>(records: &[R], mut out: W) -> OutputResult<()> {
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

pub fn read_jsonl<R: Record, I: BufRead>(input: I) -> OutputResult<Vec<R>> {
    let mut records = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line.map_err(|e| OutputError::Decode {
            line: i + 1,
            message: e.to_string(),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| OutputError::Decode {
            line: i + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Header row first, even with no records
pub fn write_csv<R: Record, W: Write>(records: &[R], out: W) -> OutputResult<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(R::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_csv<R: Record, I: Read>(input: I) -> OutputResult<Vec<R>> {
    let mut reader = csv::Reader::from_reader(input);
    reader
        .deserialize()
        .collect::<Result<Vec<R>, csv::Error>>()
        .map_err(OutputError::from)
}

pub fn write_text<R: Record, W: Write>(records: &[R], mut out: W) -> OutputResult<()> {
    for record in records {
        out.write_all(record.display_text().as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
