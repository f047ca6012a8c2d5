//! Append-only JSON-lines result files.
//!
//! Batch drivers stream one entry per line as work completes, so partial
//! progress from an interrupted sweep stays readable. Every append is flushed
//! through to the file; `finish` exists for an explicit close on the happy
//! path and dropping the sink flushes whatever remains on early exits.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::SimResult;

/// Append-only sink writing one JSON value per line.
#[derive(Debug)]
pub struct ResultSink {
    writer: BufWriter<File>,
}

impl ResultSink {
    /// Create (or truncate) a sink at `path`.
    pub fn create(path: impl AsRef<Path>) -> SimResult<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
        })
    }

    /// Open a sink that appends to an existing file.
    pub fn append_to(path: impl AsRef<Path>) -> SimResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Append one entry as a JSON line and flush it to disk.
    pub fn append<T: Serialize>(&mut self, entry: &T) -> SimResult<()> {
        serde_json::to_writer(&mut self.writer, entry)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and close the sink.
    pub fn finish(mut self) -> SimResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Read every JSON line of `path` into memory. Blank lines are skipped;
/// malformed lines are serialization errors.
pub fn read_jsonl<T: DeserializeOwned>(path: impl AsRef<Path>) -> SimResult<Vec<T>> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }
    Ok(entries)
}
