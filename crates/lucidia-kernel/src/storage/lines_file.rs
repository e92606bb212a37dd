//! Append-only JSON-lines file.
//!
//! Lines are only ever appended; nothing in this module truncates, rewrites
//! or deletes. Every handle is opened and dropped within a single call.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{KernelError, Result};

use super::StoreLoad;

/// An append-only file holding one record per line.
#[derive(Debug, Clone)]
pub struct LinesFile {
    path: PathBuf,
}

impl LinesFile {
    /// Create a handle for `path`, creating missing parent directories.
    ///
    /// The file itself is created lazily on the first append.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `line` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::InvalidInput` if `line` contains a newline, or
    /// `KernelError::Io` if the file cannot be opened or written.
    pub fn append_line(&self, line: &str) -> Result<()> {
        if line.contains('\n') {
            return Err(KernelError::InvalidInput(
                "record line must not contain a newline".to_string(),
            ));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Read every line in file order.
    ///
    /// Returns `StoreLoad::Empty` if the file does not exist, and
    /// `KernelError::Decode` with its 1-based line number for a line that is
    /// not valid UTF-8.
    pub fn read_lines(&self) -> Result<StoreLoad<Vec<String>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreLoad::Empty),
            Err(e) => return Err(KernelError::Io(e)),
        };

        let mut lines = Vec::new();
        for (i, raw) in BufReader::new(file).split(b'\n').enumerate() {
            let mut raw = raw?;
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            let line = String::from_utf8(raw).map_err(|e| KernelError::Decode {
                path: self.path.clone(),
                line: i + 1,
                reason: e.to_string(),
            })?;
            lines.push(line);
        }
        Ok(StoreLoad::Found(lines))
    }

    /// Decode every line as JSON.
    ///
    /// A line that fails to parse aborts the read with `KernelError::Decode`
    /// carrying its 1-based line number.
    pub fn read_json<T: serde::de::DeserializeOwned>(&self) -> Result<StoreLoad<Vec<T>>> {
        let lines = match self.read_lines()? {
            StoreLoad::Found(lines) => lines,
            StoreLoad::Empty => return Ok(StoreLoad::Empty),
        };

        lines
            .iter()
            .enumerate()
            .map(|(i, line)| self.decode_line(i + 1, line))
            .collect::<Result<Vec<T>>>()
            .map(StoreLoad::Found)
    }

    /// Decode a single line, attributing failures to this file.
    pub fn decode_line<T: serde::de::DeserializeOwned>(&self, line_no: usize, line: &str) -> Result<T> {
        serde_json::from_str(line).map_err(|e| KernelError::Decode {
            path: self.path.clone(),
            line: line_no,
            reason: e.to_string(),
        })
    }
}
