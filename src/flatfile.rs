//! Whole-file primitives shared by the registry and the poem stores.
//!
//! Both stores are plain text files with one record per line. Reads load the
//! whole file; mutations either append one line or compute the complete new
//! contents in memory and replace the file. Nothing edits a file in place.
//!
//! Replacement writes a sibling temporary file and renames it over the target,
//! so an interrupted rewrite leaves the previous contents behind. There is no
//! locking: two processes mutating the same store can still lose an update.

use crate::error::Error;
use std::borrow::Cow;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use uuid::Uuid;

/// A non-blank line and its 1-based position in the file.
///
/// Lines are kept as bytes; [`Line::text`] is `None` when the line is not
/// valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line {
    pub number: usize,
    pub bytes: Vec<u8>,
}

impl Line {
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// The line for display in error messages.
    pub fn lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Error for a rewrite that refuses to drop this line.
    pub fn corrupt(&self, path: &Path) -> Error {
        Error::Corrupt {
            path: path.to_path_buf(),
            line: self.number,
            content: self.lossy().into_owned(),
        }
    }
}

/// Read every non-blank line, with `\n` / `\r\n` endings trimmed.
///
/// A missing file reads as empty. Invalid UTF-8 affects only the lines that
/// contain it.
pub(crate) fn read_lines(path: &Path) -> io::Result<Vec<Line>> {
    let content = match fs::read(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    Ok(content
        .split(|&b| b == b'\n')
        .enumerate()
        .map(|(i, raw)| (i, raw.strip_suffix(b"\r").unwrap_or(raw)))
        .filter(|(_, raw)| !raw.iter().all(u8::is_ascii_whitespace))
        .map(|(i, raw)| Line {
            number: i + 1,
            bytes: raw.to_vec(),
        })
        .collect())
}

/// Append one line, creating the file if needed.
///
/// If the existing contents lack a trailing newline, one is written first so
/// the new record never merges into the last one.
pub(crate) fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let needs_separator = match fs::read(path) {
        Ok(bytes) => !bytes.is_empty() && !bytes.ends_with(b"\n"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e),
    };
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut buf = String::with_capacity(line.len() + 2);
    if needs_separator {
        buf.push('\n');
    }
    buf.push_str(line);
    buf.push('\n');
    file.write_all(buf.as_bytes())
}

/// Replace the whole file with `lines`, one per line.
pub(crate) fn rewrite(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));
    fs::write(&tmp, content)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}
