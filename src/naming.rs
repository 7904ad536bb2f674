//! Filename grammar for poem sources.
//!
//! Every poem lives in a text file named
//!
//! ```text
//! <YYYY.MM.DD>_<N>_<title>.txt
//! 2024.01.05_1_morning-light.txt
//! ```
//!
//! - `<YYYY.MM.DD>` is exactly four digits, a dot, two digits, a dot, two digits.
//! - `<N>` is one or more digits. It disambiguates poems written on the same
//!   day and is kept only so the page filename can mirror the source name.
//! - `<title>` is everything up to the `.txt` extension. It may be empty and may
//!   contain any character except a path separator.
//!
//! The grammar is total: a name either matches completely or is rejected with
//! [`ValidationError::Filename`]. There is no partial result.
//!
//! ## Display Titles
//!
//! Dashes in the title are converted to spaces for display, the same way for
//! page headings and index rows:
//! - `morning-light` → "morning light"
//! - `a-b-c` → "a b c"

use crate::error::ValidationError;
use std::path::Path;

/// Extension every poem source carries, including the dot.
pub const SOURCE_EXTENSION: &str = ".txt";

const DATE_LEN: usize = 10;

/// Result of parsing a poem filename like `2024.01.05_1_morning-light.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemFilename {
    /// Canonical `YYYY.MM.DD` date.
    pub date: String,
    /// Ordinal digits exactly as written (`"01"` stays `"01"`).
    pub ordinal: String,
    /// Raw title, dashes preserved.
    pub title: String,
}

impl PoemFilename {
    /// The source name without its extension.
    pub fn stem(&self) -> String {
        format!("{}_{}_{}", self.date, self.ordinal, self.title)
    }

    /// Page filename mirroring the source name with an `.html` extension.
    pub fn page_filename(&self) -> String {
        format!("{}.html", self.stem())
    }

    pub fn display_title(&self) -> String {
        display_title(&self.title)
    }
}

/// Parse a poem filename (not a path) against the grammar.
///
/// - `"2024.01.05_1_morning-light.txt"` → date="2024.01.05", ordinal="1", title="morning-light"
/// - `"2024.01.05_12_a_b.txt"` → ordinal="12", title="a_b"
/// - `"2024.01.05_1_.txt"` → title=""
/// - `"morning-light.txt"`, `"2024-01-05_1_x.txt"`, `"2024.01.05_x.txt"` → error
pub fn parse_poem_filename(name: &str) -> Result<PoemFilename, ValidationError> {
    let invalid = || ValidationError::Filename(name.to_string());

    let stem = name.strip_suffix(SOURCE_EXTENSION).ok_or_else(invalid)?;
    if stem.len() < DATE_LEN || !is_date(&stem.as_bytes()[..DATE_LEN]) {
        return Err(invalid());
    }
    // The first DATE_LEN bytes are ASCII, so this split is on a char boundary.
    let (date, rest) = stem.split_at(DATE_LEN);

    let rest = rest.strip_prefix('_').ok_or_else(invalid)?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(invalid());
    }
    let (ordinal, rest) = rest.split_at(digits);

    let title = rest.strip_prefix('_').ok_or_else(invalid)?;
    if title.contains(['/', '\\']) {
        return Err(invalid());
    }

    Ok(PoemFilename {
        date: date.to_string(),
        ordinal: ordinal.to_string(),
        title: title.to_string(),
    })
}

fn is_date(bytes: &[u8]) -> bool {
    bytes.len() == DATE_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'.',
            _ => b.is_ascii_digit(),
        })
}

/// Title with dashes converted to spaces.
pub fn display_title(title: &str) -> String {
    title.replace('-', " ")
}

/// Final path component of a stored filepath, or the whole string when it has none.
pub fn basename(filepath: &str) -> &str {
    Path::new(filepath)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filepath)
}
