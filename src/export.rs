//! Reading relationship exports and pulling usernames out of them.
//!
//! Exports are flat JSON where every account appears as
//! `"value": "<username>"`, usually followed in the same entry by
//! `"timestamp": <unix seconds>`. This is a literal scanner for those two
//! fields, not a JSON parser: anything that does not fit the pattern is
//! skipped.

use crate::sym_table::SymTable;
use core::fmt;
use std::io;
use std::path::{Path, PathBuf};

const VALUE_MARKER: &str = "\"value\":";
const TIMESTAMP_MARKER: &str = "\"timestamp\":";

#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, source: io::Error },
    Utf8 { path: PathBuf },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "Error opening file {}: {source}", path.display())
            }
            LoadError::Utf8 { path } => {
                write!(f, "Error reading file {}: not valid UTF-8", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Utf8 { .. } => None,
        }
    }
}

/// Whole contents of the export at `path`.
pub fn read_export(path: impl AsRef<Path>) -> Result<String, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| LoadError::Utf8 {
        path: path.to_path_buf(),
    })
}

/// One account pulled from an export: the username and, when the same
/// entry carries one, its `"timestamp"` in Unix seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry<'a> {
    pub username: &'a str,
    pub timestamp: Option<u64>,
}

/// Username captured right after a `"value":` marker, if the text there
/// reads `<ws>"<one or more non-quote chars>"`. Also returns the text after
/// the closing quote.
fn capture_after_marker(rest: &str) -> Option<(&str, &str)> {
    let quoted = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let body = quoted.strip_prefix('"')?;
    let end = body.find('"')?;
    match &body[..end] {
        "" => None,
        name => Some((name, &body[end + 1..])),
    }
}

/// Timestamp belonging to the entry that `rest` continues. The search stops
/// at the entry's closing brace or at the next `"value":`, whichever is first.
fn timestamp_after(rest: &str) -> Option<u64> {
    let mut scope = &rest[..rest.find('}').unwrap_or(rest.len())];
    if let Some(next) = scope.find(VALUE_MARKER) {
        scope = &scope[..next];
    }
    let at = scope.find(TIMESTAMP_MARKER)?;
    let digits = scope[at + TIMESTAMP_MARKER.len()..]
        .trim_start_matches(|c: char| c.is_ascii_whitespace());
    let len = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..len].parse().ok()
}

/// Every account entry in `text`, in order of appearance, duplicates
/// included.
pub fn entries(text: &str) -> impl Iterator<Item = Entry<'_>> + '_ {
    let mut from = 0;
    core::iter::from_fn(move || loop {
        let at = from + text.get(from..)?.find(VALUE_MARKER)?;
        // Resume one byte past this marker; the marker starts with an ASCII
        // quote so `at + 1` is always a char boundary.
        from = at + 1;
        let rest = &text[at + VALUE_MARKER.len()..];
        if let Some((username, rest)) = capture_after_marker(rest) {
            return Some(Entry {
                username,
                timestamp: timestamp_after(rest),
            });
        }
    })
}

/// Every username in `text`, in order of appearance, duplicates included.
pub fn usernames(text: &str) -> impl Iterator<Item = &str> + '_ {
    entries(text).map(|entry| entry.username)
}

/// Puts every account found in `text` into `table`, keyed by username with
/// its timestamp as the value. Returns how many were new; repeats are
/// ignored, so the first timestamp seen for a name is the one kept.
pub fn extract_usernames(text: &str, table: &mut SymTable<Option<u64>>) -> usize {
    entries(text)
        .filter(|entry| table.put(entry.username, entry.timestamp).is_ok())
        .count()
}
