//! JSON file primitives for the file-backed stores.
//!
//! # Invariants
//! - Writes land in a temp file inside the target directory, which is then
//!   persisted over the target; readers see the old or the new file, never a
//!   partial one.
//! - Reads never fail the caller; problems are reported as `ReadOutcome`.
//! - Failure reasons carry error kind and position only, never file content.

use crate::repo::error::{RepoError, RepoResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Result of reading a JSON store file.
pub(crate) enum ReadOutcome<T> {
    Missing,
    Loaded(T),
    /// File exists but could not be read or parsed.
    Unreadable(String),
}

/// Items of a JSON array file that decoded, plus the count that did not.
pub(crate) struct ArrayItems<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> ReadOutcome<T> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return ReadOutcome::Missing,
        Err(err) => return ReadOutcome::Unreadable(format!("io:{:?}", err.kind())),
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => ReadOutcome::Loaded(value),
        Err(err) => ReadOutcome::Unreadable(describe_json_error(&err)),
    }
}

/// Reads a JSON array, decoding each element on its own.
///
/// An element that does not decode as `T` is counted in `skipped`; the other
/// elements are still returned. Only a file that is not an array at all is
/// `Unreadable`.
pub(crate) fn read_json_array<T: DeserializeOwned>(path: &Path) -> ReadOutcome<ArrayItems<T>> {
    let values = match read_json::<Vec<Value>>(path) {
        ReadOutcome::Missing => return ReadOutcome::Missing,
        ReadOutcome::Unreadable(reason) => return ReadOutcome::Unreadable(reason),
        ReadOutcome::Loaded(values) => values,
    };

    let total = values.len();
    let items: Vec<T> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    ReadOutcome::Loaded(ArrayItems {
        skipped: total - items.len(),
        items,
    })
}

fn describe_json_error(err: &serde_json::Error) -> String {
    format!(
        "json:{:?} line={} column={}",
        err.classify(),
        err.line(),
        err.column()
    )
}

/// Serializes `value` as indented JSON and atomically replaces `path`.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> RepoResult<()> {
    let io_error = |source: std::io::Error| RepoError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
    serde_json::to_writer_pretty(&mut temp, value)?;
    temp.write_all(b"\n").map_err(io_error)?;
    temp.as_file().sync_all().map_err(io_error)?;
    temp.persist(path).map_err(|err| io_error(err.error))?;
    Ok(())
}
