use std::fs::{self, DirEntry};
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::excludes::IgnoreEngine;
use crate::record::FileEntry;

/// Inspect a single directory entry, classifying it against `ignore`.
///
/// This is the unit of work the cooperative indexer builds its bounded
/// steps out of: one call per entry, no recursion, no blocking beyond the
/// single `stat` the metadata call requires.
pub fn inspect_entry(entry: &DirEntry, ignore: &IgnoreEngine) -> io::Result<Option<FileEntry>> {
    let metadata = entry.metadata()?;
    let full_path = entry.path();
    let is_dir = metadata.is_dir();
    let is_symlink = metadata.is_symlink();

    let name = match entry.file_name().to_str() {
        Some(s) => s.to_owned(),
        None => return Ok(None),
    };

    let ignored = ignore.is_ignored(&full_path, is_dir);
    let mtime_secs = to_unix_secs(metadata.modified().ok());

    Ok(Some(FileEntry {
        full_path,
        name,
        is_dir,
        is_symlink,
        mtime_secs,
        ignored,
    }))
}

/// Whether the walker should descend into this entry.
#[inline]
pub fn should_recurse(entry: &FileEntry) -> bool {
    entry.is_dir && !entry.ignored && !entry.is_symlink
}

/// Open `dir` for iteration, swallowing the common "it vanished" race
/// silently (this happens constantly on a live filesystem under
/// incremental indexing) while surfacing other errors.
pub fn read_dir_lenient(dir: &std::path::Path) -> io::Result<Option<fs::ReadDir>> {
    match fs::read_dir(dir) {
        Ok(rd) => Ok(Some(rd)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn to_unix_secs(t: Option<SystemTime>) -> u64 {
    t.and_then(|tt| tt.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Directory mtime, used by the indexer to notice drift on a published
/// directory without re-walking it.
pub fn dir_mtime_secs(dir: &std::path::Path) -> io::Result<u64> {
    let metadata = fs::metadata(dir)?;
    Ok(to_unix_secs(metadata.modified().ok()))
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
