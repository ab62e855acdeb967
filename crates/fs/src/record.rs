use std::path::PathBuf;

/// One directory entry observed by the walker: a basename plus just enough
/// metadata for the indexer to decide whether to recurse into it and
/// whether a previously-published directory is stale.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub full_path: PathBuf,
    /// Basename: the last path component.
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
    /// Last modified time, Unix seconds. Used to detect drift for
    /// published directories without re-walking them.
    pub mtime_secs: u64,
    /// True if this entry matched an ignore pattern (it is still returned
    /// so the caller can decide not to recurse into it, but it never makes
    /// it into a shard).
    pub ignored: bool,
}
