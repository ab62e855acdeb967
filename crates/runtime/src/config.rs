use std::path::PathBuf;

pub const PROGRAM_NAME: &str = "snapfind";
pub const PROGRAM_LOG_LEVEL: &str = "SNAPFIND_LOG_LEVEL";

/// Name of the settings file dropped in the user's home directory.
pub const SETTINGS_FILE_NAME: &str = ".snapfindd";

/// Default TCP port the daemon listens on.
pub const DEFAULT_PORT: u16 = 10248;

/// Default host the daemon listens on.
pub const DEFAULT_HOST: &str = "localhost";

/// Default maximum accepted query length (bytes), per the Query Service's
/// validation contract.
pub const DEFAULT_QUERY_LIMIT: usize = 256;

pub fn xdg_or_home(xdg_var: &str, home_suffix: &str) -> PathBuf {
    if let Some(dir) = std::env::var_os(xdg_var) {
        PathBuf::from(dir)
    } else {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(home_suffix)
    }
}

pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Directory the daemon caches per-directory basename snapshots under.
pub fn snapfind_dir() -> PathBuf {
    xdg_or_home("XDG_CACHE_HOME", ".cache").join(PROGRAM_NAME)
}

/// Default path to the basename cache file for a tracked directory.
pub fn default_cache_path(dir_id: u64) -> PathBuf {
    snapfind_dir().join("dirs").join(format!("{dir_id:016x}.cache"))
}

/// Default settings-file path: `~/.snapfindd`.
pub fn default_settings_path() -> PathBuf {
    home_dir().join(SETTINGS_FILE_NAME)
}

/// Default ignore patterns seeded into a fresh `Index`, covering common
/// VCS/build/dependency noise. A pattern with no path separator matches any
/// path segment, which is the "any segment matches" rule the Index's ignore
/// set is specified with.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "target",
    "build",
    "dist",
    ".cache",
    "__pycache__",
    ".DS_Store",
];
