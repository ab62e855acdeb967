//! On-disk basename cache, keyed by directory id. Lets the daemon restore a
//! directory's shard from a previous run without a full walk, deferring to
//! a cheap mtime check to decide whether it is still trustworthy.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use snapfind_runtime::default_cache_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEntry {
    pub full_path: PathBuf,
    pub basename: String,
    pub is_dir: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedDir {
    pub root_mtime_secs: u64,
    pub entries: Vec<CachedEntry>,
}

fn bincode_config() -> bincode::config::Configuration {
    bincode::config::standard()
}

pub fn load(dir_id: u64) -> Option<CachedDir> {
    let path = default_cache_path(dir_id);
    let bytes = fs::read(path).ok()?;
    bincode::serde::decode_from_slice(&bytes, bincode_config())
        .ok()
        .map(|(cached, _)| cached)
}

pub fn save(dir_id: u64, cached: &CachedDir) -> anyhow::Result<()> {
    let path = default_cache_path(dir_id);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let bytes = bincode::serde::encode_to_vec(cached, bincode_config())?;
    fs::write(path, bytes)?;
    Ok(())
}

pub fn remove(dir_id: u64) {
    let path = default_cache_path(dir_id);
    let _ = fs::remove_file(path);
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
