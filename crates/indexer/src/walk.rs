//! Bounded, resumable walk state for a single directory.
//!
//! A directory moves through `Enumerating` (queue of subdirectories still
//! to read) to `Collected` (the walk finished; a shard is waiting to be
//! built) to published, at which point its `Indexer` bookkeeping is
//! dropped and `Index` owns the shard going forward.

use std::collections::VecDeque;
use std::path::PathBuf;

use snapfind_fs::{IgnoreEngine, dir_mtime_secs, inspect_entry, read_dir_lenient, should_recurse};

use crate::cache::CachedEntry;

pub struct CollectedEntry {
    pub full_path: PathBuf,
    pub basename: String,
    pub is_dir: bool,
}

impl From<CachedEntry> for CollectedEntry {
    fn from(c: CachedEntry) -> Self {
        Self {
            full_path: c.full_path,
            basename: c.basename,
            is_dir: c.is_dir,
        }
    }
}

pub enum WalkState {
    Enumerating {
        queue: VecDeque<PathBuf>,
        collected: Vec<CollectedEntry>,
        root_mtime: u64,
    },
    Collected {
        collected: Vec<CollectedEntry>,
        root_mtime: u64,
    },
}

impl WalkState {
    pub fn start(root: &std::path::Path) -> std::io::Result<Self> {
        let root_mtime = dir_mtime_secs(root)?;
        let mut queue = VecDeque::new();
        queue.push_back(root.to_path_buf());
        Ok(WalkState::Enumerating {
            queue,
            collected: Vec::new(),
            root_mtime,
        })
    }

    /// Process up to `budget` directory entries, reading from the front of
    /// the directory queue. Returns the number of entries actually
    /// inspected. Once the queue drains, the state transitions to
    /// `Collected` on the caller's next `advance` call.
    pub fn advance(&mut self, ignore: &IgnoreEngine, budget: usize) -> std::io::Result<usize> {
        let WalkState::Enumerating { queue, collected, .. } = self else {
            return Ok(0);
        };

        let mut inspected = 0;
        while inspected < budget {
            let Some(dir) = queue.front().cloned() else {
                break;
            };
            let Some(read_dir) = read_dir_lenient(&dir)? else {
                queue.pop_front();
                continue;
            };

            for entry in read_dir {
                let entry = entry?;
                let Some(record) = inspect_entry(&entry, ignore)? else {
                    continue;
                };
                inspected += 1;
                if should_recurse(&record) {
                    queue.push_back(record.full_path.clone());
                }
                if !record.ignored {
                    collected.push(CollectedEntry {
                        full_path: record.full_path,
                        basename: record.name,
                        is_dir: record.is_dir,
                    });
                }
                if inspected >= budget {
                    break;
                }
            }
            queue.pop_front();
        }

        let drained = queue.is_empty();
        if drained {
            let placeholder = WalkState::Collected { collected: Vec::new(), root_mtime: 0 };
            if let WalkState::Enumerating { collected, root_mtime, .. } = std::mem::replace(self, placeholder) {
                *self = WalkState::Collected { collected, root_mtime };
            }
        }

        Ok(inspected)
    }

    pub fn is_collected(&self) -> bool {
        matches!(self, WalkState::Collected { .. })
    }

    pub fn into_collected(self) -> Option<(Vec<CollectedEntry>, u64)> {
        match self {
            WalkState::Collected { collected, root_mtime } => Some((collected, root_mtime)),
            WalkState::Enumerating { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "walk_tests.rs"]
mod tests;
