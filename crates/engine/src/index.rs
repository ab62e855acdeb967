//! Owns the set of registered directories, their shards, and the shared
//! ignore-pattern set; fans searches out across shards in parallel.

use std::path::{Path, PathBuf};
use std::thread;

use log::debug;
use snapfind_fs::IgnoreEngine;

use crate::shard::{Hit, Shard};

/// Opaque handle to a registered directory. Stable for the lifetime of the
/// directory's registration; reused ids are never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    /// Registered but not yet walked.
    Pending,
    /// A shard has been built and published for this directory.
    Ready,
}

struct DirRecord {
    id: u64,
    path: PathBuf,
    shard: Option<Shard>,
    state: DirState,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexStatus {
    pub dir_count: usize,
    pub ready_dir_count: usize,
    pub total_entries: usize,
}

/// The live, queryable view of every registered directory. `Index` itself
/// does no filesystem work: directories are registered here and handed to
/// the indexer, which walks them and calls back with finished shards.
pub struct Index {
    next_dir_id: u64,
    dirs: Vec<DirRecord>,
    ignore: IgnoreEngine,
}

impl Index {
    pub fn new(ignore_patterns: &[&str]) -> Self {
        Self {
            next_dir_id: 1,
            dirs: Vec::new(),
            ignore: IgnoreEngine::new(ignore_patterns),
        }
    }

    pub fn add_dir(&mut self, path: PathBuf) -> DirHandle {
        let id = self.next_dir_id;
        self.next_dir_id += 1;
        self.dirs.push(DirRecord {
            id,
            path,
            shard: None,
            state: DirState::Pending,
        });
        DirHandle(id)
    }

    pub fn delete_dir(&mut self, handle: DirHandle) -> bool {
        let before = self.dirs.len();
        self.dirs.retain(|d| d.id != handle.0);
        self.dirs.len() != before
    }

    pub fn list_dirs(&self) -> Vec<(DirHandle, PathBuf, DirState)> {
        self.dirs
            .iter()
            .map(|d| (DirHandle(d.id), d.path.clone(), d.state))
            .collect()
    }

    pub fn dir_path(&self, handle: DirHandle) -> Option<&Path> {
        self.dirs.iter().find(|d| d.id == handle.0).map(|d| d.path.as_path())
    }

    /// Directories still awaiting their first shard, in registration order.
    /// The indexer drains this list one bounded step at a time.
    pub fn pending_dirs(&self) -> Vec<DirHandle> {
        self.dirs
            .iter()
            .filter(|d| d.state == DirState::Pending)
            .map(|d| DirHandle(d.id))
            .collect()
    }

    /// Install a freshly built shard for `handle`, replacing whatever shard
    /// (if any) was previously published for that directory.
    pub fn publish_shard(&mut self, handle: DirHandle, shard: Shard) {
        if let Some(record) = self.dirs.iter_mut().find(|d| d.id == handle.0) {
            debug!(
                "publishing shard for dir {} ({} entries)",
                handle.0,
                shard.len()
            );
            record.shard = Some(shard);
            record.state = DirState::Ready;
        }
    }

    /// Mark a previously-ready directory as pending again, forcing the
    /// indexer to rebuild its shard on the next scheduling pass. Used when
    /// mtime drift is detected, or when a reindex is requested explicitly.
    pub fn invalidate(&mut self, handle: DirHandle) {
        if let Some(record) = self.dirs.iter_mut().find(|d| d.id == handle.0) {
            record.state = DirState::Pending;
        }
    }

    pub fn begin_reindex(&mut self) {
        for record in &mut self.dirs {
            record.state = DirState::Pending;
        }
    }

    pub fn ignore(&mut self, pattern: &str) -> bool {
        self.ignore.add(pattern)
    }

    pub fn unignore(&mut self, pattern: &str) -> bool {
        self.ignore.remove(pattern)
    }

    pub fn get_ignores(&self) -> &[String] {
        self.ignore.patterns()
    }

    pub fn ignore_engine(&self) -> &IgnoreEngine {
        &self.ignore
    }

    pub fn status(&self) -> IndexStatus {
        IndexStatus {
            dir_count: self.dirs.len(),
            ready_dir_count: self.dirs.iter().filter(|d| d.state == DirState::Ready).count(),
            total_entries: self.dirs.iter().filter_map(|d| d.shard.as_ref()).map(Shard::len).sum(),
        }
    }

    /// Search every published shard in parallel and merge the results.
    ///
    /// Each shard is searched independently and bounded by `max_hits`; the
    /// merge then keeps, per (lowercased) basename, only the highest-ranked
    /// hit across shards, breaking ties by ascending shard id and then by
    /// the order the hit arrived in within that shard.
    pub fn search(&self, query: &str, max_hits: usize) -> Vec<Hit> {
        if query.is_empty() || max_hits == 0 {
            return Vec::new();
        }

        let shards: Vec<&Shard> = self.dirs.iter().filter_map(|d| d.shard.as_ref()).collect();
        if shards.is_empty() {
            return Vec::new();
        }

        let per_shard: Vec<Vec<Hit>> = thread::scope(|scope| {
            let handles: Vec<_> = shards
                .iter()
                .map(|shard| scope.spawn(|| shard.search(query, max_hits)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap_or_default()).collect()
        });

        merge_hits(per_shard, max_hits)
    }
}

/// Merge per-shard hit lists, keeping the best-ranked hit for each
/// (lowercased) basename. Ties break by ascending shard id, then by
/// arrival order within that shard's own result list.
fn merge_hits(per_shard: Vec<Vec<Hit>>, max_hits: usize) -> Vec<Hit> {
    let mut best: hashbrown::HashMap<String, (Hit, usize)> = hashbrown::HashMap::new();

    for hits in per_shard {
        for (order, hit) in hits.into_iter().enumerate() {
            best.entry(hit.basename.clone())
                .and_modify(|(existing, existing_order)| {
                    let better = hit.rank > existing.rank
                        || (hit.rank == existing.rank
                            && (hit.shard_id, order) < (existing.shard_id, *existing_order));
                    if better {
                        *existing = hit.clone();
                        *existing_order = order;
                    }
                })
                .or_insert((hit, order));
        }
    }

    let mut out: Vec<Hit> = best.into_values().map(|(hit, _)| hit).collect();
    out.sort_by(|a, b| {
        b.rank
            .cmp(&a.rank)
            .then_with(|| a.shard_id.cmp(&b.shard_id))
            .then_with(|| a.basename.cmp(&b.basename))
    });
    out.truncate(max_hits);
    out
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
