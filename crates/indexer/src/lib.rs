//! Drives `Index` from IDLE filesystem work: one bounded step at a time,
//! never blocking the caller beyond a single batch of directory entries.
//!
//! `Indexer` holds no data an `Index` doesn't already expose through its
//! handles; it only tracks the in-progress walk state for directories that
//! are mid-enumeration, plus the baseline mtime each published directory
//! was last built from.

mod cache;
mod walk;

use std::collections::HashMap;

use log::{debug, warn};
use snapfind_engine::{DirHandle, Index, ShardBuilder};
use snapfind_fs::{IgnoreEngine, dir_mtime_secs};

use cache::CachedDir;
use walk::{CollectedEntry, WalkState};

/// Directory entries processed per `step` call while enumerating. Bounds
/// the wall-clock cost of a single step to roughly the time of ~32 `stat`
/// calls, which is well under the idle scheduler's hi-idle interval.
pub const ENUMERATE_BATCH: usize = 32;

/// One outcome of a single `Indexer::step` call, useful for logging and
/// for tests asserting the state machine takes the path it should.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing needed doing; the caller should let the idle scheduler back
    /// off to its slower interval.
    Idle,
    /// Walked another batch of a directory still being enumerated.
    Enumerated { handle: DirHandle, entries: usize },
    /// A directory's walk finished and its shard was published.
    Published { handle: DirHandle, entry_count: usize },
    /// A previously published directory's mtime drifted; it has been
    /// marked pending again.
    DriftDetected { handle: DirHandle },
}

/// Monotonically increasing id source for shards, independent of
/// directory ids (a directory is rebuilt many times over its lifetime,
/// each with a fresh shard id).
struct ShardIdSource(u32);

impl ShardIdSource {
    fn next(&mut self) -> u32 {
        let id = self.0;
        self.0 = self.0.wrapping_add(1);
        id
    }
}

pub struct Indexer {
    walks: HashMap<u64, WalkState>,
    baseline_mtime: HashMap<u64, u64>,
    drift_cursor: usize,
    shard_ids: ShardIdSource,
    persist_cache: bool,
}

impl Indexer {
    pub fn new() -> Self {
        Self {
            walks: HashMap::new(),
            baseline_mtime: HashMap::new(),
            drift_cursor: 0,
            shard_ids: ShardIdSource(0),
            persist_cache: true,
        }
    }

    /// Disable the on-disk basename cache, e.g. under `--test` where a
    /// fresh walk every run is preferable to stale fixtures.
    pub fn without_cache(mut self) -> Self {
        self.persist_cache = false;
        self
    }

    /// Perform at most one bounded unit of work and report what happened.
    /// Never blocks beyond the current batch; safe to call from the
    /// control loop on every hi-idle tick.
    pub fn step(&mut self, index: &mut Index) -> StepOutcome {
        let ignore = index.ignore_engine().clone();

        if let Some(outcome) = self.continue_active_walk(index, &ignore) {
            return outcome;
        }

        if let Some(outcome) = self.start_next_pending(index, &ignore) {
            return outcome;
        }

        if let Some(outcome) = self.check_drift(index) {
            return outcome;
        }

        StepOutcome::Idle
    }

    fn continue_active_walk(&mut self, index: &mut Index, ignore: &IgnoreEngine) -> Option<StepOutcome> {
        let &dir_id = self.walks.keys().next()?;
        let handle = DirHandle(dir_id);
        let state = self.walks.get_mut(&dir_id)?;

        if !state.is_collected() {
            let inspected = match state.advance(ignore, ENUMERATE_BATCH) {
                Ok(n) => n,
                Err(e) => {
                    warn!("walk of dir {dir_id} failed: {e}");
                    self.walks.remove(&dir_id);
                    return Some(StepOutcome::Idle);
                }
            };
            if !state.is_collected() {
                return Some(StepOutcome::Enumerated { handle, entries: inspected });
            }
        }

        let state = self.walks.remove(&dir_id)?;
        let (collected, root_mtime) = state.into_collected()?;
        Some(self.publish(index, handle, collected, root_mtime))
    }

    fn start_next_pending(&mut self, index: &mut Index, ignore: &IgnoreEngine) -> Option<StepOutcome> {
        let handle = index.pending_dirs().into_iter().find(|h| !self.walks.contains_key(&h.0))?;
        let path = index.dir_path(handle)?.to_path_buf();

        if self.persist_cache
            && let Some(cached) = cache::load(handle.0)
            && dir_mtime_secs(&path).ok() == Some(cached.root_mtime_secs)
        {
            let collected: Vec<CollectedEntry> = cached.entries.into_iter().map(CollectedEntry::from).collect();
            return Some(self.publish(index, handle, collected, cached.root_mtime_secs));
        }

        match WalkState::start(&path) {
            Ok(mut state) => {
                let entries = state.advance(ignore, ENUMERATE_BATCH).unwrap_or(0);
                let done = state.is_collected();
                self.walks.insert(handle.0, state);
                if done {
                    self.continue_active_walk(index, ignore)
                } else {
                    Some(StepOutcome::Enumerated { handle, entries })
                }
            }
            Err(e) => {
                warn!("failed to start walk of {}: {e}", path.display());
                None
            }
        }
    }

    fn publish(&mut self, index: &mut Index, handle: DirHandle, collected: Vec<CollectedEntry>, root_mtime: u64) -> StepOutcome {
        let entry_count = collected.len();
        let mut builder = ShardBuilder::new(self.shard_ids.next(), handle.0);
        for entry in &collected {
            builder.push(entry.full_path.clone(), entry.basename.clone(), entry.is_dir);
        }

        match builder.build() {
            Ok(shard) => {
                index.publish_shard(handle, shard);
                self.baseline_mtime.insert(handle.0, root_mtime);
                if self.persist_cache {
                    let cached = CachedDir {
                        root_mtime_secs: root_mtime,
                        entries: collected
                            .into_iter()
                            .map(|c| cache::CachedEntry {
                                full_path: c.full_path,
                                basename: c.basename,
                                is_dir: c.is_dir,
                            })
                            .collect(),
                    };
                    if let Err(e) = cache::save(handle.0, &cached) {
                        warn!("failed to persist basename cache for dir {}: {e}", handle.0);
                    }
                }
                debug!("published shard for dir {} ({entry_count} entries)", handle.0);
                StepOutcome::Published { handle, entry_count }
            }
            Err(e) => {
                warn!("shard build failed for dir {}: {e}", handle.0);
                StepOutcome::Idle
            }
        }
    }

    /// Check one published directory for mtime drift, round-robining
    /// across directories so every one gets checked eventually rather than
    /// always re-checking the first.
    fn check_drift(&mut self, index: &mut Index) -> Option<StepOutcome> {
        let ready: Vec<DirHandle> = index
            .list_dirs()
            .into_iter()
            .filter(|(_, _, state)| *state == snapfind_engine::DirState::Ready)
            .map(|(handle, _, _)| handle)
            .collect();
        if ready.is_empty() {
            return None;
        }

        self.drift_cursor %= ready.len();
        let handle = ready[self.drift_cursor];
        self.drift_cursor = (self.drift_cursor + 1) % ready.len();

        let path = index.dir_path(handle)?.to_path_buf();
        let current_mtime = dir_mtime_secs(&path).ok()?;
        let baseline = self.baseline_mtime.get(&handle.0).copied();

        if baseline != Some(current_mtime) {
            index.invalidate(handle);
            if self.persist_cache {
                cache::remove(handle.0);
            }
            return Some(StepOutcome::DriftDetected { handle });
        }

        None
    }
}

impl Default for Indexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
