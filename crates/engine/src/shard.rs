//! An immutable, searchable snapshot of one registered directory's
//! basenames.
//!
//! A shard is rebuilt whole whenever its directory's content drifts; it is
//! never mutated in place. `Index` holds one shard per registered
//! directory and fans queries out across all of them.

use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use regex::Regex;
use smallvec::SmallVec;
use thiserror::Error;

use crate::rank::{self, MatchTier, get_start_letters};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShardError {
    #[error("basename {0:?} contains a newline and cannot be indexed")]
    CorruptBasename(String),
}

/// One file or directory entry living under a shard's root.
#[derive(Debug, Clone)]
pub struct ShardEntry {
    pub full_path: PathBuf,
    pub is_dir: bool,
}

/// A single search result: a lowercased basename plus the rank it scored
/// at, so the caller (`Index`) can merge hits coming from multiple shards.
/// Search is basename-level, not file-level — a basename shared by several
/// files surfaces once, at its best rank.
#[derive(Debug, Clone)]
pub struct Hit {
    pub basename: String,
    pub rank: u32,
    /// The shard that produced this hit, used by `Index` as a deterministic
    /// tie-break when merging hits of equal rank from multiple shards.
    pub shard_id: u32,
}

/// Accumulates entries for one directory before they are frozen into a
/// [`Shard`]. Entries are pushed as the indexer walks the directory tree;
/// nothing here is searchable until [`ShardBuilder::build`] succeeds.
pub struct ShardBuilder {
    id: u32,
    dir_id: u64,
    files_by_basename: HashMap<String, SmallVec<[u32; 1]>>,
    entries: Vec<ShardEntry>,
}

impl ShardBuilder {
    pub fn new(id: u32, dir_id: u64) -> Self {
        Self {
            id,
            dir_id,
            files_by_basename: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, full_path: PathBuf, basename: String, is_dir: bool) {
        let idx = self.entries.len() as u32;
        self.entries.push(ShardEntry { full_path, is_dir });
        self.files_by_basename.entry(basename).or_default().push(idx);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze the accumulated entries into a searchable shard, building the
    /// unsplit basename blobs and word-start prefix index.
    pub fn build(self) -> Result<Shard, ShardError> {
        let mut basenames: Vec<&str> = self.files_by_basename.keys().map(String::as_str).collect();
        basenames.sort_unstable();

        for name in &basenames {
            if name.contains('\n') {
                return Err(ShardError::CorruptBasename((*name).to_string()));
            }
        }

        // Every basename is fenced by `\n` on both sides so a substring or
        // word-start regex can never match across a basename boundary, and
        // the camelCase filter's `[^A-Z\n]` class treats the fence itself as
        // a non-word-start character.
        let mut basenames_unsplit = String::with_capacity(basenames.iter().map(|b| b.len() + 1).sum::<usize>() + 1);
        basenames_unsplit.push('\n');
        for name in &basenames {
            basenames_unsplit.push_str(name);
            basenames_unsplit.push('\n');
        }
        let lower_basenames_unsplit = basenames_unsplit.to_lowercase();

        // Basenames differing only by case collapse onto the same lowercase
        // key; the ranker is still scored against each original-case
        // variant so an exact-case match isn't diluted by a differently
        // cased sibling.
        let mut basenames_by_lower: HashMap<String, Vec<String>> = HashMap::new();
        for name in &basenames {
            basenames_by_lower.entry(name.to_lowercase()).or_default().push((*name).to_string());
        }

        let mut by_prefix: HashMap<String, Vec<(String, usize)>> = HashMap::new();
        for name in &basenames {
            let starts = get_start_letters(name);
            // A single word-start is no more useful than the exact/substring
            // stages already cover; skip it to keep the prefix index small.
            if starts.len() < 2 {
                continue;
            }
            let seq_lower: String = starts.iter().flat_map(|c| c.to_lowercase()).collect();
            let seq_len = seq_lower.chars().count();
            let lower_name = name.to_lowercase();
            for prefix_len in 1..=seq_len {
                let prefix: String = seq_lower.chars().take(prefix_len).collect();
                by_prefix.entry(prefix).or_default().push((lower_name.clone(), name.len()));
            }
        }

        let basenames_by_wordstarts = by_prefix
            .into_iter()
            .map(|(prefix, mut candidates)| {
                candidates.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
                let names = candidates.into_iter().map(|(name, _)| name).collect();
                (prefix, names)
            })
            .collect();

        Ok(Shard {
            id: self.id,
            dir_id: self.dir_id,
            files_by_basename: self.files_by_basename,
            entries: self.entries,
            basenames_unsplit,
            lower_basenames_unsplit,
            basenames_by_lower,
            basenames_by_wordstarts,
        })
    }
}

/// An immutable snapshot of one registered directory's basenames, searched
/// in three stages of decreasing precision and increasing cost.
pub struct Shard {
    id: u32,
    dir_id: u64,
    files_by_basename: HashMap<String, SmallVec<[u32; 1]>>,
    entries: Vec<ShardEntry>,
    basenames_unsplit: String,
    lower_basenames_unsplit: String,
    basenames_by_lower: HashMap<String, Vec<String>>,
    basenames_by_wordstarts: HashMap<String, Vec<String>>,
}

impl Shard {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn dir_id(&self) -> u64 {
        self.dir_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full paths registered under `basename` (exact case), in insertion
    /// order. Empty if no such basename is present in the shard.
    pub fn paths_for(&self, basename: &str) -> Vec<&Path> {
        self.files_by_basename
            .get(basename)
            .into_iter()
            .flatten()
            .filter_map(|&idx| self.entries.get(idx as usize))
            .map(|entry| entry.full_path.as_path())
            .collect()
    }

    /// Run the three-stage search: word-start prefix lookup, substring
    /// scan, and (only if the first two stages found nothing high-quality)
    /// a superfuzzy character-order scan. Each stage is bounded by
    /// `max_hits`. Results are collapsed to one entry per lowercased
    /// basename, keeping the best rank seen.
    pub fn search(&self, query: &str, max_hits: usize) -> Vec<Hit> {
        if query.is_empty() || max_hits == 0 {
            return Vec::new();
        }

        let mut out: Vec<Hit> = Vec::new();
        let mut seen_basenames: hashbrown::HashSet<String> = hashbrown::HashSet::new();
        let mut saw_high_quality = false;

        // Stage 1: word-start prefix lookup.
        let query_lower = query.to_lowercase();
        if let Some(candidates) = self.basenames_by_wordstarts.get(&query_lower) {
            for name in candidates.iter() {
                if out.len() >= max_hits {
                    break;
                }
                self.classify_into(&mut out, &mut seen_basenames, &mut saw_high_quality, query, name);
            }
        }

        // Stage 2: case-insensitive substring scan over the whole blob.
        if out.len() < max_hits {
            for name in scan_unique_lines(&self.lower_basenames_unsplit, &query_lower) {
                if out.len() >= max_hits {
                    break;
                }
                self.classify_into(&mut out, &mut seen_basenames, &mut saw_high_quality, query, name);
            }
        }

        // Stage 3: superfuzzy fallback, only when stages 1-2 found nothing
        // high-quality.
        if !saw_high_quality && out.len() < max_hits {
            for name in scan_superfuzzy_lines(&self.lower_basenames_unsplit, &query_lower) {
                if out.len() >= max_hits {
                    break;
                }
                self.classify_into(&mut out, &mut seen_basenames, &mut saw_high_quality, query, name);
            }
        }

        out.sort_by(|a, b| b.rank.cmp(&a.rank).then_with(|| a.basename.cmp(&b.basename)));
        out.truncate(max_hits);
        out
    }

    /// Score `lower_basename` once, against every original-case variant
    /// that shares it, and record the best result under that single
    /// lowercased key. `seen_basenames` keeps a basename that already
    /// surfaced in an earlier stage from being rescored and duplicated.
    fn classify_into(
        &self,
        out: &mut Vec<Hit>,
        seen_basenames: &mut hashbrown::HashSet<String>,
        saw_high_quality: &mut bool,
        query: &str,
        lower_basename: &str,
    ) {
        if !seen_basenames.insert(lower_basename.to_string()) {
            return;
        }
        let Some(variants) = self.basenames_by_lower.get(lower_basename) else {
            return;
        };

        let mut best: Option<(MatchTier, u32)> = None;
        for variant in variants {
            let Some(scored) = rank::classify(query, variant) else { continue };
            best = match best {
                Some(current) if current >= scored => Some(current),
                _ => Some(scored),
            };
        }
        let Some((tier, score)) = best else { return };

        if tier.is_high_quality() {
            *saw_high_quality = true;
        }
        out.push(Hit { basename: lower_basename.to_string(), rank: score, shard_id: self.id });
    }
}

/// Scan the fenced basename blob for lines containing `needle`, returning
/// each matching basename once.
fn scan_unique_lines<'a>(blob: &'a str, needle: &str) -> Vec<&'a str> {
    if needle.is_empty() {
        return Vec::new();
    }
    let pattern = format!(r"\n([^\n]*{}[^\n]*)\n", regex::escape(needle));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    dedup_preserve_order(scan_matches(&re, blob))
}

/// Scan the fenced basename blob for lines whose characters contain
/// `needle`'s characters in order, with arbitrary filler between them.
fn scan_superfuzzy_lines<'a>(blob: &'a str, needle: &str) -> Vec<&'a str> {
    if needle.is_empty() {
        return Vec::new();
    }
    let mut pattern = String::from(r"\n([^\n]*");
    for c in needle.chars() {
        pattern.push_str(&regex::escape(&c.to_string()));
        pattern.push_str("[^\n]*");
    }
    pattern.push_str(")\n");
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    dedup_preserve_order(scan_matches(&re, blob))
}

/// Walk every match of `re` over `blob`, restarting each subsequent search
/// at `match.end() - 1` instead of `match.end()`. A basename's trailing
/// `\n` fence is simultaneously the next basename's leading fence;
/// consuming it, as an iterator like `captures_iter` does, would make the
/// next basename unmatchable even though it's adjacent in the blob.
fn scan_matches<'a>(re: &Regex, blob: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let mut start = 0usize;
    let mut done = false;
    std::iter::from_fn(move || {
        if done || start > blob.len() {
            return None;
        }
        match re.captures_at(blob, start) {
            Some(caps) => {
                let whole = caps.get(0).expect("capture 0 always matches");
                start = whole.end().saturating_sub(1);
                caps.get(1).map(|g| g.as_str())
            }
            None => {
                done = true;
                None
            }
        }
    })
}

fn dedup_preserve_order<'a>(iter: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = hashbrown::HashSet::new();
    let mut out = Vec::new();
    for item in iter {
        if seen.insert(item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
#[path = "shard_tests.rs"]
mod tests;
