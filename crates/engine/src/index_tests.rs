use super::*;
use crate::shard::ShardBuilder;
use std::path::PathBuf;

fn shard_from(id: u32, dir_id: u64, names: &[(&str, &str)]) -> Shard {
    let mut builder = ShardBuilder::new(id, dir_id);
    for (dir, name) in names {
        builder.push(PathBuf::from(format!("{dir}/{name}")), (*name).to_string(), false);
    }
    builder.build().unwrap()
}

#[test]
fn add_dir_registers_pending_directory() {
    let mut index = Index::new(&[]);
    let handle = index.add_dir(PathBuf::from("/a"));
    assert_eq!(index.pending_dirs(), vec![handle]);
    let dirs = index.list_dirs();
    assert_eq!(dirs.len(), 1);
    assert_eq!(dirs[0].2, DirState::Pending);
}

#[test]
fn publish_shard_moves_directory_to_ready() {
    let mut index = Index::new(&[]);
    let handle = index.add_dir(PathBuf::from("/a"));
    index.publish_shard(handle, shard_from(0, handle.0, &[("/a", "main.rs")]));
    assert!(index.pending_dirs().is_empty());
    assert_eq!(index.status().ready_dir_count, 1);
}

#[test]
fn delete_dir_removes_registration() {
    let mut index = Index::new(&[]);
    let handle = index.add_dir(PathBuf::from("/a"));
    assert!(index.delete_dir(handle));
    assert!(index.list_dirs().is_empty());
    assert!(!index.delete_dir(handle));
}

#[test]
fn begin_reindex_marks_every_directory_pending_again() {
    let mut index = Index::new(&[]);
    let handle = index.add_dir(PathBuf::from("/a"));
    index.publish_shard(handle, shard_from(0, handle.0, &[("/a", "main.rs")]));
    index.begin_reindex();
    assert_eq!(index.pending_dirs(), vec![handle]);
}

#[test]
fn ignore_and_unignore_round_trip() {
    let mut index = Index::new(&[]);
    assert!(index.ignore("*.log"));
    assert_eq!(index.get_ignores(), &["*.log".to_string()]);
    assert!(index.unignore("*.log"));
    assert!(index.get_ignores().is_empty());
}

#[test]
fn search_with_no_ready_shards_returns_empty() {
    let mut index = Index::new(&[]);
    index.add_dir(PathBuf::from("/a"));
    assert!(index.search("main", 10).is_empty());
}

#[test]
fn search_merges_hits_across_shards() {
    let mut index = Index::new(&[]);
    let a = index.add_dir(PathBuf::from("/a"));
    let b = index.add_dir(PathBuf::from("/b"));
    index.publish_shard(a, shard_from(0, a.0, &[("/a", "main.rs")]));
    index.publish_shard(b, shard_from(1, b.0, &[("/b", "manifest.rs")]));

    let hits = index.search("main", 10);
    assert!(hits.iter().any(|h| h.basename == "main.rs"));
}

#[test]
fn search_keeps_best_rank_when_same_basename_scores_in_two_shards() {
    let hit_a = Hit { basename: "main.rs".to_string(), rank: 10, shard_id: 1 };
    let hit_b = Hit { basename: "main.rs".to_string(), rank: 20, shard_id: 0 };
    let merged = merge_hits(vec![vec![hit_a], vec![hit_b]], 10);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].rank, 20);
}

#[test]
fn search_breaks_rank_ties_by_ascending_shard_id() {
    let hit_a = Hit { basename: "main.rs".to_string(), rank: 10, shard_id: 1 };
    let hit_b = Hit { basename: "main.rs".to_string(), rank: 10, shard_id: 0 };
    let merged = merge_hits(vec![vec![hit_a], vec![hit_b]], 10);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].shard_id, 0);
}
