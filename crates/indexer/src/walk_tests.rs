use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn advance_collects_entries_and_bounds_by_budget() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        fs::File::create(dir.path().join(format!("file{i}.txt"))).unwrap();
    }

    let ignore = IgnoreEngine::default();
    let mut state = WalkState::start(dir.path()).unwrap();
    let inspected = state.advance(&ignore, 2).unwrap();
    assert_eq!(inspected, 2);
    assert!(!state.is_collected());
}

#[test]
fn advance_finishes_once_queue_drains() {
    let dir = tempdir().unwrap();
    fs::File::create(dir.path().join("only.txt")).unwrap();

    let ignore = IgnoreEngine::default();
    let mut state = WalkState::start(dir.path()).unwrap();
    state.advance(&ignore, 100).unwrap();
    assert!(state.is_collected());

    let (collected, _mtime) = state.into_collected().unwrap();
    assert_eq!(collected.len(), 1);
    assert_eq!(collected[0].basename, "only.txt");
}

#[test]
fn advance_recurses_into_subdirectories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::File::create(sub.join("nested.txt")).unwrap();

    let ignore = IgnoreEngine::default();
    let mut state = WalkState::start(dir.path()).unwrap();
    while !state.is_collected() {
        state.advance(&ignore, 10).unwrap();
    }
    let (collected, _) = state.into_collected().unwrap();
    assert!(collected.iter().any(|c| c.basename == "nested.txt"));
}

#[test]
fn ignored_entries_do_not_recurse_or_get_collected() {
    let dir = tempdir().unwrap();
    let ignored_dir = dir.path().join("node_modules");
    fs::create_dir(&ignored_dir).unwrap();
    fs::File::create(ignored_dir.join("pkg.json")).unwrap();

    let mut ignore = IgnoreEngine::default();
    ignore.add("node_modules");

    let mut state = WalkState::start(dir.path()).unwrap();
    while !state.is_collected() {
        state.advance(&ignore, 10).unwrap();
    }
    let (collected, _) = state.into_collected().unwrap();
    assert!(!collected.iter().any(|c| c.basename == "pkg.json"));
}
