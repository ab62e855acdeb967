use super::*;
use serial_test::serial;
use snapfind_engine::DirState;
use std::fs;
use tempfile::tempdir;

fn with_cache_home<T>(f: impl FnOnce() -> T) -> T {
    let dir = tempdir().unwrap();
    unsafe {
        std::env::set_var("XDG_CACHE_HOME", dir.path());
    }
    let result = f();
    unsafe {
        std::env::remove_var("XDG_CACHE_HOME");
    }
    result
}

#[test]
#[serial]
fn step_walks_and_publishes_a_small_directory() {
    with_cache_home(|| {
        let root = tempdir().unwrap();
        fs::File::create(root.path().join("main.rs")).unwrap();

        let mut index = Index::new(&[]);
        let handle = index.add_dir(root.path().to_path_buf());
        let mut indexer = Indexer::new();

        let mut published = false;
        for _ in 0..10 {
            match indexer.step(&mut index) {
                StepOutcome::Published { handle: h, .. } if h == handle => {
                    published = true;
                    break;
                }
                StepOutcome::Idle => break,
                _ => continue,
            }
        }

        assert!(published);
        assert_eq!(index.status().ready_dir_count, 1);
        assert!(!index.search("main", 10).is_empty());
    });
}

#[test]
#[serial]
fn step_is_idle_once_everything_is_published_and_unchanged() {
    with_cache_home(|| {
        let root = tempdir().unwrap();
        fs::File::create(root.path().join("a.txt")).unwrap();

        let mut index = Index::new(&[]);
        index.add_dir(root.path().to_path_buf());
        let mut indexer = Indexer::new();

        for _ in 0..10 {
            if indexer.step(&mut index) == StepOutcome::Idle {
                break;
            }
        }
        assert_eq!(indexer.step(&mut index), StepOutcome::Idle);
    });
}

#[test]
#[serial]
fn mtime_drift_on_a_published_directory_triggers_reindex() {
    with_cache_home(|| {
        let root = tempdir().unwrap();
        fs::File::create(root.path().join("a.txt")).unwrap();

        let mut index = Index::new(&[]);
        let handle = index.add_dir(root.path().to_path_buf());
        let mut indexer = Indexer::new();

        loop {
            match indexer.step(&mut index) {
                StepOutcome::Published { .. } => break,
                StepOutcome::Idle => panic!("walk never published"),
                _ => continue,
            }
        }

        std::thread::sleep(std::time::Duration::from_millis(1100));
        fs::File::create(root.path().join("b.txt")).unwrap();

        let mut drifted = false;
        for _ in 0..10 {
            if indexer.step(&mut index) == (StepOutcome::DriftDetected { handle }) {
                drifted = true;
                break;
            }
        }
        assert!(drifted);
        assert_eq!(index.list_dirs()[0].2, DirState::Pending);
    });
}

#[test]
#[serial]
fn without_cache_never_persists_or_reads_a_cache_file() {
    with_cache_home(|| {
        let root = tempdir().unwrap();
        fs::File::create(root.path().join("a.txt")).unwrap();

        let mut index = Index::new(&[]);
        let handle = index.add_dir(root.path().to_path_buf());
        let mut indexer = Indexer::new().without_cache();

        loop {
            match indexer.step(&mut index) {
                StepOutcome::Published { .. } => break,
                StepOutcome::Idle => panic!("walk never published"),
                _ => continue,
            }
        }

        assert!(cache::load(handle.0).is_none());
    });
}
