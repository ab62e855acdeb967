mod excludes;
mod record;
mod walker;

pub use excludes::IgnoreEngine;
pub use record::FileEntry;
pub use walker::{dir_mtime_secs, inspect_entry, read_dir_lenient, should_recurse};
