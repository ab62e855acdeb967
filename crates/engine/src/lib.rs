mod index;
mod rank;
mod shard;

pub use index::{DirHandle, DirState, Index, IndexStatus};
pub use rank::{MatchTier, classify, get_start_letters, rank};
pub use shard::{Hit, Shard, ShardBuilder, ShardError};
