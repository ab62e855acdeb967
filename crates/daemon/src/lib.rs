//! The HTTP-facing half of snapfind: config parsing, the request router,
//! and the cooperative control loop. Consumed by the `snapfindd` binary
//! directly and by `snapfind run`, which embeds the same `serve` call
//! in-process rather than forking a subprocess.

pub mod config;
pub mod control;
pub mod error;
pub mod idle;
pub mod router;
pub mod state;

pub use config::{Cli, DaemonConfig};
pub use control::serve;
pub use error::ApiError;
pub use state::DaemonState;
