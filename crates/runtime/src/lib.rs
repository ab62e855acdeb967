mod config;
pub mod logging;
pub mod settings;

pub use config::{
    DEFAULT_HOST, DEFAULT_IGNORE_PATTERNS, DEFAULT_PORT, DEFAULT_QUERY_LIMIT, PROGRAM_LOG_LEVEL,
    PROGRAM_NAME, default_cache_path, default_settings_path, home_dir, snapfind_dir, xdg_or_home,
};
pub use logging::init;
pub use settings::{Settings, Value as SettingValue};
