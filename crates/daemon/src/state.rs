use snapfind_engine::Index;
use snapfind_indexer::Indexer;
use snapfind_runtime::{DEFAULT_HOST, DEFAULT_IGNORE_PATTERNS, DEFAULT_PORT, DEFAULT_QUERY_LIMIT, Settings, SettingValue};

use crate::config::DaemonConfig;

/// Chosen default result cap for a `/search` request that omits
/// `max_hits`; large enough that a typical query is never silently
/// truncated, small enough that a pathological one (matching most of a
/// shard) doesn't flood the client.
const DEFAULT_MAX_HITS: usize = 200;

pub struct DaemonState {
    pub config: DaemonConfig,
    pub settings: Settings,
    pub index: Index,
    pub indexer: Indexer,
    /// Set by the `/exit` handler; the control loop checks this after
    /// every request and returns once it sees it.
    pub exiting: bool,
}

impl DaemonState {
    pub fn new(config: DaemonConfig) -> anyhow::Result<Self> {
        let mut settings = if config.test_mode {
            Settings::in_memory()
        } else {
            Settings::load(&config.settings_path)?
        };

        settings.register("host", SettingValue::Str(DEFAULT_HOST.to_string()));
        settings.register("port", SettingValue::Int(DEFAULT_PORT as i64));
        settings.register("filter_text", SettingValue::Str(String::new()));
        settings.register("query_log", SettingValue::Str(String::new()));

        let index = Index::new(DEFAULT_IGNORE_PATTERNS);
        let mut indexer = Indexer::new();
        if config.test_mode {
            indexer = indexer.without_cache();
        }

        Ok(Self { config, settings, index, indexer, exiting: false })
    }

    /// Maximum accepted query length in bytes, per the Query Service's
    /// validation contract.
    pub fn query_byte_limit(&self) -> usize {
        DEFAULT_QUERY_LIMIT
    }

    /// `max_hits` used when a `/search` request omits it.
    pub fn default_max_hits(&self) -> usize {
        DEFAULT_MAX_HITS
    }
}
