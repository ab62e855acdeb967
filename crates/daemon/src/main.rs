use log::info;
use snapfind_daemon::DaemonConfig;

fn main() -> anyhow::Result<()> {
    let config = DaemonConfig::from_env()?;
    snapfind_runtime::logging::init_with_verbosity(config.verbose, config.trace).ok();

    info!("starting snapfindd: host={}, port={}, test_mode={}", config.host, config.port, config.test_mode);

    snapfind_daemon::serve(config)
}
