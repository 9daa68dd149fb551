use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `LIFTLOG_LOG` overrides the level
/// (`warn` by default, `debug` with `--verbose`).
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("LIFTLOG_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("liftlog={}", default_level)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
