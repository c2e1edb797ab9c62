use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize structured logging on stderr.
///
/// Defaults to `warn` level unless overridden by `LUMBERJACK_LOG`, so skipped
/// log records are reported without drowning the interactive prompt. Stdout
/// stays reserved for the operator-facing session output.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_env_var("LUMBERJACK_LOG")
        .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
