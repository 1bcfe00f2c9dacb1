use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// Filter comes from `RUST_LOG`, falling back to `info`. Calling this twice is
/// harmless; the second call leaves the first subscriber in place.
pub fn init() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
