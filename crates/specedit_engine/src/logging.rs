use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes a console `tracing` subscriber for processes that embed this
/// crate directly (demos, the replay harness, standalone tooling).
///
/// A real inference server already owns its own subscriber; this is not
/// called from any hot-path code and never runs implicitly — the embedding
/// process decides whether and when to call it.
pub fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
