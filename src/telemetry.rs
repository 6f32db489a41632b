use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Installs the global `tracing` subscriber.
///
/// Logs go to stderr so that step records on stdout stay machine-readable.
/// `quiet` raises the default level to `warn`; `RUST_LOG` overrides both.
pub fn init_tracing(quiet: bool) {
    let fallback = if quiet { "warn" } else { DEFAULT_FILTER };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
