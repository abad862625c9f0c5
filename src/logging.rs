use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "info";

/// Builds the log filter: `RUST_LOG` if set, otherwise the configured level,
/// otherwise `info`.
pub fn env_filter(level: &str) -> EnvFilter {
    let filter_str = if level.trim().is_empty() {
        DEFAULT_FILTER
    } else {
        level
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str))
}

/// Installs the global tracing subscriber. Call once, before anything logs.
pub fn init_logging(level: &str) {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(console_layer)
        .init();
}
