// Logging setup

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Pick the filter directive: the `--log-level` flag wins over config
pub fn resolve_level<'a>(flag: Option<&'a str>, configured: &'a str) -> &'a str {
    match flag {
        Some(level) if !level.trim().is_empty() => level,
        _ => configured,
    }
}

/// Install the global subscriber. Invalid directives fall back to `warn`.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
