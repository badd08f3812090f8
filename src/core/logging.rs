use std::str::FromStr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Expands a bare level with quieter defaults for the HTTP stack. Directive
/// strings containing `,` or `=` pass through unchanged.
pub fn filter_spec(log_level: &str) -> String {
    let level = log_level.trim();
    if level.contains(',') || level.contains('=') {
        level.to_string()
    } else {
        format!("{},hyper=info,hyper_util=info,reqwest=info,rustls=warn", level)
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `log_level` when set.
pub fn init_logging(log_level: &str, json_format: bool) {
    let spec = std::env::var("RUST_LOG").unwrap_or_else(|_| filter_spec(log_level));
    let filter = EnvFilter::from_str(&spec).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json_format {
        registry
            .with(fmt::layer().json().with_target(false).with_current_span(true))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).compact())
            .init();
    }

    tracing::debug!(filter = %spec, json = json_format, "logging initialized");
}
