//! Tracing setup

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the configured default parses
const FALLBACK_FILTER: &str = "info";

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `default_filter`. Returns `false` when a
/// subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    let (filter, rejected) = build_filter(
        std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        default_filter,
    );

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok();

    if installed {
        if let Some(directive) = rejected {
            tracing::warn!(
                directive = %directive,
                "invalid log filter, using {}",
                FALLBACK_FILTER
            );
        }
        tracing::debug!("tracing initialized");
    }
    installed
}

/// Pick the filter, returning the directive that failed to parse, if any
fn build_filter(from_env: Option<&str>, default_filter: &str) -> (EnvFilter, Option<String>) {
    if let Some(filter) = from_env.and_then(|directive| EnvFilter::try_new(directive).ok()) {
        return (filter, None);
    }
    match EnvFilter::try_new(default_filter) {
        Ok(filter) => (filter, None),
        Err(_) => (
            EnvFilter::new(FALLBACK_FILTER),
            Some(default_filter.to_string()),
        ),
    }
}
