//! Log output setup.
//!
//! Logs go to stderr so command results on stdout stay parseable. The filter
//! comes from `RUST_LOG`, falling back to `info`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, as JSON lines or plain text.
pub fn init_logging(json: bool) {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .unwrap_or_else(|e| {
            eprintln!("Invalid log filter, using '{DEFAULT_FILTER}': {e}");
            EnvFilter::new(DEFAULT_FILTER)
        });

    let registry = tracing_subscriber::registry().with(filter_layer);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .flatten_event(true),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
    }
}
