//! Diagnostic logging.
//!
//! Logs go to stderr so stdout stays parseable (`--format json` output can be
//! piped straight into `jq`). `RUST_LOG` overrides the configured filter.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (tests embedding the library) keeps the first subscriber.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
