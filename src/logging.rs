use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LedgerConfig, DEFAULT_LOG_FILTER};

static TRACING_INIT: Once = Once::new();

/// install the global fmt subscriber once. `RUST_LOG` takes precedence over
/// `directive`; an unparsable directive falls back to the default.
pub fn init_tracing(directive: &str) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
        });

        let _ = fmt().with_env_filter(filter).try_init();
        tracing::debug!("tracing initialized");
    });
}

/// install the subscriber with the config's `log_filter`
pub fn init_from_config(config: &LedgerConfig) {
    init_tracing(&config.log_filter);
}
