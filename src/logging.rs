use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Initialise logging from the settings file.
pub fn init(settings: &Settings) {
    init_with_debug(settings.debug_logging)
}

/// Initialise logging with an explicit debug flag. The level can be raised
/// via `RUST_LOG` only when debug logging is enabled; otherwise `info` is
/// forced so a stray environment variable does not flood the host's log.
pub fn init_with_debug(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
