//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,chromiumoxide=warn";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides [`DEFAULT_FILTER`]. Safe to call from every test:
/// only the first call installs a subscriber.
pub fn init_logging(json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_test_writer();

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };

    if installed.is_ok() {
        tracing::debug!(json, "tracing subscriber installed");
    }
}
