//! Logger setup for the binary and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Filter used when `RUST_LOG` is unset.
///
/// Verbose mode opens the crate's own targets to `debug` and leaves
/// dependencies at `info`, so Bevy internals do not drown out pour and
/// transfer diagnostics.
#[must_use]
pub fn default_filter(verbose: bool) -> String {
    if verbose {
        format!("{}={},info", env!("CARGO_CRATE_NAME"), LevelFilter::Debug)
    } else {
        LevelFilter::Info.to_string()
    }
}

/// Installs `env_logger` behind the `log` facade.
///
/// `RUST_LOG` takes precedence over [`default_filter`]. Calling this more than
/// once is harmless: later calls leave the first logger in place.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    if builder.try_init().is_err() {
        log::trace!("logger already installed");
    }
}
