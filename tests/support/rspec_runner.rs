//! Helpers for running `rspec` suites with predictable threading.

use rspec::report::Report;
use rspec::{block::Suite, ConfigurationBuilder, Logger, Runner};
use std::sync::Arc;

/// Runs an rspec suite serially so a shared Bevy `App` is only ever touched
/// from one thread at a time.
///
/// # Panics
/// Panics if any example in the suite fails.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + std::fmt::Debug,
{
    let logger = Arc::new(Logger::new(std::io::stdout()));
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|e| panic!("rspec configuration failed: {e}"));
    let report = Runner::new(config, vec![logger]).run(suite);
    assert!(
        report.is_success(),
        "{} of {} examples failed",
        report.get_failed(),
        report.get_passed() + report.get_failed()
    );
}
