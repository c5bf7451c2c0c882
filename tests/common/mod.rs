use std::thread;
use std::time::Duration;

use promisery::Promise;

/// Install a test-writer subscriber so `RUST_LOG`-style output shows up
/// next to failing tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// A promise fulfilling with `value` after `ms` milliseconds.
pub fn fulfill_after<T>(value: T, ms: u64) -> Promise<T>
where
    T: Send + Sync + 'static,
{
    Promise::new(move || {
        thread::sleep(Duration::from_millis(ms));
        Ok::<_, std::io::Error>(value)
    })
}

/// A promise rejecting with `msg` after `ms` milliseconds.
pub fn reject_after<T>(msg: &'static str, ms: u64) -> Promise<T>
where
    T: Send + Sync + 'static,
{
    Promise::new(move || {
        thread::sleep(Duration::from_millis(ms));
        Err(msg)
    })
}
