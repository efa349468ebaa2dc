//! Shared connection handling for the `SQLite` backend.

use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Helper to acquire mutex lock with poison recovery.
///
/// If the mutex is poisoned (due to a panic in a previous critical section),
/// we recover the inner value and log a warning. A panic inside one request
/// must not take the store down for every later request.
pub fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("SQLite mutex was poisoned, recovering");
            metrics::counter!("sqlite_mutex_poison_recovery_total").increment(1);
            poisoned.into_inner()
        },
    }
}

/// Configures a `SQLite` connection for concurrent request handling.
///
/// # Configuration Applied
///
/// - **WAL mode**: concurrent readers alongside a single writer
/// - **NORMAL synchronous**: balances durability with performance
/// - **`busy_timeout`**: waits up to 5 seconds for locks instead of failing
/// - **`foreign_keys`**: enforced
///
/// Pragma failures are ignored; in-memory databases cannot use WAL and
/// report `memory` instead.
pub fn configure_connection(conn: &Connection) {
    // journal_mode answers with the resulting mode, so it needs the checked form
    let _ = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
        row.get::<_, String>(0)
    });
    let _ = conn.pragma_update(None, "synchronous", "NORMAL");
    let _ = conn.busy_timeout(Duration::from_millis(5000));
    let _ = conn.pragma_update(None, "foreign_keys", "ON");
}
