//! Metrics recording for `SQLite` storage operations.

use std::time::Instant;

/// Records operation metrics for a storage operation.
///
/// Two metrics are recorded per call:
/// 1. `storage_operations_total` - counter by backend, operation and status
/// 2. `storage_operation_duration_ms` - latency histogram with the same labels
///
/// Without an installed recorder both are no-ops.
pub fn record_operation_metrics(
    backend: &'static str,
    operation: &'static str,
    start: Instant,
    status: &'static str,
) {
    metrics::counter!(
        "storage_operations_total",
        "backend" => backend,
        "operation" => operation,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "storage_operation_duration_ms",
        "backend" => backend,
        "operation" => operation,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64() * 1000.0);
}

/// Returns the status label for an operation result.
pub const fn status_label<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() { "success" } else { "error" }
}
