//! Schema for the `suggestions` table.

/// Statements applied on every open. Each one is a no-op when its object
/// already exists.
///
/// Timestamps default to UTC RFC 3339 text with millisecond precision so
/// that lexical order is chronological order.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS suggestions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    suggestion TEXT NOT NULL,
    created_at DATETIME DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at DATETIME DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_suggestions_created_at ON suggestions (created_at DESC);
";
