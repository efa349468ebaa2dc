//! Row conversion for the `suggestions` table.

use crate::models::Suggestion;
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

/// Column list shared by every `SELECT` on `suggestions`, in the order
/// [`suggestion_from_row`] expects.
pub const SUGGESTION_COLUMNS: &str = "id, name, suggestion, created_at, updated_at";

/// Builds a [`Suggestion`] from a row selected with [`SUGGESTION_COLUMNS`].
pub fn suggestion_from_row(row: &Row<'_>) -> rusqlite::Result<Suggestion> {
    Ok(Suggestion {
        id: row.get(0)?,
        name: row.get(1)?,
        suggestion: row.get(2)?,
        created_at: timestamp_column(row, 3)?,
        updated_at: timestamp_column(row, 4)?,
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parses a stored timestamp.
///
/// Rows written by this crate hold RFC 3339 UTC text. Databases created
/// with `CURRENT_TIMESTAMP` defaults hold `YYYY-MM-DD HH:MM:SS`, which is
/// UTC by definition.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|ts| ts.and_utc())
        })
}
