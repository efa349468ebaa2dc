//! `SQLite`-backed suggestion store.

use super::connection::{acquire_lock, configure_connection};
use super::metrics::{record_operation_metrics, status_label};
use super::row::{SUGGESTION_COLUMNS, suggestion_from_row};
use super::schema::SCHEMA;
use crate::models::{Suggestion, SuggestionChanges, SuggestionDraft};
use crate::storage::SuggestionStore;
use crate::{Error, Result};
use rusqlite::{Connection, OptionalExtension, ToSql, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

const BACKEND: &str = "sqlite";

/// `SQLite`-based suggestion storage.
///
/// Holds a single connection behind a mutex; `SQLite` serializes writers
/// and WAL mode lets readers proceed alongside them.
pub struct SqliteSuggestionStore {
    /// Connection to the `SQLite` database.
    conn: Mutex<Connection>,
    /// Path to the `SQLite` database.
    db_path: PathBuf,
}

impl SqliteSuggestionStore {
    /// Opens (creating if needed) the database at `db_path` and applies the
    /// schema.
    ///
    /// Safe to call on every startup: the schema only creates objects that
    /// do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, the
    /// database cannot be opened, or the schema cannot be applied.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "create_db_dir".to_string(),
                cause: format!("{}: {e}", parent.display()),
            })?;
        }

        let conn = Connection::open(&db_path).map_err(|e| Error::OperationFailed {
            operation: "open_db".to_string(),
            cause: format!("{}: {e}", db_path.display()),
        })?;

        Self::from_connection(conn, db_path)
    }

    /// Creates an in-memory store (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be applied.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::OperationFailed {
            operation: "open_db_memory".to_string(),
            cause: e.to_string(),
        })?;

        Self::from_connection(conn, PathBuf::from(":memory:"))
    }

    fn from_connection(conn: Connection, db_path: PathBuf) -> Result<Self> {
        configure_connection(&conn);
        conn.execute_batch(SCHEMA).map_err(|e| Error::OperationFailed {
            operation: "apply_schema".to_string(),
            cause: e.to_string(),
        })?;

        tracing::debug!(db_path = %db_path.display(), "suggestions schema ready");

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    /// Returns the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        acquire_lock(&self.conn)
    }

    // julianday() puts legacy `YYYY-MM-DD HH:MM:SS` rows on the same scale
    // as RFC 3339 rows; plain text comparison would not.
    fn list_rows(&self) -> Result<Vec<Suggestion>> {
        let conn = self.lock_conn();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SUGGESTION_COLUMNS} FROM suggestions \
                 ORDER BY julianday(created_at) DESC, id DESC"
            ))
            .map_err(|e| Error::OperationFailed {
                operation: "prepare_list_suggestions".to_string(),
                cause: e.to_string(),
            })?;

        let rows = stmt
            .query_map([], suggestion_from_row)
            .map_err(|e| Error::OperationFailed {
                operation: "list_suggestions".to_string(),
                cause: e.to_string(),
            })?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::OperationFailed {
                operation: "read_suggestion_row".to_string(),
                cause: e.to_string(),
            })
    }

    fn get_row(&self, id: i64) -> Result<Option<Suggestion>> {
        let conn = self.lock_conn();

        conn.query_row(
            &format!("SELECT {SUGGESTION_COLUMNS} FROM suggestions WHERE id = ?1"),
            params![id],
            suggestion_from_row,
        )
        .optional()
        .map_err(|e| Error::OperationFailed {
            operation: "get_suggestion".to_string(),
            cause: e.to_string(),
        })
    }

    fn insert_row(&self, draft: &SuggestionDraft) -> Result<i64> {
        let conn = self.lock_conn();

        conn.execute(
            "INSERT INTO suggestions (name, suggestion) VALUES (?1, ?2)",
            params![draft.name(), draft.suggestion()],
        )
        .map_err(|e| Error::OperationFailed {
            operation: "insert_suggestion".to_string(),
            cause: e.to_string(),
        })?;

        Ok(conn.last_insert_rowid())
    }

    fn update_row(&self, id: i64, changes: &SuggestionChanges) -> Result<bool> {
        let mut assignments: Vec<&str> = Vec::with_capacity(3);
        let mut params_vec: Vec<Box<dyn ToSql>> = Vec::with_capacity(3);

        if let Some(name) = changes.name() {
            assignments.push("name = ?");
            params_vec.push(Box::new(name.to_string()));
        }
        if let Some(suggestion) = changes.suggestion() {
            assignments.push("suggestion = ?");
            params_vec.push(Box::new(suggestion.to_string()));
        }
        assignments.push("updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')");
        params_vec.push(Box::new(id));

        let sql = format!(
            "UPDATE suggestions SET {} WHERE id = ?",
            assignments.join(", ")
        );
        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(AsRef::as_ref).collect();

        let conn = self.lock_conn();
        let rows_affected = conn
            .execute(&sql, params_refs.as_slice())
            .map_err(|e| Error::OperationFailed {
                operation: "update_suggestion".to_string(),
                cause: e.to_string(),
            })?;

        Ok(rows_affected > 0)
    }

    fn delete_row(&self, id: i64) -> Result<bool> {
        let conn = self.lock_conn();

        let rows_affected = conn
            .execute("DELETE FROM suggestions WHERE id = ?1", params![id])
            .map_err(|e| Error::OperationFailed {
                operation: "delete_suggestion".to_string(),
                cause: e.to_string(),
            })?;

        Ok(rows_affected > 0)
    }
}

impl SuggestionStore for SqliteSuggestionStore {
    fn list(&self) -> Result<Vec<Suggestion>> {
        let start = Instant::now();
        let result = self.list_rows();
        record_operation_metrics(BACKEND, "list", start, status_label(&result));
        result
    }

    fn get(&self, id: i64) -> Result<Option<Suggestion>> {
        let start = Instant::now();
        let result = self.get_row(id);
        record_operation_metrics(BACKEND, "get", start, status_label(&result));
        result
    }

    fn insert(&self, draft: &SuggestionDraft) -> Result<i64> {
        let start = Instant::now();
        let result = self.insert_row(draft);
        record_operation_metrics(BACKEND, "insert", start, status_label(&result));
        result
    }

    fn update(&self, id: i64, changes: &SuggestionChanges) -> Result<bool> {
        let start = Instant::now();
        let result = self.update_row(id, changes);
        record_operation_metrics(BACKEND, "update", start, status_label(&result));
        result
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let start = Instant::now();
        let result = self.delete_row(id);
        record_operation_metrics(BACKEND, "delete", start, status_label(&result));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewSuggestion, PLACEHOLDER_NAME, SuggestionPatch};
    use std::thread;
    use std::time::Duration;

    fn draft(name: &str, text: &str) -> SuggestionDraft {
        NewSuggestion::new(name, text).normalize().unwrap()
    }

    fn changes(json: &str) -> SuggestionChanges {
        serde_json::from_str::<SuggestionPatch>(json)
            .unwrap()
            .normalize()
            .unwrap()
    }

    fn pause() {
        thread::sleep(Duration::from_millis(5));
    }

    #[test]
    fn test_in_memory_store_path() {
        let store = SqliteSuggestionStore::in_memory().unwrap();
        assert_eq!(store.db_path().to_str(), Some(":memory:"));
    }

    #[test]
    fn test_insert_and_get() {
        let store = SqliteSuggestionStore::in_memory().unwrap();

        let id = store.insert(&draft("Ada", "Longer lunch")).unwrap();
        assert!(id > 0);

        let stored = store.get(id).unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.name, "Ada");
        assert_eq!(stored.suggestion, "Longer lunch");
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = SqliteSuggestionStore::in_memory().unwrap();
        assert!(store.get(42).unwrap().is_none());
    }

    #[test]
    fn test_ids_are_increasing() {
        let store = SqliteSuggestionStore::in_memory().unwrap();
        let first = store.insert(&draft("a", "one")).unwrap();
        let second = store.insert(&draft("b", "two")).unwrap();
        assert!(second > first);

        // AUTOINCREMENT never reuses the id of a deleted row
        store.delete(second).unwrap();
        let third = store.insert(&draft("c", "three")).unwrap();
        assert!(third > second);
    }

    #[test]
    fn test_list_newest_first() {
        let store = SqliteSuggestionStore::in_memory().unwrap();
        assert!(store.list().unwrap().is_empty());

        let a = store.insert(&draft("a", "first")).unwrap();
        pause();
        let b = store.insert(&draft("b", "second")).unwrap();
        pause();
        let c = store.insert(&draft("c", "third")).unwrap();

        let ids: Vec<i64> = store.list().unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![c, b, a]);
    }

    #[test]
    fn test_update_name_only() {
        let store = SqliteSuggestionStore::in_memory().unwrap();
        let id = store.insert(&draft("Ada", "Tea")).unwrap();
        let before = store.get(id).unwrap().unwrap();
        pause();

        assert!(store.update(id, &changes(r#"{"name": "Grace"}"#)).unwrap());

        let after = store.get(id).unwrap().unwrap();
        assert_eq!(after.name, "Grace");
        assert_eq!(after.suggestion, "Tea");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
    }

    #[test]
    fn test_update_suggestion_only() {
        let store = SqliteSuggestionStore::in_memory().unwrap();
        let id = store.insert(&draft("Ada", "Tea")).unwrap();

        assert!(
            store
                .update(id, &changes(r#"{"suggestion": " Coffee "}"#))
                .unwrap()
        );

        let after = store.get(id).unwrap().unwrap();
        assert_eq!(after.name, "Ada");
        assert_eq!(after.suggestion, "Coffee");
        assert!(after.updated_at >= after.created_at);
    }

    #[test]
    fn test_update_both_fields_with_placeholder() {
        let store = SqliteSuggestionStore::in_memory().unwrap();
        let id = store.insert(&draft("Ada", "Tea")).unwrap();

        assert!(
            store
                .update(id, &changes(r#"{"name": "", "suggestion": "Juice"}"#))
                .unwrap()
        );

        let after = store.get(id).unwrap().unwrap();
        assert_eq!(after.name, PLACEHOLDER_NAME);
        assert_eq!(after.suggestion, "Juice");
    }

    #[test]
    fn test_update_missing_id_matches_nothing() {
        let store = SqliteSuggestionStore::in_memory().unwrap();
        assert!(!store.update(99, &changes(r#"{"name": "x"}"#)).unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_is_final_and_repeatable() {
        let store = SqliteSuggestionStore::in_memory().unwrap();
        let id = store.insert(&draft("Ada", "Tea")).unwrap();

        assert!(store.delete(id).unwrap());
        assert!(store.get(id).unwrap().is_none());
        assert!(!store.delete(id).unwrap());
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("suggestions.db");

        let store = SqliteSuggestionStore::open(&path).unwrap();
        assert_eq!(store.db_path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn test_open_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suggestions.db");

        let id = {
            let store = SqliteSuggestionStore::open(&path).unwrap();
            store.insert(&draft("Ada", "Keep me")).unwrap()
        };

        let store = SqliteSuggestionStore::open(&path).unwrap();
        drop(SqliteSuggestionStore::open(&path).unwrap());

        let conn = store.lock_conn();
        let objects: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE name IN ('suggestions', 'idx_suggestions_created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(objects, 2);
        drop(conn);

        assert_eq!(store.get(id).unwrap().unwrap().suggestion, "Keep me");
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = SqliteSuggestionStore::open(blocker.join("suggestions.db"));
        assert!(matches!(
            result,
            Err(Error::OperationFailed { ref operation, .. }) if operation == "create_db_dir"
        ));
    }

    #[test]
    fn test_reads_rows_with_current_timestamp_format() {
        let store = SqliteSuggestionStore::in_memory().unwrap();
        store
            .lock_conn()
            .execute(
                "INSERT INTO suggestions (name, suggestion, created_at, updated_at)
                 VALUES ('Old', 'From before', '2023-05-01 09:00:00', '2023-05-01 09:00:00')",
                [],
            )
            .unwrap();
        let newer = store.insert(&draft("New", "Fresh")).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer);
        assert_eq!(listed[1].name, "Old");
        assert_eq!(listed[1].created_at.to_rfc3339(), "2023-05-01T09:00:00+00:00");
    }

    #[test]
    fn test_list_orders_mixed_timestamp_formats_chronologically() {
        let store = SqliteSuggestionStore::in_memory().unwrap();
        {
            let conn = store.lock_conn();
            conn.execute(
                "INSERT INTO suggestions (name, suggestion, created_at, updated_at)
                 VALUES ('Morning', 'rfc3339', '2025-03-10T08:00:00.000Z', '2025-03-10T08:00:00.000Z')",
                [],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO suggestions (name, suggestion, created_at, updated_at)
                 VALUES ('Noon', 'legacy', '2025-03-10 12:00:00', '2025-03-10 12:00:00')",
                [],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO suggestions (name, suggestion, created_at, updated_at)
                 VALUES ('Evening', 'rfc3339', '2025-03-10T18:30:00.000Z', '2025-03-10T18:30:00.000Z')",
                [],
            )
            .unwrap();
        }

        let names: Vec<String> = store.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Evening", "Noon", "Morning"]);
    }

    #[test]
    fn test_list_fails_on_undecodable_row() {
        let store = SqliteSuggestionStore::in_memory().unwrap();
        store.insert(&draft("Ada", "Fine")).unwrap();
        store
            .lock_conn()
            .execute(
                "INSERT INTO suggestions (name, suggestion, created_at, updated_at)
                 VALUES ('Bad', 'Row', 'not a time', 'not a time')",
                [],
            )
            .unwrap();

        let result = store.list();
        assert!(matches!(
            result,
            Err(Error::OperationFailed { ref operation, .. }) if operation == "read_suggestion_row"
        ));
    }
}
