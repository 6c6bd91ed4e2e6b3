use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::ServiceError;
use crate::models::Note;

const SELECT_COLUMNS: &str = "SELECT id, title, content, created_at, updated_at FROM notes";

/// SQLite-backed note storage.
///
/// Holds only the database path; every operation opens its own connection,
/// scoped to that single call. Writes run inside an explicit transaction
/// that rolls back on drop unless committed.
pub struct Repository {
    db_path: PathBuf,
}

impl Repository {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Ensures the storage directory and the notes table exist.
    ///
    /// Idempotent, run on every process start.
    pub fn bootstrap(&self) -> Result<(), ServiceError> {
        if let Some(parent) = self.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let conn = self.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection, ServiceError> {
        Ok(Connection::open(&self.db_path)?)
    }

    pub fn create_note(
        &self,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Note, ServiceError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO notes (title, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![title, content, encode_timestamp(now), encode_timestamp(now)],
        )?;
        let id = tx.last_insert_rowid();

        let note = tx
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_note,
            )
            .optional()?
            .ok_or(ServiceError::MissingAfterWrite(id))?;

        tx.commit()?;
        Ok(note)
    }

    pub fn update_note(
        &self,
        id: i64,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Note>, ServiceError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let changed = tx.execute(
            "UPDATE notes SET title = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
            params![title, content, encode_timestamp(now), id],
        )?;
        if changed == 0 {
            return Ok(None);
        }

        let note = tx
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_note,
            )
            .optional()?
            .ok_or(ServiceError::MissingAfterWrite(id))?;

        tx.commit()?;
        Ok(Some(note))
    }

    pub fn delete_note(&self, id: i64) -> Result<bool, ServiceError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let removed = tx.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        tx.commit()?;

        Ok(removed == 1)
    }

    pub fn get_one_note(&self, id: i64) -> Result<Option<Note>, ServiceError> {
        let conn = self.connect()?;

        let note = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_note,
            )
            .optional()?;

        Ok(note)
    }

    /// All notes, most recently updated first; newer id wins among equal
    /// timestamps.
    pub fn get_all_notes(&self) -> Result<Vec<Note>, ServiceError> {
        let conn = self.connect()?;

        let mut stmt =
            conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY updated_at DESC, id DESC"))?;
        let notes = stmt
            .query_map([], row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notes)
    }
}

fn row_to_note(row: &Row) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: decode_timestamp(row, "created_at")?,
        updated_at: decode_timestamp(row, "updated_at")?,
    })
}

/// Fixed-width RFC3339 in UTC, so lexicographic ordering of the stored text
/// matches chronological ordering.
fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(row: &Row, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}
