//! SQLite-backed interning.
//!
//! Each get-or-create is an `INSERT OR IGNORE` against a uniquely indexed
//! table followed by a `SELECT` of the id, so two writers racing on the same
//! value still end up sharing one row.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use vtriple_core::intern::{InternId, Interner, ObjectTuple, TripleKey};

/// Interner over an open connection or transaction
pub struct SqliteInterner<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteInterner<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl Interner for SqliteInterner<'_> {
    fn intern_string(&mut self, s: &str) -> Result<InternId> {
        self.conn
            .prepare_cached("INSERT OR IGNORE INTO strings (value) VALUES (?1)")
            .and_then(|mut stmt| stmt.execute([s]))
            .map_err(from_rusqlite)?;
        self.conn
            .prepare_cached("SELECT id FROM strings WHERE value = ?1")
            .and_then(|mut stmt| stmt.query_row([s], |row| row.get(0)))
            .map_err(|e| from_rusqlite(e).with_op("intern_string"))
    }

    fn intern_object(&mut self, object: &ObjectTuple) -> Result<InternId> {
        let kind = object.kind.as_str();
        let params = rusqlite::params![
            kind,
            object.value,
            object.language,
            object.datatype
        ];
        self.conn
            .prepare_cached(
                "INSERT OR IGNORE INTO objects (kind, value, language, datatype)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .and_then(|mut stmt| stmt.execute(params))
            .map_err(from_rusqlite)?;
        self.conn
            .prepare_cached(
                "SELECT id FROM objects
                 WHERE kind = ?1 AND value = ?2 AND language = ?3 AND datatype = ?4",
            )
            .and_then(|mut stmt| stmt.query_row(params, |row| row.get(0)))
            .map_err(|e| from_rusqlite(e).with_op("intern_object"))
    }

    fn intern_triple(&mut self, key: TripleKey) -> Result<InternId> {
        let params = rusqlite::params![key.subject, key.predicate, key.object];
        self.conn
            .prepare_cached(
                "INSERT OR IGNORE INTO triples (subject, predicate, object) VALUES (?1, ?2, ?3)",
            )
            .and_then(|mut stmt| stmt.execute(params))
            .map_err(from_rusqlite)?;
        self.conn
            .prepare_cached(
                "SELECT id FROM triples
                 WHERE subject = ?1 AND predicate IS ?2 AND object IS ?3",
            )
            .and_then(|mut stmt| stmt.query_row(params, |row| row.get(0)))
            .map_err(|e| from_rusqlite(e).with_op("intern_triple"))
    }
}
