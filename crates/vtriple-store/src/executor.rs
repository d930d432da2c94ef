//! Statement execution against SQLite.
//!
//! The executor issues plain statements on the connection it is given; the
//! caller decides the transaction scope by passing a `Transaction`.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use vtriple_core::pipeline::StatementExecutor;
use vtriple_core::statement::{HistoryRow, LatestRow, Statement, SubjectMarker};

pub struct SqliteExecutor<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteExecutor<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn append_history(&self, rows: &[HistoryRow]) -> rusqlite::Result<usize> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO vers_diffs (version, diff_type, subject, predicate, object, object_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for row in rows {
            stmt.execute(rusqlite::params![
                row.version,
                row.diff_type.as_str(),
                row.subject,
                row.predicate,
                row.object,
                row.order
            ])?;
        }
        Ok(rows.len())
    }

    fn delete_subject(&self, subject: i64) -> rusqlite::Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM latest_vers
             WHERE triple IN (SELECT id FROM triples WHERE subject = ?1)",
            [subject],
        )?;
        self.conn.execute(
            "DELETE FROM latest_subjects WHERE id_subject = ?1",
            [subject],
        )?;
        Ok(deleted)
    }

    fn delete_predicate(&self, subject: i64, predicate: i64) -> rusqlite::Result<usize> {
        self.conn.execute(
            "DELETE FROM latest_vers
             WHERE triple IN (SELECT id FROM triples WHERE subject = ?1 AND predicate = ?2)",
            [subject, predicate],
        )
    }

    fn insert_latest(&self, rows: &[LatestRow]) -> rusqlite::Result<usize> {
        let mut stmt = self
            .conn
            .prepare_cached("INSERT INTO latest_vers (triple, triple_order) VALUES (?1, ?2)")?;
        for row in rows {
            stmt.execute([row.triple, row.order])?;
        }
        Ok(rows.len())
    }

    fn insert_subject_markers(&self, markers: &[SubjectMarker]) -> rusqlite::Result<usize> {
        let mut inserted = 0;
        for marker in markers {
            let registered = self.conn.execute(
                "INSERT OR IGNORE INTO latest_subjects (id_subject) VALUES (?1)",
                [marker.subject],
            )?;
            // Subject already known: its marker row is already present
            if registered == 0 {
                continue;
            }
            inserted += self.insert_latest(std::slice::from_ref(&marker.row))?;
        }
        Ok(inserted)
    }
}

impl StatementExecutor for SqliteExecutor<'_> {
    fn execute(&mut self, statement: &Statement) -> Result<usize> {
        let affected = match statement {
            Statement::AppendHistory { rows } => self.append_history(rows),
            Statement::DeleteSubject { subject, .. } => self.delete_subject(*subject),
            Statement::DeletePredicate {
                subject, predicate, ..
            } => self.delete_predicate(*subject, *predicate),
            Statement::InsertLatest { rows } => self.insert_latest(rows),
            Statement::InsertSubjectMarkers { markers } => self.insert_subject_markers(markers),
        }
        .map_err(from_rusqlite)?;

        tracing::debug!(
            phase = statement.phase().as_str(),
            rows = statement.row_count(),
            affected,
            "Executed statement"
        );

        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_store_in_memory;
    use crate::interner::SqliteInterner;
    use vtriple_core::intern::Interner;

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    #[test]
    fn test_subject_marker_inserted_once() {
        let conn = open_store_in_memory().unwrap();
        let mut interner = SqliteInterner::new(&conn);
        let subject = interner.intern_string("s1").unwrap();
        let triple = interner.intern_triple_parts("s1", None, None).unwrap();
        let statement = Statement::InsertSubjectMarkers {
            markers: vec![SubjectMarker {
                subject,
                row: LatestRow { triple, order: 1 },
            }],
        };

        let mut executor = SqliteExecutor::new(&conn);
        assert_eq!(executor.execute(&statement).unwrap(), 1);
        assert_eq!(executor.execute(&statement).unwrap(), 0);
        assert_eq!(count(&conn, "latest_vers"), 1);
        assert_eq!(count(&conn, "latest_subjects"), 1);
    }

    #[test]
    fn test_delete_subject_clears_rows_and_entry() {
        let conn = open_store_in_memory().unwrap();
        let mut interner = SqliteInterner::new(&conn);
        let subject = interner.intern_string("s1").unwrap();
        let marker = interner.intern_triple_parts("s1", None, None).unwrap();
        let value = interner
            .intern_triple_parts("s1", Some("p"), Some(&vtriple_core::Value::literal("v")))
            .unwrap();

        let mut executor = SqliteExecutor::new(&conn);
        executor
            .execute(&Statement::InsertSubjectMarkers {
                markers: vec![SubjectMarker {
                    subject,
                    row: LatestRow {
                        triple: marker,
                        order: 1,
                    },
                }],
            })
            .unwrap();
        executor
            .execute(&Statement::InsertLatest {
                rows: vec![LatestRow {
                    triple: value,
                    order: 2,
                }],
            })
            .unwrap();

        let deleted = executor
            .execute(&Statement::DeleteSubject {
                subject,
                label: "s1".into(),
            })
            .unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(count(&conn, "latest_vers"), 0);
        assert_eq!(count(&conn, "latest_subjects"), 0);
    }

    #[test]
    fn test_missing_table_is_storage_unavailable() {
        let conn = open_store_in_memory().unwrap();
        conn.execute_batch("DROP TABLE latest_vers").unwrap();
        let mut executor = SqliteExecutor::new(&conn);
        let err = executor
            .execute(&Statement::InsertLatest {
                rows: vec![LatestRow { triple: 1, order: 1 }],
            })
            .unwrap_err();
        assert_eq!(
            err.kind(),
            vtriple_core::errors::VtErrorKind::StorageUnavailable
        );
    }
}
