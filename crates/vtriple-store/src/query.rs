//! Read-only queries over the latest view and the history log.

#![allow(clippy::result_large_err)]

use crate::errors::{corrupt_row, from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;
use vtriple_core::diff::{DiffType, ValueOrder};
use vtriple_core::latest::{reconstruct_snapshot, ResolvedLatestRow};
use vtriple_core::model::{Snapshot, Value, ValueKind, Version};

/// One history log row with its interned parts resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub version: Version,
    pub diff_type: DiffType,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<ValueOrder>,
}

/// Rebuild the current state from the latest view.
///
/// # Errors
///
/// - `StorageUnavailable`: SQLite query failed
/// - `Internal`: a stored object has an unknown kind
pub fn load_latest(conn: &Connection) -> Result<Snapshot> {
    let mut stmt = conn
        .prepare(
            "SELECT s.value FROM latest_subjects ls
             JOIN strings s ON s.id = ls.id_subject",
        )
        .map_err(from_rusqlite)?;
    let subjects = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    let mut stmt = conn
        .prepare(
            "SELECT s.value, p.value, o.kind, o.value, o.language, o.datatype, lv.triple_order
             FROM latest_vers lv
             JOIN triples t ON t.id = lv.triple
             JOIN strings s ON s.id = t.subject
             LEFT JOIN strings p ON p.id = t.predicate
             LEFT JOIN objects o ON o.id = t.object",
        )
        .map_err(from_rusqlite)?;
    let raw = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                read_object(row, 2)?,
                row.get::<_, i64>(6)?,
            ))
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    let rows = raw
        .into_iter()
        .map(|(subject, predicate, object, order)| -> Result<ResolvedLatestRow> {
            Ok(ResolvedLatestRow {
                subject,
                predicate,
                value: object.map(decode_object).transpose()?,
                order,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    reconstruct_snapshot(subjects, rows)
}

/// History log rows in insertion order, optionally for one version only.
///
/// # Errors
///
/// - `StorageUnavailable`: SQLite query failed
/// - `Internal`: a stored diff type or object kind is unknown
pub fn load_history(conn: &Connection, version: Option<Version>) -> Result<Vec<HistoryEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT d.version, d.diff_type, s.value, p.value,
                    o.kind, o.value, o.language, o.datatype, d.object_order
             FROM vers_diffs d
             JOIN strings s ON s.id = d.subject
             LEFT JOIN strings p ON p.id = d.predicate
             LEFT JOIN objects o ON o.id = d.object
             WHERE ?1 IS NULL OR d.version = ?1
             ORDER BY d.id",
        )
        .map_err(from_rusqlite)?;
    let raw = stmt
        .query_map([version], |row| {
            Ok((
                row.get::<_, Version>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                read_object(row, 4)?,
                row.get::<_, Option<ValueOrder>>(8)?,
            ))
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    raw.into_iter()
        .map(|(version, diff_type, subject, predicate, object, order)| -> Result<HistoryEntry> {
            let diff_type = DiffType::parse(&diff_type).ok_or_else(|| {
                corrupt_row("load_history", format!("unknown diff type '{}'", diff_type))
            })?;
            Ok(HistoryEntry {
                version,
                diff_type,
                subject,
                predicate,
                value: object.map(decode_object).transpose()?,
                order,
            })
        })
        .collect()
}

/// Highest version recorded in the history log
pub fn latest_version(conn: &Connection) -> Result<Option<Version>> {
    conn.query_row("SELECT MAX(version) FROM vers_diffs", [], |row| {
        row.get::<_, Option<Version>>(0)
    })
        .optional()
        .map(Option::flatten)
        .map_err(from_rusqlite)
}

/// Whether `subject` is currently in the latest-subjects set
pub fn latest_subject_exists(conn: &Connection, subject: &str) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM latest_subjects ls
         JOIN strings s ON s.id = ls.id_subject
         WHERE s.value = ?1",
        [subject],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(from_rusqlite)
}

struct RawObject {
    kind: String,
    value: String,
    language: String,
    datatype: String,
}

/// Object columns starting at `first`; `None` when the join found no object
fn read_object(row: &Row<'_>, first: usize) -> rusqlite::Result<Option<RawObject>> {
    let kind: Option<String> = row.get(first)?;
    match kind {
        None => Ok(None),
        Some(kind) => Ok(Some(RawObject {
            kind,
            value: row.get(first + 1)?,
            language: row.get(first + 2)?,
            datatype: row.get(first + 3)?,
        })),
    }
}

fn decode_object(raw: RawObject) -> Result<Value> {
    let kind = ValueKind::parse(&raw.kind)
        .ok_or_else(|| corrupt_row("decode_object", format!("unknown object kind '{}'", raw.kind)))?;
    Ok(Value::from_parts(kind, raw.value, &raw.language, &raw.datatype))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_store_in_memory;

    #[test]
    fn test_empty_store_reads_back_empty() {
        let conn = open_store_in_memory().unwrap();
        assert!(load_latest(&conn).unwrap().is_empty());
        assert!(load_history(&conn, None).unwrap().is_empty());
        assert_eq!(latest_version(&conn).unwrap(), None);
        assert!(!latest_subject_exists(&conn, "s1").unwrap());
    }
}
