use rusqlite::{params, Connection, OptionalExtension};
use tri_core::errors::TriError;

/// Layout version written to `meta`.
pub const SCHEMA_VERSION: i64 = 1;

/// Persistent catalog properties fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogMeta {
    /// Layout version.
    pub version: i64,
    /// Trace length stored for each entry (at least its vertex count).
    pub trace_count: usize,
    /// Whether prime flags are maintained.
    pub is_prime: bool,
}

pub(crate) fn storage(code: &str, err: impl ToString) -> TriError {
    TriError::storage(code, err.to_string())
}

/// Creates tables and indexes when missing.
pub fn init_schema(conn: &Connection) -> Result<(), TriError> {
    conn.execute_batch(
        "BEGIN;
        CREATE TABLE IF NOT EXISTS meta(
            version INTEGER NOT NULL,
            trace_count INTEGER NOT NULL,
            is_prime INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS traces(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            num_verts INTEGER NOT NULL,
            trace_key BLOB NOT NULL,
            trace_json TEXT NOT NULL,
            rep_uid BLOB NOT NULL,
            is_prime INTEGER NOT NULL DEFAULT 0,
            UNIQUE(num_verts, trace_key)
        );
        CREATE TABLE IF NOT EXISTS graphs(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uid BLOB NOT NULL UNIQUE,
            traces_id INTEGER NOT NULL,
            num_verts INTEGER NOT NULL,
            num_parts INTEGER NOT NULL,
            pos_edges INTEGER NOT NULL,
            neg_edges INTEGER NOT NULL,
            pos_loops INTEGER NOT NULL,
            neg_loops INTEGER NOT NULL,
            FOREIGN KEY(traces_id) REFERENCES traces(id)
        );
        CREATE INDEX IF NOT EXISTS graphs_by_level ON graphs(num_verts, traces_id);
        CREATE INDEX IF NOT EXISTS traces_by_prime ON traces(is_prime, num_verts);
        COMMIT;",
    )
    .map_err(|err| storage("catalog.schema", err))
}

/// Reads the stored meta row, if any.
pub fn load_meta(conn: &Connection) -> Result<Option<CatalogMeta>, TriError> {
    let has_table: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'meta'",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|err| storage("catalog.meta", err))?;
    if has_table.is_none() {
        return Ok(None);
    }
    conn.query_row(
        "SELECT version, trace_count, is_prime FROM meta LIMIT 1",
        [],
        |row| {
            let version: i64 = row.get(0)?;
            let trace_count: i64 = row.get(1)?;
            let is_prime: bool = row.get(2)?;
            Ok(CatalogMeta {
                version,
                trace_count: trace_count.max(0) as usize,
                is_prime,
            })
        },
    )
    .optional()
    .map_err(|err| storage("catalog.meta", err))
}

/// Writes the meta row of a fresh catalog.
pub fn store_meta(conn: &Connection, meta: &CatalogMeta) -> Result<(), TriError> {
    conn.execute(
        "INSERT INTO meta(version, trace_count, is_prime) VALUES (?1, ?2, ?3)",
        params![meta.version, meta.trace_count as i64, meta.is_prime],
    )
    .map_err(|err| storage("catalog.meta", err))?;
    Ok(())
}
