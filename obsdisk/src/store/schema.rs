//! Registry schema and forward-only migration.
//!
//! The `vols` table keeps the column layout that earlier releases wrote
//! (`id`, `created_at`, `updated_at`, `deleted_at`, `name`, `obs_type`), so a
//! registry created by any previous version opens without conversion. Missing
//! columns are added; nothing is ever dropped or rewritten.

use std::collections::HashSet;

use obsdisk_shared::errors::{ObsdiskError, ObsdiskResult};
use rusqlite::Connection;

/// Current schema version, recorded in `PRAGMA user_version`.
pub(crate) const SCHEMA_VERSION: i64 = 1;

const CREATE_VOLS: &str = "CREATE TABLE IF NOT EXISTS vols (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at DATETIME,
    updated_at DATETIME,
    deleted_at DATETIME,
    name TEXT,
    obs_type TEXT
)";

/// Columns every supported registry must have, with the type used when a
/// legacy table lacks one.
const REQUIRED_COLUMNS: &[(&str, &str)] = &[
    ("created_at", "DATETIME"),
    ("updated_at", "DATETIME"),
    ("deleted_at", "DATETIME"),
    ("name", "TEXT"),
    ("obs_type", "TEXT"),
];

pub(crate) fn migrate(conn: &Connection) -> ObsdiskResult<()> {
    let version: i64 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(ObsdiskError::store)?;

    if version > SCHEMA_VERSION {
        return Err(ObsdiskError::StoreUnavailable(format!(
            "registry schema version {} is newer than supported version {}",
            version, SCHEMA_VERSION
        )));
    }

    let tx = conn.unchecked_transaction().map_err(ObsdiskError::store)?;

    tx.execute_batch(CREATE_VOLS).map_err(ObsdiskError::store)?;

    let existing = table_columns(&tx)?;
    for (column, ty) in REQUIRED_COLUMNS {
        if !existing.contains(*column) {
            tracing::info!(column, "Adding missing registry column");
            tx.execute(&format!("ALTER TABLE vols ADD COLUMN {column} {ty}"), [])
                .map_err(ObsdiskError::store)?;
        }
    }

    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_vols_name ON vols(name);
         CREATE INDEX IF NOT EXISTS idx_vols_deleted_at ON vols(deleted_at);",
    )
    .map_err(ObsdiskError::store)?;

    if version < SCHEMA_VERSION {
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(ObsdiskError::store)?;
        tracing::debug!(from = version, to = SCHEMA_VERSION, "Migrated registry schema");
    }

    tx.commit().map_err(ObsdiskError::store)
}

fn table_columns(conn: &Connection) -> ObsdiskResult<HashSet<String>> {
    let mut stmt = conn
        .prepare("PRAGMA table_info(vols)")
        .map_err(ObsdiskError::store)?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(ObsdiskError::store)?
        .collect::<Result<HashSet<_>, _>>()
        .map_err(ObsdiskError::store)?;
    Ok(columns)
}
