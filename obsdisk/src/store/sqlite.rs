//! SQLite-backed volume registry.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use obsdisk_shared::errors::{ObsdiskError, ObsdiskResult};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

use super::VolumeStore;
use super::schema;
use crate::runtime::types::VolumeRecord;

/// How long a reader in another process waits for a writer to finish.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Volume registry stored in a single SQLite database file.
///
/// # Durability
///
/// The database runs in WAL mode with `synchronous=FULL`: `create` returns
/// only after the insert is committed to disk, and concurrent readers see
/// either the state before or after a write, never a partial row.
///
/// # Thread Safety
///
/// The connection sits behind a mutex, so one store can be shared via `Arc`
/// between the request path and the watch loop.
pub struct SqliteVolumeStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for SqliteVolumeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteVolumeStore")
            .field("path", &self.path)
            .finish()
    }
}

impl SqliteVolumeStore {
    /// Open (or create) the registry at `path` and bring its schema up to date.
    pub fn open(path: &Path) -> ObsdiskResult<Self> {
        let conn = Connection::open(path).map_err(|e| {
            ObsdiskError::StoreUnavailable(format!(
                "failed to open registry {}: {}",
                path.display(),
                e
            ))
        })?;

        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })
        .map_err(ObsdiskError::store)?;

        let store = Self::init(conn, Some(path.to_path_buf()))?;
        tracing::debug!(path = %path.display(), "Opened volume registry");
        Ok(store)
    }

    /// Private in-memory registry, used by tests and dry runs.
    pub fn in_memory() -> ObsdiskResult<Self> {
        let conn = Connection::open_in_memory().map_err(ObsdiskError::store)?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> ObsdiskResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(ObsdiskError::store)?;
        conn.pragma_update(None, "synchronous", "FULL")
            .map_err(ObsdiskError::store)?;

        schema::migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Location of the database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn name_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM vols WHERE name = ?1 AND deleted_at IS NULL LIMIT 1",
        params![name],
        |_| Ok(()),
    )
    .optional()
    .map(|row| row.is_some())
}

impl VolumeStore for SqliteVolumeStore {
    fn exists(&self, name: &str) -> ObsdiskResult<bool> {
        let conn = self.conn.lock();
        name_exists(&conn, name).map_err(ObsdiskError::store)
    }

    fn create(&self, name: &str, provider_type: &str) -> ObsdiskResult<VolumeRecord> {
        let mut conn = self.conn.lock();

        // IMMEDIATE takes the write lock up front, so the check and the insert
        // form one insert-if-absent even against another process.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(ObsdiskError::store)?;

        if name_exists(&tx, name).map_err(ObsdiskError::store)? {
            return Err(ObsdiskError::DuplicateName(name.to_string()));
        }

        let created_at = Utc::now();
        tx.execute(
            "INSERT INTO vols (created_at, updated_at, name, obs_type) VALUES (?1, ?1, ?2, ?3)",
            params![created_at, name, provider_type],
        )
        .map_err(ObsdiskError::store)?;

        tx.commit().map_err(ObsdiskError::store)?;

        tracing::debug!(name, provider_type, "Recorded volume");

        Ok(VolumeRecord {
            name: name.to_string(),
            provider_type: provider_type.to_string(),
            created_at,
        })
    }

    fn list_all(&self) -> ObsdiskResult<Vec<VolumeRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT name, COALESCE(obs_type, ''), created_at FROM vols
                 WHERE deleted_at IS NULL AND name IS NOT NULL
                 ORDER BY id",
            )
            .map_err(ObsdiskError::store)?;

        let records = stmt
            .query_map([], |row| {
                Ok(VolumeRecord {
                    name: row.get(0)?,
                    provider_type: row.get(1)?,
                    created_at: row
                        .get::<_, Option<DateTime<Utc>>>(2)?
                        .unwrap_or_default(),
                })
            })
            .map_err(ObsdiskError::store)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(ObsdiskError::store)?;

        Ok(records)
    }
}
