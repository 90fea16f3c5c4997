//! Persistent volume store.
//!
//! The store is the single source of truth for which volumes exist. It is
//! shared by the request path (`exists` + `create`) and the watch loop
//! (`list_all`), so implementations must be `Send + Sync` and must serialize
//! their own writes.

mod schema;
mod sqlite;

pub use sqlite::SqliteVolumeStore;

use obsdisk_shared::errors::ObsdiskResult;

use crate::runtime::types::VolumeRecord;

/// Durable table of volume records keyed by unique name.
pub trait VolumeStore: Send + Sync {
    /// Whether a record named `name` exists. Absence is `Ok(false)`.
    fn exists(&self, name: &str) -> ObsdiskResult<bool>;

    /// Insert a new record stamped with the current time.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if a record with `name` already exists
    /// - `StoreUnavailable` if the write cannot be made durable
    fn create(&self, name: &str, provider_type: &str) -> ObsdiskResult<VolumeRecord>;

    /// Every record. Callers must not rely on the order.
    fn list_all(&self) -> ObsdiskResult<Vec<VolumeRecord>>;
}
