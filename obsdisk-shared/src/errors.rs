//! Error taxonomy for registry and mount lifecycle operations.
//!
//! Errors are grouped by how a caller recovers from them:
//! - input errors ([`ObsdiskError::InvalidInput`], [`ObsdiskError::DuplicateName`])
//!   are surfaced before any side effect is attempted
//! - tool errors ([`ObsdiskError::ProvisionFailed`], [`ObsdiskError::MountFailed`],
//!   [`ObsdiskError::UnmountFailed`]) carry the detail extracted from the tool's stderr
//! - [`ObsdiskError::StoreUnavailable`] aborts the operation in progress but not the process

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used across the workspace.
pub type ObsdiskResult<T> = Result<T, ObsdiskError>;

/// Unified error type for obsdisk operations.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObsdiskError {
    /// A required field is blank or malformed.
    #[error("{0}")]
    InvalidInput(String),

    /// No known provider keyword was found in the bucket URL.
    #[error("unsupported bucket {0}")]
    UnsupportedProvider(String),

    /// A volume with this name is already registered.
    #[error("DiskName {0} existed")]
    DuplicateName(String),

    /// The external `format` command failed.
    #[error("{detail}")]
    ProvisionFailed { detail: String },

    /// The external `mount` command failed.
    #[error("{detail}")]
    MountFailed { detail: String },

    /// The external `umount` command failed.
    #[error("{detail}")]
    UnmountFailed { detail: String },

    /// The registry database cannot be opened, read or written.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Another provisioning currently holds the registry lock.
    #[error("{0}")]
    RegistryLocked(String),

    /// Working directory bootstrap failed.
    #[error("storage: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ObsdiskError {
    /// Create a [`ObsdiskError::StoreUnavailable`] from anything displayable.
    pub fn store<E: std::fmt::Display>(e: E) -> Self {
        Self::StoreUnavailable(e.to_string())
    }

    /// Create a [`ObsdiskError::Internal`] from anything displayable.
    pub fn internal<E: std::fmt::Display>(e: E) -> Self {
        Self::Internal(e.to_string())
    }

    /// Detail text carried by tool failures.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::ProvisionFailed { detail }
            | Self::MountFailed { detail }
            | Self::UnmountFailed { detail } => Some(detail),
            _ => None,
        }
    }

    /// Whether the caller can fix the problem by changing its input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::UnsupportedProvider(_) | Self::DuplicateName(_)
        )
    }
}
