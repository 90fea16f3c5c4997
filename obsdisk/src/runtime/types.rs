//! Core data types for the volume registry.

use chrono::{DateTime, Utc};
use obsdisk_shared::constants::providers;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// VOLUME RECORD
// ============================================================================

/// One registered volume.
///
/// Created exactly once, after the external tool provisioned the volume, and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeRecord {
    /// Unique name; also the provisioning identifier and the suffix of the
    /// mount point and metadata paths.
    pub name: String,
    /// Storage driver tag, e.g. `oss`.
    #[serde(rename = "obsType")]
    pub provider_type: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// PROVIDER
// ============================================================================

/// Object storage backend a volume lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Alibaba Cloud OSS (`*.aliyuncs.com`).
    Oss,
    /// Huawei Cloud OBS (`*.myhuaweicloud.com`).
    Obs,
    /// Tencent Cloud COS (`*.myqcloud.com`).
    Cos,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Oss, Provider::Obs, Provider::Cos];

    /// Storage driver tag passed to the tool and stored in the registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Oss => providers::OSS,
            Provider::Obs => providers::OBS,
            Provider::Cos => providers::COS,
        }
    }

    /// Hostname keyword identifying this provider in a bucket URL.
    pub fn keyword(&self) -> &'static str {
        match self {
            Provider::Oss => providers::OSS_KEYWORD,
            Provider::Obs => providers::OBS_KEYWORD,
            Provider::Cos => providers::COS_KEYWORD,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CREDENTIALS & REQUESTS
// ============================================================================

/// Object storage access key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Request to provision and register a new volume.
///
/// The provider is not part of the request; it is derived from `bucket`.
#[derive(Debug, Clone)]
pub struct CreateVolumeRequest {
    pub name: String,
    pub credentials: Credentials,
    pub bucket: String,
}
