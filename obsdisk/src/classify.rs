//! Provider detection from a bucket URL.

use obsdisk_shared::errors::{ObsdiskError, ObsdiskResult};

use crate::runtime::types::Provider;

/// Derive the storage provider from the bucket's endpoint hostname.
///
/// Matching is by substring, checked in [`Provider::ALL`] order, so the first
/// provider whose keyword appears anywhere in `bucket` wins.
///
/// # Errors
///
/// `UnsupportedProvider` if no known keyword occurs in `bucket`.
pub fn classify(bucket: &str) -> ObsdiskResult<Provider> {
    Provider::ALL
        .into_iter()
        .find(|provider| bucket.contains(provider.keyword()))
        .ok_or_else(|| ObsdiskError::UnsupportedProvider(bucket.to_string()))
}
