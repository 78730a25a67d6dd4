//! Typed JSON helpers over a [`DocumentStore`].

use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::error::StorageError;
use crate::store::DocumentStore;

const JSON: &str = "application/json";

/// Load and decode a JSON document.
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    key: &str,
) -> Result<T, StorageError> {
    let body = store.get(key).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Like [`load_json`], but a missing document is `Ok(None)`.
pub async fn load_json_opt<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match load_json(store, key).await {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn save_json<T: Serialize>(
    store: &dyn DocumentStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    store.put(key, body, JSON).await
}

/// Decode every document under `prefix` whose key passes `filter`.
///
/// Documents that fail to decode are skipped with a warning so one corrupt
/// record does not take down a listing.
pub async fn list_json<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    prefix: &str,
    filter: impl Fn(&str) -> bool,
) -> Result<Vec<T>, StorageError> {
    let keys = store.list(prefix).await?;

    let mut values = Vec::new();
    for key in keys.iter().filter(|k| filter(k.as_str())) {
        let body = match store.get(key).await {
            Ok(body) => body,
            // Deleted between list and get.
            Err(StorageError::NotFound { .. }) => continue,
            Err(e) => return Err(e),
        };
        match serde_json::from_slice(&body) {
            Ok(value) => values.push(value),
            Err(e) => warn!(key = %key, error = %e, "skipping undecodable document"),
        }
    }

    Ok(values)
}
