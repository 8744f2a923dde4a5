//! Durable client-side key-value storage.
//!
//! Holds the small amount of state that must survive restarts:
//!
//! ```text
//! storage/
//! ├── config.toml             # Client configuration
//! ├── favorites.json          # Favorited school ids (JSON array)
//! ├── token.json              # Opaque auth token
//! └── drafts/
//!     └── {form}.json         # Cached user-entered form drafts
//! ```
//!
//! Values are JSON documents. A value that fails to parse is treated as
//! absent; there is no schema versioning.

pub mod local;
pub mod memory;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Well-known storage keys.
pub mod keys {
    /// JSON array of favorited school ids
    pub const FAVORITES: &str = "favorites";

    /// Opaque bearer token
    pub const AUTH_TOKEN: &str = "token";

    /// Key for a cached draft of the named form.
    pub fn draft(form: &str) -> String {
        format!("drafts/{form}")
    }
}

/// Trait for durable key-value backends.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value for `key`, `None` if never written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`. Returns once the value is durable.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Read and decode a JSON value; unparsable values count as absent.
pub async fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("Ignoring unparsable value for '{}': {}", key, e);
            Ok(None)
        }
    }
}

/// Encode and write a JSON value.
pub async fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}

/// Stored auth token, if any.
pub async fn load_token(store: &dyn KeyValueStore) -> Result<Option<String>> {
    let token: Option<String> = get_json(store, keys::AUTH_TOKEN).await?;
    Ok(token.filter(|t| !t.trim().is_empty()))
}

pub async fn save_token(store: &dyn KeyValueStore, token: &str) -> Result<()> {
    set_json(store, keys::AUTH_TOKEN, token).await
}

pub async fn clear_token(store: &dyn KeyValueStore) -> Result<()> {
    store.remove(keys::AUTH_TOKEN).await
}

/// Cache a partially filled form (onboarding questionnaire, profile editor, ...).
pub async fn save_draft<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    form: &str,
    draft: &T,
) -> Result<()> {
    set_json(store, &keys::draft(form), draft).await
}

pub async fn load_draft<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    form: &str,
) -> Result<Option<T>> {
    get_json(store, &keys::draft(form)).await
}

pub async fn clear_draft(store: &dyn KeyValueStore, form: &str) -> Result<()> {
    store.remove(&keys::draft(form)).await
}
