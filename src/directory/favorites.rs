//! Favorites ledger.
//!
//! A set of school ids persisted under [`keys::FAVORITES`]. The ledger is
//! independent of the loaded collection: ids may refer to schools that are no
//! longer returned by the API.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::storage::{KeyValueStore, get_json, keys, set_json};

pub struct FavoritesLedger {
    ids: BTreeSet<String>,
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesLedger {
    /// Hydrate from storage. Missing, unreadable, or unparsable data yields an
    /// empty ledger.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let ids = match get_json::<Vec<String>>(store.as_ref(), keys::FAVORITES).await {
            Ok(Some(ids)) => ids.into_iter().collect(),
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                log::warn!("Could not read favorites, starting empty: {}", e);
                BTreeSet::new()
            }
        };
        log::debug!("Loaded {} favorites", ids.len());
        Self { ids, store }
    }

    /// Empty ledger that has not been read from storage.
    pub fn empty(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            ids: BTreeSet::new(),
            store,
        }
    }

    /// Flip membership of `id` and persist before returning.
    ///
    /// Returns the new membership. If the write fails the flip is undone.
    pub async fn toggle(&mut self, id: &str) -> Result<bool> {
        let added = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        };

        if let Err(e) = self.persist().await {
            if added {
                self.ids.remove(id);
            } else {
                self.ids.insert(id.to_string());
            }
            return Err(e);
        }

        log::info!(
            "{} favorite {}",
            if added { "Added" } else { "Removed" },
            id
        );
        Ok(added)
    }

    async fn persist(&self) -> Result<()> {
        let ids: Vec<&str> = self.ids();
        set_json(self.store.as_ref(), keys::FAVORITES, &ids).await
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Favorited ids in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        self.ids.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl fmt::Debug for FavoritesLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FavoritesLedger")
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalStorage, MemoryStorage};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_toggle_survives_reload() {
        let tmp = TempDir::new().unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(LocalStorage::new(tmp.path()));

        let mut ledger = FavoritesLedger::load(Arc::clone(&store)).await;
        assert!(ledger.is_empty());
        assert!(ledger.toggle("s1").await.unwrap());

        let reloaded = FavoritesLedger::load(store).await;
        assert!(reloaded.contains("s1"));
        assert_eq!(reloaded.len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_twice_is_involution() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
        let mut ledger = FavoritesLedger::load(Arc::clone(&store)).await;

        ledger.toggle("s2").await.unwrap();
        let before = ledger.contains("s1");
        assert!(ledger.toggle("s1").await.unwrap());
        assert!(!ledger.toggle("s1").await.unwrap());
        assert_eq!(ledger.contains("s1"), before);

        let reloaded = FavoritesLedger::load(store).await;
        assert_eq!(reloaded.ids(), vec!["s2"]);
    }

    #[tokio::test]
    async fn test_unparsable_storage_loads_empty() {
        let store = Arc::new(MemoryStorage::new());
        store.set(keys::FAVORITES, "[1, 2").await.unwrap();

        let ledger = FavoritesLedger::load(store).await;
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_reverts_toggle() {
        let store = Arc::new(MemoryStorage::new());
        let mut ledger = FavoritesLedger::load(store.clone()).await;
        ledger.toggle("keep").await.unwrap();

        store.set_simulate_write_error(true);
        assert!(ledger.toggle("new").await.is_err());
        assert!(!ledger.contains("new"));
        assert!(ledger.toggle("keep").await.is_err());
        assert!(ledger.contains("keep"));
    }

    #[tokio::test]
    async fn test_stored_as_json_array() {
        let store = Arc::new(MemoryStorage::new());
        let mut ledger = FavoritesLedger::empty(store.clone());
        ledger.toggle("b").await.unwrap();
        ledger.toggle("a").await.unwrap();

        let raw = store.get(keys::FAVORITES).await.unwrap().unwrap();
        assert_eq!(raw, r#"["a","b"]"#);
    }
}
