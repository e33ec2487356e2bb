pub mod backend;

pub use backend::{FileStore, KeyValueStore};
#[cfg(test)]
pub use backend::MemoryStore;

use thiserror::Error;
use tracing::{debug, warn};

/// Key holding the GitHub personal access token.
pub const CREDENTIAL_KEY: &str = "github_pat";
/// Key holding the JSON array of tracked PR URLs.
pub const ITEMS_KEY: &str = "prs";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access store file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize store contents: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The token and the ordered list of tracked PR URLs, persisted through a
/// [`KeyValueStore`]. Every mutation is written before it returns.
pub struct TrackedItemStore<S> {
    backend: S,
}

impl<S: KeyValueStore> TrackedItemStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// The saved token, or an empty string if none was saved.
    pub fn credential(&self) -> Result<String, StoreError> {
        Ok(self.backend.get(CREDENTIAL_KEY)?.unwrap_or_default())
    }

    /// Save the token as-is. No validation of shape or authenticity.
    pub fn set_credential(&mut self, value: &str) -> Result<(), StoreError> {
        self.backend.set(CREDENTIAL_KEY, value)
    }

    pub fn clear_credential(&mut self) -> Result<(), StoreError> {
        self.backend.delete(CREDENTIAL_KEY)
    }

    /// Tracked URLs in insertion order. A missing or unreadable record is empty.
    pub fn items(&self) -> Result<Vec<String>, StoreError> {
        let Some(raw) = self.backend.get(ITEMS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!(error = %err, "tracked PR list is malformed, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Append `url` unless an identical string is already tracked.
    /// Returns whether it was added.
    pub fn add_item(&mut self, url: &str) -> Result<bool, StoreError> {
        let mut items = self.items()?;
        if items.iter().any(|item| item == url) {
            debug!(url, "PR already tracked");
            return Ok(false);
        }
        items.push(url.to_string());
        self.write_items(&items)?;
        Ok(true)
    }

    /// Remove every entry equal to `url`. No-op if it is not tracked.
    pub fn remove_item(&mut self, url: &str) -> Result<(), StoreError> {
        let mut items = self.items()?;
        let before = items.len();
        items.retain(|item| item != url);
        debug!(url, removed = before - items.len(), "removing tracked PR");
        self.write_items(&items)
    }

    fn write_items(&mut self, items: &[String]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items)?;
        self.backend.set(ITEMS_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TrackedItemStore<MemoryStore> {
        TrackedItemStore::new(MemoryStore::default())
    }

    #[test]
    fn test_empty_store_defaults() {
        let store = store();
        assert_eq!(store.credential().unwrap(), "");
        assert!(store.items().unwrap().is_empty());
    }

    #[test]
    fn test_set_and_clear_credential() {
        let mut store = store();
        store.set_credential("ghp_abc").unwrap();
        assert_eq!(store.credential().unwrap(), "ghp_abc");
        store.set_credential("ghp_def").unwrap();
        assert_eq!(store.credential().unwrap(), "ghp_def");
        store.clear_credential().unwrap();
        assert_eq!(store.credential().unwrap(), "");
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut store = store();
        assert!(store.add_item("https://github.com/o/r/pull/2").unwrap());
        assert!(store.add_item("https://github.com/o/r/pull/1").unwrap());
        assert_eq!(
            store.items().unwrap(),
            vec![
                "https://github.com/o/r/pull/2".to_string(),
                "https://github.com/o/r/pull/1".to_string(),
            ]
        );
    }

    #[test]
    fn test_add_duplicate_is_rejected() {
        let mut store = store();
        assert!(store.add_item("https://github.com/o/r/pull/1").unwrap());
        assert!(!store.add_item("https://github.com/o/r/pull/1").unwrap());
        assert_eq!(store.items().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_check_is_exact_string_equality() {
        let mut store = store();
        assert!(store.add_item("https://github.com/o/r/pull/1").unwrap());
        assert!(store.add_item("https://github.com/o/r/pull/1/").unwrap());
        assert_eq!(store.items().unwrap().len(), 2);
    }

    #[test]
    fn test_remove_item() {
        let mut store = store();
        store.add_item("a").unwrap();
        store.add_item("b").unwrap();
        store.remove_item("a").unwrap();
        assert_eq!(store.items().unwrap(), vec!["b".to_string()]);
        store.remove_item("missing").unwrap();
        assert_eq!(store.items().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn test_remove_drops_every_occurrence() {
        let mut backend = MemoryStore::default();
        backend.set(ITEMS_KEY, r#"["a","b","a"]"#).unwrap();
        let mut store = TrackedItemStore::new(backend);
        store.remove_item("a").unwrap();
        assert_eq!(store.items().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn test_malformed_items_record_is_empty() {
        let mut backend = MemoryStore::default();
        backend.set(ITEMS_KEY, "{not json").unwrap();
        let store = TrackedItemStore::new(backend);
        assert!(store.items().unwrap().is_empty());
    }

    #[test]
    fn test_file_backed_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = TrackedItemStore::new(FileStore::new(&path));
        store.set_credential("ghp_abc").unwrap();
        store.add_item("https://github.com/o/r/pull/1").unwrap();

        let reopened = TrackedItemStore::new(FileStore::new(&path));
        assert_eq!(reopened.credential().unwrap(), "ghp_abc");
        assert_eq!(
            reopened.items().unwrap(),
            vec!["https://github.com/o/r/pull/1".to_string()]
        );
    }
}
