use crate::adapters::storage::LocalStorage;
use crate::core::Storage;
use crate::domain::model::Deck;
use crate::utils::error::Result;
use std::path::Path;

/// Decklists already downloaded, one JSON file per deck id.
#[derive(Debug, Clone)]
pub struct DeckCache {
    storage: LocalStorage,
}

impl DeckCache {
    pub fn new(cache_root: impl AsRef<Path>) -> Self {
        Self {
            storage: LocalStorage::new(cache_root.as_ref().join("deck_cache")),
        }
    }

    fn file_name(deck_id: &str) -> String {
        format!("{}.json", deck_id)
    }

    /// Unreadable, corrupt and empty entries all count as misses.
    pub async fn load(&self, deck_id: &str) -> Option<Deck> {
        let data = self.storage.read_file(&Self::file_name(deck_id)).await.ok()?;
        match serde_json::from_slice::<Deck>(&data) {
            Ok(deck) if !deck.is_empty() => Some(deck),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Ignoring corrupt cache entry for deck {}: {}", deck_id, e);
                None
            }
        }
    }

    pub async fn save(&self, deck_id: &str, deck: &Deck) -> Result<()> {
        let data = serde_json::to_vec_pretty(deck)?;
        self.storage.write_file(&Self::file_name(deck_id), &data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DeckCache::new(temp_dir.path());
        let deck = vec!["1 Sol Ring".to_string(), "1 Command Tower".to_string()];

        cache.save("abc123", &deck).await.unwrap();

        assert!(temp_dir.path().join("deck_cache/abc123.json").exists());
        assert_eq!(cache.load("abc123").await, Some(deck));
    }

    #[tokio::test]
    async fn test_missing_corrupt_and_empty_entries_are_misses() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DeckCache::new(temp_dir.path());
        std::fs::create_dir_all(temp_dir.path().join("deck_cache")).unwrap();
        std::fs::write(temp_dir.path().join("deck_cache/corrupt.json"), b"{not json").unwrap();
        std::fs::write(temp_dir.path().join("deck_cache/empty.json"), b"[]").unwrap();

        assert_eq!(cache.load("missing").await, None);
        assert_eq!(cache.load("corrupt").await, None);
        assert_eq!(cache.load("empty").await, None);
    }
}
