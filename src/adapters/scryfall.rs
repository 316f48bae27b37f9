//! Scryfall card lookups behind a persistent JSON cache.
//!
//! Cache entries are either full metadata objects or, in caches written by
//! older versions, a bare type line string. `card_type` upgrades bare
//! entries by refetching; `card_metadata` serves them as they are.

use crate::core::ConfigProvider;
use crate::domain::model::{CardMetadata, UNKNOWN_TYPE_LINE};
use crate::utils::error::Result;
use crate::utils::rate_limit::RateLimiter;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const CACHE_FILE: &str = "scryfall_cache.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CachedCard {
    Full(CardMetadata),
    Legacy(String),
}

#[derive(Debug, Deserialize)]
struct ImageUris {
    normal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CardFace {
    image_uris: Option<ImageUris>,
}

#[derive(Debug, Deserialize)]
struct ScryfallCard {
    type_line: Option<String>,
    image_uris: Option<ImageUris>,
    #[serde(default)]
    card_faces: Vec<CardFace>,
    scryfall_uri: Option<String>,
}

impl From<ScryfallCard> for CardMetadata {
    fn from(card: ScryfallCard) -> Self {
        // double-faced cards only carry images on their faces
        let image_url = card
            .image_uris
            .and_then(|uris| uris.normal)
            .or_else(|| {
                card.card_faces
                    .into_iter()
                    .next()
                    .and_then(|face| face.image_uris)
                    .and_then(|uris| uris.normal)
            });

        CardMetadata {
            type_line: card
                .type_line
                .unwrap_or_else(|| UNKNOWN_TYPE_LINE.to_string()),
            image_url,
            scryfall_uri: card.scryfall_uri,
        }
    }
}

pub struct ScryfallClient {
    client: Client,
    base_url: String,
    limiter: RateLimiter,
    cache_path: PathBuf,
    cache: Mutex<HashMap<String, CachedCard>>,
}

impl ScryfallClient {
    pub async fn new<C: ConfigProvider>(client: Client, config: &C) -> Self {
        let cache_path = Path::new(config.cache_dir()).join(CACHE_FILE);
        let cache = load_cache(&cache_path).await;
        tracing::debug!("Loaded {} Scryfall cache entries", cache.len());

        Self {
            client,
            base_url: config.scryfall_base_url().trim_end_matches('/').to_string(),
            limiter: RateLimiter::new("scryfall", config.scryfall_min_delay()),
            cache_path,
            cache: Mutex::new(cache),
        }
    }

    pub async fn cached_entry(&self, card_name: &str) -> Option<CachedCard> {
        self.cache.lock().await.get(card_name).cloned()
    }

    /// Type line for a card, refetching entries that predate full metadata.
    pub async fn card_type(&self, card_name: &str) -> Result<String> {
        if let Some(CachedCard::Full(meta)) = self.cached_entry(card_name).await {
            return Ok(meta.type_line);
        }

        let meta = self.fetch_and_store(card_name).await?;
        Ok(meta.type_line)
    }

    pub async fn card_metadata(&self, card_name: &str) -> Result<CardMetadata> {
        match self.cached_entry(card_name).await {
            Some(CachedCard::Full(meta)) => Ok(meta),
            Some(CachedCard::Legacy(type_line)) => Ok(CardMetadata::from_type_line(type_line)),
            None => self.fetch_and_store(card_name).await,
        }
    }

    async fn fetch_and_store(&self, card_name: &str) -> Result<CardMetadata> {
        let meta = self.fetch_metadata(card_name).await?;

        let mut cache = self.cache.lock().await;
        cache.insert(card_name.to_string(), CachedCard::Full(meta.clone()));
        // persisted under the lock so concurrent writers never interleave
        if let Err(e) = save_cache(&self.cache_path, &cache).await {
            tracing::warn!("Could not persist Scryfall cache: {}", e);
        }

        Ok(meta)
    }

    async fn fetch_metadata(&self, card_name: &str) -> Result<CardMetadata> {
        self.limiter.acquire().await;

        let url = format!("{}/cards/named", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("exact", card_name)])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!(
                "Scryfall lookup for '{}' returned HTTP {}",
                card_name,
                response.status().as_u16()
            );
            return Ok(CardMetadata::unknown());
        }

        let card: ScryfallCard = response.json().await?;
        Ok(card.into())
    }
}

async fn load_cache(path: &Path) -> HashMap<String, CachedCard> {
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(_) => return HashMap::new(),
    };

    let raw: HashMap<String, serde_json::Value> = match serde_json::from_slice(&data) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Ignoring unreadable Scryfall cache {}: {}", path.display(), e);
            return HashMap::new();
        }
    };

    // a bad entry only costs that card a refetch
    raw.into_iter()
        .filter_map(|(name, value)| match serde_json::from_value::<CachedCard>(value) {
            Ok(entry) => Some((name, entry)),
            Err(_) => {
                tracing::debug!("Dropping malformed Scryfall cache entry for '{}'", name);
                None
            }
        })
        .collect()
}

async fn save_cache(path: &Path, cache: &HashMap<String, CachedCard>) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let data = serde_json::to_vec_pretty(cache)?;
    tokio::fs::write(path, data).await?;
    Ok(())
}
