//! EDHREC access: site build detection, commander deck tables and decklists.
//!
//! Decklists live behind Next.js data routes that embed the site's build
//! id, so the id is scraped from the homepage once per client and reused.
//! All requests share one rate limiter.

use crate::adapters::deck_cache::DeckCache;
use crate::core::ConfigProvider;
use crate::domain::model::{Deck, DeckTable};
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::rate_limit::RateLimiter;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use tokio::sync::OnceCell;

const SERVICE: &str = "EDHREC";
const BUILD_MANIFEST_MARKER: &str = "_buildManifest.js";
const STATIC_MARKER: &str = "/_next/static/";
const MIN_BUILD_ID_LEN: usize = 5;

pub struct EdhrecClient {
    client: Client,
    base_url: String,
    json_base_url: String,
    limiter: RateLimiter,
    build_id: OnceCell<String>,
    deck_cache: DeckCache,
    concurrency: usize,
}

impl EdhrecClient {
    pub fn new<C: ConfigProvider>(client: Client, config: &C) -> Self {
        Self {
            client,
            base_url: config.edhrec_base_url().trim_end_matches('/').to_string(),
            json_base_url: config.edhrec_json_base_url().trim_end_matches('/').to_string(),
            limiter: RateLimiter::new("edhrec", config.edhrec_min_delay()),
            build_id: OnceCell::new(),
            deck_cache: DeckCache::new(config.cache_dir()),
            concurrency: config.concurrent_requests().max(1),
        }
    }

    /// The current site build id, detected on first use.
    pub async fn build_id(&self) -> Result<&str> {
        let id = self
            .build_id
            .get_or_try_init(|| self.fetch_build_id())
            .await?;
        Ok(id.as_str())
    }

    async fn fetch_build_id(&self) -> Result<String> {
        self.limiter.acquire().await;
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AnalyzerError::UpstreamError {
                service: SERVICE.to_string(),
                status: response.status().as_u16(),
                url,
            });
        }

        let html = response.text().await?;
        let build_id = extract_build_id(&html)?;
        tracing::info!("EDHREC build ID detected: {}", build_id);
        Ok(build_id)
    }

    pub async fn fetch_deck_table(&self, commander_formatted: &str) -> Result<DeckTable> {
        let url = format!(
            "{}/pages/decks/{}.json",
            self.json_base_url, commander_formatted
        );

        self.limiter.acquire().await;
        tracing::debug!("Fetching deck table: {}", url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AnalyzerError::UpstreamError {
                service: SERVICE.to_string(),
                status: response.status().as_u16(),
                url,
            });
        }

        Ok(response.json::<DeckTable>().await?)
    }

    /// One decklist, from the cache when possible. `Ok(None)` means EDHREC had
    /// nothing usable for this id.
    pub async fn fetch_deck(&self, deck_id: &str) -> Result<Option<Deck>> {
        if !is_valid_deck_id(deck_id) {
            tracing::warn!("Skipping malformed deck id '{}'", deck_id);
            return Ok(None);
        }

        if let Some(cached) = self.deck_cache.load(deck_id).await {
            tracing::trace!("Deck {} served from cache", deck_id);
            return Ok(Some(cached));
        }

        let build_id = self.build_id().await?;

        self.limiter.acquire().await;
        let url = format!(
            "{}/_next/data/{}/deckpreview/{}.json",
            self.base_url, build_id, deck_id
        );
        let response = self
            .client
            .get(&url)
            .query(&[("deckId", deck_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(
                "Failed to fetch deck {} - HTTP {}",
                deck_id,
                response.status().as_u16()
            );
            return Ok(None);
        }

        let body: serde_json::Value = response.json().await?;
        let deck = match body
            .pointer("/pageProps/data/deck")
            .cloned()
            .map(serde_json::from_value::<Deck>)
        {
            Some(Ok(deck)) => deck,
            _ => {
                tracing::warn!("Deck JSON format unexpected for {}", deck_id);
                return Ok(None);
            }
        };

        if let Err(e) = self.deck_cache.save(deck_id, &deck).await {
            tracing::warn!("Could not cache deck {}: {}", deck_id, e);
        }
        Ok(Some(deck))
    }

    /// Download decklists with bounded concurrency. Failed decks are logged and
    /// skipped; `on_progress(completed, total)` fires once per deck. Decks come
    /// back in the order of `deck_hashes`.
    pub async fn fetch_decks_with_progress<F>(
        &self,
        deck_hashes: &[String],
        mut on_progress: F,
    ) -> Vec<Deck>
    where
        F: FnMut(usize, usize),
    {
        let total = deck_hashes.len();
        if total == 0 {
            return Vec::new();
        }

        let workers = self.concurrency.min(total);
        tracing::debug!("Fetching {} decks with {} workers", total, workers);

        let mut results = stream::iter(deck_hashes.iter().cloned())
            .map(|deck_id| async move {
                let result = self.fetch_deck(&deck_id).await;
                (deck_id, result)
            })
            .buffered(workers);

        let mut decks = Vec::with_capacity(total);
        let mut completed = 0;
        while let Some((deck_id, result)) = results.next().await {
            completed += 1;
            match result {
                Ok(Some(deck)) => decks.push(deck),
                Ok(None) => {}
                Err(e) => tracing::error!("Error fetching deck {}: {}", deck_id, e),
            }
            on_progress(completed, total);
        }

        decks
    }
}

/// Pull the Next.js build id out of the homepage HTML: the path segment after
/// the last `/_next/static/` that precedes `_buildManifest.js`.
pub fn extract_build_id(html: &str) -> Result<String> {
    let idx = html.find(BUILD_MANIFEST_MARKER).ok_or_else(|| AnalyzerError::BuildIdError {
        message: "Could not find _buildManifest.js reference in homepage".to_string(),
    })?;
    let prefix = &html[..idx];

    let static_idx = prefix
        .rfind(STATIC_MARKER)
        .ok_or_else(|| AnalyzerError::BuildIdError {
            message: "Could not locate /_next/static/ in homepage".to_string(),
        })?;

    let start = static_idx + STATIC_MARKER.len();
    let end = prefix[start..]
        .find('/')
        .map(|offset| start + offset)
        .ok_or_else(|| AnalyzerError::BuildIdError {
            message: "Build ID segment is not terminated".to_string(),
        })?;
    let build_id = &prefix[start..end];

    if build_id.len() < MIN_BUILD_ID_LEN {
        return Err(AnalyzerError::BuildIdError {
            message: format!("Extracted invalid EDHREC build ID: '{}'", build_id),
        });
    }

    Ok(build_id.to_string())
}

fn is_valid_deck_id(deck_id: &str) -> bool {
    !deck_id.is_empty()
        && deck_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
