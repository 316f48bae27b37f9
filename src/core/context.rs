use crate::adapters::edhrec::EdhrecClient;
use crate::adapters::http::build_client;
use crate::adapters::scryfall::ScryfallClient;
use crate::config::AnalyzerConfig;
use crate::core::ConfigProvider;
use crate::utils::error::Result;

/// Long-lived pieces shared by every run: upstream clients, their rate
/// limiters and caches.
pub struct AnalyzerContext {
    pub config: AnalyzerConfig,
    pub edhrec: EdhrecClient,
    pub scryfall: ScryfallClient,
}

impl AnalyzerContext {
    pub async fn new(config: AnalyzerConfig) -> Result<Self> {
        tokio::fs::create_dir_all(config.cache_dir()).await?;

        let client = build_client(&config)?;
        let edhrec = EdhrecClient::new(client.clone(), &config);
        let scryfall = ScryfallClient::new(client, &config).await;

        Ok(Self {
            config,
            edhrec,
            scryfall,
        })
    }
}
