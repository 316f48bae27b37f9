use crate::core::ConfigProvider;
use crate::utils::error::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;

/// Shared HTTP client for both upstreams. Scryfall rejects requests without
/// a user agent and an explicit `Accept` header.
pub fn build_client<C: ConfigProvider>(config: &C) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json;q=0.9,*/*;q=0.8"));

    let client = Client::builder()
        .user_agent(config.user_agent())
        .default_headers(headers)
        .timeout(config.request_timeout())
        .build()?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_client_sends_user_agent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/")
                .header("user-agent", "deck-tests/1.0");
            then.status(200);
        });

        let mut config = AnalyzerConfig::default();
        config.fetch.user_agent = "deck-tests/1.0".to_string();
        let client = build_client(&config).unwrap();

        let response = client.get(server.url("/")).send().await.unwrap();

        mock.assert();
        assert!(response.status().is_success());
    }
}
