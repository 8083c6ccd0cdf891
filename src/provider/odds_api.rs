use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::OddsApiSettings;
use crate::feed::{OddsEvent, SportInfo};
use crate::provider::{OddsSource, ProviderError, ProviderResult};

const SOURCE_NAME: &str = "the-odds-api";

/// The Odds API v4 client
pub struct OddsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    regions: String,
    markets: String,
}

impl OddsApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> ProviderResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey {
                source_name: SOURCE_NAME.to_string(),
            });
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            regions: "us".to_string(),
            markets: "h2h,spreads,totals".to_string(),
        })
    }

    /// Build from settings; fails when no API key is configured
    pub fn from_settings(settings: &OddsApiSettings) -> ProviderResult<Self> {
        let api_key = settings.api_key.clone().ok_or_else(|| ProviderError::MissingApiKey {
            source_name: SOURCE_NAME.to_string(),
        })?;
        let mut client = Self::new(
            settings.base_url.clone(),
            api_key,
            Duration::from_secs(settings.timeout_secs),
        )?;
        client.regions = settings.regions.clone();
        client.markets = settings.markets.clone();
        Ok(client)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> ProviderResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if let Some(remaining) = response
            .headers()
            .get("x-requests-remaining")
            .and_then(|v| v.to_str().ok())
        {
            debug!(endpoint, remaining, "odds api quota");
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            warn!(endpoint, ?retry_after, "odds api rate limited");
            return Err(ProviderError::RateLimit {
                source_name: SOURCE_NAME.to_string(),
                retry_after,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                source_name: SOURCE_NAME.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl OddsSource for OddsApiClient {
    async fn sports(&self) -> ProviderResult<Vec<SportInfo>> {
        self.get("/sports", &[]).await
    }

    async fn events(&self, sport_key: &str) -> ProviderResult<Vec<OddsEvent>> {
        let endpoint = format!("/sports/{sport_key}/odds");
        let events: Vec<OddsEvent> = self
            .get(
                &endpoint,
                &[
                    ("regions", self.regions.as_str()),
                    ("markets", self.markets.as_str()),
                    ("oddsFormat", "american"),
                ],
            )
            .await?;
        debug!(sport_key, count = events.len(), "odds events fetched");
        Ok(events)
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_rejected() {
        let err = OddsApiClient::new("http://localhost", "  ", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, ProviderError::MissingApiKey { .. }));
    }

    #[test]
    fn test_from_settings_requires_key() {
        let settings = OddsApiSettings::default();
        assert!(matches!(
            OddsApiClient::from_settings(&settings),
            Err(ProviderError::MissingApiKey { .. })
        ));

        let with_key = OddsApiSettings {
            api_key: Some("abc".to_string()),
            base_url: "http://localhost:9999/v4/".to_string(),
            ..OddsApiSettings::default()
        };
        let client = OddsApiClient::from_settings(&with_key).unwrap();
        assert_eq!(client.base_url, "http://localhost:9999/v4");
        assert_eq!(client.name(), "the-odds-api");
    }
}
