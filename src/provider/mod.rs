//! Data sources for matchups and odds
//!
//! The engine itself never does I/O. Callers pick a source (live API or the
//! bundled sample data), fetch, then hand plain values to the predictor.

pub mod odds_api;
pub mod sample;

pub use odds_api::OddsApiClient;
pub use sample::SampleProvider;

use crate::feed::{OddsEvent, SportInfo};
use crate::models::{Matchup, Sport};

/// Error types for data sources
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no API key configured for {source_name}")]
    MissingApiKey { source_name: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limit exceeded for {source_name}")]
    RateLimit {
        source_name: String,
        retry_after: Option<u64>,
    },

    #[error("{source_name} returned {status}: {body}")]
    Status {
        source_name: String,
        status: u16,
        body: String,
    },

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// Result type for data source operations
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Source of fully populated matchups
#[async_trait::async_trait]
pub trait MatchupSource: Send + Sync {
    /// Upcoming matchups for a sport; empty when none are known
    async fn matchups(&self, sport: Sport) -> ProviderResult<Vec<Matchup>>;

    /// Source name
    fn name(&self) -> &str;
}

/// Source of posted odds
#[async_trait::async_trait]
pub trait OddsSource: Send + Sync {
    /// Sports currently offered
    async fn sports(&self) -> ProviderResult<Vec<SportInfo>>;

    /// Upcoming events with odds for a sport key such as `basketball_nba`
    async fn events(&self, sport_key: &str) -> ProviderResult<Vec<OddsEvent>>;

    /// Source name
    fn name(&self) -> &str;
}
