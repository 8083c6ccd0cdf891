//! Parlay Engine Library
//!
//! Odds math, weighted matchup analysis and parlay assembly for sports
//! betting value estimates.

pub mod analysis;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod odds;
pub mod parlay;
pub mod payout;
pub mod provider;

mod tests;

// Re-export main types for convenience
pub use analysis::{
    BettingMode, ConfidenceTier, FactorAnalyzer, FactorKind, FactorWeights, GeneratedParlay,
    ParlayOptions, Pick, Predictor, TierThresholds,
};
pub use config::Settings;
pub use error::{ParlayError, Result};
pub use feed::{suggest_value_bets, OddsEvent, SuggestedBet};
pub use models::{BetType, MarketType, Matchup, Side, Sport, Team};
pub use odds::{american_to_decimal, decimal_to_american, implied_probability};
pub use parlay::{BetSelection, Parlay, ParlaySummary};
pub use payout::{calculate_payout, combine_decimal_odds, PayoutBreakdown, PayoutDisplay};
pub use provider::{MatchupSource, OddsApiClient, OddsSource, ProviderError, SampleProvider};
