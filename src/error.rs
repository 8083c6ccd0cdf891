//! Error types for odds math, payouts and parlay assembly

use crate::models::MarketType;

/// Errors raised by the core betting engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParlayError {
    #[error("invalid odds {value}: {reason}")]
    InvalidOdds { value: String, reason: &'static str },

    #[error("invalid stake {0}: stake must be a non-negative amount")]
    InvalidStake(f64),

    #[error("parlay has no legs")]
    EmptyParlay,

    #[error("game {game_id} already has a {market} leg in this parlay")]
    DuplicateSelection { game_id: String, market: MarketType },

    #[error("no leg at index {index} (parlay has {len} legs)")]
    SelectionNotFound { index: usize, len: usize },

    #[error("invalid factor weights: {0}")]
    InvalidWeights(String),

    #[error("invalid confidence thresholds: medium {medium}, high {high}")]
    InvalidThresholds { medium: f64, high: f64 },
}

impl ParlayError {
    pub(crate) fn american(value: i32, reason: &'static str) -> Self {
        ParlayError::InvalidOdds {
            value: format!("{value:+}"),
            reason,
        }
    }

    pub(crate) fn decimal(value: f64, reason: &'static str) -> Self {
        ParlayError::InvalidOdds {
            value: value.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParlayError>;
