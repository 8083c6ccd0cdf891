//! Analysis module - matchup scoring and pick selection
//!
//! Factors score a matchup, the predictor turns the weighted score into a
//! pick, and mode presets decide which bet types a pick may use.

pub mod factors;
pub mod pick;
pub mod predictor;
pub mod presets;

// Re-export main types for convenience
pub use factors::{
    Factor, FactorAnalysis, FactorAnalyzer, FactorEvaluator, FactorKind, FactorReading,
    FactorWeights,
};
pub use pick::{ConfidenceTier, Pick, TierThresholds};
pub use predictor::{projected_total, GeneratedParlay, ParlayOptions, Predictor, ALL_BET_TYPES};
pub use presets::{get_preset, BettingMode, ModePolicy};
