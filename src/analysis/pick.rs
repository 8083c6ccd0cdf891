//! Picks - output from the predictor

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::factors::Factor;
use crate::error::{ParlayError, Result};
use crate::models::{BetType, MarketType, Side};
use crate::parlay::BetSelection;

/// Confidence band of a pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    /// Band for an aggregate confidence, lower bound of each band inclusive
    pub fn from_confidence(confidence: f64, thresholds: &TierThresholds) -> Self {
        if confidence >= thresholds.high {
            ConfidenceTier::High
        } else if confidence >= thresholds.medium {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::Low => "low",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds of the medium and high tiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    #[serde(default = "default_medium_threshold")]
    pub medium: f64,
    #[serde(default = "default_high_threshold")]
    pub high: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            medium: default_medium_threshold(),
            high: default_high_threshold(),
        }
    }
}

fn default_medium_threshold() -> f64 { 0.20 }
fn default_high_threshold() -> f64 { 0.50 }

impl TierThresholds {
    /// Requires `0 <= medium <= high <= 1`
    pub fn new(medium: f64, high: f64) -> Result<Self> {
        let thresholds = Self { medium, high };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        let ordered = 0.0 <= self.medium && self.medium <= self.high && self.high <= 1.0;
        if ordered {
            Ok(())
        } else {
            Err(ParlayError::InvalidThresholds {
                medium: self.medium,
                high: self.high,
            })
        }
    }

    pub fn tier(&self, confidence: f64) -> ConfidenceTier {
        ConfidenceTier::from_confidence(confidence, self)
    }
}

/// Predicted outcome for one matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub matchup_id: String,
    /// "Away @ Home"
    pub game: String,
    pub side: Side,
    /// Team on the predicted side
    pub team: String,
    /// Market to bet; `None` when the mode passes on this confidence
    pub market: Option<MarketType>,
    /// Spread handicap or total points for the chosen market
    pub line: Option<f64>,
    pub odds: Option<i32>,
    /// Weighted factor sum, -1.0 (away) to 1.0 (home)
    pub raw_score: f64,
    /// `|raw_score|`
    pub confidence: f64,
    pub tier: ConfidenceTier,
    /// Model estimate that the chosen bet wins
    pub win_probability: f64,
    /// Active factors, largest absolute contribution first
    pub factors: Vec<Factor>,
}

impl Pick {
    pub fn bet_type(&self) -> Option<BetType> {
        self.market.map(|market| market.bet_type())
    }

    /// Whether the pick names a priced market that can become a parlay leg
    pub fn is_playable(&self) -> bool {
        self.market.is_some() && self.odds.is_some()
    }

    pub fn explanations(&self) -> Vec<&str> {
        self.factors
            .iter()
            .map(|factor| factor.explanation.as_str())
            .collect()
    }

    /// Name shown on the bet slip: the team, or Over/Under for totals
    pub fn selection_name(&self) -> String {
        match self.market {
            Some(MarketType::TotalOver) => "Over".to_string(),
            Some(MarketType::TotalUnder) => "Under".to_string(),
            _ => self.team.clone(),
        }
    }

    /// Parlay leg for this pick, if it is playable
    pub fn to_selection(&self) -> Option<BetSelection> {
        let market = self.market?;
        let odds = self.odds?;
        let mut selection = BetSelection::new(
            self.matchup_id.clone(),
            self.game.clone(),
            self.selection_name(),
            market,
            odds,
        )
        .with_model_probability(self.win_probability);
        if let Some(line) = self.line {
            selection = selection.with_point(line);
        }
        Some(selection)
    }
}
