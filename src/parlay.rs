//! Parlay assembly
//!
//! A parlay is an ordered list of legs plus a stake. Two legs may not share
//! both game and market; legs on the same game in different markets are
//! accepted but logged, since their outcomes are correlated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ParlayError, Result};
use crate::models::MarketType;
use crate::odds::implied_probability;
use crate::payout::{calculate_payout, PayoutBreakdown};

/// One leg of a parlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetSelection {
    pub game_id: String,
    /// Human-readable game, e.g. "Buffalo Bills @ Kansas City Chiefs"
    pub game: String,
    /// Team name, or "Over"/"Under" for totals
    pub name: String,
    pub market: MarketType,
    /// American odds
    pub odds: i32,
    /// Spread handicap or total points
    #[serde(default)]
    pub point: Option<f64>,
    /// Model win probability, when the leg came from a pick
    #[serde(default)]
    pub model_probability: Option<f64>,
}

impl BetSelection {
    pub fn new(
        game_id: impl Into<String>,
        game: impl Into<String>,
        name: impl Into<String>,
        market: MarketType,
        odds: i32,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            game: game.into(),
            name: name.into(),
            market,
            odds,
            point: None,
            model_probability: None,
        }
    }

    pub fn with_point(mut self, point: f64) -> Self {
        self.point = Some(point);
        self
    }

    pub fn with_model_probability(mut self, probability: f64) -> Self {
        self.model_probability = Some(probability.clamp(0.0, 1.0));
        self
    }

    pub fn implied_probability(&self) -> Result<f64> {
        implied_probability(self.odds)
    }

    /// Model probability when known, otherwise the market's implied one
    pub fn win_probability(&self) -> Result<f64> {
        match self.model_probability {
            Some(probability) => Ok(probability),
            None => self.implied_probability(),
        }
    }
}

impl fmt::Display for BetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let market = match self.market {
            MarketType::HeadToHead => "ML",
            MarketType::Spread => "Spread",
            MarketType::TotalOver | MarketType::TotalUnder => "Total",
        };
        match self.point {
            Some(point) => write!(f, "{} ({} {:+.1}) @ {:+}", self.name, market, point, self.odds),
            None => write!(f, "{} ({}) @ {:+}", self.name, market, self.odds),
        }
    }
}

/// Multi-leg wager under construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parlay {
    pub id: Uuid,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    selections: Vec<BetSelection>,
    stake: f64,
}

impl Default for Parlay {
    fn default() -> Self {
        Self::new()
    }
}

/// Parlay metrics for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlaySummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub legs: Vec<BetSelection>,
    pub payout: PayoutBreakdown,
    /// Product of each leg's win probability
    pub win_probability: f64,
}

impl Parlay {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            created_at: Utc::now(),
            selections: Vec::new(),
            stake: 0.0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn selections(&self) -> &[BetSelection] {
        &self.selections
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn stake(&self) -> f64 {
        self.stake
    }

    /// Append a leg.
    ///
    /// Fails with [`ParlayError::DuplicateSelection`] when a leg on the same
    /// game and market is already present, and with
    /// [`ParlayError::InvalidOdds`] for an unusable price.
    pub fn add_selection(&mut self, selection: BetSelection) -> Result<()> {
        selection.implied_probability()?;

        if self
            .selections
            .iter()
            .any(|s| s.game_id == selection.game_id && s.market == selection.market)
        {
            return Err(ParlayError::DuplicateSelection {
                game_id: selection.game_id,
                market: selection.market,
            });
        }

        if let Some(existing) = self.selections.iter().find(|s| s.game_id == selection.game_id) {
            warn!(
                game_id = %selection.game_id,
                existing = %existing.market,
                added = %selection.market,
                "correlated legs on the same game"
            );
        }

        debug!(parlay = %self.id, leg = %selection, "selection added");
        self.selections.push(selection);
        Ok(())
    }

    /// Remove and return the leg at `index`
    pub fn remove_selection(&mut self, index: usize) -> Result<BetSelection> {
        if index >= self.selections.len() {
            return Err(ParlayError::SelectionNotFound {
                index,
                len: self.selections.len(),
            });
        }
        Ok(self.selections.remove(index))
    }

    pub fn set_stake(&mut self, stake: f64) -> Result<()> {
        if !stake.is_finite() || stake < 0.0 {
            return Err(ParlayError::InvalidStake(stake));
        }
        self.stake = stake;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn odds(&self) -> Vec<i32> {
        self.selections.iter().map(|s| s.odds).collect()
    }

    /// Payout breakdown plus overall win probability
    pub fn summarize(&self) -> Result<ParlaySummary> {
        if self.selections.is_empty() {
            return Err(ParlayError::EmptyParlay);
        }

        let payout = calculate_payout(self.stake, &self.odds())?;
        let win_probability = self
            .selections
            .iter()
            .try_fold(1.0, |acc, s| Ok::<_, ParlayError>(acc * s.win_probability()?))?;

        Ok(ParlaySummary {
            id: self.id,
            name: self.name.clone(),
            legs: self.selections.clone(),
            payout,
            win_probability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn chiefs() -> BetSelection {
        BetSelection::new(
            "game1",
            "Buffalo Bills @ Kansas City Chiefs",
            "Kansas City Chiefs",
            MarketType::HeadToHead,
            -150,
        )
    }

    fn lakers() -> BetSelection {
        BetSelection::new(
            "game2",
            "Boston Celtics @ Los Angeles Lakers",
            "Los Angeles Lakers",
            MarketType::HeadToHead,
            110,
        )
    }

    #[test]
    fn test_summarize_two_legs() {
        let mut parlay = Parlay::new();
        parlay.add_selection(chiefs()).unwrap();
        parlay.add_selection(lakers()).unwrap();
        parlay.set_stake(100.0).unwrap();

        let summary = parlay.summarize().unwrap();
        assert_eq!(summary.legs.len(), 2);
        assert_eq!(summary.payout.combined_american, 250);
        assert_eq!(summary.payout.display().total_payout, Decimal::from_str("350.00").unwrap());
        assert_eq!(summary.payout.display().profit, Decimal::from_str("250.00").unwrap());
        assert!((summary.win_probability - summary.payout.implied_probability).abs() < 1e-12);
    }

    #[test]
    fn test_empty_parlay_cannot_be_summarized() {
        let parlay = Parlay::new();
        assert_eq!(parlay.summarize().unwrap_err(), ParlayError::EmptyParlay);
    }

    #[test]
    fn test_duplicate_game_and_market_rejected() {
        let mut parlay = Parlay::new();
        parlay.add_selection(chiefs()).unwrap();

        let mut bills = chiefs();
        bills.name = "Buffalo Bills".to_string();
        bills.odds = 130;
        let err = parlay.add_selection(bills).unwrap_err();
        assert_eq!(
            err,
            ParlayError::DuplicateSelection {
                game_id: "game1".to_string(),
                market: MarketType::HeadToHead
            }
        );
        assert_eq!(parlay.len(), 1);
    }

    #[test]
    fn test_same_game_different_market_allowed() {
        let mut parlay = Parlay::new();
        parlay.add_selection(chiefs()).unwrap();

        let spread = BetSelection {
            market: MarketType::Spread,
            odds: -110,
            ..chiefs()
        }
        .with_point(-3.0);
        parlay.add_selection(spread).unwrap();
        assert_eq!(parlay.len(), 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut parlay = Parlay::new();
        parlay.add_selection(chiefs()).unwrap();
        parlay.add_selection(lakers()).unwrap();

        let removed = parlay.remove_selection(0).unwrap();
        assert_eq!(removed.game_id, "game1");
        assert_eq!(parlay.selections()[0].game_id, "game2");

        assert_eq!(
            parlay.remove_selection(5).unwrap_err(),
            ParlayError::SelectionNotFound { index: 5, len: 1 }
        );

        // removed leg can be added back
        parlay.add_selection(removed).unwrap();
        parlay.clear();
        assert!(parlay.is_empty());
    }

    #[test]
    fn test_stake_must_be_non_negative() {
        let mut parlay = Parlay::new();
        assert_eq!(parlay.stake(), 0.0);
        assert_eq!(parlay.set_stake(-10.0).unwrap_err(), ParlayError::InvalidStake(-10.0));
        assert_eq!(parlay.stake(), 0.0);
        parlay.set_stake(0.0).unwrap();
        parlay.set_stake(12.5).unwrap();
        assert_eq!(parlay.stake(), 12.5);
    }

    #[test]
    fn test_model_probability_drives_win_probability() {
        let mut parlay = Parlay::new();
        parlay.add_selection(chiefs().with_model_probability(0.7)).unwrap();
        parlay.add_selection(lakers().with_model_probability(0.6)).unwrap();
        let summary = parlay.summarize().unwrap();
        assert!((summary.win_probability - 0.42).abs() < 1e-12);
    }

    #[test]
    fn test_selection_display() {
        assert_eq!(chiefs().to_string(), "Kansas City Chiefs (ML) @ -150");
        let over =
            BetSelection::new("game2", "g", "Over", MarketType::TotalOver, -110).with_point(225.5);
        assert_eq!(over.to_string(), "Over (Total +225.5) @ -110");
    }

    #[test]
    fn test_invalid_leg_odds_rejected() {
        let mut parlay = Parlay::new();
        let err = parlay
            .add_selection(BetSelection::new("g", "g", "Bad", MarketType::HeadToHead, 50))
            .unwrap_err();
        assert!(matches!(err, ParlayError::InvalidOdds { .. }));
        assert!(parlay.is_empty());
    }
}
