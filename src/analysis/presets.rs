//! Betting mode presets
//!
//! A mode maps each confidence tier to the bet types it is willing to play,
//! most preferred first. An empty list means the mode passes at that tier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::analysis::pick::ConfidenceTier;
use crate::models::BetType;

/// Risk appetite selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BettingMode {
    Safe,
    #[default]
    Normal,
    Aggressive,
}

impl BettingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BettingMode::Safe => "safe",
            BettingMode::Normal => "normal",
            BettingMode::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for BettingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BettingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(BettingMode::Safe),
            "normal" => Ok(BettingMode::Normal),
            "aggressive" => Ok(BettingMode::Aggressive),
            other => Err(format!("unknown betting mode: {other}")),
        }
    }
}

/// Tier-to-bet-type table plus the default parlay size for a mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModePolicy {
    pub mode: BettingMode,
    pub default_legs: usize,
    pub high: Vec<BetType>,
    pub medium: Vec<BetType>,
    pub low: Vec<BetType>,
}

impl ModePolicy {
    /// Bet types this mode plays at `tier`, most preferred first
    pub fn preferences(&self, tier: ConfidenceTier) -> &[BetType] {
        match tier {
            ConfidenceTier::High => &self.high,
            ConfidenceTier::Medium => &self.medium,
            ConfidenceTier::Low => &self.low,
        }
    }
}

/// Get preset policy for a mode
pub fn get_preset(mode: BettingMode) -> ModePolicy {
    match mode {
        BettingMode::Safe => ModePolicy {
            mode,
            default_legs: 2,
            high: vec![BetType::Moneyline],
            medium: vec![],
            low: vec![],
        },
        BettingMode::Normal => ModePolicy {
            mode,
            default_legs: 3,
            high: vec![BetType::Spread, BetType::Moneyline],
            medium: vec![BetType::Moneyline],
            low: vec![],
        },
        BettingMode::Aggressive => ModePolicy {
            mode,
            default_legs: 5,
            high: vec![BetType::Spread, BetType::Moneyline],
            medium: vec![BetType::Spread, BetType::Total, BetType::Moneyline],
            low: vec![BetType::Moneyline],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_only_plays_high_moneyline() {
        let safe = get_preset(BettingMode::Safe);
        assert_eq!(safe.preferences(ConfidenceTier::High), &[BetType::Moneyline]);
        assert!(safe.preferences(ConfidenceTier::Medium).is_empty());
        assert!(safe.preferences(ConfidenceTier::Low).is_empty());
        assert_eq!(safe.default_legs, 2);
    }

    #[test]
    fn test_aggressive_allows_spread_and_total_at_medium() {
        let aggressive = get_preset(BettingMode::Aggressive);
        let medium = aggressive.preferences(ConfidenceTier::Medium);
        assert!(medium.contains(&BetType::Spread));
        assert!(medium.contains(&BetType::Total));
        assert_eq!(aggressive.default_legs, 5);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Aggressive".parse::<BettingMode>().unwrap(), BettingMode::Aggressive);
        assert_eq!(BettingMode::default(), BettingMode::Normal);
        assert!("reckless".parse::<BettingMode>().is_err());
    }
}
