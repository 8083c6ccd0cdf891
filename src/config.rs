//! Layered settings: built-in defaults, an optional TOML file, then
//! `PARLAY_*` environment variables (`PARLAY_ODDS_API__API_KEY` for nested
//! keys).

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::analysis::factors::{FactorAnalyzer, FactorKind, FactorWeights};
use crate::analysis::pick::TierThresholds;
use crate::analysis::predictor::{ParlayOptions, Predictor, ALL_BET_TYPES};
use crate::analysis::presets::BettingMode;
use crate::error::Result;
use crate::models::BetType;

/// File read when no explicit path is given (extension resolved by `config`)
pub const DEFAULT_CONFIG_NAME: &str = "parlay";
pub const ENV_PREFIX: &str = "PARLAY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub mode: BettingMode,
    /// Parlay size; the mode's default when unset
    #[serde(default)]
    pub legs: Option<usize>,
    #[serde(default = "default_stake")]
    pub stake: f64,
    #[serde(default = "default_bet_types")]
    pub bet_types: Vec<BetType>,
    /// Per-factor weight overrides, rescaled with the defaults
    #[serde(default)]
    pub weights: HashMap<FactorKind, f64>,
    #[serde(default)]
    pub thresholds: TierThresholds,
    #[serde(default = "default_min_implied_probability")]
    pub min_implied_probability: f64,
    #[serde(default)]
    pub odds_api: OddsApiSettings,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: BettingMode::default(),
            legs: None,
            stake: default_stake(),
            bet_types: default_bet_types(),
            weights: HashMap::new(),
            thresholds: TierThresholds::default(),
            min_implied_probability: default_min_implied_probability(),
            odds_api: OddsApiSettings::default(),
            log_level: default_log_level(),
        }
    }
}

/// The Odds API connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_regions")]
    pub regions: String,
    #[serde(default = "default_markets")]
    pub markets: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OddsApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            regions: default_regions(),
            markets: default_markets(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_stake() -> f64 { 10.0 }
fn default_bet_types() -> Vec<BetType> { ALL_BET_TYPES.to_vec() }
fn default_min_implied_probability() -> f64 { 0.3 }
fn default_log_level() -> String { "info".to_string() }
fn default_base_url() -> String { "https://api.the-odds-api.com/v4".to_string() }
fn default_regions() -> String { "us".to_string() }
fn default_markets() -> String { "h2h,spreads,totals".to_string() }
fn default_timeout_secs() -> u64 { 10 }

impl Settings {
    /// Load settings from `path` (required when given) or `parlay.toml` in
    /// the working directory (optional), then apply environment overrides.
    pub fn load(path: Option<&Path>) -> std::result::Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("bet_types")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings
            .thresholds
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(settings)
    }

    pub fn factor_weights(&self) -> Result<FactorWeights> {
        FactorWeights::with_overrides(&self.weights)
    }

    pub fn predictor(&self) -> Result<Predictor> {
        self.thresholds.validate()?;
        Ok(Predictor::new(
            FactorAnalyzer::new(self.factor_weights()?),
            self.thresholds,
        ))
    }

    pub fn parlay_options(&self) -> ParlayOptions {
        ParlayOptions {
            mode: self.mode,
            legs: self.legs,
            bet_types: self.bet_types.clone(),
            stake: self.stake,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.mode, BettingMode::Normal);
        assert_eq!(settings.stake, 10.0);
        assert_eq!(settings.bet_types.len(), 3);
        assert_eq!(settings.odds_api.base_url, "https://api.the-odds-api.com/v4");
        assert!(settings.odds_api.api_key.is_none());
        assert!(settings.predictor().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
mode = "aggressive"
legs = 4
stake = 25.0
bet_types = ["moneyline", "spread"]

[weights]
weather = 0.0
team_record = 0.35

[thresholds]
medium = 0.15
high = 0.45

[odds_api]
api_key = "test-key"
timeout_secs = 3
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.mode, BettingMode::Aggressive);
        assert_eq!(settings.legs, Some(4));
        assert_eq!(settings.bet_types, vec![BetType::Moneyline, BetType::Spread]);
        assert_eq!(settings.thresholds.medium, 0.15);
        assert_eq!(settings.odds_api.api_key.as_deref(), Some("test-key"));
        assert_eq!(settings.odds_api.regions, "us");

        let weights = settings.factor_weights().unwrap();
        assert_eq!(weights.get(FactorKind::Weather), 0.0);
        assert!((weights.total() - 1.0).abs() < 1e-9);

        let options = settings.parlay_options();
        assert_eq!(options.stake, 25.0);
        assert_eq!(options.legs, Some(4));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[thresholds]\nmedium = 0.6\nhigh = 0.3").unwrap();
        assert!(Settings::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_negative_weight_rejected_when_building_predictor() {
        let mut settings = Settings::default();
        settings.weights.insert(FactorKind::Injuries, -1.0);
        assert!(settings.predictor().is_err());
    }
}
