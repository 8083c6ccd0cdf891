//! Predictor - turns factor analysis into picks and picks into parlays
//!
//! Flow for one matchup:
//! 1. Run the factor analyzer
//! 2. Pick a side from the sign of the weighted score (ties go home)
//! 3. Band |score| into a confidence tier
//! 4. Walk the mode's bet-type preferences for that tier and take the first
//!    one the caller allows and the matchup has a price for

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::analysis::factors::{FactorAnalyzer, FactorWeights};
use crate::analysis::pick::{Pick, TierThresholds};
use crate::analysis::presets::{get_preset, BettingMode, ModePolicy};
use crate::error::{ParlayError, Result};
use crate::models::{BetType, MarketType, Matchup, Side};
use crate::odds::implied_probability;
use crate::parlay::Parlay;

/// Every bet type; the default allow-list
pub const ALL_BET_TYPES: [BetType; 3] = [BetType::Moneyline, BetType::Spread, BetType::Total];

/// Win probability at zero confidence
const BASE_WIN_PROBABILITY: f64 = 0.5;
/// Win probability gained at full confidence
const WIN_PROBABILITY_RANGE: f64 = 0.45;
/// Applied to confidence when the pick is a total
const TOTAL_CONFIDENCE_DISCOUNT: f64 = 0.85;
/// Share of projected scoring lost at weather impact 1.0
const WEATHER_SCORING_DRAG: f64 = 0.10;

/// Parlay generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlayOptions {
    pub mode: BettingMode,
    /// Leg count; the mode's default when `None`
    pub legs: Option<usize>,
    pub bet_types: Vec<BetType>,
    pub stake: f64,
}

impl Default for ParlayOptions {
    fn default() -> Self {
        Self {
            mode: BettingMode::default(),
            legs: None,
            bet_types: ALL_BET_TYPES.to_vec(),
            stake: 0.0,
        }
    }
}

/// Parlay built from the strongest picks, with the picks behind it
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedParlay {
    pub mode: BettingMode,
    pub parlay: Parlay,
    /// Picks used as legs, in leg order
    pub picks: Vec<Pick>,
}

impl GeneratedParlay {
    pub fn average_confidence(&self) -> f64 {
        if self.picks.is_empty() {
            return 0.0;
        }
        self.picks.iter().map(|pick| pick.confidence).sum::<f64>() / self.picks.len() as f64
    }
}

/// Scores matchups and selects bets
pub struct Predictor {
    analyzer: FactorAnalyzer,
    thresholds: TierThresholds,
    policies: HashMap<BettingMode, ModePolicy>,
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new(FactorAnalyzer::default(), TierThresholds::default())
    }
}

impl Predictor {
    pub fn new(analyzer: FactorAnalyzer, thresholds: TierThresholds) -> Self {
        Self {
            analyzer,
            thresholds,
            policies: HashMap::new(),
        }
    }

    pub fn with_weights(weights: FactorWeights) -> Self {
        Self::new(FactorAnalyzer::new(weights), TierThresholds::default())
    }

    /// Replace the preset table for `policy.mode`
    pub fn with_policy(mut self, policy: ModePolicy) -> Self {
        self.policies.insert(policy.mode, policy);
        self
    }

    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    pub fn policy(&self, mode: BettingMode) -> ModePolicy {
        self.policies
            .get(&mode)
            .cloned()
            .unwrap_or_else(|| get_preset(mode))
    }

    /// Predict a single matchup with every bet type allowed
    pub fn predict(&self, matchup: &Matchup, mode: BettingMode) -> Pick {
        self.predict_allowing(matchup, mode, &ALL_BET_TYPES)
    }

    /// Predict a single matchup, only choosing bet types in `allowed`
    pub fn predict_allowing(
        &self,
        matchup: &Matchup,
        mode: BettingMode,
        allowed: &[BetType],
    ) -> Pick {
        let analysis = self.analyzer.analyze(matchup);
        let raw_score = analysis.raw_score;

        let side = if raw_score < 0.0 { Side::Away } else { Side::Home };
        let confidence = raw_score.abs();
        let tier = self.thresholds.tier(confidence);

        let policy = self.policy(mode);
        let chosen = policy
            .preferences(tier)
            .iter()
            .filter(|bet_type| allowed.contains(*bet_type))
            .find_map(|bet_type| price_market(matchup, side, *bet_type));

        let (market, line, odds) = match chosen {
            Some(priced) => (Some(priced.market), priced.line, Some(priced.odds)),
            None => (None, None, None),
        };

        let effective = if market.map(|m| m.bet_type()) == Some(BetType::Total) {
            confidence * TOTAL_CONFIDENCE_DISCOUNT
        } else {
            confidence
        };
        let win_probability = BASE_WIN_PROBABILITY + WIN_PROBABILITY_RANGE * effective;

        let mut factors = analysis.factors;
        factors.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));

        debug!(
            matchup = %matchup.id,
            raw_score,
            %tier,
            ?side,
            ?market,
            "matchup predicted"
        );

        Pick {
            matchup_id: matchup.id.clone(),
            game: matchup.description(),
            side,
            team: matchup.team(side).name.clone(),
            market,
            line,
            odds,
            raw_score,
            confidence,
            tier,
            win_probability,
            factors,
        }
    }

    /// Predict every matchup and build a parlay from the most confident
    /// playable picks.
    pub fn generate_parlay(
        &self,
        matchups: &[Matchup],
        options: &ParlayOptions,
    ) -> Result<GeneratedParlay> {
        let policy = self.policy(options.mode);
        let legs = options.legs.unwrap_or(policy.default_legs);

        let mut picks: Vec<Pick> = matchups
            .iter()
            .map(|matchup| self.predict_allowing(matchup, options.mode, &options.bet_types))
            .filter(Pick::is_playable)
            .collect();
        picks.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let mut parlay = Parlay::new().with_name(format!(
            "{} parlay - {}",
            options.mode,
            Utc::now().format("%Y-%m-%d")
        ));
        parlay.set_stake(options.stake)?;

        let mut used = Vec::with_capacity(legs);
        for pick in picks {
            if used.len() == legs {
                break;
            }
            let Some(selection) = pick.to_selection() else {
                continue;
            };
            match parlay.add_selection(selection) {
                Ok(()) => used.push(pick),
                Err(ParlayError::DuplicateSelection { game_id, market }) => {
                    warn!(%game_id, %market, "skipping repeated matchup");
                }
                Err(ParlayError::InvalidOdds { value, reason }) => {
                    warn!(matchup = %pick.matchup_id, %value, reason, "skipping unpriceable pick");
                }
                Err(e) => return Err(e),
            }
        }

        if used.len() < legs {
            info!(
                requested = legs,
                found = used.len(),
                mode = %options.mode,
                "fewer qualifying picks than requested legs"
            );
        }
        info!(parlay = %parlay.id, legs = used.len(), mode = %options.mode, "parlay generated");

        Ok(GeneratedParlay {
            mode: options.mode,
            parlay,
            picks: used,
        })
    }
}

struct PricedMarket {
    market: MarketType,
    line: Option<f64>,
    odds: i32,
}

/// Price `bet_type` for `side` from the matchup's posted odds.
///
/// Prices outside the valid American range count as not posted.
fn price_market(matchup: &Matchup, side: Side, bet_type: BetType) -> Option<PricedMarket> {
    let priced = posted_market(matchup, side, bet_type)?;
    if let Err(e) = implied_probability(priced.odds) {
        warn!(matchup = %matchup.id, market = %priced.market, error = %e, "ignoring invalid price");
        return None;
    }
    Some(priced)
}

fn posted_market(matchup: &Matchup, side: Side, bet_type: BetType) -> Option<PricedMarket> {
    let odds = &matchup.odds;
    match bet_type {
        BetType::Moneyline => {
            let price = match side {
                Side::Home => odds.home_moneyline?,
                Side::Away => odds.away_moneyline?,
            };
            Some(PricedMarket {
                market: MarketType::HeadToHead,
                line: None,
                odds: price,
            })
        }
        BetType::Spread => {
            let spread = odds.spread?;
            let (line, price) = match side {
                Side::Home => (spread.home_point, spread.home_price),
                Side::Away => (-spread.home_point, spread.away_price),
            };
            Some(PricedMarket {
                market: MarketType::Spread,
                line: Some(line),
                odds: price,
            })
        }
        BetType::Total => {
            let total = odds.total?;
            let projected = projected_total(matchup);
            let (market, price) = if projected > total.points {
                (MarketType::TotalOver, total.over_price)
            } else if projected < total.points {
                (MarketType::TotalUnder, total.under_price)
            } else {
                return None;
            };
            Some(PricedMarket {
                market,
                line: Some(total.points),
                odds: price,
            })
        }
    }
}

/// Expected combined score from each side's scoring and the opponent's
/// defence, reduced for adverse weather.
pub fn projected_total(matchup: &Matchup) -> f64 {
    let (home, away) = (&matchup.home, &matchup.away);
    let home_points = (home.points_for_per_game() + away.points_against_per_game()) / 2.0;
    let away_points = (away.points_for_per_game() + home.points_against_per_game()) / 2.0;
    let mut projected = home_points + away_points;

    if let Some(weather) = matchup.outdoor_weather() {
        if weather.affects_gameplay() {
            projected *= 1.0 - WEATHER_SCORING_DRAG * weather.impact_score();
        }
    }
    projected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::pick::ConfidenceTier;
    use crate::models::{
        HeadToHead, Injury, InjuryReport, InjuryStatus, MarketOdds, Sport, SpreadLine, Team,
        TotalLine, Weather,
    };

    fn odds() -> MarketOdds {
        MarketOdds {
            home_moneyline: Some(-150),
            away_moneyline: Some(130),
            spread: Some(SpreadLine {
                home_point: -3.5,
                home_price: -110,
                away_price: -110,
            }),
            total: Some(TotalLine {
                points: 45.5,
                over_price: -110,
                under_price: -110,
            }),
        }
    }

    /// Home side clearly stronger on every active factor
    fn strong_home() -> Matchup {
        Matchup::new(
            "strong",
            Sport::Nfl,
            Team::new("Baltimore Ravens", "BAL")
                .with_record(14, 3)
                .with_points(480, 280)
                .with_streak(5)
                .with_rest_days(10),
            Team::new("Carolina Panthers", "CAR")
                .with_record(3, 14)
                .with_points(250, 450)
                .with_streak(-4)
                .with_rest_days(6),
        )
        .with_head_to_head(HeadToHead::new(4, 0))
        .with_injuries(
            InjuryReport::default(),
            InjuryReport::new(vec![Injury::new("QB", "QB", InjuryStatus::Out, 0.8)]),
        )
        .with_odds(odds())
    }

    fn even() -> Matchup {
        Matchup::new(
            "even",
            Sport::Nba,
            Team::new("Home", "HOM").with_record(10, 10),
            Team::new("Away", "AWY").with_record(10, 10),
        )
        .with_neutral_site(true)
        .with_odds(odds())
    }

    #[test]
    fn test_zero_score_picks_home_with_low_tier() {
        let pick = Predictor::default().predict(&even(), BettingMode::Normal);
        assert_eq!(pick.raw_score, 0.0);
        assert_eq!(pick.side, Side::Home);
        assert_eq!(pick.team, "Home");
        assert_eq!(pick.tier, ConfidenceTier::Low);
        assert!(pick.market.is_none());
    }

    #[test]
    fn test_strong_home_pick() {
        let pick = Predictor::default().predict(&strong_home(), BettingMode::Safe);
        assert_eq!(pick.side, Side::Home);
        assert_eq!(pick.tier, ConfidenceTier::High);
        assert_eq!(pick.market, Some(MarketType::HeadToHead));
        assert_eq!(pick.odds, Some(-150));
        assert!(pick.win_probability > 0.7 && pick.win_probability < 0.95);
    }

    #[test]
    fn test_away_pick_when_score_negative() {
        let mut m = strong_home();
        std::mem::swap(&mut m.home, &mut m.away);
        m.head_to_head = HeadToHead::new(0, 4);
        m.home_injuries = m.away_injuries.clone();
        m.away_injuries = InjuryReport::default();
        m.neutral_site = true;

        let pick = Predictor::default().predict(&m, BettingMode::Normal);
        assert_eq!(pick.side, Side::Away);
        assert_eq!(pick.team, "Baltimore Ravens");
        assert!(pick.raw_score < 0.0);
        assert_eq!(pick.market, Some(MarketType::Spread));
        assert_eq!(pick.line, Some(3.5));
    }

    #[test]
    fn test_factors_sorted_by_contribution() {
        let pick = Predictor::default().predict(&strong_home(), BettingMode::Normal);
        let contributions: Vec<f64> = pick.factors.iter().map(|f| f.contribution.abs()).collect();
        assert!(contributions.windows(2).all(|pair| pair[0] >= pair[1]), "{contributions:?}");
        assert_eq!(pick.explanations().len(), pick.factors.len());
    }

    #[test]
    fn test_allowed_bet_types_respected() {
        let predictor = Predictor::default();
        let moneyline_only = [BetType::Moneyline];
        let pick = predictor.predict_allowing(&strong_home(), BettingMode::Normal, &moneyline_only);
        assert_eq!(pick.market, Some(MarketType::HeadToHead));

        let spread_only = [BetType::Spread];
        let none = predictor.predict_allowing(&strong_home(), BettingMode::Safe, &spread_only);
        assert!(none.market.is_none());
        assert!(!none.is_playable());
    }

    #[test]
    fn test_missing_price_falls_through_preferences() {
        let mut m = strong_home();
        m.odds.spread = None;
        let pick = Predictor::default().predict(&m, BettingMode::Normal);
        assert_eq!(pick.market, Some(MarketType::HeadToHead));
    }

    #[test]
    fn test_invalid_price_falls_through_preferences() {
        let mut m = strong_home();
        m.odds.spread = Some(SpreadLine {
            home_point: -3.5,
            home_price: 50,
            away_price: -110,
        });
        let pick = Predictor::default().predict(&m, BettingMode::Normal);
        assert_eq!(pick.market, Some(MarketType::HeadToHead));
        assert_eq!(pick.odds, Some(-150));

        m.odds.home_moneyline = Some(-99);
        let pick = Predictor::default().predict(&m, BettingMode::Normal);
        assert!(pick.market.is_none());
        assert!(!pick.is_playable());
    }

    #[test]
    fn test_record_and_series_edge_reach_medium() {
        // 12-5 (70.6%) vs 11-6 (64.7%), home leads the series 3-2, indoors
        let base = Matchup::new(
            "dome",
            Sport::Nfl,
            Team::new("Kansas City Chiefs", "KC").with_record(12, 5),
            Team::new("Buffalo Bills", "BUF").with_record(11, 6),
        )
        .with_head_to_head(HeadToHead::new(3, 2))
        .with_weather(Weather::dome())
        .with_odds(odds());

        let pick = Predictor::default().predict(&base, BettingMode::Normal);
        assert_eq!(pick.side, Side::Home);
        assert_eq!(pick.tier, ConfidenceTier::Medium, "{}", pick.raw_score);

        let mut rested = base.clone();
        rested.home = rested.home.with_points(450, 370).with_rest_days(7);
        rested.away = rested.away.with_points(430, 380).with_rest_days(7);
        let pick = Predictor::default().predict(&rested, BettingMode::Normal);
        assert_eq!(pick.tier, ConfidenceTier::Medium, "{}", pick.raw_score);
    }

    #[test]
    fn test_policy_override() {
        let custom = ModePolicy {
            mode: BettingMode::Safe,
            default_legs: 1,
            high: vec![BetType::Spread],
            medium: vec![BetType::Spread],
            low: vec![],
        };
        let pick = Predictor::default()
            .with_policy(custom)
            .predict(&strong_home(), BettingMode::Safe);
        assert_eq!(pick.market, Some(MarketType::Spread));
    }

    #[test]
    fn test_projected_total_and_weather_drag() {
        let m = strong_home();
        // (28.2 + 26.5) / 2 + (14.7 + 16.5) / 2
        let projected = projected_total(&m);
        assert!((projected - 42.941).abs() < 0.01, "{projected}");

        let stormy = strong_home().with_weather(Weather::new(15.0, 30.0, 90.0, "Snow"));
        assert!(projected_total(&stormy) < projected);
    }

    #[test]
    fn test_total_pick_direction() {
        let pick = price_market(&strong_home(), Side::Home, BetType::Total).unwrap();
        assert_eq!(pick.market, MarketType::TotalUnder);
        assert_eq!(pick.line, Some(45.5));
    }

    #[test]
    fn test_generate_parlay_takes_most_confident() {
        let mut second = strong_home();
        second.id = "second".to_string();
        second.home.streak = 1;
        second.head_to_head = HeadToHead::new(2, 1);

        let options = ParlayOptions {
            mode: BettingMode::Normal,
            legs: Some(2),
            bet_types: ALL_BET_TYPES.to_vec(),
            stake: 25.0,
        };
        let generated = Predictor::default()
            .generate_parlay(&[even(), second, strong_home()], &options)
            .unwrap();

        assert_eq!(generated.picks.len(), 2);
        assert_eq!(generated.picks[0].matchup_id, "strong");
        assert_eq!(generated.picks[1].matchup_id, "second");
        assert_eq!(generated.parlay.len(), 2);
        assert_eq!(generated.parlay.stake(), 25.0);
        assert!(generated.average_confidence() > 0.5);
        assert!(generated.parlay.summarize().is_ok());
    }

    #[test]
    fn test_generate_parlay_skips_invalid_prices() {
        let mut bad = strong_home();
        bad.id = "bad".to_string();
        bad.odds.home_moneyline = Some(50);
        let mut good = strong_home();
        good.id = "good".to_string();

        let options = ParlayOptions {
            mode: BettingMode::Normal,
            legs: Some(1),
            bet_types: vec![BetType::Moneyline],
            stake: 10.0,
        };
        let generated = Predictor::default()
            .generate_parlay(&[bad, good], &options)
            .unwrap();
        assert_eq!(generated.picks.len(), 1);
        assert_eq!(generated.picks[0].matchup_id, "good");
        assert_eq!(generated.parlay.odds(), vec![-150]);
    }

    #[test]
    fn test_generate_parlay_with_no_qualifying_picks() {
        let options = ParlayOptions {
            mode: BettingMode::Safe,
            ..ParlayOptions::default()
        };
        let generated = Predictor::default().generate_parlay(&[even()], &options).unwrap();
        assert!(generated.picks.is_empty());
        assert_eq!(generated.average_confidence(), 0.0);
        assert_eq!(generated.parlay.summarize().unwrap_err(), ParlayError::EmptyParlay);
    }

    #[test]
    fn test_generate_parlay_rejects_negative_stake() {
        let options = ParlayOptions {
            stake: -5.0,
            ..ParlayOptions::default()
        };
        assert_eq!(
            Predictor::default().generate_parlay(&[], &options).unwrap_err(),
            ParlayError::InvalidStake(-5.0)
        );
    }
}
