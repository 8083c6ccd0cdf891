//! Odds feed records (The Odds API v4 shape) and value-bet suggestions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{MarketOdds, MarketType, SpreadLine, TotalLine};
use crate::parlay::BetSelection;

/// Default floor for [`suggest_value_bets`]
pub const DEFAULT_MIN_IMPLIED_PROBABILITY: f64 = 0.3;

/// In-season sport listed by the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportInfo {
    pub key: String,
    #[serde(default)]
    pub group: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsEvent {
    pub id: String,
    pub sport_key: String,
    #[serde(default)]
    pub sport_title: String,
    pub commence_time: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmaker {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub markets: Vec<BookMarket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookMarket {
    /// "h2h", "spreads" or "totals"
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Team name, or "Over"/"Under"
    pub name: String,
    /// American odds
    pub price: i32,
    #[serde(default)]
    pub point: Option<f64>,
}

/// Selection worth considering, with its market probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedBet {
    pub selection: BetSelection,
    pub implied_probability: f64,
}

impl OddsEvent {
    /// "Away @ Home"
    pub fn description(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }

    /// Markets of the first listed bookmaker
    pub fn primary_markets(&self) -> &[BookMarket] {
        self.bookmakers
            .first()
            .map(|bookmaker| bookmaker.markets.as_slice())
            .unwrap_or(&[])
    }

    /// Map an outcome of market `key` to the parlay market type
    fn market_type(key: &str, outcome: &Outcome) -> Option<MarketType> {
        match key {
            "h2h" => Some(MarketType::HeadToHead),
            "spreads" => Some(MarketType::Spread),
            "totals" if outcome.name.eq_ignore_ascii_case("over") => Some(MarketType::TotalOver),
            "totals" if outcome.name.eq_ignore_ascii_case("under") => Some(MarketType::TotalUnder),
            _ => None,
        }
    }

    /// Every outcome of the primary bookmaker as a parlay leg
    pub fn selections(&self) -> Vec<BetSelection> {
        let mut selections = Vec::new();
        for market in self.primary_markets() {
            for outcome in &market.outcomes {
                let Some(market_type) = Self::market_type(&market.key, outcome) else {
                    continue;
                };
                let mut selection = BetSelection::new(
                    self.id.clone(),
                    self.description(),
                    outcome.name.clone(),
                    market_type,
                    outcome.price,
                );
                if let Some(point) = outcome.point {
                    selection = selection.with_point(point);
                }
                selections.push(selection);
            }
        }
        selections
    }

    /// Posted prices in the shape the predictor reads
    pub fn market_odds(&self) -> MarketOdds {
        let mut odds = MarketOdds::default();
        for market in self.primary_markets() {
            let find = |name: &str| {
                market
                    .outcomes
                    .iter()
                    .find(|o| o.name.eq_ignore_ascii_case(name))
            };
            match market.key.as_str() {
                "h2h" => {
                    odds.home_moneyline = find(self.home_team.as_str()).map(|o| o.price);
                    odds.away_moneyline = find(self.away_team.as_str()).map(|o| o.price);
                }
                "spreads" => {
                    let home = find(self.home_team.as_str());
                    let away = find(self.away_team.as_str());
                    if let (Some(home), Some(away)) = (home, away) {
                        if let Some(home_point) = home.point {
                            odds.spread = Some(SpreadLine {
                                home_point,
                                home_price: home.price,
                                away_price: away.price,
                            });
                        }
                    }
                }
                "totals" => {
                    if let (Some(over), Some(under)) = (find("Over"), find("Under")) {
                        if let Some(points) = over.point.or(under.point) {
                            odds.total = Some(TotalLine {
                                points,
                                over_price: over.price,
                                under_price: under.price,
                            });
                        }
                    }
                }
                _ => {}
            }
        }
        odds
    }
}

/// Selections whose implied probability is at least `min_implied_probability`,
/// most likely first. Outcomes with unusable prices are skipped.
pub fn suggest_value_bets(events: &[OddsEvent], min_implied_probability: f64) -> Vec<SuggestedBet> {
    let mut suggestions: Vec<SuggestedBet> = events
        .iter()
        .flat_map(|event| event.selections())
        .filter_map(|selection| match selection.implied_probability() {
            Ok(probability) => Some(SuggestedBet {
                selection,
                implied_probability: probability,
            }),
            Err(e) => {
                warn!(game_id = %selection.game_id, error = %e, "skipping outcome");
                None
            }
        })
        .filter(|bet| bet.implied_probability >= min_implied_probability)
        .collect();

    suggestions.sort_by(|a, b| b.implied_probability.total_cmp(&a.implied_probability));
    suggestions
}
