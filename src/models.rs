//! Matchup domain types
//!
//! Everything the analyzer reads is an immutable value: teams, head-to-head
//! history, injury reports, weather and posted market odds. Optional inputs
//! are `Option` fields rather than sentinels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported leagues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    #[default]
    Nfl,
    Nba,
    Mlb,
    Nhl,
    Ncaaf,
    Ncaab,
}

impl Sport {
    pub const ALL: [Sport; 6] = [
        Sport::Nfl,
        Sport::Nba,
        Sport::Mlb,
        Sport::Nhl,
        Sport::Ncaaf,
        Sport::Ncaab,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Nfl => "NFL",
            Sport::Nba => "NBA",
            Sport::Mlb => "MLB",
            Sport::Nhl => "NHL",
            Sport::Ncaaf => "NCAAF",
            Sport::Ncaab => "NCAAB",
        }
    }

    /// Sport key used by The Odds API
    pub fn odds_api_key(&self) -> &'static str {
        match self {
            Sport::Nfl => "americanfootball_nfl",
            Sport::Nba => "basketball_nba",
            Sport::Mlb => "baseball_mlb",
            Sport::Nhl => "icehockey_nhl",
            Sport::Ncaaf => "americanfootball_ncaaf",
            Sport::Ncaab => "basketball_ncaab",
        }
    }

    /// Whether games are usually played outdoors
    pub fn is_outdoor(&self) -> bool {
        matches!(self, Sport::Nfl | Sport::Mlb | Sport::Ncaaf)
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Sport::ALL
            .into_iter()
            .find(|sport| {
                sport.as_str().eq_ignore_ascii_case(&lowered) || sport.odds_api_key() == lowered
            })
            .ok_or_else(|| format!("unknown sport: {s}"))
    }
}

/// Wager family chosen by the predictor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetType {
    Moneyline,
    Spread,
    Total,
}

impl BetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetType::Moneyline => "moneyline",
            BetType::Spread => "spread",
            BetType::Total => "total",
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "moneyline" | "ml" | "h2h" => Ok(BetType::Moneyline),
            "spread" | "spreads" => Ok(BetType::Spread),
            "total" | "totals" | "over_under" => Ok(BetType::Total),
            other => Err(format!("unknown bet type: {other}")),
        }
    }
}

/// Market a single parlay leg is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketType {
    #[serde(rename = "h2h")]
    HeadToHead,
    #[serde(rename = "spread")]
    Spread,
    #[serde(rename = "total_over")]
    TotalOver,
    #[serde(rename = "total_under")]
    TotalUnder,
}

impl MarketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketType::HeadToHead => "h2h",
            MarketType::Spread => "spread",
            MarketType::TotalOver => "total_over",
            MarketType::TotalUnder => "total_under",
        }
    }

    pub fn bet_type(&self) -> BetType {
        match self {
            MarketType::HeadToHead => BetType::Moneyline,
            MarketType::Spread => BetType::Spread,
            MarketType::TotalOver | MarketType::TotalUnder => BetType::Total,
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Team season snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub abbreviation: String,
    pub wins: u32,
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub points_for: u32,
    #[serde(default)]
    pub points_against: u32,
    /// Current streak: positive for consecutive wins, negative for losses
    #[serde(default)]
    pub streak: i32,
    /// Days since the previous game, when known
    #[serde(default)]
    pub rest_days: Option<u32>,
}

impl Team {
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            wins: 0,
            losses: 0,
            ties: 0,
            points_for: 0,
            points_against: 0,
            streak: 0,
            rest_days: None,
        }
    }

    pub fn with_record(mut self, wins: u32, losses: u32) -> Self {
        self.wins = wins;
        self.losses = losses;
        self
    }

    pub fn with_ties(mut self, ties: u32) -> Self {
        self.ties = ties;
        self
    }

    pub fn with_points(mut self, points_for: u32, points_against: u32) -> Self {
        self.points_for = points_for;
        self.points_against = points_against;
        self
    }

    pub fn with_streak(mut self, streak: i32) -> Self {
        self.streak = streak;
        self
    }

    pub fn with_rest_days(mut self, days: u32) -> Self {
        self.rest_days = Some(days);
        self
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Wins over games played; 0.0 before the first game
    pub fn win_pct(&self) -> f64 {
        match self.games_played() {
            0 => 0.0,
            games => f64::from(self.wins) / f64::from(games),
        }
    }

    pub fn point_differential(&self) -> i64 {
        i64::from(self.points_for) - i64::from(self.points_against)
    }

    pub fn point_differential_per_game(&self) -> f64 {
        self.point_differential() as f64 / f64::from(self.games_played().max(1))
    }

    pub fn points_for_per_game(&self) -> f64 {
        f64::from(self.points_for) / f64::from(self.games_played().max(1))
    }

    pub fn points_against_per_game(&self) -> f64 {
        f64::from(self.points_against) / f64::from(self.games_played().max(1))
    }

    /// "12-5", or "10-6-1" when ties exist
    pub fn record(&self) -> String {
        if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }
}

/// Head-to-head history between the two sides, from the home team's view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeadToHead {
    pub home_wins: u32,
    pub away_wins: u32,
    #[serde(default)]
    pub ties: u32,
}

impl HeadToHead {
    pub fn new(home_wins: u32, away_wins: u32) -> Self {
        Self {
            home_wins,
            away_wins,
            ties: 0,
        }
    }

    pub fn meetings(&self) -> u32 {
        self.home_wins + self.away_wins + self.ties
    }
}

/// Player availability designation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjuryStatus {
    Out,
    Doubtful,
    Questionable,
    Probable,
    DayToDay,
    InjuredReserve,
}

impl InjuryStatus {
    pub fn is_likely_out(&self) -> bool {
        matches!(
            self,
            InjuryStatus::Out | InjuryStatus::Doubtful | InjuryStatus::InjuredReserve
        )
    }

    pub fn is_uncertain(&self) -> bool {
        matches!(self, InjuryStatus::Questionable | InjuryStatus::DayToDay)
    }

    /// Share of the player's impact that is expected to be lost
    pub fn availability_weight(&self) -> f64 {
        if self.is_likely_out() {
            1.0
        } else if self.is_uncertain() {
            0.5
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Injury {
    pub player: String,
    pub position: String,
    pub status: InjuryStatus,
    /// How much the player matters to the team, 0.0 - 1.0
    pub impact: f64,
}

impl Injury {
    pub fn new(
        player: impl Into<String>,
        position: impl Into<String>,
        status: InjuryStatus,
        impact: f64,
    ) -> Self {
        Self {
            player: player.into(),
            position: position.into(),
            status,
            impact: impact.clamp(0.0, 1.0),
        }
    }
}

/// All reported injuries for one team
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InjuryReport {
    pub injuries: Vec<Injury>,
}

impl InjuryReport {
    pub fn new(injuries: Vec<Injury>) -> Self {
        Self { injuries }
    }

    /// Expected impact lost to injury, capped at 1.0
    pub fn total_impact(&self) -> f64 {
        self.injuries
            .iter()
            .map(|injury| injury.impact * injury.status.availability_weight())
            .sum::<f64>()
            .min(1.0)
    }

    pub fn count_likely_out(&self) -> usize {
        self.injuries.iter().filter(|i| i.status.is_likely_out()).count()
    }

    pub fn count_uncertain(&self) -> usize {
        self.injuries.iter().filter(|i| i.status.is_uncertain()).count()
    }
}

/// Game-time weather forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub temperature_f: f64,
    pub wind_mph: f64,
    /// Chance of precipitation, 0 - 100
    pub precipitation_pct: f64,
    #[serde(default)]
    pub humidity_pct: f64,
    pub conditions: String,
    #[serde(default)]
    pub is_dome: bool,
}

impl Weather {
    pub fn new(
        temperature_f: f64,
        wind_mph: f64,
        precipitation_pct: f64,
        conditions: impl Into<String>,
    ) -> Self {
        Self {
            temperature_f,
            wind_mph,
            precipitation_pct,
            humidity_pct: 50.0,
            conditions: conditions.into(),
            is_dome: false,
        }
    }

    /// Indoor venue; weather never matters
    pub fn dome() -> Self {
        Self {
            temperature_f: 72.0,
            wind_mph: 0.0,
            precipitation_pct: 0.0,
            humidity_pct: 50.0,
            conditions: "Dome".to_string(),
            is_dome: true,
        }
    }

    pub fn is_severe(&self) -> bool {
        !self.is_dome
            && (self.wind_mph > 25.0
                || self.temperature_f < 20.0
                || self.temperature_f > 100.0
                || self.precipitation_pct > 80.0)
    }

    pub fn affects_gameplay(&self) -> bool {
        !self.is_dome
            && (self.wind_mph > 15.0
                || self.temperature_f < 32.0
                || self.temperature_f > 90.0
                || self.precipitation_pct > 50.0)
    }

    /// Severity of the conditions, 0.0 (none) - 1.0
    pub fn impact_score(&self) -> f64 {
        if self.is_dome {
            return 0.0;
        }

        let mut impact = 0.0;
        if self.wind_mph > 15.0 {
            impact += ((self.wind_mph - 15.0) / 25.0).min(0.4);
        }
        if self.temperature_f < 32.0 {
            impact += ((32.0 - self.temperature_f) / 40.0).min(0.3);
        } else if self.temperature_f > 90.0 {
            impact += ((self.temperature_f - 90.0) / 30.0).min(0.2);
        }
        if self.precipitation_pct > 50.0 {
            impact += ((self.precipitation_pct - 50.0) / 50.0 * 0.3).min(0.3);
        }
        if self.humidity_pct > 85.0 {
            impact += 0.05;
        }
        impact.min(1.0)
    }
}

/// Posted point spread, expressed from the home side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadLine {
    /// Home handicap, e.g. -3.5 when home is favoured
    pub home_point: f64,
    pub home_price: i32,
    pub away_price: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TotalLine {
    pub points: f64,
    pub over_price: i32,
    pub under_price: i32,
}

/// Prices posted for a matchup; any market may be missing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketOdds {
    pub home_moneyline: Option<i32>,
    pub away_moneyline: Option<i32>,
    pub spread: Option<SpreadLine>,
    pub total: Option<TotalLine>,
}

/// Home/away side of a matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

/// Everything known about one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub id: String,
    pub sport: Sport,
    pub home: Team,
    pub away: Team,
    #[serde(default)]
    pub head_to_head: HeadToHead,
    #[serde(default)]
    pub home_injuries: InjuryReport,
    #[serde(default)]
    pub away_injuries: InjuryReport,
    /// Absent for indoor sports or when no forecast exists
    #[serde(default)]
    pub weather: Option<Weather>,
    #[serde(default)]
    pub neutral_site: bool,
    #[serde(default)]
    pub odds: MarketOdds,
    #[serde(default)]
    pub game_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub venue: Option<String>,
}

impl Matchup {
    pub fn new(id: impl Into<String>, sport: Sport, home: Team, away: Team) -> Self {
        Self {
            id: id.into(),
            sport,
            home,
            away,
            head_to_head: HeadToHead::default(),
            home_injuries: InjuryReport::default(),
            away_injuries: InjuryReport::default(),
            weather: None,
            neutral_site: false,
            odds: MarketOdds::default(),
            game_time: None,
            venue: None,
        }
    }

    pub fn with_head_to_head(mut self, head_to_head: HeadToHead) -> Self {
        self.head_to_head = head_to_head;
        self
    }

    pub fn with_injuries(mut self, home: InjuryReport, away: InjuryReport) -> Self {
        self.home_injuries = home;
        self.away_injuries = away;
        self
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_neutral_site(mut self, neutral_site: bool) -> Self {
        self.neutral_site = neutral_site;
        self
    }

    pub fn with_odds(mut self, odds: MarketOdds) -> Self {
        self.odds = odds;
        self
    }

    pub fn with_game_time(mut self, game_time: DateTime<Utc>) -> Self {
        self.game_time = Some(game_time);
        self
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// "Away @ Home"
    pub fn description(&self) -> String {
        format!("{} @ {}", self.away.name, self.home.name)
    }

    /// Weather that can influence play: present, outdoors, not a dome
    pub fn outdoor_weather(&self) -> Option<&Weather> {
        self.weather.as_ref().filter(|w| !w.is_dome)
    }
}
