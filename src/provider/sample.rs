//! Bundled sample data for running without API keys

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::debug;

use crate::feed::{BookMarket, Bookmaker, OddsEvent, Outcome, SportInfo};
use crate::models::{
    HeadToHead, Injury, InjuryReport, InjuryStatus, MarketOdds, Matchup, Sport, SpreadLine, Team,
    TotalLine, Weather,
};
use crate::provider::{MatchupSource, OddsSource, ProviderResult};

/// Sport key that returns events for every sport
pub const UPCOMING: &str = "upcoming";

/// Deterministic sample matchups and odds
pub struct SampleProvider {
    kickoff: DateTime<Utc>,
}

impl Default for SampleProvider {
    fn default() -> Self {
        Self {
            kickoff: Utc.with_ymd_and_hms(2026, 1, 18, 18, 0, 0).single().unwrap_or_else(Utc::now),
        }
    }
}

impl SampleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift all sample game times to start at `kickoff`
    pub fn with_kickoff(mut self, kickoff: DateTime<Utc>) -> Self {
        self.kickoff = kickoff;
        self
    }

    fn slot(&self, hours: i64) -> DateTime<Utc> {
        self.kickoff + Duration::hours(hours)
    }

    pub fn sample_matchups(&self, sport: Sport) -> Vec<Matchup> {
        match sport {
            Sport::Nfl => self.nfl(),
            Sport::Nba => self.nba(),
            _ => Vec::new(),
        }
    }

    fn nfl(&self) -> Vec<Matchup> {
        let chiefs = Team::new("Kansas City Chiefs", "KC")
            .with_record(12, 5)
            .with_points(456, 371)
            .with_streak(3)
            .with_rest_days(7);
        let bills = Team::new("Buffalo Bills", "BUF")
            .with_record(11, 6)
            .with_points(451, 311)
            .with_streak(2)
            .with_rest_days(6);
        let ravens = Team::new("Baltimore Ravens", "BAL")
            .with_record(13, 4)
            .with_points(483, 280)
            .with_streak(5)
            .with_rest_days(10);
        let niners = Team::new("San Francisco 49ers", "SF")
            .with_record(11, 6)
            .with_points(491, 298)
            .with_streak(-1)
            .with_rest_days(7);
        let cowboys = Team::new("Dallas Cowboys", "DAL")
            .with_record(12, 5)
            .with_points(509, 315)
            .with_streak(4)
            .with_rest_days(7);
        let eagles = Team::new("Philadelphia Eagles", "PHI")
            .with_record(11, 6)
            .with_points(433, 428)
            .with_streak(-3)
            .with_rest_days(7);
        let lions = Team::new("Detroit Lions", "DET")
            .with_record(12, 5)
            .with_points(461, 395)
            .with_streak(2)
            .with_rest_days(8);
        let dolphins = Team::new("Miami Dolphins", "MIA")
            .with_record(11, 6)
            .with_points(496, 391)
            .with_streak(-2)
            .with_rest_days(6);

        vec![
            Matchup::new("nfl-buf-kc", Sport::Nfl, chiefs, bills)
                .with_head_to_head(HeadToHead::new(3, 2))
                .with_injuries(
                    InjuryReport::new(vec![Injury::new(
                        "Isiah Pacheco",
                        "RB",
                        InjuryStatus::Questionable,
                        0.3,
                    )]),
                    InjuryReport::new(vec![Injury::new(
                        "Von Miller",
                        "LB",
                        InjuryStatus::Out,
                        0.4,
                    )]),
                )
                .with_weather(Weather::new(28.0, 18.0, 30.0, "Cold, windy"))
                .with_venue("Arrowhead Stadium")
                .with_game_time(self.slot(0))
                .with_odds(MarketOdds {
                    home_moneyline: Some(-150),
                    away_moneyline: Some(130),
                    spread: Some(SpreadLine {
                        home_point: -3.0,
                        home_price: -110,
                        away_price: -110,
                    }),
                    total: Some(TotalLine {
                        points: 47.5,
                        over_price: -110,
                        under_price: -110,
                    }),
                }),
            Matchup::new("nfl-sf-bal", Sport::Nfl, ravens, niners)
                .with_head_to_head(HeadToHead::new(2, 2))
                .with_injuries(
                    InjuryReport::default(),
                    InjuryReport::new(vec![Injury::new(
                        "Deebo Samuel",
                        "WR",
                        InjuryStatus::Doubtful,
                        0.5,
                    )]),
                )
                .with_weather(Weather::new(45.0, 8.0, 10.0, "Clear"))
                .with_venue("M&T Bank Stadium")
                .with_game_time(self.slot(3))
                .with_odds(MarketOdds {
                    home_moneyline: Some(-175),
                    away_moneyline: Some(150),
                    spread: Some(SpreadLine {
                        home_point: -3.5,
                        home_price: -105,
                        away_price: -115,
                    }),
                    total: Some(TotalLine {
                        points: 44.5,
                        over_price: -110,
                        under_price: -110,
                    }),
                }),
            Matchup::new("nfl-phi-dal", Sport::Nfl, cowboys, eagles)
                .with_head_to_head(HeadToHead::new(3, 3))
                .with_injuries(
                    InjuryReport::default(),
                    InjuryReport::new(vec![Injury::new(
                        "A.J. Brown",
                        "WR",
                        InjuryStatus::Questionable,
                        0.5,
                    )]),
                )
                .with_weather(Weather::dome())
                .with_venue("AT&T Stadium")
                .with_game_time(self.slot(6))
                .with_odds(MarketOdds {
                    home_moneyline: Some(-200),
                    away_moneyline: Some(170),
                    spread: Some(SpreadLine {
                        home_point: -4.5,
                        home_price: -110,
                        away_price: -110,
                    }),
                    total: Some(TotalLine {
                        points: 51.5,
                        over_price: -110,
                        under_price: -110,
                    }),
                }),
            Matchup::new("nfl-mia-det", Sport::Nfl, lions, dolphins)
                .with_head_to_head(HeadToHead::new(1, 1))
                .with_weather(Weather::dome())
                .with_venue("Ford Field")
                .with_game_time(self.slot(24))
                .with_odds(MarketOdds {
                    home_moneyline: Some(-140),
                    away_moneyline: Some(120),
                    spread: Some(SpreadLine {
                        home_point: -2.5,
                        home_price: -110,
                        away_price: -110,
                    }),
                    total: Some(TotalLine {
                        points: 52.5,
                        over_price: -110,
                        under_price: -110,
                    }),
                }),
        ]
    }

    fn nba(&self) -> Vec<Matchup> {
        let celtics = Team::new("Boston Celtics", "BOS")
            .with_record(64, 18)
            .with_points(9887, 9017)
            .with_streak(6)
            .with_rest_days(2);
        let lakers = Team::new("Los Angeles Lakers", "LAL")
            .with_record(47, 35)
            .with_points(9569, 9474)
            .with_streak(-1)
            .with_rest_days(1);
        let nuggets = Team::new("Denver Nuggets", "DEN")
            .with_record(57, 25)
            .with_points(9495, 9054)
            .with_streak(2)
            .with_rest_days(1);
        let suns = Team::new("Phoenix Suns", "PHX")
            .with_record(49, 33)
            .with_points(9478, 9285)
            .with_streak(1)
            .with_rest_days(2);
        let bucks = Team::new("Milwaukee Bucks", "MIL")
            .with_record(49, 33)
            .with_points(9762, 9567)
            .with_streak(-2)
            .with_rest_days(0);
        let warriors = Team::new("Golden State Warriors", "GSW")
            .with_record(46, 36)
            .with_points(9620, 9472)
            .with_streak(3)
            .with_rest_days(2);

        vec![
            Matchup::new("nba-bos-lal", Sport::Nba, lakers, celtics)
                .with_head_to_head(HeadToHead::new(1, 3))
                .with_injuries(
                    InjuryReport::new(vec![Injury::new(
                        "Anthony Davis",
                        "C",
                        InjuryStatus::DayToDay,
                        0.6,
                    )]),
                    InjuryReport::default(),
                )
                .with_venue("Crypto.com Arena")
                .with_game_time(self.slot(2))
                .with_odds(MarketOdds {
                    home_moneyline: Some(110),
                    away_moneyline: Some(-130),
                    spread: Some(SpreadLine {
                        home_point: 2.5,
                        home_price: -110,
                        away_price: -110,
                    }),
                    total: Some(TotalLine {
                        points: 225.5,
                        over_price: -110,
                        under_price: -110,
                    }),
                }),
            Matchup::new("nba-phx-den", Sport::Nba, nuggets, suns)
                .with_head_to_head(HeadToHead::new(2, 1))
                .with_venue("Ball Arena")
                .with_game_time(self.slot(4))
                .with_odds(MarketOdds {
                    home_moneyline: Some(-220),
                    away_moneyline: Some(180),
                    spread: Some(SpreadLine {
                        home_point: -5.5,
                        home_price: -110,
                        away_price: -110,
                    }),
                    total: Some(TotalLine {
                        points: 229.5,
                        over_price: -105,
                        under_price: -115,
                    }),
                }),
            Matchup::new("nba-gsw-mil", Sport::Nba, bucks, warriors)
                .with_head_to_head(HeadToHead::new(1, 1))
                .with_venue("Fiserv Forum")
                .with_game_time(self.slot(5))
                .with_odds(MarketOdds {
                    home_moneyline: Some(-120),
                    away_moneyline: Some(100),
                    spread: Some(SpreadLine {
                        home_point: -1.5,
                        home_price: -110,
                        away_price: -110,
                    }),
                    total: Some(TotalLine {
                        points: 236.5,
                        over_price: -110,
                        under_price: -110,
                    }),
                }),
        ]
    }

    pub fn sample_sports(&self) -> Vec<SportInfo> {
        Sport::ALL
            .iter()
            .map(|sport| SportInfo {
                key: sport.odds_api_key().to_string(),
                group: sport.as_str().to_string(),
                title: sport.as_str().to_string(),
                description: String::new(),
                active: matches!(sport, Sport::Nfl | Sport::Nba | Sport::Nhl),
            })
            .collect()
    }

    pub fn sample_events(&self) -> Vec<OddsEvent> {
        vec![
            event(
                "game1",
                Sport::Nfl,
                self.slot(0),
                ("Kansas City Chiefs", -150),
                ("Buffalo Bills", 130),
                vec![market(
                    "spreads",
                    vec![
                        outcome("Kansas City Chiefs", -110, Some(-3.0)),
                        outcome("Buffalo Bills", -110, Some(3.0)),
                    ],
                )],
            ),
            event(
                "game2",
                Sport::Nba,
                self.slot(2),
                ("Los Angeles Lakers", 110),
                ("Boston Celtics", -130),
                vec![market(
                    "totals",
                    vec![
                        outcome("Over", -110, Some(225.5)),
                        outcome("Under", -110, Some(225.5)),
                    ],
                )],
            ),
            event(
                "game3",
                Sport::Nhl,
                self.slot(4),
                ("Vegas Golden Knights", -120),
                ("Colorado Avalanche", 100),
                vec![],
            ),
        ]
    }
}

fn outcome(name: &str, price: i32, point: Option<f64>) -> Outcome {
    Outcome {
        name: name.to_string(),
        price,
        point,
    }
}

fn market(key: &str, outcomes: Vec<Outcome>) -> BookMarket {
    BookMarket {
        key: key.to_string(),
        outcomes,
    }
}

fn event(
    id: &str,
    sport: Sport,
    commence_time: DateTime<Utc>,
    home: (&str, i32),
    away: (&str, i32),
    mut extra_markets: Vec<BookMarket>,
) -> OddsEvent {
    let mut markets = vec![market(
        "h2h",
        vec![outcome(home.0, home.1, None), outcome(away.0, away.1, None)],
    )];
    markets.append(&mut extra_markets);

    OddsEvent {
        id: id.to_string(),
        sport_key: sport.odds_api_key().to_string(),
        sport_title: sport.as_str().to_string(),
        commence_time,
        home_team: home.0.to_string(),
        away_team: away.0.to_string(),
        bookmakers: vec![Bookmaker {
            key: "draftkings".to_string(),
            title: "DraftKings".to_string(),
            markets,
        }],
    }
}

#[async_trait::async_trait]
impl MatchupSource for SampleProvider {
    async fn matchups(&self, sport: Sport) -> ProviderResult<Vec<Matchup>> {
        let matchups = self.sample_matchups(sport);
        debug!(%sport, count = matchups.len(), "sample matchups");
        Ok(matchups)
    }

    fn name(&self) -> &str {
        "sample"
    }
}

#[async_trait::async_trait]
impl OddsSource for SampleProvider {
    async fn sports(&self) -> ProviderResult<Vec<SportInfo>> {
        Ok(self.sample_sports())
    }

    async fn events(&self, sport_key: &str) -> ProviderResult<Vec<OddsEvent>> {
        Ok(self
            .sample_events()
            .into_iter()
            .filter(|event| sport_key == UPCOMING || event.sport_key == sport_key)
            .collect())
    }

    fn name(&self) -> &str {
        "sample"
    }
}
