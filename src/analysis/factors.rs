//! Weighted factor analysis
//!
//! Each factor reads one aspect of a matchup and scores it in [-1.0, 1.0],
//! positive favouring the home side. A factor whose input is missing is
//! inactive; its weight is shared out proportionally among the active ones
//! so the weights in play always sum to 1.0.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::error::{ParlayError, Result};
use crate::models::{InjuryReport, Matchup, Sport, Team};

/// Tolerance used when checking that weights sum to one
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Factors considered for every matchup, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    TeamRecord,
    HeadToHead,
    Injuries,
    HomeAdvantage,
    Weather,
    RecentForm,
    RestDays,
}

impl FactorKind {
    pub const ALL: [FactorKind; 7] = [
        FactorKind::TeamRecord,
        FactorKind::HeadToHead,
        FactorKind::Injuries,
        FactorKind::HomeAdvantage,
        FactorKind::Weather,
        FactorKind::RecentForm,
        FactorKind::RestDays,
    ];

    pub fn default_weight(&self) -> f64 {
        match self {
            FactorKind::TeamRecord => 0.25,
            FactorKind::HeadToHead => 0.15,
            FactorKind::Injuries => 0.20,
            FactorKind::HomeAdvantage => 0.10,
            FactorKind::Weather => 0.10,
            FactorKind::RecentForm => 0.15,
            FactorKind::RestDays => 0.05,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FactorKind::TeamRecord => "Team records",
            FactorKind::HeadToHead => "Head-to-head",
            FactorKind::Injuries => "Injuries",
            FactorKind::HomeAdvantage => "Home advantage",
            FactorKind::Weather => "Weather",
            FactorKind::RecentForm => "Recent form",
            FactorKind::RestDays => "Rest days",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Relative importance of each factor; always sums to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorWeights {
    weights: [f64; 7],
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            weights: FactorKind::ALL.map(|kind| kind.default_weight()),
        }
    }
}

impl FactorWeights {
    /// Start from the defaults, replace the given weights, then rescale the
    /// whole set to sum to 1.0.
    pub fn with_overrides(overrides: &HashMap<FactorKind, f64>) -> Result<Self> {
        let mut weights = Self::default().weights;
        for (kind, weight) in overrides {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ParlayError::InvalidWeights(format!(
                    "{} weight must be a non-negative number, got {weight}",
                    kind.label()
                )));
            }
            weights[kind.index()] = *weight;
        }

        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(ParlayError::InvalidWeights(
                "at least one factor needs a positive weight".to_string(),
            ));
        }
        for weight in weights.iter_mut() {
            *weight /= total;
        }
        Ok(Self { weights })
    }

    pub fn get(&self, kind: FactorKind) -> f64 {
        self.weights[kind.index()]
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Effective weights for the active subset, rescaled to sum to 1.0.
    ///
    /// When every active factor has zero weight they share it equally.
    pub fn redistribute(&self, active: &[FactorKind]) -> Vec<(FactorKind, f64)> {
        let active_total: f64 = active.iter().map(|kind| self.get(*kind)).sum();
        if active_total <= 0.0 {
            let even = 1.0 / active.len() as f64;
            return active.iter().map(|kind| (*kind, even)).collect();
        }
        active
            .iter()
            .map(|kind| (*kind, self.get(*kind) / active_total))
            .collect()
    }
}

/// Score and reasoning produced by one evaluator
#[derive(Debug, Clone, PartialEq)]
pub struct FactorReading {
    /// -1.0 (strongly away) to 1.0 (strongly home)
    pub score: f64,
    pub explanation: String,
}

impl FactorReading {
    fn new(score: f64, explanation: String) -> Self {
        Self {
            score: score.clamp(-1.0, 1.0),
            explanation,
        }
    }
}

/// One aspect of a matchup that can lean toward a side
pub trait FactorEvaluator: Send + Sync {
    fn kind(&self) -> FactorKind;

    /// `None` when the input this factor needs is unavailable
    fn evaluate(&self, matchup: &Matchup) -> Option<FactorReading>;
}

/// Evaluated factor with its effective weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub kind: FactorKind,
    pub weight: f64,
    pub score: f64,
    /// `weight * score`
    pub contribution: f64,
    pub explanation: String,
}

/// Result of running every evaluator against a matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorAnalysis {
    pub matchup_id: String,
    /// Active factors in evaluation order
    pub factors: Vec<Factor>,
    pub inactive: Vec<FactorKind>,
    /// Sum of contributions, -1.0 to 1.0
    pub raw_score: f64,
}

impl FactorAnalysis {
    pub fn factor(&self, kind: FactorKind) -> Option<&Factor> {
        self.factors.iter().find(|factor| factor.kind == kind)
    }

    pub fn weight_sum(&self) -> f64 {
        self.factors.iter().map(|factor| factor.weight).sum()
    }
}

/// Runs the factor set against matchups
pub struct FactorAnalyzer {
    weights: FactorWeights,
    evaluators: Vec<Box<dyn FactorEvaluator>>,
}

impl Default for FactorAnalyzer {
    fn default() -> Self {
        Self::new(FactorWeights::default())
    }
}

impl FactorAnalyzer {
    pub fn new(weights: FactorWeights) -> Self {
        Self {
            weights,
            evaluators: vec![
                Box::new(TeamRecordFactor),
                Box::new(HeadToHeadFactor),
                Box::new(InjuryFactor),
                Box::new(HomeAdvantageFactor),
                Box::new(WeatherFactor),
                Box::new(RecentFormFactor),
                Box::new(RestDaysFactor),
            ],
        }
    }

    pub fn weights(&self) -> &FactorWeights {
        &self.weights
    }

    pub fn analyze(&self, matchup: &Matchup) -> FactorAnalysis {
        let mut readings = Vec::with_capacity(self.evaluators.len());
        let mut inactive = Vec::new();
        for evaluator in &self.evaluators {
            match evaluator.evaluate(matchup) {
                Some(reading) => readings.push((evaluator.kind(), reading)),
                None => inactive.push(evaluator.kind()),
            }
        }

        let active: Vec<FactorKind> = readings.iter().map(|(kind, _)| *kind).collect();
        let effective = self.weights.redistribute(&active);

        let factors: Vec<Factor> = readings
            .into_iter()
            .zip(effective)
            .map(|((kind, reading), (_, weight))| {
                debug!(
                    matchup = %matchup.id,
                    factor = %kind,
                    weight,
                    score = reading.score,
                    "factor evaluated"
                );
                Factor {
                    kind,
                    weight,
                    score: reading.score,
                    contribution: weight * reading.score,
                    explanation: reading.explanation,
                }
            })
            .collect();

        let raw_score = factors
            .iter()
            .map(|factor| factor.contribution)
            .sum::<f64>()
            .clamp(-1.0, 1.0);

        if !inactive.is_empty() {
            debug!(matchup = %matchup.id, ?inactive, "weights redistributed over active factors");
        }

        FactorAnalysis {
            matchup_id: matchup.id.clone(),
            factors,
            inactive,
            raw_score,
        }
    }
}

/// Bounded, smooth squash of `value`; reaches ~0.76 at `value == scale`
fn saturate(value: f64, scale: f64) -> f64 {
    (value / scale).tanh()
}

fn pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Win percentage gap plus per-game point differential gap
pub struct TeamRecordFactor;

impl TeamRecordFactor {
    const WIN_PCT_SCALE: f64 = 0.06;
    const POINT_DIFF_SCALE: f64 = 10.0;
    const WIN_PCT_SHARE: f64 = 0.8;
}

impl FactorEvaluator for TeamRecordFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::TeamRecord
    }

    fn evaluate(&self, matchup: &Matchup) -> Option<FactorReading> {
        let (home, away) = (&matchup.home, &matchup.away);
        let pct_gap = home.win_pct() - away.win_pct();
        let diff_gap = home.point_differential_per_game() - away.point_differential_per_game();

        let score = Self::WIN_PCT_SHARE * saturate(pct_gap, Self::WIN_PCT_SCALE)
            + (1.0 - Self::WIN_PCT_SHARE) * saturate(diff_gap, Self::POINT_DIFF_SCALE);

        let explanation = format!(
            "{} are {} ({}) vs {} at {} ({}); point differential per game {:+.1} vs {:+.1}",
            home.name,
            home.record(),
            pct(home.win_pct()),
            away.name,
            away.record(),
            pct(away.win_pct()),
            home.point_differential_per_game(),
            away.point_differential_per_game(),
        );
        Some(FactorReading::new(score, explanation))
    }
}

/// Series history, shrunk toward zero for small samples
pub struct HeadToHeadFactor;

impl HeadToHeadFactor {
    const SHRINKAGE: f64 = 2.0;
}

impl FactorEvaluator for HeadToHeadFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::HeadToHead
    }

    fn evaluate(&self, matchup: &Matchup) -> Option<FactorReading> {
        let h2h = matchup.head_to_head;
        let meetings = h2h.meetings();
        if meetings == 0 {
            return Some(FactorReading::new(
                0.0,
                "No head-to-head history between these teams".to_string(),
            ));
        }

        let meetings_f = f64::from(meetings);
        let edge = (f64::from(h2h.home_wins) - f64::from(h2h.away_wins)) / meetings_f;
        let score = edge * meetings_f / (meetings_f + Self::SHRINKAGE);

        let mut explanation = format!(
            "Head-to-head: {} {}-{} {} over {} meetings",
            matchup.home.abbreviation,
            h2h.home_wins,
            h2h.away_wins,
            matchup.away.abbreviation,
            meetings
        );
        if h2h.ties > 0 {
            explanation.push_str(&format!(" ({} tied)", h2h.ties));
        }
        Some(FactorReading::new(score, explanation))
    }
}

/// Injury impact gap; the side missing more talent loses ground
pub struct InjuryFactor;

fn injury_summary(team: &Team, report: &InjuryReport) -> String {
    format!(
        "{} {:.2} ({} out, {} questionable)",
        team.abbreviation,
        report.total_impact(),
        report.count_likely_out(),
        report.count_uncertain()
    )
}

impl FactorEvaluator for InjuryFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::Injuries
    }

    fn evaluate(&self, matchup: &Matchup) -> Option<FactorReading> {
        let home_impact = matchup.home_injuries.total_impact();
        let away_impact = matchup.away_injuries.total_impact();

        let explanation = if home_impact == 0.0 && away_impact == 0.0 {
            "No significant injuries reported for either team".to_string()
        } else {
            format!(
                "Injury impact: {}, {}",
                injury_summary(&matchup.home, &matchup.home_injuries),
                injury_summary(&matchup.away, &matchup.away_injuries)
            )
        };
        Some(FactorReading::new(away_impact - home_impact, explanation))
    }
}

/// Sport-specific home edge; nothing at neutral sites
pub struct HomeAdvantageFactor;

impl HomeAdvantageFactor {
    pub fn home_edge(sport: Sport) -> f64 {
        match sport {
            Sport::Nfl => 0.40,
            Sport::Nba => 0.30,
            Sport::Mlb => 0.20,
            Sport::Nhl => 0.25,
            Sport::Ncaaf => 0.50,
            Sport::Ncaab => 0.40,
        }
    }
}

impl FactorEvaluator for HomeAdvantageFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::HomeAdvantage
    }

    fn evaluate(&self, matchup: &Matchup) -> Option<FactorReading> {
        if matchup.neutral_site {
            return Some(FactorReading::new(
                0.0,
                "Neutral site, no home advantage".to_string(),
            ));
        }
        let edge = Self::home_edge(matchup.sport);
        Some(FactorReading::new(
            edge,
            format!("{} at home ({} home edge {:+.2})", matchup.home.name, matchup.sport, edge),
        ))
    }
}

/// Adverse weather narrows the gap toward the weaker-record side
pub struct WeatherFactor;

impl WeatherFactor {
    const GAP_COMPRESSION: f64 = 0.5;
}

impl FactorEvaluator for WeatherFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::Weather
    }

    fn evaluate(&self, matchup: &Matchup) -> Option<FactorReading> {
        let weather = matchup.outdoor_weather()?;
        let impact = weather.impact_score();
        let gap = matchup.home.win_pct() - matchup.away.win_pct();

        let score = if gap == 0.0 {
            0.0
        } else {
            -gap.signum() * impact * Self::GAP_COMPRESSION
        };

        let mut explanation = format!(
            "Weather: {}, {:.0}°F, wind {:.0} mph, {:.0}% precipitation (impact {:.2})",
            weather.conditions,
            weather.temperature_f,
            weather.wind_mph,
            weather.precipitation_pct,
            impact
        );
        if weather.affects_gameplay() && score != 0.0 {
            let helped = if score > 0.0 { &matchup.home } else { &matchup.away };
            explanation.push_str(&format!("; conditions narrow the gap toward {}", helped.name));
        }
        Some(FactorReading::new(score, explanation))
    }
}

/// Current win/loss streaks
pub struct RecentFormFactor;

impl RecentFormFactor {
    const STREAK_SCALE: f64 = 5.0;

    fn form(streak: i32) -> f64 {
        (f64::from(streak) / Self::STREAK_SCALE).clamp(-1.0, 1.0)
    }
}

fn streak_text(streak: i32) -> String {
    match streak {
        0 => "no active streak".to_string(),
        n if n > 0 => format!("won {n} straight"),
        n => format!("lost {} straight", n.unsigned_abs()),
    }
}

impl FactorEvaluator for RecentFormFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::RecentForm
    }

    fn evaluate(&self, matchup: &Matchup) -> Option<FactorReading> {
        let (home, away) = (&matchup.home, &matchup.away);
        let score = (Self::form(home.streak) - Self::form(away.streak)) / 2.0;
        Some(FactorReading::new(
            score,
            format!(
                "Recent form: {} {}, {} {}",
                home.name,
                streak_text(home.streak),
                away.name,
                streak_text(away.streak)
            ),
        ))
    }
}

/// Rest-day difference; needs both teams' schedules
pub struct RestDaysFactor;

impl RestDaysFactor {
    const REST_SCALE: f64 = 3.0;
}

impl FactorEvaluator for RestDaysFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::RestDays
    }

    fn evaluate(&self, matchup: &Matchup) -> Option<FactorReading> {
        let home_rest = matchup.home.rest_days?;
        let away_rest = matchup.away.rest_days?;
        let gap = f64::from(home_rest) - f64::from(away_rest);
        Some(FactorReading::new(
            saturate(gap, Self::REST_SCALE),
            format!(
                "Rest: {} {} days, {} {} days",
                matchup.home.name, home_rest, matchup.away.name, away_rest
            ),
        ))
    }
}
