//! Parlay payout math
//!
//! All arithmetic is done in `f64`. Money is only rounded to cents when a
//! breakdown is turned into a [`PayoutDisplay`] for presentation.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{ParlayError, Result};
use crate::odds::{american_to_decimal, decimal_to_american, format_american, implied_probability};

/// Full payout metrics for a stake placed on a set of legs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoutBreakdown {
    pub num_legs: usize,
    pub stake: f64,
    pub combined_decimal: f64,
    pub combined_american: i32,
    /// Stake plus profit returned on a win
    pub total_payout: f64,
    pub profit: f64,
    /// Product of per-leg implied probabilities (legs treated as independent)
    pub implied_probability: f64,
}

/// Rounded, human-facing view of a [`PayoutBreakdown`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutDisplay {
    pub num_legs: usize,
    pub stake: Decimal,
    pub combined_decimal: Decimal,
    pub combined_american: String,
    pub total_payout: Decimal,
    pub profit: Decimal,
    pub implied_probability_pct: Decimal,
}

/// Multiply every leg's decimal odds together
pub fn combine_decimal_odds(legs: &[i32]) -> Result<f64> {
    if legs.is_empty() {
        return Err(ParlayError::EmptyParlay);
    }
    legs.iter()
        .try_fold(1.0, |acc, &odds| Ok(acc * american_to_decimal(odds)?))
}

/// Compute payout, profit and implied probability for `stake` across `legs`.
///
/// # Examples
///
/// ```
/// use parlay_engine::payout::calculate_payout;
///
/// let breakdown = calculate_payout(100.0, &[-150, 110]).unwrap();
/// assert_eq!(breakdown.combined_american, 250);
/// assert!((breakdown.total_payout - 350.0).abs() < 1e-9);
/// ```
pub fn calculate_payout(stake: f64, legs: &[i32]) -> Result<PayoutBreakdown> {
    if !stake.is_finite() || stake < 0.0 {
        return Err(ParlayError::InvalidStake(stake));
    }

    let combined_decimal = combine_decimal_odds(legs)?;
    let combined_american = decimal_to_american(combined_decimal)?;
    let implied_probability = legs
        .iter()
        .try_fold(1.0, |acc, &odds| Ok::<_, ParlayError>(acc * implied_probability(odds)?))?;

    let total_payout = stake * combined_decimal;

    Ok(PayoutBreakdown {
        num_legs: legs.len(),
        stake,
        combined_decimal,
        combined_american,
        total_payout,
        profit: total_payout - stake,
        implied_probability,
    })
}

impl PayoutBreakdown {
    /// Round to presentation precision: cents for money, three places for
    /// decimal odds, two places for the percentage.
    pub fn display(&self) -> PayoutDisplay {
        PayoutDisplay {
            num_legs: self.num_legs,
            stake: round_to(self.stake, 2),
            combined_decimal: round_to(self.combined_decimal, 3),
            combined_american: format_american(self.combined_american),
            total_payout: round_to(self.total_payout, 2),
            profit: round_to(self.profit, 2),
            implied_probability_pct: round_to(self.implied_probability * 100.0, 2),
        }
    }
}

/// Half-away-from-zero rounding into a `Decimal`; values beyond the
/// `Decimal` range saturate.
fn round_to(value: f64, dp: u32) -> Decimal {
    let decimal = Decimal::from_f64(value).unwrap_or(if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    });
    decimal.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
