//! Odds conversion
//!
//! American odds are signed integers with magnitude of at least 100:
//! `+150` wins 150 on a 100 stake, `-150` needs a 150 stake to win 100.
//! Decimal odds are the total return per unit staked and always exceed 1.0.

use crate::error::{ParlayError, Result};

/// Smallest magnitude a valid American price can have
pub const MIN_AMERICAN_MAGNITUDE: i32 = 100;

/// Convert American odds to decimal odds.
///
/// `+150` becomes `2.5`, `-150` becomes `1.667`.
pub fn american_to_decimal(american: i32) -> Result<f64> {
    if american.unsigned_abs() < MIN_AMERICAN_MAGNITUDE as u32 {
        return Err(ParlayError::american(
            american,
            "American odds must be at least +100 or at most -100",
        ));
    }

    let decimal = if american > 0 {
        1.0 + f64::from(american) / 100.0
    } else {
        1.0 + 100.0 / f64::from(american).abs()
    };
    Ok(decimal)
}

/// Convert decimal odds to American odds, rounded to the nearest integer.
///
/// Decimal 2.0 is even money and maps to `+100`.
pub fn decimal_to_american(decimal: f64) -> Result<i32> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(ParlayError::decimal(
            decimal,
            "decimal odds must be a finite number greater than 1.0",
        ));
    }

    let american = if decimal >= 2.0 {
        ((decimal - 1.0) * 100.0).round()
    } else {
        (-100.0 / (decimal - 1.0)).round()
    };

    if american.abs() > f64::from(i32::MAX) {
        return Err(ParlayError::decimal(
            decimal,
            "decimal odds too long to express as American odds",
        ));
    }
    Ok(american as i32)
}

/// Implied win probability of an American price, strictly within (0, 1)
pub fn implied_probability(american: i32) -> Result<f64> {
    american_to_decimal(american).map(|decimal| 1.0 / decimal)
}

/// Implied win probability of a decimal price
pub fn implied_probability_from_decimal(decimal: f64) -> Result<f64> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(ParlayError::decimal(
            decimal,
            "decimal odds must be a finite number greater than 1.0",
        ));
    }
    Ok(1.0 / decimal)
}

/// Render American odds with an explicit sign, e.g. `+250` or `-110`
pub fn format_american(american: i32) -> String {
    format!("{american:+}")
}
