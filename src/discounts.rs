//! Discounts
//!
//! Rounding and percentage arithmetic shared by the pricing steps. Exact
//! decimal amounts become whole minor units at each checkpoint, and a
//! percentage of an amount is rounded the same way: to the nearest minor
//! unit, halves away from zero.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

use crate::rules::{DiscountRule, TaxRule, fraction};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// Round an exact major unit amount to whole minor units (cents), halves away from zero.
///
/// Returns `None` if the result does not fit in `i64`.
pub fn round_to_minor(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Calculate a percentage of a minor unit amount, rounded to whole minor units.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the result cannot be represented.
pub fn percent_of_minor(percent: Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    fraction(percent)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Student discount on the post-bundle subtotal: the rate, rounded, but never above the cap.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the percentage cannot be applied.
pub fn student_discount(rule: &DiscountRule<'_>, after_bundles: i64) -> Result<i64, DiscountError> {
    let raw = percent_of_minor(rule.rate(), after_bundles)?;
    let cap = round_to_minor(*rule.cap().amount()).ok_or(DiscountError::PercentConversion)?;

    Ok(raw.min(cap))
}

/// Tax owed on a taxable amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the percentage cannot be applied.
pub fn tax_on(rule: &TaxRule, taxable: i64) -> Result<i64, DiscountError> {
    percent_of_minor(rule.rate(), taxable)
}
