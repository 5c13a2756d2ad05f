//! Pricing rules
//!
//! Fixed promotional constants for a computation: the "any N for a flat
//! price" bundle, the capped student discount, the flat sales tax and the
//! rewards rate. Each rule validates its inputs on construction.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{Currency, SGD},
};
use thiserror::Error;

/// Errors raised when a rule is constructed with out-of-range values.
#[derive(Debug, Error, PartialEq)]
pub enum RulesError {
    /// A bundle must contain at least one unit.
    #[error("bundle size must be at least 1")]
    ZeroBundleSize,

    /// Rates are fractions in `[0, 1]`.
    #[error("{0} rate must be between 0% and 100%, got {1}")]
    RateOutOfRange(&'static str, Decimal),

    /// Money amounts in rules cannot be negative.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),

    /// Rewards need a positive spend per point.
    #[error("spend per reward point must be positive")]
    NonPositiveSpendPerPoint,

    /// All rule amounts must share one currency.
    #[error("rule amounts mix currencies {0} and {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Any `size` units for a flat `price`.
#[derive(Debug, Clone, Copy)]
pub struct BundleRule<'a> {
    size: usize,
    price: Money<'a, Currency>,
}

impl<'a> BundleRule<'a> {
    /// Create a bundle rule.
    ///
    /// # Errors
    ///
    /// - [`RulesError::ZeroBundleSize`]: `size` is zero.
    /// - [`RulesError::NegativeAmount`]: `price` is negative.
    pub fn new(size: usize, price: Money<'a, Currency>) -> Result<Self, RulesError> {
        if size == 0 {
            return Err(RulesError::ZeroBundleSize);
        }

        ensure_non_negative("bundle price", price)?;

        Ok(Self { size, price })
    }

    /// Number of units in a bundle.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Flat price charged for a bundle.
    pub fn price(&self) -> Money<'a, Currency> {
        self.price
    }
}

/// Percentage discount on the post-bundle subtotal, capped at an absolute amount.
#[derive(Debug, Clone, Copy)]
pub struct DiscountRule<'a> {
    rate: Percentage,
    cap: Money<'a, Currency>,
}

impl<'a> DiscountRule<'a> {
    /// Create a capped discount rule.
    ///
    /// # Errors
    ///
    /// - [`RulesError::RateOutOfRange`]: `rate` is outside `[0, 1]`.
    /// - [`RulesError::NegativeAmount`]: `cap` is negative.
    pub fn new(rate: Percentage, cap: Money<'a, Currency>) -> Result<Self, RulesError> {
        ensure_fraction("discount", rate)?;
        ensure_non_negative("discount cap", cap)?;

        Ok(Self { rate, cap })
    }

    /// Discount rate.
    pub fn rate(&self) -> Percentage {
        self.rate
    }

    /// Largest discount that can be granted.
    pub fn cap(&self) -> Money<'a, Currency> {
        self.cap
    }
}

/// Single flat tax rate, applied after discounts.
#[derive(Debug, Clone, Copy)]
pub struct TaxRule {
    rate: Percentage,
}

impl TaxRule {
    /// Create a tax rule.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::RateOutOfRange`] if `rate` is outside `[0, 1]`.
    pub fn new(rate: Percentage) -> Result<Self, RulesError> {
        ensure_fraction("tax", rate)?;

        Ok(Self { rate })
    }

    /// Tax rate.
    pub fn rate(&self) -> Percentage {
        self.rate
    }
}

/// One reward point per `spend_per_point` of post-bundle spend.
#[derive(Debug, Clone, Copy)]
pub struct RewardsRule<'a> {
    spend_per_point: Money<'a, Currency>,
}

impl<'a> RewardsRule<'a> {
    /// Create a rewards rule.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NonPositiveSpendPerPoint`] unless the amount is above zero.
    pub fn new(spend_per_point: Money<'a, Currency>) -> Result<Self, RulesError> {
        if !spend_per_point.is_positive() {
            return Err(RulesError::NonPositiveSpendPerPoint);
        }

        Ok(Self { spend_per_point })
    }

    /// Spend needed to earn one point.
    pub fn spend_per_point(&self) -> Money<'a, Currency> {
        self.spend_per_point
    }
}

/// The full rule set used by the pricing engine.
///
/// Every money amount in a rule set is in one currency. The fields are only
/// reachable through [`PricingRules::new`] and the `with_*` builders, which
/// check that.
#[derive(Debug, Clone, Copy)]
pub struct PricingRules<'a> {
    bundle: BundleRule<'a>,
    discount: DiscountRule<'a>,
    tax: TaxRule,
    rewards: RewardsRule<'a>,
}

impl<'a> PricingRules<'a> {
    /// Group rules into a rule set.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::CurrencyMismatch`] if the money amounts are not all in one currency.
    pub fn new(
        bundle: BundleRule<'a>,
        discount: DiscountRule<'a>,
        tax: TaxRule,
        rewards: RewardsRule<'a>,
    ) -> Result<Self, RulesError> {
        let currency = bundle.price.currency();

        for other in [discount.cap.currency(), rewards.spend_per_point.currency()] {
            if other != currency {
                return Err(RulesError::CurrencyMismatch(
                    currency.iso_alpha_code,
                    other.iso_alpha_code,
                ));
            }
        }

        Ok(Self {
            bundle,
            discount,
            tax,
            rewards,
        })
    }

    /// Currency of every money amount in the rule set.
    pub fn currency(&self) -> &Currency {
        self.bundle.price.currency()
    }

    /// Bundle promotion
    pub fn bundle(&self) -> BundleRule<'a> {
        self.bundle
    }

    /// Student discount
    pub fn discount(&self) -> DiscountRule<'a> {
        self.discount
    }

    /// Sales tax (GST)
    pub fn tax(&self) -> TaxRule {
        self.tax
    }

    /// Rewards points
    pub fn rewards(&self) -> RewardsRule<'a> {
        self.rewards
    }

    /// Replace the bundle rule.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::CurrencyMismatch`] if the bundle price is in another currency.
    pub fn with_bundle(self, bundle: BundleRule<'a>) -> Result<Self, RulesError> {
        Self::new(bundle, self.discount, self.tax, self.rewards)
    }

    /// Replace the discount rule.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::CurrencyMismatch`] if the cap is in another currency.
    pub fn with_discount(self, discount: DiscountRule<'a>) -> Result<Self, RulesError> {
        Self::new(self.bundle, discount, self.tax, self.rewards)
    }

    /// Replace the tax rule.
    #[must_use]
    pub fn with_tax(self, tax: TaxRule) -> Self {
        Self { tax, ..self }
    }

    /// Replace the rewards rule.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::CurrencyMismatch`] if the spend per point is in another currency.
    pub fn with_rewards(self, rewards: RewardsRule<'a>) -> Result<Self, RulesError> {
        Self::new(self.bundle, self.discount, self.tax, rewards)
    }
}

impl PricingRules<'static> {
    /// The reference rule amounts, priced in `currency`.
    pub fn with_currency(currency: &'static Currency) -> Self {
        Self {
            bundle: BundleRule {
                size: 3,
                price: Money::from_minor(500, currency),
            },
            discount: DiscountRule {
                rate: Percentage::from(Decimal::new(10, 2)),
                cap: Money::from_minor(200, currency),
            },
            tax: TaxRule {
                rate: Percentage::from(Decimal::new(9, 2)),
            },
            rewards: RewardsRule {
                spend_per_point: Money::from_minor(500, currency),
            },
        }
    }
}

impl Default for PricingRules<'static> {
    /// Any 3 for 5.00, student 10% capped at 2.00, GST 9%, a point per 5.00, in SGD.
    fn default() -> Self {
        Self::with_currency(SGD)
    }
}

/// The rate as a plain decimal fraction (0.10 for 10%).
pub(crate) fn fraction(rate: Percentage) -> Decimal {
    // decimal_percentage doesn't expose the underlying Decimal
    rate * Decimal::ONE
}

fn ensure_fraction(label: &'static str, rate: Percentage) -> Result<(), RulesError> {
    let value = fraction(rate);

    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(RulesError::RateOutOfRange(label, value));
    }

    Ok(())
}

fn ensure_non_negative(label: &'static str, amount: Money<'_, Currency>) -> Result<(), RulesError> {
    if amount.is_negative() {
        return Err(RulesError::NegativeAmount(label));
    }

    Ok(())
}
