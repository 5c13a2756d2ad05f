//! Pricing
//!
//! The pricing engine turns a cart into a fully itemised [`Receipt`]. The
//! pipeline runs once, in order: build lines, bundle units, apply the
//! student discount, apply tax. Each step only reads the previous step's
//! output. The engine holds no mutable state, so one engine can price any
//! number of carts, from any number of threads.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{Span, debug, field};

use crate::{
    bundles::apply_bundles,
    cart::Cart,
    catalog::Catalog,
    discounts::{DiscountError, round_to_minor, student_discount, tax_on},
    items::{MAX_CART_UNITS, expand_units},
    products::Product,
    receipt::{BundleSummary, DiscountSummary, LineItem, Receipt, TaxSummary},
    rules::{PricingRules, fraction},
};

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The cart references an item code that is not in the catalog.
    #[error("unknown item code: {0}")]
    UnknownItem(String),

    /// An amount left the range of `i64` minor units or `Decimal`.
    #[error("amount overflowed while pricing cart")]
    Overflow,

    /// The cart holds more units than can be expanded for bundling.
    #[error("cart holds {0} units, more than the limit of {max}", max = MAX_CART_UNITS)]
    TooManyUnits(u64),

    /// The catalog and rules are priced in different currencies (catalog, rules).
    #[error("catalog currency {0} does not match rules currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Percentage arithmetic failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Prices carts against a fixed catalog and rule set.
#[derive(Debug, Clone)]
pub struct PricingEngine<'a> {
    catalog: Catalog<'a>,
    rules: PricingRules<'a>,
}

impl<'a> PricingEngine<'a> {
    /// Create an engine for a catalog and rule set.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::CurrencyMismatch`] if the rules are not in the catalog currency.
    pub fn new(catalog: Catalog<'a>, rules: PricingRules<'a>) -> Result<Self, PricingError> {
        let catalog_currency = catalog.currency();
        let rules_currency = rules.currency();

        if catalog_currency != rules_currency {
            return Err(PricingError::CurrencyMismatch(
                catalog_currency.iso_alpha_code,
                rules_currency.iso_alpha_code,
            ));
        }

        Ok(Self { catalog, rules })
    }

    /// The campus catalog with the default rules.
    pub fn campus() -> PricingEngine<'static> {
        PricingEngine {
            catalog: Catalog::campus(),
            rules: PricingRules::default(),
        }
    }

    /// Catalog used to resolve item codes.
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// Rules applied to every cart.
    pub fn rules(&self) -> &PricingRules<'a> {
        &self.rules
    }

    /// Currency of every amount on the receipts this engine produces.
    pub fn currency(&self) -> &'static Currency {
        self.catalog.currency()
    }

    /// Price a cart.
    ///
    /// `student` applies the capped student discount, `gst` applies sales tax
    /// on the discounted amount.
    ///
    /// # Errors
    ///
    /// - [`PricingError::UnknownItem`]: a positive-quantity code is not in the catalog.
    /// - [`PricingError::TooManyUnits`]: the cart holds more than [`MAX_CART_UNITS`] units.
    /// - [`PricingError::Overflow`]: an amount does not fit in `i64` minor units.
    /// - [`PricingError::Discount`]: a percentage could not be applied.
    #[tracing::instrument(
        name = "pricing.compute",
        skip(self, cart),
        fields(
            units = field::Empty,
            bundles_applied = field::Empty,
            grand_total = field::Empty
        )
    )]
    pub fn compute(
        &self,
        cart: &Cart,
        student: bool,
        gst: bool,
    ) -> Result<Receipt<'a>, PricingError> {
        let currency = self.catalog.currency();
        let money = |minor: i64| Money::from_minor(minor, currency);

        // Step 1: one line per code
        let resolved = self.resolve(cart)?;
        let Lines {
            mut lines,
            pre_subtotal,
            total_units,
        } = build_lines(&resolved, currency)?;

        if total_units > MAX_CART_UNITS {
            return Err(PricingError::TooManyUnits(total_units));
        }

        // Step 2: bundle individual units
        let outcome = apply_bundles(
            expand_units(resolved.iter().copied()),
            &self.rules.bundle(),
        )?;

        for line in &mut lines {
            line.bundled_units = outcome.bundled_units(&line.code);
        }

        let after_bundles = outcome.after_bundles();

        // Step 3: student discount
        let discount = if student {
            student_discount(&self.rules.discount(), after_bundles)?
        } else {
            0
        };

        // Step 4: tax on the discounted amount
        let taxable = after_bundles - discount;
        let tax = if gst {
            tax_on(&self.rules.tax(), taxable)?
        } else {
            0
        };

        let grand_total = checked_add(taxable, tax)?;

        let span = Span::current();
        span.record("units", total_units);
        span.record("bundles_applied", outcome.applied());
        span.record("grand_total", grand_total);

        debug!(
            pre_subtotal,
            after_bundles, discount, tax, grand_total, "priced cart"
        );

        Ok(Receipt {
            lines,
            pre_subtotal: money(pre_subtotal),
            bundles: BundleSummary {
                size: self.rules.bundle().size(),
                price: self.rules.bundle().price(),
                applied: outcome.applied(),
                savings: money(outcome.savings()),
                groups: outcome.groups().to_vec(),
            },
            after_bundles: money(after_bundles),
            discount: DiscountSummary {
                applied: student,
                rate: fraction(self.rules.discount().rate()),
                cap: self.rules.discount().cap(),
                amount: money(discount),
            },
            tax: TaxSummary {
                rate: gst.then(|| fraction(self.rules.tax().rate())),
                amount: money(tax),
            },
            grand_total: money(grand_total),
            total_units,
            spend_per_point: self.rules.rewards().spend_per_point(),
            currency,
        })
    }

    /// Pair each positive-quantity cart entry with its catalog product.
    fn resolve(&self, cart: &Cart) -> Result<Vec<(&Product<'a>, u32)>, PricingError> {
        cart.iter()
            .map(|entry| {
                self.catalog
                    .get(&entry.code)
                    .map(|product| (product, entry.quantity))
                    .ok_or_else(|| PricingError::UnknownItem(entry.code.clone()))
            })
            .collect()
    }
}

/// Line items plus the totals accumulated while building them.
struct Lines<'a> {
    lines: Vec<LineItem<'a>>,
    pre_subtotal: i64,
    total_units: u64,
}

fn build_lines<'a>(
    resolved: &[(&Product<'a>, u32)],
    currency: &'static Currency,
) -> Result<Lines<'a>, PricingError> {
    let mut lines = Vec::with_capacity(resolved.len());
    let mut pre_subtotal = 0i64;
    let mut total_units = 0u64;

    for &(product, quantity) in resolved {
        let exact = product
            .unit_price()
            .checked_mul(Decimal::from(quantity))
            .ok_or(PricingError::Overflow)?;
        let line_subtotal = round_to_minor(exact).ok_or(PricingError::Overflow)?;

        pre_subtotal = checked_add(pre_subtotal, line_subtotal)?;
        total_units += u64::from(quantity);

        lines.push(LineItem {
            code: product.code.clone(),
            name: product.name.clone(),
            quantity,
            unit_price: product.price,
            subtotal: Money::from_minor(line_subtotal, currency),
            bundled_units: 0,
        });
    }

    Ok(Lines {
        lines,
        pre_subtotal,
        total_units,
    })
}

fn checked_add(a: i64, b: i64) -> Result<i64, PricingError> {
    a.checked_add(b).ok_or(PricingError::Overflow)
}
