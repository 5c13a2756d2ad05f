//! Receipt
//!
//! The complete, itemised result of pricing one cart. A receipt is a plain
//! value: building it twice from the same inputs gives equal receipts.

use std::cmp::Reverse;

use clap::ValueEnum;
use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::bundles::BundleGroup;

mod render;

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,

    /// CSV encoding error
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// One row per item code in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem<'a> {
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) quantity: u32,
    pub(crate) unit_price: Money<'a, Currency>,
    pub(crate) subtotal: Money<'a, Currency>,
    pub(crate) bundled_units: u32,
}

impl<'a> LineItem<'a> {
    /// Item code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quantity purchased
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of one unit
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Unit price times quantity, before bundling
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Units of this line that were charged as part of a bundle
    pub fn bundled_units(&self) -> u32 {
        self.bundled_units
    }
}

/// How the bundle promotion played out.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleSummary<'a> {
    pub(crate) size: usize,
    pub(crate) price: Money<'a, Currency>,
    pub(crate) applied: usize,
    pub(crate) savings: Money<'a, Currency>,
    pub(crate) groups: Vec<BundleGroup>,
}

impl<'a> BundleSummary<'a> {
    /// Units per bundle
    pub fn size(&self) -> usize {
        self.size
    }

    /// Flat bundle price
    pub fn price(&self) -> Money<'a, Currency> {
        self.price
    }

    /// Number of bundles applied
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Saved versus unit prices
    pub fn savings(&self) -> Money<'a, Currency> {
        self.savings
    }

    /// Product names in each applied bundle
    pub fn groups(&self) -> &[BundleGroup] {
        &self.groups
    }
}

/// Student discount outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountSummary<'a> {
    pub(crate) applied: bool,
    pub(crate) rate: Decimal,
    pub(crate) cap: Money<'a, Currency>,
    pub(crate) amount: Money<'a, Currency>,
}

impl<'a> DiscountSummary<'a> {
    /// Whether the student discount was requested.
    pub fn applied(&self) -> bool {
        self.applied
    }

    /// Discount rate offered.
    pub fn rate(&self) -> Percentage {
        Percentage::from(self.rate)
    }

    /// Largest discount that could be granted.
    pub fn cap(&self) -> Money<'a, Currency> {
        self.cap
    }

    /// Amount taken off the post-bundle subtotal.
    pub fn amount(&self) -> Money<'a, Currency> {
        self.amount
    }

    /// True when the discount was limited by the cap.
    pub fn cap_reached(&self) -> bool {
        self.applied && self.amount == self.cap
    }
}

/// Sales tax outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxSummary<'a> {
    pub(crate) rate: Option<Decimal>,
    pub(crate) amount: Money<'a, Currency>,
}

impl<'a> TaxSummary<'a> {
    /// Tax rate charged, or `None` when tax was not applied.
    pub fn rate(&self) -> Option<Percentage> {
        self.rate.map(Percentage::from)
    }

    /// Tax charged.
    pub fn amount(&self) -> Money<'a, Currency> {
        self.amount
    }
}

/// Ordering for receipt rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReceiptSort {
    /// Cart order
    #[default]
    Cart,

    /// Highest line subtotal first
    Spend,

    /// Largest quantity first
    Quantity,

    /// Product name, A to Z
    Name,
}

/// Final receipt for a priced cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt<'a> {
    pub(crate) lines: Vec<LineItem<'a>>,
    pub(crate) pre_subtotal: Money<'a, Currency>,
    pub(crate) bundles: BundleSummary<'a>,
    pub(crate) after_bundles: Money<'a, Currency>,
    pub(crate) discount: DiscountSummary<'a>,
    pub(crate) tax: TaxSummary<'a>,
    pub(crate) grand_total: Money<'a, Currency>,
    pub(crate) total_units: u64,
    pub(crate) spend_per_point: Money<'a, Currency>,
    pub(crate) currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Line items in cart order.
    pub fn lines(&self) -> &[LineItem<'a>] {
        &self.lines
    }

    /// Line items in the requested order. Ties keep cart order.
    pub fn sorted_lines(&self, sort: ReceiptSort) -> Vec<&LineItem<'a>> {
        let mut lines: Vec<&LineItem<'a>> = self.lines.iter().collect();

        match sort {
            ReceiptSort::Cart => {}
            ReceiptSort::Spend => lines.sort_by_key(|line| Reverse(line.subtotal.to_minor_units())),
            ReceiptSort::Quantity => lines.sort_by_key(|line| Reverse(line.quantity)),
            ReceiptSort::Name => lines.sort_by(|a, b| a.name.cmp(&b.name)),
        }

        lines
    }

    /// Sum of line subtotals, before bundling.
    pub fn pre_subtotal(&self) -> Money<'a, Currency> {
        self.pre_subtotal
    }

    /// Bundle promotion outcome.
    pub fn bundles(&self) -> &BundleSummary<'a> {
        &self.bundles
    }

    /// Units of `code` that were charged as part of a bundle.
    pub fn bundled_units(&self, code: &str) -> u32 {
        self.lines
            .iter()
            .find(|line| line.code == code)
            .map_or(0, |line| line.bundled_units)
    }

    /// Amount charged for all units after bundling.
    pub fn after_bundles(&self) -> Money<'a, Currency> {
        self.after_bundles
    }

    /// Student discount outcome.
    pub fn discount(&self) -> &DiscountSummary<'a> {
        &self.discount
    }

    /// Sales tax outcome.
    pub fn tax(&self) -> &TaxSummary<'a> {
        &self.tax
    }

    /// Amount due.
    pub fn grand_total(&self) -> Money<'a, Currency> {
        self.grand_total
    }

    /// Number of units purchased.
    pub fn total_units(&self) -> u64 {
        self.total_units
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Bundle savings plus the student discount.
    pub fn total_savings(&self) -> Money<'a, Currency> {
        Money::from_minor(
            self.bundles.savings.to_minor_units() + self.discount.amount.to_minor_units(),
            self.currency,
        )
    }

    /// Reward points earned: one per full `spend_per_point` of post-bundle spend.
    pub fn reward_points(&self) -> u64 {
        self.after_bundles
            .amount()
            .checked_div(*self.spend_per_point.amount())
            .and_then(|points| points.floor().to_u64())
            .unwrap_or(0)
    }

    /// Units still needed to complete the next bundle, when exactly one is missing.
    ///
    /// Returns `None` for an empty cart or when the trailing group is further
    /// than one unit from a full bundle.
    pub fn units_to_next_bundle(&self) -> Option<u64> {
        let size = u64::try_from(self.bundles.size).ok()?;

        if self.total_units == 0 || size < 2 {
            return None;
        }

        (self.total_units % size == size - 1).then_some(1)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::SGD;
    use smallvec::smallvec;

    use super::*;

    fn line(code: &str, name: &str, quantity: u32, unit: i64) -> LineItem<'static> {
        LineItem {
            code: code.to_string(),
            name: name.to_string(),
            quantity,
            unit_price: Money::from_minor(unit, SGD),
            subtotal: Money::from_minor(unit * i64::from(quantity), SGD),
            bundled_units: 0,
        }
    }

    fn receipt(lines: Vec<LineItem<'static>>, after_bundles: i64, total_units: u64) -> Receipt<'static> {
        Receipt {
            lines,
            pre_subtotal: Money::from_minor(after_bundles, SGD),
            bundles: BundleSummary {
                size: 3,
                price: Money::from_minor(500, SGD),
                applied: 1,
                savings: Money::from_minor(150, SGD),
                groups: vec![smallvec![
                    "A5 Notebook".to_string(),
                    "Gel Pen".to_string(),
                    "Highlighter".to_string()
                ]],
            },
            after_bundles: Money::from_minor(after_bundles, SGD),
            discount: DiscountSummary {
                applied: true,
                rate: Decimal::new(10, 2),
                cap: Money::from_minor(200, SGD),
                amount: Money::from_minor(200, SGD),
            },
            tax: TaxSummary {
                rate: None,
                amount: Money::from_minor(0, SGD),
            },
            grand_total: Money::from_minor(after_bundles - 200, SGD),
            total_units,
            spend_per_point: Money::from_minor(500, SGD),
            currency: SGD,
        }
    }

    #[test]
    fn sorted_lines_by_spend_quantity_and_name() {
        let receipt = receipt(
            vec![
                line("PEN01", "Gel Pen", 1, 210),
                line("ERS01", "Eraser", 5, 90),
                line("NBK01", "A5 Notebook", 2, 240),
            ],
            2000,
            8,
        );

        let codes = |sort| -> Vec<String> {
            receipt
                .sorted_lines(sort)
                .iter()
                .map(|line| line.code().to_string())
                .collect()
        };

        assert_eq!(codes(ReceiptSort::Cart), ["PEN01", "ERS01", "NBK01"]);
        assert_eq!(codes(ReceiptSort::Spend), ["NBK01", "ERS01", "PEN01"]);
        assert_eq!(codes(ReceiptSort::Quantity), ["ERS01", "NBK01", "PEN01"]);
        assert_eq!(codes(ReceiptSort::Name), ["NBK01", "ERS01", "PEN01"]);
    }

    #[test]
    fn total_savings_adds_bundle_and_discount() {
        let receipt = receipt(Vec::new(), 3000, 0);

        assert_eq!(receipt.total_savings(), Money::from_minor(350, SGD));
        assert!(receipt.discount().cap_reached());
    }

    #[test]
    fn reward_points_floor_spend() {
        assert_eq!(receipt(Vec::new(), 1499, 0).reward_points(), 2);
        assert_eq!(receipt(Vec::new(), 1500, 0).reward_points(), 3);
        assert_eq!(receipt(Vec::new(), 0, 0).reward_points(), 0);
    }

    #[test]
    fn units_to_next_bundle_when_one_short() {
        assert_eq!(receipt(Vec::new(), 0, 2).units_to_next_bundle(), Some(1));
        assert_eq!(receipt(Vec::new(), 0, 5).units_to_next_bundle(), Some(1));
        assert_eq!(receipt(Vec::new(), 0, 3).units_to_next_bundle(), None);
        assert_eq!(receipt(Vec::new(), 0, 4).units_to_next_bundle(), None);
        assert_eq!(receipt(Vec::new(), 0, 0).units_to_next_bundle(), None);
    }

    #[test]
    fn tax_rate_absent_when_not_applied() {
        let receipt = receipt(Vec::new(), 0, 0);

        assert!(receipt.tax().rate().is_none());
    }
}
