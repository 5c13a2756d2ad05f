//! Bundles
//!
//! Greedy "any N for a flat price" grouping. Units are sorted by price,
//! most expensive first, and taken `size` at a time. A group is charged the
//! lower of its summed unit prices and the bundle price, and only counts as
//! an applied bundle when the bundle price is strictly cheaper.
//!
//! Sorting is stable: units with equal prices keep cart insertion order,
//! which decides which names fill a group when prices tie.
//!
//! Group sums are exact. The post-bundle subtotal and the savings are each
//! rounded to minor units once, after every group has been charged.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::{discounts::round_to_minor, items::Unit, pricing::PricingError, rules::BundleRule};

/// Names of the units that made up one applied bundle.
pub type BundleGroup = SmallVec<[String; 3]>;

/// Result of running the bundle promotion over a list of units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleOutcome {
    applied: usize,
    savings: i64,
    groups: Vec<BundleGroup>,
    bundled_units: FxHashMap<String, u32>,
    after_bundles: i64,
}

impl BundleOutcome {
    /// Number of groups charged at the bundle price.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Total saved versus unit prices, in minor units.
    pub fn savings(&self) -> i64 {
        self.savings
    }

    /// Product names of each applied bundle, in application order.
    pub fn groups(&self) -> &[BundleGroup] {
        &self.groups
    }

    /// Number of units of `code` that ended up in an applied bundle.
    pub fn bundled_units(&self, code: &str) -> u32 {
        self.bundled_units.get(code).copied().unwrap_or_default()
    }

    /// Amount charged for all units after bundling, in minor units.
    pub fn after_bundles(&self) -> i64 {
        self.after_bundles
    }
}

/// Group units into bundles and price them.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if a running total leaves the `Decimal`
/// or `i64` minor unit range.
pub fn apply_bundles(
    mut units: Vec<Unit<'_>>,
    rule: &BundleRule<'_>,
) -> Result<BundleOutcome, PricingError> {
    let bundle_price = *rule.price().amount();
    let mut outcome = BundleOutcome::default();
    let mut charged = Decimal::ZERO;
    let mut saved = Decimal::ZERO;

    units.sort_by(|a, b| b.price().cmp(&a.price()));

    let groups = units.chunks_exact(rule.size());
    let leftover = groups.remainder();

    for group in groups {
        let group_sum = sum_prices(group)?;

        charged = checked_add(charged, group_sum.min(bundle_price))?;

        if group_sum <= bundle_price {
            trace!(%group_sum, %bundle_price, "group cheaper than bundle, not applied");
            continue;
        }

        outcome.applied += 1;
        saved = checked_add(saved, group_sum - bundle_price)?;
        outcome
            .groups
            .push(group.iter().map(|unit| unit.name().to_string()).collect());

        for unit in group {
            *outcome
                .bundled_units
                .entry(unit.code().to_string())
                .or_default() += 1;
        }

        trace!(%group_sum, %bundle_price, "bundle applied");
    }

    charged = checked_add(charged, sum_prices(leftover)?)?;

    outcome.after_bundles = round_to_minor(charged).ok_or(PricingError::Overflow)?;
    outcome.savings = round_to_minor(saved).ok_or(PricingError::Overflow)?;

    Ok(outcome)
}

fn sum_prices(units: &[Unit<'_>]) -> Result<Decimal, PricingError> {
    units
        .iter()
        .try_fold(Decimal::ZERO, |acc, unit| checked_add(acc, unit.price()))
}

fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal, PricingError> {
    a.checked_add(b).ok_or(PricingError::Overflow)
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::SGD};
    use testresult::TestResult;

    use crate::{catalog::Catalog, items::expand_units, rules::PricingRules};

    use super::*;

    fn outcome_for(lines: &[(&str, u32)]) -> Result<BundleOutcome, PricingError> {
        let catalog = Catalog::campus();
        let rules = PricingRules::default();

        let products = lines
            .iter()
            .filter_map(|(code, qty)| catalog.get(code).map(|product| (product, *qty)));

        apply_bundles(expand_units(products), &rules.bundle())
    }

    #[test]
    fn three_dear_items_form_a_bundle() -> TestResult {
        let outcome = outcome_for(&[("NBK01", 1), ("PEN01", 1), ("HIL01", 1)])?;

        assert_eq!(outcome.applied(), 1);
        assert_eq!(outcome.savings(), 150);
        assert_eq!(outcome.after_bundles(), 500);

        let names: Vec<&str> = outcome
            .groups()
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();
        assert_eq!(names, ["A5 Notebook", "Gel Pen", "Highlighter"]);

        Ok(())
    }

    #[test]
    fn cheap_group_is_not_applied() -> TestResult {
        let outcome = outcome_for(&[("ERS01", 3)])?;

        assert_eq!(outcome.applied(), 0);
        assert_eq!(outcome.savings(), 0);
        assert!(outcome.groups().is_empty());
        assert_eq!(outcome.bundled_units("ERS01"), 0);
        assert_eq!(outcome.after_bundles(), 270);

        Ok(())
    }

    #[test]
    fn leftovers_pay_unit_price() -> TestResult {
        let outcome = outcome_for(&[("ERS01", 2)])?;

        assert_eq!(outcome.applied(), 0);
        assert_eq!(outcome.after_bundles(), 180);

        Ok(())
    }

    #[test]
    fn most_expensive_units_are_grouped_first() -> TestResult {
        // 4 notebooks + 2 erasers: [240, 240, 240] bundles, [240, 90, 90] = 420 < 500.
        let outcome = outcome_for(&[("ERS01", 2), ("NBK01", 4)])?;

        assert_eq!(outcome.applied(), 1);
        assert_eq!(outcome.savings(), 220);
        assert_eq!(outcome.bundled_units("NBK01"), 3);
        assert_eq!(outcome.bundled_units("ERS01"), 0);
        assert_eq!(outcome.after_bundles(), 500 + 420);

        Ok(())
    }

    #[test]
    fn equal_prices_keep_cart_order() -> TestResult {
        let mut catalog = Catalog::new(SGD);
        for code in ["A", "B", "C", "D"] {
            catalog.insert(crate::products::Product::new(
                code,
                code,
                Money::from_minor(200, SGD),
            ))?;
        }
        let rules = PricingRules::default();

        let products = ["D", "B", "A", "C"]
            .into_iter()
            .filter_map(|code| catalog.get(code).map(|product| (product, 1)));
        let outcome = apply_bundles(expand_units(products), &rules.bundle())?;

        let names: Vec<&str> = outcome
            .groups()
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();
        assert_eq!(names, ["D", "B", "A"]);
        assert_eq!(outcome.after_bundles(), 700);

        Ok(())
    }

    #[test]
    fn sub_cent_prices_round_once_after_grouping() -> TestResult {
        let mut catalog = Catalog::new(SGD);
        catalog.insert(crate::products::Product::new(
            "CLP01",
            "Paper Clip",
            Money::from_decimal(Decimal::new(1_675, 3), SGD),
        ))?;
        let rules = PricingRules::default();

        // [1.675 x 3] = 5.025 > 5.00 bundles, saving 0.025; leftover 1.675.
        let products = catalog.get("CLP01").map(|product| (product, 4));
        let outcome = apply_bundles(expand_units(products), &rules.bundle())?;

        assert_eq!(outcome.applied(), 1);
        assert_eq!(outcome.savings(), 3);
        // 5.00 + 1.675 = 6.675
        assert_eq!(outcome.after_bundles(), 668);

        Ok(())
    }

    #[test]
    fn empty_units_cost_nothing() -> TestResult {
        let outcome = apply_bundles(Vec::new(), &PricingRules::default().bundle())?;

        assert_eq!(outcome, BundleOutcome::default());

        Ok(())
    }
}
