//! Catalog Fixtures

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, SGD, USD},
};
use serde::Deserialize;

use crate::{
    catalog::Catalog,
    fixtures::FixtureError,
    products::Product,
    rules::{BundleRule, DiscountRule, PricingRules, RewardsRule, TaxRule},
};

/// Catalog file: currency, products in shelf order, optional rule overrides
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// ISO currency code (e.g., "SGD")
    pub currency: String,

    /// Products, in catalog order
    pub products: Vec<ProductFixture>,

    /// Rule overrides; missing sections keep the reference values
    #[serde(default)]
    pub rules: RulesFixture,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Item code
    pub code: String,

    /// Product name
    pub name: String,

    /// Product price (e.g., "2.10 SGD")
    pub price: String,
}

/// Rule overrides
#[derive(Debug, Default, Deserialize)]
pub struct RulesFixture {
    /// Bundle rule
    pub bundle: Option<BundleFixture>,

    /// Student discount rule
    pub discount: Option<DiscountFixture>,

    /// Tax rule
    pub tax: Option<TaxFixture>,

    /// Rewards rule
    pub rewards: Option<RewardsFixture>,
}

/// Bundle rule fixture
#[derive(Debug, Deserialize)]
pub struct BundleFixture {
    /// Units per bundle
    pub size: usize,

    /// Bundle price (e.g., "5.00 SGD")
    pub price: String,
}

/// Discount rule fixture
#[derive(Debug, Deserialize)]
pub struct DiscountFixture {
    /// Rate (e.g., "10%" or "0.10")
    pub rate: String,

    /// Cap (e.g., "2.00 SGD")
    pub cap: String,
}

/// Tax rule fixture
#[derive(Debug, Deserialize)]
pub struct TaxFixture {
    /// Rate (e.g., "9%" or "0.09")
    pub rate: String,
}

/// Rewards rule fixture
#[derive(Debug, Deserialize)]
pub struct RewardsFixture {
    /// Spend per point (e.g., "5.00 SGD")
    pub spend_per_point: String,
}

impl CatalogFixture {
    /// Build the catalog and the rule set described by this fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if a price, percentage or currency cannot be parsed,
    /// or if a product or rule is rejected.
    pub fn try_into_parts(self) -> Result<(Catalog<'static>, PricingRules<'static>), FixtureError> {
        let currency = parse_currency(&self.currency)?;
        let mut catalog = Catalog::new(currency);

        for product in self.products {
            let price = parse_money(&product.price)?;

            catalog.insert(Product::new(product.code, product.name, price))?;
        }

        let rules = self.rules.try_into_rules(currency)?;

        Ok((catalog, rules))
    }
}

impl RulesFixture {
    fn try_into_rules(
        self,
        currency: &'static Currency,
    ) -> Result<PricingRules<'static>, FixtureError> {
        let defaults = PricingRules::with_currency(currency);

        let bundle = match self.bundle {
            Some(bundle) => BundleRule::new(bundle.size, parse_money(&bundle.price)?)?,
            None => defaults.bundle(),
        };

        let discount = match self.discount {
            Some(discount) => DiscountRule::new(
                parse_percentage(&discount.rate)?,
                parse_money(&discount.cap)?,
            )?,
            None => defaults.discount(),
        };

        let tax = match self.tax {
            Some(tax) => TaxRule::new(parse_percentage(&tax.rate)?)?,
            None => defaults.tax(),
        };

        let rewards = match self.rewards {
            Some(rewards) => RewardsRule::new(parse_money(&rewards.spend_per_point)?)?,
            None => defaults.rewards(),
        };

        Ok(PricingRules::new(bundle, discount, tax, rewards)?)
    }
}

/// Parse an ISO currency code
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for codes other than GBP, USD, EUR and SGD.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        "SGD" => Ok(SGD),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse a price such as `"2.10 SGD"` into its exact amount and currency.
///
/// The amount is kept as written, so sub-cent prices like `"0.333 SGD"`
/// reach the pricing steps unrounded.
///
/// # Errors
///
/// - [`FixtureError::InvalidPrice`]: not exactly an amount and a currency code,
///   or the amount is not a decimal number.
/// - [`FixtureError::UnknownCurrency`]: the currency code is not supported.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let invalid = || FixtureError::InvalidPrice(s.to_string());

    let (amount, code) = s.trim().split_once(char::is_whitespace).ok_or_else(invalid)?;
    let code = code.trim_start();

    if code.contains(char::is_whitespace) {
        return Err(invalid());
    }

    let amount = amount.parse::<Decimal>().map_err(|_err| invalid())?;

    Ok((amount, parse_currency(code)?))
}

fn parse_money(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let (amount, currency) = parse_price(s)?;

    Ok(Money::from_decimal(amount, currency))
}

/// Parse percentage string (e.g., "9%" or "0.09") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "9%" for 9%
/// - Decimal format: "0.09" for 9%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a decimal.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let value = if let Some(percent_str) = trimmed.strip_suffix('%') {
        // "9%" -> 0.09
        percent_str
            .trim()
            .parse::<Decimal>()
            .ok()
            .and_then(|value| value.checked_div(Decimal::ONE_HUNDRED))
    } else {
        trimmed.parse::<Decimal>().ok()
    };

    value
        .map(Percentage::from)
        .ok_or_else(|| FixtureError::InvalidPercentage(s.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::rules::fraction;

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.10SGD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_trailing_tokens() {
        let result = parse_price("2.10 SGD extra");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_reads_amount_and_currency() -> Result<(), FixtureError> {
        let (pen, sgd) = parse_price("2.10 SGD")?;
        let (folder, eur) = parse_price("2.50   EUR")?;

        assert_eq!(pen, Decimal::new(210, 2));
        assert_eq!(sgd, SGD);
        assert_eq!(folder, Decimal::new(250, 2));
        assert_eq!(eur, EUR);

        Ok(())
    }

    #[test]
    fn parse_price_keeps_sub_cent_amounts_exact() -> Result<(), FixtureError> {
        assert_eq!(parse_price("2.105 SGD")?.0, Decimal::new(2105, 3));
        assert_eq!(parse_price("2.115 SGD")?.0, Decimal::new(2115, 3));
        assert_eq!(parse_price("0.333 SGD")?.0, Decimal::new(333, 3));

        Ok(())
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> Result<(), FixtureError> {
        assert_eq!(fraction(parse_percentage("9%")?), Decimal::new(9, 2));
        assert_eq!(fraction(parse_percentage(" 12.5 % ")?), Decimal::new(125, 3));
        assert_eq!(fraction(parse_percentage("0.10")?), Decimal::new(10, 2));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_garbage() {
        assert!(matches!(
            parse_percentage("ten percent"),
            Err(FixtureError::InvalidPercentage(_))
        ));
    }
}
