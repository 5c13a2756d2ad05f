//! Catalog
//!
//! The universe of valid item codes for a pricing computation. A catalog is
//! single-currency and keeps products in the order they were added.

use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, SGD},
};
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Product, ProductKey};

/// Reference stationery shelf: code, name, unit price in cents.
const CAMPUS_PRODUCTS: [(&str, &str, i64); 5] = [
    ("PEN01", "Gel Pen", 210),
    ("HIL01", "Highlighter", 200),
    ("NBK01", "A5 Notebook", 240),
    ("STK01", "Sticky Notes", 160),
    ("ERS01", "Eraser", 90),
];

/// Errors raised while building a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// The item code is already present.
    #[error("duplicate item code: {0}")]
    DuplicateCode(String),

    /// A product is priced in a different currency than the catalog (code, product currency, catalog currency).
    #[error("product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// Unit prices cannot be negative.
    #[error("product {0} has a negative price")]
    NegativePrice(String),
}

/// Catalog of products keyed by item code.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    codes: FxHashMap<String, ProductKey>,
    order: Vec<ProductKey>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            codes: FxHashMap::default(),
            order: Vec::new(),
            currency,
        }
    }

    /// The reference campus stationery catalog (SGD).
    pub fn campus() -> Self {
        let mut catalog = Self::new(SGD);

        for (code, name, cents) in CAMPUS_PRODUCTS {
            catalog.push(Product::new(code, name, Money::from_minor(cents, SGD)));
        }

        catalog
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateCode`]: the code is already in the catalog.
    /// - [`CatalogError::CurrencyMismatch`]: the price is not in the catalog currency.
    /// - [`CatalogError::NegativePrice`]: the price is below zero.
    pub fn insert(&mut self, product: Product<'a>) -> Result<ProductKey, CatalogError> {
        if self.codes.contains_key(&product.code) {
            return Err(CatalogError::DuplicateCode(product.code));
        }

        let product_currency = product.price.currency();
        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.code,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if product.price.is_negative() {
            return Err(CatalogError::NegativePrice(product.code));
        }

        Ok(self.push(product))
    }

    fn push(&mut self, product: Product<'a>) -> ProductKey {
        let code = product.code.clone();
        let key = self.products.insert(product);

        self.codes.insert(code, key);
        self.order.push(key);

        key
    }

    /// Look up a product by item code.
    pub fn get(&self, code: &str) -> Option<&Product<'a>> {
        self.codes
            .get(code)
            .and_then(|key| self.products.get(*key))
    }

    /// Check whether an item code is known.
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains_key(code)
    }

    /// Iterate products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Currency every product is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn campus_catalog_lists_products_in_shelf_order() {
        let catalog = Catalog::campus();
        let codes: Vec<&str> = catalog.iter().map(|p| p.code.as_str()).collect();

        assert_eq!(codes, ["PEN01", "HIL01", "NBK01", "STK01", "ERS01"]);
        assert_eq!(catalog.currency(), SGD);
    }

    #[test]
    fn get_returns_named_product() {
        let catalog = Catalog::campus();
        let notebook = catalog.get("NBK01");

        assert_eq!(notebook.map(|p| p.name.as_str()), Some("A5 Notebook"));
        assert_eq!(notebook.map(Product::unit_price), Some(Decimal::new(240, 2)));
        assert!(catalog.get("XXX99").is_none());
    }

    #[test]
    fn insert_rejects_duplicate_codes() -> TestResult {
        let mut catalog = Catalog::new(SGD);
        catalog.insert(Product::new("A", "Thing", Money::from_minor(100, SGD)))?;

        let result = catalog.insert(Product::new("A", "Other", Money::from_minor(50, SGD)));

        assert_eq!(result, Err(CatalogError::DuplicateCode("A".to_string())));
        assert_eq!(catalog.len(), 1);

        Ok(())
    }

    #[test]
    fn insert_rejects_foreign_currency() {
        let mut catalog = Catalog::new(SGD);

        let result = catalog.insert(Product::new("A", "Thing", Money::from_minor(100, USD)));

        assert_eq!(
            result,
            Err(CatalogError::CurrencyMismatch(
                "A".to_string(),
                USD.iso_alpha_code,
                SGD.iso_alpha_code
            ))
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn insert_rejects_negative_price() {
        let mut catalog = Catalog::new(SGD);

        let result = catalog.insert(Product::new("A", "Thing", Money::from_minor(-1, SGD)));

        assert_eq!(result, Err(CatalogError::NegativePrice("A".to_string())));
    }
}
