//! Fixtures
//!
//! YAML catalogs, rule overrides and sample carts. Files live under a base
//! directory (default `./fixtures`):
//!
//! - `catalogs/<name>.yml`: currency, products and optional rule overrides
//! - `carts/<name>.yml`: requested quantities

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::{Catalog, CatalogError},
    fixtures::{carts::CartFixture, catalog::CatalogFixture},
    pricing::{PricingEngine, PricingError},
    rules::{PricingRules, RulesError},
};

pub mod carts;
pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// No catalog loaded yet
    #[error("No catalog loaded yet")]
    NoCatalog,

    /// Catalog construction error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Rule validation error
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// Engine construction error
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    catalog: Option<Catalog<'a>>,
    rules: Option<PricingRules<'a>>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            rules: None,
        }
    }

    /// Load a catalog, and its rule overrides, from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// products or rules are invalid.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalogs").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        self.load_catalog_str(&contents)
    }

    /// Load a catalog from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, or if the products or rules are invalid.
    pub fn load_catalog_str(&mut self, contents: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;
        let (catalog, rules) = fixture.try_into_parts()?;

        self.catalog = Some(catalog);
        self.rules = Some(rules);

        Ok(self)
    }

    /// Load a cart from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cart(&self, name: &str) -> Result<Cart, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        Ok(fixture.into())
    }

    /// Load a catalog fixture set by name from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?;

        Ok(fixture)
    }

    /// Get the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded yet.
    pub fn catalog(&self) -> Result<&Catalog<'a>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoCatalog)
    }

    /// Get the rules loaded alongside the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded yet.
    pub fn rules(&self) -> Result<&PricingRules<'a>, FixtureError> {
        self.rules.as_ref().ok_or(FixtureError::NoCatalog)
    }

    /// Get the catalog currency
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        Ok(self.catalog()?.currency())
    }

    /// Build a pricing engine from the loaded catalog and rules
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded yet.
    pub fn engine(&self) -> Result<PricingEngine<'a>, FixtureError> {
        let catalog = self.catalog()?.clone();
        let rules = *self.rules()?;

        Ok(PricingEngine::new(catalog, rules)?)
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
