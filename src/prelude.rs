//! Tally prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bundles::{BundleGroup, BundleOutcome, apply_bundles},
    cart::{Cart, CartEntry, CartEntryError},
    catalog::{Catalog, CatalogError},
    discounts::{DiscountError, percent_of_minor, round_to_minor},
    fixtures::{Fixture, FixtureError},
    items::{MAX_CART_UNITS, Unit, expand_units},
    pricing::{PricingEngine, PricingError},
    products::{Product, ProductKey},
    receipt::{
        BundleSummary, DiscountSummary, LineItem, Receipt, ReceiptError, ReceiptSort, TaxSummary,
    },
    rules::{BundleRule, DiscountRule, PricingRules, RewardsRule, RulesError, TaxRule},
};
