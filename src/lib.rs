//! Tally
//!
//! Tally prices a retail cart under an "any N for a flat price" bundle
//! promotion, an optional capped student discount and an optional flat
//! sales tax, and returns a fully itemised [`receipt::Receipt`].
//!
//! ```
//! use tally::prelude::*;
//!
//! let engine = PricingEngine::campus();
//! let cart: Cart = [("NBK01", 1), ("PEN01", 1), ("HIL01", 1)].into_iter().collect();
//!
//! let receipt = engine.compute(&cart, false, false)?;
//!
//! assert_eq!(receipt.bundles().applied(), 1);
//! assert_eq!(receipt.after_bundles().to_minor_units(), 500);
//! # Ok::<(), PricingError>(())
//! ```

pub mod bundles;
pub mod cart;
pub mod catalog;
pub mod discounts;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod rules;
pub mod utils;
