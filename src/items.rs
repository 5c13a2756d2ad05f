//! Items
//!
//! A [`Unit`] is one purchased instance of a product. Bundling works on a
//! flat list of units rather than on quantity lines.

use std::iter;

use rust_decimal::Decimal;

use crate::products::Product;

/// Most units a single cart may expand into.
pub const MAX_CART_UNITS: u64 = 100_000;

/// One purchased unit, borrowed from its catalog product.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Unit<'c> {
    code: &'c str,
    name: &'c str,
    price: Decimal,
}

impl<'c> Unit<'c> {
    /// Create a unit of the given product.
    pub fn of(product: &'c Product<'_>) -> Self {
        Self {
            code: &product.code,
            name: &product.name,
            price: product.unit_price(),
        }
    }

    /// Item code of the product.
    pub fn code(&self) -> &'c str {
        self.code
    }

    /// Product name.
    pub fn name(&self) -> &'c str {
        self.name
    }

    /// Exact unit price in major units.
    pub fn price(&self) -> Decimal {
        self.price
    }
}

/// Flatten `(product, quantity)` lines into one unit per purchased item.
///
/// Units appear in line order, so `[(pen, 2), (notebook, 1)]` becomes
/// `[pen, pen, notebook]`. One `Unit` is allocated per purchased item, so
/// callers bound the cart size first (see [`MAX_CART_UNITS`]).
pub fn expand_units<'c, 'a: 'c>(
    lines: impl IntoIterator<Item = (&'c Product<'a>, u32)>,
) -> Vec<Unit<'c>> {
    lines
        .into_iter()
        .flat_map(|(product, quantity)| {
            iter::repeat_n(Unit::of(product), quantity as usize)
        })
        .collect()
}
