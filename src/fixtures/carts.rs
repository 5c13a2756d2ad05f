//! Cart Fixtures

use serde::Deserialize;

use crate::cart::Cart;

/// Cart file: requested quantities in cart order
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Cart lines
    pub items: Vec<CartLineFixture>,
}

/// One requested code and quantity
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Item code
    pub code: String,

    /// Quantity (non-negative integer)
    pub quantity: u32,
}

impl From<CartFixture> for Cart {
    fn from(fixture: CartFixture) -> Self {
        fixture
            .items
            .into_iter()
            .map(|line| (line.code, line.quantity))
            .collect()
    }
}
