//! Products

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// A catalog entry: a named product sold at a fixed unit price.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Item code, unique within a catalog (e.g. `PEN01`)
    pub code: String,

    /// Product name
    pub name: String,

    /// Unit price
    pub price: Money<'a, Currency>,
}

impl<'a> Product<'a> {
    /// Create a new product.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            price,
        }
    }

    /// Exact unit price in major units. May carry more than two decimal places.
    pub fn unit_price(&self) -> Decimal {
        *self.price.amount()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::SGD;

    use super::*;

    #[test]
    fn unit_price_keeps_sub_cent_precision() {
        let pen = Product::new("PEN01", "Gel Pen", Money::from_minor(210, SGD));
        let clip_price = Money::from_decimal(Decimal::new(333, 3), SGD);
        let clip = Product::new("CLP01", "Paper Clip", clip_price);

        assert_eq!(pen.unit_price(), Decimal::new(210, 2));
        assert_eq!(clip.unit_price(), Decimal::new(333, 3));
        assert_eq!(pen.code, "PEN01");
    }
}
