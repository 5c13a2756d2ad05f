//! Cart
//!
//! Requested quantities per item code, in the order codes were first added.
//! Quantities are unsigned, so a cart can never hold a negative or
//! fractional amount. Entries set to zero stay in the cart but are skipped
//! by pricing.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Errors parsing a `CODE=QTY` cart entry.
#[derive(Debug, Error, PartialEq)]
pub enum CartEntryError {
    /// The entry is not of the form `CODE=QTY`.
    #[error("expected CODE=QTY, got: {0}")]
    InvalidFormat(String),

    /// The quantity is not a non-negative integer.
    #[error("invalid quantity for {0}: {1}")]
    InvalidQuantity(String, String),
}

/// One requested item code and quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    /// Item code
    pub code: String,

    /// Requested quantity
    pub quantity: u32,
}

impl FromStr for CartEntry {
    type Err = CartEntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((code, quantity)) = s.split_once('=') else {
            return Err(CartEntryError::InvalidFormat(s.to_string()));
        };

        let code = code.trim();
        if code.is_empty() {
            return Err(CartEntryError::InvalidFormat(s.to_string()));
        }

        let quantity = quantity.trim().parse::<u32>().map_err(|_err| {
            CartEntryError::InvalidQuantity(code.to_string(), quantity.to_string())
        })?;

        Ok(Self {
            code: code.to_string(),
            quantity,
        })
    }
}

impl fmt::Display for CartEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.code, self.quantity)
    }
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quantity for a code, replacing any previous quantity.
    pub fn set(&mut self, code: impl Into<String>, quantity: u32) -> &mut Self {
        let code = code.into();

        match self.entries.iter_mut().find(|entry| entry.code == code) {
            Some(entry) => entry.quantity = quantity,
            None => self.entries.push(CartEntry { code, quantity }),
        }

        self
    }

    /// Add to the quantity for a code.
    ///
    /// Saturates at `u32::MAX`.
    pub fn add(&mut self, code: impl Into<String>, quantity: u32) -> &mut Self {
        let code = code.into();
        let current = self.quantity(&code);

        self.set(code, current.saturating_add(quantity))
    }

    /// Remove a code from the cart, returning its previous quantity.
    pub fn remove(&mut self, code: &str) -> Option<u32> {
        let idx = self.entries.iter().position(|entry| entry.code == code)?;

        Some(self.entries.remove(idx).quantity)
    }

    /// Requested quantity for a code (zero if absent).
    pub fn quantity(&self, code: &str) -> u32 {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .map_or(0, |entry| entry.quantity)
    }

    /// Set every quantity back to zero.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.quantity = 0;
        }
    }

    /// Iterate entries with a positive quantity, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.iter().filter(|entry| entry.quantity > 0)
    }

    /// Total number of units requested.
    pub fn total_units(&self) -> u64 {
        self.iter().map(|entry| u64::from(entry.quantity)).sum()
    }

    /// Check whether no positive quantities are present.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for Cart {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut cart = Cart::new();

        for (code, quantity) in iter {
            cart.set(code, quantity);
        }

        cart
    }
}

impl FromIterator<CartEntry> for Cart {
    fn from_iter<I: IntoIterator<Item = CartEntry>>(iter: I) -> Self {
        iter.into_iter()
            .map(|entry| (entry.code, entry.quantity))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn set_replaces_and_preserves_first_position() {
        let mut cart = Cart::new();
        cart.set("PEN01", 1).set("NBK01", 2).set("PEN01", 4);

        let entries: Vec<String> = cart.iter().map(ToString::to_string).collect();

        assert_eq!(entries, ["PEN01=4", "NBK01=2"]);
    }

    #[test]
    fn add_accumulates() {
        let mut cart = Cart::new();
        cart.add("ERS01", 2).add("ERS01", 3);

        assert_eq!(cart.quantity("ERS01"), 5);
    }

    #[test]
    fn zero_quantities_are_skipped() {
        let cart: Cart = [("PEN01", 0), ("HIL01", 2)].into_iter().collect();

        assert_eq!(cart.iter().count(), 1);
        assert_eq!(cart.total_units(), 2);
        assert_eq!(cart.quantity("PEN01"), 0);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut cart: Cart = [("PEN01", 3), ("HIL01", 2)].into_iter().collect();
        cart.reset();

        assert!(cart.is_empty());
        assert_eq!(cart.total_units(), 0);
    }

    #[test]
    fn remove_returns_previous_quantity() {
        let mut cart: Cart = [("PEN01", 3)].into_iter().collect();

        assert_eq!(cart.remove("PEN01"), Some(3));
        assert_eq!(cart.remove("PEN01"), None);
    }

    #[test]
    fn from_iter_last_write_wins() {
        let cart: Cart = [("PEN01", 3), ("PEN01", 1)].into_iter().collect();

        assert_eq!(cart.quantity("PEN01"), 1);
    }

    #[test]
    fn parse_entry() -> TestResult {
        let entry: CartEntry = "NBK01=2".parse()?;

        assert_eq!(entry.code, "NBK01");
        assert_eq!(entry.quantity, 2);

        Ok(())
    }

    #[test]
    fn parse_entry_rejects_negative_quantity() {
        let result = "NBK01=-1".parse::<CartEntry>();

        assert_eq!(
            result,
            Err(CartEntryError::InvalidQuantity(
                "NBK01".to_string(),
                "-1".to_string()
            ))
        );
    }

    #[test]
    fn parse_entry_rejects_missing_separator() {
        assert!(matches!(
            "NBK01".parse::<CartEntry>(),
            Err(CartEntryError::InvalidFormat(_))
        ));
        assert!(matches!(
            "=2".parse::<CartEntry>(),
            Err(CartEntryError::InvalidFormat(_))
        ));
    }
}
