//! Receipt Example
//!
//! Prices a cart against a catalog fixture and prints the receipt.
//!
//! Use `-f` to load a catalog fixture by name
//! Use `-c` to start from a cart fixture
//! Use `-s` / `-g` to toggle the student discount and GST
//! Pass `CODE=QTY` pairs to set quantities, e.g. `NBK01=2 ERS01=1`
//! Use `--csv` to also export the receipt rows

use std::{fs::File, io};

use anyhow::Result;
use clap::Parser;
use tally::{cart::Cart, fixtures::Fixture, utils::ReceiptArgs};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Carts above this many units get a "split the receipt" hint.
const LARGE_CART_UNITS: u64 = 30;

/// Receipt Example
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = ReceiptArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let engine = fixture.engine()?;

    let mut cart = match args.cart.as_deref() {
        Some(name) => fixture.load_cart(name)?,
        None => Cart::new(),
    };

    for entry in args.items {
        cart.set(entry.code, entry.quantity);
    }

    let receipt = engine.compute(&cart, args.student, args.gst)?;

    if receipt.total_units() > LARGE_CART_UNITS {
        warn!(
            units = receipt.total_units(),
            "large cart, consider splitting into multiple receipts"
        );
    }

    receipt.write_to(io::stdout().lock(), args.sort)?;

    if let Some(path) = args.csv {
        receipt.write_csv(File::create(&path)?, args.sort)?;

        info!(path = %path.display(), "wrote receipt CSV");
    }

    Ok(())
}
