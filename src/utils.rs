//! Utils

use std::path::PathBuf;

use clap::Parser;

use crate::{cart::CartEntry, receipt::ReceiptSort};

/// Arguments for the receipt demo
#[derive(Debug, Parser)]
pub struct ReceiptArgs {
    /// Catalog fixture to price against
    #[clap(short, long, default_value = "campus")]
    pub fixture: String,

    /// Cart fixture to start from
    #[clap(short, long)]
    pub cart: Option<String>,

    /// Apply the student discount
    #[clap(short, long)]
    pub student: bool,

    /// Apply GST
    #[clap(short, long)]
    pub gst: bool,

    /// Row order for the receipt table
    #[clap(long, value_enum, default_value_t = ReceiptSort::Spend)]
    pub sort: ReceiptSort,

    /// Also write the receipt rows to this CSV file
    #[clap(long)]
    pub csv: Option<PathBuf>,

    /// Quantities as CODE=QTY, applied on top of the cart fixture
    pub items: Vec<CartEntry>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_flags_and_items() -> TestResult {
        let args = ReceiptArgs::try_parse_from([
            "receipt", "-s", "--gst", "--sort", "name", "NBK01=2", "ERS01=1",
        ])?;

        assert!(args.student);
        assert!(args.gst);
        assert_eq!(args.sort, ReceiptSort::Name);
        assert_eq!(args.fixture, "campus");
        assert_eq!(args.items.len(), 2);

        Ok(())
    }

    #[test]
    fn rejects_negative_quantities() {
        let result = ReceiptArgs::try_parse_from(["receipt", "ERS01=-1"]);

        assert!(result.is_err());
    }
}
