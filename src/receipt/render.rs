//! Terminal and CSV rendering for receipts.

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

use super::{LineItem, Receipt, ReceiptError, ReceiptSort};

const HEADER: [&str; 5] = ["Item", "Qty", "Unit", "Line", "Bundled"];

impl Receipt<'_> {
    /// Writes the receipt table and summary.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write, sort: ReceiptSort) -> Result<(), ReceiptError> {
        if self.lines.is_empty() {
            writeln!(
                out,
                "\nCart is empty. Add any {} items for {}.\n",
                self.bundles.size, self.bundles.price
            )
            .map_err(|_err| ReceiptError::IO)?;

            return Ok(());
        }

        let mut builder = Builder::default();
        builder.push_record(HEADER);

        for line in self.sorted_lines(sort) {
            builder.push_record(row(line));
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..5), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        write_receipt_summary(&mut out, self)?;
        write_receipt_notes(&mut out, self)
    }

    /// Writes the receipt rows as CSV with an `Item,Qty,Unit,Line,Bundled` header.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Csv`] if a record cannot be written.
    pub fn write_csv(&self, out: impl io::Write, sort: ReceiptSort) -> Result<(), ReceiptError> {
        let mut writer = csv::Writer::from_writer(out);

        writer.write_record(HEADER)?;

        for line in self.sorted_lines(sort) {
            writer.write_record(row(line))?;
        }

        writer.flush().map_err(|_err| ReceiptError::IO)
    }
}

fn row(line: &LineItem<'_>) -> [String; 5] {
    [
        line.name.clone(),
        line.quantity.to_string(),
        line.unit_price.to_string(),
        line.subtotal.to_string(),
        line.bundled_units.to_string(),
    ]
}

/// One label/value pair in the summary block under the table.
struct SummaryRow {
    label: String,
    value: String,
    bold: bool,
}

impl SummaryRow {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            bold: false,
        }
    }

    fn bold(self) -> Self {
        Self { bold: true, ..self }
    }
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    receipt: &Receipt<'_>,
) -> Result<(), ReceiptError> {
    let bundles = &receipt.bundles;
    let discount = &receipt.discount;

    let mut rows = vec![
        SummaryRow::new("Pre-subtotal:", receipt.pre_subtotal.to_string()),
        SummaryRow::new(
            format!("Bundles ({} for {}):", bundles.size, bundles.price),
            format!("{} applied, -{}", bundles.applied, bundles.savings),
        ),
        SummaryRow::new("After bundles:", receipt.after_bundles.to_string()),
    ];

    if discount.applied {
        rows.push(SummaryRow::new(
            format!(
                "Student discount ({}% up to {}):",
                percent_points(discount.rate),
                discount.cap
            ),
            format!("-{}", discount.amount),
        ));
    }

    if let Some(rate) = receipt.tax.rate {
        rows.push(SummaryRow::new(
            format!("GST ({}%):", percent_points(rate)),
            receipt.tax.amount.to_string(),
        ));
    }

    rows.push(SummaryRow::new("Grand total:", receipt.grand_total.to_string()).bold());
    rows.push(SummaryRow::new("You saved:", receipt.total_savings().to_string()));

    let label_width = column_width(rows.iter().map(|row| row.label.as_str()));
    let value_width = column_width(rows.iter().map(|row| row.value.as_str()));

    for row in &rows {
        write_summary_row(out, row, label_width, value_width)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

fn write_receipt_notes(out: &mut impl io::Write, receipt: &Receipt<'_>) -> Result<(), ReceiptError> {
    if receipt.discount.cap_reached() {
        writeln!(out, " Cap hit: max {} reached.", receipt.discount.cap)
            .map_err(|_err| ReceiptError::IO)?;
    }

    if receipt.bundles.applied > 0 {
        let groups = receipt
            .bundles
            .groups
            .iter()
            .map(|group| group.join(" + "))
            .collect::<Vec<_>>()
            .join("; ");

        writeln!(out, " Bundle groups: {groups}").map_err(|_err| ReceiptError::IO)?;
    }

    if let Some(missing) = receipt.units_to_next_bundle() {
        writeln!(
            out,
            " Add {missing} more to get the {} bundle.",
            receipt.bundles.price
        )
        .map_err(|_err| ReceiptError::IO)?;
    }

    let points = receipt.reward_points();
    let noun = if points == 1 { "point" } else { "points" };

    writeln!(out, " Rewards: {points} {noun} earned this purchase.\n")
        .map_err(|_err| ReceiptError::IO)
}

/// Converts a fractional rate to percent points for display (0.09 -> 9).
fn percent_points(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}

/// Widest entry in a summary column, in characters.
fn column_width<'s>(cells: impl Iterator<Item = &'s str>) -> usize {
    cells.map(|cell| cell.chars().count()).max().unwrap_or_default()
}

/// Right-aligns the label and the value in their columns. Bold rows are
/// wrapped in ANSI escapes after padding, so escapes never count as width.
fn write_summary_row(
    out: &mut impl io::Write,
    row: &SummaryRow,
    label_width: usize,
    value_width: usize,
) -> Result<(), ReceiptError> {
    let line = format!(
        "{:>label_width$}  {:>value_width$}",
        row.label, row.value
    );

    let written = if row.bold {
        writeln!(out, " \x1b[1m{line}\x1b[0m")
    } else {
        writeln!(out, " {line}")
    };

    written.map_err(|_err| ReceiptError::IO)
}
