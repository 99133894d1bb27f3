//! Order
//!
//! Structured results of the cart's two reporting operations, and their console rendering.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::discounts::percent_points;

/// Errors that can occur when rendering an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One row of the order table.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow<'a> {
    number: usize,
    name: String,
    quantity: u32,
    unit_price: Money<'a, Currency>,
    line_total: Money<'a, Currency>,
}

impl<'a> OrderRow<'a> {
    /// Create a new row.
    pub fn new(
        number: usize,
        name: String,
        quantity: u32,
        unit_price: Money<'a, Currency>,
        line_total: Money<'a, Currency>,
    ) -> Self {
        Self {
            number,
            name,
            quantity,
            unit_price,
            line_total,
        }
    }

    /// 1-based row number
    pub fn number(&self) -> usize {
        self.number
    }

    /// Item name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of units
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of one unit
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// `quantity × unit price`
    pub fn line_total(&self) -> &Money<'a, Currency> {
        &self.line_total
    }
}

/// A validated order, ready to be shown.
#[derive(Debug, Clone)]
pub struct OrderSummary<'a> {
    owner_name: String,
    rows: SmallVec<[OrderRow<'a>; 10]>,
}

impl<'a> OrderSummary<'a> {
    /// Create a new summary.
    pub fn new(owner_name: String, rows: SmallVec<[OrderRow<'a>; 10]>) -> Self {
        Self { owner_name, rows }
    }

    /// Name of the cart's owner
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    /// Rows in display order
    pub fn rows(&self) -> &[OrderRow<'a>] {
        &self.rows
    }

    /// Writes the order table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), OrderError> {
        let mut builder = Builder::default();

        builder.push_record(["No", "Item", "Quantity", "Unit Price", "Line Total"]);

        for row in &self.rows {
            builder.push_record([
                row.number.to_string(),
                row.name.clone(),
                row.quantity.to_string(),
                format!("{}", row.unit_price),
                format!("{}", row.line_total),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::markdown());
        table.modify(Columns::new(0..5), Alignment::left());
        table.modify(Rows::first(), Color::BOLD);

        writeln!(out, "\nOrder for {}\n\n{table}", self.owner_name)?;

        Ok(())
    }
}

/// The amount to pay for a cart.
#[derive(Debug, Clone, Copy)]
pub struct Checkout<'a> {
    grand_total: Money<'a, Currency>,
    discount: Option<Percentage>,
    discount_amount: Money<'a, Currency>,
    payable: Money<'a, Currency>,
}

impl<'a> Checkout<'a> {
    /// Create a new checkout.
    pub fn new(
        grand_total: Money<'a, Currency>,
        discount: Option<Percentage>,
        discount_amount: Money<'a, Currency>,
        payable: Money<'a, Currency>,
    ) -> Self {
        Self {
            grand_total,
            discount,
            discount_amount,
            payable,
        }
    }

    /// Sum of all line totals before discount
    pub fn grand_total(&self) -> &Money<'a, Currency> {
        &self.grand_total
    }

    /// Discount percentage of the bracket reached, if any
    pub fn discount(&self) -> Option<Percentage> {
        self.discount
    }

    /// Discount in percent points (e.g. `5` for 5%), if any
    pub fn discount_percent_points(&self) -> Option<Decimal> {
        self.discount.map(percent_points)
    }

    /// Amount taken off the grand total
    pub fn discount_amount(&self) -> &Money<'a, Currency> {
        &self.discount_amount
    }

    /// Amount to pay after the discount
    pub fn payable(&self) -> &Money<'a, Currency> {
        &self.payable
    }

    /// Writes the discount message, if any, and the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the summary cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), OrderError> {
        writeln!(out)?;

        if let Some(points) = self.discount_percent_points() {
            writeln!(
                out,
                "Congratulations! You get a {}% discount.\n",
                points.normalize()
            )?;
        }

        let lines = [
            ("Grand total:", format!("{}", self.grand_total)),
            ("Discount:", format!("-{}", self.discount_amount)),
            ("Total:", format!("{}", self.payable)),
        ];

        let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = lines.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in lines {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::IDR;
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    fn rp(major: i64) -> Money<'static, Currency> {
        Money::from_major(major, IDR)
    }

    #[test]
    fn write_to_renders_header_and_rows() -> TestResult {
        let summary = OrderSummary::new(
            "Andi".to_string(),
            smallvec![
                OrderRow::new(1, "Ayam Goreng".to_string(), 2, rp(20_000), rp(40_000)),
                OrderRow::new(2, "Pasta Gigi".to_string(), 3, rp(15_000), rp(45_000)),
            ],
        );

        let mut out = Vec::new();
        summary.write_to(&mut out)?;

        let output = String::from_utf8(out)?;
        assert!(output.contains("Andi"), "{output}");
        assert!(output.contains("Unit Price"), "{output}");
        assert!(output.contains("Line Total"), "{output}");
        assert!(output.contains("Ayam Goreng"), "{output}");
        assert!(output.contains("Pasta Gigi"), "{output}");

        let ayam = output.find("Ayam Goreng").ok_or("missing row")?;
        let pasta = output.find("Pasta Gigi").ok_or("missing row")?;
        assert!(ayam < pasta, "rows should keep cart order");

        Ok(())
    }

    #[test]
    fn write_to_without_discount_omits_message() -> TestResult {
        let checkout = Checkout::new(rp(85_000), None, Money::from_minor(0, IDR), rp(85_000));

        let mut out = Vec::new();
        checkout.write_to(&mut out)?;

        let output = String::from_utf8(out)?;
        assert!(!output.contains("Congratulations"), "{output}");
        assert!(output.contains("Total:"), "{output}");

        Ok(())
    }

    #[test]
    fn write_to_with_discount_shows_percent() -> TestResult {
        let checkout = Checkout::new(
            rp(250_000),
            Some(Percentage::from(Decimal::new(5, 2))),
            rp(12_500),
            rp(237_500),
        );

        let mut out = Vec::new();
        checkout.write_to(&mut out)?;

        let output = String::from_utf8(out)?;
        assert!(output.contains("5% discount"), "{output}");
        assert!(output.contains("Grand total:"), "{output}");

        Ok(())
    }

    #[test]
    fn discount_percent_points() {
        let checkout = Checkout::new(
            rp(400_000),
            Some(Percentage::from(Decimal::new(8, 2))),
            rp(32_000),
            rp(368_000),
        );

        assert_eq!(checkout.discount_percent_points(), Some(Decimal::new(8, 0)));
    }
}
