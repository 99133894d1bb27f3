//! Items

use rusty_money::{Money, iso::Currency};

use crate::pricing::TotalPriceError;

/// A named line in the cart: how many units were bought and what one unit costs.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    name: String,
    quantity: u32,
    unit_price: Money<'a, Currency>,
}

impl<'a> LineItem<'a> {
    /// Creates a new line item
    pub fn new(name: impl Into<String>, quantity: u32, unit_price: Money<'a, Currency>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns the item name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of units
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the price of a single unit
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Calculates `quantity × unit price` in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError::Overflow`] if the product does not fit in an `i64`.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        let minor = self
            .unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .ok_or(TotalPriceError::Overflow)?;

        Ok(Money::from_minor(minor, self.unit_price.currency()))
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn set_unit_price(&mut self, unit_price: Money<'a, Currency>) {
        self.unit_price = unit_price;
    }
}
