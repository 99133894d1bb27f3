//! Cart
//!
//! A single shopping transaction: an owner and the line items they are buying. Items are keyed
//! by name; adding a name that already exists replaces its quantity and price. Every mutator
//! logs a confirmation through `tracing`, and the two reporting operations return structured
//! results that the caller can render.

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::{
    discounts::{DiscountError, DiscountSchedule, discount_on},
    entries::{EntryError, Field, OrderDataError, RawEntry},
    items::LineItem,
    order::{Checkout, OrderRow, OrderSummary},
    pricing::{TotalPriceError, total_price},
};

/// Errors raised by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// An entry was not a `(name, quantity, price)` triple (entry index, number of values).
    #[error("entry {index} must be a (name, quantity, price) triple, got {len} values")]
    MalformedEntry {
        /// Position of the entry in the call
        index: usize,
        /// Number of values the entry held
        len: usize,
    },

    /// No item with this name is in the cart.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// The order holds an empty or mistyped value.
    #[error("invalid order data: {0}")]
    InvalidOrderData(#[from] OrderDataError),

    /// Error calculating the grand total.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Error selecting or applying the discount.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    owner_name: String,
    currency: &'a Currency,
    items: Vec<LineItem<'a>>,
    discounts: DiscountSchedule<'a>,
}

impl Cart<'static> {
    /// Create an empty cart in Indonesian Rupiah with the standard discount schedule.
    pub fn new(owner_name: impl Into<String>) -> Self {
        Cart::with_currency(owner_name, iso::IDR)
    }
}

impl<'a> Cart<'a> {
    /// Create an empty cart in the given currency with the standard discount schedule.
    pub fn with_currency(owner_name: impl Into<String>, currency: &'a Currency) -> Self {
        Cart {
            owner_name: owner_name.into(),
            currency,
            items: Vec::new(),
            discounts: DiscountSchedule::standard(currency),
        }
    }

    /// Replace the discount schedule.
    #[must_use]
    pub fn with_discounts(mut self, discounts: DiscountSchedule<'a>) -> Self {
        self.discounts = discounts;
        self
    }

    /// Name of the cart's owner.
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    /// Currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Discount schedule used by [`Cart::compute_total`].
    pub fn discounts(&self) -> &DiscountSchedule<'a> {
        &self.discounts
    }

    /// Get the number of items in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the items in display order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.items.iter()
    }

    /// Look up an item by name.
    pub fn item(&self, name: &str) -> Option<&LineItem<'a>> {
        self.items.iter().find(|item| item.name() == name)
    }

    /// Add one or more `(name, quantity, unit price)` triples.
    ///
    /// An item whose name is already in the cart has its quantity and price replaced.
    pub fn add_items<N>(
        &mut self,
        entries: impl IntoIterator<Item = (N, u32, Money<'a, Currency>)>,
    ) where
        N: Into<String>,
    {
        for (name, quantity, unit_price) in entries {
            self.upsert(LineItem::new(name, quantity, unit_price));
        }

        info!(owner = %self.owner_name, items = %self.listing(), "items added to cart");
    }

    /// Add loosely typed entries, priced in whole units of the cart currency.
    ///
    /// Every entry is checked before any is stored, so a failed call leaves the cart untouched.
    ///
    /// # Errors
    ///
    /// - [`CartError::MalformedEntry`]: an entry is not a triple.
    /// - [`CartError::InvalidOrderData`]: a cell of an entry is empty or mistyped.
    pub fn add_entries<'e>(
        &mut self,
        entries: impl IntoIterator<Item = &'e RawEntry>,
    ) -> Result<(), CartError> {
        let items = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                entry.decode(self.currency).map_err(|err| match err {
                    EntryError::Malformed(len) => CartError::MalformedEntry { index, len },
                    EntryError::InvalidData(data) => CartError::InvalidOrderData(data),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for item in items {
            self.upsert(item);
        }

        info!(owner = %self.owner_name, items = %self.listing(), "items added to cart");

        Ok(())
    }

    /// Check that an item is in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there is no item with this name.
    pub fn validate_item_exists(&self, name: &str) -> Result<(), CartError> {
        self.position(name).map(|_| ())
    }

    /// Move an item to a new name, replacing any item already using that name.
    ///
    /// The renamed item takes the row of the item it replaces, or moves to the end of the order
    /// when the new name is not in the cart yet.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if `old_name` is not in the cart.
    pub fn rename_item(&mut self, old_name: &str, new_name: &str) -> Result<(), CartError> {
        let index = self.position(old_name)?;
        let mut item = self.items.remove(index);

        item.rename(new_name.to_string());
        self.upsert(item);

        info!(owner = %self.owner_name, from = old_name, to = new_name, "item renamed");

        Ok(())
    }

    /// Replace the quantity of an item.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there is no item with this name.
    pub fn update_quantity(&mut self, name: &str, quantity: u32) -> Result<(), CartError> {
        self.item_mut(name)?.set_quantity(quantity);

        info!(owner = %self.owner_name, item = name, quantity, "item quantity updated");

        Ok(())
    }

    /// Replace the unit price of an item.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there is no item with this name.
    pub fn update_price(
        &mut self,
        name: &str,
        unit_price: Money<'a, Currency>,
    ) -> Result<(), CartError> {
        self.item_mut(name)?.set_unit_price(unit_price);

        info!(owner = %self.owner_name, item = name, %unit_price, "item price updated");

        Ok(())
    }

    /// Remove an item.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there is no item with this name.
    pub fn delete_item(&mut self, name: &str) -> Result<(), CartError> {
        let index = self.position(name)?;

        self.items.remove(index);

        info!(owner = %self.owner_name, item = name, "item removed from cart");

        Ok(())
    }

    /// Remove every item.
    pub fn reset(&mut self) {
        self.items.clear();

        info!(owner = %self.owner_name, "all items removed from cart");
    }

    /// Validate every item and build the rows of the order table.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidOrderData`]: the first item with a blank name
    ///   ([`OrderDataError::MissingValue`]) or a price that is not a non-negative amount in the
    ///   cart currency ([`OrderDataError::WrongType`]).
    /// - [`CartError::TotalPrice`]: a line total overflowed.
    pub fn render_order(&self) -> Result<OrderSummary<'a>, CartError> {
        for item in &self.items {
            if let Err(err) = self.check_item(item) {
                error!(owner = %self.owner_name, error = %err, "invalid order data");

                return Err(err.into());
            }
        }

        let rows: SmallVec<[OrderRow<'a>; 10]> = self
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| -> Result<_, TotalPriceError> {
                Ok(OrderRow::new(
                    idx + 1,
                    item.name().to_string(),
                    item.quantity(),
                    *item.unit_price(),
                    item.line_total()?,
                ))
            })
            .collect::<Result<_, _>>()?;

        Ok(OrderSummary::new(self.owner_name.clone(), rows))
    }

    /// Calculate the grand total, pick the discount bracket and work out the amount to pay.
    ///
    /// # Errors
    ///
    /// - [`CartError::TotalPrice`]: line totals overflowed or are in different currencies.
    /// - [`CartError::Discount`]: the discount could not be calculated.
    pub fn compute_total(&self) -> Result<Checkout<'a>, CartError> {
        let grand_total = self.grand_total()?;
        let tier = self.discounts.tier_for(&grand_total)?;

        let Some(tier) = tier else {
            debug!(owner = %self.owner_name, %grand_total, "no discount bracket reached");

            return Ok(Checkout::new(
                grand_total,
                None,
                Money::from_minor(0, self.currency),
                grand_total,
            ));
        };

        let discount = discount_on(&grand_total, &tier.percentage())?;
        let payable = grand_total.sub(discount).map_err(DiscountError::from)?;

        info!(
            owner = %self.owner_name,
            percent = %tier.percent_points(),
            %discount,
            "discount bracket reached"
        );

        Ok(Checkout::new(
            grand_total,
            Some(tier.percentage()),
            discount,
            payable,
        ))
    }

    /// Sum of every line total; zero when the cart is empty.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if a line total overflowed or currencies differ.
    pub fn grand_total(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        if self.is_empty() {
            return Ok(Money::from_minor(0, self.currency));
        }

        total_price(&self.items)
    }

    fn position(&self, name: &str) -> Result<usize, CartError> {
        self.items
            .iter()
            .position(|item| item.name() == name)
            .ok_or_else(|| CartError::ItemNotFound(name.to_string()))
    }

    fn item_mut(&mut self, name: &str) -> Result<&mut LineItem<'a>, CartError> {
        self.items
            .iter_mut()
            .find(|item| item.name() == name)
            .ok_or_else(|| CartError::ItemNotFound(name.to_string()))
    }

    fn upsert(&mut self, item: LineItem<'a>) {
        match self.items.iter_mut().find(|existing| existing.name() == item.name()) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    fn check_item(&self, item: &LineItem<'a>) -> Result<(), OrderDataError> {
        if item.name().trim().is_empty() {
            return Err(OrderDataError::MissingValue {
                item: None,
                field: Field::Name,
            });
        }

        if item.unit_price().currency() != self.currency {
            return Err(OrderDataError::WrongType {
                item: Some(item.name().to_string()),
                field: Field::UnitPrice,
                expected: "an amount in the cart currency",
            });
        }

        if item.unit_price().to_minor_units() < 0 {
            return Err(OrderDataError::WrongType {
                item: Some(item.name().to_string()),
                field: Field::UnitPrice,
                expected: "a non-negative amount",
            });
        }

        Ok(())
    }

    fn listing(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{} x{} @ {}", item.name(), item.quantity(), item.unit_price()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{IDR, USD};
    use serde_norway::Value;
    use testresult::TestResult;

    use super::*;

    fn rp(major: i64) -> Money<'static, Currency> {
        Money::from_major(major, IDR)
    }

    fn andi() -> Cart<'static> {
        let mut cart = Cart::new("Andi");
        cart.add_items([("Ayam Goreng", 2, rp(20_000)), ("Pasta Gigi", 3, rp(15_000))]);
        cart
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new("Andi");

        assert_eq!(cart.owner_name(), "Andi");
        assert_eq!(cart.currency(), IDR);
        assert!(cart.is_empty());
    }

    #[test]
    fn add_items_then_read_back() -> TestResult {
        let cart = andi();
        let item = cart.item("Ayam Goreng").ok_or("missing item")?;

        assert_eq!(item.quantity(), 2);
        assert_eq!(item.unit_price(), &rp(20_000));

        Ok(())
    }

    #[test]
    fn add_items_overwrites_same_name() -> TestResult {
        let mut cart = andi();
        cart.add_items([("Ayam Goreng", 5, rp(18_000))]);

        let item = cart.item("Ayam Goreng").ok_or("missing item")?;

        assert_eq!(cart.len(), 2);
        assert_eq!(item.quantity(), 5);
        assert_eq!(item.unit_price(), &rp(18_000));

        let names: Vec<&str> = cart.iter().map(LineItem::name).collect();
        assert_eq!(names, vec!["Ayam Goreng", "Pasta Gigi"]);

        Ok(())
    }

    #[test]
    fn add_entries_malformed_stores_nothing() {
        let mut cart = Cart::new("Andi");
        let entries = [
            RawEntry::new(vec![
                Value::from("Ayam Goreng"),
                Value::from(2),
                Value::from(20_000),
            ]),
            RawEntry::new(vec![Value::from("Pasta Gigi"), Value::from(3)]),
        ];

        let result = cart.add_entries(&entries);

        assert!(matches!(
            result,
            Err(CartError::MalformedEntry { index: 1, len: 2 })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_entries_null_quantity_is_missing_value() {
        let mut cart = Cart::new("Andi");
        let entries = [RawEntry::new(vec![
            Value::from("Sabun"),
            Value::Null,
            Value::from(5_000),
        ])];

        let result = cart.add_entries(&entries);

        assert!(matches!(
            result,
            Err(CartError::InvalidOrderData(OrderDataError::MissingValue {
                field: Field::Quantity,
                ..
            }))
        ));
    }

    #[test]
    fn rename_moves_record() -> TestResult {
        let mut cart = andi();
        cart.rename_item("Pasta Gigi", "Odol")?;

        cart.validate_item_exists("Odol")?;

        assert!(matches!(
            cart.validate_item_exists("Pasta Gigi"),
            Err(CartError::ItemNotFound(name)) if name == "Pasta Gigi"
        ));
        assert_eq!(cart.item("Odol").map(LineItem::quantity), Some(3));

        Ok(())
    }

    #[test]
    fn rename_moves_item_to_end_of_order() -> TestResult {
        let mut cart = Cart::new("Andi");
        cart.add_items([
            ("Ayam Goreng", 2, rp(20_000)),
            ("Pasta Gigi", 3, rp(15_000)),
            ("Sabun", 1, rp(5_000)),
        ]);

        cart.rename_item("Ayam Goreng", "Nasi Goreng")?;

        let summary = cart.render_order()?;
        let names: Vec<&str> = summary.rows().iter().map(OrderRow::name).collect();

        assert_eq!(names, vec!["Pasta Gigi", "Sabun", "Nasi Goreng"]);

        Ok(())
    }

    #[test]
    fn rename_onto_existing_name_takes_its_row() -> TestResult {
        let mut cart = Cart::new("Andi");
        cart.add_items([
            ("Ayam Goreng", 2, rp(20_000)),
            ("Pasta Gigi", 3, rp(15_000)),
            ("Sabun", 1, rp(5_000)),
        ]);

        cart.rename_item("Sabun", "Ayam Goreng")?;

        let names: Vec<&str> = cart.iter().map(LineItem::name).collect();

        assert_eq!(names, vec!["Ayam Goreng", "Pasta Gigi"]);
        assert_eq!(cart.item("Ayam Goreng").map(LineItem::quantity), Some(1));

        Ok(())
    }

    #[test]
    fn rename_onto_existing_name_overwrites() -> TestResult {
        let mut cart = andi();
        cart.rename_item("Pasta Gigi", "Ayam Goreng")?;

        let item = cart.item("Ayam Goreng").ok_or("missing item")?;

        assert_eq!(cart.len(), 1);
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.unit_price(), &rp(15_000));

        Ok(())
    }

    #[test]
    fn rename_to_same_name_keeps_item() -> TestResult {
        let mut cart = andi();
        cart.rename_item("Pasta Gigi", "Pasta Gigi")?;

        assert_eq!(cart.len(), 2);
        cart.validate_item_exists("Pasta Gigi")?;

        Ok(())
    }

    #[test]
    fn updates_require_existing_item() {
        let mut cart = andi();

        assert!(matches!(
            cart.rename_item("Sabun", "Sampo"),
            Err(CartError::ItemNotFound(_))
        ));
        assert!(matches!(
            cart.update_quantity("Sabun", 1),
            Err(CartError::ItemNotFound(_))
        ));
        assert!(matches!(
            cart.update_price("Sabun", rp(1)),
            Err(CartError::ItemNotFound(_))
        ));
    }

    #[test]
    fn update_quantity_and_price_in_place() -> TestResult {
        let mut cart = andi();
        cart.update_quantity("Ayam Goreng", 4)?;
        cart.update_price("Ayam Goreng", rp(21_000))?;

        let item = cart.item("Ayam Goreng").ok_or("missing item")?;

        assert_eq!(item.quantity(), 4);
        assert_eq!(item.unit_price(), &rp(21_000));

        Ok(())
    }

    #[test]
    fn delete_item_removes_entry() -> TestResult {
        let mut cart = andi();
        cart.delete_item("Ayam Goreng")?;

        assert_eq!(cart.len(), 1);
        assert!(cart.item("Ayam Goreng").is_none());

        Ok(())
    }

    #[test]
    fn delete_missing_item_is_not_found() {
        let mut cart = andi();

        assert!(matches!(
            cart.delete_item("Sabun"),
            Err(CartError::ItemNotFound(name)) if name == "Sabun"
        ));
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn reset_clears_items() {
        let mut cart = andi();
        cart.reset();
        cart.reset();

        assert!(cart.is_empty());
    }

    #[test]
    fn render_order_rows() -> TestResult {
        let summary = andi().render_order()?;
        let rows = summary.rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows.first().map(OrderRow::number), Some(1));
        assert_eq!(rows.get(1).map(OrderRow::name), Some("Pasta Gigi"));
        assert_eq!(rows.get(1).map(OrderRow::line_total), Some(&rp(45_000)));

        Ok(())
    }

    #[test]
    fn render_order_blank_name_is_missing_value() {
        let mut cart = andi();
        cart.add_items([(" ", 1, rp(1_000))]);

        assert!(matches!(
            cart.render_order(),
            Err(CartError::InvalidOrderData(OrderDataError::MissingValue {
                field: Field::Name,
                ..
            }))
        ));
    }

    #[test]
    fn render_order_foreign_price_is_wrong_type() {
        let mut cart = andi();
        cart.add_items([("Toothpaste", 1, Money::from_major(3, USD))]);

        assert!(matches!(
            cart.render_order(),
            Err(CartError::InvalidOrderData(OrderDataError::WrongType {
                field: Field::UnitPrice,
                ..
            }))
        ));
    }

    #[test]
    fn render_order_negative_price_is_wrong_type() {
        let mut cart = andi();
        cart.add_items([("Voucher", 1, rp(-5_000))]);

        assert!(matches!(
            cart.render_order(),
            Err(CartError::InvalidOrderData(OrderDataError::WrongType { .. }))
        ));
    }

    #[test]
    fn compute_total_without_discount() -> TestResult {
        let checkout = andi().compute_total()?;

        assert_eq!(checkout.grand_total(), &rp(85_000));
        assert!(checkout.discount().is_none());
        assert_eq!(checkout.payable(), &rp(85_000));

        Ok(())
    }

    #[test]
    fn compute_total_of_empty_cart_is_zero() -> TestResult {
        let checkout = Cart::new("Andi").compute_total()?;

        assert_eq!(checkout.payable(), &Money::from_minor(0, IDR));

        Ok(())
    }

    #[test]
    fn compute_total_uses_custom_schedule() -> TestResult {
        let mut cart = Cart::new("Andi").with_discounts(DiscountSchedule::default());
        cart.add_items([("Kulkas", 1, rp(900_000))]);

        let checkout = cart.compute_total()?;

        assert!(checkout.discount().is_none());
        assert_eq!(checkout.payable(), &rp(900_000));

        Ok(())
    }
}
