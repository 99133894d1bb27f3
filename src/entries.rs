//! Entries
//!
//! Loosely typed `(name, quantity, price)` triples, as they arrive from an order sheet, and the
//! checks that turn them into [`LineItem`]s.

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use serde_norway::Value;
use thiserror::Error;

use crate::items::LineItem;

/// A field of a line item, used to point at the offending cell in an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The item name
    Name,
    /// The number of units
    Quantity,
    /// The price of one unit
    UnitPrice,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => f.write_str("name"),
            Field::Quantity => f.write_str("quantity"),
            Field::UnitPrice => f.write_str("unit price"),
        }
    }
}

/// Invalid order data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderDataError {
    /// A value is empty or missing.
    #[error("{field} of item {item:?} must not be empty")]
    MissingValue {
        /// Name of the offending item, if it has one
        item: Option<String>,
        /// The empty field
        field: Field,
    },

    /// A value has the wrong data type.
    #[error("{field} of item {item:?} must be {expected}")]
    WrongType {
        /// Name of the offending item, if it has one
        item: Option<String>,
        /// The mistyped field
        field: Field,
        /// Description of what was expected
        expected: &'static str,
    },
}

impl OrderDataError {
    /// The field the error refers to.
    pub fn field(&self) -> Field {
        match self {
            OrderDataError::MissingValue { field, .. } | OrderDataError::WrongType { field, .. } => {
                *field
            }
        }
    }
}

/// Errors raised while decoding a raw entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// The entry is not a `(name, quantity, price)` triple.
    #[error("each item must be a (name, quantity, price) triple, got {0} values")]
    Malformed(usize),

    /// A cell of the triple is empty or mistyped.
    #[error(transparent)]
    InvalidData(#[from] OrderDataError),
}

/// An unvalidated `(name, quantity, price)` entry.
///
/// Prices are whole major units of the cart currency.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawEntry(Vec<Value>);

impl RawEntry {
    /// Wrap a list of cells.
    pub fn new(cells: impl Into<Vec<Value>>) -> Self {
        Self(cells.into())
    }

    /// Return the cells.
    pub fn cells(&self) -> &[Value] {
        &self.0
    }

    /// Decode the entry into a line item priced in `currency`.
    ///
    /// # Errors
    ///
    /// - [`EntryError::Malformed`]: the entry does not hold exactly three cells.
    /// - [`EntryError::InvalidData`]: a cell is missing ([`OrderDataError::MissingValue`]) or of
    ///   the wrong type ([`OrderDataError::WrongType`]).
    pub fn decode<'a>(&self, currency: &'a Currency) -> Result<LineItem<'a>, EntryError> {
        let [name, quantity, price] = self.0.as_slice() else {
            return Err(EntryError::Malformed(self.0.len()));
        };

        let name = decode_name(name)?;
        let quantity = decode_quantity(quantity, &name)?;
        let price = decode_price(price, &name)?;

        Ok(LineItem::new(name, quantity, Money::from_major(price, currency)))
    }
}

fn decode_name(value: &Value) -> Result<String, OrderDataError> {
    match value {
        Value::Null => Err(OrderDataError::MissingValue {
            item: None,
            field: Field::Name,
        }),
        Value::String(name) if name.trim().is_empty() => Err(OrderDataError::MissingValue {
            item: None,
            field: Field::Name,
        }),
        Value::String(name) => Ok(name.clone()),
        _ => Err(OrderDataError::WrongType {
            item: None,
            field: Field::Name,
            expected: "a string",
        }),
    }
}

fn decode_quantity(value: &Value, name: &str) -> Result<u32, OrderDataError> {
    let wrong_type = || OrderDataError::WrongType {
        item: Some(name.to_string()),
        field: Field::Quantity,
        expected: "a non-negative integer",
    };

    match value {
        Value::Null => Err(OrderDataError::MissingValue {
            item: Some(name.to_string()),
            field: Field::Quantity,
        }),
        Value::Number(number) => number
            .as_u64()
            .and_then(|quantity| u32::try_from(quantity).ok())
            .ok_or_else(wrong_type),
        _ => Err(wrong_type()),
    }
}

fn decode_price(value: &Value, name: &str) -> Result<i64, OrderDataError> {
    let wrong_type = || OrderDataError::WrongType {
        item: Some(name.to_string()),
        field: Field::UnitPrice,
        expected: "a non-negative integer",
    };

    match value {
        Value::Null => Err(OrderDataError::MissingValue {
            item: Some(name.to_string()),
            field: Field::UnitPrice,
        }),
        Value::Number(number) => number
            .as_i64()
            .filter(|price| *price >= 0)
            .ok_or_else(wrong_type),
        _ => Err(wrong_type()),
    }
}
