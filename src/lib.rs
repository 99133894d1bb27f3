//! Till
//!
//! Till models a single shopping transaction: a cart of named line items that can be added,
//! renamed, re-priced and removed, an order table, and a payable total with a tiered discount.
//!
//! ```
//! use rusty_money::{Money, iso::IDR};
//! use till::cart::Cart;
//!
//! # fn main() -> Result<(), till::cart::CartError> {
//! let mut cart = Cart::new("Andi");
//! cart.add_items([("Ayam Goreng", 2, Money::from_major(20_000, IDR))]);
//!
//! let checkout = cart.compute_total()?;
//! assert_eq!(checkout.payable(), &Money::from_major(40_000, IDR));
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod discounts;
pub mod entries;
pub mod fixtures;
pub mod items;
pub mod order;
pub mod prelude;
pub mod pricing;
