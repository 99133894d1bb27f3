//! Till prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    discounts::{DiscountError, DiscountSchedule, DiscountTier},
    entries::{EntryError, Field, OrderDataError, RawEntry},
    fixtures::{FixtureError, OrderFixture},
    items::LineItem,
    order::{Checkout, OrderError, OrderRow, OrderSummary},
    pricing::{TotalPriceError, total_price},
};
