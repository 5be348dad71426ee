//! Plain data model for the trip: days, itinerary entries, shopping items, and expenses.
//! No I/O and no persistence here.

pub mod common;
pub mod date_entry;
pub mod expense;
pub mod itinerary;
pub mod shopping;

pub use common::*;
pub use date_entry::*;
pub use expense::*;
pub use itinerary::*;
pub use shopping::*;
