//! Trip days and the activities planned on each of them.

pub mod book;
pub mod date_range;

pub use book::ItineraryBook;
pub use date_range::{DateRangeManager, DeletedDay};
