pub mod confirm;
pub mod trip_manager;
pub mod utils;

pub use confirm::{AssumeNo, AssumeYes, Confirmation, Outcome};
pub use trip_manager::TripManager;
