pub mod models;
pub mod services;
pub mod handlers;
pub mod router;

pub use models::*;
pub use router::{availability_routes, AvailabilityCellState};
pub use services::generator::SlotSequence;
pub use services::slots::AvailabilityService;
