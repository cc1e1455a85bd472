pub mod models;
pub mod services;
pub mod handlers;
pub mod router;

pub use models::*;
pub use router::{appointment_routes, AppointmentCellState};
pub use services::booking::BookingService;
pub use services::lifecycle::LifecycleService;
pub use services::notify::{Notifier, RecordingNotifier, TracingNotifier};
