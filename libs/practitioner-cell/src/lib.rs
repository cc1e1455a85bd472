pub mod models;
pub mod services;
pub mod handlers;
pub mod router;

pub use models::*;
pub use router::{practitioner_routes, PractitionerCellState};
pub use services::locations::LocationService;
pub use services::onboarding::OnboardingService;
pub use services::profile::PractitionerProfileService;
