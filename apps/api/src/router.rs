use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::{appointment_routes, AppointmentCellState};
use appointment_cell::services::notify::Notifier;
use availability_cell::router::{availability_routes, AvailabilityCellState};
use practitioner_cell::router::{practitioner_routes, PractitionerCellState};
use shared_config::AppConfig;
use shared_store::SchedulingStore;
use shared_utils::Clock;

/// Process-wide collaborators handed down to every cell.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SchedulingStore>,
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<AppConfig>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Sana Practice API is running!" }))
        .nest(
            "/practitioners",
            practitioner_routes(PractitionerCellState {
                store: state.store.clone(),
                clock: state.clock.clone(),
            }),
        )
        .nest(
            "/availability",
            availability_routes(AvailabilityCellState {
                store: state.store.clone(),
                clock: state.clock.clone(),
            }),
        )
        .nest(
            "/appointments",
            appointment_routes(AppointmentCellState {
                store: state.store.clone(),
                clock: state.clock.clone(),
                notifier: state.notifier.clone(),
                config: state.config.clone(),
            }),
        )
}
