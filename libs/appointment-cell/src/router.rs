// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_store::SchedulingStore;
use shared_utils::Clock;

use crate::handlers;
use crate::services::notify::Notifier;

#[derive(Clone)]
pub struct AppointmentCellState {
    pub store: Arc<SchedulingStore>,
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<AppConfig>,
}

pub fn appointment_routes(state: AppointmentCellState) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/deferred", post(handlers::book_appointment_deferred))
        .route("/", get(handlers::search_appointments))
        .route("/upcoming", get(handlers::upcoming_appointments))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route(
            "/{appointment_id}/transition",
            patch(handlers::transition_appointment),
        )
        .route("/sweep", post(handlers::expire_overdue))
        .with_state(state)
}
