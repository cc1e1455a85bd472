// libs/availability-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use shared_store::SchedulingStore;
use shared_utils::Clock;

use crate::handlers;

#[derive(Clone)]
pub struct AvailabilityCellState {
    pub store: Arc<SchedulingStore>,
    pub clock: Arc<dyn Clock>,
}

pub fn availability_routes(state: AvailabilityCellState) -> Router {
    Router::new()
        .route("/{practitioner_id}/slots", post(handlers::create_slots))
        .route(
            "/{practitioner_id}/slots/generate",
            post(handlers::generate_slots),
        )
        .route("/{practitioner_id}/slots", get(handlers::list_open_slots))
        .route("/slots/{slot_id}/close", patch(handlers::close_slot))
        .route("/slots/{slot_id}/reopen", patch(handlers::reopen_slot))
        .with_state(state)
}
