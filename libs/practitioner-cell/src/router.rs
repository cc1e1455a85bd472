// libs/practitioner-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use shared_store::SchedulingStore;
use shared_utils::Clock;

use crate::handlers;

#[derive(Clone)]
pub struct PractitionerCellState {
    pub store: Arc<SchedulingStore>,
    pub clock: Arc<dyn Clock>,
}

pub fn practitioner_routes(state: PractitionerCellState) -> Router {
    Router::new()
        // Practitioner profile management
        .route("/", post(handlers::register_practitioner))
        .route("/{practitioner_id}", get(handlers::get_practitioner))
        .route("/{practitioner_id}", put(handlers::update_practitioner_profile))
        .route(
            "/{practitioner_id}/deactivate",
            patch(handlers::deactivate_practitioner),
        )
        .route(
            "/{practitioner_id}/onboarding",
            get(handlers::get_onboarding_status),
        )
        // Location management and association
        .route("/locations", post(handlers::create_location))
        .route("/locations", get(handlers::list_locations))
        .route("/locations/{location_id}", get(handlers::get_location))
        .route(
            "/{practitioner_id}/locations",
            get(handlers::list_practitioner_locations),
        )
        .route(
            "/{practitioner_id}/locations/{location_id}",
            post(handlers::attach_location),
        )
        .route(
            "/{practitioner_id}/locations/{location_id}",
            delete(handlers::detach_location),
        )
        .with_state(state)
}
