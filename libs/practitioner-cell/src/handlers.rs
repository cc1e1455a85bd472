// libs/practitioner-cell/src/handlers.rs
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{CreateLocationRequest, RegisterPractitionerRequest, UpdateProfileRequest};
use crate::router::PractitionerCellState;
use crate::services::{
    locations::LocationService, onboarding::OnboardingService, profile::PractitionerProfileService,
};

#[axum::debug_handler]
pub async fn register_practitioner(
    State(state): State<PractitionerCellState>,
    Json(request): Json<RegisterPractitionerRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PractitionerProfileService::new(state.store.clone(), state.clock.clone());
    let practitioner = service.register(request).await?;
    Ok(Json(json!(practitioner)))
}

#[axum::debug_handler]
pub async fn get_practitioner(
    State(state): State<PractitionerCellState>,
    Path(practitioner_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = PractitionerProfileService::new(state.store.clone(), state.clock.clone());
    let practitioner = service.get(practitioner_id).await?;
    Ok(Json(json!(practitioner)))
}

#[axum::debug_handler]
pub async fn update_practitioner_profile(
    State(state): State<PractitionerCellState>,
    Path(practitioner_id): Path<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PractitionerProfileService::new(state.store.clone(), state.clock.clone());
    let practitioner = service.update_profile(practitioner_id, request).await?;
    Ok(Json(json!(practitioner)))
}

#[axum::debug_handler]
pub async fn deactivate_practitioner(
    State(state): State<PractitionerCellState>,
    Path(practitioner_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = PractitionerProfileService::new(state.store.clone(), state.clock.clone());
    let practitioner = service.deactivate(practitioner_id).await?;
    Ok(Json(json!(practitioner)))
}

#[axum::debug_handler]
pub async fn get_onboarding_status(
    State(state): State<PractitionerCellState>,
    Path(practitioner_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = OnboardingService::new(state.store.clone());
    let status = service.compute_status(practitioner_id).await?;
    Ok(Json(json!(status)))
}

#[axum::debug_handler]
pub async fn create_location(
    State(state): State<PractitionerCellState>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<Json<Value>, AppError> {
    let service = LocationService::new(state.store.clone(), state.clock.clone());
    let location = service.create_location(request).await?;
    Ok(Json(json!(location)))
}

#[axum::debug_handler]
pub async fn list_locations(
    State(state): State<PractitionerCellState>,
) -> Result<Json<Value>, AppError> {
    let service = LocationService::new(state.store.clone(), state.clock.clone());
    let locations = service.list_locations().await;
    Ok(Json(json!({
        "locations": locations,
        "total": locations.len()
    })))
}

#[axum::debug_handler]
pub async fn get_location(
    State(state): State<PractitionerCellState>,
    Path(location_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = LocationService::new(state.store.clone(), state.clock.clone());
    let location = service.get_location(location_id).await?;
    Ok(Json(json!(location)))
}

#[axum::debug_handler]
pub async fn list_practitioner_locations(
    State(state): State<PractitionerCellState>,
    Path(practitioner_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = LocationService::new(state.store.clone(), state.clock.clone());
    let locations = service.list_for_practitioner(practitioner_id).await?;
    Ok(Json(json!({
        "locations": locations,
        "total": locations.len()
    })))
}

#[axum::debug_handler]
pub async fn attach_location(
    State(state): State<PractitionerCellState>,
    Path((practitioner_id, location_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let service = LocationService::new(state.store.clone(), state.clock.clone());
    let attached = service.attach(practitioner_id, location_id).await?;
    Ok(Json(json!(attached)))
}

#[axum::debug_handler]
pub async fn detach_location(
    State(state): State<PractitionerCellState>,
    Path((practitioner_id, location_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let service = LocationService::new(state.store.clone(), state.clock.clone());
    service.detach(practitioner_id, location_id).await?;
    Ok(Json(json!({
        "detached": true
    })))
}
