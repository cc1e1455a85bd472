// libs/availability-cell/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{AvailabilityQuery, CreateSlotsRequest, GenerateSlotsRequest};
use crate::router::AvailabilityCellState;
use crate::services::slots::AvailabilityService;

#[axum::debug_handler]
pub async fn create_slots(
    State(state): State<AvailabilityCellState>,
    Path(practitioner_id): Path<Uuid>,
    Json(request): Json<CreateSlotsRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(state.store.clone(), state.clock.clone());
    let slots = service.create_slots(practitioner_id, request).await?;
    Ok(Json(json!({
        "slots": slots,
        "total": slots.len()
    })))
}

#[axum::debug_handler]
pub async fn generate_slots(
    State(state): State<AvailabilityCellState>,
    Path(practitioner_id): Path<Uuid>,
    Json(request): Json<GenerateSlotsRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(state.store.clone(), state.clock.clone());
    let slots = service.generate_slots(practitioner_id, request).await?;
    Ok(Json(json!({
        "slots": slots,
        "total": slots.len()
    })))
}

#[axum::debug_handler]
pub async fn list_open_slots(
    State(state): State<AvailabilityCellState>,
    Path(practitioner_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(state.store.clone(), state.clock.clone());
    let slots = service
        .list_open_slots(practitioner_id, query.location_id, query.date)
        .await?;
    Ok(Json(json!({
        "slots": slots,
        "total": slots.len()
    })))
}

#[axum::debug_handler]
pub async fn close_slot(
    State(state): State<AvailabilityCellState>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(state.store.clone(), state.clock.clone());
    let slot = service.close_slot(slot_id).await?;
    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn reopen_slot(
    State(state): State<AvailabilityCellState>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(state.store.clone(), state.clock.clone());
    let slot = service.reopen_slot(slot_id).await?;
    Ok(Json(json!(slot)))
}
