// libs/appointment-cell/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    AppointmentSearchQuery, BookAppointmentRequest, NotificationMode, TransitionRequest,
    UpcomingQuery,
};
use crate::router::AppointmentCellState;
use crate::services::booking::BookingService;
use crate::services::lifecycle::LifecycleService;

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<AppointmentCellState>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(
        state.store.clone(),
        state.clock.clone(),
        state.notifier.clone(),
        state.config.policy.clone(),
    );
    let confirmation = service.book(request, NotificationMode::Immediate).await?;
    Ok(Json(json!(confirmation)))
}

/// Same booking pipeline, but notification dispatch is handed to a
/// background task and only the created appointment is returned.
#[axum::debug_handler]
pub async fn book_appointment_deferred(
    State(state): State<AppointmentCellState>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(
        state.store.clone(),
        state.clock.clone(),
        state.notifier.clone(),
        state.config.policy.clone(),
    );
    let confirmation = service.book(request, NotificationMode::Deferred).await?;
    Ok(Json(json!(confirmation.appointment)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppointmentCellState>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(
        state.store.clone(),
        state.clock.clone(),
        state.notifier.clone(),
        state.config.policy.clone(),
    );
    let appointment = service.get_appointment(appointment_id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn search_appointments(
    State(state): State<AppointmentCellState>,
    Query(query): Query<AppointmentSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(
        state.store.clone(),
        state.clock.clone(),
        state.notifier.clone(),
        state.config.policy.clone(),
    );
    let appointments = service.search_appointments(query).await?;
    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn upcoming_appointments(
    State(state): State<AppointmentCellState>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(
        state.store.clone(),
        state.clock.clone(),
        state.notifier.clone(),
        state.config.policy.clone(),
    );
    let appointments = service.upcoming_appointments(query).await?;
    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn transition_appointment(
    State(state): State<AppointmentCellState>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<Value>, AppError> {
    let service = LifecycleService::new(
        state.store.clone(),
        state.clock.clone(),
        state.notifier.clone(),
        state.config.policy.clone(),
    );
    let appointment = service.transition(appointment_id, request).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn expire_overdue(
    State(state): State<AppointmentCellState>,
) -> Result<Json<Value>, AppError> {
    let service = LifecycleService::new(
        state.store.clone(),
        state.clock.clone(),
        state.notifier.clone(),
        state.config.policy.clone(),
    );
    let report = service.expire_overdue().await?;
    Ok(Json(json!(report)))
}
