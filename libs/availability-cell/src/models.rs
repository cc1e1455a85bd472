// libs/availability-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::AppError;

// ==============================================================================
// GENERATOR MODELS
// ==============================================================================

/// One candidate time range produced by the generator, not yet persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotWindow {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Shift description the slot sequence is derived from. `end_hour` is
/// exclusive; `break_hours` lists starting hours to skip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSettings {
    pub start_hour: u32,
    pub end_hour: u32,
    pub slot_minutes: u32,
    pub break_hours: Vec<u32>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotsRequest {
    pub location_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<SlotWindow>,
    pub max_bookings: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSlotsRequest {
    pub location_id: Uuid,
    pub date: NaiveDate,
    pub start_hour: u32,
    pub end_hour: u32,
    pub slot_minutes: u32,
    pub break_hours: Option<Vec<u32>>,
    pub max_bookings: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub location_id: Uuid,
    pub date: NaiveDate,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Practitioner not found")]
    PractitionerNotFound,

    #[error("Location not found")]
    LocationNotFound,

    #[error("Location is not attached to practitioner")]
    LocationNotAttached,

    #[error("Onboarding incomplete: {0}")]
    OnboardingIncomplete(String),

    #[error("Slot {first_start}-{first_end} overlaps slot {second_start}-{second_end}")]
    SlotConflict {
        first_start: NaiveTime,
        first_end: NaiveTime,
        second_start: NaiveTime,
        second_end: NaiveTime,
    },

    #[error("Slot not found")]
    SlotNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::PractitionerNotFound => {
                AppError::NotFound("Practitioner not found".to_string())
            }
            AvailabilityError::LocationNotFound => {
                AppError::NotFound("Location not found".to_string())
            }
            AvailabilityError::LocationNotAttached => {
                AppError::ValidationError("Location is not attached to practitioner".to_string())
            }
            AvailabilityError::OnboardingIncomplete(msg) => AppError::UnprocessableEntity(msg),
            AvailabilityError::SlotConflict { .. } => AppError::Conflict(err.to_string()),
            AvailabilityError::SlotNotFound => AppError::NotFound("Slot not found".to_string()),
            AvailabilityError::ValidationError(msg) => AppError::ValidationError(msg),
            AvailabilityError::StorageError(msg) => AppError::Internal(msg),
        }
    }
}
