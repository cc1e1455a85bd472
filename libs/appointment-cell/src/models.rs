// libs/appointment-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::{AppError, Appointment, AppointmentStatus, AvailabilitySlot, TransitionActor};

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub client_id: Uuid,
    pub practitioner_id: Uuid,
    pub location_id: Uuid,
    pub slot_id: Uuid,
    pub appointment_date: NaiveDate,
    /// Overrides the practitioner's standard consultation fee when set.
    pub fee: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub target_status: AppointmentStatus,
    pub actor: TransitionActor,
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentSearchQuery {
    pub practitioner_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpcomingQuery {
    pub practitioner_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    /// Look-ahead window in days, defaults to 7.
    pub days: Option<i64>,
}

/// Rich payload returned by the immediate booking path so clients can
/// render the confirmation without follow-up lookups.
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub appointment: Appointment,
    pub slot: AvailabilitySlot,
    pub practitioner_name: String,
    pub location_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpirySweepReport {
    pub expired: usize,
}

// ==============================================================================
// NOTIFICATION MODELS
// ==============================================================================

/// Selects when the booking workflow hands its event to the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationMode {
    /// Dispatch before returning to the caller.
    Immediate,
    /// Hand off to a background task and return right away.
    Deferred,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentEvent {
    Created,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
    Expired,
}

impl AppointmentEvent {
    /// Event announced when an appointment lands in `status`. A row can
    /// only enter `Scheduled` by being created, so that maps to `Created`.
    pub fn for_status(status: &AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Scheduled => AppointmentEvent::Created,
            AppointmentStatus::Confirmed => AppointmentEvent::Confirmed,
            AppointmentStatus::InProgress => AppointmentEvent::InProgress,
            AppointmentStatus::Completed => AppointmentEvent::Completed,
            AppointmentStatus::Cancelled => AppointmentEvent::Cancelled,
            AppointmentStatus::NoShow => AppointmentEvent::NoShow,
            AppointmentStatus::Expired => AppointmentEvent::Expired,
        }
    }
}

impl std::fmt::Display for AppointmentEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let event = match self {
            AppointmentEvent::Created => "created",
            AppointmentEvent::Confirmed => "confirmed",
            AppointmentEvent::InProgress => "in_progress",
            AppointmentEvent::Completed => "completed",
            AppointmentEvent::Cancelled => "cancelled",
            AppointmentEvent::NoShow => "no_show",
            AppointmentEvent::Expired => "expired",
        };
        write!(f, "{}", event)
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Slot not found")]
    SlotNotFound,

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Practitioner not found")]
    PractitionerNotFound,

    #[error("Practitioner schedule conflict: {0}")]
    PractitionerConflict(String),

    #[error("Client schedule conflict: {0}")]
    ClientConflict(String),

    #[error("Booking rule violated: {0}")]
    BusinessRule(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            AppointmentError::SlotNotFound => AppError::NotFound("Slot not found".to_string()),
            AppointmentError::SlotUnavailable(msg) => {
                AppError::Conflict(format!("Slot unavailable: {}", msg))
            }
            AppointmentError::PractitionerNotFound => {
                AppError::NotFound("Practitioner not found".to_string())
            }
            AppointmentError::PractitionerConflict(msg) => AppError::Conflict(msg),
            AppointmentError::ClientConflict(msg) => AppError::Conflict(msg),
            AppointmentError::BusinessRule(msg) => AppError::UnprocessableEntity(msg),
            AppointmentError::InvalidTransition { .. } => {
                AppError::UnprocessableEntity(err.to_string())
            }
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::StorageError(msg) => AppError::Internal(msg),
        }
    }
}
