// libs/practitioner-cell/src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_models::AppError;

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPractitionerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub specialty: Option<String>,
    pub bio: Option<String>,
    pub license_number: Option<String>,
    pub years_experience: Option<i32>,
    pub consultation_fee: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLocationRequest {
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub created_by: Uuid,
}

// ==============================================================================
// ONBOARDING MODELS
// ==============================================================================

/// Readiness view derived from the practitioner row, location joins and
/// published slots. Never stored as its own table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OnboardingStatus {
    pub profile_completed: bool,
    pub locations_attached: bool,
    pub availability_published: bool,
    pub next_step: OnboardingStep,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    CompleteProfile,
    AttachLocation,
    PublishAvailability,
    Complete,
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnboardingStep::CompleteProfile => write!(f, "complete_profile"),
            OnboardingStep::AttachLocation => write!(f, "attach_location"),
            OnboardingStep::PublishAvailability => write!(f, "publish_availability"),
            OnboardingStep::Complete => write!(f, "complete"),
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum PractitionerError {
    #[error("Practitioner not found")]
    NotFound,

    #[error("Location not found")]
    LocationNotFound,

    #[error("Practitioner already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Location already attached to practitioner")]
    AlreadyAttached,

    #[error("Location is not attached to practitioner")]
    NotAttached,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<PractitionerError> for AppError {
    fn from(err: PractitionerError) -> Self {
        match err {
            PractitionerError::NotFound => AppError::NotFound("Practitioner not found".to_string()),
            PractitionerError::LocationNotFound => {
                AppError::NotFound("Location not found".to_string())
            }
            PractitionerError::AlreadyRegistered(msg) => AppError::Conflict(msg),
            PractitionerError::AlreadyAttached => {
                AppError::Conflict("Location already attached to practitioner".to_string())
            }
            PractitionerError::NotAttached => {
                AppError::NotFound("Location is not attached to practitioner".to_string())
            }
            PractitionerError::ValidationError(msg) => AppError::ValidationError(msg),
            PractitionerError::StorageError(msg) => AppError::Internal(msg),
        }
    }
}
