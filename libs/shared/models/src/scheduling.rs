// libs/shared/models/src/scheduling.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveDate, NaiveTime};
use std::fmt;

// ==============================================================================
// PRACTITIONER & LOCATION MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Practitioner {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub specialty: Option<String>,
    pub bio: Option<String>,
    pub license_number: Option<String>,
    pub years_experience: Option<i32>,
    pub consultation_fee: f64,
    pub is_active: bool,
    pub completed_appointments: i32,
    // Derived onboarding flags, refreshed by the onboarding service after
    // profile, location or availability writes
    pub profile_complete: bool,
    pub locations_attached: bool,
    pub availability_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Practitioner {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Profile is complete once specialty, license, experience and bio are all set.
    pub fn has_complete_profile(&self) -> bool {
        self.specialty.as_deref().is_some_and(|s| !s.is_empty())
            && self.license_number.as_deref().is_some_and(|s| !s.is_empty())
            && self.years_experience.is_some()
            && self.bio.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Many-to-many join between practitioners and locations, unique per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PractitionerLocation {
    pub id: Uuid,
    pub practitioner_id: Uuid,
    pub location_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub practitioner_id: Uuid,
    pub location_id: Uuid,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_open: bool,
    pub max_bookings: i32,
    pub booked_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilitySlot {
    /// Two slots overlap when their [start, end) ranges intersect.
    pub fn overlaps(&self, other: &AvailabilitySlot) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    pub fn has_capacity(&self) -> bool {
        self.booked_count < self.max_bookings
    }

    pub fn is_bookable(&self) -> bool {
        self.is_open && self.has_capacity()
    }
}

// ==============================================================================
// APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub practitioner_id: Uuid,
    pub location_id: Uuid,
    pub slot_id: Option<Uuid>,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
    pub fee: f64,
    pub notes: Option<String>,
    pub cancelled_by: Option<TransitionActor>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Scheduled start as an instant, for horizon and expiry arithmetic.
    pub fn start_datetime(&self) -> DateTime<Utc> {
        self.appointment_date.and_time(self.start_time).and_utc()
    }

    /// Overlap check against another date + time range.
    pub fn overlaps_range(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> bool {
        self.appointment_date == date && self.start_time < end && start < self.end_time
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
    Expired,
}

impl AppointmentStatus {
    /// Terminal statuses permit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed
                | AppointmentStatus::Cancelled
                | AppointmentStatus::NoShow
                | AppointmentStatus::Expired
        )
    }

    /// Active appointments block double-booking for both parties.
    pub fn blocks_calendar(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::InProgress => write!(f, "in_progress"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
            AppointmentStatus::Expired => write!(f, "expired"),
        }
    }
}

/// Who initiated a lifecycle transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TransitionActor {
    Client,
    Practitioner,
    System,
}

impl fmt::Display for TransitionActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionActor::Client => write!(f, "client"),
            TransitionActor::Practitioner => write!(f, "practitioner"),
            TransitionActor::System => write!(f, "system"),
        }
    }
}
