// libs/shared/utils/src/test_utils.rs
//
// Shared fixtures for cell tests. Entities come back fully formed so a test
// only has to override the fields it cares about.
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use shared_config::{AppConfig, SchedulingPolicy};
use shared_models::{
    Appointment, AppointmentStatus, AvailabilitySlot, Location, Practitioner,
    PractitionerLocation,
};

use crate::clock::FixedClock;

/// Instant all deterministic tests start from: Monday 2026-01-05, 08:00 UTC.
pub fn test_epoch() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-05T08:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn test_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(test_epoch()))
}

pub fn test_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        listen_port: 0,
        policy: SchedulingPolicy::default(),
    })
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// A practitioner who has just registered: profile fields still empty,
/// no onboarding step done.
pub fn draft_practitioner() -> Practitioner {
    Practitioner {
        id: Uuid::new_v4(),
        first_name: "Maya".to_string(),
        last_name: "Okafor".to_string(),
        email: "maya.okafor@example.com".to_string(),
        specialty: None,
        bio: None,
        license_number: None,
        years_experience: None,
        consultation_fee: 0.0,
        is_active: true,
        completed_appointments: 0,
        profile_complete: false,
        locations_attached: false,
        availability_published: false,
        created_at: test_epoch(),
        updated_at: test_epoch(),
    }
}

/// A practitioner past every onboarding step, ready to take bookings.
pub fn complete_practitioner() -> Practitioner {
    Practitioner {
        specialty: Some("Dermatology".to_string()),
        bio: Some("Fifteen years in clinical dermatology.".to_string()),
        license_number: Some("MED-44821".to_string()),
        years_experience: Some(15),
        consultation_fee: 80.0,
        profile_complete: true,
        locations_attached: true,
        availability_published: true,
        ..draft_practitioner()
    }
}

pub fn test_location(created_by: Uuid) -> Location {
    Location {
        id: Uuid::new_v4(),
        name: "Riverside Practice".to_string(),
        address: "12 Quay Street".to_string(),
        city: Some("Bristol".to_string()),
        phone: Some("+44 117 000 0000".to_string()),
        created_by,
        created_at: test_epoch(),
    }
}

pub fn attachment(practitioner_id: Uuid, location_id: Uuid) -> PractitionerLocation {
    PractitionerLocation {
        id: Uuid::new_v4(),
        practitioner_id,
        location_id,
        created_at: test_epoch(),
    }
}

pub fn open_slot(
    practitioner_id: Uuid,
    location_id: Uuid,
    slot_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> AvailabilitySlot {
    AvailabilitySlot {
        id: Uuid::new_v4(),
        practitioner_id,
        location_id,
        slot_date,
        start_time,
        end_time,
        is_open: true,
        max_bookings: 1,
        booked_count: 0,
        created_at: test_epoch(),
        updated_at: test_epoch(),
    }
}

pub fn scheduled_appointment(
    client_id: Uuid,
    practitioner_id: Uuid,
    location_id: Uuid,
    slot_id: Uuid,
    appointment_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        client_id,
        practitioner_id,
        location_id,
        slot_id: Some(slot_id),
        appointment_date,
        start_time,
        end_time,
        status: AppointmentStatus::Scheduled,
        fee: 80.0,
        notes: None,
        cancelled_by: None,
        cancellation_reason: None,
        created_at: test_epoch(),
        updated_at: test_epoch(),
    }
}
