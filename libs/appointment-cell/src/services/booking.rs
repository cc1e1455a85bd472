// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::SchedulingPolicy;
use shared_models::{Appointment, AppointmentStatus};
use shared_store::SchedulingStore;
use shared_utils::Clock;

use crate::models::{
    AppointmentError, AppointmentEvent, AppointmentSearchQuery, BookAppointmentRequest,
    BookingConfirmation, NotificationMode, UpcomingQuery,
};
use crate::services::notify::{self, Notifier};

const DEFAULT_SEARCH_LIMIT: usize = 50;
const DEFAULT_UPCOMING_DAYS: i64 = 7;

/// Books appointments against published availability and answers
/// appointment queries. Both booking entry points run the same pipeline;
/// only the notification hand-off differs.
pub struct BookingService {
    store: Arc<SchedulingStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    policy: SchedulingPolicy,
}

impl BookingService {
    pub fn new(
        store: Arc<SchedulingStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        policy: SchedulingPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            notifier,
            policy,
        }
    }

    /// Books the requested slot for the client. Checks and the write
    /// commit run under one store guard, so two racing requests for the
    /// last opening cannot both succeed.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
        mode: NotificationMode,
    ) -> Result<BookingConfirmation, AppointmentError> {
        debug!(
            "Booking slot {} for client {} with practitioner {}",
            request.slot_id, request.client_id, request.practitioner_id
        );

        let now = self.clock.now();
        let mut state = self.store.write().await;

        // **Step 1: Load and validate the slot**
        let slot = state
            .slot(request.slot_id)
            .ok_or(AppointmentError::SlotNotFound)?;
        if slot.practitioner_id != request.practitioner_id
            || slot.location_id != request.location_id
            || slot.slot_date != request.appointment_date
        {
            return Err(AppointmentError::SlotUnavailable(
                "slot does not belong to the requested practitioner, location and date"
                    .to_string(),
            ));
        }
        if !slot.is_open {
            return Err(AppointmentError::SlotUnavailable(
                "slot has been closed".to_string(),
            ));
        }
        if !slot.has_capacity() {
            return Err(AppointmentError::SlotUnavailable(
                "slot is fully booked".to_string(),
            ));
        }

        // **Step 2: Practitioner double-booking check**
        if let Some(clash) = state.appointments().find(|a| {
            a.practitioner_id == request.practitioner_id
                && a.status.blocks_calendar()
                && a.overlaps_range(slot.slot_date, slot.start_time, slot.end_time)
        }) {
            return Err(AppointmentError::PractitionerConflict(format!(
                "Practitioner is already booked from {} to {} on {}",
                clash.start_time, clash.end_time, clash.appointment_date
            )));
        }

        // **Step 3: Client double-booking check**
        if let Some(clash) = state.appointments().find(|a| {
            a.client_id == request.client_id
                && a.status.blocks_calendar()
                && a.overlaps_range(slot.slot_date, slot.start_time, slot.end_time)
        }) {
            return Err(AppointmentError::ClientConflict(format!(
                "Client already has an appointment from {} to {} on {}",
                clash.start_time, clash.end_time, clash.appointment_date
            )));
        }

        // **Step 4: Business rules**
        let practitioner = state
            .practitioner(request.practitioner_id)
            .ok_or(AppointmentError::PractitionerNotFound)?;
        if !practitioner.is_active {
            return Err(AppointmentError::BusinessRule(
                "Practitioner is not currently accepting appointments".to_string(),
            ));
        }
        let start = slot.slot_date.and_time(slot.start_time).and_utc();
        if start < now {
            return Err(AppointmentError::BusinessRule(
                "Appointments cannot be booked in the past".to_string(),
            ));
        }
        if start > now + Duration::days(self.policy.max_advance_days) {
            return Err(AppointmentError::BusinessRule(format!(
                "Appointments can be booked at most {} days in advance",
                self.policy.max_advance_days
            )));
        }
        let fee = request.fee.unwrap_or(practitioner.consultation_fee);
        if fee <= 0.0 {
            return Err(AppointmentError::BusinessRule(
                "A positive consultation fee is required".to_string(),
            ));
        }

        // **Step 5: Create the appointment and hold the slot**
        let appointment = Appointment {
            id: Uuid::new_v4(),
            client_id: request.client_id,
            practitioner_id: request.practitioner_id,
            location_id: request.location_id,
            slot_id: Some(slot.id),
            appointment_date: slot.slot_date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            status: AppointmentStatus::Scheduled,
            fee,
            notes: request.notes.clone(),
            cancelled_by: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };
        state
            .insert_appointment(appointment.clone())
            .map_err(|e| AppointmentError::StorageError(e.to_string()))?;

        let held = state
            .slot_mut(slot.id)
            .map_err(|e| AppointmentError::StorageError(e.to_string()))?;
        held.booked_count += 1;
        if !held.has_capacity() {
            held.is_open = false;
        }
        held.updated_at = now;
        let slot_snapshot = held.clone();

        let location_name = state
            .location(slot.location_id)
            .map(|l| l.name)
            .unwrap_or_default();
        drop(state);

        info!(
            "Booked appointment {} for client {} with practitioner {} on {} {}-{}",
            appointment.id,
            appointment.client_id,
            appointment.practitioner_id,
            appointment.appointment_date,
            appointment.start_time,
            appointment.end_time
        );

        // **Step 6: Post-commit notification**
        notify::dispatch(
            Arc::clone(&self.notifier),
            mode,
            AppointmentEvent::Created,
            appointment.clone(),
        )
        .await;

        Ok(BookingConfirmation {
            appointment,
            slot: slot_snapshot,
            practitioner_name: practitioner.full_name(),
            location_name,
        })
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        let state = self.store.read().await;
        state
            .appointment(appointment_id)
            .ok_or(AppointmentError::NotFound)
    }

    /// Filtered listing ordered by calendar position. `limit` defaults to
    /// 50 and is applied after `offset`.
    pub async fn search_appointments(
        &self,
        query: AppointmentSearchQuery,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        if let (Some(from), Some(to)) = (query.from_date, query.to_date) {
            if from > to {
                return Err(AppointmentError::ValidationError(format!(
                    "from_date {} is after to_date {}",
                    from, to
                )));
            }
        }

        let state = self.store.read().await;
        let mut rows: Vec<Appointment> = state
            .appointments()
            .filter(|a| query.practitioner_id.map_or(true, |id| a.practitioner_id == id))
            .filter(|a| query.client_id.map_or(true, |id| a.client_id == id))
            .filter(|a| query.status.as_ref().map_or(true, |s| a.status == *s))
            .filter(|a| query.from_date.map_or(true, |d| a.appointment_date >= d))
            .filter(|a| query.to_date.map_or(true, |d| a.appointment_date <= d))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.appointment_date, a.start_time));

        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    /// Calendar-blocking appointments starting between now and the end of
    /// the look-ahead window.
    pub async fn upcoming_appointments(
        &self,
        query: UpcomingQuery,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let days = query.days.unwrap_or(DEFAULT_UPCOMING_DAYS);
        if days < 1 {
            return Err(AppointmentError::ValidationError(
                "Look-ahead must be at least one day".to_string(),
            ));
        }

        let now = self.clock.now();
        let horizon = now + Duration::days(days);
        let state = self.store.read().await;
        let mut rows: Vec<Appointment> = state
            .appointments()
            .filter(|a| a.status.blocks_calendar())
            .filter(|a| {
                let start = a.start_datetime();
                start >= now && start <= horizon
            })
            .filter(|a| query.practitioner_id.map_or(true, |id| a.practitioner_id == id))
            .filter(|a| query.client_id.map_or(true, |id| a.client_id == id))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.appointment_date, a.start_time));
        Ok(rows)
    }
}
