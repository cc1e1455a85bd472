// libs/availability-cell/src/services/slots.rs
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use chrono::NaiveDate;

use practitioner_cell::services::onboarding::OnboardingService;
use shared_models::AvailabilitySlot;
use shared_store::{SchedulingStore, StoreError};
use shared_utils::Clock;

use crate::models::{
    AvailabilityError, CreateSlotsRequest, GenerateSlotsRequest, GeneratorSettings,
};
use crate::services::generator::SlotSequence;

pub struct AvailabilityService {
    store: Arc<SchedulingStore>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
    pub fn new(store: Arc<SchedulingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Persist a batch of slots for one practitioner, location and day.
    /// The whole batch commits or none of it does; a practitioner without
    /// an attached location cannot publish at all.
    pub async fn create_slots(
        &self,
        practitioner_id: Uuid,
        request: CreateSlotsRequest,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityError> {
        debug!(
            "Creating {} slots for practitioner {} on {}",
            request.slots.len(),
            practitioner_id,
            request.date
        );

        if request.slots.is_empty() {
            return Err(AvailabilityError::ValidationError(
                "At least one slot is required".to_string(),
            ));
        }
        for window in &request.slots {
            if window.start_time >= window.end_time {
                return Err(AvailabilityError::ValidationError(format!(
                    "Slot start {} must be before end {}",
                    window.start_time, window.end_time
                )));
            }
        }
        let max_bookings = request.max_bookings.unwrap_or(1);
        if max_bookings < 1 {
            return Err(AvailabilityError::ValidationError(
                "Slot capacity must be at least 1".to_string(),
            ));
        }

        let now = self.clock.now();
        let mut state = self.store.write().await;

        if state.practitioner(practitioner_id).is_none() {
            return Err(AvailabilityError::PractitionerNotFound);
        }
        if !state.practitioner_has_locations(practitioner_id) {
            return Err(AvailabilityError::OnboardingIncomplete(
                "Attach a practice location before publishing availability".to_string(),
            ));
        }
        if state.location(request.location_id).is_none() {
            return Err(AvailabilityError::LocationNotFound);
        }
        if !state.is_location_attached(practitioner_id, request.location_id) {
            return Err(AvailabilityError::LocationNotAttached);
        }

        let rows: Vec<AvailabilitySlot> = request
            .slots
            .iter()
            .map(|window| AvailabilitySlot {
                id: Uuid::new_v4(),
                practitioner_id,
                location_id: request.location_id,
                slot_date: request.date,
                start_time: window.start_time,
                end_time: window.end_time,
                is_open: true,
                max_bookings,
                booked_count: 0,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let inserted = state.insert_slots(rows).map_err(|e| match e {
            StoreError::SlotOverlap {
                first_start,
                first_end,
                second_start,
                second_end,
            } => AvailabilityError::SlotConflict {
                first_start,
                first_end,
                second_start,
                second_end,
            },
            other => AvailabilityError::StorageError(other.to_string()),
        })?;

        OnboardingService::refresh_in(&mut state, practitioner_id, now)
            .map_err(|e| AvailabilityError::StorageError(e.to_string()))?;

        info!(
            "Published {} slots for practitioner {} on {}",
            inserted.len(),
            practitioner_id,
            request.date
        );
        Ok(inserted)
    }

    /// Generate a day's slots from a shift description, then persist them
    /// through the same path as explicitly supplied windows.
    pub async fn generate_slots(
        &self,
        practitioner_id: Uuid,
        request: GenerateSlotsRequest,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityError> {
        let settings = GeneratorSettings {
            start_hour: request.start_hour,
            end_hour: request.end_hour,
            slot_minutes: request.slot_minutes,
            break_hours: request.break_hours.unwrap_or_default(),
        };
        let windows = SlotSequence::collect_windows(&settings)?;
        if windows.is_empty() {
            debug!(
                "Shift {}-{} too short for {}-minute slots, nothing to publish",
                request.start_hour, request.end_hour, request.slot_minutes
            );
            return Ok(Vec::new());
        }

        self.create_slots(
            practitioner_id,
            CreateSlotsRequest {
                location_id: request.location_id,
                date: request.date,
                slots: windows,
                max_bookings: request.max_bookings,
            },
        )
        .await
    }

    /// Open slots for a practitioner, location and day, ascending by start.
    pub async fn list_open_slots(
        &self,
        practitioner_id: Uuid,
        location_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityError> {
        let state = self.store.read().await;
        if state.practitioner(practitioner_id).is_none() {
            return Err(AvailabilityError::PractitionerNotFound);
        }
        Ok(state
            .slots_for_day(practitioner_id, location_id, date)
            .into_iter()
            .filter(|s| s.is_open)
            .collect())
    }

    /// Withdraw a slot from sale. Closing an already-closed slot is a no-op.
    pub async fn close_slot(&self, slot_id: Uuid) -> Result<AvailabilitySlot, AvailabilityError> {
        let now = self.clock.now();
        let mut state = self.store.write().await;
        let slot = state
            .slot_mut(slot_id)
            .map_err(|_| AvailabilityError::SlotNotFound)?;
        if slot.is_open {
            slot.is_open = false;
            slot.updated_at = now;
        }
        Ok(slot.clone())
    }

    /// Put a withdrawn slot back on sale, provided capacity remains.
    /// Reopening an open slot is a no-op.
    pub async fn reopen_slot(&self, slot_id: Uuid) -> Result<AvailabilitySlot, AvailabilityError> {
        let now = self.clock.now();
        let mut state = self.store.write().await;
        let slot = state
            .slot_mut(slot_id)
            .map_err(|_| AvailabilityError::SlotNotFound)?;
        let reopen = slot.has_capacity();
        if reopen && !slot.is_open {
            slot.is_open = true;
            slot.updated_at = now;
        }
        Ok(slot.clone())
    }
}
