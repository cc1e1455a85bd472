// libs/shared/store/src/store.rs
use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use shared_models::{Appointment, AvailabilitySlot, Location, Practitioner, PractitionerLocation};

use crate::error::StoreError;

/// In-process relational state for the scheduling domain.
///
/// All tables live behind one `RwLock`. A `write()` guard spans an entire
/// check-then-mutate section, so every such section observes and produces a
/// consistent state. Services must not hold a guard across an `.await` that
/// leaves the store.
#[derive(Debug, Default)]
pub struct SchedulingStore {
    state: RwLock<StoreState>,
}

impl SchedulingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().await
    }
}

#[derive(Debug, Default)]
pub struct StoreState {
    practitioners: HashMap<Uuid, Practitioner>,
    locations: HashMap<Uuid, Location>,
    practitioner_locations: Vec<PractitionerLocation>,
    slots: HashMap<Uuid, AvailabilitySlot>,
    appointments: HashMap<Uuid, Appointment>,
}

// ==============================================================================
// PRACTITIONERS
// ==============================================================================

impl StoreState {
    pub fn insert_practitioner(&mut self, row: Practitioner) -> Result<Practitioner, StoreError> {
        if self.practitioners.contains_key(&row.id) {
            return Err(StoreError::DuplicateKey(format!("practitioner {}", row.id)));
        }
        if self
            .practitioners
            .values()
            .any(|p| p.email.eq_ignore_ascii_case(&row.email))
        {
            return Err(StoreError::DuplicateKey(format!(
                "practitioner email {}",
                row.email
            )));
        }
        self.practitioners.insert(row.id, row.clone());
        Ok(row)
    }

    pub fn practitioner(&self, id: Uuid) -> Option<Practitioner> {
        self.practitioners.get(&id).cloned()
    }

    pub fn practitioner_mut(&mut self, id: Uuid) -> Result<&mut Practitioner, StoreError> {
        self.practitioners
            .get_mut(&id)
            .ok_or_else(|| StoreError::MissingRow(format!("practitioner {id}")))
    }
}

// ==============================================================================
// LOCATIONS
// ==============================================================================

impl StoreState {
    pub fn insert_location(&mut self, row: Location) -> Result<Location, StoreError> {
        if self.locations.contains_key(&row.id) {
            return Err(StoreError::DuplicateKey(format!("location {}", row.id)));
        }
        self.locations.insert(row.id, row.clone());
        Ok(row)
    }

    pub fn location(&self, id: Uuid) -> Option<Location> {
        self.locations.get(&id).cloned()
    }

    pub fn list_locations(&self) -> Vec<Location> {
        let mut rows: Vec<_> = self.locations.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    /// Unique per (practitioner, location) pair.
    pub fn attach_location(
        &mut self,
        row: PractitionerLocation,
    ) -> Result<PractitionerLocation, StoreError> {
        if self
            .practitioner_locations
            .iter()
            .any(|pl| pl.practitioner_id == row.practitioner_id && pl.location_id == row.location_id)
        {
            return Err(StoreError::DuplicateKey(format!(
                "practitioner {} already attached to location {}",
                row.practitioner_id, row.location_id
            )));
        }
        self.practitioner_locations.push(row.clone());
        Ok(row)
    }

    pub fn detach_location(
        &mut self,
        practitioner_id: Uuid,
        location_id: Uuid,
    ) -> Result<(), StoreError> {
        let before = self.practitioner_locations.len();
        self.practitioner_locations
            .retain(|pl| !(pl.practitioner_id == practitioner_id && pl.location_id == location_id));
        if self.practitioner_locations.len() == before {
            return Err(StoreError::MissingRow(format!(
                "practitioner {} not attached to location {}",
                practitioner_id, location_id
            )));
        }
        Ok(())
    }

    pub fn practitioner_has_locations(&self, practitioner_id: Uuid) -> bool {
        self.practitioner_locations
            .iter()
            .any(|pl| pl.practitioner_id == practitioner_id)
    }

    pub fn is_location_attached(&self, practitioner_id: Uuid, location_id: Uuid) -> bool {
        self.practitioner_locations
            .iter()
            .any(|pl| pl.practitioner_id == practitioner_id && pl.location_id == location_id)
    }

    pub fn locations_for_practitioner(&self, practitioner_id: Uuid) -> Vec<Location> {
        let mut rows: Vec<_> = self
            .practitioner_locations
            .iter()
            .filter(|pl| pl.practitioner_id == practitioner_id)
            .filter_map(|pl| self.locations.get(&pl.location_id).cloned())
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }
}

// ==============================================================================
// AVAILABILITY SLOTS
// ==============================================================================

impl StoreState {
    /// Persists a batch of slots all-or-nothing. The batch plus every
    /// already-persisted slot for the same (practitioner, location, date)
    /// key must be pairwise non-overlapping; on violation nothing is
    /// written and the offending pair is reported.
    pub fn insert_slots(
        &mut self,
        slots: Vec<AvailabilitySlot>,
    ) -> Result<Vec<AvailabilitySlot>, StoreError> {
        for slot in &slots {
            if self.slots.contains_key(&slot.id) {
                return Err(StoreError::DuplicateKey(format!("slot {}", slot.id)));
            }
        }

        let mut by_key: HashMap<(Uuid, Uuid, NaiveDate), Vec<(NaiveTime, NaiveTime)>> =
            HashMap::new();
        for slot in &slots {
            by_key
                .entry((slot.practitioner_id, slot.location_id, slot.slot_date))
                .or_default()
                .push((slot.start_time, slot.end_time));
        }

        // Sort then scan adjacent pairs; ranges are half-open so touching
        // boundaries do not conflict.
        for ((practitioner_id, location_id, date), mut ranges) in by_key {
            for existing in self.slots.values() {
                if existing.practitioner_id == practitioner_id
                    && existing.location_id == location_id
                    && existing.slot_date == date
                {
                    ranges.push((existing.start_time, existing.end_time));
                }
            }
            ranges.sort_by_key(|r| r.0);
            for pair in ranges.windows(2) {
                if pair[1].0 < pair[0].1 {
                    return Err(StoreError::SlotOverlap {
                        first_start: pair[0].0,
                        first_end: pair[0].1,
                        second_start: pair[1].0,
                        second_end: pair[1].1,
                    });
                }
            }
        }

        let mut inserted = slots;
        inserted.sort_by_key(|s| (s.slot_date, s.start_time));
        for slot in &inserted {
            self.slots.insert(slot.id, slot.clone());
        }
        Ok(inserted)
    }

    pub fn slot(&self, id: Uuid) -> Option<AvailabilitySlot> {
        self.slots.get(&id).cloned()
    }

    pub fn slot_mut(&mut self, id: Uuid) -> Result<&mut AvailabilitySlot, StoreError> {
        self.slots
            .get_mut(&id)
            .ok_or_else(|| StoreError::MissingRow(format!("slot {id}")))
    }

    pub fn slots_for_day(
        &self,
        practitioner_id: Uuid,
        location_id: Uuid,
        date: NaiveDate,
    ) -> Vec<AvailabilitySlot> {
        let mut rows: Vec<_> = self
            .slots
            .values()
            .filter(|s| {
                s.practitioner_id == practitioner_id
                    && s.location_id == location_id
                    && s.slot_date == date
            })
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.start_time);
        rows
    }

    pub fn practitioner_has_slots(&self, practitioner_id: Uuid) -> bool {
        self.slots
            .values()
            .any(|s| s.practitioner_id == practitioner_id)
    }
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

impl StoreState {
    pub fn insert_appointment(&mut self, row: Appointment) -> Result<Appointment, StoreError> {
        if self.appointments.contains_key(&row.id) {
            return Err(StoreError::DuplicateKey(format!("appointment {}", row.id)));
        }
        self.appointments.insert(row.id, row.clone());
        Ok(row)
    }

    pub fn appointment(&self, id: Uuid) -> Option<Appointment> {
        self.appointments.get(&id).cloned()
    }

    pub fn appointment_mut(&mut self, id: Uuid) -> Result<&mut Appointment, StoreError> {
        self.appointments
            .get_mut(&id)
            .ok_or_else(|| StoreError::MissingRow(format!("appointment {id}")))
    }

    pub fn appointments(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.values()
    }
}
