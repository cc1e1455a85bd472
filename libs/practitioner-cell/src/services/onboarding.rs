// libs/practitioner-cell/src/services/onboarding.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use shared_models::Practitioner;
use shared_store::{SchedulingStore, StoreError, StoreState};

use crate::models::{OnboardingStatus, OnboardingStep, PractitionerError};

/// Derives practitioner readiness from live state. The three checks run in
/// a fixed order; `next_step` is the first one that fails.
pub struct OnboardingService {
    store: Arc<SchedulingStore>,
}

impl OnboardingService {
    pub fn new(store: Arc<SchedulingStore>) -> Self {
        Self { store }
    }

    pub async fn compute_status(
        &self,
        practitioner_id: Uuid,
    ) -> Result<OnboardingStatus, PractitionerError> {
        let state = self.store.read().await;
        let practitioner = state
            .practitioner(practitioner_id)
            .ok_or(PractitionerError::NotFound)?;
        Ok(Self::status_in(&state, &practitioner))
    }

    /// Pure readiness computation over an already-held guard.
    pub fn status_in(state: &StoreState, practitioner: &Practitioner) -> OnboardingStatus {
        let profile_completed = practitioner.has_complete_profile();
        let locations_attached = state.practitioner_has_locations(practitioner.id);
        let availability_published = state.practitioner_has_slots(practitioner.id);

        let next_step = if !profile_completed {
            OnboardingStep::CompleteProfile
        } else if !locations_attached {
            OnboardingStep::AttachLocation
        } else if !availability_published {
            OnboardingStep::PublishAvailability
        } else {
            OnboardingStep::Complete
        };

        OnboardingStatus {
            profile_completed,
            locations_attached,
            availability_published,
            next_step,
        }
    }

    /// Recomputes the derived flags and persists them on the practitioner
    /// row. Mutating services call this inside their own write guard so the
    /// flags commit with the write that changed them.
    pub fn refresh_in(
        state: &mut StoreState,
        practitioner_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<OnboardingStatus, StoreError> {
        let practitioner = state
            .practitioner(practitioner_id)
            .ok_or_else(|| StoreError::MissingRow(format!("practitioner {practitioner_id}")))?;
        let status = Self::status_in(state, &practitioner);

        let row = state.practitioner_mut(practitioner_id)?;
        row.profile_complete = status.profile_completed;
        row.locations_attached = status.locations_attached;
        row.availability_published = status.availability_published;
        row.updated_at = now;

        debug!(
            "Onboarding flags refreshed for {}: next step {}",
            practitioner_id, status.next_step
        );
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_utils::test_utils::{
        attachment, complete_practitioner, date, draft_practitioner, open_slot, test_epoch,
        test_location, time,
    };

    #[test]
    fn next_step_is_the_first_incomplete_one() {
        let mut state = StoreState::default();

        // Locations attached but the profile is still empty: the checklist
        // points at the profile, not the next missing step.
        let practitioner = draft_practitioner();
        let practitioner_id = practitioner.id;
        state.insert_practitioner(practitioner.clone()).unwrap();
        let location = test_location(practitioner_id);
        let location_id = location.id;
        state.insert_location(location).unwrap();
        state
            .attach_location(attachment(practitioner_id, location_id))
            .unwrap();

        let status = OnboardingService::status_in(&state, &practitioner);
        assert!(!status.profile_completed);
        assert!(status.locations_attached);
        assert_eq!(status.next_step, OnboardingStep::CompleteProfile);
    }

    #[test]
    fn checklist_completes_once_slots_exist() {
        let mut state = StoreState::default();
        let practitioner = complete_practitioner();
        let practitioner_id = practitioner.id;
        state.insert_practitioner(practitioner.clone()).unwrap();
        let location = test_location(practitioner_id);
        let location_id = location.id;
        state.insert_location(location).unwrap();
        state
            .attach_location(attachment(practitioner_id, location_id))
            .unwrap();

        let before = OnboardingService::status_in(&state, &practitioner);
        assert_eq!(before.next_step, OnboardingStep::PublishAvailability);

        state
            .insert_slots(vec![open_slot(
                practitioner_id,
                location_id,
                date(2026, 1, 12),
                time(9, 0),
                time(10, 0),
            )])
            .unwrap();
        let after = OnboardingService::status_in(&state, &practitioner);
        assert_eq!(after.next_step, OnboardingStep::Complete);
    }

    #[test]
    fn refresh_persists_the_derived_flags() {
        let mut state = StoreState::default();
        let practitioner = complete_practitioner();
        let practitioner_id = practitioner.id;
        let mut unrefreshed = practitioner.clone();
        unrefreshed.profile_complete = false;
        unrefreshed.locations_attached = false;
        state.insert_practitioner(unrefreshed).unwrap();
        let location = test_location(practitioner_id);
        let location_id = location.id;
        state.insert_location(location).unwrap();
        state
            .attach_location(attachment(practitioner_id, location_id))
            .unwrap();

        OnboardingService::refresh_in(&mut state, practitioner_id, test_epoch()).unwrap();

        let row = state.practitioner(practitioner_id).unwrap();
        assert!(row.profile_complete);
        assert!(row.locations_attached);
        assert!(!row.availability_published);
    }
}
