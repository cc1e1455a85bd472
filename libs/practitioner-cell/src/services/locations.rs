// libs/practitioner-cell/src/services/locations.rs
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use shared_models::{Location, PractitionerLocation};
use shared_store::{SchedulingStore, StoreError};
use shared_utils::Clock;

use crate::models::{CreateLocationRequest, PractitionerError};
use crate::services::onboarding::OnboardingService;

pub struct LocationService {
    store: Arc<SchedulingStore>,
    clock: Arc<dyn Clock>,
}

impl LocationService {
    pub fn new(store: Arc<SchedulingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn create_location(
        &self,
        request: CreateLocationRequest,
    ) -> Result<Location, PractitionerError> {
        debug!("Creating location: {}", request.name);

        if request.name.trim().is_empty() {
            return Err(PractitionerError::ValidationError(
                "Location name is required".to_string(),
            ));
        }
        if request.address.trim().is_empty() {
            return Err(PractitionerError::ValidationError(
                "Location address is required".to_string(),
            ));
        }

        let row = Location {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            address: request.address.trim().to_string(),
            city: request.city,
            phone: request.phone,
            created_by: request.created_by,
            created_at: self.clock.now(),
        };

        let mut state = self.store.write().await;
        state
            .insert_location(row)
            .map_err(|e| PractitionerError::StorageError(e.to_string()))
    }

    pub async fn get_location(&self, location_id: Uuid) -> Result<Location, PractitionerError> {
        let state = self.store.read().await;
        state
            .location(location_id)
            .ok_or(PractitionerError::LocationNotFound)
    }

    pub async fn list_locations(&self) -> Vec<Location> {
        let state = self.store.read().await;
        state.list_locations()
    }

    /// Associate a practitioner with a location. The join is unique per
    /// pair; the onboarding flags commit in the same transaction.
    pub async fn attach(
        &self,
        practitioner_id: Uuid,
        location_id: Uuid,
    ) -> Result<PractitionerLocation, PractitionerError> {
        let now = self.clock.now();
        let mut state = self.store.write().await;

        if state.practitioner(practitioner_id).is_none() {
            return Err(PractitionerError::NotFound);
        }
        if state.location(location_id).is_none() {
            return Err(PractitionerError::LocationNotFound);
        }

        let row = PractitionerLocation {
            id: Uuid::new_v4(),
            practitioner_id,
            location_id,
            created_at: now,
        };
        let attached = state.attach_location(row).map_err(|e| match e {
            StoreError::DuplicateKey(_) => PractitionerError::AlreadyAttached,
            other => PractitionerError::StorageError(other.to_string()),
        })?;

        OnboardingService::refresh_in(&mut state, practitioner_id, now)
            .map_err(|e| PractitionerError::StorageError(e.to_string()))?;

        info!(
            "Location {} attached to practitioner {}",
            location_id, practitioner_id
        );
        Ok(attached)
    }

    pub async fn detach(
        &self,
        practitioner_id: Uuid,
        location_id: Uuid,
    ) -> Result<(), PractitionerError> {
        let now = self.clock.now();
        let mut state = self.store.write().await;

        if state.practitioner(practitioner_id).is_none() {
            return Err(PractitionerError::NotFound);
        }

        state
            .detach_location(practitioner_id, location_id)
            .map_err(|e| match e {
                StoreError::MissingRow(_) => PractitionerError::NotAttached,
                other => PractitionerError::StorageError(other.to_string()),
            })?;

        OnboardingService::refresh_in(&mut state, practitioner_id, now)
            .map_err(|e| PractitionerError::StorageError(e.to_string()))?;

        info!(
            "Location {} detached from practitioner {}",
            location_id, practitioner_id
        );
        Ok(())
    }

    pub async fn list_for_practitioner(
        &self,
        practitioner_id: Uuid,
    ) -> Result<Vec<Location>, PractitionerError> {
        let state = self.store.read().await;
        if state.practitioner(practitioner_id).is_none() {
            return Err(PractitionerError::NotFound);
        }
        Ok(state.locations_for_practitioner(practitioner_id))
    }
}
