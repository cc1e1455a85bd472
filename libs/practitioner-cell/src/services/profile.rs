// libs/practitioner-cell/src/services/profile.rs
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use shared_models::Practitioner;
use shared_store::SchedulingStore;
use shared_utils::Clock;

use crate::models::{PractitionerError, RegisterPractitionerRequest, UpdateProfileRequest};
use crate::services::onboarding::OnboardingService;

pub struct PractitionerProfileService {
    store: Arc<SchedulingStore>,
    clock: Arc<dyn Clock>,
}

impl PractitionerProfileService {
    pub fn new(store: Arc<SchedulingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Register a new practitioner. The profile starts empty; onboarding
    /// tracks what still has to happen before availability can go live.
    pub async fn register(
        &self,
        request: RegisterPractitionerRequest,
    ) -> Result<Practitioner, PractitionerError> {
        debug!("Registering practitioner: {}", request.email);

        if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
            return Err(PractitionerError::ValidationError(
                "First and last name are required".to_string(),
            ));
        }
        if !request.email.contains('@') {
            return Err(PractitionerError::ValidationError(format!(
                "Invalid email address: {}",
                request.email
            )));
        }

        let now = self.clock.now();
        let row = Practitioner {
            id: Uuid::new_v4(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
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
            created_at: now,
            updated_at: now,
        };

        let mut state = self.store.write().await;
        let created = state
            .insert_practitioner(row)
            .map_err(|e| PractitionerError::AlreadyRegistered(e.to_string()))?;

        info!("Practitioner registered with ID: {}", created.id);
        Ok(created)
    }

    pub async fn get(&self, practitioner_id: Uuid) -> Result<Practitioner, PractitionerError> {
        let state = self.store.read().await;
        state
            .practitioner(practitioner_id)
            .ok_or(PractitionerError::NotFound)
    }

    /// Apply profile edits and recompute the onboarding flags in the same
    /// store transaction.
    pub async fn update_profile(
        &self,
        practitioner_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<Practitioner, PractitionerError> {
        debug!("Updating practitioner profile: {}", practitioner_id);

        if let Some(experience) = request.years_experience {
            if experience < 0 {
                return Err(PractitionerError::ValidationError(
                    "Years of experience cannot be negative".to_string(),
                ));
            }
        }
        if let Some(fee) = request.consultation_fee {
            if fee < 0.0 {
                return Err(PractitionerError::ValidationError(
                    "Consultation fee cannot be negative".to_string(),
                ));
            }
        }

        let now = self.clock.now();
        let mut state = self.store.write().await;
        {
            let row = state
                .practitioner_mut(practitioner_id)
                .map_err(|_| PractitionerError::NotFound)?;

            if let Some(specialty) = request.specialty {
                row.specialty = Some(specialty);
            }
            if let Some(bio) = request.bio {
                row.bio = Some(bio);
            }
            if let Some(license_number) = request.license_number {
                row.license_number = Some(license_number);
            }
            if let Some(experience) = request.years_experience {
                row.years_experience = Some(experience);
            }
            if let Some(fee) = request.consultation_fee {
                row.consultation_fee = fee;
            }
            row.updated_at = now;
        }

        OnboardingService::refresh_in(&mut state, practitioner_id, now)
            .map_err(|e| PractitionerError::StorageError(e.to_string()))?;

        state
            .practitioner(practitioner_id)
            .ok_or(PractitionerError::NotFound)
    }

    /// Deactivated practitioners keep their record but can no longer be
    /// booked. Calling this twice is harmless.
    pub async fn deactivate(&self, practitioner_id: Uuid) -> Result<Practitioner, PractitionerError> {
        let now = self.clock.now();
        let mut state = self.store.write().await;
        let row = state
            .practitioner_mut(practitioner_id)
            .map_err(|_| PractitionerError::NotFound)?;
        row.is_active = false;
        row.updated_at = now;
        let snapshot = row.clone();
        info!("Practitioner deactivated: {}", practitioner_id);
        Ok(snapshot)
    }
}
