// libs/appointment-cell/src/services/lifecycle.rs
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::SchedulingPolicy;
use shared_models::{Appointment, AppointmentStatus, TransitionActor};
use shared_store::{SchedulingStore, StoreState};
use shared_utils::Clock;

use crate::models::{
    AppointmentError, AppointmentEvent, ExpirySweepReport, NotificationMode, TransitionRequest,
};
use crate::services::notify::{self, Notifier};

/// Drives appointments through their lifecycle. Each transition commits
/// together with its slot and counter effects under one store guard.
pub struct LifecycleService {
    store: Arc<SchedulingStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    policy: SchedulingPolicy,
}

impl LifecycleService {
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

    /// Statuses reachable from `status` in one step. Cancellation and
    /// no-show exit every non-terminal status; expiry only leaves
    /// `Scheduled`.
    pub fn valid_transitions(status: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match status {
            AppointmentStatus::Scheduled => vec![
                AppointmentStatus::Confirmed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
                AppointmentStatus::Expired,
            ],
            AppointmentStatus::Confirmed => vec![
                AppointmentStatus::InProgress,
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            AppointmentStatus::InProgress => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            AppointmentStatus::Completed
            | AppointmentStatus::Cancelled
            | AppointmentStatus::NoShow
            | AppointmentStatus::Expired => vec![],
        }
    }

    fn validate_transition(
        current: &AppointmentStatus,
        target: &AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition {} -> {}", current, target);
        if Self::valid_transitions(current).contains(target) {
            Ok(())
        } else {
            warn!("Rejected status transition {} -> {}", current, target);
            Err(AppointmentError::InvalidTransition {
                from: current.clone(),
                to: target.clone(),
            })
        }
    }

    /// Moves one appointment to `request.target_status` and announces the
    /// outcome once the write has committed.
    pub async fn transition(
        &self,
        appointment_id: Uuid,
        request: TransitionRequest,
    ) -> Result<Appointment, AppointmentError> {
        let now = self.clock.now();
        let mut state = self.store.write().await;
        let updated =
            Self::apply_transition_in(&mut state, appointment_id, &request, now, &self.policy)?;
        drop(state);

        info!(
            "Appointment {} moved to {} by {}",
            updated.id, updated.status, request.actor
        );
        if updated.status == AppointmentStatus::Cancelled && updated.fee > 0.0 {
            info!(
                "Cancelled appointment {} carries a fee of {:.2}, flagging for refund review",
                updated.id, updated.fee
            );
        }

        notify::dispatch(
            Arc::clone(&self.notifier),
            NotificationMode::Deferred,
            AppointmentEvent::for_status(&updated.status),
            updated.clone(),
        )
        .await;
        Ok(updated)
    }

    /// Expires scheduled appointments that outlived the confirmation
    /// window. The scan and every expiry commit in one atomic section, so
    /// re-running the sweep is harmless.
    pub async fn expire_overdue(&self) -> Result<ExpirySweepReport, AppointmentError> {
        let now = self.clock.now();
        let cutoff = now - Duration::hours(self.policy.expiry_hours);

        let mut state = self.store.write().await;
        let overdue: Vec<Uuid> = state
            .appointments()
            .filter(|a| a.status == AppointmentStatus::Scheduled && a.created_at < cutoff)
            .map(|a| a.id)
            .collect();

        let request = TransitionRequest {
            target_status: AppointmentStatus::Expired,
            actor: TransitionActor::System,
            reason: Some("confirmation window elapsed".to_string()),
        };
        let mut expired = Vec::with_capacity(overdue.len());
        for id in overdue {
            match Self::apply_transition_in(&mut state, id, &request, now, &self.policy) {
                Ok(row) => expired.push(row),
                Err(e) => warn!("Skipping appointment {} during expiry sweep: {}", id, e),
            }
        }
        drop(state);

        if !expired.is_empty() {
            info!("Expiry sweep moved {} appointments to expired", expired.len());
        }
        for row in expired.iter().cloned() {
            notify::dispatch(
                Arc::clone(&self.notifier),
                NotificationMode::Deferred,
                AppointmentEvent::Expired,
                row,
            )
            .await;
        }

        Ok(ExpirySweepReport {
            expired: expired.len(),
        })
    }

    /// Validates and applies one transition on an already-held guard.
    /// Shared by single transitions and the sweep so both commit the
    /// status change and its side effects atomically.
    fn apply_transition_in(
        state: &mut StoreState,
        appointment_id: Uuid,
        request: &TransitionRequest,
        now: DateTime<Utc>,
        policy: &SchedulingPolicy,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = state
            .appointment(appointment_id)
            .ok_or(AppointmentError::NotFound)?;
        let target = request.target_status.clone();
        Self::validate_transition(&appointment.status, &target)?;

        match target {
            AppointmentStatus::Expired => {
                let eligible_at = appointment.created_at + Duration::hours(policy.expiry_hours);
                if now <= eligible_at {
                    return Err(AppointmentError::BusinessRule(format!(
                        "Appointment is not eligible to expire until {}",
                        eligible_at
                    )));
                }
            }
            AppointmentStatus::Completed
                if appointment.status == AppointmentStatus::Confirmed =>
            {
                // Skipping in_progress is only allowed once the booked time
                // range has passed.
                let end = appointment
                    .appointment_date
                    .and_time(appointment.end_time)
                    .and_utc();
                if now < end {
                    return Err(AppointmentError::BusinessRule(
                        "Appointment has not finished yet".to_string(),
                    ));
                }
            }
            _ => {}
        }

        if matches!(
            target,
            AppointmentStatus::Cancelled | AppointmentStatus::NoShow | AppointmentStatus::Expired
        ) {
            if let Some(slot_id) = appointment.slot_id {
                Self::release_slot_in(state, slot_id, now)?;
            }
        }
        if target == AppointmentStatus::Completed {
            let practitioner = state
                .practitioner_mut(appointment.practitioner_id)
                .map_err(|e| AppointmentError::StorageError(e.to_string()))?;
            practitioner.completed_appointments += 1;
            practitioner.updated_at = now;
        }

        let row = state
            .appointment_mut(appointment_id)
            .map_err(|e| AppointmentError::StorageError(e.to_string()))?;
        row.status = target.clone();
        row.updated_at = now;
        if target == AppointmentStatus::Cancelled {
            row.cancelled_by = Some(request.actor.clone());
            row.cancellation_reason = request.reason.clone();
        }
        Ok(row.clone())
    }

    /// Returns one booking of capacity to the slot. The slot reopens as
    /// soon as it has spare capacity again.
    fn release_slot_in(
        state: &mut StoreState,
        slot_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), AppointmentError> {
        let slot = state
            .slot_mut(slot_id)
            .map_err(|e| AppointmentError::StorageError(e.to_string()))?;
        if slot.booked_count > 0 {
            slot.booked_count -= 1;
        }
        if slot.has_capacity() {
            slot.is_open = true;
        }
        slot.updated_at = now;
        Ok(())
    }
}
