// libs/appointment-cell/src/services/notify.rs
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use shared_models::Appointment;

use crate::models::{AppointmentEvent, NotificationMode};

/// Delivery failure surfaced by a notifier. Callers log it and carry on,
/// committed appointment state is never rolled back over it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound sink for appointment lifecycle events. Concrete transports
/// (mail, push, queues) live behind this trait so the booking and
/// lifecycle services stay transport-agnostic.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        event: AppointmentEvent,
        appointment: &Appointment,
    ) -> Result<(), NotifyError>;
}

/// Hands `event` to the notifier after a state change has committed.
/// Failures are logged and swallowed; they never unwind the commit.
pub async fn dispatch(
    notifier: Arc<dyn Notifier>,
    mode: NotificationMode,
    event: AppointmentEvent,
    appointment: Appointment,
) {
    match mode {
        NotificationMode::Immediate => {
            if let Err(e) = notifier.notify(event, &appointment).await {
                warn!(
                    "Notification {} for appointment {} failed: {}",
                    event, appointment.id, e
                );
            }
        }
        NotificationMode::Deferred => {
            tokio::spawn(async move {
                if let Err(e) = notifier.notify(event, &appointment).await {
                    warn!(
                        "Notification {} for appointment {} failed: {}",
                        event, appointment.id, e
                    );
                }
            });
        }
    }
}

/// Default sink that announces events on the log stream only.
#[derive(Debug, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(
        &self,
        event: AppointmentEvent,
        appointment: &Appointment,
    ) -> Result<(), NotifyError> {
        info!(
            "Appointment event {}: appointment {} (client {}, practitioner {})",
            event, appointment.id, appointment.client_id, appointment.practitioner_id
        );
        Ok(())
    }
}

/// Test double that records every dispatched event and can be told to
/// fail, so best-effort delivery can be exercised end to end.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(AppointmentEvent, Uuid)>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<(AppointmentEvent, Uuid)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        event: AppointmentEvent,
        appointment: &Appointment,
    ) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push((event, appointment.id));
        if self.fail {
            return Err(NotifyError("recording notifier set to fail".to_string()));
        }
        Ok(())
    }
}
