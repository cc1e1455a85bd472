use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Duration;
use uuid::Uuid;

use appointment_cell::models::{AppointmentError, AppointmentEvent, TransitionRequest};
use appointment_cell::services::lifecycle::LifecycleService;
use appointment_cell::services::notify::RecordingNotifier;
use shared_config::SchedulingPolicy;
use shared_models::{AppointmentStatus, TransitionActor};
use shared_store::SchedulingStore;
use shared_utils::test_utils::{
    attachment, complete_practitioner, date, open_slot, scheduled_appointment, test_clock,
    test_location, time,
};
use shared_utils::FixedClock;

struct Fixture {
    store: Arc<SchedulingStore>,
    clock: Arc<FixedClock>,
    notifier: Arc<RecordingNotifier>,
    practitioner_id: Uuid,
    slot_id: Uuid,
    appointment_id: Uuid,
}

impl Fixture {
    fn service(&self) -> LifecycleService {
        LifecycleService::new(
            self.store.clone(),
            self.clock.clone(),
            self.notifier.clone(),
            SchedulingPolicy::default(),
        )
    }
}

fn to_status(target: AppointmentStatus, actor: TransitionActor) -> TransitionRequest {
    TransitionRequest {
        target_status: target,
        actor,
        reason: None,
    }
}

/// A scheduled appointment holding the only opening of its slot, booked
/// at the test epoch for 2026-01-12 09:00-10:00.
async fn booked_fixture() -> Fixture {
    let store = Arc::new(SchedulingStore::new());

    let practitioner = complete_practitioner();
    let practitioner_id = practitioner.id;
    let location = test_location(practitioner_id);
    let location_id = location.id;
    let slot = open_slot(
        practitioner_id,
        location_id,
        date(2026, 1, 12),
        time(9, 0),
        time(10, 0),
    );
    let slot_id = slot.id;
    let appointment = scheduled_appointment(
        Uuid::new_v4(),
        practitioner_id,
        location_id,
        slot_id,
        date(2026, 1, 12),
        time(9, 0),
        time(10, 0),
    );
    let appointment_id = appointment.id;

    {
        let mut state = store.write().await;
        state.insert_practitioner(practitioner).unwrap();
        state.insert_location(location).unwrap();
        state
            .attach_location(attachment(practitioner_id, location_id))
            .unwrap();
        state.insert_slots(vec![slot]).unwrap();
        let held = state.slot_mut(slot_id).unwrap();
        held.booked_count = 1;
        held.is_open = false;
        state.insert_appointment(appointment).unwrap();
    }

    Fixture {
        store,
        clock: test_clock(),
        notifier: Arc::new(RecordingNotifier::new()),
        practitioner_id,
        slot_id,
        appointment_id,
    }
}

#[tokio::test]
async fn no_show_releases_the_slot_hold() {
    let fixture = booked_fixture().await;
    let service = fixture.service();

    service
        .transition(
            fixture.appointment_id,
            to_status(AppointmentStatus::Confirmed, TransitionActor::Client),
        )
        .await
        .unwrap();
    let updated = service
        .transition(
            fixture.appointment_id,
            to_status(AppointmentStatus::NoShow, TransitionActor::Practitioner),
        )
        .await
        .unwrap();
    assert_eq!(updated.status, AppointmentStatus::NoShow);

    let state = fixture.store.read().await;
    let slot = state.slot(fixture.slot_id).unwrap();
    assert!(slot.is_open);
    assert_eq!(slot.booked_count, 0);
}

#[tokio::test]
async fn completion_increments_the_practitioner_counter() {
    let fixture = booked_fixture().await;
    let service = fixture.service();

    service
        .transition(
            fixture.appointment_id,
            to_status(AppointmentStatus::Confirmed, TransitionActor::Client),
        )
        .await
        .unwrap();
    service
        .transition(
            fixture.appointment_id,
            to_status(AppointmentStatus::InProgress, TransitionActor::Practitioner),
        )
        .await
        .unwrap();
    service
        .transition(
            fixture.appointment_id,
            to_status(AppointmentStatus::Completed, TransitionActor::Practitioner),
        )
        .await
        .unwrap();

    let state = fixture.store.read().await;
    let practitioner = state.practitioner(fixture.practitioner_id).unwrap();
    assert_eq!(practitioner.completed_appointments, 1);
    // The hold stays spent for completed visits
    assert!(!state.slot(fixture.slot_id).unwrap().is_open);
}

#[tokio::test]
async fn confirmed_completion_waits_for_the_end_time() {
    let fixture = booked_fixture().await;
    let service = fixture.service();

    service
        .transition(
            fixture.appointment_id,
            to_status(AppointmentStatus::Confirmed, TransitionActor::Client),
        )
        .await
        .unwrap();

    let premature = service
        .transition(
            fixture.appointment_id,
            to_status(AppointmentStatus::Completed, TransitionActor::Practitioner),
        )
        .await;
    assert_matches!(premature, Err(AppointmentError::BusinessRule(_)));

    // 2026-01-12 10:00, exactly the appointment end
    fixture.clock.advance(Duration::days(7) + Duration::hours(2));
    let finished = service
        .transition(
            fixture.appointment_id,
            to_status(AppointmentStatus::Completed, TransitionActor::Practitioner),
        )
        .await
        .unwrap();
    assert_eq!(finished.status, AppointmentStatus::Completed);
}

#[tokio::test]
async fn terminal_appointments_reject_further_transitions() {
    let fixture = booked_fixture().await;
    let service = fixture.service();

    service
        .transition(
            fixture.appointment_id,
            TransitionRequest {
                target_status: AppointmentStatus::Cancelled,
                actor: TransitionActor::Client,
                reason: Some("client called in".to_string()),
            },
        )
        .await
        .unwrap();

    assert_matches!(
        service
            .transition(
                fixture.appointment_id,
                to_status(AppointmentStatus::Confirmed, TransitionActor::Client),
            )
            .await,
        Err(AppointmentError::InvalidTransition { .. })
    );
}

#[tokio::test]
async fn manual_expiry_before_the_window_closes_is_rejected() {
    let fixture = booked_fixture().await;
    fixture.clock.advance(Duration::hours(1));

    assert_matches!(
        fixture
            .service()
            .transition(
                fixture.appointment_id,
                to_status(AppointmentStatus::Expired, TransitionActor::System),
            )
            .await,
        Err(AppointmentError::BusinessRule(_))
    );
}

#[tokio::test]
async fn sweep_skips_rows_at_exactly_the_window_edge() {
    let fixture = booked_fixture().await;
    fixture.clock.advance(Duration::hours(24));

    let report = fixture.service().expire_overdue().await.unwrap();
    assert_eq!(report.expired, 0);
}

#[tokio::test]
async fn sweep_expires_unconfirmed_rows_and_spares_confirmed_ones() {
    let fixture = booked_fixture().await;
    let service = fixture.service();

    // A second held booking on the same day, confirmed right away
    let confirmed_id = {
        let mut state = fixture.store.write().await;
        let practitioner = state.practitioner(fixture.practitioner_id).unwrap();
        let location_id = state.list_locations()[0].id;
        let slot = open_slot(
            practitioner.id,
            location_id,
            date(2026, 1, 12),
            time(11, 0),
            time(12, 0),
        );
        let slot_id = slot.id;
        state.insert_slots(vec![slot]).unwrap();
        let held = state.slot_mut(slot_id).unwrap();
        held.booked_count = 1;
        held.is_open = false;
        let appointment = scheduled_appointment(
            Uuid::new_v4(),
            practitioner.id,
            location_id,
            slot_id,
            date(2026, 1, 12),
            time(11, 0),
            time(12, 0),
        );
        let id = appointment.id;
        state.insert_appointment(appointment).unwrap();
        id
    };
    service
        .transition(
            confirmed_id,
            to_status(AppointmentStatus::Confirmed, TransitionActor::Client),
        )
        .await
        .unwrap();

    fixture.clock.advance(Duration::hours(25));
    let report = service.expire_overdue().await.unwrap();
    assert_eq!(report.expired, 1);

    let state = fixture.store.read().await;
    assert_eq!(
        state.appointment(fixture.appointment_id).unwrap().status,
        AppointmentStatus::Expired
    );
    assert_eq!(
        state.appointment(confirmed_id).unwrap().status,
        AppointmentStatus::Confirmed
    );
    // The expired hold is back on the market
    assert!(state.slot(fixture.slot_id).unwrap().is_open);
}

#[tokio::test]
async fn transitions_announce_their_event_in_the_background() {
    let fixture = booked_fixture().await;

    fixture
        .service()
        .transition(
            fixture.appointment_id,
            to_status(AppointmentStatus::Confirmed, TransitionActor::Client),
        )
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let events = fixture.notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0], (AppointmentEvent::Confirmed, fixture.appointment_id));
}
