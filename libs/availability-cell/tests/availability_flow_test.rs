use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use availability_cell::router::{availability_routes, AvailabilityCellState};
use shared_store::SchedulingStore;
use shared_utils::test_utils::{attachment, complete_practitioner, test_clock, test_location};

struct Seed {
    practitioner_id: Uuid,
    location_id: Uuid,
}

async fn seeded_app() -> (Router, Arc<SchedulingStore>, Seed) {
    let store = Arc::new(SchedulingStore::new());

    let practitioner = complete_practitioner();
    let practitioner_id = practitioner.id;
    let location = test_location(practitioner_id);
    let location_id = location.id;
    {
        let mut state = store.write().await;
        state.insert_practitioner(practitioner).unwrap();
        state.insert_location(location).unwrap();
        state
            .attach_location(attachment(practitioner_id, location_id))
            .unwrap();
    }

    let state = AvailabilityCellState {
        store: store.clone(),
        clock: test_clock(),
    };
    (
        availability_routes(state),
        store,
        Seed {
            practitioner_id,
            location_id,
        },
    )
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn patch(uri: &str) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn generated_morning_shift_lists_in_order() {
    let (app, _store, seed) = seeded_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/{}/slots/generate", seed.practitioner_id),
            json!({
                "location_id": seed.location_id,
                "date": "2026-01-12",
                "start_hour": 9,
                "end_hour": 12,
                "slot_minutes": 60
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["slots"][0]["start_time"], "09:00:00");
    assert_eq!(body["slots"][2]["end_time"], "12:00:00");

    let listed = json_body(
        app.oneshot(get(&format!(
            "/{}/slots?location_id={}&date=2026-01-12",
            seed.practitioner_id, seed.location_id
        )))
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(listed["total"], 3);
    assert_eq!(listed["slots"][1]["start_time"], "10:00:00");
}

#[tokio::test]
async fn publishing_without_a_location_is_unprocessable() {
    let store = Arc::new(SchedulingStore::new());
    let practitioner = complete_practitioner();
    let practitioner_id = practitioner.id;
    let location = test_location(practitioner_id);
    let location_id = location.id;
    {
        let mut state = store.write().await;
        state.insert_practitioner(practitioner).unwrap();
        state.insert_location(location).unwrap();
        // No attachment: onboarding gate must hold
    }
    let app = availability_routes(AvailabilityCellState {
        store,
        clock: test_clock(),
    });

    let response = app
        .oneshot(post_json(
            &format!("/{}/slots", practitioner_id),
            json!({
                "location_id": location_id,
                "date": "2026-01-12",
                "slots": [{"start_time": "09:00:00", "end_time": "10:00:00"}]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn overlapping_batches_conflict() {
    let (app, _store, seed) = seeded_app().await;
    let uri = format!("/{}/slots", seed.practitioner_id);

    let first = app
        .clone()
        .oneshot(post_json(
            &uri,
            json!({
                "location_id": seed.location_id,
                "date": "2026-01-12",
                "slots": [{"start_time": "09:00:00", "end_time": "10:00:00"}]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .clone()
        .oneshot(post_json(
            &uri,
            json!({
                "location_id": seed.location_id,
                "date": "2026-01-12",
                "slots": [{"start_time": "09:30:00", "end_time": "10:30:00"}]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    // Nothing from the rejected batch was persisted
    let listed = json_body(
        app.oneshot(get(&format!(
            "/{}/slots?location_id={}&date=2026-01-12",
            seed.practitioner_id, seed.location_id
        )))
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(listed["total"], 1);
}

#[tokio::test]
async fn closed_slots_drop_out_of_the_listing_until_reopened() {
    let (app, _store, seed) = seeded_app().await;

    let created = json_body(
        app.clone()
            .oneshot(post_json(
                &format!("/{}/slots", seed.practitioner_id),
                json!({
                    "location_id": seed.location_id,
                    "date": "2026-01-12",
                    "slots": [
                        {"start_time": "09:00:00", "end_time": "10:00:00"},
                        {"start_time": "10:00:00", "end_time": "11:00:00"}
                    ]
                }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let slot_id = created["slots"][0]["id"].as_str().unwrap().to_string();
    let list_uri = format!(
        "/{}/slots?location_id={}&date=2026-01-12",
        seed.practitioner_id, seed.location_id
    );

    // Closing twice stays 200 and keeps the slot closed
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(patch(&format!("/slots/{}/close", slot_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["is_open"], false);
    }

    let while_closed = json_body(app.clone().oneshot(get(&list_uri)).await.unwrap()).await;
    assert_eq!(while_closed["total"], 1);
    assert_eq!(while_closed["slots"][0]["start_time"], "10:00:00");

    let reopened = json_body(
        app.clone()
            .oneshot(patch(&format!("/slots/{}/reopen", slot_id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(reopened["is_open"], true);

    let after = json_body(app.oneshot(get(&list_uri)).await.unwrap()).await;
    assert_eq!(after["total"], 2);
}

#[tokio::test]
async fn generate_rejects_hours_outside_the_day() {
    let (app, _store, seed) = seeded_app().await;

    let response = app
        .oneshot(post_json(
            &format!("/{}/slots/generate", seed.practitioner_id),
            json!({
                "location_id": seed.location_id,
                "date": "2026-01-12",
                "start_hour": 9,
                "end_hour": 25,
                "slot_minutes": 60
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_for_an_unknown_practitioner_is_not_found() {
    let (app, _store, seed) = seeded_app().await;

    let response = app
        .oneshot(get(&format!(
            "/{}/slots?location_id={}&date=2026-01-12",
            Uuid::new_v4(),
            seed.location_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
