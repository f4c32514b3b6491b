use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use bookdesk_api::{handlers::availability::AvailabilityQuery, middleware::auth};
use bookdesk_core::{errors::BookingError, models::{staff::StaffDay, time_slot::AvailabilityResponse}};
use chrono::Duration;
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::Value;
use uuid::Uuid;

use crate::test_utils::{confirmed_booking, time, upcoming_date, working_day, TestContext};

fn query(staff_id: Uuid, service_ids: &[Uuid]) -> AvailabilityQuery {
    AvailabilityQuery {
        staff_id: Some(staff_id.to_string()),
        date: Some(upcoming_date().to_string()),
        service_ids: Some(
            service_ids
                .iter()
                .map(Uuid::to_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
        exclude_booking_id: None,
        current_slot_start: None,
    }
}

// Mock store for one staff member working 09:00-17:30 with a 10:00 booking
fn context_with_booking(staff_id: Uuid, service_minutes: u32) -> (TestContext, Uuid) {
    let mut ctx = TestContext::new();
    let booking = confirmed_booking(time(10, 0), 30);
    let booking_id = booking.id;

    ctx.store
        .expect_staff_exists()
        .with(predicate::eq(staff_id))
        .returning(|_| Ok(true));
    ctx.store
        .expect_service_duration()
        .returning(move |_| Ok(Some(service_minutes)));
    ctx.store
        .expect_staff_day()
        .returning(|_, _| Ok(working_day()));
    ctx.store
        .expect_bookings_for()
        .times(1)
        .returning(move |_, _| Ok(vec![booking.clone()]));

    (ctx, booking_id)
}

#[test]
fn test_query_parsing() {
    let staff_id = Uuid::new_v4();
    let service_a = Uuid::new_v4();
    let service_b = Uuid::new_v4();
    let booking_id = Uuid::new_v4();

    let mut raw = query(staff_id, &[service_a, service_b]);
    raw.service_ids = Some(format!(" {} , {} ,", service_a, service_b));
    raw.exclude_booking_id = Some(booking_id.to_string());
    raw.current_slot_start = Some("10:00".to_string());

    let parsed = raw.into_slot_query().unwrap();

    assert_eq!(parsed.staff_id, staff_id);
    assert_eq!(parsed.date, upcoming_date());
    assert_eq!(parsed.service_ids, vec![service_a, service_b]);
    assert_eq!(parsed.exclude_booking_id, Some(booking_id));
    assert_eq!(parsed.current_slot_start, Some(time(10, 0)));
}

#[test]
fn test_query_parsing_blank_optionals() {
    let mut raw = query(Uuid::new_v4(), &[Uuid::new_v4()]);
    raw.exclude_booking_id = Some("".to_string());
    raw.current_slot_start = Some("  ".to_string());

    let parsed = raw.into_slot_query().unwrap();

    assert_eq!(parsed.exclude_booking_id, None);
    assert_eq!(parsed.current_slot_start, None);
}

#[test]
fn test_query_parsing_rejects_bad_values() {
    let cases = [
        ("staff_id", "not-a-uuid"),
        ("date", "06/05/2030"),
        ("service_ids", "abc"),
        ("current_slot_start", "10am"),
    ];

    for (field, value) in cases {
        let mut raw = query(Uuid::new_v4(), &[Uuid::new_v4()]);
        match field {
            "staff_id" => raw.staff_id = Some(value.to_string()),
            "date" => raw.date = Some(value.to_string()),
            "service_ids" => raw.service_ids = Some(value.to_string()),
            _ => raw.current_slot_start = Some(value.to_string()),
        }

        match raw.into_slot_query() {
            Err(BookingError::Validation(_)) => {}
            other => panic!("Expected Validation error for {}, got: {:?}", field, other),
        }
    }
}

#[test]
fn test_query_parsing_reports_missing_parameters() {
    let fields = ["staff_id", "date", "service_ids"];

    for field in fields {
        let mut raw = query(Uuid::new_v4(), &[Uuid::new_v4()]);
        match field {
            "staff_id" => raw.staff_id = None,
            "date" => raw.date = None,
            _ => raw.service_ids = None,
        }

        match raw.into_slot_query() {
            Err(BookingError::Validation(message)) => assert!(message.contains(field)),
            other => panic!("Expected Validation error for {}, got: {:?}", field, other),
        }
    }
}

#[tokio::test]
async fn test_get_availability_missing_parameter_returns_json_error() {
    let ctx = TestContext::new();

    let response = ctx
        .server()
        .get("/api/availability")
        .add_query_param("staff_id", Uuid::new_v4().to_string())
        .add_query_param("service_ids", Uuid::new_v4().to_string())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Validation error: Missing required parameter: date"
    );
}

#[test_log::test(tokio::test)]
async fn test_get_availability_success() {
    let staff_id = Uuid::new_v4();
    let service_id = Uuid::new_v4();
    let (ctx, _) = context_with_booking(staff_id, 30);
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("staff_id", staff_id.to_string())
        .add_query_param("date", upcoming_date().to_string())
        .add_query_param("service_ids", service_id.to_string())
        .await;

    response.assert_status_ok();
    let body: AvailabilityResponse = response.json();
    let starts: Vec<_> = body.slots.iter().map(|slot| slot.start).collect();

    assert_eq!(body.staff_id, staff_id);
    assert_eq!(body.date, upcoming_date());
    assert_eq!(body.total_duration_minutes, 30);
    assert_eq!(body.reason, None);
    assert!(!starts.contains(&time(10, 0)));
    assert!(starts.contains(&time(9, 30)));
    assert!(starts.contains(&time(10, 30)));
    assert_eq!(starts.last(), Some(&time(17, 0)));
}

#[test_log::test(tokio::test)]
async fn test_get_availability_editing_keeps_own_slot() {
    let staff_id = Uuid::new_v4();
    let (ctx, booking_id) = context_with_booking(staff_id, 30);
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("staff_id", staff_id.to_string())
        .add_query_param("date", upcoming_date().to_string())
        .add_query_param("service_ids", Uuid::new_v4().to_string())
        .add_query_param("exclude_booking_id", booking_id.to_string())
        .add_query_param("current_slot_start", "10:00")
        .await;

    response.assert_status_ok();
    let body: AvailabilityResponse = response.json();

    assert!(body.slots.iter().any(|slot| slot.start == time(10, 0)));
}

#[tokio::test]
async fn test_get_availability_not_working() {
    let staff_id = Uuid::new_v4();
    let mut ctx = TestContext::new();

    ctx.store.expect_staff_exists().returning(|_| Ok(true));
    ctx.store.expect_service_duration().returning(|_| Ok(Some(45)));
    ctx.store
        .expect_staff_day()
        .returning(|_, _| Ok(StaffDay::NotWorking));
    ctx.store.expect_bookings_for().never();

    let response = ctx
        .server()
        .get("/api/availability")
        .add_query_param("staff_id", staff_id.to_string())
        .add_query_param("date", upcoming_date().to_string())
        .add_query_param("service_ids", Uuid::new_v4().to_string())
        .await;

    response.assert_status_ok();
    let body: AvailabilityResponse = response.json();

    assert!(body.slots.is_empty());
    assert_eq!(body.reason.as_deref(), Some("staff not available this day"));
}

#[tokio::test]
async fn test_get_availability_unknown_staff() {
    let mut ctx = TestContext::new();
    ctx.store.expect_staff_exists().returning(|_| Ok(false));

    let response = ctx
        .server()
        .get("/api/availability")
        .add_query_param("staff_id", Uuid::new_v4().to_string())
        .add_query_param("date", upcoming_date().to_string())
        .add_query_param("service_ids", Uuid::new_v4().to_string())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_availability_past_date() {
    let ctx = TestContext::new();
    let yesterday = upcoming_date() - Duration::days(8);

    let response = ctx
        .server()
        .get("/api/availability")
        .add_query_param("staff_id", Uuid::new_v4().to_string())
        .add_query_param("date", yesterday.to_string())
        .add_query_param("service_ids", Uuid::new_v4().to_string())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("past date"));
}

#[tokio::test]
async fn test_get_availability_empty_services() {
    let ctx = TestContext::new();

    let response = ctx
        .server()
        .get("/api/availability")
        .add_query_param("staff_id", Uuid::new_v4().to_string())
        .add_query_param("date", upcoming_date().to_string())
        .add_query_param("service_ids", "")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_availability_lookup_failure() {
    let mut ctx = TestContext::new();

    ctx.store.expect_staff_exists().returning(|_| Ok(true));
    ctx.store.expect_service_duration().returning(|_| Ok(Some(30)));
    ctx.store
        .expect_staff_day()
        .returning(|_, _| Ok(working_day()));
    ctx.store
        .expect_bookings_for()
        .returning(|_, _| Err(eyre::eyre!("connection reset")));

    let response = ctx
        .server()
        .get("/api/availability")
        .add_query_param("staff_id", Uuid::new_v4().to_string())
        .add_query_param("date", upcoming_date().to_string())
        .add_query_param("service_ids", Uuid::new_v4().to_string())
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Could not load availability"));
}

#[tokio::test]
async fn test_get_availability_requires_token_when_configured() {
    let staff_id = Uuid::new_v4();
    let (mut ctx, _) = context_with_booking(staff_id, 30);
    ctx.token_hash = Some(auth::hash_token("front-desk-token").unwrap());
    let server = ctx.server();

    let missing = server
        .get("/api/availability")
        .add_query_param("staff_id", staff_id.to_string())
        .add_query_param("date", upcoming_date().to_string())
        .add_query_param("service_ids", Uuid::new_v4().to_string())
        .await;
    missing.assert_status(StatusCode::UNAUTHORIZED);

    let wrong = server
        .get("/api/availability")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer guess"))
        .add_query_param("staff_id", staff_id.to_string())
        .add_query_param("date", upcoming_date().to_string())
        .add_query_param("service_ids", Uuid::new_v4().to_string())
        .await;
    wrong.assert_status(StatusCode::UNAUTHORIZED);

    let authorized = server
        .get("/api/availability")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer front-desk-token"))
        .add_query_param("staff_id", staff_id.to_string())
        .add_query_param("date", upcoming_date().to_string())
        .add_query_param("service_ids", Uuid::new_v4().to_string())
        .await;
    authorized.assert_status_ok();
}

#[tokio::test]
async fn test_health_and_version() {
    let server = TestContext::new().server();

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["status"], "ok");

    let version: Value = server.get("/version").await.json();
    assert_eq!(version["name"], "bookdesk-api");
}

#[tokio::test(flavor = "current_thread")]
async fn test_token_checks_do_not_stall_single_threaded_runtime() {
    let mut ctx = TestContext::new();
    ctx.store.expect_staff_exists().returning(|_| Ok(true));
    ctx.store.expect_service_duration().returning(|_| Ok(Some(30)));
    ctx.store
        .expect_staff_day()
        .returning(|_, _| Ok(working_day()));
    ctx.store.expect_bookings_for().returning(|_, _| Ok(vec![]));
    ctx.token_hash = Some(auth::hash_token("front-desk-token").unwrap());
    let server = ctx.server();

    let request = || {
        server
            .get("/api/availability")
            .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer front-desk-token"))
            .add_query_param("staff_id", Uuid::new_v4().to_string())
            .add_query_param("date", upcoming_date().to_string())
            .add_query_param("service_ids", Uuid::new_v4().to_string())
    };

    let (first, second) = tokio::join!(async { request().await }, async { request().await });

    first.assert_status_ok();
    second.assert_status_ok();
}
