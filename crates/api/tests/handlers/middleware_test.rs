use axum::http::StatusCode;
use bookdesk_api::middleware::{
    auth::{self, Session},
    error_handling::{handle_middleware_error, map_error, AppError},
};
use bookdesk_core::errors::BookingError;
use rstest::rstest;

#[rstest]
#[case(BookingError::NotFound("Staff member not found".to_string()), StatusCode::NOT_FOUND)]
#[case(BookingError::Validation("Invalid input".to_string()), StatusCode::BAD_REQUEST)]
#[case(BookingError::Authentication("Invalid token".to_string()), StatusCode::UNAUTHORIZED)]
#[case(BookingError::Authorization("Not authorized".to_string()), StatusCode::FORBIDDEN)]
#[case(BookingError::Lookup(eyre::eyre!("Database error")), StatusCode::SERVICE_UNAVAILABLE)]
#[case(
    BookingError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "Internal error"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[test]
fn test_eyre_report_maps_to_lookup() {
    let error = AppError::from(eyre::eyre!("pool timed out"));

    assert!(matches!(error.0, BookingError::Lookup(_)));
    assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn test_hash_and_verify_token() {
    let hash = auth::hash_token("front-desk-token").expect("Failed to hash token");

    assert!(hash.starts_with("$argon2"));
    assert!(auth::verify_token("front-desk-token", &hash).unwrap());
    assert!(!auth::verify_token("front-desk", &hash).unwrap());
}

#[test]
fn test_hashes_are_salted() {
    let first = auth::hash_token("same").unwrap();
    let second = auth::hash_token("same").unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_verify_token_with_malformed_hash() {
    assert!(auth::verify_token("token", "not-a-phc-string").is_err());
}

#[test]
fn test_session_actor() {
    assert_eq!(Session::Anonymous.actor(), "anonymous");
    assert_eq!(Session::Dashboard.actor(), "dashboard");
}

#[tokio::test]
async fn test_middleware_timeout_maps_to_request_timeout() {
    let response = handle_middleware_error(Box::new(tower::timeout::error::Elapsed::new())).await;

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn test_other_middleware_errors_are_internal() {
    let err: axum::BoxError = "layer exploded".into();
    let response = handle_middleware_error(err).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
