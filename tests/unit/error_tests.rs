use axum::http::StatusCode;
use axum::response::IntoResponse;
use passgate_backend_lib::error::AuthError;
use passgate_backend_lib::storage::RepositoryError;
use rstest::rstest;

#[rstest]
#[case(AuthError::MethodNotSupported("GET".to_string()), StatusCode::METHOD_NOT_ALLOWED, "REQ_001")]
#[case(AuthError::Schema { field: "x".to_string() }, StatusCode::INTERNAL_SERVER_ERROR, "SCHEMA_001")]
#[case(AuthError::MissingField { field: "pwd".to_string() }, StatusCode::BAD_REQUEST, "REQ_003")]
#[case(AuthError::DuplicateAccount, StatusCode::CONFLICT, "AUTH_004")]
#[case(AuthError::Lookup(RepositoryError::Backend("down".to_string())), StatusCode::INTERNAL_SERVER_ERROR, "STORE_001")]
#[case(AuthError::NotFound("a@b.com".to_string()), StatusCode::UNAUTHORIZED, "AUTH_001")]
#[case(AuthError::FieldProjection { field: "pwd".to_string() }, StatusCode::INTERNAL_SERVER_ERROR, "STORE_002")]
#[case(AuthError::Hash("bad".to_string()), StatusCode::INTERNAL_SERVER_ERROR, "HASH_001")]
#[case(AuthError::PasswordMismatch, StatusCode::UNAUTHORIZED, "AUTH_002")]
#[case(AuthError::Persistence(RepositoryError::Backend("full".to_string())), StatusCode::INTERNAL_SERVER_ERROR, "STORE_003")]
fn test_error_mapping(#[case] err: AuthError, #[case] status: StatusCode, #[case] code: &str) {
    assert_eq!(err.error_code(), code);
    assert_eq!(err.status_code(), status);
    assert_eq!(err.into_response().status(), status);
}

#[test]
fn test_sanitized_messages_do_not_leak_internals() {
    let err = AuthError::Persistence(RepositoryError::Backend("disk /dev/sda1 full".to_string()));
    assert!(!err.sanitized_message().contains("sda1"));
    assert!(err.to_string().contains("sda1"));
}
