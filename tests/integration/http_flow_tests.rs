use axum::http::{header, Method, StatusCode};
use passgate_common::{AuthSuccess, ErrorEnvelope};
use rstest::rstest;

use crate::test_utils::{json_body, send, setup_router};

const BODY: &str = r#"{"email":"a@b.com","pwd":"secret123","display_name":"Ada"}"#;

#[tokio::test]
async fn test_health() {
    let (app, _state, _repository, _temp_dir) = setup_router();
    let response = send(&app, Method::GET, "/health", "", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_login_logout_over_http() {
    let (app, state, repository, _temp_dir) = setup_router();

    let response = send(&app, Method::POST, "/auth/register", BODY, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("passgate_session="));
    assert!(cookie.contains("HttpOnly"));

    let registered: AuthSuccess = json_body(response).await;
    assert_eq!(registered.user.get("email").map(String::as_str), Some("a@b.com"));
    assert!(!registered.user.contains_key("pwd"));
    assert!(state.sessions.validate_session(&registered.session_token).await);
    assert_eq!(repository.read_rows("accounts").await.unwrap().len(), 1);

    let response = send(
        &app,
        Method::POST,
        "/auth/login",
        r#"{"email":"a@b.com","pwd":"secret123"}"#,
        Some(&registered.session_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let logged_in: AuthSuccess = json_body(response).await;
    assert_eq!(logged_in.user.get("display_name").map(String::as_str), Some("Ada"));

    // Logging in again rotates the session
    assert!(!state.sessions.validate_session(&registered.session_token).await);
    assert!(state.sessions.validate_session(&logged_in.session_token).await);

    let response = send(&app, Method::POST, "/auth/logout", "", Some(&logged_in.session_token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));
    assert!(!state.sessions.validate_session(&logged_in.session_token).await);
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let (app, _state, repository, _temp_dir) = setup_router();

    assert_eq!(send(&app, Method::POST, "/auth/register", BODY, None).await.status(), StatusCode::OK);

    let response = send(&app, Method::POST, "/auth/register", BODY, None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let envelope: ErrorEnvelope = json_body(response).await;
    assert_eq!(envelope.error.code, "AUTH_004");
    assert_eq!(repository.read_rows("accounts").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_look_alike() {
    let (app, _state, _repository, _temp_dir) = setup_router();
    send(&app, Method::POST, "/auth/register", BODY, None).await;

    let wrong = send(&app, Method::POST, "/auth/login", r#"{"email":"a@b.com","pwd":"wrong"}"#, None).await;
    let unknown = send(&app, Method::POST, "/auth/login", r#"{"email":"z@b.com","pwd":"wrong"}"#, None).await;

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong.headers().get(header::SET_COOKIE).is_none());
}

#[rstest]
#[case(Method::GET, "/auth/register")]
#[case(Method::PUT, "/auth/register")]
#[case(Method::GET, "/auth/login")]
#[case(Method::DELETE, "/auth/login")]
#[tokio::test]
async fn test_non_post_methods_rejected(#[case] method: Method, #[case] uri: &str) {
    let (app, _state, repository, _temp_dir) = setup_router();

    let response = send(&app, method, uri, BODY, None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let envelope: ErrorEnvelope = json_body(response).await;
    assert_eq!(envelope.error.code, "REQ_001");
    assert!(repository.read_rows("accounts").await.unwrap().is_empty());
}

#[rstest]
#[case(r#"{"email":"a@b.com"}"#, "REQ_003")]
#[case(r#"{"email":"","pwd":"secret123"}"#, "REQ_003")]
#[case(r#"{"email":"a@b.com","pwd":1}"#, "REQ_002")]
#[case("not json", "REQ_002")]
#[tokio::test]
async fn test_bad_payloads(#[case] body: &str, #[case] code: &str) {
    let (app, _state, repository, _temp_dir) = setup_router();

    for uri in ["/auth/register", "/auth/login"] {
        let response = send(&app, Method::POST, uri, body, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let envelope: ErrorEnvelope = json_body(response).await;
        assert_eq!(envelope.error.code, code);
    }
    assert!(repository.read_rows("accounts").await.unwrap().is_empty());
}
