use passgate_backend_lib::{
    account::Account,
    auth::{AuthRequest, CredentialFields, PasswordHasher, ScryptHasher, SessionContext, SessionOutcome},
    error::AuthError,
    schema::Resource,
    storage::UserRepository,
};

use crate::test_utils::setup_test_env;

const BODY: &str = r#"{"email":"a@b.com","pwd":"secret123","display_name":"Ada"}"#;

#[tokio::test]
async fn test_register_then_login() {
    let (state, repository, _temp_dir) = setup_test_env();
    let mut ctx = SessionContext::new();

    let account = state
        .auth
        .register_with_password(&AuthRequest::post(BODY), &state.fields, &mut ctx)
        .await
        .unwrap();
    assert_eq!(account.email, "a@b.com");
    assert_eq!(account.display_name, "Ada");

    // A row exists and never holds the plaintext
    let rows = repository.read_rows("accounts").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_ne!(rows[0]["pwd"], "secret123");
    assert!(ScryptHasher::default().verify(&rows[0]["pwd"], "secret123").await.unwrap());

    let token = ctx.issued_token().unwrap().to_string();
    assert_eq!(state.sessions.get(&token).await.unwrap().user, account);

    let mut login_ctx = SessionContext::new();
    let logged_in = state
        .auth
        .login_with_password(
            &AuthRequest::post(r#"{"email":"a@b.com","pwd":"secret123"}"#),
            &state.fields,
            &mut login_ctx,
        )
        .await
        .unwrap();
    assert_eq!(logged_in, account);
    assert!(login_ctx.issued_token().is_some());
}

#[tokio::test]
async fn test_same_body_twice_is_duplicate() {
    let (state, repository, _temp_dir) = setup_test_env();

    state
        .auth
        .register_with_password(&AuthRequest::post(BODY), &state.fields, &mut SessionContext::new())
        .await
        .unwrap();

    let mut ctx = SessionContext::new();
    let err = state
        .auth
        .register_with_password(&AuthRequest::post(BODY), &state.fields, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::DuplicateAccount));
    assert_eq!(ctx.outcome(), &SessionOutcome::Unchanged);
    assert_eq!(repository.exists("accounts", "email", "a@b.com").await.unwrap(), 1);
    assert_eq!(state.sessions.len().await, 1);
}

#[tokio::test]
async fn test_wrong_password_after_registration() {
    let (state, _repository, _temp_dir) = setup_test_env();
    state
        .auth
        .register_with_password(&AuthRequest::post(BODY), &state.fields, &mut SessionContext::new())
        .await
        .unwrap();

    let mut ctx = SessionContext::new();
    let err = state
        .auth
        .login_with_password(
            &AuthRequest::post(r#"{"email":"a@b.com","pwd":"wrong"}"#),
            &state.fields,
            &mut ctx,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::PasswordMismatch));
    assert!(ctx.issued_token().is_none());
}

#[tokio::test]
async fn test_nonexistent_username_column_is_schema_error() {
    let (state, repository, _temp_dir) = setup_test_env();
    let fields = CredentialFields::new("nonexistent", "pwd");

    for body in [BODY, "", "[]", r#"{"nonexistent":"x","pwd":"y"}"#] {
        let err = state
            .auth
            .register_with_password(&AuthRequest::post(body), &fields, &mut SessionContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Schema { ref field } if field == "nonexistent"));

        let err = state
            .auth
            .login_with_password(&AuthRequest::post(body), &fields, &mut SessionContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Schema { .. }));
    }
    assert!(repository.read_rows(Account::schema().table()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_extra_fields_outside_schema_are_not_persisted() {
    let (state, repository, _temp_dir) = setup_test_env();
    state
        .auth
        .register_with_password(
            &AuthRequest::post(r#"{"email":"a@b.com","pwd":"secret123","role":"admin"}"#),
            &state.fields,
            &mut SessionContext::new(),
        )
        .await
        .unwrap();

    let rows = repository.read_rows("accounts").await.unwrap();
    assert!(!rows[0].contains_key("role"));
}
