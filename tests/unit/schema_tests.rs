use std::sync::LazyLock;

use passgate_backend_lib::account::Account;
use passgate_backend_lib::error::AuthError;
use passgate_backend_lib::schema::{Resource, Row, Schema};

/// A differently-shaped user table
#[derive(Debug, Default, Clone, PartialEq)]
struct Operator {
    login: String,
    passphrase: String,
    team: String,
}

static OPERATOR_SCHEMA: LazyLock<Schema<Operator>> = LazyLock::new(|| {
    Schema::<Operator>::new("operators")
        .field("login", |o| o.login.as_str(), |o, v| o.login = v)
        .field("passphrase", |o| o.passphrase.as_str(), |o, v| o.passphrase = v)
        .field("team", |o| o.team.as_str(), |o, v| o.team = v)
});

impl Resource for Operator {
    fn schema() -> &'static Schema<Self> {
        &OPERATOR_SCHEMA
    }
}

#[test]
fn test_field_names_are_per_resource() {
    assert!(Operator::schema().validate_fields("login", "passphrase").is_ok());
    assert!(Account::schema().validate_fields("email", "pwd").is_ok());

    match Account::schema().validate_fields("login", "passphrase") {
        Err(AuthError::Schema { field }) => assert_eq!(field, "login"),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_row_round_trip_for_custom_resource() {
    let mut operator = Operator::default();
    let schema = Operator::schema();
    assert!(schema.set(&mut operator, "login", "ops1".to_string()));
    assert!(schema.set(&mut operator, "team", "blue".to_string()));

    let row: Row = schema.to_row(&operator);
    assert_eq!(row.get("team").map(String::as_str), Some("blue"));
    assert_eq!(schema.from_row(&row), operator);
}
