// ============================
// crates/backend-lib/src/account.rs
// ============================
//! The account resource served by the `passgate` binary.
use std::sync::LazyLock;

use crate::schema::{Resource, Schema};

/// A row of the `accounts` table
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Account {
    pub email: String,
    pub pwd: String,
    pub display_name: String,
}

static ACCOUNT_SCHEMA: LazyLock<Schema<Account>> = LazyLock::new(|| {
    Schema::<Account>::new("accounts")
        .field("email", |a| a.email.as_str(), |a, v| a.email = v)
        .field("pwd", |a| a.pwd.as_str(), |a, v| a.pwd = v)
        .field("display_name", |a| a.display_name.as_str(), |a, v| a.display_name = v)
});

impl Resource for Account {
    fn schema() -> &'static Schema<Self> {
        &ACCOUNT_SCHEMA
    }
}
