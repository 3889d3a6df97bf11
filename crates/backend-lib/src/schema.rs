// ============================
// crates/backend-lib/src/schema.rs
// ============================
//! Schema descriptors for user resources.
//!
//! A [`Schema`] names the table a resource lives in and maps each column name
//! to an accessor/mutator pair. Workflows use it to check that the designated
//! username and password fields exist and to move values between a typed
//! resource and a storage-neutral [`Row`]. A descriptor is built once per
//! resource type and handed out by [`Resource::schema`].

use passgate_common::FieldMap;

use crate::error::AuthError;

/// Storage-neutral form of a resource: column name to value.
pub type Row = FieldMap;

/// A user record type that the auth workflows can serve.
pub trait Resource: Default + Clone + Send + Sync + 'static {
    /// The descriptor for this resource type.
    fn schema() -> &'static Schema<Self>;
}

/// A single column of a resource.
pub struct Field<R> {
    name: &'static str,
    get: fn(&R) -> &str,
    set: fn(&mut R, String),
}

impl<R> Field<R> {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Table name plus the accessors for every column of `R`.
pub struct Schema<R> {
    table: &'static str,
    fields: Vec<Field<R>>,
}

impl<R> Schema<R> {
    /// Start a descriptor for `table` with no columns.
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            fields: Vec::new(),
        }
    }

    /// Add a column with its accessor and mutator.
    #[must_use]
    pub fn field(mut self, name: &'static str, get: fn(&R) -> &str, set: fn(&mut R, String)) -> Self {
        self.fields.push(Field { name, get, set });
        self
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(Field::name)
    }

    /// Read a column by name. `None` if the column is not on the schema.
    pub fn get<'r>(&self, record: &'r R, name: &str) -> Option<&'r str> {
        self.lookup(name).map(|field| (field.get)(record))
    }

    /// Write a column by name. Returns `false` if the column is not on the schema.
    pub fn set(&self, record: &mut R, name: &str, value: String) -> bool {
        match self.lookup(name) {
            Some(field) => {
                (field.set)(record, value);
                true
            },
            None => false,
        }
    }

    /// Check that both designated fields exist on this schema.
    ///
    /// The username field is checked first, so a configuration where both
    /// are wrong reports the username field.
    pub fn validate_fields(&self, username_field: &str, password_field: &str) -> Result<(), AuthError> {
        for name in [username_field, password_field] {
            if !self.has_field(name) {
                return Err(AuthError::Schema {
                    field: name.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn to_row(&self, record: &R) -> Row {
        self.fields
            .iter()
            .map(|field| (field.name.to_string(), (field.get)(record).to_string()))
            .collect()
    }

    /// Build a record from a row. Columns in the row that the schema does not
    /// know are ignored; columns missing from the row keep their default.
    pub fn from_row(&self, row: &Row) -> R
    where
        R: Default,
    {
        let mut record = R::default();
        for field in &self.fields {
            if let Some(value) = row.get(field.name) {
                (field.set)(&mut record, value.clone());
            }
        }
        record
    }

    fn lookup(&self, name: &str) -> Option<&Field<R>> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl<R> std::fmt::Debug for Schema<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("table", &self.table)
            .field("fields", &self.fields.iter().map(Field::name).collect::<Vec<_>>())
            .finish()
    }
}
