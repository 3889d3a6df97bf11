// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! User repository abstraction with in-memory and flat-file implementations.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tokio::{fs as tokio_fs, io::AsyncWriteExt, sync::Mutex};

use crate::schema::Row;

/// Errors raised by repository adapters
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated on column {field}")]
    UniqueViolation { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt row: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("repository backend failed: {0}")]
    Backend(String),
}

/// Trait for user persistence backends.
///
/// Rows are addressed by table name and a single column; the repository
/// knows nothing about which column holds usernames or passwords.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find the first row whose `field` equals `value`.
    /// Returns [`RepositoryError::NotFound`] when nothing matches.
    async fn find_one(&self, table: &str, field: &str, value: &str) -> Result<Row, RepositoryError>;

    /// Count the rows whose `field` equals `value`.
    async fn exists(&self, table: &str, field: &str, value: &str) -> Result<u64, RepositoryError>;

    /// Insert `row` unless another row already holds the same value in
    /// `unique_field`. The check and the insert are atomic.
    async fn create(&self, table: &str, row: &Row, unique_field: &str) -> Result<(), RepositoryError>;

    /// Read a single column from a matched row.
    async fn project_field(&self, table: &str, row: &Row, field: &str) -> Result<Option<String>, RepositoryError> {
        let _ = table;
        Ok(row.get(field).cloned())
    }
}

fn matches(row: &Row, field: &str, value: &str) -> bool {
    row.get(field).is_some_and(|v| v == value)
}

fn unique_value<'r>(row: &'r Row, unique_field: &str) -> Result<&'r str, RepositoryError> {
    row.get(unique_field).map(String::as_str).ok_or_else(|| {
        RepositoryError::Backend(format!("row has no value for unique column {unique_field}"))
    })
}

/// In-memory implementation of the `UserRepository` trait
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    tables: Arc<DashMap<String, Vec<Row>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every row in `table`
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .get(table)
            .map(|rows| rows.value().clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_one(&self, table: &str, field: &str, value: &str) -> Result<Row, RepositoryError> {
        self.tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| matches(row, field, value)).cloned())
            .ok_or(RepositoryError::NotFound)
    }

    async fn exists(&self, table: &str, field: &str, value: &str) -> Result<u64, RepositoryError> {
        let count = self
            .tables
            .get(table)
            .map_or(0, |rows| rows.iter().filter(|row| matches(row, field, value)).count());
        Ok(count as u64)
    }

    async fn create(&self, table: &str, row: &Row, unique_field: &str) -> Result<(), RepositoryError> {
        let key = unique_value(row, unique_field)?;

        // The entry guard holds the shard lock across check and insert
        let mut rows = self.tables.entry(table.to_string()).or_default();
        if rows.iter().any(|existing| matches(existing, unique_field, key)) {
            return Err(RepositoryError::UniqueViolation {
                field: unique_field.to_string(),
            });
        }
        rows.push(row.clone());
        Ok(())
    }
}

/// Flat-file implementation of the `UserRepository` trait.
///
/// Each table is a JSON-lines file at `<root>/tables/<table>.jsonl`.
#[derive(Clone)]
pub struct FlatFileUserRepository {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FlatFileUserRepository {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(root.join("tables"))?;
        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.root.join("tables").join(format!("{table}.jsonl"))
    }

    /// Read all rows of a table
    pub async fn read_rows(&self, table: &str) -> Result<Vec<Row>, RepositoryError> {
        let path = self.table_path(table);

        if !tokio_fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }

        let content = tokio_fs::read_to_string(&path).await?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(RepositoryError::from))
            .collect()
    }
}

#[async_trait]
impl UserRepository for FlatFileUserRepository {
    async fn find_one(&self, table: &str, field: &str, value: &str) -> Result<Row, RepositoryError> {
        self.read_rows(table)
            .await?
            .into_iter()
            .find(|row| matches(row, field, value))
            .ok_or(RepositoryError::NotFound)
    }

    async fn exists(&self, table: &str, field: &str, value: &str) -> Result<u64, RepositoryError> {
        let rows = self.read_rows(table).await?;
        Ok(rows.iter().filter(|row| matches(row, field, value)).count() as u64)
    }

    /// Append a JSON line to the table file.
    async fn create(&self, table: &str, row: &Row, unique_field: &str) -> Result<(), RepositoryError> {
        let key = unique_value(row, unique_field)?;

        let _guard = self.write_lock.lock().await;

        let rows = self.read_rows(table).await?;
        if rows.iter().any(|existing| matches(existing, unique_field, key)) {
            return Err(RepositoryError::UniqueViolation {
                field: unique_field.to_string(),
            });
        }

        let mut line = serde_json::to_string(row)?;
        line.push('\n');

        let mut file = tokio_fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.table_path(table))
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
