//! Durable persistence for todo records.
//!
//! [`Store`] is the seam between the service and the storage engine.
//! [`PgStore`] is the production implementation; [`MemoryStore`] backs tests
//! and local runs without a database.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::todo::{NewTodo, Todo};

/// Failures reported by a [`Store`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("database: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => Self::AlreadyExists,
            other => Self::Database(other),
        }
    }
}

/// Persistence operations over todo records.
///
/// Records come back with `id` and every data field set; `url` is left empty
/// for the service to fill in.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// All records, ascending by `order`, ties broken by `id`.
    async fn get_all(&self) -> Result<Vec<Todo>, StoreError>;

    async fn get(&self, id: i64) -> Result<Todo, StoreError>;

    /// Inserts a record under a freshly assigned id.
    async fn save(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    /// Applies the fields of `patch` that are set. Unset fields keep their
    /// stored values. `patch.id` and `patch.url` are ignored.
    async fn update(&self, id: i64, patch: Todo) -> Result<Todo, StoreError>;

    /// Removes one record. A missing id is [`StoreError::NotFound`].
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Removes every record. The id sequence carries on where it was.
    async fn delete_all(&self) -> Result<(), StoreError>;

    /// Destroys every record together with the id sequence.
    async fn destroy(&self) -> Result<(), StoreError>;

    /// Succeeds when the backing storage is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
