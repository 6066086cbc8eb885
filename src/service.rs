//! Business rules between the transport and the store.
//!
//! The service is the only layer that applies field defaults, derives the
//! `url` of a todo, and turns store failures into domain errors.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::store::{Store, StoreError};
use crate::todo::{NewTodo, Todo};

/// Domain errors surfaced to callers of a [`Service`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("inconsistent IDs")]
    InconsistentIds,
    #[error("store: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => Self::NotFound,
            StoreError::AlreadyExists => Self::AlreadyExists,
            other => Self::Store(other),
        }
    }
}

/// CRUD over todo items.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Every todo, ordered by `order`. Empty, never absent, when there are none.
    async fn get_todos(&self) -> Result<Vec<Todo>, ServiceError>;
    async fn get_todo(&self, id: i64) -> Result<Todo, ServiceError>;
    /// Creates a todo. Unset fields default to `""`, `false` and `0`.
    async fn insert_todo(&self, todo: Todo) -> Result<Todo, ServiceError>;
    /// Applies the set fields of `todo` to the stored record.
    async fn update_todo(&self, id: i64, todo: Todo) -> Result<Todo, ServiceError>;
    async fn delete_todo(&self, id: i64) -> Result<(), ServiceError>;
    async fn delete_todos(&self) -> Result<(), ServiceError>;
    /// Administrative reset: destroys every record and the id sequence.
    async fn clear(&self) -> Result<(), ServiceError>;
    /// Succeeds when the store is reachable.
    async fn ready(&self) -> Result<(), ServiceError>;
}

/// The production [`Service`] over any [`Store`].
pub struct TodoService<S> {
    store: S,
    base_url: String,
}

impl<S: Store> TodoService<S> {
    /// `base_url` is the public prefix of every todo `url`.
    pub fn new(store: S, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { store, base_url }
    }

    /// Convenience for handing the service to the transport.
    pub fn shared(self) -> Arc<dyn Service> {
        Arc::new(self)
    }

    fn with_url(&self, mut todo: Todo) -> Todo {
        todo.url = match todo.id {
            Some(id) => format!("{}/{id}", self.base_url),
            None => String::new(),
        };
        todo
    }
}

#[async_trait]
impl<S: Store> Service for TodoService<S> {
    async fn get_todos(&self) -> Result<Vec<Todo>, ServiceError> {
        let todos = self.store.get_all().await?;
        Ok(todos.into_iter().map(|t| self.with_url(t)).collect())
    }

    async fn get_todo(&self, id: i64) -> Result<Todo, ServiceError> {
        let todo = self.store.get(id).await?;
        Ok(self.with_url(todo))
    }

    async fn insert_todo(&self, todo: Todo) -> Result<Todo, ServiceError> {
        let saved = self.store.save(NewTodo::with_defaults(todo)).await?;
        Ok(self.with_url(saved))
    }

    async fn update_todo(&self, id: i64, todo: Todo) -> Result<Todo, ServiceError> {
        if todo.id.is_some_and(|body_id| body_id != id) {
            return Err(ServiceError::InconsistentIds);
        }
        let updated = self.store.update(id, todo).await?;
        Ok(self.with_url(updated))
    }

    async fn delete_todo(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self.store.delete(id).await?)
    }

    async fn delete_todos(&self) -> Result<(), ServiceError> {
        Ok(self.store.delete_all().await?)
    }

    async fn clear(&self) -> Result<(), ServiceError> {
        Ok(self.store.destroy().await?)
    }

    async fn ready(&self) -> Result<(), ServiceError> {
        Ok(self.store.ping().await?)
    }
}
