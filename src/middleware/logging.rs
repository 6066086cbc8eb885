use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, warn};

use super::Middleware;
use crate::service::{Service, ServiceError};
use crate::todo::Todo;

/// Returns a [`Middleware`] that logs every service call.
pub fn logging() -> Middleware {
    Box::new(|next: Arc<dyn Service>| -> Arc<dyn Service> { Arc::new(LoggingService::new(next)) })
}

/// Logs method, id, latency and outcome of each call, then hands back the
/// inner service's result untouched.
pub struct LoggingService {
    next: Arc<dyn Service>,
}

impl LoggingService {
    pub fn new(next: Arc<dyn Service>) -> Self {
        Self { next }
    }
}

fn record<T, E: Display>(method: &'static str, id: Option<i64>, begin: Instant, result: &Result<T, E>) {
    let took = begin.elapsed();
    match (result, id) {
        (Ok(_), Some(id)) => info!(method, id, ?took),
        (Ok(_), None) => info!(method, ?took),
        (Err(err), Some(id)) => warn!(method, id, ?took, %err),
        (Err(err), None) => warn!(method, ?took, %err),
    }
}

#[async_trait]
impl Service for LoggingService {
    async fn get_todos(&self) -> Result<Vec<Todo>, ServiceError> {
        let begin = Instant::now();
        let result = self.next.get_todos().await;
        record("get_todos", None, begin, &result);
        result
    }

    async fn get_todo(&self, id: i64) -> Result<Todo, ServiceError> {
        let begin = Instant::now();
        let result = self.next.get_todo(id).await;
        record("get_todo", Some(id), begin, &result);
        result
    }

    async fn insert_todo(&self, todo: Todo) -> Result<Todo, ServiceError> {
        let begin = Instant::now();
        let result = self.next.insert_todo(todo).await;
        let id = result.as_ref().ok().and_then(|t| t.id);
        record("insert_todo", id, begin, &result);
        result
    }

    async fn update_todo(&self, id: i64, todo: Todo) -> Result<Todo, ServiceError> {
        let begin = Instant::now();
        let result = self.next.update_todo(id, todo).await;
        record("update_todo", Some(id), begin, &result);
        result
    }

    async fn delete_todo(&self, id: i64) -> Result<(), ServiceError> {
        let begin = Instant::now();
        let result = self.next.delete_todo(id).await;
        record("delete_todo", Some(id), begin, &result);
        result
    }

    async fn delete_todos(&self) -> Result<(), ServiceError> {
        let begin = Instant::now();
        let result = self.next.delete_todos().await;
        record("delete_todos", None, begin, &result);
        result
    }

    async fn clear(&self) -> Result<(), ServiceError> {
        let begin = Instant::now();
        let result = self.next.clear().await;
        record("clear", None, begin, &result);
        result
    }

    // Probed every few seconds; not worth a log line.
    async fn ready(&self) -> Result<(), ServiceError> {
        self.next.ready().await
    }
}
