//! Endpoints: one function per service operation.
//!
//! Each endpoint takes a decoded request and returns the service outcome as
//! its payload. Domain errors ride inside that payload rather than failing
//! the endpoint, so the encoder can pick a status code for them. Transport
//! failures (an undecodable request) never reach an endpoint at all.

use serde::Serialize;

use crate::service::{Service, ServiceError};
use crate::todo::Todo;

/// What an endpoint hands to the encoder.
pub type Outcome<T> = Result<T, ServiceError>;

/// Success payload of operations that return nothing. Encodes as `{}`.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct Empty {}

#[derive(Debug)]
pub struct GetTodoRequest {
    pub id: i64,
}

#[derive(Debug)]
pub struct PostTodoRequest {
    pub todo: Todo,
}

#[derive(Debug)]
pub struct PatchTodoRequest {
    pub id: i64,
    pub todo: Todo,
}

#[derive(Debug)]
pub struct DeleteTodoRequest {
    pub id: i64,
}

pub async fn get_todos(svc: &dyn Service) -> Outcome<Vec<Todo>> {
    svc.get_todos().await
}

pub async fn get_todo(svc: &dyn Service, req: GetTodoRequest) -> Outcome<Todo> {
    svc.get_todo(req.id).await
}

pub async fn post_todo(svc: &dyn Service, req: PostTodoRequest) -> Outcome<Todo> {
    svc.insert_todo(req.todo).await
}

pub async fn patch_todo(svc: &dyn Service, req: PatchTodoRequest) -> Outcome<Todo> {
    svc.update_todo(req.id, req.todo).await
}

pub async fn delete_todo(svc: &dyn Service, req: DeleteTodoRequest) -> Outcome<Empty> {
    svc.delete_todo(req.id).await.map(|()| Empty {})
}

pub async fn delete_todos(svc: &dyn Service) -> Outcome<Empty> {
    svc.delete_todos().await.map(|()| Empty {})
}
