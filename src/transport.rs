//! HTTP transport: the route table, request decoding and response encoding.
//!
//! No business logic lives here. A handler decodes the request, calls the
//! endpoint, and encodes whatever comes back:
//!
//! - a successful payload is written as JSON with status `200`;
//! - a domain error carried in the payload is written as `{"error": msg}`
//!   with a status derived from its kind (see [`HttpError`]);
//! - a decode or routing failure skips the endpoint and goes straight to the
//!   error encoder as a `500`.
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | GET | /todos | get_todos |
//! | GET | /todos/{id} | get_todo |
//! | POST | /todos | insert_todo |
//! | PATCH | /todos/{id} | update_todo |
//! | DELETE | /todos | delete_todos |
//! | DELETE | /todos/{id} | delete_todo |

use std::num::ParseIntError;
use std::sync::Arc;

use http::{Method, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::endpoint::{self, DeleteTodoRequest, GetTodoRequest, Outcome, PatchTodoRequest, PostTodoRequest};
use crate::health;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::Router;
use crate::service::{Service, ServiceError};
use crate::todo::Todo;

/// Failures that happen before a request reaches its endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The route matched but the handler found no `{id}` parameter.
    #[error("inconsistent mapping between route and handler (programmer error)")]
    BadRouting,
    #[error("invalid id {id:?}: {source}")]
    InvalidId { id: String, source: ParseIntError },
    #[error("malformed request body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// An error that knows which HTTP status it should be answered with.
pub trait HttpError: std::error::Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl HttpError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::InconsistentIds => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl HttpError for TransportError {}

impl IntoResponse for TransportError {
    fn into_response(self) -> Response {
        warn!("transport error: {self}");
        encode_error(&self)
    }
}

/// Builds the router with every todo route plus the health probes.
pub fn make_router(svc: Arc<dyn Service>) -> Router<Arc<dyn Service>> {
    Router::new(svc)
        .on(Method::GET,    "/todos",      get_todos)
        .on(Method::GET,    "/todos/{id}", get_todo)
        .on(Method::POST,   "/todos",      post_todo)
        .on(Method::PATCH,  "/todos/{id}", patch_todo)
        .on(Method::DELETE, "/todos",      delete_todos)
        .on(Method::DELETE, "/todos/{id}", delete_todo)
        .on(Method::GET,    "/healthz",    health::liveness)
        .on(Method::GET,    "/readyz",     health::readiness)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn get_todos(_req: Request, svc: Arc<dyn Service>) -> Response {
    encode_response(endpoint::get_todos(&*svc).await)
}

async fn get_todo(req: Request, svc: Arc<dyn Service>) -> Result<Response, TransportError> {
    let req = decode_get_todo_request(&req)?;
    Ok(encode_response(endpoint::get_todo(&*svc, req).await))
}

async fn post_todo(req: Request, svc: Arc<dyn Service>) -> Result<Response, TransportError> {
    let req = decode_post_todo_request(&req)?;
    Ok(encode_response(endpoint::post_todo(&*svc, req).await))
}

async fn patch_todo(req: Request, svc: Arc<dyn Service>) -> Result<Response, TransportError> {
    let req = decode_patch_todo_request(&req)?;
    Ok(encode_response(endpoint::patch_todo(&*svc, req).await))
}

async fn delete_todos(_req: Request, svc: Arc<dyn Service>) -> Response {
    encode_response(endpoint::delete_todos(&*svc).await)
}

async fn delete_todo(req: Request, svc: Arc<dyn Service>) -> Result<Response, TransportError> {
    let req = decode_delete_todo_request(&req)?;
    Ok(encode_response(endpoint::delete_todo(&*svc, req).await))
}

// ── Decoding ──────────────────────────────────────────────────────────────────

fn path_id(req: &Request) -> Result<i64, TransportError> {
    let raw = req.param("id").ok_or(TransportError::BadRouting)?;
    raw.parse()
        .map_err(|source| TransportError::InvalidId { id: raw.to_owned(), source })
}

/// Decodes a todo body. Only a JSON object is accepted: derived serde
/// impls would otherwise fill fields positionally from an array.
fn decode_todo(req: &Request) -> Result<Todo, TransportError> {
    if let Some(ct) = req.header("content-type").filter(|ct| !ct.starts_with("application/json")) {
        debug!(content_type = ct, "decoding todo body sent with a non-JSON content type");
    }
    let value: serde_json::Value = serde_json::from_slice(req.body())?;
    if !value.is_object() {
        return Err(TransportError::Decode(serde::de::Error::custom("expected a JSON object")));
    }
    Ok(serde_json::from_value(value)?)
}

fn decode_get_todo_request(req: &Request) -> Result<GetTodoRequest, TransportError> {
    Ok(GetTodoRequest { id: path_id(req)? })
}

fn decode_post_todo_request(req: &Request) -> Result<PostTodoRequest, TransportError> {
    Ok(PostTodoRequest { todo: decode_todo(req)? })
}

fn decode_patch_todo_request(req: &Request) -> Result<PatchTodoRequest, TransportError> {
    let id = path_id(req)?;
    Ok(PatchTodoRequest { id, todo: decode_todo(req)? })
}

fn decode_delete_todo_request(req: &Request) -> Result<DeleteTodoRequest, TransportError> {
    Ok(DeleteTodoRequest { id: path_id(req)? })
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Writes an endpoint outcome. A domain error in the payload is answered
/// through [`encode_error`] instead of the success path.
pub fn encode_response<T: Serialize>(outcome: Outcome<T>) -> Response {
    match outcome {
        Ok(payload) => Response::json(&payload),
        Err(err) => encode_error(&err),
    }
}

/// Writes `{"error": "<message>"}` with the status the error maps to.
pub fn encode_error<E: HttpError + ?Sized>(err: &E) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        error!(status = status.as_u16(), "request failed: {err}");
    }
    Response::error(status, &err.to_string())
}
