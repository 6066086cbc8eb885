//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. The router owns the
//! application state and hands a clone of it to every handler call.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use matchit::Router as MatchitRouter;
use tracing::{debug, warn};

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    state: S,
}

/// Outcome of matching a method and path against the route table.
enum Lookup<S> {
    Found(BoxedHandler<S>, HashMap<String, String>),
    MethodNotAllowed,
    NotFound,
}

impl<S: Clone + Send + Sync + 'static> Router<S> {
    pub fn new(state: S) -> Self {
        Self { routes: HashMap::new(), state }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    fn lookup(&self, method: &Method, path: &str) -> Lookup<S> {
        if let Some(matched) = self.routes.get(method).and_then(|tree| tree.at(path).ok()) {
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Lookup::Found(Arc::clone(matched.value), params);
        }
        if self.routes.values().any(|tree| tree.at(path).is_ok()) {
            Lookup::MethodNotAllowed
        } else {
            Lookup::NotFound
        }
    }

    /// Routes one request and produces one response.
    ///
    /// Unknown paths answer `404`, known paths under another method `405`,
    /// both with a JSON error body. An unreadable request body is a `500`,
    /// like every other transport failure.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: Body,
        B::Error: Display,
    {
        let begin = Instant::now();
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_owned();

        let response = match self.lookup(&parts.method, &path) {
            Lookup::Found(handler, params) => match body.collect().await {
                Ok(collected) => {
                    let req = Request::new(parts.headers, collected.to_bytes(), params);
                    handler.call(req, self.state.clone()).await
                }
                Err(e) => {
                    warn!(method = %parts.method, %path, "failed to read request body: {e}");
                    Response::error(StatusCode::INTERNAL_SERVER_ERROR, "unreadable request body")
                }
            },
            Lookup::MethodNotAllowed => {
                Response::error(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
            }
            Lookup::NotFound => Response::error(StatusCode::NOT_FOUND, "not found"),
        };

        debug!(
            method = %parts.method,
            %path,
            status = response.status.as_u16(),
            took = ?begin.elapsed(),
            "request"
        );
        response.into_inner()
    }
}
