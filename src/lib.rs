//! # todo-backend
//!
//! A CRUD service for todo items over HTTP/JSON, backed by Postgres.
//!
//! Requests flow through four layers, each replaceable on its own:
//!
//! ```text
//! HTTP ─▶ transport (decode) ─▶ endpoint ─▶ Service ─▶ Store
//!      ◀─ transport (encode) ◀──────────────┘
//! ```
//!
//! - [`store`]: persistence behind the [`Store`](store::Store) trait.
//! - [`service`]: defaults, derived `url`s, domain errors.
//! - [`middleware`]: decorators over a service, e.g. call logging.
//! - [`transport`]: route table, decoding, error-aware encoding.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use todo_backend::{Config, Server, middleware, service::TodoService, store::PgStore, transport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), todo_backend::Error> {
//!     let config = Config::from_env()?;
//!     let store = PgStore::connect(&config).await?;
//!     let svc = middleware::logging()(TodoService::new(store, &config.url).shared());
//!
//!     Server::bind(config.listen_addr()?)
//!         .await?
//!         .serve(transport::make_router(svc))
//!         .await
//! }
//! ```

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod endpoint;
pub mod health;
pub mod middleware;
pub mod service;
pub mod store;
pub mod todo;
pub mod transport;

pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use server::Server;
pub use todo::Todo;
