//! Service middleware.
//!
//! A middleware wraps a [`Service`] in another [`Service`], so cross-cutting
//! concerns compose without the business layer knowing about them:
//!
//! ```rust,no_run
//! use todo_backend::middleware;
//! use todo_backend::service::TodoService;
//! use todo_backend::store::MemoryStore;
//!
//! let svc = TodoService::new(MemoryStore::new(), "http://localhost:8080").shared();
//! let svc = middleware::logging()(svc);
//! ```

mod logging;

pub use logging::{LoggingService, logging};

use std::sync::Arc;

use crate::service::Service;

/// A service decorator.
pub type Middleware = Box<dyn FnOnce(Arc<dyn Service>) -> Arc<dyn Service>>;
