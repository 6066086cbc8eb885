//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the store be reached? Failure → pulled from load-balancer. |

use std::sync::Arc;

use http::StatusCode;
use tracing::warn;

use crate::service::Service;
use crate::{Request, Response};

/// Liveness probe. Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request, _svc: Arc<dyn Service>) -> Response {
    Response::text("ok")
}

/// Readiness probe. `200 OK` with body `"ready"` while the store answers,
/// `503` with a JSON error otherwise.
pub async fn readiness(_req: Request, svc: Arc<dyn Service>) -> Response {
    match svc.ready().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!("readiness check failed: {e}");
            Response::error(StatusCode::SERVICE_UNAVAILABLE, &e.to_string())
        }
    }
}
