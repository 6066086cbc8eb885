//! Process-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Failures that stop the process: bad configuration, an unreachable
/// database at startup, or a listener that cannot bind.
///
/// Per-request failures never surface here. They are rendered as HTTP
/// responses by the transport.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("store: {0}")]
    Store(#[from] StoreError),
}
