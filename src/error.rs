use serde::Serialize;
use thiserror::Error;

/// Why a single file in a batch could not be analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
pub enum ErrorKind {
    #[error("file not found")]
    FileNotFound,
    #[error("read failed")]
    ReadFailed,
    #[error("not valid UTF-8")]
    DecodeFailed,
    #[error("internal analyzer error")]
    InternalError,
}

/// Errors returned synchronously by the batch driver.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("batch driver has already been shut down")]
    AlreadyShutDown,
    #[error("failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
    #[error("failed to start callback thread: {0}")]
    CallbackSpawn(#[from] std::io::Error),
    #[error("batch observer panicked")]
    ObserverPanicked,
}

pub type Result<T> = std::result::Result<T, DriverError>;
