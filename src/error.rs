use thiserror::Error;

/// Errors surfaced by the scissors core.
///
/// `Empty`, `NotDiscovered`, `IllegalState` and `InvalidArgument` are
/// programming errors: they indicate a caller violated a precondition and
/// should not normally be recovered from at runtime. `IoError` and
/// `WorkerFailure` are runtime conditions a host application is expected to
/// handle (report to the user, log and move on).
#[derive(Debug, Error)]
pub enum ScissorsError {
    #[error("operation attempted on an empty queue")]
    Empty,

    #[error("vertex {0} has not been discovered by this snapshot")]
    NotDiscovered(u32),

    #[error("illegal state: {0}")]
    IllegalState(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to write selection: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    DecodeError(image::ImageError),

    #[error("failed to encode selection as PNG: {0}")]
    EncodeError(#[from] image::ImageError),

    #[error("background solver failed: {0}")]
    WorkerFailure(String),
}
