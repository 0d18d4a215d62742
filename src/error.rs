//! Contains the main error type for the library.
use thiserror::Error;

/// The main error type for the library. Each module has it's own error type that is contained by this error.
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Malformed Frame")]
    MalformedFrame,
    #[error("Timeout")]
    Timeout,
    #[error("Adapter Disconnected")]
    Disconnected,
    #[error(transparent)]
    IsoTPError(#[from] crate::isotp::Error),
    #[error(transparent)]
    UDSError(#[from] crate::uds::Error),
    #[error(transparent)]
    ResolutionError(#[from] crate::hyundai::Error),
}

impl From<tokio_stream::Elapsed> for Error {
    fn from(_: tokio_stream::Elapsed) -> Error {
        Error::Timeout
    }
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(_: tokio::time::error::Elapsed) -> Error {
        Error::Timeout
    }
}
