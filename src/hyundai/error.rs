use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("Unsupported vehicle: {0}")]
    UnsupportedVehicle(String),
    #[error("Longitudinal control enabled without an SCC bus")]
    SccBusUnassigned,
    #[error("No safety configuration")]
    NoSafetyConfig,
}
