//! Error types for the single frame ISO-TP transport.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Payload of {0} bytes does not fit a single frame")]
    DataTooLarge(usize),
    #[error("Empty payload")]
    EmptyPayload,
    #[error("Segmented transfer not supported (PCI {0:#04x})")]
    SegmentedTransfer(u8),
    #[error("Malformed Frame")]
    MalformedFrame,
}
