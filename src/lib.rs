//! # The Carparams Crate
//! Resolves a single, internally consistent vehicle configuration ([`car::CarParams`]) for Hyundai, Kia and Genesis platforms from a CAN fingerprint, the ECU firmware list and a handful of persisted preferences. The resolved record decides which safety mode the enforcement layer runs, who owns longitudinal control, and which bus carries the cruise messages.
//!
//! ## Resolution Example
//!
//! ```rust
//! use carparams::car::Fingerprint;
//! use carparams::hyundai::{Car, CarInterface, NoCommunity};
//! use carparams::params::MemoryParams;
//!
//! let mut fingerprint = Fingerprint::default();
//! fingerprint.insert(0, 0x58b);
//! fingerprint.insert(1, 0x500);
//!
//! let params = MemoryParams::default();
//! let cp = CarInterface::get_params(Car::SONATA.into(), &fingerprint, &[], false, &params, &NoCommunity);
//!
//! assert_eq!(cp.wheelbase, 2.84);
//! assert!(cp.enable_bsm);
//! ```
//!
//! ## ECU Disable Example
//!
//! Some configurations require a control unit (e.g. the front radar) to be silenced before its messages can be replaced. The handshake runs once at startup over any [`can::CanAdapter`], wrapped in an [`can::AsyncCanAdapter`].
//!
//! ```rust
//! async fn disable_example(cp: &carparams::car::CarParams) {
//!     let adapter = carparams::can::AsyncCanAdapter::new(carparams::can::VirtualCan::default());
//!     carparams::hyundai::CarInterface::init(cp, &adapter).await;
//! }
//! ```
//!

pub mod can;
pub mod car;
pub mod conversions;
mod error;
pub mod hyundai;
pub mod isotp;
pub mod params;
pub mod uds;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use tokio_stream::{Stream, StreamExt, Timeout};
