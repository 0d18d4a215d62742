//! Fingerprint and firmware inputs to resolution.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use bstr::ByteSlice;
use strum_macros::{Display, EnumIter, EnumString};

use crate::can::Frame;

/// Message identifiers observed on each logical bus during the listening window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fingerprint {
    buses: BTreeMap<u8, BTreeSet<u32>>,
}

impl Fingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fingerprint from captured frames. Frames sent by the adapter itself are ignored.
    pub fn from_frames<'a>(frames: impl IntoIterator<Item = &'a Frame>) -> Self {
        let mut fingerprint = Self::default();
        for frame in frames.into_iter().filter(|frame| !frame.loopback) {
            fingerprint.insert(frame.bus, frame.id.into());
        }
        fingerprint
    }

    pub fn insert(&mut self, bus: u8, address: u32) {
        self.buses.entry(bus).or_default().insert(address);
    }

    pub fn with(mut self, bus: u8, addresses: &[u32]) -> Self {
        for &address in addresses {
            self.insert(bus, address);
        }
        self
    }

    /// Whether `address` was seen on `bus`. Buses that were never observed contain nothing.
    pub fn contains(&self, bus: u8, address: u32) -> bool {
        self.buses.get(&bus).is_some_and(|addresses| addresses.contains(&address))
    }

    pub fn bus(&self, bus: u8) -> impl Iterator<Item = u32> + '_ {
        self.buses.get(&bus).into_iter().flatten().copied()
    }

    /// Highest bus index with at least one observed message.
    pub fn max_bus(&self) -> Option<u8> {
        self.buses
            .iter()
            .filter(|(_, addresses)| !addresses.is_empty())
            .map(|(bus, _)| *bus)
            .max()
    }
}

/// Role of an onboard control unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "camelCase")]
pub enum Ecu {
    Eps,
    Abs,
    FwdRadar,
    FwdCamera,
    Engine,
    Transmission,
    HybridEcu,
    /// ADAS driving ECU, present on HDA2 platforms
    Adas,
    Unknown,
}

/// Firmware identity reported by one control unit.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarFw {
    pub ecu: Ecu,
    pub fw_version: Vec<u8>,
    pub address: u32,
    pub sub_address: Option<u8>,
    pub bus: u8,
}

impl CarFw {
    pub fn new(ecu: Ecu, address: u32, fw_version: &[u8]) -> Self {
        Self {
            ecu,
            fw_version: fw_version.to_vec(),
            address,
            sub_address: None,
            bus: 0,
        }
    }
}

impl fmt::Debug for CarFw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarFw")
            .field("ecu", &self.ecu)
            .field("fw_version", &self.fw_version.as_bstr())
            .field("address", &format_args!("0x{:x}", self.address))
            .field("sub_address", &self.sub_address)
            .field("bus", &self.bus)
            .finish()
    }
}
