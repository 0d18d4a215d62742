//! Safety layer configuration handed to the enforcement layer.
use bitflags::bitflags;

/// Safety enforcement mode. Values are the wire identifiers understood by the enforcement firmware.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum SafetyModel {
    Hyundai = 8,
    NoOutput = 19,
    HyundaiLegacy = 23,
    HyundaiCanfd = 28,
}

bitflags! {
    /// Safety parameter bits for the Hyundai safety modes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SafetyParam: u16 {
        const HYUNDAI_EV_GAS = 1;
        const HYUNDAI_HYBRID_GAS = 2;
        const HYUNDAI_LONG = 4;
        const HYUNDAI_CAMERA_SCC = 8;
        const HYUNDAI_CANFD_HDA2 = 16;
        const HYUNDAI_CANFD_ALT_BUTTONS = 32;
        const HYUNDAI_ALT_LIMITS = 64;
        const HYUNDAI_CANFD_HDA2_ALT_STEERING = 128;
    }
}

/// One safety layer: a mode plus its parameter bits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SafetyConfig {
    pub safety_model: SafetyModel,
    pub safety_param: SafetyParam,
}

impl SafetyConfig {
    pub fn new(safety_model: SafetyModel) -> Self {
        Self {
            safety_model,
            safety_param: SafetyParam::empty(),
        }
    }
}
