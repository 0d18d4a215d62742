//! Logical bus roles on next-generation platforms.
use crate::car::{CarParams, Fingerprint};
use crate::hyundai::HyundaiFlags;

/// Bus roles of a next-generation platform. Harnesses with more than one interface put the car on the last group of four buses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CanBus {
    offset: u8,
    hda2: bool,
}

impl CanBus {
    fn new(hda2: bool, num: u8) -> Self {
        Self {
            offset: 4 * (num.max(1) - 1),
            hda2,
        }
    }

    /// Topology used during resolution, sized from the highest bus that carried traffic.
    pub fn from_fingerprint(hda2: bool, fingerprint: &Fingerprint) -> Self {
        let num = fingerprint
            .max_bus()
            .map(|bus| bus.div_ceil(4))
            .unwrap_or(1);
        Self::new(hda2, num)
    }

    /// Topology of a resolved record, sized from its safety layers.
    pub fn from_params(cp: &CarParams) -> Self {
        let num = u8::try_from(cp.safety_configs.len()).unwrap_or(u8::MAX / 4);
        Self::new(cp.flags.contains(HyundaiFlags::CANFD_HDA2), num)
    }

    pub fn offset(&self) -> u8 {
        self.offset
    }

    /// Bus carrying the powertrain messages.
    pub fn acan(&self) -> u8 {
        if self.hda2 {
            self.offset
        } else {
            self.offset + 1
        }
    }

    /// Bus carrying the ADAS messages.
    pub fn ecan(&self) -> u8 {
        if self.hda2 {
            self.offset + 1
        } else {
            self.offset
        }
    }

    pub fn cam(&self) -> u8 {
        self.offset + 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_interface() {
        let fingerprint = Fingerprint::new().with(0, &[0x1cf]).with(2, &[0x110]);
        let bus = CanBus::from_fingerprint(false, &fingerprint);
        assert_eq!((bus.ecan(), bus.acan(), bus.cam()), (0, 1, 2));

        let bus = CanBus::from_fingerprint(true, &fingerprint);
        assert_eq!((bus.ecan(), bus.acan(), bus.cam()), (1, 0, 2));
    }

    #[test]
    fn empty_fingerprint() {
        let bus = CanBus::from_fingerprint(false, &Fingerprint::new());
        assert_eq!(bus.offset(), 0);
    }

    #[test]
    fn second_interface() {
        let fingerprint = Fingerprint::new().with(0, &[0x1]).with(5, &[0x1cf]);
        let bus = CanBus::from_fingerprint(true, &fingerprint);
        assert_eq!(bus.offset(), 4);
        assert_eq!((bus.ecan(), bus.acan(), bus.cam()), (5, 4, 6));
    }

    #[test]
    fn highest_bus_stays_in_range() {
        let fingerprint = Fingerprint::new().with(u8::MAX, &[0x1cf]);
        let bus = CanBus::from_fingerprint(false, &fingerprint);
        assert_eq!(bus.offset(), 252);
        assert_eq!((bus.ecan(), bus.acan(), bus.cam()), (252, 253, 254));
    }

    #[test]
    fn sized_from_safety_layers() {
        use crate::car::{SafetyConfig, SafetyModel};

        let cp = CarParams {
            flags: HyundaiFlags::CANFD_HDA2,
            safety_configs: vec![
                SafetyConfig::new(SafetyModel::NoOutput),
                SafetyConfig::new(SafetyModel::HyundaiCanfd),
            ],
            ..Default::default()
        };
        let bus = CanBus::from_params(&cp);
        assert_eq!((bus.ecan(), bus.acan(), bus.cam()), (5, 4, 6));

        let bus = CanBus::from_params(&CarParams::default());
        assert_eq!(bus.offset(), 0);
    }
}
