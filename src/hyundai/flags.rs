use bitflags::bitflags;

bitflags! {
    /// Platform features derived from the fingerprint and firmware during resolution.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct HyundaiFlags: u32 {
        // Next-generation (CAN-FD) message set
        const CANFD_HDA2 = 1;
        const CANFD_ALT_BUTTONS = 2;
        const CANFD_ALT_GEARS = 4;
        const CANFD_CAMERA_SCC = 8;

        const ALT_LIMITS = 16;
        const ENABLE_BLINKERS = 32;
        const CANFD_ALT_GEARS_2 = 64;

        // Legacy message set
        const SEND_LFA = 128;
        const USE_FCA = 256;

        const CANFD_HDA2_ALT_STEERING = 512;
        const HYBRID = 1024;
        const EV = 2048;
    }
}

impl HyundaiFlags {
    /// Flags that only occur on the next-generation message set.
    pub const CANFD: HyundaiFlags = HyundaiFlags::CANFD_HDA2
        .union(HyundaiFlags::CANFD_ALT_BUTTONS)
        .union(HyundaiFlags::CANFD_ALT_GEARS)
        .union(HyundaiFlags::CANFD_CAMERA_SCC)
        .union(HyundaiFlags::CANFD_ALT_GEARS_2)
        .union(HyundaiFlags::CANFD_HDA2_ALT_STEERING);

    /// Flags that only occur on the legacy message set.
    pub const LEGACY: HyundaiFlags = HyundaiFlags::SEND_LFA.union(HyundaiFlags::USE_FCA);
}
