//! Protocol control information, the first byte of every ISO-TP frame on classic CAN.

/// Largest payload a single frame carries on an 8 byte CAN frame.
pub const SINGLE_FRAME_MAX_LEN: usize = 7;

const FRAME_TYPE_MASK: u8 = 0xf0;
const LENGTH_MASK: u8 = 0x0f;

/// Frame type from the upper nibble of the PCI byte.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[repr(u8)]
pub enum FrameType {
    Single = 0x00,
    First = 0x10,
    Consecutive = 0x20,
    FlowControl = 0x30,
}

impl FrameType {
    /// `None` for the reserved upper nibbles.
    pub fn from_pci(pci: u8) -> Option<Self> {
        match pci & FRAME_TYPE_MASK {
            0x00 => Some(FrameType::Single),
            0x10 => Some(FrameType::First),
            0x20 => Some(FrameType::Consecutive),
            0x30 => Some(FrameType::FlowControl),
            _ => None,
        }
    }

    /// Whether the frame belongs to a transfer spread over several frames.
    pub fn is_segmented(self) -> bool {
        self != FrameType::Single
    }
}

/// PCI byte of a single frame carrying `len` bytes.
pub fn single_frame_pci(len: usize) -> Option<u8> {
    match len {
        1..=SINGLE_FRAME_MAX_LEN => Some(FrameType::Single as u8 | len as u8),
        _ => None,
    }
}

/// Payload length announced by a single frame. Zero is the CAN-FD escape and is rejected together with lengths the frame cannot hold.
pub fn single_frame_len(data: &[u8]) -> Option<usize> {
    let pci = *data.first()?;
    if FrameType::from_pci(pci) != Some(FrameType::Single) {
        return None;
    }
    let len = (pci & LENGTH_MASK) as usize;
    (len > 0 && len < data.len()).then_some(len)
}
