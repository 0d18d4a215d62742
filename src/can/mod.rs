//! Generic CAN types and traits

pub mod async_can;
pub mod virtual_can;

use std::collections::VecDeque;
use std::fmt;

pub use async_can::AsyncCanAdapter;
pub use virtual_can::{VirtualCan, VirtualEcu};

pub static DLC_TO_LEN: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 12, 16, 20, 24, 32, 48, 64];

/// Identifier for a CAN frame
#[derive(Copy, Clone, PartialOrd, Ord, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Identifier {
    Standard(u32),
    Extended(u32),
}

impl Identifier {
    pub fn is_standard(&self) -> bool {
        matches!(self, Identifier::Standard(_))
    }
    pub fn is_extended(&self) -> bool {
        !self.is_standard()
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Extended(id) => write!(f, "0x{:08x}", id),
            Identifier::Standard(id) => write!(f, "0x{:03x}", id),
        }
    }
}

impl From<u32> for Identifier {
    fn from(id: u32) -> Identifier {
        if id <= 0x7ff {
            Identifier::Standard(id)
        } else {
            Identifier::Extended(id)
        }
    }
}

impl From<Identifier> for u32 {
    fn from(val: Identifier) -> u32 {
        match val {
            Identifier::Standard(id) => id,
            Identifier::Extended(id) => id,
        }
    }
}

/// A CAN frame
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// Logical bus index. Adapters with multiple interfaces number them consecutively, four per device.
    pub bus: u8,
    /// Arbitration ID
    pub id: Identifier,
    /// Frame Data
    pub data: Vec<u8>,
    /// Whether the frame was sent out by the adapter
    pub loopback: bool,
    /// CAN-FD Frame
    pub fd: bool,
}
impl Unpin for Frame {}

impl Frame {
    pub fn new(bus: u8, id: Identifier, data: &[u8]) -> Result<Frame, crate::error::Error> {
        if !DLC_TO_LEN.contains(&data.len()) {
            return Err(crate::error::Error::MalformedFrame);
        }

        match id {
            Identifier::Standard(id) if id > 0x7ff => return Err(crate::error::Error::MalformedFrame),
            Identifier::Extended(id) if id > 0x1fffffff => return Err(crate::error::Error::MalformedFrame),
            _ => {}
        };

        Ok(Frame {
            bus,
            id,
            data: data.to_vec(),
            loopback: false,
            fd: data.len() > 8,
        })
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("bus", &self.bus)
            .field("id", &self.id)
            .field("data", &hex::encode(&self.data))
            .field("loopback", &self.loopback)
            .field("fd", &self.fd)
            .finish()
    }
}

/// Trait for a blocking CAN adapter. Hardware drivers live outside this crate and plug in here.
///
/// `send` drains as many frames from the queue as the adapter accepts; frames that could not be sent stay in the queue for the next call. Every sent frame must be returned once by `recv` with `loopback` set, in the order it was sent.
pub trait CanAdapter {
    fn send(&mut self, frames: &mut VecDeque<Frame>) -> crate::Result<()>;
    fn recv(&mut self) -> crate::Result<Vec<Frame>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_compare() {
        assert!(Identifier::Standard(0x123) < Identifier::Standard(0x124));
        assert!(Identifier::Standard(0x7ff) > Identifier::Standard(0x100));

        // Extended IDs always have lower priority than standard IDs
        assert!(Identifier::Extended(0x1) > Identifier::Standard(0x100));
    }

    #[test]
    fn frame_rejects_invalid_length() {
        assert_eq!(
            Frame::new(0, 0x7d0.into(), &[0u8; 9]),
            Err(crate::Error::MalformedFrame)
        );
        assert!(Frame::new(0, 0x7d0.into(), &[0u8; 8]).is_ok());
    }

    #[test]
    fn frame_rejects_out_of_range_id() {
        assert_eq!(
            Frame::new(0, Identifier::Standard(0x800), &[]),
            Err(crate::Error::MalformedFrame)
        );
    }
}
