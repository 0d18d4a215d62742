//! Single frame ISO Transport Protocol (ISO 15765-2) on classic CAN. Diagnostic requests and responses used here fit in one frame; segmented transfers are rejected.
//! ## Example:
//! ```rust
//! use carparams::StreamExt;
//! async fn isotp_example(adapter: &carparams::can::AsyncCanAdapter) {
//!    let config = carparams::isotp::IsoTPConfig::new(0, carparams::can::Identifier::Standard(0x7d0));
//!    let isotp = carparams::isotp::IsoTPAdapter::new(adapter, config);
//!
//!    let mut response = isotp.recv(); // Create receiver before sending request
//!    isotp.send(&[0x10, 0x03]).await.unwrap();
//!    let response = response.next().await.unwrap().unwrap();
//! }
//! ```

mod error;
mod pci;

pub use error::Error;
pub use pci::{single_frame_len, single_frame_pci, FrameType, SINGLE_FRAME_MAX_LEN};

use crate::can::AsyncCanAdapter;
use crate::can::Frame;
use crate::can::Identifier;
use crate::Result;

use async_stream::stream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

const DEFAULT_TIMEOUT_MS: u64 = 100;

/// Configuration passed to the IsoTPAdapter.
#[derive(Debug, Clone)]
pub struct IsoTPConfig {
    pub bus: u8,
    /// Transmit ID
    pub tx_id: Identifier,
    /// Receive ID
    pub rx_id: Identifier,
    /// Transmit Data Length, frames are padded up to it
    pub tx_dl: usize,
    /// Padding byte (0x00, or more efficient 0xAA)
    pub padding: u8,
    /// Max timeout for receiving a frame
    pub timeout: std::time::Duration,
}

impl IsoTPConfig {
    /// Physical addressing with the usual response offsets: standard IDs respond on `id + 8`, extended (normal fixed) IDs have target and source swapped.
    pub fn new(bus: u8, id: Identifier) -> Self {
        let tx_id = id;
        let rx_id = match id {
            Identifier::Standard(id) => Identifier::Standard(id + 8),
            Identifier::Extended(id) => {
                let bytes = id.to_be_bytes();
                Identifier::Extended(u32::from_be_bytes([bytes[0], bytes[1], bytes[3], bytes[2]]))
            }
        };

        Self {
            bus,
            tx_id,
            rx_id,
            tx_dl: 8,
            padding: 0xaa,
            timeout: std::time::Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn response_filter(bus: u8, rx_id: Identifier) -> impl Fn(&Frame) -> bool {
    move |frame| frame.bus == bus && frame.id == rx_id && !frame.loopback
}

/// Wraps a CAN adapter to provide a simple interface for sending and receiving ISO-TP frames. CAN-FD ISO-TP is currently not supported.
pub struct IsoTPAdapter<'a> {
    adapter: &'a AsyncCanAdapter,
    config: IsoTPConfig,
}

impl<'a> IsoTPAdapter<'a> {
    /// Convenience method for creating a new IsoTPAdapter from a CAN adapter, a bus and an Arbitration ID.
    pub fn from_id(adapter: &'a AsyncCanAdapter, bus: u8, id: u32) -> Self {
        Self::new(adapter, IsoTPConfig::new(bus, id.into()))
    }

    /// Create a new IsoTPAdapter from a CAN adapter and a configuration.
    pub fn new(adapter: &'a AsyncCanAdapter, config: IsoTPConfig) -> Self {
        Self { adapter, config }
    }

    pub fn config(&self) -> &IsoTPConfig {
        &self.config
    }

    fn pad(&self, data: &mut Vec<u8>) {
        if data.len() < self.config.tx_dl {
            data.resize(self.config.tx_dl, self.config.padding);
        }
    }

    async fn send_frame(&self, data: &[u8]) -> Result<()> {
        let frame = Frame::new(self.config.bus, self.config.tx_id, data)?;
        self.adapter.send(&frame).await
    }

    /// Asynchronously send a payload of 1 to 7 bytes as a single frame.
    pub async fn send(&self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::EmptyPayload.into());
        }
        let pci = single_frame_pci(data.len()).ok_or(Error::DataTooLarge(data.len()))?;

        let mut buf = vec![pci];
        buf.extend(data);
        self.pad(&mut buf);

        debug!("TX SF, length: {} data {}", data.len(), hex::encode(&buf));
        self.send_frame(&buf).await
    }

    fn recv_single_frame(&self, frame: &Frame) -> Result<Vec<u8>> {
        let pci = *frame.data.first().ok_or(Error::MalformedFrame)?;
        match FrameType::from_pci(pci) {
            Some(FrameType::Single) => {}
            Some(_) => return Err(Error::SegmentedTransfer(pci).into()),
            None => return Err(Error::MalformedFrame.into()),
        }

        let len = single_frame_len(&frame.data).ok_or(Error::MalformedFrame)?;
        debug!("RX SF, length: {} data {}", len, hex::encode(&frame.data));
        Ok(frame.data[1..=len].to_vec())
    }

    /// Stream of received ISO-TP packets. The subscription starts when this function is called, so create the stream before sending the request. Yields [`crate::Error::Timeout`] if no frame arrives within the timeout.
    pub fn recv(&self) -> impl Stream<Item = Result<Vec<u8>>> + Unpin + '_ {
        let stream = self
            .adapter
            .recv_filter(response_filter(self.config.bus, self.config.rx_id))
            .timeout(self.config.timeout);

        Box::pin(stream! {
            tokio::pin!(stream);

            loop {
                yield match stream.next().await {
                    Some(frame) => frame.map_err(crate::Error::from).and_then(|frame| self.recv_single_frame(&frame)),
                    None => Err(crate::Error::Disconnected),
                };
            }
        })
    }
}
