//! In-memory [`CanAdapter`] with scripted ECUs. Used by the demos and tests in place of real hardware.
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::can::{CanAdapter, Frame, Identifier};
use crate::isotp::{single_frame_len, single_frame_pci, FrameType, SINGLE_FRAME_MAX_LEN};
use crate::Result;

/// Every frame handed to a [`VirtualCan`], in send order.
pub type FrameLog = Arc<Mutex<Vec<Frame>>>;

const ISOTP_PADDING: u8 = 0xaa;

#[derive(Debug, Default)]
struct EcuState {
    requests: Vec<Vec<u8>>,
}

/// A virtual ECU answering single frame ISO-TP requests on a fixed bus and address. Responses are sent on `address + 8`. A response too long for a single frame only gets its first frame sent. Clones share their request history, so a test can keep a clone after handing the ECU to a [`VirtualCan`].
#[derive(Debug, Clone)]
pub struct VirtualEcu {
    bus: u8,
    address: u32,
    responses: Vec<(Vec<u8>, Vec<u8>)>,
    silent_for: usize,
    state: Arc<Mutex<EcuState>>,
}

impl VirtualEcu {
    pub fn new(bus: u8, address: u32) -> Self {
        Self {
            bus,
            address,
            responses: Vec::new(),
            silent_for: 0,
            state: Arc::new(Mutex::new(EcuState::default())),
        }
    }

    /// Answer `request` with `response`. Both are UDS payloads without ISO-TP framing.
    pub fn with_response(mut self, request: &[u8], response: &[u8]) -> Self {
        self.responses.push((request.to_vec(), response.to_vec()));
        self
    }

    /// Ignore the first `count` requests, e.g. an ECU that is still booting.
    pub fn silent_for(mut self, count: usize) -> Self {
        self.silent_for = count;
        self
    }

    pub fn bus(&self) -> u8 {
        self.bus
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    /// All request payloads received so far.
    pub fn requests(&self) -> Vec<Vec<u8>> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, EcuState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn handle(&self, frame: &Frame) -> Option<Frame> {
        if frame.bus != self.bus || frame.id != Identifier::from(self.address) {
            return None;
        }

        let len = single_frame_len(&frame.data)?;
        let payload = frame.data[1..=len].to_vec();

        let count = {
            let mut state = self.lock();
            state.requests.push(payload.clone());
            state.requests.len()
        };
        if count <= self.silent_for {
            return None;
        }

        let (_, response) = self.responses.iter().find(|(request, _)| *request == payload)?;

        let mut data = match single_frame_pci(response.len()) {
            Some(pci) => [&[pci][..], &response[..]].concat(),
            None if response.len() > SINGLE_FRAME_MAX_LEN => {
                let len = response.len().min(0xfff);
                let header = [FrameType::First as u8 | (len >> 8) as u8, (len & 0xff) as u8];
                [&header[..], &response[..6]].concat()
            }
            None => return None,
        };
        data.resize(8, ISOTP_PADDING);

        Frame::new(self.bus, Identifier::from(self.address + 8), &data).ok()
    }
}

/// In-memory CAN bus. Every sent frame is looped back, and handed to the attached [`VirtualEcu`]s which may answer.
#[derive(Debug, Default)]
pub struct VirtualCan {
    ecus: Vec<VirtualEcu>,
    rx_queue: VecDeque<Frame>,
    log: FrameLog,
}

impl VirtualCan {
    pub fn new(ecus: Vec<VirtualEcu>) -> Self {
        Self {
            ecus,
            ..Default::default()
        }
    }

    pub fn with_ecu(mut self, ecu: VirtualEcu) -> Self {
        self.ecus.push(ecu);
        self
    }

    /// Shared handle to the log of sent frames.
    pub fn log(&self) -> FrameLog {
        self.log.clone()
    }
}

impl CanAdapter for VirtualCan {
    fn send(&mut self, frames: &mut VecDeque<Frame>) -> Result<()> {
        while let Some(frame) = frames.pop_front() {
            self.log.lock().unwrap_or_else(|e| e.into_inner()).push(frame.clone());

            let mut loopback = frame.clone();
            loopback.loopback = true;
            self.rx_queue.push_back(loopback);

            for ecu in &self.ecus {
                if let Some(response) = ecu.handle(&frame) {
                    self.rx_queue.push_back(response);
                }
            }
        }
        Ok(())
    }

    fn recv(&mut self) -> Result<Vec<Frame>> {
        Ok(self.rx_queue.drain(..).collect())
    }
}
