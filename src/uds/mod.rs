//! Unified Diagnostic Services (UDS) Client, implements the subset of ISO 14229 needed for startup handshakes.
//! ## Example
//! ```rust
//! async fn uds_example(adapter: &carparams::can::AsyncCanAdapter) {
//!     let isotp = carparams::isotp::IsoTPAdapter::from_id(adapter, 0, 0x7d0);
//!     let uds = carparams::uds::UDSClient::new(&isotp);
//!
//!     uds.diagnostic_session_control(carparams::uds::SessionType::ExtendedDiagnostic as u8).await.unwrap();
//!     uds.tester_present().await.unwrap();
//! }
//! ```

mod constants;
mod error;

use crate::isotp::IsoTPAdapter;
use crate::Result;
use crate::StreamExt;
pub use constants::*;
pub use error::{Error, NegativeResponseCode};

use tracing::{debug, info};

/// UDS Client. Wraps an IsoTPAdapter to provide a simple interface for making UDS calls.
pub struct UDSClient<'a> {
    adapter: &'a IsoTPAdapter<'a>,
}

impl<'a> UDSClient<'a> {
    pub fn new(adapter: &'a IsoTPAdapter) -> Self {
        Self { adapter }
    }

    /// Helper function to make custom UDS requests. This function will verify the ECU responds with the correct service identifier and sub function, handle negative responses, and will return the response data.
    ///
    /// If the sub function has the suppress positive response bit set, the request is sent without waiting for an answer and an empty response is returned.
    pub async fn request(&self, sid: u8, sub_function: Option<u8>, data: Option<&[u8]>) -> Result<Vec<u8>> {
        let mut request: Vec<u8> = vec![sid];

        if let Some(sub_function) = sub_function {
            request.push(sub_function);
        }

        if let Some(data) = data {
            request.extend(data);
        }

        if matches!(sub_function, Some(sub) if sub & SUPPRESS_POSITIVE_RESPONSE != 0) {
            debug!("UDS TX {} (no response expected)", hex::encode(&request));
            self.adapter.send(&request).await?;
            return Ok(vec![]);
        }

        let mut stream = self.adapter.recv();

        debug!("UDS TX {}", hex::encode(&request));
        self.adapter.send(&request).await?;

        loop {
            let response = stream.next().await.ok_or(crate::Error::Disconnected)??;
            debug!("UDS RX {}", hex::encode(&response));

            let Some(&response_sid) = response.first() else {
                return Err(Error::InvalidResponseLength.into());
            };

            // Check for errors
            if response_sid == NEGATIVE_RESPONSE {
                let Some(&code) = response.get(2) else {
                    return Err(Error::InvalidResponseLength.into());
                };
                let code: NegativeResponseCode = code.into();

                if code == NegativeResponseCode::RequestCorrectlyReceivedResponsePending {
                    info!("Received Response Pending");
                    continue;
                }

                return Err(Error::NegativeResponse(code).into());
            }

            // Check service id
            if response_sid != sid | POSITIVE_RESPONSE {
                return Err(Error::InvalidServiceId(response_sid).into());
            }

            // Check sub function
            if let Some(sub_function) = sub_function {
                match response.get(1) {
                    Some(&sub) if sub == sub_function => {}
                    Some(&sub) => return Err(Error::InvalidSubFunction(sub).into()),
                    None => return Err(Error::InvalidResponseLength.into()),
                }
            }

            let start: usize = if sub_function.is_some() { 2 } else { 1 };
            return Ok(response[start..].to_vec());
        }
    }

    /// 0x10 - Diagnostic Session Control. Use the [`constants::SessionType`] enum for the session types defined in the standard. Returns the optional session parameter record.
    pub async fn diagnostic_session_control(&self, session_type: u8) -> Result<Vec<u8>> {
        self.request(
            ServiceIdentifier::DiagnosticSessionControl as u8,
            Some(session_type),
            None,
        )
        .await
    }

    /// 0x28 - Communication Control. Set [`constants::SUPPRESS_POSITIVE_RESPONSE`] in `control_type` to skip waiting for the ECU to answer.
    pub async fn communication_control(&self, control_type: u8, communication_type: u8) -> Result<()> {
        self.request(
            ServiceIdentifier::CommunicationControl as u8,
            Some(control_type),
            Some(&[communication_type]),
        )
        .await?;
        Ok(())
    }

    /// 0x3E - Tester Present
    pub async fn tester_present(&self) -> Result<()> {
        self.request(ServiceIdentifier::TesterPresent as u8, Some(0), None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::can::{AsyncCanAdapter, VirtualCan, VirtualEcu};

    #[tokio::test]
    async fn extended_session() {
        let ecu = VirtualEcu::new(0, 0x7d0).with_response(&[0x10, 0x03], &[0x50, 0x03, 0x00, 0x32, 0x01, 0xf4]);
        let adapter = AsyncCanAdapter::new(VirtualCan::default().with_ecu(ecu));
        let isotp = IsoTPAdapter::from_id(&adapter, 0, 0x7d0);
        let uds = UDSClient::new(&isotp);

        let record = uds
            .diagnostic_session_control(SessionType::ExtendedDiagnostic as u8)
            .await
            .unwrap();
        assert_eq!(record, vec![0x00, 0x32, 0x01, 0xf4]);
    }

    #[tokio::test]
    async fn negative_response() {
        let ecu = VirtualEcu::new(0, 0x7d0).with_response(&[0x10, 0x03], &[0x7f, 0x10, 0x22]);
        let adapter = AsyncCanAdapter::new(VirtualCan::default().with_ecu(ecu));
        let isotp = IsoTPAdapter::from_id(&adapter, 0, 0x7d0);
        let uds = UDSClient::new(&isotp);

        let result = uds.diagnostic_session_control(SessionType::ExtendedDiagnostic as u8).await;
        assert_eq!(
            result,
            Err(crate::Error::UDSError(Error::NegativeResponse(
                NegativeResponseCode::ConditionsNotCorrect
            )))
        );
    }

    #[tokio::test]
    async fn wrong_sub_function() {
        let ecu = VirtualEcu::new(0, 0x7d0).with_response(&[0x10, 0x03], &[0x50, 0x01]);
        let adapter = AsyncCanAdapter::new(VirtualCan::default().with_ecu(ecu));
        let isotp = IsoTPAdapter::from_id(&adapter, 0, 0x7d0);
        let uds = UDSClient::new(&isotp);

        let result = uds.diagnostic_session_control(SessionType::ExtendedDiagnostic as u8).await;
        assert_eq!(result, Err(crate::Error::UDSError(Error::InvalidSubFunction(0x01))));
    }

    #[tokio::test]
    async fn communication_control_without_response() {
        let ecu = VirtualEcu::new(0, 0x7d0);
        let adapter = AsyncCanAdapter::new(VirtualCan::default().with_ecu(ecu.clone()));
        let isotp = IsoTPAdapter::from_id(&adapter, 0, 0x7d0);
        let uds = UDSClient::new(&isotp);

        uds.communication_control(
            ControlType::DisableRxAndTx as u8 | SUPPRESS_POSITIVE_RESPONSE,
            CommunicationType::NormalCommunicationMessages as u8,
        )
        .await
        .unwrap();

        assert_eq!(ecu.requests(), vec![vec![0x28, 0x83, 0x01]]);
    }
}
