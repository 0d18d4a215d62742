//! Silence an ECU by disabling its communication with UDS Communication Control (0x28).
//!
//! The ECU stays silent as long as a tester keeps the extended session alive. This is used to take over messages normally sent by the radar, which also disables the factory AEB.

use std::time::Duration;

use tracing::warn;

use crate::can::AsyncCanAdapter;
use crate::isotp::{IsoTPAdapter, IsoTPConfig};
use crate::uds::{SessionType, UDSClient};
use crate::Result;

/// Communication Control: disable rx and tx of normal messages, suppress positive response.
pub static COM_CONT_REQ: [u8; 3] = [0x28, 0x83, 0x01];

pub const DISABLE_TIMEOUT: Duration = Duration::from_millis(100);
pub const DISABLE_RETRY: usize = 10;

/// Disable the ECU at `addr` on `bus` with the default timeout and retry count. Returns whether the ECU acknowledged the extended session. Never fails: a missing ECU is logged and reported as `false`.
pub async fn disable_ecu(adapter: &AsyncCanAdapter, bus: u8, addr: u32, com_cont_req: &[u8; 3]) -> bool {
    disable_ecu_with(adapter, bus, addr, com_cont_req, DISABLE_TIMEOUT, DISABLE_RETRY).await
}

/// Like [`disable_ecu`], bounded by roughly `2 * timeout * retry`.
pub async fn disable_ecu_with(
    adapter: &AsyncCanAdapter,
    bus: u8,
    addr: u32,
    com_cont_req: &[u8; 3],
    timeout: Duration,
    retry: usize,
) -> bool {
    warn!("ecu disable 0x{:x} on bus {} ...", addr, bus);

    let config = IsoTPConfig::new(bus, addr.into()).with_timeout(timeout);
    let isotp = IsoTPAdapter::new(adapter, config);
    let uds = UDSClient::new(&isotp);

    for attempt in 1..=retry {
        match try_disable(&uds, com_cont_req, timeout).await {
            Ok(()) => {
                warn!("ecu 0x{:x} disabled", addr);
                return true;
            }
            Err(e) => warn!("ecu disable retry ({}/{}): {}", attempt, retry, e),
        }
    }

    warn!("ecu disable 0x{:x} failed", addr);
    false
}

async fn try_disable(uds: &UDSClient<'_>, com_cont_req: &[u8; 3], timeout: Duration) -> Result<()> {
    tokio::time::timeout(
        timeout,
        uds.diagnostic_session_control(SessionType::ExtendedDiagnostic as u8),
    )
    .await??;

    warn!("communication control disable tx/rx ...");
    tokio::time::timeout(
        timeout,
        uds.request(com_cont_req[0], Some(com_cont_req[1]), Some(&com_cont_req[2..])),
    )
    .await??;

    Ok(())
}
