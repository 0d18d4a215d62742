//! Constants for the UDS Client.

pub static POSITIVE_RESPONSE: u8 = 0x40;
pub static NEGATIVE_RESPONSE: u8 = 0x7f;

/// Bit set in a sub function to ask the ECU not to send a positive response.
pub static SUPPRESS_POSITIVE_RESPONSE: u8 = 0x80;

/// Service Identifiers (SIDs) as defined in ISO 14229
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(u8)]
pub enum ServiceIdentifier {
    // Diagnostic and Communication Management
    DiagnosticSessionControl = 0x10,
    CommunicationControl = 0x28,
    TesterPresent = 0x3e,
}

/// Diagnostic Session Type Sub-Function ID as defined in ISO 14229
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(u8)]
pub enum SessionType {
    Default = 0x01,
    Programming = 0x02,
    ExtendedDiagnostic = 0x03,
    SafetySystemDiagnostic = 0x04,
}

/// Communication Control Sub-Function ID as defined in ISO 14229
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(u8)]
pub enum ControlType {
    EnableRxAndTx = 0x00,
    EnableRxAndDisableTx = 0x01,
    DisableRxAndEnableTx = 0x02,
    DisableRxAndTx = 0x03,
}

/// Communication Type parameter of Communication Control as defined in ISO 14229
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(u8)]
pub enum CommunicationType {
    NormalCommunicationMessages = 0x01,
    NetworkManagementCommunicationMessages = 0x02,
    NormalAndNetworkManagementCommunicationMessages = 0x03,
}
