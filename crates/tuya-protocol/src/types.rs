//! Common types used throughout the protocol

use bytes::Buf;
use thiserror::Error;

/// Protocol errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Frame too short: {0} bytes")]
    FrameTooShort(usize),

    #[error("Data point {dp} truncated: needs {expected} bytes, {available} available")]
    Truncated {
        dp: u8,
        expected: usize,
        available: usize,
    },

    #[error("Unknown data point type {dp_type:#04X} for DP {dp}")]
    UnknownDpType { dp: u8, dp_type: u8 },

    #[error("Invalid length {len} for {dp_type:?} data point {dp}")]
    InvalidLength {
        dp: u8,
        dp_type: crate::DpType,
        len: usize,
    },

    #[error("Data point {0} is not valid UTF-8")]
    InvalidUtf8(u8),

    #[error("Data point {dp} too long to encode: {len} bytes")]
    PayloadTooLong { dp: u8, len: usize },
}

/// ZCL frame (Zigbee Cluster Library)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZclFrame {
    frame_control: u8,
    manufacturer_code: Option<u16>,
    transaction_seq: u8,
    command_id: u8,
    payload: Vec<u8>,
}

impl ZclFrame {
    /// Parse a ZCL frame from raw ASDU bytes
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        let too_short = || ProtocolError::FrameTooShort(data.len());
        let mut buf = data;

        if buf.remaining() < 3 {
            return Err(too_short());
        }
        let frame_control = buf.get_u8();

        // Manufacturer-specific bit adds a little-endian code
        let manufacturer_code = if frame_control & 0x04 != 0 {
            if buf.remaining() < 4 {
                return Err(too_short());
            }
            Some(buf.get_u16_le())
        } else {
            None
        };

        let transaction_seq = buf.get_u8();
        let command_id = buf.get_u8();

        Ok(Self {
            frame_control,
            manufacturer_code,
            transaction_seq,
            command_id,
            payload: buf.to_vec(),
        })
    }

    /// Create a cluster-specific frame sent by the device (server to client)
    #[must_use]
    pub fn from_server(transaction_seq: u8, command_id: u8, payload: Vec<u8>) -> Self {
        Self {
            frame_control: 0x09, // Cluster-specific, server-to-client
            manufacturer_code: None,
            transaction_seq,
            command_id,
            payload,
        }
    }

    /// Check if this is a cluster-specific command (vs global)
    #[must_use]
    pub fn is_cluster_specific(&self) -> bool {
        (self.frame_control & 0x03) == 0x01
    }

    /// Check if this is from server to client (vs client to server)
    #[must_use]
    pub fn is_from_server(&self) -> bool {
        (self.frame_control & 0x08) != 0
    }

    #[must_use]
    pub fn manufacturer_code(&self) -> Option<u16> {
        self.manufacturer_code
    }

    #[must_use]
    pub fn transaction_seq(&self) -> u8 {
        self.transaction_seq
    }

    /// Get the command ID
    #[must_use]
    pub fn command_id(&self) -> u8 {
        self.command_id
    }

    /// Get the payload
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serialize to bytes
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.push(self.frame_control);
        if let Some(mfr) = self.manufacturer_code {
            data.extend_from_slice(&mfr.to_le_bytes());
        }
        data.push(self.transaction_seq);
        data.push(self.command_id);
        data.extend_from_slice(&self.payload);
        data
    }
}
