//! Tuya data point payloads
//!
//! Commands carrying data points share one payload layout:
//!
//! ```text
//! seq: u16 (BE) | { dp: u8 | type: u8 | len: u16 (BE) | data[len] }*
//! ```
//!
//! All multi-byte values are big-endian.

use crate::commands::TuyaCommand;
use crate::types::{ProtocolError, ZclFrame};
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

/// Data point value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum DpType {
    Raw = 0x00,
    Bool = 0x01,
    Value = 0x02,
    String = 0x03,
    Enum = 0x04,
    Bitmap = 0x05,
}

impl TryFrom<u8> for DpType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0x00 => Ok(DpType::Raw),
            0x01 => Ok(DpType::Bool),
            0x02 => Ok(DpType::Value),
            0x03 => Ok(DpType::String),
            0x04 => Ok(DpType::Enum),
            0x05 => Ok(DpType::Bitmap),
            _ => Err(value),
        }
    }
}

/// A decoded data point value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DpValue {
    Raw(Vec<u8>),
    Bool(bool),
    Value(i32),
    String(String),
    Enum(u8),
    Bitmap(u32),
}

impl DpValue {
    #[must_use]
    pub fn dp_type(&self) -> DpType {
        match self {
            DpValue::Raw(_) => DpType::Raw,
            DpValue::Bool(_) => DpType::Bool,
            DpValue::Value(_) => DpType::Value,
            DpValue::String(_) => DpType::String,
            DpValue::Enum(_) => DpType::Enum,
            DpValue::Bitmap(_) => DpType::Bitmap,
        }
    }

    /// Numeric view of the value, if it has one
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            DpValue::Bool(b) => Some(i64::from(*b)),
            DpValue::Value(v) => Some(i64::from(*v)),
            DpValue::Enum(v) => Some(i64::from(*v)),
            DpValue::Bitmap(v) => Some(i64::from(*v)),
            DpValue::Raw(_) | DpValue::String(_) => None,
        }
    }

    fn decode(dp: u8, dp_type: DpType, data: &[u8]) -> Result<Self, ProtocolError> {
        let invalid = || ProtocolError::InvalidLength {
            dp,
            dp_type,
            len: data.len(),
        };

        match dp_type {
            DpType::Raw => Ok(DpValue::Raw(data.to_vec())),
            DpType::Bool => match data {
                [b] => Ok(DpValue::Bool(*b != 0)),
                _ => Err(invalid()),
            },
            DpType::Enum => match data {
                [v] => Ok(DpValue::Enum(*v)),
                _ => Err(invalid()),
            },
            DpType::Value => {
                let bytes: [u8; 4] = data.try_into().map_err(|_| invalid())?;
                Ok(DpValue::Value(i32::from_be_bytes(bytes)))
            }
            DpType::Bitmap => match data.len() {
                1 | 2 | 4 => Ok(DpValue::Bitmap(
                    data.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)),
                )),
                _ => Err(invalid()),
            },
            DpType::String => String::from_utf8(data.to_vec())
                .map(DpValue::String)
                .map_err(|_| ProtocolError::InvalidUtf8(dp)),
        }
    }

    fn encode(&self) -> Vec<u8> {
        match self {
            DpValue::Raw(data) => data.clone(),
            DpValue::Bool(b) => vec![u8::from(*b)],
            DpValue::Value(v) => v.to_be_bytes().to_vec(),
            DpValue::String(s) => s.as_bytes().to_vec(),
            DpValue::Enum(v) => vec![*v],
            DpValue::Bitmap(v) => {
                let width = if *v <= 0xFF {
                    1
                } else if *v <= 0xFFFF {
                    2
                } else {
                    4
                };
                v.to_be_bytes()[4 - width..].to_vec()
            }
        }
    }
}

/// A single data point report from the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Data point identifier
    pub id: u8,
    /// Decoded value
    pub value: DpValue,
}

impl DataPoint {
    #[must_use]
    pub fn new(id: u8, value: DpValue) -> Self {
        Self { id, value }
    }
}

/// Parse a data point payload into its sequence number and data points
pub fn parse_data_points(payload: &[u8]) -> Result<(u16, Vec<DataPoint>), ProtocolError> {
    let mut buf = payload;
    if buf.remaining() < 2 {
        return Err(ProtocolError::FrameTooShort(payload.len()));
    }
    let seq = buf.get_u16();

    let mut data_points = Vec::new();
    while buf.has_remaining() {
        if buf.remaining() < 4 {
            return Err(ProtocolError::FrameTooShort(payload.len()));
        }
        let id = buf.get_u8();
        let raw_type = buf.get_u8();
        let len = usize::from(buf.get_u16());

        if buf.remaining() < len {
            return Err(ProtocolError::Truncated {
                dp: id,
                expected: len,
                available: buf.remaining(),
            });
        }

        let dp_type = DpType::try_from(raw_type)
            .map_err(|dp_type| ProtocolError::UnknownDpType { dp: id, dp_type })?;
        let value = DpValue::decode(id, dp_type, &buf[..len])?;
        buf.advance(len);

        data_points.push(DataPoint { id, value });
    }

    Ok((seq, data_points))
}

/// Encode data points into a payload.
///
/// Bitmaps are written with the narrowest width (1, 2 or 4 bytes) that
/// holds the value, so a wide bitmap with a small value comes back shorter.
pub fn encode_data_points(seq: u16, data_points: &[DataPoint]) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::new();
    buf.put_u16(seq);
    for dp in data_points {
        let data = dp.value.encode();
        let len = u16::try_from(data.len()).map_err(|_| ProtocolError::PayloadTooLong {
            dp: dp.id,
            len: data.len(),
        })?;
        buf.put_u8(dp.id);
        buf.put_u8(dp.value.dp_type() as u8);
        buf.put_u16(len);
        buf.extend_from_slice(&data);
    }
    Ok(buf)
}

/// A decoded frame from the Tuya cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuyaFrame {
    /// Data points sent by the device
    DataPoints {
        command: TuyaCommand,
        seq: u16,
        data_points: Vec<DataPoint>,
    },
    /// Device asks for the current time
    TimeRequest,
    /// Any other command
    Other { command_id: u8 },
}

impl TuyaFrame {
    /// Decode a ZCL frame received on the Tuya cluster
    pub fn parse(frame: &ZclFrame) -> Result<Self, ProtocolError> {
        match TuyaCommand::from_u8(frame.command_id()) {
            Some(command) if command.carries_data_points() => {
                let (seq, data_points) = parse_data_points(frame.payload())?;
                tracing::trace!(
                    "Tuya {:?} seq={} with {} data points",
                    command,
                    seq,
                    data_points.len()
                );
                Ok(TuyaFrame::DataPoints {
                    command,
                    seq,
                    data_points,
                })
            }
            Some(TuyaCommand::TimeRequest) => Ok(TuyaFrame::TimeRequest),
            _ => Ok(TuyaFrame::Other {
                command_id: frame.command_id(),
            }),
        }
    }

    /// Build a data report frame as the device would send it
    pub fn data_report(
        transaction_seq: u8,
        seq: u16,
        data_points: &[DataPoint],
    ) -> Result<ZclFrame, ProtocolError> {
        Ok(ZclFrame::from_server(
            transaction_seq,
            TuyaCommand::DataReport as u8,
            encode_data_points(seq, data_points)?,
        ))
    }
}
