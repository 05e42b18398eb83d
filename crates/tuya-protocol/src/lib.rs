//! Tuya manufacturer cluster protocol
//!
//! This crate decodes the ZCL frames Tuya devices send on the
//! manufacturer-specific cluster `0xEF00` into numbered data points.

pub mod commands;
pub mod datapoint;
pub mod types;

pub use commands::TuyaCommand;
pub use datapoint::{DataPoint, DpType, DpValue, TuyaFrame};
pub use types::*;

/// Tuya manufacturer-specific cluster ID
pub const TUYA_CLUSTER_ID: u16 = 0xEF00;
