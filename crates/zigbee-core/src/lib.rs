//! Zigbee abstraction layer
//!
//! This crate provides the ZCL object model shared by device quirks:
//! cluster and attribute definitions, endpoint descriptors, device
//! signatures and locally hosted clusters.

pub mod cluster;
pub mod device;
pub mod local;
pub mod signature;

pub use device::{Endpoint, ZigbeeDevice};
pub use local::{AttributeValue, LocalCluster};
pub use signature::{DeviceSignature, ModelInfo};
