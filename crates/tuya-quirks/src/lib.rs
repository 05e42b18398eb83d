//! Device quirks for Tuya Zigbee devices
//!
//! A quirk maps the vendor data points of a non-standard device onto
//! standard ZCL attributes hosted on synthesized endpoints, so generic
//! ZCL consumers can use the device as-is.

pub mod convert;
pub mod device;
pub mod error;
pub mod mapping;
pub mod quirk;
pub mod registry;
pub mod template;
pub mod ts0601_door;

pub use device::{AttributeUpdate, DeviceSnapshot, QuirkedDevice};
pub use error::QuirkError;
pub use quirk::{Quirk, ReplacementEndpoint};
pub use registry::{QuirkEvent, QuirkRegistry};
