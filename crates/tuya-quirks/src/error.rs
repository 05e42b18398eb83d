//! Error types for device quirks

use crate::mapping::AttributeSetter;
use thiserror::Error;
use tuya_protocol::{DpType, ProtocolError};

/// Errors raised while building quirks or translating reports
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuirkError {
    /// Frame could not be decoded
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Data point value has no numeric interpretation
    #[error("Data point {dp} carries a non-numeric {dp_type:?} value")]
    NonNumericValue { dp: u8, dp_type: DpType },

    /// Converted value does not fit the target attribute
    #[error("Value {value} out of range for {setter:?}")]
    ValueOutOfRange { setter: AttributeSetter, value: i64 },

    /// Target cluster is not of the type the setter writes
    #[error("{setter:?} cannot write to cluster {cluster_id:#06x}")]
    ClusterMismatch {
        setter: AttributeSetter,
        cluster_id: u16,
    },

    /// Data point mapped more than once
    #[error("Data point {0} mapped more than once")]
    DuplicateDataPoint(u8),

    /// Endpoint declared more than once in a replacement
    #[error("Endpoint {0} declared more than once")]
    DuplicateEndpoint(u8),

    /// Endpoint carries two instances of one cluster type
    #[error("Endpoint {endpoint} lists cluster {cluster_id:#06x} more than once")]
    DuplicateCluster { endpoint: u8, cluster_id: u16 },

    /// Data point target does not exist in the replacement
    #[error("Data point {dp} targets cluster {cluster_id:#06x} missing on endpoint {endpoint}")]
    UnresolvedTarget {
        dp: u8,
        endpoint: u8,
        cluster_id: u16,
    },

    /// No quirked device with this address
    #[error("Device not found: {0}")]
    DeviceNotFound(String),
}
