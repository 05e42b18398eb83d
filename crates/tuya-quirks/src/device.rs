//! Quirked devices and data point dispatch

use crate::error::QuirkError;
use crate::quirk::Quirk;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tuya_protocol::DataPoint;
use zigbee_core::device::format_ieee;
use zigbee_core::{AttributeValue, Endpoint, LocalCluster};

/// An attribute written while translating a data point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeUpdate {
    pub endpoint_id: u8,
    pub cluster_id: u16,
    pub attribute_id: u16,
    pub value: AttributeValue,
}

/// A replacement endpoint with its local clusters
#[derive(Debug, Clone)]
struct QuirkedEndpoint {
    descriptor: Endpoint,
    clusters: BTreeMap<u16, LocalCluster>,
}

/// A paired device with a quirk applied
#[derive(Debug, Clone)]
pub struct QuirkedDevice {
    ieee_address: [u8; 8],
    quirk: Arc<Quirk>,
    endpoints: BTreeMap<u8, QuirkedEndpoint>,
}

impl QuirkedDevice {
    /// Synthesize the replacement endpoints and seed every local cluster
    #[must_use]
    pub fn new(ieee_address: [u8; 8], quirk: Arc<Quirk>) -> Self {
        let endpoints = quirk
            .replacement()
            .iter()
            .map(|replacement| {
                let clusters = replacement
                    .in_clusters
                    .iter()
                    .filter_map(|template| template.instantiate())
                    .map(|cluster| (cluster.cluster_id(), cluster))
                    .collect();
                let endpoint = QuirkedEndpoint {
                    descriptor: replacement.descriptor(),
                    clusters,
                };
                (replacement.id, endpoint)
            })
            .collect();

        Self {
            ieee_address,
            quirk,
            endpoints,
        }
    }

    #[must_use]
    pub fn ieee_address(&self) -> [u8; 8] {
        self.ieee_address
    }

    #[must_use]
    pub fn quirk(&self) -> &Quirk {
        &self.quirk
    }

    /// Simple descriptors of the replacement endpoints
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values().map(|ep| &ep.descriptor)
    }

    #[must_use]
    pub fn cluster(&self, endpoint_id: u8, cluster_id: u16) -> Option<&LocalCluster> {
        self.endpoints
            .get(&endpoint_id)
            .and_then(|ep| ep.clusters.get(&cluster_id))
    }

    #[must_use]
    pub fn attribute(&self, endpoint_id: u8, cluster_id: u16, attribute_id: u16) -> Option<AttributeValue> {
        self.cluster(endpoint_id, cluster_id)
            .and_then(|cluster| cluster.read(attribute_id))
    }

    /// Translate one data point into its attribute.
    ///
    /// Data points without a table entry are dropped and yield `Ok(None)`.
    /// On error the attribute cache is left untouched.
    pub fn dispatch(&mut self, dp: &DataPoint) -> Result<Option<AttributeUpdate>, QuirkError> {
        let Some(target) = self.quirk.data_points().get(dp.id).copied() else {
            tracing::debug!(
                "No data point handler for DP {} on {}",
                dp.id,
                format_ieee(&self.ieee_address)
            );
            return Ok(None);
        };

        let raw = dp.value.as_integer().ok_or(QuirkError::NonNumericValue {
            dp: dp.id,
            dp_type: dp.value.dp_type(),
        })?;
        let converted = target
            .converter
            .apply(raw)
            .ok_or(QuirkError::ValueOutOfRange {
                setter: target.setter,
                value: raw,
            })?;

        let cluster_id = target.setter.cluster_id();
        let cluster = self
            .endpoints
            .get_mut(&target.endpoint_id)
            .and_then(|ep| ep.clusters.get_mut(&cluster_id))
            .ok_or(QuirkError::UnresolvedTarget {
                dp: dp.id,
                endpoint: target.endpoint_id,
                cluster_id,
            })?;
        let value = target.setter.write(cluster, converted)?;

        tracing::trace!(
            "DP {} -> EP{} cluster {:#06x} attr {:#06x} = {:?}",
            dp.id,
            target.endpoint_id,
            cluster_id,
            target.setter.attribute_id(),
            value
        );

        Ok(Some(AttributeUpdate {
            endpoint_id: target.endpoint_id,
            cluster_id,
            attribute_id: target.setter.attribute_id(),
            value,
        }))
    }

    /// Serializable view of every endpoint and cached attribute
    #[must_use]
    pub fn snapshot(&self) -> DeviceSnapshot {
        DeviceSnapshot {
            ieee_address: format_ieee(&self.ieee_address),
            quirk: self.quirk.name().to_string(),
            endpoints: self
                .endpoints
                .values()
                .map(|ep| EndpointSnapshot {
                    descriptor: ep.descriptor.clone(),
                    clusters: ep
                        .clusters
                        .values()
                        .map(|cluster| ClusterSnapshot {
                            cluster_id: cluster.cluster_id(),
                            attributes: cluster
                                .attributes()
                                .into_iter()
                                .map(|(id, value)| AttributeSnapshot {
                                    id,
                                    data_type: value.data_type() as u8,
                                    value,
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Device state as exposed to the host
#[derive(Debug, Clone, Serialize)]
pub struct DeviceSnapshot {
    pub ieee_address: String,
    pub quirk: String,
    pub endpoints: Vec<EndpointSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointSnapshot {
    pub descriptor: Endpoint,
    pub clusters: Vec<ClusterSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterSnapshot {
    pub cluster_id: u16,
    pub attributes: Vec<AttributeSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeSnapshot {
    pub id: u16,
    /// ZCL data type ID
    pub data_type: u8,
    pub value: AttributeValue,
}
