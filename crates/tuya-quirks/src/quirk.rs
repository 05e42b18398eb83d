//! Quirk definitions: signature, replacement topology and data point table

use crate::error::QuirkError;
use crate::mapping::{AttributeTarget, DataPointTable};
use crate::template::ClusterTemplate;
use std::collections::BTreeSet;
use zigbee_core::{DeviceSignature, Endpoint, ZigbeeDevice};

/// An endpoint synthesized in place of the device's own
#[derive(Debug, Clone)]
pub struct ReplacementEndpoint {
    pub id: u8,
    pub profile_id: u16,
    pub device_id: u16,
    pub in_clusters: Vec<ClusterTemplate>,
    pub out_clusters: Vec<u16>,
}

impl ReplacementEndpoint {
    /// Simple descriptor advertised for this endpoint
    #[must_use]
    pub fn descriptor(&self) -> Endpoint {
        Endpoint {
            id: self.id,
            profile_id: self.profile_id,
            device_id: self.device_id,
            in_clusters: self.in_clusters.iter().map(ClusterTemplate::cluster_id).collect(),
            out_clusters: self.out_clusters.clone(),
        }
    }
}

/// A validated device quirk
#[derive(Debug, Clone)]
pub struct Quirk {
    name: String,
    signature: DeviceSignature,
    replacement: Vec<ReplacementEndpoint>,
    data_points: DataPointTable,
}

impl Quirk {
    /// Build a quirk, checking the replacement topology and every data point target
    pub fn new(
        name: impl Into<String>,
        signature: DeviceSignature,
        replacement: Vec<ReplacementEndpoint>,
        data_points: impl IntoIterator<Item = (u8, AttributeTarget)>,
    ) -> Result<Self, QuirkError> {
        let data_points = DataPointTable::new(data_points)?;

        let mut endpoint_ids = BTreeSet::new();
        for endpoint in &replacement {
            if !endpoint_ids.insert(endpoint.id) {
                return Err(QuirkError::DuplicateEndpoint(endpoint.id));
            }
            if let Some(cluster_id) = endpoint.descriptor().duplicate_cluster() {
                return Err(QuirkError::DuplicateCluster {
                    endpoint: endpoint.id,
                    cluster_id,
                });
            }
        }

        for (dp, target) in data_points.iter() {
            let cluster_id = target.setter.cluster_id();
            let resolved = replacement
                .iter()
                .find(|ep| ep.id == target.endpoint_id)
                .and_then(|ep| ep.in_clusters.iter().find(|t| t.cluster_id() == cluster_id))
                .and_then(ClusterTemplate::instantiate)
                .is_some();
            if !resolved {
                return Err(QuirkError::UnresolvedTarget {
                    dp,
                    endpoint: target.endpoint_id,
                    cluster_id,
                });
            }
        }

        Ok(Self {
            name: name.into(),
            signature,
            replacement,
            data_points,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn signature(&self) -> &DeviceSignature {
        &self.signature
    }

    #[must_use]
    pub fn replacement(&self) -> &[ReplacementEndpoint] {
        &self.replacement
    }

    #[must_use]
    pub fn data_points(&self) -> &DataPointTable {
        &self.data_points
    }

    /// Check whether the quirk applies to a device
    #[must_use]
    pub fn matches(&self, device: &ZigbeeDevice) -> bool {
        self.signature.matches(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Converter;
    use crate::mapping::AttributeSetter;
    use zigbee_core::cluster::{id, ZoneType};

    fn signature() -> DeviceSignature {
        DeviceSignature {
            models: Vec::new(),
            endpoints: Vec::new(),
        }
    }

    fn zone_endpoint(ep: u8, zones: usize) -> ReplacementEndpoint {
        let mut in_clusters = vec![ClusterTemplate::Standard(id::GROUPS)];
        for _ in 0..zones {
            in_clusters.push(ClusterTemplate::IasZone {
                zone_type: ZoneType::ContactSwitch,
            });
        }
        ReplacementEndpoint {
            id: ep,
            profile_id: 0x0104,
            device_id: 0x0402,
            in_clusters,
            out_clusters: vec![id::TIME],
        }
    }

    const NO_DATA_POINTS: [(u8, AttributeTarget); 0] = [];

    fn zone_target(endpoint: u8) -> AttributeTarget {
        AttributeTarget::new(endpoint, AttributeSetter::ZoneStatus, Converter::Mask(1))
    }

    #[test]
    fn test_valid_quirk() {
        let quirk = Quirk::new(
            "test",
            signature(),
            vec![zone_endpoint(2, 1), zone_endpoint(3, 1)],
            [(1, zone_target(2)), (10, zone_target(3))],
        )
        .unwrap();
        assert_eq!(quirk.name(), "test");
        assert_eq!(quirk.data_points().len(), 2);
        assert_eq!(
            quirk.replacement()[0].descriptor().in_clusters,
            vec![0x0004, 0x0500]
        );
    }

    #[test]
    fn test_two_zones_on_one_endpoint_rejected() {
        let result = Quirk::new("test", signature(), vec![zone_endpoint(2, 2)], NO_DATA_POINTS);
        assert_eq!(
            result.unwrap_err(),
            QuirkError::DuplicateCluster {
                endpoint: 2,
                cluster_id: 0x0500
            }
        );
    }

    #[test]
    fn test_duplicate_endpoint_rejected() {
        let result = Quirk::new(
            "test",
            signature(),
            vec![zone_endpoint(2, 1), zone_endpoint(2, 1)],
            NO_DATA_POINTS,
        );
        assert_eq!(result.unwrap_err(), QuirkError::DuplicateEndpoint(2));
    }

    #[test]
    fn test_unresolved_target_rejected() {
        let missing_endpoint = Quirk::new(
            "test",
            signature(),
            vec![zone_endpoint(2, 1)],
            [(1, zone_target(4))],
        );
        assert_eq!(
            missing_endpoint.unwrap_err(),
            QuirkError::UnresolvedTarget {
                dp: 1,
                endpoint: 4,
                cluster_id: 0x0500
            }
        );

        let missing_cluster = Quirk::new(
            "test",
            signature(),
            vec![zone_endpoint(2, 0)],
            [(1, zone_target(2))],
        );
        assert!(matches!(
            missing_cluster,
            Err(QuirkError::UnresolvedTarget { dp: 1, .. })
        ));
    }
}
