//! Zigbee device representation

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A Zigbee device as advertised on the network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZigbeeDevice {
    /// IEEE address (EUI-64)
    pub ieee_address: [u8; 8],
    /// Network short address
    pub nwk_address: u16,
    /// Manufacturer name (from Basic cluster)
    pub manufacturer: Option<String>,
    /// Model identifier (from Basic cluster)
    pub model: Option<String>,
    /// Device endpoints
    pub endpoints: Vec<Endpoint>,
}

impl ZigbeeDevice {
    /// Create a new device with just address info
    #[must_use]
    pub fn new(ieee_address: [u8; 8], nwk_address: u16) -> Self {
        Self {
            ieee_address,
            nwk_address,
            manufacturer: None,
            model: None,
            endpoints: Vec::new(),
        }
    }

    /// Get IEEE address as hex string
    #[must_use]
    pub fn ieee_address_string(&self) -> String {
        format_ieee(&self.ieee_address)
    }

    /// Get an endpoint by ID
    #[must_use]
    pub fn endpoint(&self, id: u8) -> Option<&Endpoint> {
        self.endpoints.iter().find(|ep| ep.id == id)
    }
}

/// Format an IEEE address the way it is usually displayed (reverse byte order)
#[must_use]
pub fn format_ieee(ieee: &[u8; 8]) -> String {
    ieee.iter()
        .rev()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// A device endpoint (simple descriptor)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Endpoint ID (1-240)
    pub id: u8,
    /// Profile ID (e.g., 0x0104 for Home Automation)
    pub profile_id: u16,
    /// Device ID within the profile
    pub device_id: u16,
    /// Input (server) clusters
    pub in_clusters: Vec<u16>,
    /// Output (client) clusters
    pub out_clusters: Vec<u16>,
}

impl Endpoint {
    /// Check if endpoint has a specific cluster
    #[must_use]
    pub fn has_cluster(&self, cluster_id: u16) -> bool {
        self.in_clusters.contains(&cluster_id) || self.out_clusters.contains(&cluster_id)
    }

    /// Check whether two descriptors advertise the same layout.
    ///
    /// Cluster lists are compared as sets; devices do not report them in a
    /// stable order.
    #[must_use]
    pub fn same_layout(&self, other: &Endpoint) -> bool {
        self.id == other.id
            && self.profile_id == other.profile_id
            && self.device_id == other.device_id
            && cluster_set(&self.in_clusters) == cluster_set(&other.in_clusters)
            && cluster_set(&self.out_clusters) == cluster_set(&other.out_clusters)
    }

    /// First cluster ID listed more than once, inputs and outputs checked separately
    #[must_use]
    pub fn duplicate_cluster(&self) -> Option<u16> {
        [&self.in_clusters, &self.out_clusters]
            .into_iter()
            .find_map(|clusters| {
                let mut seen = BTreeSet::new();
                clusters.iter().copied().find(|id| !seen.insert(*id))
            })
    }
}

fn cluster_set(clusters: &[u16]) -> BTreeSet<u16> {
    clusters.iter().copied().collect()
}
