//! Replay scenario files

use anyhow::{bail, Context};
use serde::Deserialize;
use std::path::Path;
use tuya_protocol::{DataPoint, TUYA_CLUSTER_ID};
use zigbee_core::{Endpoint, ZigbeeDevice};

/// A device and the traffic it sends after pairing
#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub device: DeviceSpec,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Device as it announces itself
#[derive(Debug, Deserialize)]
pub struct DeviceSpec {
    /// IEEE address (e.g., "00:11:22:33:44:55:66:77")
    pub ieee: String,
    #[serde(default)]
    pub nwk_address: u16,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub endpoints: Vec<Endpoint>,
}

impl DeviceSpec {
    pub fn to_device(&self) -> anyhow::Result<ZigbeeDevice> {
        let mut device = ZigbeeDevice::new(parse_ieee_address(&self.ieee)?, self.nwk_address);
        device.manufacturer = self.manufacturer.clone();
        device.model = self.model.clone();
        device.endpoints = self.endpoints.clone();
        Ok(device)
    }
}

/// One message received from the device
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// Raw ZCL frame as hex
    Frame {
        #[serde(default = "default_cluster")]
        cluster_id: u16,
        asdu: String,
    },
    /// An already decoded data point
    DataPoint { dp: DataPoint },
}

fn default_cluster() -> u16 {
    TUYA_CLUSTER_ID
}

/// Load a scenario from a JSON file
pub async fn load(path: &Path) -> anyhow::Result<Scenario> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read scenario {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse scenario {}", path.display()))
}

/// Parse IEEE address string to bytes (internal byte order)
pub fn parse_ieee_address(s: &str) -> anyhow::Result<[u8; 8]> {
    let bytes: Vec<u8> = s
        .split(':')
        .map(|part| u8::from_str_radix(part, 16))
        .collect::<Result<_, _>>()
        .with_context(|| format!("Invalid IEEE address: {s}"))?;

    if bytes.len() != 8 {
        bail!("IEEE address must have 8 bytes, got {}", bytes.len());
    }

    // Reverse to match internal representation
    let mut arr = [0u8; 8];
    for (i, &b) in bytes.iter().rev().enumerate() {
        arr[i] = b;
    }
    Ok(arr)
}

/// Parse hex bytes, ignoring whitespace
pub fn parse_hex(s: &str) -> anyhow::Result<Vec<u8>> {
    let digits: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&digits).with_context(|| format!("Invalid hex string {s:?}"))
}
