//! Quirk registry
//!
//! Holds the registered quirks and the devices they have been applied to,
//! routes incoming Tuya frames to the right device and broadcasts every
//! attribute the translation writes.

use crate::device::{AttributeUpdate, DeviceSnapshot, QuirkedDevice};
use crate::error::QuirkError;
use crate::quirk::Quirk;
use crate::ts0601_door;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tuya_protocol::{DataPoint, TuyaFrame, ZclFrame, TUYA_CLUSTER_ID};
use zigbee_core::device::format_ieee;
use zigbee_core::{AttributeValue, ZigbeeDevice};

/// Events emitted by the registry
#[derive(Debug, Clone)]
pub enum QuirkEvent {
    /// A quirk was applied to a paired device
    DeviceQuirked {
        ieee_address: [u8; 8],
        quirk: String,
    },
    /// A quirked device was removed
    DeviceRemoved { ieee_address: [u8; 8] },
    /// A data point updated an attribute
    AttributeUpdated {
        ieee_address: [u8; 8],
        update: AttributeUpdate,
    },
}

/// Registered quirks and the devices using them
pub struct QuirkRegistry {
    quirks: Vec<Arc<Quirk>>,
    /// Quirked devices (keyed by IEEE address)
    devices: DashMap<[u8; 8], QuirkedDevice>,
    /// Event broadcaster
    event_tx: broadcast::Sender<QuirkEvent>,
}

impl Default for QuirkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl QuirkRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            quirks: Vec::new(),
            devices: DashMap::new(),
            event_tx,
        }
    }

    /// Create a registry with every quirk in this crate registered
    pub fn with_builtin_quirks() -> Result<Self, QuirkError> {
        let mut registry = Self::new();
        registry.register(ts0601_door::quirk()?);
        Ok(registry)
    }

    /// Register a quirk. Earlier registrations win when several match.
    pub fn register(&mut self, quirk: Quirk) {
        tracing::info!(
            "Registered quirk '{}' ({} data points)",
            quirk.name(),
            quirk.data_points().len()
        );
        self.quirks.push(Arc::new(quirk));
    }

    #[must_use]
    pub fn quirks(&self) -> &[Arc<Quirk>] {
        &self.quirks
    }

    /// Find the quirk whose signature matches the device
    #[must_use]
    pub fn find_quirk(&self, device: &ZigbeeDevice) -> Option<Arc<Quirk>> {
        self.quirks.iter().find(|q| q.matches(device)).cloned()
    }

    /// Apply a matching quirk to a newly paired device.
    ///
    /// Returns `false` when no quirk matches. Pairing an already quirked
    /// device resets its attributes.
    pub fn pair(&self, device: &ZigbeeDevice) -> bool {
        let Some(quirk) = self.find_quirk(device) else {
            tracing::debug!("No quirk for {}", device.ieee_address_string());
            return false;
        };

        tracing::info!(
            "Applying quirk '{}' to {}",
            quirk.name(),
            device.ieee_address_string()
        );
        let name = quirk.name().to_string();
        self.devices.insert(
            device.ieee_address,
            QuirkedDevice::new(device.ieee_address, quirk),
        );

        let _ = self.event_tx.send(QuirkEvent::DeviceQuirked {
            ieee_address: device.ieee_address,
            quirk: name,
        });
        true
    }

    /// Discard a removed device's attributes
    pub fn remove(&self, ieee: &[u8; 8]) -> bool {
        let removed = self.devices.remove(ieee).is_some();
        if removed {
            tracing::info!("Removed quirked device {}", format_ieee(ieee));
            let _ = self.event_tx.send(QuirkEvent::DeviceRemoved {
                ieee_address: *ieee,
            });
        }
        removed
    }

    #[must_use]
    pub fn is_quirked(&self, ieee: &[u8; 8]) -> bool {
        self.devices.contains_key(ieee)
    }

    /// Translate a single data point for a device
    pub fn handle_data_point(
        &self,
        ieee: &[u8; 8],
        dp: &DataPoint,
    ) -> Result<Option<AttributeUpdate>, QuirkError> {
        let mut device = self
            .devices
            .get_mut(ieee)
            .ok_or_else(|| QuirkError::DeviceNotFound(format_ieee(ieee)))?;

        let update = device.dispatch(dp)?;
        if let Some(update) = update {
            let _ = self.event_tx.send(QuirkEvent::AttributeUpdated {
                ieee_address: *ieee,
                update,
            });
        }
        Ok(update)
    }

    /// Handle a ZCL frame received from a device.
    ///
    /// Frames on clusters other than the Tuya cluster are ignored. A data
    /// point that fails to translate is logged and discarded; the rest of
    /// the frame still applies. Returns the number of attributes written.
    pub fn handle_zcl(&self, ieee: &[u8; 8], cluster_id: u16, asdu: &[u8]) -> Result<usize, QuirkError> {
        if !self.devices.contains_key(ieee) {
            return Err(QuirkError::DeviceNotFound(format_ieee(ieee)));
        }
        if cluster_id != TUYA_CLUSTER_ID {
            tracing::trace!("Ignoring cluster {:#06x} frame from {}", cluster_id, format_ieee(ieee));
            return Ok(0);
        }

        let frame = ZclFrame::parse(asdu)?;
        match TuyaFrame::parse(&frame)? {
            TuyaFrame::DataPoints {
                command,
                data_points,
                ..
            } => {
                tracing::debug!(
                    "{:?} from {} with {} data points",
                    command,
                    format_ieee(ieee),
                    data_points.len()
                );
                let mut written = 0;
                for dp in &data_points {
                    match self.handle_data_point(ieee, dp) {
                        Ok(Some(_)) => written += 1,
                        Ok(None) => {}
                        Err(e) => {
                            tracing::warn!("Discarding DP {} from {}: {}", dp.id, format_ieee(ieee), e);
                        }
                    }
                }
                Ok(written)
            }
            TuyaFrame::TimeRequest => {
                tracing::debug!("Time sync request from {} not answered", format_ieee(ieee));
                Ok(0)
            }
            TuyaFrame::Other { command_id } => {
                tracing::debug!(
                    "Ignoring Tuya command {:#04x} from {}",
                    command_id,
                    format_ieee(ieee)
                );
                Ok(0)
            }
        }
    }

    /// Read a cached attribute
    #[must_use]
    pub fn attribute(
        &self,
        ieee: &[u8; 8],
        endpoint_id: u8,
        cluster_id: u16,
        attribute_id: u16,
    ) -> Option<AttributeValue> {
        self.devices
            .get(ieee)
            .and_then(|device| device.attribute(endpoint_id, cluster_id, attribute_id))
    }

    /// Get a device's full attribute state
    #[must_use]
    pub fn snapshot(&self, ieee: &[u8; 8]) -> Option<DeviceSnapshot> {
        self.devices.get(ieee).map(|device| device.snapshot())
    }

    /// Subscribe to registry events
    pub fn subscribe(&self) -> broadcast::Receiver<QuirkEvent> {
        self.event_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts0601_door::{
        BATTERY_DP, DOOR_HANDLE_DP, DOOR_HANDLE_ENDPOINT, DP_HANDLER_ENDPOINT, MANUFACTURER,
        MODEL, VIBRATION_DP, VIBRATION_ENDPOINT,
    };
    use tuya_protocol::DpValue;
    use zigbee_core::cluster::{ias_zone_attrs, id, power_config_attrs};
    use zigbee_core::Endpoint;

    const IEEE: [u8; 8] = [0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80];

    fn door_sensor() -> ZigbeeDevice {
        let mut device = ZigbeeDevice::new(IEEE, 0x1A2B);
        device.manufacturer = Some(MANUFACTURER.to_string());
        device.model = Some(MODEL.to_string());
        device.endpoints = vec![Endpoint {
            id: 1,
            profile_id: 0x0104,
            device_id: 0x0051,
            in_clusters: vec![0x0000, 0x0004, 0x0005, 0xEF00],
            out_clusters: vec![0x000A, 0x0019],
        }];
        device
    }

    fn paired_registry() -> QuirkRegistry {
        let registry = QuirkRegistry::with_builtin_quirks().unwrap();
        assert!(registry.pair(&door_sensor()));
        registry
    }

    fn zone_status(registry: &QuirkRegistry, endpoint: u8) -> Option<AttributeValue> {
        registry.attribute(&IEEE, endpoint, id::IAS_ZONE, ias_zone_attrs::ZONE_STATUS)
    }

    #[test]
    fn test_pair_requires_matching_signature() {
        let registry = QuirkRegistry::with_builtin_quirks().unwrap();
        let mut other = door_sensor();
        other.manufacturer = Some("_TZE200_unknown".to_string());
        assert!(!registry.pair(&other));
        assert!(!registry.is_quirked(&IEEE));

        assert!(registry.pair(&door_sensor()));
        assert!(registry.is_quirked(&IEEE));
    }

    #[test]
    fn test_door_frame_end_to_end() {
        let registry = paired_registry();
        let frame =
            TuyaFrame::data_report(1, 1, &[DataPoint::new(DOOR_HANDLE_DP, DpValue::Bool(true))])
                .unwrap();

        let written = registry
            .handle_zcl(&IEEE, TUYA_CLUSTER_ID, &frame.serialize())
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(
            zone_status(&registry, DOOR_HANDLE_ENDPOINT),
            Some(AttributeValue::Bitmap16(1))
        );
        assert_eq!(
            zone_status(&registry, VIBRATION_ENDPOINT),
            Some(AttributeValue::Bitmap16(0))
        );
    }

    #[test]
    fn test_bad_data_point_does_not_spoil_frame() {
        let registry = paired_registry();
        let frame = TuyaFrame::data_report(
            2,
            2,
            &[
                DataPoint::new(BATTERY_DP, DpValue::String("full".to_string())),
                DataPoint::new(42, DpValue::Value(7)),
                DataPoint::new(VIBRATION_DP, DpValue::Bool(true)),
            ],
        )
        .unwrap();

        let written = registry
            .handle_zcl(&IEEE, TUYA_CLUSTER_ID, &frame.serialize())
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(
            registry.attribute(
                &IEEE,
                DP_HANDLER_ENDPOINT,
                id::POWER_CONFIG,
                power_config_attrs::BATTERY_PERCENTAGE_REMAINING
            ),
            Some(AttributeValue::Uint8(200))
        );
        assert_eq!(
            zone_status(&registry, VIBRATION_ENDPOINT),
            Some(AttributeValue::Bitmap16(1))
        );
    }

    #[test]
    fn test_other_frames_ignored() {
        let registry = paired_registry();
        let before = zone_status(&registry, DOOR_HANDLE_ENDPOINT);

        // Time sync request
        let time = ZclFrame::from_server(3, 0x24, vec![0x00, 0x03]);
        assert_eq!(registry.handle_zcl(&IEEE, TUYA_CLUSTER_ID, &time.serialize()), Ok(0));
        // Report on a standard cluster
        assert_eq!(registry.handle_zcl(&IEEE, id::BASIC, &[0x18, 0x01, 0x0A]), Ok(0));

        assert_eq!(zone_status(&registry, DOOR_HANDLE_ENDPOINT), before);
    }

    #[test]
    fn test_malformed_frame_is_an_error() {
        let registry = paired_registry();
        // Data report with a truncated data point
        let asdu = [0x09, 0x01, 0x02, 0x00, 0x01, 0x01, 0x01, 0x00, 0x01];
        assert!(matches!(
            registry.handle_zcl(&IEEE, TUYA_CLUSTER_ID, &asdu),
            Err(QuirkError::Protocol(_))
        ));
    }

    #[test]
    fn test_unknown_device() {
        let registry = QuirkRegistry::with_builtin_quirks().unwrap();
        let dp = DataPoint::new(DOOR_HANDLE_DP, DpValue::Bool(true));
        assert!(matches!(
            registry.handle_data_point(&IEEE, &dp),
            Err(QuirkError::DeviceNotFound(_))
        ));
        assert!(registry.snapshot(&IEEE).is_none());
    }

    #[test]
    fn test_remove_discards_state() {
        let registry = paired_registry();
        registry
            .handle_data_point(&IEEE, &DataPoint::new(DOOR_HANDLE_DP, DpValue::Bool(true)))
            .unwrap();

        assert!(registry.remove(&IEEE));
        assert!(!registry.remove(&IEEE));
        assert_eq!(zone_status(&registry, DOOR_HANDLE_ENDPOINT), None);

        // Re-pairing starts from the defaults
        assert!(registry.pair(&door_sensor()));
        assert_eq!(
            zone_status(&registry, DOOR_HANDLE_ENDPOINT),
            Some(AttributeValue::Bitmap16(0))
        );
    }

    #[tokio::test]
    async fn test_attribute_updates_are_broadcast() {
        let registry = paired_registry();
        let mut rx = registry.subscribe();

        registry
            .handle_data_point(&IEEE, &DataPoint::new(BATTERY_DP, DpValue::Value(57)))
            .unwrap();
        // Unknown data points produce no event
        registry
            .handle_data_point(&IEEE, &DataPoint::new(99, DpValue::Value(1)))
            .unwrap();
        registry.remove(&IEEE);

        match rx.recv().await.unwrap() {
            QuirkEvent::AttributeUpdated {
                ieee_address,
                update,
            } => {
                assert_eq!(ieee_address, IEEE);
                assert_eq!(update.endpoint_id, DP_HANDLER_ENDPOINT);
                assert_eq!(update.value, AttributeValue::Uint8(114));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            rx.recv().await.unwrap(),
            QuirkEvent::DeviceRemoved { .. }
        ));
    }
}
