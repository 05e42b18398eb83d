//! Tuya TS0601 vibration door sensor
//!
//! The device reports vibration, open/closed state and remaining battery
//! through Tuya data points on a single endpoint. The replacement splits it
//! into three endpoints:
//!
//! - endpoint 1 receives the data points and hosts the battery cluster,
//! - endpoint 2 is the open/closed contact switch,
//! - endpoint 3 is the vibration sensor.
//!
//! Both sensors are IAS Zone clusters, which cannot share an endpoint.

use crate::convert::Converter;
use crate::error::QuirkError;
use crate::mapping::{AttributeSetter, AttributeTarget};
use crate::quirk::{Quirk, ReplacementEndpoint};
use crate::template::ClusterTemplate;
use tuya_protocol::TUYA_CLUSTER_ID;
use zigbee_core::cluster::{
    device_type, id, profile, zone_status, BatterySize, PowerSource, ZoneType,
};
use zigbee_core::{DeviceSignature, Endpoint, ModelInfo};

pub const MANUFACTURER: &str = "_TZE200_kzm5w4iz";
pub const MODEL: &str = "TS0601";

pub const DOOR_HANDLE_DP: u8 = 1;
pub const BATTERY_DP: u8 = 3;
pub const VIBRATION_DP: u8 = 10;

pub const DP_HANDLER_ENDPOINT: u8 = 1;
pub const DOOR_HANDLE_ENDPOINT: u8 = 2;
pub const VIBRATION_ENDPOINT: u8 = 3;

/// What the device advertises when it joins
#[must_use]
pub fn signature() -> DeviceSignature {
    DeviceSignature {
        models: vec![ModelInfo::new(MANUFACTURER, MODEL)],
        endpoints: vec![Endpoint {
            id: 1,
            profile_id: profile::HOME_AUTOMATION,
            device_id: device_type::SMART_PLUG,
            in_clusters: vec![id::BASIC, id::GROUPS, id::SCENES, TUYA_CLUSTER_ID],
            out_clusters: vec![id::TIME, id::OTA],
        }],
    }
}

const BATTERY_BASIC: ClusterTemplate = ClusterTemplate::Basic {
    power_source: PowerSource::Battery,
};

/// The synthesized endpoints
#[must_use]
pub fn replacement() -> Vec<ReplacementEndpoint> {
    vec![
        ReplacementEndpoint {
            id: DP_HANDLER_ENDPOINT,
            profile_id: profile::HOME_AUTOMATION,
            device_id: device_type::SMART_PLUG,
            in_clusters: vec![
                BATTERY_BASIC,
                ClusterTemplate::Standard(id::GROUPS),
                ClusterTemplate::Standard(id::SCENES),
                ClusterTemplate::PowerConfiguration {
                    battery_size: BatterySize::Aaa,
                    battery_quantity: 2,
                },
                ClusterTemplate::Manufacturer(TUYA_CLUSTER_ID),
            ],
            out_clusters: vec![id::TIME, id::OTA],
        },
        sensor_endpoint(DOOR_HANDLE_ENDPOINT, ZoneType::ContactSwitch),
        sensor_endpoint(VIBRATION_ENDPOINT, ZoneType::VibrationMovementSensor),
    ]
}

fn sensor_endpoint(endpoint_id: u8, zone_type: ZoneType) -> ReplacementEndpoint {
    ReplacementEndpoint {
        id: endpoint_id,
        profile_id: profile::HOME_AUTOMATION,
        device_id: device_type::IAS_ZONE,
        in_clusters: vec![
            BATTERY_BASIC,
            ClusterTemplate::Standard(id::GROUPS),
            ClusterTemplate::Standard(id::SCENES),
            ClusterTemplate::IasZone { zone_type },
        ],
        out_clusters: vec![id::TIME],
    }
}

/// Data point routing
#[must_use]
pub fn data_points() -> Vec<(u8, AttributeTarget)> {
    let alarm = Converter::Mask(i64::from(zone_status::ALARM_1));
    vec![
        (
            DOOR_HANDLE_DP,
            AttributeTarget::new(DOOR_HANDLE_ENDPOINT, AttributeSetter::ZoneStatus, alarm),
        ),
        (
            VIBRATION_DP,
            AttributeTarget::new(VIBRATION_ENDPOINT, AttributeSetter::ZoneStatus, alarm),
        ),
        // Device reports 1% steps, the attribute is in 0.5% steps
        (
            BATTERY_DP,
            AttributeTarget::new(
                DP_HANDLER_ENDPOINT,
                AttributeSetter::BatteryPercentageRemaining,
                Converter::Scale(2),
            ),
        ),
    ]
}

/// Build the quirk
pub fn quirk() -> Result<Quirk, QuirkError> {
    Quirk::new(
        "Tuya TS0601 vibration door sensor",
        signature(),
        replacement(),
        data_points(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::QuirkedDevice;
    use std::sync::Arc;
    use tuya_protocol::{DataPoint, DpValue};
    use zigbee_core::cluster::{basic_attrs, ias_zone_attrs, power_config_attrs, ZoneState};
    use zigbee_core::{AttributeValue, ZigbeeDevice};

    const IEEE: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    fn device() -> QuirkedDevice {
        QuirkedDevice::new(IEEE, Arc::new(quirk().unwrap()))
    }

    fn zone_status_of(device: &QuirkedDevice, endpoint: u8) -> u16 {
        device
            .cluster(endpoint, id::IAS_ZONE)
            .and_then(|c| c.as_ias_zone())
            .map(|z| z.zone_status())
            .unwrap()
    }

    fn battery_of(device: &QuirkedDevice) -> u8 {
        device
            .cluster(DP_HANDLER_ENDPOINT, id::POWER_CONFIG)
            .and_then(|c| c.as_power_configuration())
            .map(|p| p.battery_percentage_remaining())
            .unwrap()
    }

    #[test]
    fn test_quirk_is_valid() {
        let quirk = quirk().unwrap();
        assert_eq!(quirk.data_points().len(), 3);
        assert_eq!(quirk.replacement().len(), 3);
    }

    #[test]
    fn test_matches_real_device() {
        let mut real = ZigbeeDevice::new(IEEE, 0x5A5A);
        real.manufacturer = Some(MANUFACTURER.to_string());
        real.model = Some(MODEL.to_string());
        real.endpoints = vec![Endpoint {
            id: 1,
            profile_id: 260,
            device_id: 81,
            in_clusters: vec![4, 5, 61184, 0],
            out_clusters: vec![25, 10],
        }];
        let quirk = quirk().unwrap();
        assert!(quirk.matches(&real));

        real.model = Some("TS0207".to_string());
        assert!(!quirk.matches(&real));
    }

    #[test]
    fn test_initial_attributes() {
        let device = device();

        assert_eq!(battery_of(&device), 200);
        let power = device
            .cluster(DP_HANDLER_ENDPOINT, id::POWER_CONFIG)
            .and_then(|c| c.as_power_configuration())
            .unwrap();
        assert_eq!(power.battery_size(), BatterySize::Aaa);
        assert_eq!(power.battery_quantity(), 2);

        for endpoint in [DP_HANDLER_ENDPOINT, DOOR_HANDLE_ENDPOINT, VIBRATION_ENDPOINT] {
            assert_eq!(
                device.attribute(endpoint, id::BASIC, basic_attrs::POWER_SOURCE),
                Some(AttributeValue::Enum8(PowerSource::Battery as u8))
            );
        }

        assert_eq!(zone_status_of(&device, DOOR_HANDLE_ENDPOINT), 0);
        assert_eq!(zone_status_of(&device, VIBRATION_ENDPOINT), 0);
        assert_eq!(
            device.attribute(DOOR_HANDLE_ENDPOINT, id::IAS_ZONE, ias_zone_attrs::ZONE_TYPE),
            Some(AttributeValue::Enum16(ZoneType::ContactSwitch as u16))
        );
        assert_eq!(
            device.attribute(VIBRATION_ENDPOINT, id::IAS_ZONE, ias_zone_attrs::ZONE_TYPE),
            Some(AttributeValue::Enum16(ZoneType::VibrationMovementSensor as u16))
        );
        for endpoint in [DOOR_HANDLE_ENDPOINT, VIBRATION_ENDPOINT] {
            assert_eq!(
                device.attribute(endpoint, id::IAS_ZONE, ias_zone_attrs::ZONE_STATE),
                Some(AttributeValue::Enum8(ZoneState::NotEnrolled as u8))
            );
        }
    }

    #[test]
    fn test_topology_has_one_instance_per_cluster() {
        let device = device();
        for endpoint in device.endpoints() {
            assert_eq!(endpoint.duplicate_cluster(), None, "EP{}", endpoint.id);
        }

        let zone_endpoints: Vec<u8> = device
            .endpoints()
            .filter(|ep| ep.in_clusters.contains(&id::IAS_ZONE))
            .map(|ep| ep.id)
            .collect();
        assert_eq!(zone_endpoints, vec![DOOR_HANDLE_ENDPOINT, VIBRATION_ENDPOINT]);
        for ep in zone_endpoints {
            let descriptor = device.endpoints().find(|e| e.id == ep).unwrap();
            let zones = descriptor
                .in_clusters
                .iter()
                .filter(|c| **c == id::IAS_ZONE)
                .count();
            assert_eq!(zones, 1);
        }
    }

    #[test]
    fn test_door_open_leaves_vibration_untouched() {
        let mut device = device();
        let update = device
            .dispatch(&DataPoint::new(DOOR_HANDLE_DP, DpValue::Bool(true)))
            .unwrap()
            .unwrap();

        assert_eq!(update.endpoint_id, DOOR_HANDLE_ENDPOINT);
        assert_eq!(update.cluster_id, id::IAS_ZONE);
        assert_eq!(update.attribute_id, ias_zone_attrs::ZONE_STATUS);
        assert_eq!(update.value, AttributeValue::Bitmap16(1));
        assert_eq!(zone_status_of(&device, DOOR_HANDLE_ENDPOINT), 1);
        assert_eq!(zone_status_of(&device, VIBRATION_ENDPOINT), 0);

        device
            .dispatch(&DataPoint::new(DOOR_HANDLE_DP, DpValue::Bool(false)))
            .unwrap();
        assert_eq!(zone_status_of(&device, DOOR_HANDLE_ENDPOINT), 0);
    }

    #[test]
    fn test_vibration_masks_to_alarm_bit() {
        let mut device = device();
        for (raw, expected) in [(0, 0), (1, 1), (0b110, 0), (0xFF, 1)] {
            device
                .dispatch(&DataPoint::new(VIBRATION_DP, DpValue::Value(raw)))
                .unwrap();
            assert_eq!(zone_status_of(&device, VIBRATION_ENDPOINT), expected, "raw={raw}");
            assert_eq!(zone_status_of(&device, DOOR_HANDLE_ENDPOINT), 0);
        }
    }

    #[test]
    fn test_battery_is_doubled() {
        let mut device = device();
        for raw in 0..=100 {
            let update = device
                .dispatch(&DataPoint::new(BATTERY_DP, DpValue::Value(raw)))
                .unwrap()
                .unwrap();
            assert_eq!(update.attribute_id, power_config_attrs::BATTERY_PERCENTAGE_REMAINING);
            let stored = battery_of(&device);
            assert_eq!(i32::from(stored), raw * 2);
            assert!(stored <= 200);
        }
    }

    #[test]
    fn test_unknown_data_point_is_noop() {
        let mut device = device();
        let before = device.clone();
        for dp in [0, 2, 4, 9, 11, 101, 255] {
            let result = device.dispatch(&DataPoint::new(dp, DpValue::Value(1)));
            assert_eq!(result, Ok(None));
        }
        for ep in [DP_HANDLER_ENDPOINT, DOOR_HANDLE_ENDPOINT, VIBRATION_ENDPOINT] {
            for cluster in [id::BASIC, id::POWER_CONFIG, id::IAS_ZONE, TUYA_CLUSTER_ID] {
                assert_eq!(device.cluster(ep, cluster), before.cluster(ep, cluster));
            }
        }
    }
}
