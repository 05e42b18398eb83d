//! Local clusters
//!
//! A local cluster keeps its attribute values on the hub instead of reading
//! them from the device. Each supported cluster type has a typed record;
//! [`LocalCluster`] selects between them.

use crate::cluster::{
    basic_attrs, ias_zone_attrs, id, power_config_attrs, BatterySize, DataType, PowerSource,
    ZoneState, ZoneType,
};
use serde::Serialize;

/// A typed attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Uint8(u8),
    Enum8(u8),
    Enum16(u16),
    Bitmap16(u16),
}

impl AttributeValue {
    /// ZCL data type of the value
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            AttributeValue::Uint8(_) => DataType::Uint8,
            AttributeValue::Enum8(_) => DataType::Enum8,
            AttributeValue::Enum16(_) => DataType::Enum16,
            AttributeValue::Bitmap16(_) => DataType::Bitmap16,
        }
    }
}

/// Basic cluster attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAttributes {
    power_source: PowerSource,
}

impl BasicAttributes {
    #[must_use]
    pub fn new(power_source: PowerSource) -> Self {
        Self { power_source }
    }

    #[must_use]
    pub fn power_source(&self) -> PowerSource {
        self.power_source
    }

    fn read(&self, attribute_id: u16) -> Option<AttributeValue> {
        match attribute_id {
            basic_attrs::POWER_SOURCE => Some(AttributeValue::Enum8(self.power_source as u8)),
            _ => None,
        }
    }
}

/// Power Configuration cluster attributes (battery section)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerConfigurationAttributes {
    battery_size: BatterySize,
    battery_quantity: u8,
    /// Remaining charge in 0.5% steps (200 = 100%)
    battery_percentage_remaining: u8,
}

impl PowerConfigurationAttributes {
    #[must_use]
    pub fn new(battery_size: BatterySize, battery_quantity: u8, battery_percentage_remaining: u8) -> Self {
        Self {
            battery_size,
            battery_quantity,
            battery_percentage_remaining,
        }
    }

    #[must_use]
    pub fn battery_size(&self) -> BatterySize {
        self.battery_size
    }

    #[must_use]
    pub fn battery_quantity(&self) -> u8 {
        self.battery_quantity
    }

    #[must_use]
    pub fn battery_percentage_remaining(&self) -> u8 {
        self.battery_percentage_remaining
    }

    pub fn set_battery_percentage_remaining(&mut self, half_percent: u8) -> AttributeValue {
        self.battery_percentage_remaining = half_percent;
        AttributeValue::Uint8(half_percent)
    }

    fn read(&self, attribute_id: u16) -> Option<AttributeValue> {
        match attribute_id {
            power_config_attrs::BATTERY_PERCENTAGE_REMAINING => {
                Some(AttributeValue::Uint8(self.battery_percentage_remaining))
            }
            power_config_attrs::BATTERY_SIZE => Some(AttributeValue::Enum8(self.battery_size as u8)),
            power_config_attrs::BATTERY_QUANTITY => Some(AttributeValue::Uint8(self.battery_quantity)),
            _ => None,
        }
    }
}

/// IAS Zone cluster attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IasZoneAttributes {
    zone_state: ZoneState,
    zone_type: ZoneType,
    zone_status: u16,
}

impl IasZoneAttributes {
    #[must_use]
    pub fn new(zone_state: ZoneState, zone_type: ZoneType, zone_status: u16) -> Self {
        Self {
            zone_state,
            zone_type,
            zone_status,
        }
    }

    #[must_use]
    pub fn zone_state(&self) -> ZoneState {
        self.zone_state
    }

    #[must_use]
    pub fn zone_type(&self) -> ZoneType {
        self.zone_type
    }

    #[must_use]
    pub fn zone_status(&self) -> u16 {
        self.zone_status
    }

    pub fn set_zone_status(&mut self, status: u16) -> AttributeValue {
        self.zone_status = status;
        AttributeValue::Bitmap16(status)
    }

    fn read(&self, attribute_id: u16) -> Option<AttributeValue> {
        match attribute_id {
            ias_zone_attrs::ZONE_STATE => Some(AttributeValue::Enum8(self.zone_state as u8)),
            ias_zone_attrs::ZONE_TYPE => Some(AttributeValue::Enum16(self.zone_type as u16)),
            ias_zone_attrs::ZONE_STATUS => Some(AttributeValue::Bitmap16(self.zone_status)),
            _ => None,
        }
    }
}

/// A cluster instance hosted on the hub, with its attribute cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalCluster {
    Basic(BasicAttributes),
    PowerConfiguration(PowerConfigurationAttributes),
    IasZone(IasZoneAttributes),
    /// Manufacturer-specific cluster that only receives commands
    Manufacturer { cluster_id: u16 },
}

impl LocalCluster {
    #[must_use]
    pub fn cluster_id(&self) -> u16 {
        match self {
            LocalCluster::Basic(_) => id::BASIC,
            LocalCluster::PowerConfiguration(_) => id::POWER_CONFIG,
            LocalCluster::IasZone(_) => id::IAS_ZONE,
            LocalCluster::Manufacturer { cluster_id } => *cluster_id,
        }
    }

    /// Attribute IDs held by this cluster
    #[must_use]
    pub fn attribute_ids(&self) -> &'static [u16] {
        match self {
            LocalCluster::Basic(_) => &[basic_attrs::POWER_SOURCE],
            LocalCluster::PowerConfiguration(_) => &[
                power_config_attrs::BATTERY_PERCENTAGE_REMAINING,
                power_config_attrs::BATTERY_SIZE,
                power_config_attrs::BATTERY_QUANTITY,
            ],
            LocalCluster::IasZone(_) => &[
                ias_zone_attrs::ZONE_STATE,
                ias_zone_attrs::ZONE_TYPE,
                ias_zone_attrs::ZONE_STATUS,
            ],
            LocalCluster::Manufacturer { .. } => &[],
        }
    }

    /// Read a cached attribute
    #[must_use]
    pub fn read(&self, attribute_id: u16) -> Option<AttributeValue> {
        match self {
            LocalCluster::Basic(attrs) => attrs.read(attribute_id),
            LocalCluster::PowerConfiguration(attrs) => attrs.read(attribute_id),
            LocalCluster::IasZone(attrs) => attrs.read(attribute_id),
            LocalCluster::Manufacturer { .. } => None,
        }
    }

    /// All cached attributes in ID order
    #[must_use]
    pub fn attributes(&self) -> Vec<(u16, AttributeValue)> {
        let mut attrs: Vec<_> = self
            .attribute_ids()
            .iter()
            .filter_map(|&attr| self.read(attr).map(|value| (attr, value)))
            .collect();
        attrs.sort_by_key(|(attr, _)| *attr);
        attrs
    }

    #[must_use]
    pub fn as_ias_zone(&self) -> Option<&IasZoneAttributes> {
        match self {
            LocalCluster::IasZone(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn as_ias_zone_mut(&mut self) -> Option<&mut IasZoneAttributes> {
        match self {
            LocalCluster::IasZone(attrs) => Some(attrs),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_power_configuration(&self) -> Option<&PowerConfigurationAttributes> {
        match self {
            LocalCluster::PowerConfiguration(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn as_power_configuration_mut(&mut self) -> Option<&mut PowerConfigurationAttributes> {
        match self {
            LocalCluster::PowerConfiguration(attrs) => Some(attrs),
            _ => None,
        }
    }
}
