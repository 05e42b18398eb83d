//! Data point to attribute mapping

use crate::convert::Converter;
use crate::error::QuirkError;
use std::collections::BTreeMap;
use zigbee_core::cluster::{ias_zone_attrs, id, power_config_attrs};
use zigbee_core::{AttributeValue, LocalCluster};

/// Typed attribute writes a data point can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeSetter {
    /// IAS Zone `zone_status`
    ZoneStatus,
    /// Power Configuration `battery_percentage_remaining`
    BatteryPercentageRemaining,
}

impl AttributeSetter {
    #[must_use]
    pub fn cluster_id(self) -> u16 {
        match self {
            AttributeSetter::ZoneStatus => id::IAS_ZONE,
            AttributeSetter::BatteryPercentageRemaining => id::POWER_CONFIG,
        }
    }

    #[must_use]
    pub fn attribute_id(self) -> u16 {
        match self {
            AttributeSetter::ZoneStatus => ias_zone_attrs::ZONE_STATUS,
            AttributeSetter::BatteryPercentageRemaining => {
                power_config_attrs::BATTERY_PERCENTAGE_REMAINING
            }
        }
    }

    /// Write a converted value into the cluster's cache
    pub fn write(self, cluster: &mut LocalCluster, value: i64) -> Result<AttributeValue, QuirkError> {
        let out_of_range = || QuirkError::ValueOutOfRange {
            setter: self,
            value,
        };
        let mismatch = QuirkError::ClusterMismatch {
            setter: self,
            cluster_id: cluster.cluster_id(),
        };

        match self {
            AttributeSetter::ZoneStatus => {
                let status = u16::try_from(value).map_err(|_| out_of_range())?;
                let attrs = cluster.as_ias_zone_mut().ok_or(mismatch)?;
                Ok(attrs.set_zone_status(status))
            }
            AttributeSetter::BatteryPercentageRemaining => {
                let half_percent = u8::try_from(value).map_err(|_| out_of_range())?;
                let attrs = cluster.as_power_configuration_mut().ok_or(mismatch)?;
                Ok(attrs.set_battery_percentage_remaining(half_percent))
            }
        }
    }
}

/// Where a data point's value ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeTarget {
    /// Replacement endpoint hosting the target cluster
    pub endpoint_id: u8,
    pub setter: AttributeSetter,
    pub converter: Converter,
}

impl AttributeTarget {
    #[must_use]
    pub fn new(endpoint_id: u8, setter: AttributeSetter, converter: Converter) -> Self {
        Self {
            endpoint_id,
            setter,
            converter,
        }
    }
}

/// Immutable table from data point ID to its target
#[derive(Debug, Clone, Default)]
pub struct DataPointTable {
    targets: BTreeMap<u8, AttributeTarget>,
}

impl DataPointTable {
    /// Build a table, rejecting data points mapped twice
    pub fn new(entries: impl IntoIterator<Item = (u8, AttributeTarget)>) -> Result<Self, QuirkError> {
        let mut targets = BTreeMap::new();
        for (dp, target) in entries {
            if targets.insert(dp, target).is_some() {
                return Err(QuirkError::DuplicateDataPoint(dp));
            }
        }
        Ok(Self { targets })
    }

    #[must_use]
    pub fn get(&self, dp: u8) -> Option<&AttributeTarget> {
        self.targets.get(&dp)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &AttributeTarget)> {
        self.targets.iter().map(|(dp, target)| (*dp, target))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
