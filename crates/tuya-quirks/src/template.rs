//! Cluster templates and their attribute defaults

use zigbee_core::cluster::{id, BatterySize, PowerSource, ZoneState, ZoneType};
use zigbee_core::local::{BasicAttributes, IasZoneAttributes, PowerConfigurationAttributes};
use zigbee_core::LocalCluster;

/// Battery level reported before the device sends its first reading (100%)
pub const FULL_BATTERY: u8 = 200;

/// A cluster listed on a replacement endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterTemplate {
    /// Cluster served by the device itself, no local cache
    Standard(u16),
    /// Basic cluster reporting a fixed power source
    Basic { power_source: PowerSource },
    /// Power Configuration cluster fed from battery data points
    PowerConfiguration {
        battery_size: BatterySize,
        battery_quantity: u8,
    },
    /// IAS Zone cluster fed from alarm data points
    IasZone { zone_type: ZoneType },
    /// Manufacturer cluster that receives the data points
    Manufacturer(u16),
}

impl ClusterTemplate {
    #[must_use]
    pub fn cluster_id(&self) -> u16 {
        match self {
            ClusterTemplate::Standard(cluster_id) | ClusterTemplate::Manufacturer(cluster_id) => {
                *cluster_id
            }
            ClusterTemplate::Basic { .. } => id::BASIC,
            ClusterTemplate::PowerConfiguration { .. } => id::POWER_CONFIG,
            ClusterTemplate::IasZone { .. } => id::IAS_ZONE,
        }
    }

    /// Create the local cluster with its attributes seeded, if the template has one
    #[must_use]
    pub fn instantiate(&self) -> Option<LocalCluster> {
        match *self {
            ClusterTemplate::Standard(_) => None,
            ClusterTemplate::Basic { power_source } => {
                Some(LocalCluster::Basic(BasicAttributes::new(power_source)))
            }
            ClusterTemplate::PowerConfiguration {
                battery_size,
                battery_quantity,
            } => Some(LocalCluster::PowerConfiguration(
                PowerConfigurationAttributes::new(battery_size, battery_quantity, FULL_BATTERY),
            )),
            ClusterTemplate::IasZone { zone_type } => Some(LocalCluster::IasZone(
                IasZoneAttributes::new(ZoneState::NotEnrolled, zone_type, 0x0000),
            )),
            ClusterTemplate::Manufacturer(cluster_id) => {
                Some(LocalCluster::Manufacturer { cluster_id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_has_no_cache() {
        let template = ClusterTemplate::Standard(id::GROUPS);
        assert_eq!(template.cluster_id(), 0x0004);
        assert!(template.instantiate().is_none());
    }

    #[test]
    fn test_power_configuration_defaults() {
        let cluster = ClusterTemplate::PowerConfiguration {
            battery_size: BatterySize::Aaa,
            battery_quantity: 2,
        }
        .instantiate()
        .unwrap();
        let attrs = cluster.as_power_configuration().unwrap();
        assert_eq!(attrs.battery_percentage_remaining(), 200);
        assert_eq!(attrs.battery_size(), BatterySize::Aaa);
        assert_eq!(attrs.battery_quantity(), 2);
    }

    #[test]
    fn test_ias_zone_defaults() {
        let cluster = ClusterTemplate::IasZone {
            zone_type: ZoneType::ContactSwitch,
        }
        .instantiate()
        .unwrap();
        let attrs = cluster.as_ias_zone().unwrap();
        assert_eq!(attrs.zone_state(), ZoneState::NotEnrolled);
        assert_eq!(attrs.zone_type(), ZoneType::ContactSwitch);
        assert_eq!(attrs.zone_status(), 0);
    }
}
