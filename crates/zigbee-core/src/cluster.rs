//! ZCL (Zigbee Cluster Library) definitions

use serde::{Deserialize, Serialize};

/// Common ZCL cluster IDs
pub mod id {
    // General Clusters
    pub const BASIC: u16 = 0x0000;
    pub const POWER_CONFIG: u16 = 0x0001;
    pub const GROUPS: u16 = 0x0004;
    pub const SCENES: u16 = 0x0005;
    pub const TIME: u16 = 0x000A;
    pub const OTA: u16 = 0x0019;

    // Security Clusters
    pub const IAS_ZONE: u16 = 0x0500;
}

/// Application profile IDs
pub mod profile {
    pub const HOME_AUTOMATION: u16 = 0x0104;
}

/// Home Automation device type IDs
pub mod device_type {
    pub const SMART_PLUG: u16 = 0x0051;
    pub const IAS_ZONE: u16 = 0x0402;
}

/// Basic cluster attributes
pub mod basic_attrs {
    pub const POWER_SOURCE: u16 = 0x0007;
}

/// Power Configuration cluster attributes
pub mod power_config_attrs {
    pub const BATTERY_PERCENTAGE_REMAINING: u16 = 0x0021;
    pub const BATTERY_SIZE: u16 = 0x0031;
    pub const BATTERY_QUANTITY: u16 = 0x0033;
}

/// IAS Zone cluster attributes
pub mod ias_zone_attrs {
    pub const ZONE_STATE: u16 = 0x0000;
    pub const ZONE_TYPE: u16 = 0x0001;
    pub const ZONE_STATUS: u16 = 0x0002;
}

/// IAS Zone status bits
pub mod zone_status {
    pub const ALARM_1: u16 = 0x0001;
}

/// Basic cluster power source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PowerSource {
    Unknown = 0x00,
    Mains = 0x01,
    MainsThreePhase = 0x02,
    Battery = 0x03,
    Dc = 0x04,
    EmergencyConstant = 0x05,
    EmergencySwitched = 0x06,
}

/// Power Configuration battery size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BatterySize {
    NoBattery = 0x00,
    BuiltIn = 0x01,
    Other = 0x02,
    Aa = 0x03,
    Aaa = 0x04,
    C = 0x05,
    D = 0x06,
    Cr2 = 0x07,
    Cr123a = 0x08,
    Unknown = 0xFF,
}

/// IAS Zone enrollment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ZoneState {
    NotEnrolled = 0x00,
    Enrolled = 0x01,
}

/// IAS Zone type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum ZoneType {
    StandardCie = 0x0000,
    MotionSensor = 0x000D,
    ContactSwitch = 0x0015,
    FireSensor = 0x0028,
    WaterSensor = 0x002A,
    CarbonMonoxideSensor = 0x002B,
    PersonalEmergencyDevice = 0x002C,
    VibrationMovementSensor = 0x002D,
    RemoteControl = 0x010F,
    KeyFob = 0x0115,
    Keypad = 0x021D,
    StandardWarningDevice = 0x0225,
    GlassBreakSensor = 0x0226,
    SecurityRepeater = 0x0229,
    Invalid = 0xFFFF,
}

/// ZCL data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataType {
    Bitmap16 = 0x19,
    Uint8 = 0x20,
    Enum8 = 0x30,
    Enum16 = 0x31,
}
