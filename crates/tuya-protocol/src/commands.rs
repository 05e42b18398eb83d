//! Tuya cluster command definitions

/// Server-to-client command IDs on the Tuya cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TuyaCommand {
    /// Data points returned for a query
    DataResponse = 0x01,
    /// Data points reported after a change on the device
    DataReport = 0x02,
    /// Periodic status report of all data points
    ActiveStatusReport = 0x06,
    /// Device asks the gateway for the current time
    TimeRequest = 0x24,
}

impl TuyaCommand {
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(TuyaCommand::DataResponse),
            0x02 => Some(TuyaCommand::DataReport),
            0x06 => Some(TuyaCommand::ActiveStatusReport),
            0x24 => Some(TuyaCommand::TimeRequest),
            _ => None,
        }
    }

    /// Whether the command payload is a list of data points
    #[must_use]
    pub fn carries_data_points(self) -> bool {
        matches!(
            self,
            TuyaCommand::DataResponse | TuyaCommand::DataReport | TuyaCommand::ActiveStatusReport
        )
    }
}
