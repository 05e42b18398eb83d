//! Device signatures
//!
//! A signature describes what a device advertises when it joins: its
//! manufacturer/model pair and the simple descriptor of every endpoint.

use crate::device::{Endpoint, ZigbeeDevice};
use serde::{Deserialize, Serialize};

/// Manufacturer name and model identifier as read from the Basic cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub manufacturer: String,
    pub model: String,
}

impl ModelInfo {
    pub fn new(manufacturer: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            model: model.into(),
        }
    }
}

/// Expected advertisement of a device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSignature {
    /// Accepted manufacturer/model pairs
    pub models: Vec<ModelInfo>,
    /// Expected endpoints
    pub endpoints: Vec<Endpoint>,
}

impl DeviceSignature {
    /// Check whether a device advertises exactly this signature
    #[must_use]
    pub fn matches(&self, device: &ZigbeeDevice) -> bool {
        let (Some(manufacturer), Some(model)) = (&device.manufacturer, &device.model) else {
            return false;
        };

        let known_model = self
            .models
            .iter()
            .any(|info| &info.manufacturer == manufacturer && &info.model == model);
        if !known_model || self.endpoints.len() != device.endpoints.len() {
            return false;
        }

        self.endpoints.iter().all(|expected| {
            device
                .endpoint(expected.id)
                .is_some_and(|actual| expected.same_layout(actual))
        })
    }
}
