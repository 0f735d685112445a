//! Machine envelopes: axis travel, spindle range, and feed ceiling for a
//! specific mill model. The three Tormach PathPilot models this post-
//! processor targets are fixed presets; a profile can also round-trip
//! through TOML for a machine the presets don't cover.

use serde::{Deserialize, Serialize};

use crate::error::PostError;

/// Axis travel ranges and motor/spindle limits of the machine. Z = 0 is
/// the top of stock; positive Z is above the material, so `z_max` is the
/// above-stock clearance and `z_min` is the deepest the spindle can travel
/// into the table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineEnvelope {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
    pub min_rpm: u32,
    pub max_rpm: u32,
    pub max_feed: f64,
}

/// A named machine profile: model name plus its envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineProfile {
    pub model: String,
    pub envelope: MachineEnvelope,
}

impl MachineProfile {
    /// Tormach PCNC 440: 10.0in x, 6.25in y, z-min -10.0, 100-10000 RPM, 110 IPM.
    pub fn pcnc_440() -> Self {
        Self {
            model: "PCNC 440".into(),
            envelope: MachineEnvelope {
                x_min: 0.0,
                x_max: 10.0,
                y_min: 0.0,
                y_max: 6.25,
                z_min: -10.0,
                z_max: 5.0,
                min_rpm: 100,
                max_rpm: 10000,
                max_feed: 110.0,
            },
        }
    }

    /// Tormach PCNC 770: 12.0in x, 8.0in y, z-min -10.25, 175-10000 RPM, 110 IPM.
    pub fn pcnc_770() -> Self {
        Self {
            model: "PCNC 770".into(),
            envelope: MachineEnvelope {
                x_min: 0.0,
                x_max: 12.0,
                y_min: 0.0,
                y_max: 8.0,
                z_min: -10.25,
                z_max: 5.0,
                min_rpm: 175,
                max_rpm: 10000,
                max_feed: 110.0,
            },
        }
    }

    /// Tormach PCNC 1100: 18.0in x, 9.5in y, z-min -16.25, 175-10000 RPM, 135 IPM.
    pub fn pcnc_1100() -> Self {
        Self {
            model: "PCNC 1100".into(),
            envelope: MachineEnvelope {
                x_min: 0.0,
                x_max: 18.0,
                y_min: 0.0,
                y_max: 9.5,
                z_min: -16.25,
                z_max: 5.0,
                min_rpm: 175,
                max_rpm: 10000,
                max_feed: 135.0,
            },
        }
    }

    pub fn to_toml(&self) -> Result<String, PostError> {
        toml::to_string_pretty(self).map_err(|e| PostError::MachineProfile(e.to_string()))
    }

    pub fn from_toml(text: &str) -> Result<Self, PostError> {
        Ok(toml::from_str(text)?)
    }
}
