//! Resource configuration
//!
//! Attributes arrive from the host as a JSON object.  Required names
//! (`servo_name`, `vision_name`, `camera_name`) are checked here; the
//! door geometry and loop timing are fixed constants, not attributes.

use core::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Model triplet the resource registers under.
pub const MODEL: &str = "devrel:securibot:doorbot";

// --- Door geometry (servo native units) ---
/// Offset added to the current position to open the door.
pub const DOOR_OPEN_OFFSET: f64 = 50.0;
/// Absolute position the door returns to when closing.
pub const DOOR_CLOSED_POSITION: f64 = 10.0;

// --- Timing ---
/// How long the door stays open before closing.
pub const DOOR_HOLD: Duration = Duration::from_secs(1);
/// Pause between control-loop ticks, on top of any door hold.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Raw resource attributes as supplied by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorbotConfig {
    pub servo_name: Option<String>,
    pub vision_name: Option<String>,
    pub camera_name: Option<String>,
    /// Class labels allowed to open the door.  Absent or `null` is empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub access_list: Vec<String>,
    /// Start polling as soon as the resource is configured.
    #[serde(default = "default_auto_start")]
    pub auto_start: bool,
}

fn default_auto_start() -> bool {
    true
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for DoorbotConfig {
    fn default() -> Self {
        Self {
            servo_name: None,
            vision_name: None,
            camera_name: None,
            access_list: Vec::new(),
            auto_start: true,
        }
    }
}

/// Configuration with every required attribute present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub servo_name: String,
    pub vision_name: String,
    pub camera_name: String,
    pub access_list: AccessList,
    pub auto_start: bool,
}

impl DoorbotConfig {
    /// Decode an attribute map.  `null` is treated as an empty map.
    pub fn from_attributes(attrs: &serde_json::Value) -> Result<Self, ConfigError> {
        if attrs.is_null() {
            return Ok(Self::default());
        }
        Self::deserialize(attrs).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Check required attributes.  The first missing one is reported.
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        let servo_name = self.servo_name.ok_or(ConfigError::MissingField("servo_name"))?;
        let vision_name = self.vision_name.ok_or(ConfigError::MissingField("vision_name"))?;
        let camera_name = self.camera_name.ok_or(ConfigError::MissingField("camera_name"))?;
        Ok(ValidatedConfig {
            servo_name,
            vision_name,
            camera_name,
            access_list: self.access_list.into_iter().collect(),
            auto_start: self.auto_start,
        })
    }
}

impl ValidatedConfig {
    /// Names of the resources this one depends on.
    pub fn implicit_dependencies(&self) -> Vec<String> {
        vec![self.servo_name.clone(), self.vision_name.clone()]
    }
}

// ---------------------------------------------------------------------------
// Access list
// ---------------------------------------------------------------------------

/// Insertion-ordered set of class labels authorised to open the door.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessList {
    labels: Vec<String>,
}

impl AccessList {
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AccessList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut labels: Vec<String> = Vec::new();
        for label in iter {
            let label = label.into();
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        Self { labels }
    }
}
