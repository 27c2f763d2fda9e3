use crate::domain::model::{Angle, DeviceProfile, Point3};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_unique_ids, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which machine identity verification beams carry. Defaults to the
/// source treatment unit, even though delivery happens on the QA device;
/// sites that file plans under the device itself pick `QaDevice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineIdentityPolicy {
    #[default]
    SourceUnit,
    QaDevice,
}

/// Caller-supplied QA settings: the container id, the machine-identity
/// policy, and the device registry keyed by canonical device id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaSettings {
    pub container_id: String,
    #[serde(default)]
    pub machine_identity: MachineIdentityPolicy,
    pub devices: Vec<DeviceEntry>,
}

/// One registry entry: a QA device and the treatment units it serves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceEntry {
    pub device_id: String,
    pub unit_ids: Vec<String>,
    pub isocenter: Point3,
    pub allows_gantry_rotation: bool,
    pub fixed_couch_angle: f64,
}

impl DeviceEntry {
    pub fn profile(&self) -> DeviceProfile {
        DeviceProfile {
            device_id: self.device_id.clone(),
            isocenter: self.isocenter,
            allows_gantry_rotation: self.allows_gantry_rotation,
            fixed_couch_angle: Angle(self.fixed_couch_angle),
        }
    }
}

impl QaSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: QaSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl Validate for QaSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("container_id", &self.container_id)?;
        validate_unique_ids(
            "devices.device_id",
            self.devices.iter().map(|d| d.device_id.as_str()),
        )?;
        for device in &self.devices {
            validate_non_empty_string("devices.device_id", &device.device_id)?;
            validate_range(
                "devices.fixed_couch_angle",
                device.fixed_couch_angle,
                0.0,
                360.0,
            )?;
            for unit_id in &device.unit_ids {
                validate_non_empty_string("devices.unit_ids", unit_id)?;
            }
        }
        Ok(())
    }
}
