use crate::config::QaSettings;
use crate::domain::model::{DeviceProfile, QaContainer};
use crate::domain::ports::{ContainerService, DeviceResolver};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::sync::Mutex;

/// Device resolution backed by the configured registry. Lookup is by the
/// treatment unit id a device entry declares it serves.
pub struct RegistryDeviceResolver {
    by_unit: HashMap<String, DeviceProfile>,
}

impl RegistryDeviceResolver {
    pub fn from_settings(settings: &QaSettings) -> Self {
        let mut by_unit = HashMap::new();
        for entry in &settings.devices {
            for unit_id in &entry.unit_ids {
                by_unit.insert(unit_id.clone(), entry.profile());
            }
        }
        Self { by_unit }
    }
}

impl DeviceResolver for RegistryDeviceResolver {
    fn resolve(&self, unit_id: &str) -> Option<DeviceProfile> {
        self.by_unit.get(unit_id).cloned()
    }
}

/// Container bookkeeping held in memory, for hosts that manage the real
/// record store themselves and for tests.
#[derive(Default)]
pub struct InMemoryContainerService {
    containers: Mutex<HashMap<String, QaContainer>>,
}

impl InMemoryContainerService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, container_id: &str) -> bool {
        self.containers
            .lock()
            .map(|containers| containers.contains_key(container_id))
            .unwrap_or(false)
    }
}

impl ContainerService for InMemoryContainerService {
    fn find_or_create(&self, container_id: &str) -> Result<QaContainer> {
        let mut containers = self
            .containers
            .lock()
            .map_err(|_| std::io::Error::other("container store poisoned"))?;
        let container = containers
            .entry(container_id.to_string())
            .or_insert_with(|| QaContainer {
                id: container_id.to_string(),
            });
        Ok(container.clone())
    }
}
