use crate::domain::model::{DeviceProfile, DoseResult, Plan, QaContainer};
use crate::utils::error::Result;

/// Resolves the QA device serving a given treatment unit.
pub trait DeviceResolver: Send + Sync {
    fn resolve(&self, unit_id: &str) -> Option<DeviceProfile>;
}

/// Finds or creates the QA container record that verification plans are
/// filed under.
pub trait ContainerService: Send + Sync {
    fn find_or_create(&self, container_id: &str) -> Result<QaContainer>;
}

/// External dose computation engine. The call is long-running, blocking,
/// and has no built-in timeout or retry; callers wanting responsiveness
/// must wrap it externally.
pub trait DoseEngine: Send + Sync {
    fn compute(&self, plan: &Plan) -> DoseResult;
}
