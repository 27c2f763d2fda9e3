pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::registry::{InMemoryContainerService, RegistryDeviceResolver};
pub use crate::config::{MachineIdentityPolicy, QaSettings};
pub use crate::core::builder::{BuildOutcome, BuildStage, VerificationPlanBuilder};
pub use crate::utils::error::{QaError, Result, Warning};
