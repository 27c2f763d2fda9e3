pub mod beam_id;
pub mod builder;
pub mod dose;
pub mod mapper;
pub mod prescription;
pub mod transfer;

pub use crate::domain::model::{Beam, ControlPoint, DeviceProfile, Plan, VerificationPlan};
pub use crate::domain::ports::{ContainerService, DeviceResolver, DoseEngine};
pub use crate::utils::error::Result;
