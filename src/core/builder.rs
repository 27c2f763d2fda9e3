use crate::config::QaSettings;
use crate::core::mapper::BeamGeometryMapper;
use crate::core::{dose, prescription, transfer};
use crate::domain::model::{Plan, QaContainer, VerificationPlan};
use crate::domain::ports::{ContainerService, DeviceResolver, DoseEngine};
use crate::utils::error::{QaError, Result, Warning};

/// Stages of one build. Fatal errors return immediately instead of a
/// terminal `Failed` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Initialized,
    DeviceResolved,
    ContainerResolved,
    GeometryBuilt,
    PrescriptionSet,
    DoseComputed,
}

/// A finished build: the composite verification plan, the container it
/// is filed under, and any non-fatal findings.
#[derive(Debug)]
pub struct BuildOutcome {
    pub plan: VerificationPlan,
    pub container: QaContainer,
    pub warnings: Vec<Warning>,
}

/// Orchestrates the whole derivation: device resolution, container
/// lookup, geometry mapping, control-point transfer, prescription
/// normalization and dose computation.
///
/// Geometry is staged against a working copy of the source beams and the
/// verification plan is assembled only after the complete beam set maps
/// and transfers; on any failure nothing is committed and the caller's
/// plan is untouched. Builds are sequential and not re-entrant on the
/// same source plan; one build at a time, enforced by the caller.
pub struct VerificationPlanBuilder<'a, D, C, E>
where
    D: DeviceResolver,
    C: ContainerService,
    E: DoseEngine,
{
    devices: &'a D,
    containers: &'a C,
    engine: &'a E,
    settings: &'a QaSettings,
}

impl<'a, D, C, E> VerificationPlanBuilder<'a, D, C, E>
where
    D: DeviceResolver,
    C: ContainerService,
    E: DoseEngine,
{
    pub fn new(devices: &'a D, containers: &'a C, engine: &'a E, settings: &'a QaSettings) -> Self {
        Self {
            devices,
            containers,
            engine,
            settings,
        }
    }

    pub fn build(&self, source: &Plan) -> Result<BuildOutcome> {
        let mut stage = BuildStage::Initialized;
        tracing::info!(plan = %source.id, "building verification plan");

        let first_beam = source.beams.first().ok_or_else(|| QaError::EmptyPlan {
            plan_id: source.id.clone(),
        })?;
        let unit_id = first_beam.machine.unit_id.as_str();
        let device = self
            .devices
            .resolve(unit_id)
            .ok_or_else(|| QaError::UnknownDevice {
                unit_id: unit_id.to_string(),
            })?;
        enter(&mut stage, BuildStage::DeviceResolved);
        tracing::debug!(unit = %unit_id, device = %device.device_id, "QA device resolved");

        let container = self.containers.find_or_create(&self.settings.container_id)?;
        enter(&mut stage, BuildStage::ContainerResolved);

        // Stage geometry against a working copy so the clinical plan is
        // never mutated; the mapper rewrites working ids for matching.
        let mapper = BeamGeometryMapper::new(&device, self.settings.machine_identity);
        let mut working = source.beams.clone();
        let mut verification_beams = Vec::with_capacity(working.len());
        for beam in &mut working {
            verification_beams.push(mapper.map(beam)?);
        }
        for beam in &mut verification_beams {
            transfer::transfer_control_points(beam, &working)?;
        }
        enter(&mut stage, BuildStage::GeometryBuilt);

        let mut verification = VerificationPlan {
            plan: Plan {
                id: verification_plan_id(&source.id),
                beams: verification_beams,
                dose_per_fraction: 0.0,
                fraction_count: 0,
                treatment_percentage: 0.0,
                calculation_model_id: String::new(),
                dose_valid: false,
            },
            source_plan_id: source.id.clone(),
        };

        let mut warnings = Vec::new();
        if let Some(warning) = check_source_identity(&verification, source) {
            tracing::warn!("{}", warning);
            warnings.push(warning);
        }

        prescription::normalize(&mut verification.plan, source);
        enter(&mut stage, BuildStage::PrescriptionSet);

        dose::compute_dose(self.engine, &mut verification.plan)?;
        enter(&mut stage, BuildStage::DoseComputed);

        tracing::info!(
            plan = %verification.plan.id,
            container = %container.id,
            beams = verification.plan.beams.len(),
            "verification plan complete"
        );
        Ok(BuildOutcome {
            plan: verification,
            container,
            warnings,
        })
    }
}

fn enter(stage: &mut BuildStage, next: BuildStage) {
    tracing::debug!(from = ?stage, to = ?next, "build stage");
    *stage = next;
}

/// Id for the composite verification plan: ids of 13 characters or more
/// lose their last character before the `A` suffix, shorter ids keep all
/// of them.
pub fn verification_plan_id(source_id: &str) -> String {
    let mut id = source_id.to_string();
    if id.chars().count() >= 13 {
        id.pop();
    }
    id.push('A');
    id
}

/// The verification plan's back-reference must name the plan the builder
/// was given; a mismatch is reported, never fatal.
fn check_source_identity(verification: &VerificationPlan, source: &Plan) -> Option<Warning> {
    if verification.source_plan_id == source.id {
        None
    } else {
        Some(Warning::VerifiedPlanIdentityMismatch {
            expected: source.id.clone(),
            actual: verification.source_plan_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_ids_drop_last_char_before_suffix() {
        assert_eq!(verification_plan_id("ABCDEFGHIJKLMN"), "ABCDEFGHIJKLMA");
    }

    #[test]
    fn short_ids_keep_everything() {
        assert_eq!(verification_plan_id("PLAN1"), "PLAN1A");
    }

    #[test]
    fn thirteen_char_ids_truncate_to_twelve() {
        assert_eq!(verification_plan_id("ABCDEFGHIJKLM"), "ABCDEFGHIJKLA");
    }

    #[test]
    fn identity_mismatch_is_a_warning() {
        let source = Plan {
            id: "PLAN1".to_string(),
            beams: Vec::new(),
            dose_per_fraction: 2.0,
            fraction_count: 25,
            treatment_percentage: 100.0,
            calculation_model_id: "AAA_13623".to_string(),
            dose_valid: false,
        };
        let verification = VerificationPlan {
            plan: Plan {
                id: "PLAN1A".to_string(),
                ..source.clone()
            },
            source_plan_id: "OTHER".to_string(),
        };

        let warning = check_source_identity(&verification, &source);
        assert_eq!(
            warning,
            Some(Warning::VerifiedPlanIdentityMismatch {
                expected: "PLAN1".to_string(),
                actual: "OTHER".to_string(),
            })
        );
        assert_eq!(check_source_identity(
            &VerificationPlan {
                source_plan_id: "PLAN1".to_string(),
                ..verification
            },
            &source
        ), None);
    }
}
