use crate::config::MachineIdentityPolicy;
use crate::core::beam_id;
use crate::domain::model::{
    Angle, Beam, ControlPoint, DeviceProfile, GantryDirection, MachineParameters, Modality,
};
use crate::utils::error::{QaError, Result};

/// Builds a verification beam skeleton from a source beam and the QA
/// device it will be delivered on.
///
/// Mapping assigns the computed id to both the new verification beam and
/// the source beam it was mapped from; control-point transfer later
/// matches the pair by that shared id. Callers that must not disturb the
/// clinical plan hand the mapper a working copy of its beams.
pub struct BeamGeometryMapper<'a> {
    device: &'a DeviceProfile,
    machine_identity: MachineIdentityPolicy,
}

impl<'a> BeamGeometryMapper<'a> {
    pub fn new(device: &'a DeviceProfile, machine_identity: MachineIdentityPolicy) -> Self {
        Self {
            device,
            machine_identity,
        }
    }

    pub fn map(&self, source: &mut Beam) -> Result<Beam> {
        match source.modality.clone() {
            Modality::Arc => self.map_arc(source),
            Modality::StepAndShoot => self.map_step_and_shoot(source),
            Modality::Unsupported(tag) => Err(QaError::UnsupportedModality {
                beam_id: source.id.clone(),
                modality: tag,
            }),
        }
    }

    /// Arc delivery: the gantry sweeps from the source's start to end
    /// angle; the couch is pinned to the device's fixed angle. Meterset
    /// weights are copied verbatim, as is the beam weight factor.
    fn map_arc(&self, source: &mut Beam) -> Result<Beam> {
        let (first, last) = match (source.control_points.first(), source.control_points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(QaError::EmptyBeam {
                    beam_id: source.id.clone(),
                })
            }
        };

        let collimator = first.collimator_angle;
        let gantry_start = first.gantry_angle;
        let gantry_end = last.gantry_angle;
        let couch = self.device.fixed_couch_angle;
        let segments = source.control_points.len();

        let control_points: Vec<ControlPoint> = source
            .control_points
            .iter()
            .enumerate()
            .map(|(i, cp)| {
                let t = if segments > 1 {
                    i as f64 / (segments - 1) as f64
                } else {
                    0.0
                };
                let gantry = Angle(
                    gantry_start.degrees() + t * (gantry_end.degrees() - gantry_start.degrees()),
                );
                ControlPoint::bare(gantry, collimator, couch, cp.meterset_weight)
            })
            .collect();

        let id = beam_id::make_id(gantry_start, couch);
        tracing::debug!(
            source = %source.id,
            verification = %id,
            gantry_start = %gantry_start,
            gantry_end = %gantry_end,
            "mapped arc beam"
        );
        source.id = id.clone();

        Ok(Beam {
            id,
            modality: Modality::Arc,
            gantry_direction: source.gantry_direction,
            machine: self.machine_parameters(source),
            control_points,
            weight_factor: source.weight_factor,
            isocenter: self.device.isocenter,
        })
    }

    /// Step-and-shoot delivery: a fixed gantry/collimator pose. Devices
    /// without a rotating mount force both angles to zero.
    fn map_step_and_shoot(&self, source: &mut Beam) -> Result<Beam> {
        let first = match source.control_points.first() {
            Some(first) => first,
            None => {
                return Err(QaError::EmptyBeam {
                    beam_id: source.id.clone(),
                })
            }
        };

        let (gantry, collimator) = if self.device.allows_gantry_rotation {
            (first.gantry_angle, first.collimator_angle)
        } else {
            (Angle(0.0), Angle(0.0))
        };
        let couch = self.device.fixed_couch_angle;

        let control_points: Vec<ControlPoint> = source
            .control_points
            .iter()
            .map(|cp| ControlPoint::bare(gantry, collimator, couch, cp.meterset_weight))
            .collect();

        let id = beam_id::make_id(gantry, couch);
        tracing::debug!(source = %source.id, verification = %id, "mapped step-and-shoot beam");
        source.id = id.clone();

        Ok(Beam {
            id,
            modality: Modality::StepAndShoot,
            gantry_direction: GantryDirection::None,
            machine: self.machine_parameters(source),
            control_points,
            weight_factor: 1.0,
            isocenter: self.device.isocenter,
        })
    }

    fn machine_parameters(&self, source: &Beam) -> MachineParameters {
        let unit_id = match self.machine_identity {
            MachineIdentityPolicy::SourceUnit => source.machine.unit_id.clone(),
            MachineIdentityPolicy::QaDevice => self.device.device_id.clone(),
        };
        MachineParameters {
            unit_id,
            energy_mode: source.machine.energy_mode.clone(),
            dose_rate: source.machine.dose_rate,
            technique_id: source.machine.technique_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Point3;

    fn device(allows_gantry_rotation: bool) -> DeviceProfile {
        DeviceProfile {
            device_id: "ArcCheck".to_string(),
            isocenter: Point3::new(0.0, 0.0, 50.0),
            allows_gantry_rotation,
            fixed_couch_angle: Angle(0.0),
        }
    }

    fn arc_beam() -> Beam {
        let weights = [0.0, 0.25, 0.5, 0.75, 1.0];
        let control_points = weights
            .iter()
            .enumerate()
            .map(|(i, w)| ControlPoint {
                gantry_angle: Angle(181.0 + 44.5 * i as f64),
                collimator_angle: Angle(30.0),
                couch_angle: Angle(0.0),
                leaf_positions: vec![[-5.0, 5.0]; 60],
                jaw_positions: [-50.0, 50.0, -50.0, 50.0],
                meterset_weight: *w,
            })
            .collect();
        Beam {
            id: "ARC1".to_string(),
            modality: Modality::Arc,
            gantry_direction: GantryDirection::Clockwise,
            machine: MachineParameters {
                unit_id: "Trilogy".to_string(),
                energy_mode: "6X".to_string(),
                dose_rate: 600,
                technique_id: "ARC".to_string(),
            },
            control_points,
            weight_factor: 0.8,
            isocenter: Point3::new(12.0, -4.0, 7.0),
        }
    }

    fn step_and_shoot_beam() -> Beam {
        let mut beam = arc_beam();
        beam.id = "IMRT1".to_string();
        beam.modality = Modality::StepAndShoot;
        beam.gantry_direction = GantryDirection::None;
        for cp in &mut beam.control_points {
            cp.gantry_angle = Angle(270.0);
            cp.collimator_angle = Angle(15.0);
        }
        beam
    }

    #[test]
    fn arc_mapping_fixes_couch_and_copies_trajectory() {
        let device = device(true);
        let mapper = BeamGeometryMapper::new(&device, MachineIdentityPolicy::SourceUnit);
        let mut source = arc_beam();

        let verification = mapper.map(&mut source).unwrap();

        assert_eq!(verification.control_points.len(), 5);
        for (vcp, scp) in verification
            .control_points
            .iter()
            .zip(arc_beam().control_points.iter())
        {
            assert!(vcp.couch_angle.approx_eq(Angle(0.0)));
            assert!(vcp.collimator_angle.approx_eq(Angle(30.0)));
            assert_eq!(vcp.meterset_weight, scp.meterset_weight);
        }
        assert!(verification.control_points[0]
            .gantry_angle
            .approx_eq(Angle(181.0)));
        assert!(verification.control_points[4]
            .gantry_angle
            .approx_eq(Angle(359.0)));
        assert_eq!(verification.weight_factor, 0.8);
        assert_eq!(verification.gantry_direction, GantryDirection::Clockwise);
        assert_eq!(verification.isocenter, Point3::new(0.0, 0.0, 50.0));
    }

    #[test]
    fn arc_mapping_assigns_matching_ids_to_both_beams() {
        let device = device(true);
        let mapper = BeamGeometryMapper::new(&device, MachineIdentityPolicy::SourceUnit);
        let mut source = arc_beam();

        let verification = mapper.map(&mut source).unwrap();

        assert_eq!(verification.id, "G181.00T0.00");
        assert_eq!(source.id, verification.id);
    }

    #[test]
    fn step_and_shoot_keeps_pose_when_rotation_allowed() {
        let device = device(true);
        let mapper = BeamGeometryMapper::new(&device, MachineIdentityPolicy::SourceUnit);
        let mut source = step_and_shoot_beam();

        let verification = mapper.map(&mut source).unwrap();

        for cp in &verification.control_points {
            assert!(cp.gantry_angle.approx_eq(Angle(270.0)));
            assert!(cp.collimator_angle.approx_eq(Angle(15.0)));
            assert!(cp.couch_angle.approx_eq(Angle(0.0)));
        }
        assert_eq!(verification.id, "G270.00T0.00");
    }

    #[test]
    fn step_and_shoot_forces_zero_pose_on_fixed_mount() {
        let device = device(false);
        let mapper = BeamGeometryMapper::new(&device, MachineIdentityPolicy::SourceUnit);
        let mut source = step_and_shoot_beam();

        let verification = mapper.map(&mut source).unwrap();

        for cp in &verification.control_points {
            assert!(cp.gantry_angle.approx_eq(Angle(0.0)));
            assert!(cp.collimator_angle.approx_eq(Angle(0.0)));
        }
        assert_eq!(verification.id, "G0.00T0.00");
        assert_eq!(source.id, "G0.00T0.00");
    }

    #[test]
    fn step_and_shoot_leaves_weight_factor_at_default() {
        let device = device(false);
        let mapper = BeamGeometryMapper::new(&device, MachineIdentityPolicy::SourceUnit);
        let mut source = step_and_shoot_beam();
        source.weight_factor = 0.3;

        let verification = mapper.map(&mut source).unwrap();

        assert_eq!(verification.weight_factor, 1.0);
    }

    #[test]
    fn machine_identity_policy_switches_unit_id() {
        let device = device(true);
        let mut source = arc_beam();
        let mapper = BeamGeometryMapper::new(&device, MachineIdentityPolicy::SourceUnit);
        let verification = mapper.map(&mut source.clone()).unwrap();
        assert_eq!(verification.machine.unit_id, "Trilogy");

        let mapper = BeamGeometryMapper::new(&device, MachineIdentityPolicy::QaDevice);
        let verification = mapper.map(&mut source).unwrap();
        assert_eq!(verification.machine.unit_id, "ArcCheck");
        assert_eq!(verification.machine.energy_mode, "6X");
        assert_eq!(verification.machine.dose_rate, 600);
    }

    #[test]
    fn unsupported_modality_names_beam_and_tag() {
        let device = device(true);
        let mapper = BeamGeometryMapper::new(&device, MachineIdentityPolicy::SourceUnit);
        let mut source = arc_beam();
        source.id = "FIELD3".to_string();
        source.modality = Modality::Unsupported("StaticStep".to_string());

        let err = mapper.map(&mut source).unwrap_err();
        match err {
            QaError::UnsupportedModality { beam_id, modality } => {
                assert_eq!(beam_id, "FIELD3");
                assert_eq!(modality, "StaticStep");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // fail-fast: the source id is left untouched
        assert_eq!(source.id, "FIELD3");
    }

    #[test]
    fn beam_without_control_points_is_rejected() {
        let device = device(true);
        let mapper = BeamGeometryMapper::new(&device, MachineIdentityPolicy::SourceUnit);
        let mut source = arc_beam();
        source.control_points.clear();

        assert!(matches!(
            mapper.map(&mut source),
            Err(QaError::EmptyBeam { .. })
        ));
    }
}
