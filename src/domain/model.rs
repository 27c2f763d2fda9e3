use serde::{Deserialize, Serialize};

/// Angular tolerance in degrees for equality and uniqueness checks.
pub const ANGLE_TOLERANCE_DEG: f64 = 1e-3;

/// An angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(pub f64);

impl Angle {
    pub fn degrees(self) -> f64 {
        self.0
    }

    pub fn approx_eq(self, other: Angle) -> bool {
        (self.0 - other.0).abs() < ANGLE_TOLERANCE_DEG
    }
}

impl From<f64> for Angle {
    fn from(degrees: f64) -> Self {
        Angle(degrees)
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in device coordinates, millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GantryDirection {
    #[default]
    None,
    Clockwise,
    CounterClockwise,
}

/// Beam delivery modality. Anything a QA device cannot reproduce is kept
/// as `Unsupported` with its raw tag so errors can name it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Arc,
    StepAndShoot,
    Unsupported(String),
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Modality::Arc => write!(f, "Arc"),
            Modality::StepAndShoot => write!(f, "StepAndShoot"),
            Modality::Unsupported(tag) => write!(f, "{}", tag),
        }
    }
}

/// Delivery machine identity carried on each beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineParameters {
    pub unit_id: String,
    pub energy_mode: String,
    pub dose_rate: i32,
    pub technique_id: String,
}

/// One segment of a beam's delivery.
///
/// `meterset_weight` is the cumulative fraction of delivered dose at this
/// segment, monotonic in [0, 1] across a beam's control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub gantry_angle: Angle,
    pub collimator_angle: Angle,
    pub couch_angle: Angle,
    pub leaf_positions: Vec<[f64; 2]>,
    pub jaw_positions: [f64; 4],
    pub meterset_weight: f64,
}

impl ControlPoint {
    /// A control point with the given geometry and no collimation yet.
    pub fn bare(
        gantry_angle: Angle,
        collimator_angle: Angle,
        couch_angle: Angle,
        meterset_weight: f64,
    ) -> Self {
        Self {
            gantry_angle,
            collimator_angle,
            couch_angle,
            leaf_positions: Vec::new(),
            jaw_positions: [0.0; 4],
            meterset_weight,
        }
    }
}

/// One deliverable radiation field. Beams are owned exclusively by their
/// plan; ids are unique within a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    pub id: String,
    pub modality: Modality,
    pub gantry_direction: GantryDirection,
    pub machine: MachineParameters,
    pub control_points: Vec<ControlPoint>,
    pub weight_factor: f64,
    pub isocenter: Point3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub beams: Vec<Beam>,
    /// Dose per fraction in Gy.
    pub dose_per_fraction: f64,
    pub fraction_count: u32,
    pub treatment_percentage: f64,
    pub calculation_model_id: String,
    /// Set once dose calculation succeeds; the plan is treated as
    /// immutable from that point on.
    pub dose_valid: bool,
}

/// A plan recreating a treatment plan's beams on a measurement device,
/// with a back-reference to the plan it verifies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationPlan {
    pub plan: Plan,
    pub source_plan_id: String,
}

/// Per-device capabilities of a QA measurement device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub device_id: String,
    /// Reference isocenter of the device in device coordinates.
    pub isocenter: Point3,
    pub allows_gantry_rotation: bool,
    pub fixed_couch_angle: Angle,
}

/// Handle to the QA container record holding verification plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaContainer {
    pub id: String,
}

/// Outcome reported by the external dose engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoseResult {
    pub success: bool,
    pub diagnostics: String,
}
