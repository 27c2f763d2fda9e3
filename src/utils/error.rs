use thiserror::Error;

#[derive(Error, Debug)]
pub enum QaError {
    #[error("treatment unit {unit_id} has no registered QA device")]
    UnknownDevice { unit_id: String },

    #[error("beam {beam_id} has unsupported modality {modality}")]
    UnsupportedModality { beam_id: String, modality: String },

    #[error("control point count mismatch: verification beam {verification_id} has {verification_count}, source beam {source_id} has {source_count}")]
    ControlPointCountMismatch {
        verification_id: String,
        source_id: String,
        verification_count: usize,
        source_count: usize,
    },

    #[error("dose calculation failed: {diagnostics}")]
    DoseCalculationFailure { diagnostics: String },

    #[error("plan {plan_id} has no beams")]
    EmptyPlan { plan_id: String },

    #[error("beam {beam_id} has no control points")]
    EmptyBeam { beam_id: String },

    #[error("invalid config value for {field}: {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("missing config field: {field}")]
    MissingConfig { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, QaError>;

/// Non-fatal findings surfaced alongside a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The verification plan's back-reference does not name the plan the
    /// builder was given. The build still completes.
    VerifiedPlanIdentityMismatch { expected: String, actual: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::VerifiedPlanIdentityMismatch { expected, actual } => write!(
                f,
                "verified plan back-reference {} does not match source plan {}",
                actual, expected
            ),
        }
    }
}
