use crate::domain::model::Plan;
use crate::domain::ports::DoseEngine;
use crate::utils::error::{QaError, Result};

/// Triggers external dose computation for a plan.
///
/// Blocks for an engine-determined duration; there is no timeout or
/// retry. Engine diagnostics are carried verbatim into the error so the
/// operator can act on them directly. On success the plan's dose is
/// marked valid and the plan is treated as immutable from then on.
pub fn compute_dose<E: DoseEngine + ?Sized>(engine: &E, plan: &mut Plan) -> Result<()> {
    tracing::info!(plan = %plan.id, "invoking dose calculation");
    let result = engine.compute(plan);
    if !result.success {
        tracing::error!(plan = %plan.id, diagnostics = %result.diagnostics, "dose calculation failed");
        return Err(QaError::DoseCalculationFailure {
            diagnostics: result.diagnostics,
        });
    }
    plan.dose_valid = true;
    tracing::info!(plan = %plan.id, "dose calculation succeeded");
    Ok(())
}
