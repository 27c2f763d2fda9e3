use crate::domain::model::Plan;

/// A QA delivery is always a single fraction at the source plan's
/// dose-per-fraction, computed with the same physics model as the
/// clinical plan.
pub fn normalize(verification: &mut Plan, source: &Plan) {
    verification.fraction_count = 1;
    verification.dose_per_fraction = source.dose_per_fraction;
    verification.treatment_percentage = 100.0;
    verification.calculation_model_id = source.calculation_model_id.clone();
    tracing::debug!(
        plan = %verification.id,
        dose_per_fraction = verification.dose_per_fraction,
        model = %verification.calculation_model_id,
        "prescription normalized to single fraction"
    );
}
