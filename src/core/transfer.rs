use crate::domain::model::{Beam, Modality};
use crate::utils::error::{QaError, Result};

/// Copies per-segment collimation from the matching source beam into a
/// verification beam.
///
/// A source beam matches when its working id equals the verification
/// beam's id; the mapper assigned those ids as a pair. On a match the
/// control-point counts must agree, then leaf and jaw positions are
/// copied per index. Arc beams additionally take the beam-level weight
/// factor once. Gantry, collimator, couch and meterset were fixed by the
/// mapper and are never touched here.
///
/// A verification beam with no matching source is left as mapped; a
/// device may add synthetic beams with no counterpart.
pub fn transfer_control_points(verification: &mut Beam, sources: &[Beam]) -> Result<()> {
    let source = match sources.iter().find(|beam| beam.id == verification.id) {
        Some(source) => source,
        None => {
            tracing::debug!(
                beam = %verification.id,
                "no source beam matches, mapped geometry stands"
            );
            return Ok(());
        }
    };

    if verification.control_points.len() != source.control_points.len() {
        return Err(QaError::ControlPointCountMismatch {
            verification_id: verification.id.clone(),
            source_id: source.id.clone(),
            verification_count: verification.control_points.len(),
            source_count: source.control_points.len(),
        });
    }

    for (vcp, scp) in verification
        .control_points
        .iter_mut()
        .zip(&source.control_points)
    {
        vcp.leaf_positions = scp.leaf_positions.clone();
        vcp.jaw_positions = scp.jaw_positions;
    }

    if verification.modality == Modality::Arc {
        verification.weight_factor = source.weight_factor;
    }

    tracing::debug!(
        beam = %verification.id,
        segments = verification.control_points.len(),
        "control points transferred"
    );
    Ok(())
}
