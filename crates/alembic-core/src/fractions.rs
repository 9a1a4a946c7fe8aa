//! Splitting a batch into heads, body, pre-tails and tails.
//!
//! The split is a planning aid: each cut is a share of the charged volume,
//! and the cuts are not required to add up to the batch.

use serde::{Deserialize, Serialize};

use crate::constants::{ML_PER_L, REFERENCE_PROOF};
use crate::error::CalcError;
use crate::settings::UserConstants;

/// Planned cut volumes for one batch. All values in liters, never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FractionResult {
    /// Alcohol content of the batch relative to the reference proof.
    pub absolute_alcohol: f64,
    /// Heads as a share of the batch volume.
    pub heads_by_volume: f64,
    /// Heads as a share of the absolute alcohol; an alternate estimate.
    pub heads_by_alcohol: f64,
    pub body: f64,
    pub pre_tails: f64,
    pub tails: f64,
}

/// Compute the cut volumes for `total_volume_l` liters at `alcohol_content_pct`.
///
/// Non-positive volume or strength yields zero for every dependent field.
/// Callers reject those inputs up front with [`validate_batch`].
pub fn calculate_fractions(
    total_volume_l: f64,
    alcohol_content_pct: f64,
    constants: &UserConstants,
) -> FractionResult {
    let total_volume_ml = total_volume_l.max(0.0) * ML_PER_L;
    let absolute_alcohol_ml = total_volume_ml * alcohol_content_pct.max(0.0) / REFERENCE_PROOF;

    let share = |pct: f64| total_volume_ml * pct / 100.0 / ML_PER_L;

    FractionResult {
        absolute_alcohol: absolute_alcohol_ml / ML_PER_L,
        heads_by_volume: share(constants.head_percentage),
        heads_by_alcohol: absolute_alcohol_ml * (constants.head_percentage / 100.0) / ML_PER_L,
        body: share(constants.body_percentage),
        pre_tails: share(constants.pre_tail_percentage),
        tails: share(constants.tail_percentage),
    }
}

/// Reject batch inputs that [`calculate_fractions`] would silently zero out.
pub fn validate_batch(total_volume_l: f64, alcohol_content_pct: f64) -> Result<(), CalcError> {
    if !total_volume_l.is_finite() {
        return Err(CalcError::InvalidVolume(total_volume_l));
    }
    if total_volume_l <= 0.0 {
        return Err(CalcError::NonPositiveVolume(total_volume_l));
    }
    if !(alcohol_content_pct > 0.0 && alcohol_content_pct <= 100.0) {
        return Err(CalcError::InputOutOfRange {
            quantity: "batch strength",
            value: alcohol_content_pct,
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(())
}
