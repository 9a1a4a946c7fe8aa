//! Recommended collection rate.
//!
//! The canonical model scales the raw spirit charge by a coefficient chosen
//! from the cube volume band; the maximum rate is always twice the minimum.
//! A flat per-liter model from earlier revisions is kept selectable.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CUBE_VOLUME_MAX, CUBE_VOLUME_MIN, FLAT_MAX_RATE_PER_L, FLAT_MIN_RATE_PER_L,
    LARGE_CUBE_COEFFICIENT, MAX_RATE_MULTIPLIER, MEDIUM_CUBE_COEFFICIENT, MEDIUM_CUBE_MAX,
    MINUTES_PER_HOUR, RAW_SPIRIT_RATE_FACTOR, SMALL_CUBE_COEFFICIENT, SMALL_CUBE_MAX,
};
use crate::error::{CalcError, ConfigRangeError};

/// Which rate formula to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedModel {
    /// Raw-spirit volume scaled by a cube-volume band coefficient.
    #[default]
    Banded,
    /// Legacy flat coefficients on the batch volume, no banding.
    Flat,
}

impl SpeedModel {
    /// `(min, max)` collection rate in L/h.
    ///
    /// `volume_l` is the raw spirit charge for [`SpeedModel::Banded`] and
    /// the batch volume for [`SpeedModel::Flat`]; the flat model ignores
    /// `cube_volume_l`.
    pub fn rates(self, cube_volume_l: f64, volume_l: f64) -> Result<(f64, f64), CalcError> {
        match self {
            Self::Banded => calculate_speed(cube_volume_l, volume_l),
            Self::Flat => calculate_speed_flat(volume_l),
        }
    }
}

impl std::str::FromStr for SpeedModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "banded" => Ok(Self::Banded),
            "flat" => Ok(Self::Flat),
            other => Err(format!("unknown speed model: {other}")),
        }
    }
}

/// Speed coefficient for a cube volume band.
///
/// `[20, 37]` → 700, `(37, 50]` → 600, `(50, 100]` → 500.
pub fn speed_coefficient(cube_volume_l: f64) -> Result<f64, ConfigRangeError> {
    if !(CUBE_VOLUME_MIN..=CUBE_VOLUME_MAX).contains(&cube_volume_l) {
        return Err(ConfigRangeError::CubeVolume(cube_volume_l));
    }
    Ok(if cube_volume_l <= SMALL_CUBE_MAX {
        SMALL_CUBE_COEFFICIENT
    } else if cube_volume_l <= MEDIUM_CUBE_MAX {
        MEDIUM_CUBE_COEFFICIENT
    } else {
        LARGE_CUBE_COEFFICIENT
    })
}

fn check_volume(volume_l: f64) -> Result<(), CalcError> {
    if !volume_l.is_finite() {
        Err(CalcError::InvalidVolume(volume_l))
    } else if volume_l < 0.0 {
        Err(CalcError::NegativeVolume(volume_l))
    } else {
        Ok(())
    }
}

/// `(min, max)` collection rate in L/h for `raw_spirit_l` liters charged into
/// a cube of `cube_volume_l` liters.
pub fn calculate_speed(cube_volume_l: f64, raw_spirit_l: f64) -> Result<(f64, f64), CalcError> {
    let coefficient = speed_coefficient(cube_volume_l)?;
    check_volume(raw_spirit_l)?;
    let min_rate = raw_spirit_l * RAW_SPIRIT_RATE_FACTOR / coefficient * MINUTES_PER_HOUR;
    Ok((min_rate, min_rate * MAX_RATE_MULTIPLIER))
}

/// Legacy flat model: `(0.038 * V, 0.079 * V)` L/h for a batch of `V` liters.
pub fn calculate_speed_flat(total_volume_l: f64) -> Result<(f64, f64), CalcError> {
    check_volume(total_volume_l)?;
    Ok((
        total_volume_l * FLAT_MIN_RATE_PER_L,
        total_volume_l * FLAT_MAX_RATE_PER_L,
    ))
}
