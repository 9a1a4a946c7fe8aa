//! Batch summary derived from a user's constants alone.
//!
//! Assumes a standard raw spirit charge of 85% of the cube volume and plans
//! the volume-based cuts and collection rate for it.

use serde::Serialize;

use crate::constants::RAW_SPIRIT_FILL_RATIO;
use crate::error::CalcError;
use crate::settings::UserConstants;
use crate::speed::calculate_speed;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchReport {
    pub constants: UserConstants,
    /// Raw spirit charge in liters.
    pub raw_spirit_volume: f64,
    pub heads: f64,
    pub body: f64,
    pub pre_tails: f64,
    pub tails: f64,
    /// Recommended collection rate in L/h.
    pub min_rate: f64,
    pub max_rate: f64,
}

impl BatchReport {
    pub fn build(constants: &UserConstants) -> Result<Self, CalcError> {
        constants.validate()?;
        let raw_spirit_volume = constants.cube_volume * RAW_SPIRIT_FILL_RATIO;
        let (min_rate, max_rate) = calculate_speed(constants.cube_volume, raw_spirit_volume)?;
        let share = |pct: f64| raw_spirit_volume * pct / 100.0;

        Ok(Self {
            constants: *constants,
            raw_spirit_volume,
            heads: share(constants.head_percentage),
            body: share(constants.body_percentage),
            pre_tails: share(constants.pre_tail_percentage),
            tails: share(constants.tail_percentage),
            min_rate,
            max_rate,
        })
    }
}
