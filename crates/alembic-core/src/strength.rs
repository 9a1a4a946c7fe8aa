//! Distillate strength from cube and vapor temperatures.
//!
//! The vapor temperature at the still head determines the strength of the
//! vapor, and hence of the condensed distillate. The cube temperature is
//! checked against the liquid table as a sanity bound on the reading but
//! does not enter the result.

use serde::Serialize;
use tracing::debug;

use crate::constants::{
    DISTILLATE_MAX_TEMP, DISTILLATE_MIN_TEMP, EQUILIBRIUM_MAX_TEMP, EQUILIBRIUM_MIN_TEMP,
};
use crate::error::{CalcError, InterpolationError};
use crate::interp::LookupTable;
use crate::tables::{get_correction_table, get_liquid_table, get_vapor_table};

/// Result of [`distillate_strength`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrengthReading {
    /// Liquid concentration in the cube (%), informational.
    pub liquid_pct: f64,
    /// Vapor concentration at the measured vapor temperature (%).
    pub vapor_pct: f64,
    /// Correction applied for the distillate temperature (percentage points).
    pub correction: f64,
    /// Strength normalised to 20 °C (%).
    pub corrected_pct: f64,
}

/// Vapor alcohol content (%) for the given cube and vapor temperatures.
///
/// Both temperatures must lie inside their table's key range.
pub fn calculate_alcohol_content(
    cube_temp: f64,
    vapor_temp: f64,
    liquid_table: &LookupTable,
    vapor_table: &LookupTable,
) -> Result<f64, InterpolationError> {
    let liquid_pct = liquid_table.interpolate(cube_temp)?;
    let vapor_pct = vapor_table.interpolate(vapor_temp)?;
    debug!(cube_temp, vapor_temp, liquid_pct, vapor_pct, "equilibrium lookup");
    Ok(vapor_pct)
}

/// Bring a strength measured at `distillate_temp` (°C) to the 20 °C reference.
pub fn correct_for_temperature(
    alcohol_pct: f64,
    distillate_temp: f64,
) -> Result<f64, InterpolationError> {
    let correction = get_correction_table().interpolate(distillate_temp)?;
    Ok(alcohol_pct + correction)
}

fn check_range(quantity: &'static str, value: f64, min: f64, max: f64) -> Result<(), CalcError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CalcError::InputOutOfRange { quantity, value, min, max })
    }
}

/// Strength of the distillate at 20 °C from three temperature readings.
///
/// Validates every reading before touching the tables, so an out-of-range
/// input is reported with the quantity that caused it.
pub fn distillate_strength(
    cube_temp: f64,
    vapor_temp: f64,
    distillate_temp: f64,
) -> Result<StrengthReading, CalcError> {
    check_range("cube temperature", cube_temp, EQUILIBRIUM_MIN_TEMP, EQUILIBRIUM_MAX_TEMP)?;
    check_range("vapor temperature", vapor_temp, EQUILIBRIUM_MIN_TEMP, EQUILIBRIUM_MAX_TEMP)?;
    check_range(
        "distillate temperature",
        distillate_temp,
        DISTILLATE_MIN_TEMP,
        DISTILLATE_MAX_TEMP,
    )?;

    let liquid_pct = get_liquid_table().interpolate(cube_temp)?;
    let vapor_pct =
        calculate_alcohol_content(cube_temp, vapor_temp, get_liquid_table(), get_vapor_table())?;
    let corrected_pct = correct_for_temperature(vapor_pct, distillate_temp)?;

    Ok(StrengthReading {
        liquid_pct,
        vapor_pct,
        correction: corrected_pct - vapor_pct,
        corrected_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn vapor_lookup_scenario() {
        // 82.2 °C sits between 82.0 (82.36%) and 82.5 (81.28%).
        let pct =
            calculate_alcohol_content(84.8, 82.2, get_liquid_table(), get_vapor_table()).unwrap();
        assert!(close(pct, 81.928), "got {pct}");
    }

    #[test]
    fn cube_temperature_does_not_change_result() {
        let a = calculate_alcohol_content(80.0, 90.0, get_liquid_table(), get_vapor_table()).unwrap();
        let b = calculate_alcohol_content(99.0, 90.0, get_liquid_table(), get_vapor_table()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, 62.67);
    }

    #[test]
    fn cube_temperature_out_of_range_fails() {
        let err =
            calculate_alcohol_content(77.0, 82.2, get_liquid_table(), get_vapor_table()).unwrap_err();
        assert!(matches!(err, InterpolationError::OutOfRange { value, .. } if value == 77.0));
    }

    #[test]
    fn vapor_temperature_out_of_range_fails() {
        assert!(
            calculate_alcohol_content(84.8, 100.5, get_liquid_table(), get_vapor_table()).is_err()
        );
    }

    #[test]
    fn table_endpoints_are_reachable() {
        let low = calculate_alcohol_content(78.15, 78.15, get_liquid_table(), get_vapor_table())
            .unwrap();
        let high = calculate_alcohol_content(100.0, 100.0, get_liquid_table(), get_vapor_table())
            .unwrap();
        assert_eq!(low, 97.17);
        assert_eq!(high, 0.0);
    }

    #[test]
    fn correction_at_fifteen_degrees() {
        let corrected = correct_for_temperature(81.928, 15.0).unwrap();
        assert!(close(corrected, 82.328), "got {corrected}");
    }

    #[test]
    fn correction_between_points() {
        // Halfway between 20 (0.0) and 25 (-0.3).
        let corrected = correct_for_temperature(40.0, 22.5).unwrap();
        assert!(close(corrected, 39.85), "got {corrected}");
    }

    #[test]
    fn correction_out_of_range_fails() {
        assert!(correct_for_temperature(40.0, 9.5).is_err());
        assert!(correct_for_temperature(40.0, 31.0).is_err());
    }

    #[test]
    fn end_to_end_scenario() {
        let reading = distillate_strength(84.8, 82.2, 15.0).unwrap();
        assert!(close(reading.vapor_pct, 81.928));
        assert!(close(reading.correction, 0.4));
        assert!(close(reading.corrected_pct, 82.328));
        assert_eq!(format!("{:.2}", reading.corrected_pct), "82.33");
    }

    #[test]
    fn end_to_end_reports_offending_quantity() {
        let err = distillate_strength(84.8, 82.2, 35.0).unwrap_err();
        assert_eq!(
            err,
            CalcError::InputOutOfRange {
                quantity: "distillate temperature",
                value: 35.0,
                min: 10.0,
                max: 30.0,
            }
        );

        let err = distillate_strength(70.0, 82.2, 20.0).unwrap_err();
        assert!(matches!(err, CalcError::InputOutOfRange { quantity: "cube temperature", .. }));

        let err = distillate_strength(84.8, 101.0, 20.0).unwrap_err();
        assert!(matches!(err, CalcError::InputOutOfRange { quantity: "vapor temperature", .. }));
    }

    #[test]
    fn end_to_end_rejects_nan() {
        assert!(distillate_strength(f64::NAN, 82.2, 20.0).is_err());
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn twenty_degrees_is_identity(x in 0.0f64..100.0) {
            prop_assert_eq!(correct_for_temperature(x, 20.0).unwrap(), x);
        }

        #[test]
        fn vapor_strength_within_domain(t in 78.15f64..=100.0) {
            let pct = calculate_alcohol_content(t, t, get_liquid_table(), get_vapor_table()).unwrap();
            prop_assert!((0.0..=100.0).contains(&pct));
        }

        #[test]
        fn correction_is_bounded(t in 10.0f64..=30.0) {
            let delta = correct_for_temperature(50.0, t).unwrap() - 50.0;
            prop_assert!((-0.6 - 1e-12..=0.6 + 1e-12).contains(&delta));
        }
    }
}
