//! Built-in equilibrium and temperature-correction tables.
//!
//! The liquid and vapor tables map a boiling temperature (°C) of an
//! ethanol/water mixture to the alcohol concentration (% v/v) of the liquid
//! and of the vapor above it. Both span 78.15–100 °C in 0.5 °C steps.
//!
//! Tables are built once per process and shared by reference.

use std::sync::LazyLock;

use crate::interp::LookupTable;

/// Liquid-phase concentration (% v/v) by boiling temperature (°C).
const LIQUID_POINTS: [(f64, f64); 45] = [
    (78.15, 97.17),
    (78.5, 93.70),
    (79.0, 89.06),
    (79.5, 83.78),
    (80.0, 77.48),
    (80.5, 72.17),
    (81.0, 67.27),
    (81.5, 61.96),
    (82.0, 55.75),
    (82.5, 50.07),
    (83.0, 45.50),
    (83.5, 42.09),
    (84.0, 39.07),
    (84.5, 35.81),
    (85.0, 33.02),
    (85.5, 30.39),
    (86.0, 28.02),
    (86.5, 25.79),
    (87.0, 23.95),
    (87.5, 22.17),
    (88.0, 20.35),
    (88.5, 18.63),
    (89.0, 17.16),
    (89.5, 15.89),
    (90.0, 14.49),
    (90.5, 13.27),
    (91.0, 12.11),
    (91.5, 11.21),
    (92.0, 10.39),
    (92.5, 9.70),
    (93.0, 9.06),
    (93.5, 8.49),
    (94.0, 7.94),
    (94.5, 7.34),
    (95.0, 6.79),
    (95.5, 6.21),
    (96.0, 5.64),
    (96.5, 5.08),
    (97.0, 4.45),
    (97.5, 3.88),
    (98.0, 3.31),
    (98.5, 2.52),
    (99.0, 1.69),
    (99.5, 0.84),
    (100.0, 0.0),
];

/// Vapor-phase concentration (% v/v) by boiling temperature (°C).
const VAPOR_POINTS: [(f64, f64); 45] = [
    (78.15, 97.17),
    (78.5, 94.35),
    (79.0, 91.81),
    (79.5, 89.37),
    (80.0, 87.16),
    (80.5, 85.83),
    (81.0, 84.79),
    (81.5, 83.69),
    (82.0, 82.36),
    (82.5, 81.28),
    (83.0, 80.37),
    (83.5, 79.63),
    (84.0, 78.87),
    (84.5, 77.97),
    (85.0, 76.94),
    (85.5, 75.68),
    (86.0, 74.34),
    (86.5, 72.97),
    (87.0, 71.68),
    (87.5, 70.35),
    (88.0, 68.88),
    (88.5, 67.37),
    (89.0, 65.98),
    (89.5, 64.49),
    (90.0, 62.67),
    (90.5, 60.97),
    (91.0, 59.22),
    (91.5, 57.58),
    (92.0, 55.95),
    (92.5, 54.31),
    (93.0, 52.65),
    (93.5, 51.06),
    (94.0, 49.21),
    (94.5, 46.32),
    (95.0, 45.27),
    (95.5, 42.96),
    (96.0, 40.52),
    (96.5, 37.96),
    (97.0, 35.07),
    (97.5, 31.96),
    (98.0, 28.69),
    (98.5, 23.54),
    (99.0, 16.47),
    (99.5, 8.78),
    (100.0, 0.0),
];

/// Additive correction (percentage points) bringing a hydrometer reading
/// taken at the given distillate temperature (°C) to 20 °C.
const CORRECTION_POINTS: [(f64, f64); 5] = [
    (10.0, 0.6),
    (15.0, 0.4),
    (20.0, 0.0),
    (25.0, -0.3),
    (30.0, -0.6),
];

static LIQUID_TABLE: LazyLock<LookupTable> = LazyLock::new(|| LookupTable::from_pairs(LIQUID_POINTS));
static VAPOR_TABLE: LazyLock<LookupTable> = LazyLock::new(|| LookupTable::from_pairs(VAPOR_POINTS));
static CORRECTION_TABLE: LazyLock<LookupTable> =
    LazyLock::new(|| LookupTable::from_pairs(CORRECTION_POINTS));

/// Liquid equilibrium table: cube temperature → liquid alcohol %.
pub fn get_liquid_table() -> &'static LookupTable {
    &LIQUID_TABLE
}

/// Vapor equilibrium table: vapor temperature → vapor alcohol %.
pub fn get_vapor_table() -> &'static LookupTable {
    &VAPOR_TABLE
}

/// 20 °C correction table: distillate temperature → additive correction.
pub fn get_correction_table() -> &'static LookupTable {
    &CORRECTION_TABLE
}
