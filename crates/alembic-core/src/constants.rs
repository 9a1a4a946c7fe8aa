//! Process constants. Temperatures in °C, volumes in liters, strengths in % v/v.

/// Lowest temperature covered by the equilibrium tables (azeotrope boiling point).
pub const EQUILIBRIUM_MIN_TEMP: f64 = 78.15;

/// Highest temperature covered by the equilibrium tables (boiling water).
pub const EQUILIBRIUM_MAX_TEMP: f64 = 100.0;

/// Accepted distillate temperature range for the 20 °C correction.
pub const DISTILLATE_MIN_TEMP: f64 = 10.0;
pub const DISTILLATE_MAX_TEMP: f64 = 30.0;

/// Reference proof used to convert a batch strength into absolute alcohol.
///
/// Models the strongest feed the still can produce, so the absolute alcohol
/// figure is relative to rectified spirit rather than to pure ethanol.
pub const REFERENCE_PROOF: f64 = 96.6;

/// Milliliters per liter.
pub const ML_PER_L: f64 = 1000.0;

/// Accepted cube volume range for user constants and the rate advisor.
pub const CUBE_VOLUME_MIN: f64 = 20.0;
pub const CUBE_VOLUME_MAX: f64 = 100.0;

/// Upper bound of the small-cube band (inclusive).
pub const SMALL_CUBE_MAX: f64 = 37.0;
/// Upper bound of the medium-cube band (inclusive).
pub const MEDIUM_CUBE_MAX: f64 = 50.0;

/// Speed coefficients for the small, medium and large cube bands.
pub const SMALL_CUBE_COEFFICIENT: f64 = 700.0;
pub const MEDIUM_CUBE_COEFFICIENT: f64 = 600.0;
pub const LARGE_CUBE_COEFFICIENT: f64 = 500.0;

/// Share of raw spirit taken into the rate formula.
pub const RAW_SPIRIT_RATE_FACTOR: f64 = 0.35;
/// Minutes per hour; converts the per-minute figure to L/h.
pub const MINUTES_PER_HOUR: f64 = 60.0;
/// Maximum recommended rate as a multiple of the minimum.
pub const MAX_RATE_MULTIPLIER: f64 = 2.0;

/// Flat-model rate coefficients (L/h per liter of batch).
pub const FLAT_MIN_RATE_PER_L: f64 = 0.038;
pub const FLAT_MAX_RATE_PER_L: f64 = 0.079;

/// Raw spirit charge as a share of the cube volume, used by batch reports.
pub const RAW_SPIRIT_FILL_RATIO: f64 = 0.85;

/// Accepted average head strength range (%).
pub const HEAD_STRENGTH_MIN: f64 = 76.0;
pub const HEAD_STRENGTH_MAX: f64 = 95.0;

/// Default user constants.
pub const DEFAULT_CUBE_VOLUME: f64 = 50.0;
pub const DEFAULT_HEAD_PERCENTAGE: f64 = 5.0;
pub const DEFAULT_BODY_PERCENTAGE: f64 = 18.0;
pub const DEFAULT_PRE_TAIL_PERCENTAGE: f64 = 2.0;
pub const DEFAULT_TAIL_PERCENTAGE: f64 = 10.0;
pub const DEFAULT_AVERAGE_HEAD_STRENGTH: f64 = 81.5;
