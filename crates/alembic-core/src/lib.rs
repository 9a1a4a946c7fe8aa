//! # alembic-core
//! Calculation core for batch distillation planning.
//!
//! Every function here is pure and synchronous: it reads the built-in
//! equilibrium tables and a resolved [`UserConstants`] record, never a
//! settings store.
//!
//! - [`tables`]: liquid/vapor equilibrium and 20 °C correction tables
//! - [`interp`]: bracket lookup and two-point linear interpolation
//! - [`strength`]: distillate strength from cube/vapor temperatures
//! - [`fractions`]: heads/body/pre-tails/tails split of a batch
//! - [`speed`]: recommended collection rate
//! - [`report`]: batch summary built from a user's constants
//! - [`settings`]: user constants and the settings-store contract

pub mod constants;
pub mod error;
pub mod fractions;
pub mod interp;
pub mod report;
pub mod settings;
pub mod speed;
pub mod strength;
pub mod tables;

pub use error::{CalcError, ConfigRangeError, InterpolationError, StoreError};
pub use fractions::{calculate_fractions, validate_batch, FractionResult};
pub use interp::{find_closest_values, linear_interpolation, LookupTable};
pub use report::BatchReport;
pub use settings::{get_default_constants, SettingsStore, UserConstants, UserId};
pub use speed::{calculate_speed, calculate_speed_flat, speed_coefficient, SpeedModel};
pub use strength::{
    calculate_alcohol_content, correct_for_temperature, distillate_strength, StrengthReading,
};
pub use tables::{get_correction_table, get_liquid_table, get_vapor_table};
