//! Error types for the Alembic calculation core.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    #[error("value {value} is outside the table range [{min}, {max}]")] OutOfRange { value: f64, min: f64, max: f64 },
    #[error("at least two keys are required, got {0}")] TooFewKeys(usize),
    #[error("zero-width interval at x = {0}")] ZeroWidthInterval(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigRangeError {
    #[error("cube volume {0} L is outside 20–100 L")] CubeVolume(f64),
    #[error("{field} {value}% is outside 0–100%")] Percentage { field: &'static str, value: f64 },
    #[error("average head strength {0}% is outside 76–95%")] AverageHeadStrength(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error(transparent)] Interpolation(#[from] InterpolationError),
    #[error(transparent)] ConfigRange(#[from] ConfigRangeError),
    #[error("{quantity} {value} is outside the accepted range [{min}, {max}]")] InputOutOfRange { quantity: &'static str, value: f64, min: f64, max: f64 },
    #[error("batch volume must be positive, got {0} L")] NonPositiveVolume(f64),
    #[error("volume must not be negative, got {0} L")] NegativeVolume(f64),
    #[error("volume must be a finite number, got {0}")] InvalidVolume(f64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("I/O error: {0}")] Io(String),
    #[error("serialization: {0}")] Serialization(String),
}
