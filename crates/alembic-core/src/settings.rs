//! Per-user constants and the settings-store contract.
//!
//! The core only ever reads a resolved [`UserConstants`] value. Persisting
//! and looking up records is the job of a [`SettingsStore`] implementation
//! (see the `alembic-store` crate), injected into front ends.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CUBE_VOLUME_MAX, CUBE_VOLUME_MIN, DEFAULT_AVERAGE_HEAD_STRENGTH, DEFAULT_BODY_PERCENTAGE,
    DEFAULT_CUBE_VOLUME, DEFAULT_HEAD_PERCENTAGE, DEFAULT_PRE_TAIL_PERCENTAGE,
    DEFAULT_TAIL_PERCENTAGE, HEAD_STRENGTH_MAX, HEAD_STRENGTH_MIN,
};
use crate::error::{ConfigRangeError, StoreError};

/// Chat/user identifier the settings are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A user's still and cut configuration.
///
/// Field names match the persisted JSON layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserConstants {
    /// Cube volume in liters, 20–100.
    pub cube_volume: f64,
    pub head_percentage: f64,
    pub body_percentage: f64,
    pub pre_tail_percentage: f64,
    pub tail_percentage: f64,
    /// Average strength of the heads cut (%), 76–95.
    pub average_head_strength: f64,
}

impl Default for UserConstants {
    fn default() -> Self {
        Self {
            cube_volume: DEFAULT_CUBE_VOLUME,
            head_percentage: DEFAULT_HEAD_PERCENTAGE,
            body_percentage: DEFAULT_BODY_PERCENTAGE,
            pre_tail_percentage: DEFAULT_PRE_TAIL_PERCENTAGE,
            tail_percentage: DEFAULT_TAIL_PERCENTAGE,
            average_head_strength: DEFAULT_AVERAGE_HEAD_STRENGTH,
        }
    }
}

impl UserConstants {
    /// Build from the six values in display order: cube volume, head, body,
    /// pre-tail and tail percentages, average head strength. Validated.
    pub fn from_values(values: [f64; 6]) -> Result<Self, ConfigRangeError> {
        let [cube_volume, head, body, pre_tail, tail, average_head_strength] = values;
        let constants = Self {
            cube_volume,
            head_percentage: head,
            body_percentage: body,
            pre_tail_percentage: pre_tail,
            tail_percentage: tail,
            average_head_strength,
        };
        constants.validate()?;
        Ok(constants)
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigRangeError> {
        if !(CUBE_VOLUME_MIN..=CUBE_VOLUME_MAX).contains(&self.cube_volume) {
            return Err(ConfigRangeError::CubeVolume(self.cube_volume));
        }
        for (field, value) in self.percentages() {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigRangeError::Percentage { field, value });
            }
        }
        if !(HEAD_STRENGTH_MIN..=HEAD_STRENGTH_MAX).contains(&self.average_head_strength) {
            return Err(ConfigRangeError::AverageHeadStrength(self.average_head_strength));
        }
        Ok(())
    }

    /// The four cut percentages with their field names, in collection order.
    pub fn percentages(&self) -> [(&'static str, f64); 4] {
        [
            ("head percentage", self.head_percentage),
            ("body percentage", self.body_percentage),
            ("pre-tail percentage", self.pre_tail_percentage),
            ("tail percentage", self.tail_percentage),
        ]
    }
}

/// The fixed record used for users without saved settings.
pub fn get_default_constants() -> UserConstants {
    UserConstants::default()
}

/// Lookup and persistence of per-user constants.
///
/// Reads are fail-soft: a missing or undecodable record is `None`, never an
/// error. Writes are last-write-wins.
pub trait SettingsStore: Send + Sync {
    /// Saved constants for `user`, if any.
    fn load(&self, user: UserId) -> Option<UserConstants>;

    /// Replace the constants for `user`.
    fn save(&self, user: UserId, constants: UserConstants) -> Result<(), StoreError>;

    /// Saved constants for `user`, or the defaults.
    fn resolve(&self, user: UserId) -> UserConstants {
        self.load(user).unwrap_or_default()
    }
}
