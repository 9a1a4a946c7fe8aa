//! Bracket lookup and linear interpolation over sorted numeric keys.
//!
//! Queries must lie inside `[min(keys), max(keys)]`. Nothing here clamps or
//! extrapolates: a value outside the table is an [`InterpolationError`].

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::error::InterpolationError;

/// Find the two adjacent keys that bracket `value`.
///
/// `sorted_keys` must be sorted ascending. Returns the first pair with
/// `lo <= value <= hi`, so a value equal to an interior key gets the bracket
/// ending at that key and `value == max(keys)` gets
/// `(second_to_last, last)`. On strictly increasing keys the bracket is
/// therefore never zero-width.
pub fn find_closest_values(
    value: f64,
    sorted_keys: &[f64],
) -> Result<(f64, f64), InterpolationError> {
    if sorted_keys.len() < 2 {
        return Err(InterpolationError::TooFewKeys(sorted_keys.len()));
    }

    sorted_keys
        .windows(2)
        .find(|pair| pair[0] <= value && value <= pair[1])
        .map(|pair| (pair[0], pair[1]))
        .ok_or(InterpolationError::OutOfRange {
            value,
            min: sorted_keys[0],
            max: sorted_keys[sorted_keys.len() - 1],
        })
}

/// Two-point linear interpolation of `y` at `x` on the line through
/// `(x1, y1)` and `(x2, y2)`.
///
/// Exact at both endpoints. Fails with [`InterpolationError::ZeroWidthInterval`]
/// when `x1 == x2`.
pub fn linear_interpolation(
    x: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
) -> Result<f64, InterpolationError> {
    let width = x2 - x1;
    if width == 0.0 {
        return Err(InterpolationError::ZeroWidthInterval(x1));
    }
    let t = (x - x1) / width;
    Ok(y1 * (1.0 - t) + y2 * t)
}

/// Immutable table of `key -> value` points with strictly increasing keys.
///
/// Backed by a `BTreeMap` keyed on [`OrderedFloat`], so ordering and
/// uniqueness hold by construction. Non-finite keys are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    points: BTreeMap<OrderedFloat<f64>, f64>,
}

impl LookupTable {
    /// Build a table from `(key, value)` pairs. A repeated key keeps the last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let points = pairs
            .into_iter()
            .filter(|(k, _)| k.is_finite())
            .map(|(k, v)| (OrderedFloat(k), v))
            .collect();
        Self { points }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> Vec<f64> {
        self.points.keys().map(|k| k.into_inner()).collect()
    }

    /// `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|(k, v)| (k.into_inner(), *v))
    }

    /// Exact lookup of a stored key.
    pub fn get(&self, key: f64) -> Option<f64> {
        self.points.get(&OrderedFloat(key)).copied()
    }

    pub fn min_key(&self) -> Option<f64> {
        self.points.keys().next().map(|k| k.into_inner())
    }

    pub fn max_key(&self) -> Option<f64> {
        self.points.keys().next_back().map(|k| k.into_inner())
    }

    /// Interpolate the table at `x`.
    pub fn interpolate(&self, x: f64) -> Result<f64, InterpolationError> {
        let mut bracket = self
            .points
            .range(..=OrderedFloat(x))
            .next_back()
            .zip(self.points.range(OrderedFloat(x)..).next());

        // `x` equal to a stored key lands on a zero-width pair above;
        // fall back to the slice search, which picks the left-hand bracket.
        if let Some(((lo, _), (hi, _))) = bracket {
            if lo == hi {
                bracket = None;
            }
        }

        let (x1, x2) = match bracket {
            Some(((lo, _), (hi, _))) => (lo.into_inner(), hi.into_inner()),
            None => find_closest_values(x, &self.keys())?,
        };

        let y1 = self.points[&OrderedFloat(x1)];
        let y2 = self.points[&OrderedFloat(x2)];
        linear_interpolation(x, x1, x2, y1, y2)
    }
}
