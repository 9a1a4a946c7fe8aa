//! Shared test helpers.

use alembic_core::settings::UserConstants;

/// Absolute tolerance for comparing computed volumes and percentages.
pub const EPS: f64 = 1e-9;

/// `true` when `a` and `b` differ by less than `eps`.
pub fn close_to(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

/// `true` when `a` and `b` agree to [`EPS`].
pub fn close(a: f64, b: f64) -> bool {
    close_to(a, b, EPS)
}

/// Default constants with a different cube volume.
pub fn with_cube(cube_volume: f64) -> UserConstants {
    UserConstants {
        cube_volume,
        ..UserConstants::default()
    }
}

/// A valid non-default record, distinct per `seed`. Every field is a
/// multiple of 0.5 so it survives a JSON round trip bit for bit.
pub fn sample_constants(seed: u8) -> UserConstants {
    let s = f64::from(seed % 50);
    let step = f64::from(seed % 10);
    UserConstants {
        cube_volume: 20.0 + s,
        head_percentage: 1.0 + step * 0.5,
        body_percentage: 15.0 + step,
        pre_tail_percentage: 2.0,
        tail_percentage: 10.0,
        average_head_strength: 80.0 + step * 0.5,
    }
}
