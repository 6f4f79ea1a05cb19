use nalgebra::Vector3;
use num::Float;

/// Lower edge of the displayed dynamic range, relative to the pattern peak.
pub const DB_MIN: f32 = -30.;
/// Upper edge of the displayed dynamic range.
pub const DB_MAX: f32 = 0.;

// Computes a vector on the sphere of radius `r` from polar angle theta (measured from +z)
// and azimuth phi (measured from +x towards +y).
pub fn spherical_to_cartesian(r: f32, theta: f32, phi: f32) -> Vector3<f32> {
    Vector3::new(
        r * theta.sin() * phi.cos(),
        r * theta.sin() * phi.sin(),
        r * theta.cos(),
    )
}

pub fn decibels<F: Float>(x: F) -> F {
    F::from(10.).unwrap_or_else(F::one) * x.log10()
}

// Power ratio in dB. Non-positive inputs map to -inf rather than NaN.
pub fn decibels_relative<F: Float>(x: F, reference: F) -> F {
    if x <= F::zero() || reference <= F::zero() {
        F::neg_infinity()
    } else {
        decibels(x / reference)
    }
}

// Maps a dB value into [0, 1] across the displayed dynamic range. -inf lands on 0.
pub fn normalize_decibels(db: f32) -> f32 {
    let clamped = db.max(DB_MIN).min(DB_MAX);
    (clamped - DB_MIN) / (DB_MAX - DB_MIN)
}

// Wraps an angle in degrees into [0, 360).
pub fn wrap_degrees<F: Float>(degrees: F) -> F {
    let full = F::from(360.).unwrap_or_else(F::one);
    let wrapped = degrees % full;
    if wrapped < F::zero() {
        wrapped + full
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn relative_decibels_of_zero_is_negative_infinity() {
        assert_eq!(decibels_relative(0f32, 1.), f32::NEG_INFINITY);
        assert_relative_eq!(decibels_relative(0.5f32, 1.), -3.0103, epsilon = 1e-4);
    }

    #[test]
    fn negative_infinity_normalizes_to_floor() {
        assert_eq!(normalize_decibels(f32::NEG_INFINITY), 0.);
        assert_eq!(normalize_decibels(5.), 1.);
        assert_relative_eq!(normalize_decibels(-15.), 0.5);
    }

    #[test]
    fn wraps_negative_and_large_phases() {
        assert_relative_eq!(wrap_degrees(-90f32), 270.);
        assert_relative_eq!(wrap_degrees(720f32 + 45.), 45.);
        assert_relative_eq!(wrap_degrees(0f32), 0.);
    }

    #[test]
    fn pole_maps_to_z_axis() {
        let v = spherical_to_cartesian(2., 0., 1.3);
        assert_relative_eq!(v.z, 2.);
        assert_relative_eq!(v.x, 0.);
    }
}
