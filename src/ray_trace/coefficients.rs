//! Per-ray quadratic coefficients of one segment crossing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{Kilometer, MegaHertz, Radian, MEAN_RADIUS_EARTH};
use crate::qp_model::QpSegment;

/// Coefficients of the path quadratic `X(r) = ital_a·r² + ital_b·r + ital_c`
/// for one ray crossing one quasi-parabolic segment.
///
/// Unlike the density coefficients of the segment itself, these depend on the
/// operating frequency and the launch elevation, so they are derived per
/// query and never stored in the model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RayCoeffs {
    pub ital_a: f64,
    pub ital_b: f64,
    pub ital_c: f64,
    /// Discriminant `ital_b² - 4·ital_a·ital_c` of the path quadratic.
    pub denom_quad: f64,
}

impl RayCoeffs {
    /// Derive the path quadratic for `segment` at the given operating
    /// frequency and launch elevation (radians). A zero frequency collapses
    /// every coefficient to zero.
    pub fn from_segment(segment: &QpSegment, frequency: MegaHertz, elevation: Radian) -> Self {
        let freq2 = frequency * frequency;
        if freq2 == 0.0 {
            return RayCoeffs {
                ital_a: 0.0,
                ital_b: 0.0,
                ital_c: 0.0,
                denom_quad: 0.0,
            };
        }

        let r0_cos_beta = MEAN_RADIUS_EARTH * elevation.cos();
        let ital_a = 1.0 - segment.cap_c / freq2;
        let ital_b = -segment.cap_b / freq2;
        let ital_c = -(r0_cos_beta * r0_cos_beta) - segment.cap_a / freq2;
        RayCoeffs {
            ital_a,
            ital_b,
            ital_c,
            denom_quad: ital_b * ital_b - 4.0 * ital_a * ital_c,
        }
    }

    /// Path quadratic value at `radial`.
    pub fn x_at(&self, radial: Kilometer) -> f64 {
        (self.ital_a * radial + self.ital_b) * radial + self.ital_c
    }

    /// Turning radial of the ray inside `segment`, when one exists.
    ///
    /// The quadratic roots are screened against the segment bounds; when both
    /// fall inside, the lower one is the physical turning point. `None` means
    /// the ray crosses the whole segment without turning over.
    pub fn apogee_radial(&self, segment: &QpSegment) -> Option<Kilometer> {
        if self.denom_quad <= 0.0 {
            return None;
        }
        let sqrt_quad = self.denom_quad.sqrt();
        let turn_minus = (-self.ital_b - sqrt_quad) / (2.0 * self.ital_a);
        let turn_plus = (-self.ital_b + sqrt_quad) / (2.0 * self.ital_a);

        let minus_inside =
            turn_minus <= segment.radial_upper && turn_minus > segment.radial_lower;
        let plus_inside = turn_plus < segment.radial_upper && turn_plus >= segment.radial_lower;
        match (minus_inside, plus_inside) {
            (true, true) => Some(turn_minus.min(turn_plus)),
            (true, false) => Some(turn_minus),
            (false, true) => Some(turn_plus),
            (false, false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn free_space(lower: Kilometer, upper: Kilometer) -> QpSegment {
        QpSegment {
            cap_a: 0.0,
            cap_b: 0.0,
            cap_c: 0.0,
            radial_lower: lower,
            radial_upper: upper,
            fp_lower: 0.0,
            fp_upper: 0.0,
            fit_points: 2,
        }
    }

    #[test]
    fn zero_frequency_collapses_coefficients() {
        let coeffs = RayCoeffs::from_segment(&free_space(6470.0, 6570.0), 0.0, 0.3);
        assert_eq!(coeffs.ital_a, 0.0);
        assert_eq!(coeffs.ital_b, 0.0);
        assert_eq!(coeffs.ital_c, 0.0);
        assert_eq!(coeffs.denom_quad, 0.0);
    }

    #[test]
    fn free_space_quadratic_reduces_to_geometry() {
        // Without ionization, X(r) = r² - (Re·cosβ)², the square of the
        // ray-normal distance in a spherical vacuum.
        let beta = 25.0_f64.to_radians();
        let coeffs = RayCoeffs::from_segment(&free_space(6470.0, 6570.0), 7.0, beta);
        let expected = MEAN_RADIUS_EARTH * MEAN_RADIUS_EARTH * beta.sin().powi(2);
        assert_relative_eq!(coeffs.x_at(MEAN_RADIUS_EARTH), expected, max_relative = 1e-12);
    }

    #[test]
    fn free_space_segment_has_no_turning_point() {
        let segment = free_space(6470.0, 6570.0);
        let coeffs = RayCoeffs::from_segment(&segment, 7.0, 0.3);
        assert_eq!(coeffs.apogee_radial(&segment), None);
    }

    #[test]
    fn constant_density_layer_turns_the_ray_where_expected() {
        // A uniform layer (cap_c only) reflects where
        // X(r) = (1 - fp²/f²)·r² - (Re·cosβ)² crosses zero; place that root
        // at 6620 km and check the screened quadratic recovers it.
        let beta = 30.0_f64.to_radians();
        let frequency = 5.0;
        let target = 6620.0;
        let freq2 = frequency * frequency;
        let ratio = (MEAN_RADIUS_EARTH * beta.cos() / target).powi(2);
        let segment = QpSegment {
            cap_a: 0.0,
            cap_b: 0.0,
            cap_c: freq2 * (1.0 - ratio),
            radial_lower: 6570.0,
            radial_upper: 6670.0,
            fp_lower: 0.0,
            fp_upper: 0.0,
            fit_points: 2,
        };

        let coeffs = RayCoeffs::from_segment(&segment, frequency, beta);
        let turn = coeffs
            .apogee_radial(&segment)
            .expect("root placed inside the segment");
        assert_relative_eq!(turn, target, max_relative = 1e-9);
        assert_relative_eq!(coeffs.x_at(turn), 0.0, epsilon = 1e-6);
    }
}
