//! Single quasi-parabolic segment: constrained least-squares fit and
//! evaluation helpers.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{Kilometer, MegaHertz};
use crate::skywave_errors::SkywaveError;

/// One quasi-parabolic layer of the segmented ionosphere model.
///
/// The electron density is represented as plasma frequency squared,
/// `fp²(r) = cap_a/r² + cap_b/r + cap_c`, valid on the radial interval
/// `[radial_lower, radial_upper]`. Segments are built top-down and joined so
/// that value and radial gradient are both continuous at the shared bound.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QpSegment {
    /// Quadratic coefficient in 1/r (MHz² km²).
    pub cap_a: f64,
    /// Linear coefficient in 1/r (MHz² km).
    pub cap_b: f64,
    /// Constant term (MHz²).
    pub cap_c: f64,
    /// Lower radial bound, the join point shared with the segment below (km).
    pub radial_lower: Kilometer,
    /// Upper radial bound, the join point shared with the segment above (km).
    pub radial_upper: Kilometer,
    /// Measured plasma frequency at the lower bound (MHz).
    pub fp_lower: MegaHertz,
    /// Measured plasma frequency at the upper bound (MHz).
    pub fp_upper: MegaHertz,
    /// Number of profile points in the accepted fit window.
    pub fit_points: usize,
}

impl QpSegment {
    /// Plasma frequency squared at `radial`, in MHz².
    pub fn plasma_freq_squared(&self, radial: Kilometer) -> f64 {
        eval_fp2(self.cap_a, self.cap_b, self.cap_c, radial)
    }

    /// Radial gradient d(fp²)/dr at `radial`, in MHz²/km.
    pub fn gradient(&self, radial: Kilometer) -> f64 {
        if radial != 0.0 {
            (-2.0 * self.cap_a / radial - self.cap_b) / (radial * radial)
        } else {
            0.0
        }
    }

    /// True when `radial` lies within the segment bounds (inclusive).
    pub fn contains_radial(&self, radial: Kilometer) -> bool {
        radial >= self.radial_lower && radial <= self.radial_upper
    }

    /// Radial distance where a vertical ray at `frequency` would reflect,
    /// the stationary point of the ray-path quadratic (km).
    ///
    /// The returned radial is only physical when it falls inside the segment
    /// bounds; callers must check. Zero frequency yields zero.
    pub fn reflection_radial(&self, frequency: MegaHertz) -> Kilometer {
        if frequency != 0.0 {
            let recip_freq2 = 1.0 / (frequency * frequency);
            (self.cap_b * recip_freq2) / (2.0 - 2.0 * self.cap_c * recip_freq2)
        } else {
            0.0
        }
    }
}

fn eval_fp2(cap_a: f64, cap_b: f64, cap_c: f64, radial: Kilometer) -> f64 {
    if radial != 0.0 {
        (cap_a / radial + cap_b) / radial + cap_c
    } else {
        0.0
    }
}

/// Verdict of the fit-window quality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitQuality {
    /// Every window point is within tolerance and the RMS residual holds.
    Passed,
    /// The fitted plasma frequency overshoots a measurement beyond tolerance.
    ToleranceFailed,
    /// Point-wise tolerances hold but the RMS residual is too large.
    RmsFailed,
}

/// Least-squares fit of a quasi-parabolic segment through the window points,
/// constrained to reproduce the value `join_fp2` and the gradient
/// `join_gradient` at the join radial `join_radial`.
///
/// The constraints pin `cap_b` and `cap_c` once `cap_a` is known, so the fit
/// reduces to a single normal equation in `cap_a` over the offsets
/// `1/join_radial - 1/r`.
///
/// Arguments
/// -----------------
/// * `radials`: window radial distances (km), below the join.
/// * `fp2`: plasma frequency squared at the window points (MHz²).
/// * `join_radial`: anchor radial shared with the segment above (km).
/// * `join_fp2`: fp² carried down from the segment above (MHz²).
/// * `join_gradient`: d(fp²)/dr carried down from the segment above.
///
/// Return
/// ----------
/// * `(cap_a, cap_b, cap_c)` of the fitted segment, or
///   [`SkywaveError::DegenerateFit`] when the window collapses onto the
///   join radial.
pub(crate) fn fit_through_join(
    radials: &[Kilometer],
    fp2: &[f64],
    join_radial: Kilometer,
    join_fp2: f64,
    join_gradient: f64,
) -> Result<(f64, f64, f64), SkywaveError> {
    let recip_join = 1.0 / join_radial;
    let join_r2 = join_radial * join_radial;
    let gradient_r2 = join_gradient * join_r2;

    let mut sum_dy = 0.0;
    let mut sum_dydr2 = 0.0;
    let mut sum_dr2 = 0.0;
    for (&radial, &y) in radials.iter().zip(fp2) {
        let delta = recip_join - 1.0 / radial;
        sum_dy += y - join_fp2;
        sum_dydr2 -= gradient_r2 * delta;
        sum_dr2 += delta * delta;
    }
    if sum_dr2 == 0.0 {
        return Err(SkywaveError::DegenerateFit);
    }

    let cap_a = (sum_dy + sum_dydr2) / sum_dr2;
    let cap_b = -2.0 * cap_a / join_radial - join_gradient * join_r2;
    let cap_c = join_fp2 + cap_a / join_r2 + join_gradient * join_radial;
    Ok((cap_a, cap_b, cap_c))
}

/// Judge a candidate fit against the window samples.
///
/// A point fails when the fitted plasma frequency exceeds the measured one by
/// more than `percent_error` of the measurement, capped at `max_mhz`. Only
/// overshoot counts; a fit running below the data is acceptable. When every
/// point passes, the mean squared fp² residual is held to the tolerance of
/// the lowest window point, where density is smallest.
pub(crate) fn fit_quality(
    cap_a: f64,
    cap_b: f64,
    cap_c: f64,
    radials: &[Kilometer],
    fp: &[MegaHertz],
    fp2: &[f64],
    percent_error: f64,
    max_mhz: MegaHertz,
) -> FitQuality {
    let mut sum_diff2 = 0.0;
    let mut tolerance = max_mhz;
    let mut within_tolerance = true;

    for index in (0..radials.len()).rev() {
        let y_fit = eval_fp2(cap_a, cap_b, cap_c, radials[index]);
        let y_diff = y_fit - fp2[index];
        let fp_diff = y_fit.abs().sqrt() - fp[index];
        tolerance = (percent_error * fp[index]).min(max_mhz);
        if fp_diff > tolerance {
            within_tolerance = false;
        }
        sum_diff2 += y_diff * y_diff;
    }
    if !within_tolerance {
        return FitQuality::ToleranceFailed;
    }

    let rms_error = sum_diff2 / (radials.len() as f64 - 1.0);
    if rms_error > tolerance {
        FitQuality::RmsFailed
    } else {
        FitQuality::Passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_segment() -> QpSegment {
        QpSegment {
            cap_a: 2.0e9,
            cap_b: -5.0e5,
            cap_c: 40.0,
            radial_lower: 6600.0,
            radial_upper: 6680.0,
            fp_lower: 3.0,
            fp_upper: 3.2,
            fit_points: 4,
        }
    }

    #[test]
    fn fit_recovers_exact_quasi_parabola() {
        let truth = reference_segment();
        let radials = [6600.0, 6620.0, 6640.0, 6660.0];
        let fp2: Vec<f64> = radials
            .iter()
            .map(|&r| truth.plasma_freq_squared(r))
            .collect();
        let join = 6680.0;

        let (cap_a, cap_b, cap_c) = fit_through_join(
            &radials,
            &fp2,
            join,
            truth.plasma_freq_squared(join),
            truth.gradient(join),
        )
        .expect("well separated window");

        assert_relative_eq!(cap_a, truth.cap_a, max_relative = 1e-9);
        assert_relative_eq!(cap_b, truth.cap_b, max_relative = 1e-9);
        assert_relative_eq!(cap_c, truth.cap_c, max_relative = 1e-9);
    }

    #[test]
    fn gradient_matches_finite_difference() {
        let segment = reference_segment();
        let radial = 6640.0;
        let step = 0.01;
        let numeric = (segment.plasma_freq_squared(radial + step)
            - segment.plasma_freq_squared(radial - step))
            / (2.0 * step);
        assert_relative_eq!(segment.gradient(radial), numeric, max_relative = 1e-6);
    }

    #[test]
    fn collapsed_window_is_degenerate() {
        let err = fit_through_join(&[6680.0, 6680.0], &[9.0, 9.0], 6680.0, 9.0, 0.0).unwrap_err();
        assert_eq!(err, SkywaveError::DegenerateFit);
    }

    #[test]
    fn quality_flags_fit_overshoot() {
        let truth = reference_segment();
        let radials = [6600.0, 6620.0, 6640.0, 6660.0];
        let fp2: Vec<f64> = radials
            .iter()
            .map(|&r| truth.plasma_freq_squared(r))
            .collect();
        let mut fp: Vec<f64> = fp2.iter().map(|&y| y.abs().sqrt()).collect();

        assert_eq!(
            fit_quality(
                truth.cap_a, truth.cap_b, truth.cap_c, &radials, &fp, &fp2, 0.05, 0.1
            ),
            FitQuality::Passed
        );

        // Drag one measurement half a megahertz below the curve; the fitted
        // value now overshoots it far past the 0.1 MHz cap.
        fp[2] -= 0.5;
        let fp2_low: Vec<f64> = fp.iter().map(|&f| f * f).collect();
        assert_eq!(
            fit_quality(
                truth.cap_a, truth.cap_b, truth.cap_c, &radials, &fp, &fp2_low, 0.05, 0.1
            ),
            FitQuality::ToleranceFailed
        );
    }

    #[test]
    fn quality_flags_large_rms_without_overshoot() {
        let truth = reference_segment();
        let radials = [6600.0, 6620.0, 6640.0, 6660.0];
        let mut fp: Vec<f64> = radials
            .iter()
            .map(|&r| truth.plasma_freq_squared(r).abs().sqrt())
            .collect();

        // A measurement half a megahertz above the curve never trips the
        // one-sided overshoot test but leaves a large squared residual.
        fp[1] += 0.5;
        let fp2: Vec<f64> = fp.iter().map(|&f| f * f).collect();
        assert_eq!(
            fit_quality(
                truth.cap_a, truth.cap_b, truth.cap_c, &radials, &fp, &fp2, 0.05, 0.1
            ),
            FitQuality::RmsFailed
        );
    }

    #[test]
    fn reflection_radial_sits_at_the_density_peak() {
        // Build a segment whose fp² maximum of 36 MHz² sits at 6700 km; a
        // vertical ray at the 6 MHz critical frequency must reflect exactly
        // there, where the gradient vanishes.
        let peak = 6700.0;
        let cap_a = -4.0e9;
        let cap_b = -2.0 * cap_a / peak;
        let cap_c = 36.0 - cap_a / (peak * peak) - cap_b / peak;
        let segment = QpSegment {
            cap_a,
            cap_b,
            cap_c,
            radial_lower: 6650.0,
            radial_upper: 6750.0,
            fp_lower: 5.0,
            fp_upper: 5.0,
            fit_points: 4,
        };

        let fo2 = segment.plasma_freq_squared(peak);
        assert_relative_eq!(fo2, 36.0, max_relative = 1e-12);
        let reflect = segment.reflection_radial(fo2.sqrt());
        assert!(segment.contains_radial(reflect));
        assert_relative_eq!(reflect, peak, max_relative = 1e-9);
        assert_relative_eq!(segment.gradient(reflect), 0.0, epsilon = 1e-9);
    }
}
