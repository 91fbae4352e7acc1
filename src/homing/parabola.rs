//! Least-squares parabola through the bracket points.

use nalgebra::{Matrix3, Vector3};

/// Fit `y = c0 + c1·x + c2·x²` to the given points by normal equations.
///
/// Returns `None` when the system is singular, which for three points means
/// two of the abscissae coincide.
pub(crate) fn parabolic_fit(x: &[f64], y: &[f64]) -> Option<(f64, f64, f64)> {
    let n = x.len().min(y.len()) as f64;

    let mut sum_x = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_x3 = 0.0;
    let mut sum_x4 = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2y = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let xi2 = xi * xi;
        sum_x += xi;
        sum_x2 += xi2;
        sum_x3 += xi * xi2;
        sum_x4 += xi2 * xi2;
        sum_y += yi;
        sum_xy += xi * yi;
        sum_x2y += xi2 * yi;
    }

    let normal = Matrix3::new(
        n, sum_x, sum_x2, //
        sum_x, sum_x2, sum_x3, //
        sum_x2, sum_x3, sum_x4,
    );
    let moments = Vector3::new(sum_y, sum_xy, sum_x2y);

    normal.lu().solve(&moments).map(|c| (c[0], c[1], c[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_exact_coefficients_from_three_points() {
        // y = 0.3 - 0.002·x + 1.5e-6·x², sampled like a homing bracket.
        let eval = |x: f64| 0.3 - 0.002 * x + 1.5e-6 * x * x;
        let x = [750.0, 980.0, 1260.0];
        let y = [eval(x[0]), eval(x[1]), eval(x[2])];

        // The normal equations of a range-scale abscissa are poorly
        // conditioned, so exactness only holds to a few parts in 1e7.
        let (c0, c1, c2) = parabolic_fit(&x, &y).expect("well-posed fit");
        assert_relative_eq!(c0, 0.3, max_relative = 1e-6);
        assert_relative_eq!(c1, -0.002, max_relative = 1e-6);
        assert_relative_eq!(c2, 1.5e-6, max_relative = 1e-6);
    }

    #[test]
    fn coincident_abscissae_are_singular() {
        // Two identical x values make two normal-equation rows equal, so the
        // elimination hits an exact zero pivot.
        let x = [0.0, 0.0, 1.0];
        let y = [0.2, 0.2, 0.1];
        assert_eq!(parabolic_fit(&x, &y), None);
    }

    #[test]
    fn line_data_comes_back_with_zero_curvature() {
        let x = [500.0, 800.0, 1100.0];
        let y: Vec<f64> = x.iter().map(|&xi| 0.4 - 1.0e-4 * xi).collect();
        let (c0, c1, c2) = parabolic_fit(&x, &y).expect("well-posed fit");
        assert_relative_eq!(c0, 0.4, max_relative = 1e-6);
        assert_relative_eq!(c1, -1.0e-4, max_relative = 1e-6);
        assert!(c2.abs() < 1e-9);
    }
}
