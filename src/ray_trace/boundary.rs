//! Closed-form boundary integrals of one segment crossing.
//!
//! Each quasi-parabolic segment admits an analytic antiderivative for the
//! ground-range integrand, with three forms depending on the sign of
//! `ital_c` and on whether the ray turns over inside the segment. The
//! difference of boundary evaluations, upper minus lower, is the segment
//! contribution to the accumulated path integral.

use log::warn;

use crate::constants::Kilometer;
use crate::skywave_errors::SkywaveError;

use super::coefficients::RayCoeffs;

/// How the ray crosses a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// One-way transit entering through one bound and leaving the other.
    Single,
    /// The ray turns over inside the segment: the upper boundary is replaced
    /// by the apogee form and both contributions count twice, once per leg.
    Apogee,
}

/// Boundary evaluations of one segment crossing; the segment contributes
/// `upper - lower` to the path integral.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundaryIntegral {
    pub lower: f64,
    pub upper: f64,
}

enum Boundary {
    Lower,
    Upper,
}

/// Evaluate both boundary contributions of one segment crossing.
///
/// The lower boundary is taken at `max(ray_radial, radial_lower)`, so a ray
/// entering above the segment bottom integrates only the part it actually
/// traverses; its contribution counts only where the path quadratic is
/// positive. The lower boundary must be evaluated before the upper one: thin
/// layers drive the logarithmic form negative and the two boundaries then
/// cancel through their ratio.
///
/// Arguments
/// -----------------
/// * `coeffs`: path quadratic of this ray in this segment.
/// * `radial_lower`, `radial_upper`: segment bounds (km).
/// * `ray_radial`: radial where the ray enters the segment (km).
/// * `crossing`: single transit or apogee turnover.
///
/// Return
/// ----------
/// * The pair of boundary values, or a [`SkywaveError`] when the logarithmic
///   form is evaluated outside its domain.
pub fn segment_integral(
    coeffs: &RayCoeffs,
    radial_lower: Kilometer,
    radial_upper: Kilometer,
    ray_radial: Kilometer,
    crossing: Crossing,
) -> Result<BoundaryIntegral, SkywaveError> {
    let mut result = BoundaryIntegral::default();
    let mut partial_log = 0.0;

    let r_lower = ray_radial.max(radial_lower);
    let x_lower = coeffs.x_at(r_lower);
    let lower = if coeffs.ital_c < 0.0 {
        asin_form(coeffs, r_lower)
    } else {
        log_form(coeffs, r_lower, x_lower, Boundary::Lower, &mut partial_log)?
    };
    if x_lower > 0.0 {
        result.lower += lower;
        if crossing == Crossing::Apogee {
            result.lower += lower;
        }
    }

    let upper = match crossing {
        Crossing::Apogee => apogee_upper(coeffs)?,
        Crossing::Single => {
            let x_upper = coeffs.x_at(radial_upper);
            if coeffs.ital_c < 0.0 {
                asin_form(coeffs, radial_upper)
            } else {
                log_form(
                    coeffs,
                    radial_upper,
                    x_upper,
                    Boundary::Upper,
                    &mut partial_log,
                )?
            }
        }
    };
    result.upper += upper;
    if crossing == Crossing::Apogee {
        result.upper += upper;
    }

    Ok(result)
}

/// Arcsine antiderivative, used when `ital_c` is negative.
fn asin_form(coeffs: &RayCoeffs, radial: Kilometer) -> f64 {
    if coeffs.denom_quad < 0.0 {
        return 0.0;
    }
    let sqrt_neg_c = (-coeffs.ital_c).sqrt();
    let comp =
        (coeffs.ital_b * radial + 2.0 * coeffs.ital_c) / (radial * coeffs.denom_quad.sqrt());
    if comp >= 1.0 {
        warn!("arcsine argument {comp:.4e} clamped at radial {radial:.1} km");
        std::f64::consts::FRAC_PI_2 / sqrt_neg_c
    } else if comp < -1.0 {
        warn!("arcsine argument {comp:.4e} clamped at radial {radial:.1} km");
        -std::f64::consts::FRAC_PI_2 / sqrt_neg_c
    } else {
        comp.asin() / sqrt_neg_c
    }
}

/// Logarithmic antiderivative, used when `ital_c` is positive.
fn log_form(
    coeffs: &RayCoeffs,
    radial: Kilometer,
    x_value: f64,
    boundary: Boundary,
    partial_log: &mut f64,
) -> Result<f64, SkywaveError> {
    if x_value < 0.0 {
        return Err(SkywaveError::NegativeBoundaryQuadratic {
            x: x_value,
            radial,
        });
    }
    if coeffs.ital_c <= 0.0 {
        return Err(SkywaveError::DegenerateBoundaryCoefficient);
    }

    let sqrt_c = coeffs.ital_c.sqrt();
    let comp = (2.0 * (coeffs.ital_c * x_value).sqrt()
        + coeffs.ital_b * radial
        + 2.0 * coeffs.ital_c)
        / radial;

    // Thin layers push the log argument negative; the two boundaries then
    // pair up and only their ratio survives.
    if comp < 0.0 {
        match boundary {
            Boundary::Lower => {
                *partial_log = comp;
                Ok(0.0)
            }
            Boundary::Upper => {
                if *partial_log == 0.0 {
                    return Err(SkywaveError::InternalInvariant(
                        "negative logarithmic boundary without a paired lower value",
                    ));
                }
                let value = -(comp / *partial_log).ln() / sqrt_c;
                *partial_log = 0.0;
                Ok(value)
            }
        }
    } else {
        *partial_log = 0.0;
        Ok(-comp.ln() / sqrt_c)
    }
}

/// Upper-boundary value at an apogee turnover.
fn apogee_upper(coeffs: &RayCoeffs) -> Result<f64, SkywaveError> {
    if coeffs.ital_c > 0.0 {
        Ok(-coeffs.denom_quad.ln() / (2.0 * coeffs.ital_c.sqrt()))
    } else if coeffs.ital_c == 0.0 {
        Err(SkywaveError::ApogeeCoefficientZero)
    } else {
        Ok(std::f64::consts::PI / (2.0 * (-coeffs.ital_c).sqrt()))
    }
}
