//! Analytic two-dimensional ray tracing through a quasi-parabolic model.
//!
//! The technique goes back to the closed-form quasi-parabolic treatment of
//! Croft & Hoogasian (1968), chained over a segmented profile in the manner
//! of Dyson & Bennett (1988): because each fitted segment is quasi-parabolic,
//! the path integral through it reduces to an arcsine or logarithmic
//! expression evaluated at the segment boundaries, and a whole hop costs one
//! boundary evaluation per crossed segment instead of a numerical
//! quadrature. The turnover radial comes straight from the discriminant of
//! the per-segment ray quadratic.
//!
//! The module splits into three layers:
//!
//! * [`coefficients`] – per-query ray quadratic for one segment,
//! * [`boundary`] – closed-form boundary integral of that quadratic,
//! * [`path`] – the up/down leg walk assembling a full [`RayPath`].
//!
//! ```no_run
//! use skywave::profile::{DensityProfile, ProfileUnit};
//! use skywave::qp_model::{QpFitParams, QpModel};
//! use skywave::ray_trace::trace_path;
//!
//! # fn main() -> Result<(), skywave::skywave_errors::SkywaveError> {
//! let heights: Vec<f64> = (0..41).map(|i| 120.0 + 10.0 * i as f64).collect();
//! let values: Vec<f64> = heights.iter().map(|&h| 2.0 + (h / 100.0).sin()).collect();
//! let profile = DensityProfile::new(heights, values, ProfileUnit::PlasmaFrequencyMhz)?;
//! let model = QpModel::from_profile(&profile, &QpFitParams::default())?;
//!
//! let path = trace_path(&model, 5.0, 20.0_f64.to_radians(), model.bottom_radial() - 5.0)?;
//! println!("{path}");
//! # Ok(())
//! # }
//! ```

pub mod boundary;
pub mod coefficients;
pub mod path;

pub use boundary::{segment_integral, BoundaryIntegral, Crossing};
pub use coefficients::RayCoeffs;
pub use path::{trace_path, Apogee, PathPoint, RayPath, TraceStatus};
