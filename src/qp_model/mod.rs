//! # Segmented quasi-parabolic ionosphere model
//!
//! Fits a vertical electron-density profile with a connected chain of
//! quasi-parabolic segments, each expressing plasma frequency squared as
//! `fp²(r) = A/r² + B/r + C` over a radial interval. The builder works from
//! the profile top downward and anchors every segment to the one above with
//! continuous value and gradient, so the assembled model varies smoothly
//! across joins while each piece keeps the closed-form ray integrals used by
//! [`crate::ray_trace`].
//!
//! ## Fitting strategy
//!
//! Starting below the join, a small window of profile points is fitted by
//! constrained least squares. When the fitted curve overshoots a measurement
//! beyond tolerance, or leaves too large an RMS residual, the window is
//! shrunk by one point from below and refitted against the same join; a
//! two-point window is always accepted so the walk cannot stall. After each
//! accepted segment the window grows back toward its preferred size. Near
//! the profile bottom the last window is stretched to cover every remaining
//! point.
//!
//! ```no_run
//! use skywave::profile::{DensityProfile, ProfileUnit};
//! use skywave::qp_model::{QpFitParams, QpModel};
//!
//! # fn main() -> Result<(), skywave::skywave_errors::SkywaveError> {
//! let heights: Vec<f64> = (0..55).map(|i| 60.0 + 10.0 * i as f64).collect();
//! # let densities: Vec<f64> = heights.iter().map(|h| 1e11 * (h / 300.0)).collect();
//! let profile = DensityProfile::new(heights, densities, ProfileUnit::ElectronDensityPerM3)?;
//! let model = QpModel::from_profile(&profile, &QpFitParams::default())?;
//! println!("{model}");
//! # Ok(())
//! # }
//! ```

use std::fmt;

use log::{debug, trace, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{
    Kilometer, MegaHertz, Segments, MAXIMUM_HME_RADIAL, MINIMUM_HME_RADIAL, MINIMUM_HMF_RADIAL,
};
use crate::geometry::radial_to_height;
use crate::profile::DensityProfile;
use crate::skywave_errors::SkywaveError;

pub mod segment;

pub use segment::{FitQuality, QpSegment};

/// Tuning knobs for the segment fitting loop.
///
/// The defaults reproduce the tolerances the model was validated with; use
/// [`QpFitParams::builder`] to adjust them with range checking.
#[derive(Debug, Clone, PartialEq)]
pub struct QpFitParams {
    /// Preferred number of profile points per fit window. Four keeps valley
    /// structure resolvable without excessive shrink-and-retry cycles;
    /// values below 2 are treated as 2.
    pub max_fit_points: usize,
    /// Hard cap on the number of segments produced.
    pub max_segments: usize,
    /// Fraction of the measured plasma frequency allowed as fit overshoot.
    pub percent_fp_error: f64,
    /// Absolute cap on the fit overshoot tolerance, in MHz.
    pub max_fp_error_mhz: MegaHertz,
}

impl QpFitParams {
    /// Create a checked builder initialized with the defaults.
    pub fn builder() -> QpFitParamsBuilder {
        QpFitParamsBuilder::new()
    }
}

impl Default for QpFitParams {
    fn default() -> Self {
        QpFitParams {
            max_fit_points: 4,
            max_segments: 50,
            percent_fp_error: 0.05,
            max_fp_error_mhz: 0.1,
        }
    }
}

/// Builder for [`QpFitParams`], with validation.
#[derive(Debug, Clone)]
pub struct QpFitParamsBuilder {
    params: QpFitParams,
}

impl Default for QpFitParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QpFitParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: QpFitParams::default(),
        }
    }

    pub fn max_fit_points(mut self, v: usize) -> Self {
        self.params.max_fit_points = v;
        self
    }

    pub fn max_segments(mut self, v: usize) -> Self {
        self.params.max_segments = v;
        self
    }

    pub fn percent_fp_error(mut self, v: f64) -> Self {
        self.params.percent_fp_error = v;
        self
    }

    pub fn max_fp_error_mhz(mut self, v: MegaHertz) -> Self {
        self.params.max_fp_error_mhz = v;
        self
    }

    pub fn build(self) -> Result<QpFitParams, SkywaveError> {
        let p = &self.params;
        if p.max_fit_points < 2 {
            return Err(SkywaveError::InvalidParameter(
                "max_fit_points must be at least 2".into(),
            ));
        }
        if p.max_segments == 0 {
            return Err(SkywaveError::InvalidParameter(
                "max_segments must be at least 1".into(),
            ));
        }
        if !(p.percent_fp_error > 0.0) {
            return Err(SkywaveError::InvalidParameter(
                "percent_fp_error must be positive".into(),
            ));
        }
        if !(p.max_fp_error_mhz > 0.0) {
            return Err(SkywaveError::InvalidParameter(
                "max_fp_error_mhz must be positive".into(),
            ));
        }
        Ok(self.params)
    }
}

/// Critical reflection parameters of one ionospheric layer at a given
/// operating frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CriticalLayer {
    /// Radial distance of the vertical reflection point (km).
    pub radial: Kilometer,
    /// Plasma frequency at that radial (MHz); the layer critical frequency.
    pub critical_frequency: MegaHertz,
}

impl CriticalLayer {
    /// Reflection height above ground, in km.
    pub fn height(&self) -> Kilometer {
        radial_to_height(self.radial)
    }
}

/// E and F2 layer reflection parameters found by the vertical scan.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CriticalLayers {
    /// E-region reflection, when one falls inside the 90-110 km band.
    pub e: Option<CriticalLayer>,
    /// F2-region reflection, when one lies above 200 km.
    pub f2: Option<CriticalLayer>,
}

/// Connected quasi-parabolic representation of one ionosphere profile.
///
/// Segments are stored from the profile top downward; the model is immutable
/// once built and all queries take `&self`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QpModel {
    segments: Segments,
    bottom_radial: Kilometer,
    top_radial: Kilometer,
}

impl QpModel {
    /// Fit a segmented quasi-parabolic model to a density profile.
    ///
    /// Arguments
    /// -----------------
    /// * `profile`: validated height/density profile, bottom-to-top.
    /// * `params`: fit window size and acceptance tolerances.
    ///
    /// Return
    /// ----------
    /// * The fitted model, or a [`SkywaveError`] when the profile cannot
    ///   support even one fit window.
    ///
    /// See also
    /// ------------
    /// * [`QpModel::critical_layers`] – vertical reflection scan on the result.
    /// * [`crate::ray_trace::trace_path`] – oblique path integration.
    pub fn from_profile(
        profile: &DensityProfile,
        params: &QpFitParams,
    ) -> Result<Self, SkywaveError> {
        let (radials, fp, mut fp2) = profile.working_arrays();
        let num_pts = radials.len();
        let max_segments = params.max_segments.max(1);

        // For very long profiles the preferred window would overrun the
        // segment budget; widen it so the walk still spans the profile. The
        // factor of two absorbs windows degraded to two points.
        let mut max_fit = params.max_fit_points.max(2);
        if num_pts / max_segments > max_fit - 2 {
            let forced = (num_pts / max_segments) * 2;
            warn!(
                "widening fit window from {max_fit} to {forced} points to span \
                 {num_pts} profile points in {max_segments} segments"
            );
            max_fit = forced;
        }

        if num_pts < max_fit + 1 {
            return Err(SkywaveError::ProfileTooShort {
                len: num_pts,
                fit_points: max_fit,
            });
        }

        let mut npts_fit = max_fit;
        let mut npts_inc = npts_fit - 1;

        // The topmost profile point seeds the join; the gradient starts flat.
        let mut join_radial = radials[num_pts - 1];
        let mut join_fp2 = fp2[num_pts - 1];
        let mut join_gradient = 0.0;

        let mut segments = Segments::new();
        let mut index = num_pts - npts_fit - 1;

        loop {
            let window = index..index + npts_fit;
            let (cap_a, cap_b, cap_c) = segment::fit_through_join(
                &radials[window.clone()],
                &fp2[window.clone()],
                join_radial,
                join_fp2,
                join_gradient,
            )?;
            let quality = segment::fit_quality(
                cap_a,
                cap_b,
                cap_c,
                &radials[window.clone()],
                &fp[window.clone()],
                &fp2[window],
                params.percent_fp_error,
                params.max_fp_error_mhz,
            );

            if quality != FitQuality::Passed && npts_inc > 1 {
                // Drop the lowest window point and refit against the same
                // join; the window top stays put.
                trace!(
                    "fit window [{index}..{}] {quality:?}, retrying with {} points",
                    index + npts_fit,
                    npts_fit - 1
                );
                index += 1;
                npts_fit -= 1;
                npts_inc -= 1;
                continue;
            }

            let match_point = index + 1;
            let upper_point = match_point + npts_inc;
            if quality != FitQuality::Passed {
                debug!(
                    "accepting minimal window at {:.1} km despite {quality:?}",
                    radials[match_point]
                );
            }

            let fitted = QpSegment {
                cap_a,
                cap_b,
                cap_c,
                radial_lower: radials[match_point],
                radial_upper: radials[upper_point],
                fp_lower: fp[match_point],
                fp_upper: fp[upper_point],
                fit_points: npts_fit,
            };

            // The next fit anchors on the fitted value, not the measurement,
            // so value and gradient both carry across the join.
            join_gradient = fitted.gradient(fitted.radial_lower);
            fp2[match_point] = fitted.plasma_freq_squared(fitted.radial_lower);
            join_radial = fitted.radial_lower;
            join_fp2 = fp2[match_point];

            trace!(
                "segment {}: {:.1}-{:.1} km, {} fit points",
                segments.len(),
                fitted.radial_lower,
                fitted.radial_upper,
                fitted.fit_points
            );
            segments.push(fitted);

            if segments.len() >= max_segments {
                warn!("segment cap of {max_segments} reached before the profile bottom");
                break;
            }

            // Grow the window back toward the preferred size, then clamp it
            // so the final window covers every remaining point.
            npts_fit = (npts_fit + 1).min(max_fit);
            npts_inc = npts_fit - 1;
            if index < npts_fit && index > 0 {
                npts_fit = index + 1;
                npts_inc = index;
            }
            if index < npts_inc {
                break;
            }
            index -= npts_inc;
        }

        let bottom_radial = segments[segments.len() - 1].radial_lower;
        let top_radial = segments[0].radial_upper;
        debug!(
            "fitted {} segments over {:.1}-{:.1} km from {num_pts} profile points",
            segments.len(),
            radial_to_height(bottom_radial),
            radial_to_height(top_radial)
        );

        Ok(QpModel {
            segments,
            bottom_radial,
            top_radial,
        })
    }

    /// Segments from the profile top downward.
    pub fn segments(&self) -> &[QpSegment] {
        &self.segments
    }

    /// Radial of the lowest segment bound, the model bottom (km).
    pub fn bottom_radial(&self) -> Kilometer {
        self.bottom_radial
    }

    /// Radial of the highest segment bound, the model top (km).
    pub fn top_radial(&self) -> Kilometer {
        self.top_radial
    }

    /// Scan for vertical reflections of `frequency` and classify them into
    /// E and F2 layers by radial band.
    ///
    /// Each segment is tested for a reflection radial inside its own bounds;
    /// scanning top-down, the first hit per layer wins. A layer entry of
    /// `None` means `frequency` pierces that region vertically.
    pub fn critical_layers(&self, frequency: MegaHertz) -> CriticalLayers {
        let mut layers = CriticalLayers::default();

        for seg in &self.segments {
            let reflect = seg.reflection_radial(frequency);
            if !seg.contains_radial(reflect) {
                continue;
            }
            let fp2 = seg.plasma_freq_squared(reflect);
            let critical_frequency = if fp2 > 0.0 { fp2.sqrt() } else { 0.0 };
            let layer = CriticalLayer {
                radial: reflect,
                critical_frequency,
            };

            if reflect > MINIMUM_HMF_RADIAL {
                if layers.f2.is_none() {
                    trace!(
                        "F2 reflection at {:.1} km, fo {:.3} MHz",
                        layer.height(),
                        critical_frequency
                    );
                    layers.f2 = Some(layer);
                }
            } else if reflect < MAXIMUM_HME_RADIAL && reflect > MINIMUM_HME_RADIAL {
                if layers.e.is_none() {
                    trace!(
                        "E reflection at {:.1} km, fo {:.3} MHz",
                        layer.height(),
                        critical_frequency
                    );
                    layers.e = Some(layer);
                }
            }

            if layers.e.is_some() && layers.f2.is_some() {
                break;
            }
        }
        layers
    }
}

impl fmt::Display for QpModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Quasi-parabolic model: {} segments spanning {:.1}-{:.1} km",
            self.segments.len(),
            radial_to_height(self.bottom_radial),
            radial_to_height(self.top_radial)
        )?;
        for (idx, seg) in self.segments.iter().enumerate() {
            writeln!(
                f,
                "  [{idx:2}] {:6.1}-{:6.1} km  fp {:6.3}-{:6.3} MHz  {} pts",
                radial_to_height(seg.radial_lower),
                radial_to_height(seg.radial_upper),
                seg.fp_lower,
                seg.fp_upper,
                seg.fit_points
            )?;
        }
        Ok(())
    }
}
