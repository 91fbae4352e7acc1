//! # Elevation homing to a ground range
//!
//! Searches for the launch elevation whose one-hop ray lands at a requested
//! ground range, driving [`crate::ray_trace::trace_path`] from a three-point
//! elevation bracket. The bracket opens at the highest elevation the chosen
//! layer geometry can still reflect, then narrows by bisection while probed
//! landing ranges straddle the target; once all three bracket ranges are
//! known and the bracket is tight, a parabolic fit of elevation against
//! range produces the closing candidate.
//!
//! The search ends with a [`HomingResult`] carrying the accepted path and
//! its landing diagnostics, or with the error naming what blocked it: an
//! operating frequency above the path MUF, the bracket escaping through the
//! model top, a target inside the skip zone, or the trace budget running
//! out.
//!
//! ```no_run
//! use skywave::homing::{home_to_range, HomingParams, LayerSelection};
//! use skywave::profile::{DensityProfile, ProfileUnit};
//! use skywave::qp_model::{QpFitParams, QpModel};
//!
//! # fn main() -> Result<(), skywave::skywave_errors::SkywaveError> {
//! let heights: Vec<f64> = (0..55).map(|i| 60.0 + 10.0 * i as f64).collect();
//! # let densities: Vec<f64> = heights.iter().map(|h| 1e11 * (h / 300.0)).collect();
//! let profile = DensityProfile::new(heights, densities, ProfileUnit::ElectronDensityPerM3)?;
//! let model = QpModel::from_profile(&profile, &QpFitParams::default())?;
//!
//! let solution = home_to_range(
//!     &model,
//!     9.5,
//!     model.bottom_radial() - 5.0,
//!     1500.0,
//!     LayerSelection::FLayerOnly,
//!     &HomingParams::default(),
//! )?;
//! println!("{solution}");
//! # Ok(())
//! # }
//! ```

use std::fmt;

use log::{debug, trace, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{Kilometer, MegaHertz, Radian, MAXIMUM_HME_HEIGHT, MEAN_RADIUS_EARTH, RADEG};
use crate::geometry::{
    height_to_radial, max_vertical_height, muf_from_critical, oblique_to_vertical, phi0_angle,
    radial_to_height, theta_angle,
};
use crate::qp_model::QpModel;
use crate::ray_trace::{trace_path, RayPath, TraceStatus};
use crate::skywave_errors::SkywaveError;

mod bracket;
mod parabola;

use bracket::Bracket;
use parabola::parabolic_fit;

/// Elevation step used when probing just below an accepted point (radians).
const TENTH_DEGREE: Radian = 0.1 * RADEG;

/// Bracket spread below which the parabolic fit closes the search (radians).
const FIT_SPREAD_LIMIT: Radian = 4.0 * RADEG;

/// Which ionospheric layers the homing search may reflect from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LayerSelection {
    /// Home on the F2 layer only, guarded by a MUF feasibility check.
    FLayerOnly,
    /// Try the E layer when it can see the target, otherwise fall back to
    /// the F2 layer.
    Auto,
}

/// Layer regime the accepted ray reflected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PropagationRegime {
    ELayer,
    FLayer,
}

/// How the closing elevation was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HomingMethod {
    /// Tolerance hit at the bracket top, refined by a local linear step.
    TwoPoint,
    /// Tolerance hit while bisecting the bracket middle.
    Bisection,
    /// Parabolic fit of elevation against range over the full bracket.
    ParabolicFit,
}

/// Tuning knobs for the homing search.
///
/// The defaults reproduce the tolerances the search was validated with; use
/// [`HomingParams::builder`] to adjust them with range checking.
#[derive(Debug, Clone, PartialEq)]
pub struct HomingParams {
    /// Landing range miss accepted as a solution (km).
    pub tolerance_km: Kilometer,
    /// Ray traces allowed before the search gives up.
    pub max_traces: usize,
}

impl HomingParams {
    /// Create a checked builder initialized with the defaults.
    pub fn builder() -> HomingParamsBuilder {
        HomingParamsBuilder::new()
    }
}

impl Default for HomingParams {
    fn default() -> Self {
        HomingParams {
            tolerance_km: 10.0,
            max_traces: 15,
        }
    }
}

/// Builder for [`HomingParams`], with validation.
#[derive(Debug, Clone)]
pub struct HomingParamsBuilder {
    params: HomingParams,
}

impl Default for HomingParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HomingParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: HomingParams::default(),
        }
    }

    pub fn tolerance_km(mut self, v: Kilometer) -> Self {
        self.params.tolerance_km = v;
        self
    }

    pub fn max_traces(mut self, v: usize) -> Self {
        self.params.max_traces = v;
        self
    }

    pub fn build(self) -> Result<HomingParams, SkywaveError> {
        let p = &self.params;
        if !(p.tolerance_km > 0.0) {
            return Err(SkywaveError::InvalidParameter(
                "tolerance_km must be positive".into(),
            ));
        }
        if p.max_traces == 0 {
            return Err(SkywaveError::InvalidParameter(
                "max_traces must be at least 1".into(),
            ));
        }
        Ok(self.params)
    }
}

/// Accepted homing solution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HomingResult {
    /// Launch elevation of the accepted ray (radians).
    pub elevation: Radian,
    /// Landing range actually achieved (km).
    pub range: Kilometer,
    /// Local slope of elevation against landing range (rad/km); negative on
    /// the low-ray branch.
    pub d_elevation_d_range: f64,
    /// Group path length of the equivalent triangulated hop (km).
    pub group_path: Kilometer,
    /// Ground-range focusing factor about the landing point.
    pub spread_loss: f64,
    /// Ray traces spent by the search.
    pub traces: usize,
    /// Layer the accepted ray reflected from.
    pub regime: PropagationRegime,
    /// How the closing elevation was produced.
    pub method: HomingMethod,
    /// The accepted ray path.
    pub path: RayPath,
}

impl fmt::Display for HomingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Homing {:?} ({:?}, {} traces): elevation {:.2}°, range {:.1} km, \
             group path {:.1} km, spread {:.1}",
            self.regime,
            self.method,
            self.traces,
            self.elevation.to_degrees(),
            self.range,
            self.group_path,
            self.spread_loss
        )
    }
}

/// Highest elevation that can still reflect from a layer seen at
/// `layer_height` over half the target range.
///
/// Feasible only when the operating frequency meets the layer critical
/// frequency under the secant geometry; `None` otherwise. A feasible
/// elevation can still come out negative when the target lies beyond the
/// one-hop horizon of that layer.
fn max_homing_elevation(
    target_range: Kilometer,
    layer_height: Kilometer,
    critical_frequency: MegaHertz,
    frequency: MegaHertz,
) -> Option<Radian> {
    let theta = theta_angle(target_range);
    let phi0 = phi0_angle(theta, layer_height);
    let equivalent_vertical = oblique_to_vertical(phi0, frequency);
    let critical_scaled = oblique_to_vertical(phi0, critical_frequency);
    if equivalent_vertical >= critical_scaled {
        Some(std::f64::consts::FRAC_PI_2 - theta - phi0)
    } else {
        None
    }
}

/// Trace one candidate elevation, charging it against the trace budget.
fn probe(
    model: &QpModel,
    frequency: MegaHertz,
    radial_bottom: Kilometer,
    elevation: Radian,
    traces: &mut usize,
) -> Result<RayPath, SkywaveError> {
    *traces += 1;
    let path = trace_path(model, frequency, elevation, radial_bottom)?;
    trace!(
        "homing probe {}: {:.2}° -> {:?} at {:.1} km",
        *traces,
        elevation.to_degrees(),
        path.status,
        path.range_max
    );
    Ok(path)
}

/// Group path length of a triangulated hop covering `range` on the ground
/// and peaking at `apogee_height`, from the parabolic arc-length closed
/// form.
fn group_path_length(range: Kilometer, apogee_height: Kilometer) -> Kilometer {
    let chord = (range * range + 16.0 * apogee_height * apogee_height).sqrt();
    0.5 * chord
        + range * range / (8.0 * apogee_height) * ((4.0 * apogee_height + chord) / range).ln()
}

/// Ground-range focusing factor about the landing point, from a tenth of a
/// degree of elevation perturbation mapped through the landing slope.
fn spread_loss(range: Kilometer, d_elevation_d_range: f64) -> f64 {
    // The slope is negative on the low-ray branch, so the perturbation
    // opens outward and the product stays positive.
    let delta_range = if d_elevation_d_range != 0.0 {
        -TENTH_DEGREE / d_elevation_d_range
    } else {
        0.0
    };
    let effect_range = MEAN_RADIUS_EARTH
        * ((2.0 * theta_angle(range + delta_range)).sin()
            + (2.0 * theta_angle(range - delta_range)).sin())
        / 2.0;
    delta_range * TENTH_DEGREE * effect_range
}

/// Elevation-over-range slope between the two upper bracket points.
fn two_point_slope(bracket: &Bracket) -> Result<f64, SkywaveError> {
    let (high, mid) = (bracket.high(), bracket.mid());
    let (high_range, mid_range) =
        high.range
            .zip(mid.range)
            .ok_or(SkywaveError::InternalInvariant(
                "slope requested before both bracket ranges were traced",
            ))?;
    Ok((high.elevation - mid.elevation) / (high_range - mid_range))
}

/// Final bookkeeping on an accepted path: landing slope diagnostics, the
/// group path, and a warning when the landing still misses the target.
fn close_out(
    path: RayPath,
    target_range: Kilometer,
    d_elevation_d_range: f64,
    traces: usize,
    regime: PropagationRegime,
    method: HomingMethod,
    params: &HomingParams,
) -> Result<HomingResult, SkywaveError> {
    let apogee = path.apogee.ok_or(SkywaveError::InternalInvariant(
        "homing accepted a path without an apogee",
    ))?;
    let group_path = group_path_length(path.range_max, apogee.height);
    let spread_loss = spread_loss(path.range_max, d_elevation_d_range);

    let miss = (target_range - path.range_max).abs();
    if miss > params.tolerance_km {
        warn!("homing closed {miss:.1} km off a {target_range:.1} km target");
    }
    debug!(
        "homing {method:?} in {traces} traces: {:.2}° lands {:.1} km for {target_range:.1} km",
        path.elevation.to_degrees(),
        path.range_max
    );

    Ok(HomingResult {
        elevation: path.elevation,
        range: path.range_max,
        d_elevation_d_range,
        group_path,
        spread_loss,
        traces,
        regime,
        method,
        path,
    })
}

/// Refine a tolerance hit at the bracket top with a local linear step.
///
/// When the middle range is already known the slope comes straight from the
/// bracket. Otherwise one probe just below the top supplies it, and when the
/// first refinement still lands outside tolerance a second, interpolated
/// probe replaces the accepted path.
#[allow(clippy::too_many_arguments)]
fn finalize_interpolated(
    model: &QpModel,
    frequency: MegaHertz,
    radial_bottom: Kilometer,
    target_range: Kilometer,
    bracket: &Bracket,
    first_path: RayPath,
    traces: &mut usize,
    regime: PropagationRegime,
    params: &HomingParams,
) -> Result<HomingResult, SkywaveError> {
    let high = bracket.high();
    let high_range = high.range.ok_or(SkywaveError::InternalInvariant(
        "tolerance hit accepted before the top range was traced",
    ))?;

    if let Some(mid_range) = bracket.mid().range {
        let d = (high.elevation - bracket.mid().elevation) / (high_range - mid_range);
        return close_out(
            first_path,
            target_range,
            d,
            *traces,
            regime,
            HomingMethod::TwoPoint,
            params,
        );
    }

    let mut mid_elevation = high.elevation - TENTH_DEGREE;
    let second = probe(model, frequency, radial_bottom, mid_elevation, traces)?;
    if second.status == TraceStatus::ExitIonosphere {
        return Err(SkywaveError::InternalInvariant(
            "refinement probe escaped just below an accepted elevation",
        ));
    }
    let mut mid_range = second.range_max;
    let slope = (high.elevation - mid_elevation) / (high_range - mid_range);

    let final_path = if (target_range - second.range_max).abs() > params.tolerance_km {
        let elev_test = mid_elevation + slope * (target_range - mid_range);
        let third = probe(model, frequency, radial_bottom, elev_test, traces)?;
        if third.status == TraceStatus::ExitIonosphere {
            return Err(SkywaveError::InternalInvariant(
                "refinement probe escaped just below an accepted elevation",
            ));
        }
        mid_range = third.range_max;
        mid_elevation = elev_test;
        third
    } else {
        second
    };

    let d = (high.elevation - mid_elevation) / (high_range - mid_range);
    close_out(
        final_path,
        target_range,
        d,
        *traces,
        regime,
        HomingMethod::TwoPoint,
        params,
    )
}

/// Which bracket point the next iteration must trace.
#[derive(Debug, Clone, Copy)]
enum SearchStep {
    LoadHigh,
    LoadMiddle,
}

/// Search for the launch elevation landing a one-hop ray at `target_range`.
///
/// The starting elevation comes from the secant geometry of the selected
/// layer, inflated so the first probe overshoots in elevation and the walk
/// works downward. Probes that reflect from the wrong layer move the bracket
/// without being recorded; recorded probes narrow it until a landing falls
/// within tolerance or the parabolic fit closes the search.
///
/// Arguments
/// -----------------
/// * `model`: fitted quasi-parabolic model.
/// * `frequency`: operating frequency (MHz).
/// * `radial_bottom`: radial where free space ends and ray integration
///   starts (km).
/// * `target_range`: one-hop ground range to land at (km).
/// * `layers`: layer regimes the search may reflect from.
/// * `params`: landing tolerance and trace budget.
///
/// Return
/// ----------
/// * The accepted [`HomingResult`], or the [`SkywaveError`] naming the
///   blocking condition: [`SkywaveError::MufFrequencyLimit`],
///   [`SkywaveError::ExitIonosphere`], [`SkywaveError::NoPropagation`] or
///   [`SkywaveError::NoConvergence`].
///
/// See also
/// ------------
/// * [`crate::ray_trace::trace_path`] – the probe underneath every step.
/// * [`QpModel::critical_layers`] – layer scan feeding the start elevation.
pub fn home_to_range(
    model: &QpModel,
    frequency: MegaHertz,
    radial_bottom: Kilometer,
    target_range: Kilometer,
    layers: LayerSelection,
    params: &HomingParams,
) -> Result<HomingResult, SkywaveError> {
    let horizon_radial = height_to_radial(max_vertical_height(target_range));
    let critical = model.critical_layers(frequency);
    debug!(
        "homing {frequency:.1} MHz to {target_range:.1} km: hme {:?}, hmf2 {:?}, horizon {:.1} km",
        critical.e.map(|l| l.height()),
        critical.f2.map(|l| l.height()),
        radial_to_height(horizon_radial)
    );

    let (regime, elev_feasible) = match layers {
        LayerSelection::FLayerOnly => {
            let Some(f2) = critical.f2 else {
                warn!("homing blocked: {frequency:.1} MHz has no F2 reflection in the model");
                return Err(SkywaveError::MufFrequencyLimit {
                    frequency,
                    muf: 0.0,
                });
            };
            let feasible =
                max_homing_elevation(target_range, f2.height(), f2.critical_frequency, frequency);
            let muf = feasible
                .map(|elev| muf_from_critical(f2.critical_frequency, elev))
                .unwrap_or(0.0);
            if muf < frequency {
                warn!(
                    "homing blocked below the MUF: {frequency:.1} MHz against {muf:.1} MHz \
                     for {target_range:.1} km"
                );
                return Err(SkywaveError::MufFrequencyLimit { frequency, muf });
            }
            (PropagationRegime::FLayer, feasible)
        }
        LayerSelection::Auto => {
            let e_attempt = critical
                .e
                .filter(|e| e.radial >= horizon_radial)
                .and_then(|e| {
                    max_homing_elevation(
                        target_range,
                        e.height(),
                        e.critical_frequency,
                        frequency,
                    )
                    .filter(|elev| *elev >= 0.0)
                });
            match e_attempt {
                Some(elev) => (PropagationRegime::ELayer, Some(elev)),
                None => {
                    let f2 = critical.f2.ok_or(SkywaveError::NoPropagation)?;
                    debug!("E layer cannot see {target_range:.1} km, homing on the F layer");
                    let feasible = max_homing_elevation(
                        target_range,
                        f2.height(),
                        f2.critical_frequency,
                        frequency,
                    );
                    (PropagationRegime::FLayer, feasible)
                }
            }
        }
    };

    // Inflate the geometric estimate so the first probe overshoots in
    // elevation; shallow starts get a larger factor since small absolute
    // changes swing their range farther.
    let elev_start = match elev_feasible {
        Some(elev) if elev > 0.0 => {
            if elev < 10.0 * RADEG {
                elev * 1.5
            } else {
                elev * 1.05
            }
        }
        _ => {
            warn!(
                "no usable start elevation for {frequency:.1} MHz at {target_range:.1} km, \
                 forcing 2°"
            );
            2.0 * RADEG
        }
    };
    trace!("homing starts at {:.2}° as {regime:?}", elev_start.to_degrees());

    let mut bracket = Bracket::new(elev_start);
    let mut step = SearchStep::LoadHigh;
    let mut traces = 0usize;

    loop {
        match step {
            SearchStep::LoadHigh => {
                let path = probe(
                    model,
                    frequency,
                    radial_bottom,
                    bracket.high().elevation,
                    &mut traces,
                )?;
                if path.status == TraceStatus::ExitIonosphere {
                    bracket.recenter_after_exit();
                    if elev_start < bracket.high().elevation {
                        warn!(
                            "homing bracket escaped above its {:.2}° start",
                            elev_start.to_degrees()
                        );
                        return Err(SkywaveError::ExitIonosphere);
                    }
                } else {
                    match regime {
                        PropagationRegime::FLayer => {
                            if path.apogee_height().unwrap_or(0.0) < MAXIMUM_HME_HEIGHT {
                                debug!("F-layer search reflected from the E region, widening");
                                bracket.widen_high();
                            } else {
                                bracket.record_high(path.range_max);
                                if let Some(low_range) = bracket.low().range {
                                    if bracket.high().elevation > bracket.low().elevation
                                        && path.range_max > low_range
                                    {
                                        warn!(
                                            "target {target_range:.1} km sits ahead of the \
                                             {low_range:.1} km leading edge"
                                        );
                                        return Err(SkywaveError::NoPropagation);
                                    }
                                }
                                if (target_range - path.range_max).abs() < params.tolerance_km {
                                    return finalize_interpolated(
                                        model,
                                        frequency,
                                        radial_bottom,
                                        target_range,
                                        &bracket,
                                        path,
                                        &mut traces,
                                        regime,
                                        params,
                                    );
                                }
                                step = SearchStep::LoadMiddle;
                            }
                        }
                        PropagationRegime::ELayer => {
                            if path.apogee_height().unwrap_or(0.0) > MAXIMUM_HME_HEIGHT {
                                debug!("E-layer search jumped to the F layer, lowering the top");
                                bracket.lower_high_by_quarter();
                            } else {
                                bracket.record_high(path.range_max);
                                if (target_range - path.range_max).abs() < params.tolerance_km {
                                    return finalize_interpolated(
                                        model,
                                        frequency,
                                        radial_bottom,
                                        target_range,
                                        &bracket,
                                        path,
                                        &mut traces,
                                        regime,
                                        params,
                                    );
                                }
                                step = SearchStep::LoadMiddle;
                            }
                        }
                    }
                }
            }
            SearchStep::LoadMiddle => {
                if bracket.high().range.is_some_and(|r| r > target_range) {
                    // The top still overshoots the target range, so the
                    // whole bracket shifts upward before bisection resumes.
                    trace!("top range beyond the target, raising the bracket");
                    bracket.raise_high_by_tenth();
                    step = SearchStep::LoadHigh;
                } else {
                    let path = probe(
                        model,
                        frequency,
                        radial_bottom,
                        bracket.mid().elevation,
                        &mut traces,
                    )?;
                    if path.status == TraceStatus::ExitIonosphere {
                        return Err(SkywaveError::InternalInvariant(
                            "bracket middle escaped below a non-escaping top elevation",
                        ));
                    }
                    if (path.range_max - target_range).abs() <= params.tolerance_km {
                        bracket.record_mid(path.range_max);
                        let d = two_point_slope(&bracket)?;
                        return close_out(
                            path,
                            target_range,
                            d,
                            traces,
                            regime,
                            HomingMethod::Bisection,
                            params,
                        );
                    }
                    if path.apogee_height().unwrap_or(0.0) > MAXIMUM_HME_HEIGHT {
                        if path.range_max < target_range {
                            bracket.record_mid(path.range_max);
                            bracket.promote_mid_to_high();
                        } else {
                            bracket.record_mid(path.range_max);
                            bracket.demote_mid_to_low();
                            bracket.clear_mid();
                        }
                    } else {
                        debug!("middle probe reflected from the E region, nudging the bottom up");
                        bracket.nudge_low_for_e_layer();
                    }

                    // The shifted middle is traced immediately so the fit
                    // check below sees a fresh range.
                    let second = probe(
                        model,
                        frequency,
                        radial_bottom,
                        bracket.mid().elevation,
                        &mut traces,
                    )?;
                    if second.status == TraceStatus::ExitIonosphere {
                        return Err(SkywaveError::InternalInvariant(
                            "bracket middle escaped below a non-escaping top elevation",
                        ));
                    }
                    if second.apogee_height().unwrap_or(0.0) > MAXIMUM_HME_HEIGHT {
                        bracket.record_mid(second.range_max);
                    } else {
                        debug!(
                            "middle probe landed in the E regime at {:.1} km, dropping it",
                            second.range_max
                        );
                        bracket.clear_mid();
                    }
                }
            }
        }

        if traces > params.max_traces {
            warn!(
                "homing spent {traces} traces without landing within {:.1} km of \
                 {target_range:.1} km",
                params.tolerance_km
            );
            return Err(SkywaveError::NoConvergence { traces });
        }

        let (high, mid, low) = (bracket.high(), bracket.mid(), bracket.low());
        if let (Some(high_range), Some(mid_range), Some(low_range)) =
            (high.range, mid.range, low.range)
        {
            if bracket.spread() < FIT_SPREAD_LIMIT {
                let (c0, c1, c2) = parabolic_fit(
                    &[high_range, mid_range, low_range],
                    &[high.elevation, mid.elevation, low.elevation],
                )
                .ok_or(SkywaveError::InternalInvariant(
                    "singular parabolic fit over the homing bracket",
                ))?;
                let elev_test = c2 * target_range * target_range + c1 * target_range + c0;
                let fitted = probe(model, frequency, radial_bottom, elev_test, &mut traces)?;
                if fitted.status == TraceStatus::ExitIonosphere {
                    return Err(SkywaveError::InternalInvariant(
                        "fitted elevation escaped inside a reflecting bracket",
                    ));
                }
                let d = 2.0 * c2 * target_range + c1;
                return close_out(
                    fitted,
                    target_range,
                    d,
                    traces,
                    regime,
                    HomingMethod::ParabolicFit,
                    params,
                );
            }

            // Too wide to fit: fold the bracket around the middle and trace
            // a fresh midpoint next.
            if mid_range < target_range {
                bracket.promote_mid_to_high();
            } else {
                bracket.demote_mid_to_low();
            }
            bracket.clear_mid();
            step = SearchStep::LoadMiddle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn max_elevation_requires_the_frequency_to_reach_critical() {
        // 8 MHz against a 4 MHz layer clears the secant threshold; the
        // reverse cannot reflect at the homing geometry.
        let feasible = max_homing_elevation(1000.0, 250.0, 4.0, 8.0).expect("feasible");
        assert!(feasible > 0.0 && feasible < std::f64::consts::FRAC_PI_2);
        assert_eq!(max_homing_elevation(1000.0, 250.0, 8.0, 4.0), None);
    }

    #[test]
    fn max_elevation_goes_negative_beyond_the_one_hop_horizon() {
        let elev = max_homing_elevation(6000.0, 100.0, 1.0, 30.0).expect("feasible");
        assert!(elev < 0.0);
    }

    #[test]
    fn group_path_exceeds_the_ground_range() {
        let group = group_path_length(1000.0, 250.0);
        assert!(group > 1000.0);
        assert!(group < 2000.0);
    }

    #[test]
    fn group_path_flattens_to_the_ground_range_for_a_low_apogee() {
        assert_relative_eq!(group_path_length(1000.0, 1.0), 1000.0, max_relative = 1e-4);
    }

    #[test]
    fn spread_factor_is_positive_on_the_low_ray_branch() {
        let loss = spread_loss(1000.0, -2e-4);
        assert!(loss > 0.0);
        assert_eq!(spread_loss(1000.0, 0.0), 0.0);
    }

    #[test]
    fn builder_rejects_degenerate_knobs() {
        let err = HomingParams::builder().max_traces(0).build().unwrap_err();
        assert!(matches!(err, SkywaveError::InvalidParameter(_)));
        let err = HomingParams::builder()
            .tolerance_km(0.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, SkywaveError::InvalidParameter(_)));
    }
}
