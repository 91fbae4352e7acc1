//! Two-dimensional path assembly: up leg, turnover, down leg.

use std::fmt;

use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{Kilometer, MegaHertz, PathPoints, Radian, MEAN_RADIUS_EARTH};
use crate::geometry::{beta_to_range, gamma_angle, height_to_radial, radial_to_height};
use crate::qp_model::QpModel;
use crate::skywave_errors::SkywaveError;

use super::boundary::{segment_integral, Crossing};
use super::coefficients::RayCoeffs;

/// One sample along a traced ray.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathPoint {
    /// Ground range from the transmitter (km).
    pub range: Kilometer,
    /// Height above ground (km).
    pub height: Kilometer,
}

/// Turnover point of a reflected ray.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Apogee {
    /// Ground range of the turnover (km).
    pub range: Kilometer,
    /// Height of the turnover above ground (km).
    pub height: Kilometer,
}

/// Outcome of a ray trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TraceStatus {
    /// The ray turned over inside the model and returned to the ground.
    ApogeeDetected,
    /// The ray pierced the topmost segment and left the ionosphere.
    ExitIonosphere,
}

/// A fully traced two-dimensional ray path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RayPath {
    /// Operating frequency (MHz).
    pub frequency: MegaHertz,
    /// Launch elevation (radians).
    pub elevation: Radian,
    /// Local ray angle at the ionosphere entry radial (radians).
    pub gamma: Radian,
    /// Radial where the ray enters the ionosphere (km).
    pub radial_bottom: Kilometer,
    /// Free-space ground range from the transmitter to the entry (km).
    pub range_bottom: Kilometer,
    /// Sampled points from launch to landing (or to the exit segment top).
    pub points: PathPoints,
    /// Turnover point, absent when the ray escapes.
    pub apogee: Option<Apogee>,
    /// Ground range of the last sample (km); the landing range for a
    /// reflected ray.
    pub range_max: Kilometer,
    /// Reflected or escaped.
    pub status: TraceStatus,
}

impl RayPath {
    /// Height of the turnover, when one exists (km).
    pub fn apogee_height(&self) -> Option<Kilometer> {
        self.apogee.map(|a| a.height)
    }
}

impl fmt::Display for RayPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.apogee {
            Some(apogee) => writeln!(
                f,
                "Ray {:.1} MHz at {:.2}°: range {:.1} km, apogee {:.1} km at {:.1} km",
                self.frequency,
                self.elevation.to_degrees(),
                self.range_max,
                apogee.height,
                apogee.range
            )?,
            None => writeln!(
                f,
                "Ray {:.1} MHz at {:.2}°: escaped after {:.1} km",
                self.frequency,
                self.elevation.to_degrees(),
                self.range_max
            )?,
        }
        for point in &self.points {
            writeln!(f, "  range {:7.1} km  height {:6.1} km", point.range, point.height)?;
        }
        Ok(())
    }
}

/// Ground range accumulated inside the ionosphere for a given boundary
/// integral total, referenced to the entry radial and ray angle.
fn ground_range(gamma: Radian, radial_base: Kilometer, integral: f64) -> Kilometer {
    MEAN_RADIUS_EARTH * radial_base * gamma.cos() * integral
}

/// Trace one ray through the model and back to the ground.
///
/// The up leg walks segments bottom-up, accumulating boundary integrals and
/// emitting one point per segment top, until the ray either turns over or
/// pierces the topmost segment. A turnover switches to the down leg, which
/// walks back down emitting one point per segment bottom and closes with the
/// free-space hop to the ground. Every range is measured along the ground
/// from the transmitter.
///
/// Arguments
/// -----------------
/// * `model`: fitted quasi-parabolic model.
/// * `frequency`: operating frequency (MHz).
/// * `elevation`: launch elevation (radians).
/// * `radial_bottom`: radial where free space ends and the walk starts (km);
///   must not sit above the model top.
///
/// Return
/// ----------
/// * The traced [`RayPath`], or a [`SkywaveError`] from a boundary form
///   evaluated outside its domain.
///
/// See also
/// ------------
/// * [`crate::homing::home_to_range`] – elevation search built on this.
pub fn trace_path(
    model: &QpModel,
    frequency: MegaHertz,
    elevation: Radian,
    radial_bottom: Kilometer,
) -> Result<RayPath, SkywaveError> {
    if radial_bottom > model.top_radial() {
        return Err(SkywaveError::InvalidParameter(
            "ray bottom radial sits above the model top".into(),
        ));
    }

    let gamma = gamma_angle(elevation, radial_bottom);
    let range_bottom = beta_to_range(elevation, radial_bottom);
    let segments = model.segments();

    let mut points = PathPoints::new();
    points.push(PathPoint {
        range: 0.0,
        height: 0.0,
    });

    let mut total_integral = 0.0;
    let mut ray_radial = radial_bottom;
    let mut apogee = None;
    let mut down_leg_start = None;

    // Up leg: bottom segment to top.
    for (index, seg) in segments.iter().enumerate().rev() {
        if seg.radial_upper < ray_radial {
            continue;
        }

        let coeffs = RayCoeffs::from_segment(seg, frequency, elevation);
        let turn_radial = coeffs.apogee_radial(seg);
        let crossing = if turn_radial.is_some() {
            Crossing::Apogee
        } else {
            Crossing::Single
        };

        let integral = segment_integral(
            &coeffs,
            seg.radial_lower,
            seg.radial_upper,
            ray_radial,
            crossing,
        )?;
        total_integral += integral.upper - integral.lower;
        let range_iono = ground_range(gamma, radial_bottom, total_integral);

        if let Some(turn) = turn_radial {
            // Turnover: place the apogee midway between the entry into this
            // segment and the exit from it, then seed the down leg.
            let entry_range = points[points.len() - 1].range;
            let exit_range = range_iono + range_bottom;
            let turn_point = Apogee {
                range: (entry_range + exit_range) / 2.0,
                height: radial_to_height(turn),
            };
            trace!(
                "apogee at {:.1} km height, {:.1} km range (segment {index})",
                turn_point.height,
                turn_point.range
            );
            points.push(PathPoint {
                range: turn_point.range,
                height: turn_point.height,
            });
            points.push(PathPoint {
                range: exit_range,
                height: radial_to_height(seg.radial_lower),
            });
            apogee = Some(turn_point);
            down_leg_start = Some(seg.radial_lower);
            break;
        }

        points.push(PathPoint {
            range: range_iono + range_bottom,
            height: radial_to_height(seg.radial_upper),
        });
        ray_radial = seg.radial_upper;
    }

    let status = if let Some(start) = down_leg_start {
        // Down leg: back down from the turnover segment, one point per
        // segment bottom.
        let mut ray_radial = start;
        for seg in segments {
            if seg.radial_upper > ray_radial {
                continue;
            }
            ray_radial = seg.radial_lower;

            let coeffs = RayCoeffs::from_segment(seg, frequency, elevation);
            let integral = segment_integral(
                &coeffs,
                seg.radial_lower,
                seg.radial_upper,
                ray_radial,
                Crossing::Single,
            )?;
            total_integral += integral.upper - integral.lower;
            let range_iono = ground_range(gamma, radial_bottom, total_integral);

            points.push(PathPoint {
                range: range_iono + range_bottom,
                height: radial_to_height(seg.radial_lower),
            });
        }

        // Free-space hop from the ionosphere bottom back to the ground.
        let last = points[points.len() - 1];
        points.push(PathPoint {
            range: last.range + beta_to_range(elevation, height_to_radial(last.height)),
            height: 0.0,
        });
        TraceStatus::ApogeeDetected
    } else {
        TraceStatus::ExitIonosphere
    };

    let range_max = points[points.len() - 1].range;
    debug!(
        "trace {frequency:.1} MHz at {:.2}°: {status:?}, range {range_max:.1} km, {} points",
        elevation.to_degrees(),
        points.len()
    );

    Ok(RayPath {
        frequency,
        elevation,
        gamma,
        radial_bottom,
        range_bottom,
        points,
        apogee,
        range_max,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{DensityProfile, ProfileUnit};
    use crate::qp_model::QpFitParams;
    use approx::assert_relative_eq;

    /// Single-hump F-layer profile peaking near 300 km with fo about 7 MHz.
    fn f_layer_model() -> QpModel {
        let heights: Vec<f64> = (0..41).map(|i| 120.0 + 10.0 * i as f64).collect();
        let values: Vec<f64> = heights
            .iter()
            .map(|&h| 0.5 + 6.5 * (-((h - 300.0) / 80.0).powi(2)).exp())
            .collect();
        let profile =
            DensityProfile::new(heights, values, ProfileUnit::PlasmaFrequencyMhz).unwrap();
        QpModel::from_profile(&profile, &QpFitParams::default()).unwrap()
    }

    #[test]
    fn oblique_ray_reflects_and_returns() {
        let model = f_layer_model();
        let bottom = model.bottom_radial() - 5.0;
        let path = trace_path(&model, 5.0, 20.0_f64.to_radians(), bottom).expect("trace");

        assert_eq!(path.status, TraceStatus::ApogeeDetected);
        let apogee = path.apogee.expect("reflected ray has an apogee");
        assert!(apogee.height > 150.0 && apogee.height < 320.0);
        assert!(path.range_max > 0.0);

        // Path starts and ends on the ground.
        assert_eq!(path.points[0].height, 0.0);
        assert_eq!(path.points[path.points.len() - 1].height, 0.0);
        assert_relative_eq!(path.points[path.points.len() - 1].range, path.range_max);

        // Ranges grow monotonically along the walk.
        for pair in path.points.windows(2) {
            assert!(
                pair[1].range >= pair[0].range,
                "range must not regress: {} then {}",
                pair[0].range,
                pair[1].range
            );
        }
    }

    #[test]
    fn path_rises_then_falls_around_the_apogee() {
        let model = f_layer_model();
        let bottom = model.bottom_radial() - 5.0;
        let path = trace_path(&model, 5.0, 20.0_f64.to_radians(), bottom).expect("trace");
        let apogee = path.apogee.expect("reflected");

        let apogee_index = path
            .points
            .iter()
            .position(|p| p.height == apogee.height)
            .expect("apogee point recorded");
        for pair in path.points[..apogee_index + 1].windows(2) {
            assert!(pair[1].height >= pair[0].height);
        }
        for pair in path.points[apogee_index..].windows(2) {
            assert!(pair[1].height <= pair[0].height);
        }
    }

    #[test]
    fn high_frequency_escapes_through_the_top() {
        let model = f_layer_model();
        let bottom = model.bottom_radial() - 5.0;
        let path = trace_path(&model, 28.0, 60.0_f64.to_radians(), bottom).expect("trace");

        assert_eq!(path.status, TraceStatus::ExitIonosphere);
        assert_eq!(path.apogee, None);
        // The last sample is the top of the model, not the ground.
        let top_height = radial_to_height(model.top_radial());
        assert_relative_eq!(
            path.points[path.points.len() - 1].height,
            top_height,
            max_relative = 1e-12
        );
    }

    #[test]
    fn lower_elevation_reaches_farther() {
        // In the single-layer F regime below the MUF, shallow rays land
        // farther out than steep ones.
        let model = f_layer_model();
        let bottom = model.bottom_radial() - 5.0;
        let shallow = trace_path(&model, 5.0, 15.0_f64.to_radians(), bottom).expect("trace");
        let steep = trace_path(&model, 5.0, 35.0_f64.to_radians(), bottom).expect("trace");

        assert_eq!(shallow.status, TraceStatus::ApogeeDetected);
        assert_eq!(steep.status, TraceStatus::ApogeeDetected);
        assert!(shallow.range_max > steep.range_max);
    }

    #[test]
    fn start_above_model_top_is_rejected() {
        let model = f_layer_model();
        let err = trace_path(&model, 5.0, 0.3, model.top_radial() + 1.0).unwrap_err();
        assert!(matches!(err, SkywaveError::InvalidParameter(_)));
    }
}
