//! # Spherical propagation geometry and frequency conversions
//!
//! Stateless helpers shared by the model builder, the path tracer and the
//! homing search: height ↔ radial conversions on a spherical Earth, the ray
//! entry angles used by the analytic trace (θ, φ0, γ in the Norman & Cannon
//! notation), and plasma frequency ↔ electron density relations.
//!
//! All angles are radians, distances kilometers and frequencies MHz unless a
//! name says otherwise.

use crate::constants::{
    Kilometer, MegaHertz, PerCubicMeter, Radian, HZ_TO_MHZ, MEAN_RADIUS_EARTH,
    NE_M3_TO_PLASMA_FREQUENCY, OPTIMUM_WORK_FREQ_PERCENT, PLASMA_FREQUENCY_TO_NE,
};

/// Height above ground → radial distance from the Earth center.
#[inline]
pub fn height_to_radial(height: Kilometer) -> Kilometer {
    MEAN_RADIUS_EARTH + height
}

/// Radial distance from the Earth center → height above ground.
///
/// A zero radial is passed through as zero so cleared fields stay inert.
#[inline]
pub fn radial_to_height(radial: Kilometer) -> Kilometer {
    if radial != 0.0 {
        radial - MEAN_RADIUS_EARTH
    } else {
        0.0
    }
}

/// Electron density (m⁻³) → plasma frequency in Hz.
///
/// Non-positive densities (fill values in measured profiles) map to 0 Hz.
#[inline]
pub fn ne_to_plasma_frequency_hz(density: PerCubicMeter) -> f64 {
    if density > 0.0 {
        NE_M3_TO_PLASMA_FREQUENCY * density.sqrt()
    } else {
        0.0
    }
}

/// Electron density (m⁻³) → plasma frequency in MHz.
#[inline]
pub fn ne_to_plasma_frequency(density: PerCubicMeter) -> MegaHertz {
    ne_to_plasma_frequency_hz(density) * HZ_TO_MHZ
}

/// Plasma frequency (MHz) → electron density in m⁻³.
#[inline]
pub fn plasma_frequency_to_ne(plasma_freq: MegaHertz) -> PerCubicMeter {
    PLASMA_FREQUENCY_TO_NE * plasma_freq * plasma_freq
}

/// Maximum usable frequency for a layer critical frequency seen at `elevation`.
///
/// Returns 0 when the geometry is degenerate (non-positive critical frequency
/// or sin(elevation) ≤ 0).
pub fn muf_from_critical(critical_freq: MegaHertz, elevation: Radian) -> MegaHertz {
    let sin_elev = elevation.sin();
    if sin_elev > 0.0 && critical_freq > 0.0 {
        critical_freq / sin_elev
    } else {
        0.0
    }
}

/// Elevation at which `freq_muf` becomes the MUF for the given critical frequency.
pub fn elevation_for_muf(freq_muf: MegaHertz, critical_freq: MegaHertz) -> Radian {
    if freq_muf > 0.0 {
        (critical_freq / freq_muf).asin()
    } else {
        0.0
    }
}

/// Optimum working frequency, the classic 85% of the MUF.
#[inline]
pub fn optimum_working_frequency(freq_muf: MegaHertz) -> MegaHertz {
    OPTIMUM_WORK_FREQ_PERCENT * freq_muf
}

/// Oblique operating frequency → equivalent vertical-incidence frequency,
/// the secant law with `phi0` measured from the reflection-point vertical.
#[inline]
pub fn oblique_to_vertical(phi0: Radian, freq_oblique: MegaHertz) -> MegaHertz {
    freq_oblique * phi0.cos()
}

/// Half-range angle at the Earth center for a ground distance.
#[inline]
pub fn theta_angle(range: Kilometer) -> Radian {
    range / (2.0 * MEAN_RADIUS_EARTH)
}

/// Complement of the ray entry angle (φ0 in the secant-law construction) for a
/// reflection at `height` over half-range angle `theta`.
pub fn phi0_angle(theta: Radian, height: Kilometer) -> Radian {
    let tan_phi0 = theta.sin() / (1.0 + height / MEAN_RADIUS_EARTH - theta.cos());
    tan_phi0.atan()
}

/// Angle between the local horizontal and the ray at radial `radial`, for a
/// launch elevation `elevation` at the ground.
///
/// The cosine argument falling outside [0, 1] (ray cannot reach that radial)
/// collapses the angle to 0.
pub fn gamma_angle(elevation: Radian, radial: Kilometer) -> Radian {
    let arc = MEAN_RADIUS_EARTH * elevation.cos() / radial;
    if (0.0..=1.0).contains(&arc) {
        arc.acos()
    } else {
        0.0
    }
}

/// Ground range covered by the free-space leg from the ground up to `radial`
/// when launched at ray angle `beta`.
pub fn beta_to_range(beta: Radian, radial: Kilometer) -> Kilometer {
    let gamma = gamma_angle(beta, radial);
    if gamma >= beta {
        (gamma - beta) * MEAN_RADIUS_EARTH
    } else {
        0.0
    }
}

/// Launch elevation that reflects at `height` and lands at ground `range`,
/// from the mirror-reflection triangle.
pub fn range_height_to_elevation(range: Kilometer, height: Kilometer) -> Radian {
    let theta = theta_angle(range);
    let phi0 = phi0_angle(theta, height);
    std::f64::consts::FRAC_PI_2 - theta - phi0
}

/// Highest reflection height reachable at zero elevation for a ground range.
pub fn max_vertical_height(range: Kilometer) -> Kilometer {
    radial_to_height(MEAN_RADIUS_EARTH / theta_angle(range).cos())
}
