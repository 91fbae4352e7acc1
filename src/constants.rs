//! # Constants and type definitions for skywave
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `skywave` library.
//!
//! ## Overview
//!
//! - Geophysical constants for the spherical-Earth propagation geometry
//! - Plasma frequency ↔ electron density conversion factors
//! - Ionospheric layer radial bands used for E/F2 classification
//! - Core type aliases used across the crate
//! - Bounded container types for segments and traced path points
//!
//! These definitions are used by all main modules, including the quasi-parabolic model
//! builder, the path tracer and the homing search.

use smallvec::SmallVec;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Mean Earth radius in kilometers (spherical propagation geometry)
pub const MEAN_RADIUS_EARTH: f64 = 6370.0;

/// Hz → MHz
pub const HZ_TO_MHZ: f64 = 1.0e-6;

/// Electron density (m⁻³) → plasma frequency (Hz): fp = 8.978659167 · √Ne
pub const NE_M3_TO_PLASMA_FREQUENCY: f64 = 8.978659167;

/// Plasma frequency (MHz) → electron density (m⁻³): Ne = 1.24e10 · fp²
pub const PLASMA_FREQUENCY_TO_NE: f64 = 1.24e10;

/// Fraction of the MUF taken as the optimum working frequency
pub const OPTIMUM_WORK_FREQ_PERCENT: f64 = 0.85;

// -------------------------------------------------------------------------------------------------
// Ionospheric layer bands
// -------------------------------------------------------------------------------------------------

/// Lowest height regarded as an F-layer reflection, in km
pub const MINIMUM_HMF_HEIGHT: f64 = 200.0;

/// Radial equivalent of [`MINIMUM_HMF_HEIGHT`] (200 km height)
pub const MINIMUM_HMF_RADIAL: f64 = 6570.0;

/// Radial below which an apex is no longer an E-layer reflection (90 km height)
pub const MINIMUM_HME_RADIAL: f64 = 6460.0;

/// Highest height regarded as an E-layer reflection, in km
pub const MAXIMUM_HME_HEIGHT: f64 = 110.0;

/// Radial equivalent of [`MAXIMUM_HME_HEIGHT`] (110 km height)
pub const MAXIMUM_HME_RADIAL: f64 = 6480.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Frequency in megahertz
pub type MegaHertz = f64;
/// Electron density in electrons per cubic meter
pub type PerCubicMeter = f64;

// -------------------------------------------------------------------------------------------------
// Data containers
// -------------------------------------------------------------------------------------------------

/// Bounded list of quasi-parabolic segments, ordered from the profile top downward.
///
/// Inline capacity covers the common case of a smooth profile; the builder caps
/// the total count at [`crate::qp_model::QpFitParams::max_segments`].
pub type Segments = SmallVec<[crate::qp_model::QpSegment; 24]>;

/// Bounded list of traced path points for one ray.
///
/// A trace emits at most two points per segment plus the entry, apogee and
/// ground points, so the inline capacity absorbs typical profiles.
pub type PathPoints = SmallVec<[crate::ray_trace::PathPoint; 32]>;
