use thiserror::Error;

/// Errors surfaced by model construction, ray tracing and homing.
///
/// Fit-quality rejections during model construction are internal retry signals
/// and never appear here; they drive the window shrink-and-retry loop inside
/// the builder.
#[derive(Error, Debug, PartialEq)]
pub enum SkywaveError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Profile height and value arrays differ in length: {heights} vs {values}")]
    ProfileLengthMismatch { heights: usize, values: usize },

    #[error("Profile of {len} points is too short for a {fit_points}-point fit window")]
    ProfileTooShort { len: usize, fit_points: usize },

    #[error("Profile heights must be strictly ascending (violation at index {0})")]
    ProfileNotAscending(usize),

    #[error("Degenerate least-squares window: every point coincides with the join radial")]
    DegenerateFit,

    #[error("Boundary integral requires a non-negative quadratic value, got {x:.4e} at radial {radial:.1} km")]
    NegativeBoundaryQuadratic { x: f64, radial: f64 },

    #[error("Logarithmic boundary form is undefined for vanishing italic C")]
    DegenerateBoundaryCoefficient,

    #[error("Italic C is zero at the ray apogee")]
    ApogeeCoefficientZero,

    #[error("Requested frequency {frequency:.1} MHz exceeds the path MUF of {muf:.1} MHz")]
    MufFrequencyLimit { frequency: f64, muf: f64 },

    #[error("No propagation: homing range falls inside the skip zone ahead of the leading edge")]
    NoPropagation,

    #[error("Homing bracket exits the ionosphere at its maximum elevation")]
    ExitIonosphere,

    #[error("Homing failed to converge within {traces} ray traces")]
    NoConvergence { traces: usize },

    #[error("Internal invariant violated: {0}")]
    InternalInvariant(&'static str),
}
