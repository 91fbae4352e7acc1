pub mod constants;
pub mod geometry;
pub mod homing;
pub mod profile;
pub mod qp_model;
pub mod ray_trace;
pub mod skywave_errors;
