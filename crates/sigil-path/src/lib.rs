//! Sigil Path Sampler
//!
//! Turns a `ctx.*` drawing script into a fixed-size point cloud.
//!
//! Pipeline:
//! - [`parse`]: drawing script to ordered [`Segment`] list
//! - [`sample`]: arc-length weighted samples along the segments
//! - [`center_and_scale`]: bounding-box centering into output space
//! - [`generate_points`]: all of the above, always `count` points

pub mod config;
pub mod path;
pub mod sampler;
pub mod segment;

pub use config::SamplerConfig;
pub use path::{PathCommand, parse, parse_commands};
pub use sampler::{center_and_scale, generate_points, sample};
pub use segment::{Segment, SegmentBuilder, SegmentKind};

/// 2D point in canvas space
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D point in output space
pub type Vec3 = nalgebra::Vector3<f32>;

/// Sampler error
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("Invalid scale: {0}")]
    InvalidScale(f32),

    #[error("Invalid canvas units: {0}")]
    InvalidCanvasUnits(f32),
}
