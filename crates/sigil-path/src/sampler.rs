//! Point Sampler
//!
//! Arc-length weighted sampling of a segment list into a fixed-size,
//! centered point cloud.

use crate::config::SamplerConfig;
use crate::path::parse;
use crate::segment::Segment;
use crate::{Vec2, Vec3};

/// Sample points along `segments`, weighted by segment length.
///
/// Every segment gets `max(1, round(count * length / total))` samples, so the
/// result may be longer than `count`. Shorter results are padded by cycling
/// through the existing samples. Returns an empty list when there is nothing
/// to draw.
pub fn sample(segments: &[Segment], count: usize) -> Vec<Vec2> {
    let count = clamp_count(count);
    let total_length: f32 = segments.iter().map(|seg| seg.length).sum();
    if segments.is_empty() || !(total_length > 0.0) {
        return Vec::new();
    }

    let mut raw = Vec::with_capacity(count);
    for seg in segments {
        let share = (count as f32 * seg.length / total_length).round_ties_even();
        let seg_count = (share as usize).max(1);
        for i in 0..seg_count {
            let t = if seg_count > 1 {
                i as f32 / (seg_count - 1) as f32
            } else {
                0.0
            };
            raw.push(seg.point_at(t));
        }
    }

    let base = raw.len();
    for i in base..count {
        raw.push(raw[i % base]);
    }

    raw
}

/// Center on the bounding box of `points` and scale into output space.
///
/// Canvas Y grows downward, output Y grows upward, so Y is negated.
pub fn center_and_scale(points: &[Vec2], config: &SamplerConfig) -> Vec<Vec3> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };

    let (min, max) = points
        .iter()
        .fold((first, first), |(min, max), p| (min.inf(p), max.sup(p)));
    let center = (min + max) * 0.5;
    let factor = config.factor();

    points
        .iter()
        .map(|p| {
            let centered = p - center;
            Vec3::new(centered.x * factor, -centered.y * factor, 0.0)
        })
        .collect()
}

/// Full pipeline: always returns exactly `count` points.
///
/// Degenerate input (empty script, no segments, zero total length) yields
/// `count` zero points. Samples beyond `count` are dropped after centering,
/// so the centering box still covers them.
pub fn generate_points(code: &str, count: usize, config: &SamplerConfig) -> Vec<Vec3> {
    let count = clamp_count(count);
    if code.trim().is_empty() {
        return vec![Vec3::zeros(); count];
    }

    let raw = sample(&parse(code), count);
    if raw.is_empty() {
        tracing::warn!("Drawing script has no length; emitting {} zero points", count);
        return vec![Vec3::zeros(); count];
    }
    if raw.len() > count {
        tracing::debug!("Dropping {} surplus samples", raw.len() - count);
    }

    let mut points = center_and_scale(&raw, config);
    points.truncate(count);
    points
}

fn clamp_count(count: usize) -> usize {
    if count == 0 {
        tracing::warn!("Point count 0 requested; using 1");
        1
    } else {
        count
    }
}
