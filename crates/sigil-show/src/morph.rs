//! Point Morphing
//!
//! Cycles through a sigil library, dispersing the current point cloud and
//! re-forming it as the next sigil.

use serde::{Deserialize, Serialize};
use sigil_path::{SamplerConfig, Vec3};

use crate::library::SigilLibrary;

/// Hermite smoothstep; equal edges give a hard step at the edge
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        0.0
    } else {
        ((value - a) / (b - a)).clamp(0.0, 1.0)
    }
}

/// Disperse/form schedule over a normalized cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    pub disperse_start: f32,
    pub disperse_end: f32,
    pub form_start: f32,
    pub form_end: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            disperse_start: 0.0,
            disperse_end: 0.1,
            form_start: 0.3,
            form_end: 0.3,
        }
    }
}

impl Envelope {
    /// 0 while formed, rising to 1 while dispersed
    pub fn value(&self, t: f32) -> f32 {
        smoothstep(self.disperse_start, self.disperse_end, t)
            * (1.0 - smoothstep(self.form_start, self.form_end, t))
    }
}

/// Inclusive parameter range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl Default for ParamRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl ParamRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn lerp(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t
    }
}

/// Particle simulation parameters pushed to the effect each frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VfxParams {
    pub spring_strength: f32,
    pub damping: f32,
    pub turbulence: f32,
    pub turbulence_freq: f32,
    pub turbulence_roughness: f32,
    pub turbulence_lacunarity: f32,
}

/// Morph configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphSettings {
    pub point_count: usize,
    /// Seconds per sigil
    pub update_interval: f32,
    pub envelope: Envelope,
    pub spring_strength: ParamRange,
    pub damping: ParamRange,
    pub turbulence: ParamRange,
    pub turbulence_freq: ParamRange,
    pub turbulence_roughness: ParamRange,
    pub turbulence_lacunarity: ParamRange,
}

impl Default for MorphSettings {
    fn default() -> Self {
        Self {
            point_count: 10_000,
            update_interval: 20.0,
            envelope: Envelope::default(),
            spring_strength: ParamRange::default(),
            damping: ParamRange::default(),
            turbulence: ParamRange::default(),
            turbulence_freq: ParamRange::default(),
            turbulence_roughness: ParamRange::default(),
            turbulence_lacunarity: ParamRange::default(),
        }
    }
}

impl MorphSettings {
    /// Parameters at envelope value `v`
    pub fn params(&self, v: f32) -> VfxParams {
        VfxParams {
            spring_strength: self.spring_strength.lerp(v),
            damping: self.damping.lerp(v),
            turbulence: self.turbulence.lerp(v),
            turbulence_freq: self.turbulence_freq.lerp(v),
            turbulence_roughness: self.turbulence_roughness.lerp(v),
            turbulence_lacunarity: self.turbulence_lacunarity.lerp(v),
        }
    }
}

/// Staggered blend: point `i` finishes once `progress` reaches `i / (n - 1)`.
///
/// Returns `None` when the clouds differ in length.
pub fn blend(from: &[Vec3], to: &[Vec3], progress: f32) -> Option<Vec<Vec3>> {
    if from.len() != to.len() {
        return None;
    }
    if from.len() == 1 {
        return Some(vec![from[0].lerp(&to[0], progress.clamp(0.0, 1.0))]);
    }

    let span = from.len().saturating_sub(1) as f32;
    Some(
        from.iter()
            .zip(to)
            .enumerate()
            .map(|(i, (a, b))| {
                let local = (progress * span - i as f32 + 1.0).clamp(0.0, 1.0);
                a.lerp(b, local)
            })
            .collect(),
    )
}

/// Result of one [`SigilMorph::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphFrame {
    pub params: VfxParams,
    pub points_changed: bool,
}

/// Drives the disperse/swap/form cycle across a library
#[derive(Debug, Clone)]
pub struct SigilMorph {
    settings: MorphSettings,
    tick: f32,
    cursor: usize,
    swapped_this_cycle: bool,
    transitioning: bool,
    points: Vec<Vec3>,
    from: Vec<Vec3>,
    to: Vec<Vec3>,
}

impl SigilMorph {
    /// Start on the first sigil of `library`
    pub fn new(settings: MorphSettings, library: &SigilLibrary, config: &SamplerConfig) -> Self {
        let points = library.points_for(0, settings.point_count, config);
        Self {
            settings,
            tick: 0.0,
            cursor: 0,
            swapped_this_cycle: false,
            transitioning: false,
            from: points.clone(),
            to: Vec::new(),
            points,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Library index of the sigil being shown or formed
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Advance by `dt` seconds
    pub fn update(
        &mut self,
        dt: f32,
        library: &SigilLibrary,
        config: &SamplerConfig,
    ) -> MorphFrame {
        let envelope = self.settings.envelope;
        self.tick += dt;
        let t = (self.tick / self.settings.update_interval.max(f32::EPSILON)).clamp(0.0, 1.0);

        if t < 0.01 {
            self.swapped_this_cycle = false;
            self.transitioning = false;
        }

        let params = self.settings.params(envelope.value(t));
        let mut points_changed = false;

        if t >= envelope.disperse_end && !self.swapped_this_cycle {
            self.swapped_this_cycle = true;
            self.transitioning = true;
            self.from = self.points.clone();
            self.cursor = library.wrap(self.cursor as i64 + 1).unwrap_or(0);
            self.to = library.points_for(self.cursor as i64, self.settings.point_count, config);
            tracing::debug!("Morphing to sigil {}", self.cursor);
        }

        if self.transitioning && t <= envelope.form_start {
            let progress = inverse_lerp(envelope.disperse_end, envelope.form_start, t);
            if let Some(blended) = blend(&self.from, &self.to, progress) {
                self.points = blended;
                points_changed = true;
            }
        } else if self.transitioning {
            self.transitioning = false;
            self.points = std::mem::take(&mut self.to);
            points_changed = true;
        }

        if self.tick >= self.settings.update_interval {
            self.tick = 0.0;
        }

        MorphFrame { params, points_changed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_eq!(smoothstep(0.3, 0.3, 0.2), 0.0);
        assert_eq!(smoothstep(0.3, 0.3, 0.3), 1.0);
    }

    #[test]
    fn test_envelope_default_shape() {
        let env = Envelope::default();
        assert_eq!(env.value(0.0), 0.0);
        assert_eq!(env.value(0.2), 1.0);
        assert_eq!(env.value(0.5), 0.0);
    }

    #[test]
    fn test_blend_staggered() {
        let from = vec![Vec3::zeros(); 3];
        let to = vec![Vec3::new(1.0, 0.0, 0.0); 3];

        let start = blend(&from, &to, 0.0).unwrap();
        assert_eq!(start[0].x, 1.0);
        assert_eq!(start[1].x, 0.0);
        assert_eq!(start[2].x, 0.0);

        let mid = blend(&from, &to, 0.5).unwrap();
        assert_eq!(mid[1].x, 1.0);
        assert_eq!(mid[2].x, 0.0);

        let end = blend(&from, &to, 1.0).unwrap();
        assert!(end.iter().all(|p| p.x == 1.0));
    }

    #[test]
    fn test_blend_single_and_mismatch() {
        let one = blend(&[Vec3::zeros()], &[Vec3::new(2.0, 0.0, 0.0)], 0.25).unwrap();
        assert_eq!(one[0].x, 0.5);
        assert!(blend(&[Vec3::zeros()], &[], 0.5).is_none());
    }

    #[test]
    fn test_param_range() {
        let settings = MorphSettings {
            damping: ParamRange::new(2.0, 4.0),
            ..MorphSettings::default()
        };
        assert_eq!(settings.params(0.5).damping, 3.0);
        assert_eq!(settings.params(0.0).spring_strength, 0.0);
    }
}
