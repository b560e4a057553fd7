//! Point Output
//!
//! Text renderings of a sampled point cloud.

use clap::ValueEnum;
use sigil_path::Vec3;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// JSON array of `[x, y, z]` triples
    #[default]
    Json,
    /// One `x,y,z` line per point, newline separated
    Csv,
}

/// Render points in the given format
pub fn render(points: &[Vec3], format: Format) -> anyhow::Result<String> {
    match format {
        Format::Json => {
            let triples: Vec<[f32; 3]> = points.iter().map(|p| [p.x, p.y, p.z]).collect();
            Ok(serde_json::to_string(&triples)?)
        }
        Format::Csv => Ok(points
            .iter()
            .map(|p| format!("{},{},{}", p.x, p.y, p.z))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
