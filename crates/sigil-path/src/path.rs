//! Drawing Commands
//!
//! Line parser for the `ctx.*` drawing mini-language.

use crate::segment::{Segment, SegmentBuilder};

/// Receiver prefix every statement starts with
const RECEIVER: &str = "ctx.";

/// Drawing command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    Arc { x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32 },
    QuadraticCurveTo { cpx: f32, cpy: f32, x: f32, y: f32 },
    BezierCurveTo { cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32 },
    ClosePath,
}

impl PathCommand {
    /// Parse a single statement such as `ctx.lineTo(10, 20);`
    ///
    /// Returns `None` for unknown commands, wrong argument counts and
    /// literals that are not finite numbers.
    pub fn parse_line(line: &str) -> Option<Self> {
        let call = line.trim().strip_prefix(RECEIVER)?;
        let name_end = call.find(['(', ';']).unwrap_or(call.len());
        let name = call[..name_end].trim_end();

        if name == "closePath" {
            return Some(PathCommand::ClosePath);
        }

        let rest = call[name_end..].strip_prefix('(')?;
        let inner = &rest[..rest.find(')')?];
        let args = parse_args(inner)?;

        match (name, args.as_slice()) {
            ("moveTo", &[x, y]) => Some(PathCommand::MoveTo(x, y)),
            ("lineTo", &[x, y]) => Some(PathCommand::LineTo(x, y)),
            ("arc", &[x, y, radius, start_angle, end_angle]) => Some(PathCommand::Arc {
                x,
                y,
                radius,
                start_angle,
                end_angle,
            }),
            ("quadraticCurveTo", &[cpx, cpy, x, y]) => {
                Some(PathCommand::QuadraticCurveTo { cpx, cpy, x, y })
            }
            ("bezierCurveTo", &[cp1x, cp1y, cp2x, cp2y, x, y]) => Some(PathCommand::BezierCurveTo {
                cp1x,
                cp1y,
                cp2x,
                cp2y,
                x,
                y,
            }),
            _ => None,
        }
    }
}

/// Split a comma separated argument list into finite floats
fn parse_args(inner: &str) -> Option<Vec<f32>> {
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    inner
        .split(',')
        .map(|arg| arg.trim().parse::<f32>().ok().filter(|v| v.is_finite()))
        .collect()
}

/// Parse every recognized statement of a drawing script
pub fn parse_commands(code: &str) -> Vec<PathCommand> {
    code.lines()
        .filter_map(|line| {
            let command = PathCommand::parse_line(line);
            if command.is_none() && !line.trim().is_empty() {
                tracing::trace!("Skipping drawing statement: {}", line.trim());
            }
            command
        })
        .collect()
}

/// Parse a drawing script into an ordered segment list
pub fn parse(code: &str) -> Vec<Segment> {
    let mut builder = SegmentBuilder::new();
    for command in parse_commands(code) {
        builder.push(command);
    }
    let segments = builder.finish();
    tracing::debug!("Parsed {} segments", segments.len());
    segments
}
