//! Sampling tests for sigil-path
//!
//! Exercises the full parse → sample → center pipeline.

use sigil_path::{SamplerConfig, Vec2, Vec3, generate_points, parse, sample};
use std::f32::consts::PI;

const EPS: f32 = 1e-4;

fn bounds(points: &[Vec3]) -> (Vec3, Vec3) {
    let first = points[0];
    points
        .iter()
        .fold((first, first), |(min, max), p| (min.inf(p), max.sup(p)))
}

const SIGIL: &str = r#"
ctx.beginPath();
ctx.moveTo(20, 20);
ctx.lineTo(80, 20);
ctx.quadraticCurveTo(95, 50, 80, 80);
ctx.bezierCurveTo(60, 95, 40, 95, 20, 80);
ctx.arc(50, 50, 15, 0, 6.283185);
ctx.closePath();
ctx.stroke();
"#;

// ============================================================================
// COUNT GUARANTEES
// ============================================================================

#[test]
fn test_exact_count_for_any_input() {
    let config = SamplerConfig::default();
    let inputs = [
        "",
        "garbage",
        "ctx.moveTo(1, 1)",
        "ctx.moveTo(0, 0)\nctx.lineTo(10, 0)",
        "ctx.moveTo(0, 0)\nctx.lineTo(0.001, 0)\nctx.lineTo(100, 0)\nctx.lineTo(100, 0.002)",
        SIGIL,
    ];
    for code in inputs {
        for count in [1, 2, 3, 7, 20, 100, 1000] {
            let points = generate_points(code, count, &config);
            assert_eq!(points.len(), count, "code {:?} count {}", code, count);
        }
    }
}

#[test]
fn test_empty_input_is_all_zero() {
    let points = generate_points("", 100, &SamplerConfig::default());
    assert_eq!(points.len(), 100);
    assert!(points.iter().all(|p| *p == Vec3::zeros()));
}

#[test]
fn test_move_only_is_all_zero() {
    let code = "ctx.moveTo(10, 10)\nctx.closePath()";
    let points = generate_points(code, 12, &SamplerConfig::default());
    assert_eq!(points.len(), 12);
    assert!(points.iter().all(|p| *p == Vec3::zeros()));
}

#[test]
fn test_many_tiny_segments_truncate_to_count() {
    // 50 segments each claim at least one sample; only 10 are requested
    let mut code = String::from("ctx.moveTo(0, 0)\n");
    for i in 1..=50 {
        code.push_str(&format!("ctx.lineTo({}, 0)\n", i));
    }
    let raw = sample(&parse(&code), 10);
    assert_eq!(raw.len(), 50);

    let points = generate_points(&code, 10, &SamplerConfig::default());
    assert_eq!(points.len(), 10);
    // Centering box spans all 50 raw samples, so the kept prefix sits left of center
    assert!(points.iter().all(|p| p.x < 0.0));
}

// ============================================================================
// DISTRIBUTION
// ============================================================================

#[test]
fn test_line_evenly_spaced() {
    let segments = parse("ctx.moveTo(0, 0)\nctx.lineTo(10, 0)");
    let raw = sample(&segments, 5);
    let xs: Vec<f32> = raw.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    assert!(raw.iter().all(|p| p.y == 0.0));
}

#[test]
fn test_length_proportional_allocation() {
    let code = "ctx.moveTo(0, 0)\nctx.lineTo(10, 0)\nctx.moveTo(0, 0)\nctx.lineTo(0, 10)";
    let segments = parse(code);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments.iter().map(|s| s.length).sum::<f32>(), 20.0);

    let raw = sample(&segments, 20);
    assert_eq!(raw.len(), 20);
    assert!(raw[..10].iter().all(|p| p.y == 0.0));
    assert_eq!(raw[9], Vec2::new(10.0, 0.0));
    assert!(raw[10..].iter().all(|p| p.x == 0.0));
    assert_eq!(raw[19], Vec2::new(0.0, 10.0));
}

#[test]
fn test_arc_samples_on_circle() {
    let segments = parse("ctx.arc(0, 0, 5, 0, 3.1415927)");
    assert_eq!(segments.len(), 1);
    assert!((segments[0].length - 5.0 * PI).abs() < EPS);

    for count in [1, 2, 16, 64] {
        let raw = sample(&segments, count);
        assert_eq!(raw.len(), count);
        for p in &raw {
            assert!((p.norm() - 5.0).abs() < EPS, "{:?} off circle", p);
        }
    }
}

#[test]
fn test_centered_bounds_symmetric() {
    let config = SamplerConfig::with_scale(3.0);
    for code in [SIGIL, "ctx.moveTo(10, 30)\nctx.lineTo(90, 70)\nctx.lineTo(40, 95)"] {
        let points = generate_points(code, 500, &config);
        let (min, max) = bounds(&points);
        assert!((min.x + max.x).abs() < EPS);
        assert!((min.y + max.y).abs() < EPS);
        assert!(points.iter().all(|p| p.z == 0.0));
    }
}

#[test]
fn test_scale_and_y_flip() {
    let code = "ctx.moveTo(0, 0)\nctx.lineTo(0, 100)";
    let points = generate_points(code, 2, &SamplerConfig::with_scale(2.0));
    // Canvas top (y = 0) maps to output top (+y)
    assert!((points[0].y - 1.0).abs() < EPS);
    assert!((points[1].y + 1.0).abs() < EPS);
}

#[test]
fn test_negative_coordinates() {
    let code = "ctx.moveTo(-10, -10)\nctx.lineTo(10, 10)";
    let segments = parse(code);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].start, Vec2::new(-10.0, -10.0));
}

// ============================================================================
// ROBUSTNESS
// ============================================================================

#[test]
fn test_malformed_line_skipped() {
    let code = "ctx.moveTo(0, 0)\nctx.lineTo(5, abc)\nctx.lineTo(10, 0)";
    let segments = parse(code);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].start, Vec2::new(0.0, 0.0));
    assert_eq!(segments[0].end, Vec2::new(10.0, 0.0));

    let points = generate_points(code, 8, &SamplerConfig::default());
    assert_eq!(points.len(), 8);
}

#[test]
fn test_idempotent() {
    let config = SamplerConfig::with_scale(1.7);
    let a = generate_points(SIGIL, 777, &config);
    let b = generate_points(SIGIL, 777, &config);
    let bits = |points: &[Vec3]| -> Vec<[u32; 3]> {
        points.iter().map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]).collect()
    };
    assert_eq!(bits(&a), bits(&b));
}
