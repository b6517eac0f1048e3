//! Hand-checked gradient colors
//!
//! Every example is shaded through both backends.

use std::sync::Arc;

use grad_tests::{init_logging, Backends};
use oxgrad_core::gradient::average_gradient_color;
use oxgrad_core::{
    make_degenerate, make_gradient, Color4f, ColorSpace, GradientShader, Interpolation,
    ShadeContext, Shader, TileMode, Transform,
};

const EPS: f32 = 1e-5;

fn shade_at(colors: &[Color4f], positions: Option<&[f32]>, mode: TileMode, ts: &[f32]) -> Vec<Color4f> {
    init_logging();
    let spec = make_gradient(colors, positions, mode, Interpolation::default(), None).unwrap();
    let shader: Shader = GradientShader::new(Arc::new(spec), Transform::identity()).into();
    let backends = Backends::new(&shader, &ShadeContext::new()).unwrap();

    let ys = vec![0.0; ts.len()];
    let (stages, program) = backends.shade(ts, &ys);
    for (s, p) in stages.iter().zip(program.iter()) {
        assert!(s.approx_eq(p, EPS), "backends disagree: {s:?} vs {p:?}");
    }
    stages
}

fn assert_color(actual: Color4f, expected: Color4f) {
    assert!(
        actual.approx_eq(&expected, EPS),
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn test_three_stops_midpoint() {
    let out = shade_at(
        &[Color4f::RED, Color4f::GREEN, Color4f::BLUE],
        None,
        TileMode::Clamp,
        &[0.25, 0.5, 0.75],
    );
    assert_color(out[0], Color4f::new(0.5, 0.5, 0.0, 1.0));
    assert_color(out[1], Color4f::GREEN);
    assert_color(out[2], Color4f::new(0.0, 0.5, 0.5, 1.0));
}

#[test]
fn test_repeat_wraps() {
    let out = shade_at(&[Color4f::RED, Color4f::BLUE], None, TileMode::Repeat, &[1.5, -0.5]);
    let half = Color4f::new(0.5, 0.0, 0.5, 1.0);
    assert_color(out[0], half);
    assert_color(out[1], half);
}

#[test]
fn test_mirror_reflects() {
    let out = shade_at(&[Color4f::RED, Color4f::BLUE], None, TileMode::Mirror, &[1.25, 2.25]);
    // 1.25 folds to 0.75, 2.25 to 0.25
    assert_color(out[0], Color4f::new(0.25, 0.0, 0.75, 1.0));
    assert_color(out[1], Color4f::new(0.75, 0.0, 0.25, 1.0));
}

#[test]
fn test_decal_outside_is_transparent() {
    let out = shade_at(&[Color4f::RED, Color4f::GREEN], None, TileMode::Decal, &[1.2, -0.1, 0.5]);
    assert_color(out[0], Color4f::TRANSPARENT);
    assert_color(out[1], Color4f::TRANSPARENT);
    assert_color(out[2], Color4f::new(0.5, 0.5, 0.0, 1.0));
}

#[test]
fn test_clamp_extends_edges() {
    let out = shade_at(
        &[Color4f::RED, Color4f::GREEN, Color4f::BLUE],
        Some(&[0.2, 0.5, 0.8]),
        TileMode::Clamp,
        &[-3.0, 0.1, 0.9, 5.0],
    );
    assert_color(out[0], Color4f::RED);
    assert_color(out[1], Color4f::RED);
    assert_color(out[2], Color4f::BLUE);
    assert_color(out[3], Color4f::BLUE);
}

#[test]
fn test_three_stop_collapse() {
    let spec = make_gradient(
        &[Color4f::RED, Color4f::RED, Color4f::BLUE],
        Some(&[0.0, 0.0, 1.0]),
        TileMode::Clamp,
        Interpolation::default(),
        None,
    )
    .unwrap();
    assert_eq!(spec.colors(), &[Color4f::RED, Color4f::BLUE]);
    assert!(spec.uniform_stops());
}

#[test]
fn test_hard_stop_at_zero() {
    let colors = [Color4f::RED, Color4f::GREEN, Color4f::BLUE, Color4f::WHITE];
    let out = shade_at(&colors, Some(&[0.0, 0.0, 0.5, 1.0]), TileMode::Clamp, &[0.0, -0.5, 0.25]);
    // At the edge the later stop wins; before it only the first color shows.
    assert_color(out[0], Color4f::GREEN);
    assert_color(out[1], Color4f::RED);
    assert_color(out[2], Color4f::new(0.0, 0.5, 0.5, 1.0));
}

#[test]
fn test_translucent_output_is_premultiplied() {
    let out = shade_at(
        &[Color4f::new(1.0, 0.0, 0.0, 0.5), Color4f::new(1.0, 0.0, 0.0, 0.5)],
        None,
        TileMode::Clamp,
        &[0.5],
    );
    assert_color(out[0], Color4f::new(0.5, 0.0, 0.0, 0.5));
}

#[test]
fn test_degenerate_fallbacks() {
    let colors = [Color4f::RED, Color4f::BLUE];

    let decal = make_degenerate(&colors, None, TileMode::Decal, None).unwrap();
    assert!(matches!(decal, Shader::Empty));

    let clamp = make_degenerate(&colors, None, TileMode::Clamp, None).unwrap();
    match clamp {
        Shader::Color(c) => assert_eq!(c.color(), Color4f::BLUE),
        other => panic!("expected a color shader, got {other:?}"),
    }

    let mirror = make_degenerate(&colors, None, TileMode::Mirror, None).unwrap();
    match mirror {
        Shader::Color(c) => assert_color(c.color(), Color4f::new(0.5, 0.0, 0.5, 1.0)),
        other => panic!("expected a color shader, got {other:?}"),
    }
}

#[test]
fn test_coincident_endpoints_fall_back() {
    init_logging();
    let colors = [Color4f::RED, Color4f::BLUE];
    let spec = |mode| {
        Arc::new(make_gradient(&colors, None, mode, Interpolation::default(), None).unwrap())
    };

    let clamp = GradientShader::horizontal(spec(TileMode::Clamp), 5.0, 5.0);
    assert!(matches!(clamp, Shader::Color(_)), "{clamp:?}");
    let (stages, program) = Backends::new(&clamp, &ShadeContext::new())
        .unwrap()
        .shade(&[4.0, 5.0, 6.0], &[0.0; 3]);
    for c in stages.iter().chain(program.iter()) {
        assert_color(*c, Color4f::BLUE);
    }

    for mode in [TileMode::Repeat, TileMode::Mirror] {
        match GradientShader::horizontal(spec(mode), 5.0, 5.0) {
            Shader::Color(c) => assert_color(c.color(), Color4f::new(0.5, 0.0, 0.5, 1.0)),
            other => panic!("expected a color shader, got {other:?}"),
        }
    }

    let decal = GradientShader::horizontal(spec(TileMode::Decal), 5.0, 5.0);
    assert!(matches!(decal, Shader::Empty));
}

#[test]
fn test_average_weights_segments() {
    // Red fills [0, 0.5], then red to blue over [0.5, 1].
    let avg = average_gradient_color(
        &[Color4f::RED, Color4f::RED, Color4f::BLUE],
        Some(&[0.0, 0.5, 1.0]),
    );
    assert_color(avg, Color4f::new(0.75, 0.0, 0.25, 1.0));
}

#[test]
fn test_degenerate_color_converted_for_destination() {
    let shader = make_degenerate(&[Color4f::WHITE], None, TileMode::Repeat, None).unwrap();
    let ctx = ShadeContext::new().with_dst_color_space(ColorSpace::display_p3());
    let (stages, program) = Backends::new(&shader, &ctx).unwrap().shade(&[0.0], &[0.0]);
    // White maps to white between D65 spaces.
    assert!(stages[0].approx_eq(&Color4f::WHITE, 1e-4), "{:?}", stages[0]);
    assert!(program[0].approx_eq(&Color4f::WHITE, 1e-4));
}
