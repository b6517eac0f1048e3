//! Test gradient generation
//!
//! Seeded random gradients that lean on the awkward cases: single colors,
//! hard stops, unsorted and out-of-range positions, translucent colors and
//! working-space interpolation.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use oxgrad_core::{make_gradient, Color4f, ColorSpace, GradientSpec, Interpolation, TileMode};

/// Raw gradient inputs, before normalization
#[derive(Debug, Clone)]
pub struct RandomGradient {
    pub colors: Vec<Color4f>,
    pub positions: Option<Vec<f32>>,
    pub tile_mode: TileMode,
    pub interpolation: Interpolation,
    pub color_space: Option<ColorSpace>,
}

impl RandomGradient {
    pub fn spec(&self) -> oxgrad_core::Result<GradientSpec> {
        make_gradient(
            &self.colors,
            self.positions.as_deref(),
            self.tile_mode,
            self.interpolation,
            self.color_space,
        )
    }

    pub fn with_tile_mode(mut self, tile_mode: TileMode) -> Self {
        self.tile_mode = tile_mode;
        self
    }
}

const TILE_MODES: [TileMode; 4] = [
    TileMode::Clamp,
    TileMode::Repeat,
    TileMode::Mirror,
    TileMode::Decal,
];

fn random_color(rng: &mut ChaCha8Rng) -> Color4f {
    let a = if rng.gen_bool(0.6) {
        1.0
    } else {
        rng.gen_range(0.0..=1.0)
    };
    Color4f::new(rng.r#gen(), rng.r#gen(), rng.r#gen(), a)
}

fn random_space(rng: &mut ChaCha8Rng) -> Option<ColorSpace> {
    match rng.gen_range(0..4) {
        0 => Some(ColorSpace::srgb_linear()),
        1 => Some(ColorSpace::display_p3()),
        _ => None,
    }
}

/// Generate a random gradient from `seed`
pub fn random_gradient(seed: u64) -> RandomGradient {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let count = rng.gen_range(1..=6);
    let colors: Vec<Color4f> = (0..count).map(|_| random_color(&mut rng)).collect();

    let positions = match rng.gen_range(0..4) {
        0 => None,
        // Sorted, with occasional hard stops
        1 | 2 => {
            let mut p: Vec<f32> = (0..count).map(|_| rng.gen_range(0.0..=1.0)).collect();
            p.sort_by(f32::total_cmp);
            if count > 2 && rng.gen_bool(0.5) {
                let i = rng.gen_range(1..count);
                p[i] = p[i - 1];
            }
            if rng.gen_bool(0.3) {
                p[0] = 0.0;
            }
            Some(p)
        }
        // Anything goes
        _ => Some((0..count).map(|_| rng.gen_range(-0.5..1.5)).collect()),
    };

    RandomGradient {
        colors,
        positions,
        tile_mode: TILE_MODES[rng.gen_range(0..TILE_MODES.len())],
        interpolation: Interpolation {
            in_premul: rng.gen_bool(0.5),
            color_space: random_space(&mut rng),
        },
        color_space: if rng.gen_bool(0.2) {
            Some(ColorSpace::display_p3())
        } else {
            None
        },
    }
}

/// Gradient parameters worth evaluating for `spec`
///
/// A regular sweep over [-2.5, 3.5], every stop position, values just either
/// side of each stop, and the integers where tiling folds.
pub fn sweep_parameters(spec: &GradientSpec) -> Vec<f32> {
    let mut ts: Vec<f32> = (0..=240).map(|i| -2.5 + i as f32 * 0.025).collect();
    for i in 0..spec.color_count() {
        let p = spec.position(i);
        ts.extend([p, p - 1e-4, p + 1e-4, p + 1.0, p - 1.0]);
    }
    ts.extend([-2.0, -1.0, -0.0, 0.0, 1.0, 2.0, 3.0, 1.0 - f32::EPSILON, f32::MIN_POSITIVE]);
    ts
}
