//! Displacement field sources.
//!
//! A [`FieldSource`] maps a sample point to a displacement vector. The grain
//! line generator is written against the trait, and [`KnotField`] is the
//! source that bends the grain around knots: a Gaussian-weighted mix of a
//! swirl (tangential) and a pull (radial) component per knot, weighted so the
//! grain stays mostly horizontal.
//!
//! All implementations are deterministic: same inputs produce the same output.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::knot::PixelKnot;

/// A source of 2D displacement vectors.
pub trait FieldSource {
    /// Displacement to apply to a sample at `point` (pixel space).
    fn sample(&self, point: DVec2) -> DVec2;
}

/// Coefficients that shape each knot's contribution.
///
/// Horizontal displacement is dominated by the tangential term while the
/// vertical one stays small, so lines bend around knots instead of forming
/// circular ripples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplacementWeights {
    pub tangential_x: f64,
    pub radial_x: f64,
    pub tangential_y: f64,
    pub radial_y: f64,
    /// Added to the distance before normalizing, so a sample on the knot
    /// center stays finite.
    pub epsilon: f64,
}

impl Default for DisplacementWeights {
    fn default() -> Self {
        Self {
            tangential_x: 1.4,
            radial_x: 0.4,
            tangential_y: 0.2,
            radial_y: 0.15,
            epsilon: 1e-4,
        }
    }
}

/// Gaussian falloff `exp(-d2 / (2 sigma^2))` for a squared distance `d2`.
pub fn falloff(d2: f64, sigma: f64) -> f64 {
    let s2 = sigma * sigma;
    (-d2 / (2.0 * s2)).exp()
}

/// Sum of every knot's contribution at `point`.
pub fn displacement(point: DVec2, knots: &[PixelKnot], weights: &DisplacementWeights) -> DVec2 {
    let mut dx = 0.0;
    let mut dy = 0.0;
    for knot in knots {
        let rel = point - knot.center;
        let d2 = rel.length_squared();
        let fall = falloff(d2, knot.sigma);
        let d = d2.sqrt() + weights.epsilon;

        // center->point rotated 90 degrees
        let tx = -rel.y / d;
        let ty = rel.x / d;

        let rx = rel.x / d;
        let ry = rel.y / d;

        let strength = knot.strength * fall;
        dx += strength * (weights.tangential_x * tx + weights.radial_x * rx);
        dy += strength * (weights.tangential_y * ty + weights.radial_y * ry);
    }
    DVec2::new(dx, dy)
}

/// Displacement field induced by a set of pixel-space knots.
pub struct KnotField<'a> {
    knots: &'a [PixelKnot],
    weights: DisplacementWeights,
}

impl<'a> KnotField<'a> {
    pub fn new(knots: &'a [PixelKnot], weights: DisplacementWeights) -> Self {
        Self { knots, weights }
    }

    pub fn knots(&self) -> &[PixelKnot] {
        self.knots
    }
}

impl FieldSource for KnotField<'_> {
    fn sample(&self, point: DVec2) -> DVec2 {
        displacement(point, self.knots, &self.weights)
    }
}
