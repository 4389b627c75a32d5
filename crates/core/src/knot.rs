//! Knots: point influence sources that bend the grain.
//!
//! A [`Knot`] lives in normalized viewport coordinates and carries a visual
//! radius, a Gaussian influence sigma and a strength, each clamped to the
//! ranges in [`KnotBounds`]. Whether the next hover step grows or shrinks a
//! knot is a two-state machine ([`Growth`]) driven purely by its sigma.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Default visual radius range in pixels.
const DEFAULT_RADIUS_RANGE: (f64, f64) = (60.0, 180.0);
/// Default influence sigma range in pixels.
const DEFAULT_SIGMA_RANGE: (f64, f64) = (140.0, 300.0);
/// Default strength range.
const DEFAULT_STRENGTH_RANGE: (f64, f64) = (8.0, 30.0);

/// Direction the next hysteresis-driven step takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Growth {
    #[default]
    Growing,
    Shrinking,
}

impl Growth {
    /// Hysteresis rule: a knot at the sigma ceiling starts shrinking, a knot
    /// at the floor starts growing, anything in between keeps its direction.
    pub fn transition(self, sigma: f64, bounds: &KnotBounds) -> Growth {
        if sigma >= bounds.sigma.max {
            Growth::Shrinking
        } else if sigma <= bounds.sigma.min {
            Growth::Growing
        } else {
            self
        }
    }
}

/// Closed interval used to clamp one knot attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }

    pub fn contains(&self, v: f64) -> bool {
        (self.min..=self.max).contains(&v)
    }
}

/// Clamp ranges for every numeric knot attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnotBounds {
    pub radius: Range,
    pub sigma: Range,
    pub strength: Range,
}

impl Default for KnotBounds {
    fn default() -> Self {
        Self {
            radius: Range::new(DEFAULT_RADIUS_RANGE.0, DEFAULT_RADIUS_RANGE.1),
            sigma: Range::new(DEFAULT_SIGMA_RANGE.0, DEFAULT_SIGMA_RANGE.1),
            strength: Range::new(DEFAULT_STRENGTH_RANGE.0, DEFAULT_STRENGTH_RANGE.1),
        }
    }
}

/// Magnitudes applied by one grow or shrink step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnotStep {
    pub radius: f64,
    pub sigma: f64,
    pub strength: f64,
}

/// Clamp ranges plus the grow and shrink step sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnotTuning {
    pub bounds: KnotBounds,
    pub grow: KnotStep,
    pub shrink: KnotStep,
}

impl Default for KnotTuning {
    fn default() -> Self {
        Self {
            bounds: KnotBounds::default(),
            grow: KnotStep {
                radius: 6.0,
                sigma: 10.0,
                strength: 0.8,
            },
            shrink: KnotStep {
                radius: 4.0,
                sigma: 6.0,
                strength: 0.6,
            },
        }
    }
}

/// A simulated wood knot in normalized viewport coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Knot {
    pub id: u32,
    pub growth: Growth,
    /// Position in [0, 1] x [0, 1], relative to the viewport.
    pub position: DVec2,
    /// Ring radius in pixels.
    pub radius: f64,
    /// Gaussian falloff scale in pixels.
    pub sigma: f64,
    pub strength: f64,
}

impl Knot {
    /// Creates a growing knot with every numeric attribute clamped into `bounds`.
    pub fn new(
        id: u32,
        position: DVec2,
        radius: f64,
        sigma: f64,
        strength: f64,
        bounds: &KnotBounds,
    ) -> Self {
        Self {
            id,
            growth: Growth::Growing,
            position,
            radius,
            sigma,
            strength,
        }
        .clamped(bounds)
    }

    /// Returns the knot with all numeric attributes forced into `bounds`
    /// and its position forced into the unit square.
    pub fn clamped(mut self, bounds: &KnotBounds) -> Self {
        self.position = self.position.clamp(DVec2::ZERO, DVec2::ONE);
        self.radius = bounds.radius.clamp(self.radius);
        self.sigma = bounds.sigma.clamp(self.sigma);
        self.strength = bounds.strength.clamp(self.strength);
        self
    }

    /// True when every numeric attribute lies inside `bounds`.
    pub fn within(&self, bounds: &KnotBounds) -> bool {
        bounds.radius.contains(self.radius)
            && bounds.sigma.contains(self.sigma)
            && bounds.strength.contains(self.strength)
    }

    /// Grows radius, sigma and strength by one step, ignoring `growth`.
    pub fn grow(&mut self, tuning: &KnotTuning) {
        let b = &tuning.bounds;
        self.radius = b.radius.clamp(self.radius + tuning.grow.radius);
        self.sigma = b.sigma.clamp(self.sigma + tuning.grow.sigma);
        self.strength = b.strength.clamp(self.strength + tuning.grow.strength);
    }

    /// Shrinks radius, sigma and strength by one step, ignoring `growth`.
    pub fn shrink(&mut self, tuning: &KnotTuning) {
        let b = &tuning.bounds;
        self.radius = b.radius.clamp(self.radius - tuning.shrink.radius);
        self.sigma = b.sigma.clamp(self.sigma - tuning.shrink.sigma);
        self.strength = b.strength.clamp(self.strength - tuning.shrink.strength);
    }

    /// Re-evaluates the hysteresis state from the current sigma.
    pub fn update_growth(&mut self, bounds: &KnotBounds) {
        self.growth = self.growth.transition(self.sigma, bounds);
    }

    /// Steps in the direction given by the current `growth` state.
    pub fn step(&mut self, tuning: &KnotTuning) {
        match self.growth {
            Growth::Growing => self.grow(tuning),
            Growth::Shrinking => self.shrink(tuning),
        }
    }

    /// Projects the knot into pixel space for a viewport of `size`.
    pub fn to_pixel(&self, size: DVec2) -> PixelKnot {
        PixelKnot {
            id: self.id,
            center: self.position * size,
            radius: self.radius,
            sigma: self.sigma,
            strength: self.strength,
        }
    }
}

/// A knot projected into pixel space, ready for the displacement field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelKnot {
    pub id: u32,
    pub center: DVec2,
    pub radius: f64,
    pub sigma: f64,
    pub strength: f64,
}

/// The three knots seeded at mount in the default configuration.
pub fn default_knots(bounds: &KnotBounds) -> Vec<Knot> {
    vec![
        Knot::new(1, DVec2::new(0.25, 0.35), 90.0, 180.0, 18.0, bounds),
        Knot::new(2, DVec2::new(0.7, 0.6), 110.0, 220.0, 22.0, bounds),
        Knot::new(3, DVec2::new(0.8, 0.2), 180.0, 130.0, 33.0, bounds),
    ]
}
