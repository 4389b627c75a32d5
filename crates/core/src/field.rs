//! Field model: the knot set, the viewport it is projected onto, and the
//! optional active cursor.
//!
//! Knots are stored in normalized coordinates, so a resize moves their pixel
//! positions proportionally without touching the stored state. All mutations
//! are plain `&mut self` methods that run to completion; callers that cache
//! derived geometry compare [`FieldModel::pixel_knots`] before and after.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::WoodgrainError;
use crate::knot::{Knot, KnotTuning, PixelKnot};

/// Default viewport before the first resize event.
const DEFAULT_VIEWPORT: (f64, f64) = (1200.0, 800.0);

/// Viewport size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// Returns `WoodgrainError::InvalidDimensions` if either side is negative
    /// or not finite. Zero is allowed (a collapsed window).
    pub fn new(width: f64, height: f64) -> Result<Self, WoodgrainError> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(WoodgrainError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Re-checks the invariants, for values that arrived through serde.
    pub fn validate(&self) -> Result<(), WoodgrainError> {
        Self::new(self.width, self.height).map(|_| ())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT.0,
            height: DEFAULT_VIEWPORT.1,
        }
    }
}

/// Mutable knot state plus the viewport and cursor it is read against.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldModel {
    knots: Vec<Knot>,
    viewport: Viewport,
    cursor: Option<DVec2>,
    tuning: KnotTuning,
}

impl FieldModel {
    /// Creates a model, clamping every seed knot into the tuning bounds.
    pub fn new(knots: Vec<Knot>, viewport: Viewport, tuning: KnotTuning) -> Self {
        let knots = knots
            .into_iter()
            .map(|k| k.clamped(&tuning.bounds))
            .collect();
        Self {
            knots,
            viewport,
            cursor: None,
            tuning,
        }
    }

    pub fn knots(&self) -> &[Knot] {
        &self.knots
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn cursor(&self) -> Option<DVec2> {
        self.cursor
    }

    pub fn tuning(&self) -> &KnotTuning {
        &self.tuning
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_cursor(&mut self, point: DVec2) {
        self.cursor = Some(point);
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    /// Knots projected onto the current viewport.
    pub fn pixel_knots(&self) -> Vec<PixelKnot> {
        let size = self.viewport.size();
        self.knots.iter().map(|k| k.to_pixel(size)).collect()
    }

    /// Index of the knot closest to `point` (pixel space).
    ///
    /// Ties go to the lowest index. Returns `None` when there are no knots.
    pub fn nearest_knot(&self, point: DVec2) -> Option<usize> {
        if self.knots.is_empty() {
            return None;
        }
        let size = self.viewport.size();
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for (i, knot) in self.knots.iter().enumerate() {
            let d = point.distance(knot.position * size);
            if d < best_d {
                best_d = d;
                best = i;
            }
        }
        Some(best)
    }

    /// Grows the nearest knot by one step, whatever its growth state.
    pub fn grow_nearest(&mut self, point: DVec2) -> Option<usize> {
        let idx = self.nearest_knot(point)?;
        let tuning = self.tuning;
        self.knots[idx].grow(&tuning);
        log::trace!("grew knot {} to sigma {}", self.knots[idx].id, self.knots[idx].sigma);
        Some(idx)
    }

    /// Runs the hysteresis transition on every knot, then steps only the
    /// nearest one in its (updated) growth direction.
    pub fn grow_or_shrink_nearest(&mut self, point: DVec2) -> Option<usize> {
        let idx = self.nearest_knot(point)?;
        let tuning = self.tuning;
        for knot in &mut self.knots {
            let before = knot.growth;
            knot.update_growth(&tuning.bounds);
            if knot.growth != before {
                log::debug!("knot {} now {:?} at sigma {}", knot.id, knot.growth, knot.sigma);
            }
        }
        self.knots[idx].step(&tuning);
        Some(idx)
    }

    /// Shrinks every knot by one step, ignoring growth state.
    pub fn shrink_all(&mut self) {
        let tuning = self.tuning;
        for knot in &mut self.knots {
            knot.shrink(&tuning);
        }
    }
}

impl Default for FieldModel {
    fn default() -> Self {
        let tuning = KnotTuning::default();
        Self::new(
            crate::knot::default_knots(&tuning.bounds),
            Viewport::default(),
            tuning,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knot::{Growth, KnotBounds};

    fn knot_at(id: u32, x: f64, y: f64) -> Knot {
        Knot::new(id, DVec2::new(x, y), 90.0, 200.0, 18.0, &KnotBounds::default())
    }

    fn model(knots: Vec<Knot>, w: f64, h: f64) -> FieldModel {
        FieldModel::new(knots, Viewport::new(w, h).unwrap(), KnotTuning::default())
    }

    #[test]
    fn viewport_rejects_negative_and_nan() {
        assert!(Viewport::new(-1.0, 10.0).is_err());
        assert!(Viewport::new(10.0, f64::NAN).is_err());
        assert!(Viewport::new(f64::INFINITY, 10.0).is_err());
        assert!(Viewport::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn viewport_default_is_1200_by_800() {
        let v = Viewport::default();
        assert_eq!((v.width(), v.height()), (1200.0, 800.0));
    }

    #[test]
    fn nearest_picks_literally_closest_knot() {
        // Pixel positions (100,100) and (900,100) on a 1000x1000 viewport.
        let m = model(
            vec![knot_at(1, 0.1, 0.1), knot_at(2, 0.9, 0.1)],
            1000.0,
            1000.0,
        );
        assert_eq!(m.nearest_knot(DVec2::new(120.0, 100.0)), Some(0));
        assert_eq!(m.nearest_knot(DVec2::new(880.0, 100.0)), Some(1));
    }

    #[test]
    fn nearest_ties_go_to_lowest_index() {
        let m = model(
            vec![knot_at(1, 0.25, 0.5), knot_at(2, 0.75, 0.5)],
            1000.0,
            1000.0,
        );
        assert_eq!(m.nearest_knot(DVec2::new(500.0, 500.0)), Some(0));
    }

    #[test]
    fn nearest_on_empty_set_is_none() {
        let m = model(vec![], 100.0, 100.0);
        assert_eq!(m.nearest_knot(DVec2::new(1.0, 1.0)), None);
    }

    #[test]
    fn nearest_uses_pixel_space_not_normalized_space() {
        // Normalized (0.1, 0.5) vs (0.5, 0.1): equidistant from (0,0) in
        // normalized space, but on a wide viewport the second is much farther.
        let m = model(
            vec![knot_at(1, 0.5, 0.1), knot_at(2, 0.1, 0.5)],
            4000.0,
            100.0,
        );
        assert_eq!(m.nearest_knot(DVec2::ZERO), Some(1));
    }

    #[test]
    fn grow_nearest_only_touches_nearest() {
        let mut m = model(
            vec![knot_at(1, 0.1, 0.1), knot_at(2, 0.9, 0.9)],
            1000.0,
            1000.0,
        );
        let before = m.knots()[1].clone();
        let idx = m.grow_nearest(DVec2::new(100.0, 100.0));
        assert_eq!(idx, Some(0));
        assert_eq!(m.knots()[0].sigma, 210.0);
        assert_eq!(m.knots()[0].radius, 96.0);
        assert_eq!(m.knots()[1], before);
    }

    #[test]
    fn grow_nearest_ignores_shrinking_state() {
        let mut m = model(vec![knot_at(1, 0.5, 0.5)], 100.0, 100.0);
        m.knots[0].growth = Growth::Shrinking;
        m.grow_nearest(DVec2::new(50.0, 50.0));
        assert_eq!(m.knots()[0].sigma, 210.0);
        assert_eq!(m.knots()[0].growth, Growth::Shrinking);
    }

    #[test]
    fn grow_or_shrink_applies_hysteresis_to_every_knot() {
        let mut m = model(
            vec![knot_at(1, 0.1, 0.1), knot_at(2, 0.9, 0.9)],
            1000.0,
            1000.0,
        );
        m.knots[1].sigma = 300.0;
        m.grow_or_shrink_nearest(DVec2::new(100.0, 100.0));
        // Far knot flipped but was not stepped.
        assert_eq!(m.knots()[1].growth, Growth::Shrinking);
        assert_eq!(m.knots()[1].sigma, 300.0);
        // Near knot grew.
        assert_eq!(m.knots()[0].sigma, 210.0);
    }

    #[test]
    fn grow_or_shrink_shrinks_from_ceiling() {
        let mut m = model(vec![knot_at(1, 0.5, 0.5)], 100.0, 100.0);
        m.knots[0].sigma = 300.0;
        m.grow_or_shrink_nearest(DVec2::new(50.0, 50.0));
        assert_eq!(m.knots()[0].growth, Growth::Shrinking);
        assert_eq!(m.knots()[0].sigma, 294.0);
    }

    #[test]
    fn hover_cycle_does_not_oscillate() {
        let mut m = model(vec![knot_at(1, 0.5, 0.5)], 100.0, 100.0);
        let p = DVec2::new(50.0, 50.0);
        let mut sigmas = vec![];
        for _ in 0..60 {
            m.grow_or_shrink_nearest(p);
            sigmas.push(m.knots()[0].sigma);
        }
        // Rises to 300, then falls monotonically to 140 before rising again.
        let peak = sigmas.iter().position(|&s| s == 300.0).unwrap();
        let trough = sigmas[peak..].iter().position(|&s| s == 140.0).unwrap() + peak;
        assert!(sigmas[..=peak].windows(2).all(|w| w[1] >= w[0]));
        assert!(sigmas[peak..=trough].windows(2).all(|w| w[1] <= w[0]));
        assert!(sigmas[trough + 1] > 140.0);
    }

    #[test]
    fn shrink_all_shrinks_every_knot() {
        let mut m = model(
            vec![knot_at(1, 0.1, 0.1), knot_at(2, 0.9, 0.9)],
            1000.0,
            1000.0,
        );
        m.shrink_all();
        assert!(m.knots().iter().all(|k| k.sigma == 194.0 && k.radius == 86.0));
    }

    #[test]
    fn shrink_all_on_empty_set_is_noop() {
        let mut m = model(vec![], 100.0, 100.0);
        m.shrink_all();
        assert!(m.knots().is_empty());
    }

    #[test]
    fn mutations_on_empty_set_are_noops() {
        let mut m = model(vec![], 100.0, 100.0);
        assert_eq!(m.grow_nearest(DVec2::ONE), None);
        assert_eq!(m.grow_or_shrink_nearest(DVec2::ONE), None);
    }

    #[test]
    fn resize_scales_pixel_positions_only() {
        let mut m = model(vec![knot_at(1, 0.25, 0.5)], 1000.0, 800.0);
        assert_eq!(m.pixel_knots()[0].center, DVec2::new(250.0, 400.0));
        m.set_viewport(Viewport::new(2000.0, 400.0).unwrap());
        assert_eq!(m.pixel_knots()[0].center, DVec2::new(500.0, 200.0));
        assert_eq!(m.knots()[0].position, DVec2::new(0.25, 0.5));
    }

    #[test]
    fn cursor_set_and_clear() {
        let mut m = FieldModel::default();
        assert_eq!(m.cursor(), None);
        m.set_cursor(DVec2::new(3.0, 4.0));
        assert_eq!(m.cursor(), Some(DVec2::new(3.0, 4.0)));
        m.clear_cursor();
        assert_eq!(m.cursor(), None);
    }

    #[test]
    fn default_model_clamps_seed_knots() {
        let m = FieldModel::default();
        assert_eq!(m.knots().len(), 3);
        assert!(m.knots().iter().all(|k| k.within(&m.tuning().bounds)));
    }
}
