//! Grain line generation.
//!
//! Each grain line starts as a horizontal scanline sampled at evenly spaced
//! x positions; every sample is pushed by a [`FieldSource`] and consecutive
//! samples are joined into one polyline.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::field::Viewport;
use crate::field_source::FieldSource;
use crate::params::{param_f64, param_usize};

/// Default number of grain lines.
const DEFAULT_ROWS: usize = 30;
/// Default number of samples per line.
const DEFAULT_SAMPLES: usize = 180;
/// Default inset from the viewport edges, in pixels.
const DEFAULT_MARGIN: f64 = 0.0;

/// Sampling resolution of the grain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrainParams {
    pub rows: usize,
    pub samples: usize,
    pub margin: f64,
}

impl Default for GrainParams {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            samples: DEFAULT_SAMPLES,
            margin: DEFAULT_MARGIN,
        }
    }
}

impl GrainParams {
    /// Overlays `rows`, `samples` and `margin` from a JSON object onto `self`.
    pub fn with_json(self, params: &serde_json::Value) -> Self {
        Self {
            rows: param_usize(params, "rows", self.rows),
            samples: param_usize(params, "samples", self.samples),
            margin: param_f64(params, "margin", self.margin),
        }
    }
}

/// One displaced scanline.
#[derive(Debug, Clone, PartialEq)]
pub struct GrainLine {
    pub points: Vec<DVec2>,
}

impl GrainLine {
    /// SVG path data: a move to the first point then a line to each of the
    /// rest, coordinates at one decimal.
    pub fn path_data(&self) -> String {
        let mut d = String::with_capacity(self.points.len() * 14);
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                d.push(' ');
            }
            let cmd = if i == 0 { 'M' } else { 'L' };
            // Writing into a String cannot fail.
            let _ = write!(d, "{cmd}{:.1},{:.1}", p.x, p.y);
        }
        d
    }
}

/// Position of step `i` of `n` across `[start, start + span]`, inclusive of
/// both ends. A single step sits in the middle.
fn spread(i: usize, n: usize, start: f64, span: f64) -> f64 {
    if n <= 1 {
        start + span * 0.5
    } else {
        start + span * i as f64 / (n - 1) as f64
    }
}

/// Undisplaced y of every row.
pub fn row_baselines(viewport: Viewport, params: &GrainParams) -> Vec<f64> {
    let span = viewport.height() - params.margin * 2.0;
    (0..params.rows)
        .map(|r| spread(r, params.rows, params.margin, span))
        .collect()
}

/// Generates `params.rows` displaced lines of `params.samples` points each.
pub fn generate_lines(
    viewport: Viewport,
    params: &GrainParams,
    field: &dyn FieldSource,
) -> Vec<GrainLine> {
    let span_x = viewport.width() - params.margin * 2.0;
    row_baselines(viewport, params)
        .into_iter()
        .map(|base_y| {
            let points = (0..params.samples)
                .map(|i| {
                    let p = DVec2::new(spread(i, params.samples, params.margin, span_x), base_y);
                    p + field.sample(p)
                })
                .collect();
            GrainLine { points }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_source::{DisplacementWeights, KnotField};
    use crate::knot::PixelKnot;
    use serde_json::json;

    struct Still;

    impl FieldSource for Still {
        fn sample(&self, _point: DVec2) -> DVec2 {
            DVec2::ZERO
        }
    }

    struct Shift(DVec2);

    impl FieldSource for Shift {
        fn sample(&self, _point: DVec2) -> DVec2 {
            self.0
        }
    }

    fn viewport(w: f64, h: f64) -> Viewport {
        Viewport::new(w, h).unwrap()
    }

    #[test]
    fn default_params_are_30_rows_180_samples() {
        let p = GrainParams::default();
        assert_eq!((p.rows, p.samples, p.margin), (30, 180, 0.0));
    }

    #[test]
    fn rows_span_full_height_inclusive() {
        let ys = row_baselines(viewport(1200.0, 800.0), &GrainParams::default());
        assert_eq!(ys.len(), 30);
        assert_eq!(ys[0], 0.0);
        assert_eq!(ys[29], 800.0);
    }

    #[test]
    fn single_row_is_centered() {
        let params = GrainParams {
            rows: 1,
            ..GrainParams::default()
        };
        let ys = row_baselines(viewport(1200.0, 800.0), &params);
        assert_eq!(ys, vec![400.0]);
    }

    #[test]
    fn zero_rows_yields_no_lines() {
        let params = GrainParams {
            rows: 0,
            ..GrainParams::default()
        };
        assert!(generate_lines(viewport(100.0, 100.0), &params, &Still).is_empty());
    }

    #[test]
    fn samples_span_full_width_without_displacement() {
        let lines = generate_lines(viewport(1200.0, 800.0), &GrainParams::default(), &Still);
        let first = &lines[0].points;
        assert_eq!(first.len(), 180);
        assert_eq!(first[0], DVec2::new(0.0, 0.0));
        assert_eq!(first[179], DVec2::new(1200.0, 0.0));
    }

    #[test]
    fn margin_insets_both_axes() {
        let params = GrainParams {
            rows: 3,
            samples: 3,
            margin: 10.0,
        };
        let lines = generate_lines(viewport(120.0, 80.0), &params, &Still);
        assert_eq!(lines[0].points[0], DVec2::new(10.0, 10.0));
        assert_eq!(lines[2].points[2], DVec2::new(110.0, 70.0));
        assert_eq!(lines[1].points[1], DVec2::new(60.0, 40.0));
    }

    #[test]
    fn displacement_is_added_to_each_sample() {
        let params = GrainParams {
            rows: 2,
            samples: 2,
            margin: 0.0,
        };
        let lines = generate_lines(viewport(10.0, 10.0), &params, &Shift(DVec2::new(1.0, -2.0)));
        assert_eq!(lines[1].points[1], DVec2::new(11.0, 8.0));
    }

    #[test]
    fn default_grid_produces_30_paths_of_180_pairs() {
        let knots = [PixelKnot {
            id: 1,
            center: DVec2::new(300.0, 280.0),
            radius: 90.0,
            sigma: 180.0,
            strength: 18.0,
        }];
        let field = KnotField::new(&knots, DisplacementWeights::default());
        let lines = generate_lines(viewport(1200.0, 800.0), &GrainParams::default(), &field);
        assert_eq!(lines.len(), 30);
        for line in &lines {
            let d = line.path_data();
            assert!(d.starts_with('M'));
            assert_eq!(d.matches('M').count(), 1);
            assert_eq!(d.matches('L').count(), 179);
            assert_eq!(d.split(' ').count(), 180);
            assert!(d.split(' ').all(|pair| pair[1..].split(',').count() == 2));
        }
    }

    #[test]
    fn path_data_rounds_to_one_decimal() {
        let line = GrainLine {
            points: vec![DVec2::new(1.234, 5.0), DVec2::new(10.06, -0.26)],
        };
        assert_eq!(line.path_data(), "M1.2,5.0 L10.1,-0.3");
    }

    #[test]
    fn empty_line_has_empty_path() {
        let line = GrainLine { points: vec![] };
        assert_eq!(line.path_data(), "");
    }

    #[test]
    fn with_json_overrides_known_keys_only() {
        let p = GrainParams::default().with_json(&json!({"rows": 12, "margin": 4.5, "samples": "x"}));
        assert_eq!(p.rows, 12);
        assert_eq!(p.samples, 180);
        assert_eq!(p.margin, 4.5);
    }
}
