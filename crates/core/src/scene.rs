//! Vector scene for the background and its SVG serialization.
//!
//! Layers, bottom to top: walnut fill, warm sheen gradient, faint knot rings,
//! grain lines, vertical striations. The document is decorative only: it is
//! hidden from assistive technology and ignores pointer events.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::color::Rgba;
use crate::field::Viewport;
use crate::grain::GrainLine;
use crate::knot::PixelKnot;

/// Default number of vertical striation lines.
pub const DEFAULT_STRIATIONS: usize = 12;

/// Colors and stroke widths for every layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: Rgba,
    pub sheen_start: Rgba,
    pub sheen_end: Rgba,
    pub ring_stroke: Rgba,
    pub ring_width: f64,
    pub ring_opacity: f64,
    pub grain_stroke: Rgba,
    pub grain_width: f64,
    pub striation_stroke: Rgba,
    pub striation_width: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgba::from_u8(0x2a, 0x1c, 0x15, 1.0),
            sheen_start: Rgba::from_u8(255, 210, 160, 0.05),
            sheen_end: Rgba::from_u8(0, 0, 0, 0.55),
            ring_stroke: Rgba::from_u8(0, 0, 0, 0.35),
            ring_width: 1.0,
            ring_opacity: 0.25,
            grain_stroke: Rgba::from_u8(0, 0, 0, 0.65),
            grain_width: 2.5,
            striation_stroke: Rgba::from_u8(0, 0, 0, 0.25),
            striation_width: 1.5,
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    pub knots: Vec<PixelKnot>,
    pub paths: Vec<String>,
    pub striations: Vec<f64>,
    pub theme: Theme,
}

/// Evenly spaced x positions strictly inside the viewport: `w * (i + 1) / (n + 1)`.
pub fn striation_xs(width: f64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| width * (i + 1) as f64 / (count + 1) as f64)
        .collect()
}

impl Scene {
    pub fn new(
        viewport: Viewport,
        knots: Vec<PixelKnot>,
        lines: &[GrainLine],
        striations: usize,
        theme: Theme,
    ) -> Self {
        Self {
            viewport,
            knots,
            paths: lines.iter().map(GrainLine::path_data).collect(),
            striations: striation_xs(viewport.width(), striations),
            theme,
        }
    }

    /// Serializes the scene as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let w = self.viewport.width();
        let h = self.viewport.height();
        let t = &self.theme;
        let mut s = String::with_capacity(256 + self.paths.iter().map(String::len).sum::<usize>());

        // Writing into a String cannot fail.
        let _ = write!(
            s,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" aria-hidden="true" focusable="false" style="position:fixed;inset:0;z-index:-1;pointer-events:none;background:{bg}">"#,
            bg = t.background,
        );
        let _ = write!(
            s,
            r#"<defs><linearGradient id="sheen" x1="0" y1="0" x2="1" y2="1"><stop offset="0%" stop-color="{}"/><stop offset="100%" stop-color="{}"/></linearGradient></defs>"#,
            t.sheen_start, t.sheen_end,
        );
        let _ = write!(
            s,
            r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{}"/><rect x="0" y="0" width="{w}" height="{h}" fill="url(#sheen)"/>"#,
            t.background,
        );

        s.push_str("<g>");
        for k in &self.knots {
            let _ = write!(
                s,
                r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="{}" opacity="{}"/>"#,
                k.center.x, k.center.y, k.radius, t.ring_stroke, t.ring_width, t.ring_opacity,
            );
        }
        s.push_str("</g>");

        let _ = write!(
            s,
            r#"<g stroke="{}" stroke-width="{}" fill="none" style="mix-blend-mode:multiply">"#,
            t.grain_stroke, t.grain_width,
        );
        for d in &self.paths {
            let _ = write!(s, r#"<path d="{d}"/>"#);
        }
        s.push_str("</g>");

        let _ = write!(
            s,
            r#"<g stroke="{}" stroke-width="{}" style="mix-blend-mode:multiply">"#,
            t.striation_stroke, t.striation_width,
        );
        for x in &self.striations {
            let _ = write!(s, r#"<line x1="{x}" y1="0" x2="{x}" y2="{h}"/>"#);
        }
        s.push_str("</g></svg>");
        s
    }
}
