//! Serializable configuration for a woodgrain background.
//!
//! Every field has a default, so `{}` is a valid config that reproduces the
//! stock background: a 1200x800 initial viewport, 30 lines of 180 samples,
//! three seed knots and the walnut theme.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::WoodgrainError;
use crate::field::{FieldModel, Viewport};
use crate::field_source::DisplacementWeights;
use crate::grain::GrainParams;
use crate::input::InputPolicy;
use crate::knot::{default_knots, Knot, KnotBounds, KnotTuning};
use crate::params::param_usize;
use crate::scene::{Theme, DEFAULT_STRIATIONS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WoodgrainConfig {
    pub viewport: Viewport,
    pub grain: GrainParams,
    pub knots: Vec<Knot>,
    pub tuning: KnotTuning,
    pub weights: DisplacementWeights,
    pub policy: InputPolicy,
    pub striations: usize,
    pub theme: Theme,
}

impl Default for WoodgrainConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            grain: GrainParams::default(),
            knots: default_knots(&KnotBounds::default()),
            tuning: KnotTuning::default(),
            weights: DisplacementWeights::default(),
            policy: InputPolicy::default(),
            striations: DEFAULT_STRIATIONS,
            theme: Theme::default(),
        }
    }
}

impl WoodgrainConfig {
    pub fn from_json_str(s: &str) -> Result<Self, WoodgrainError> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| WoodgrainError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values serde cannot: sampling counts, viewport, bounds,
    /// displacement epsilon and the seed knots.
    pub fn validate(&self) -> Result<(), WoodgrainError> {
        self.viewport.validate()?;
        if self.grain.rows == 0 {
            return Err(WoodgrainError::InvalidConfig("rows must be at least 1".into()));
        }
        if self.grain.samples == 0 {
            return Err(WoodgrainError::InvalidConfig("samples must be at least 1".into()));
        }
        if !self.grain.margin.is_finite() || self.grain.margin < 0.0 {
            return Err(WoodgrainError::InvalidConfig(format!(
                "margin must be finite and non-negative, got {}",
                self.grain.margin
            )));
        }
        let b = &self.tuning.bounds;
        for (name, range) in [("radius", b.radius), ("sigma", b.sigma), ("strength", b.strength)] {
            if !(range.min.is_finite() && range.max.is_finite() && range.min <= range.max) {
                return Err(WoodgrainError::InvalidConfig(format!(
                    "{name} bounds [{}, {}] are not an interval",
                    range.min, range.max
                )));
            }
        }
        if b.sigma.min <= 0.0 {
            return Err(WoodgrainError::InvalidConfig("sigma lower bound must be positive".into()));
        }
        let eps = self.weights.epsilon;
        if !(eps.is_finite() && eps > 0.0) {
            return Err(WoodgrainError::InvalidConfig(format!(
                "epsilon must be finite and positive, got {eps}"
            )));
        }
        let mut ids = HashSet::new();
        for knot in &self.knots {
            let p = knot.position;
            if !(p.is_finite() && (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)) {
                return Err(WoodgrainError::InvalidConfig(format!(
                    "knot {} position ({}, {}) is outside the unit square",
                    knot.id, p.x, p.y
                )));
            }
            if !ids.insert(knot.id) {
                return Err(WoodgrainError::InvalidConfig(format!(
                    "duplicate knot id {}",
                    knot.id
                )));
            }
        }
        Ok(())
    }

    /// Overlays flat JSON overrides (`rows`, `samples`, `margin`,
    /// `striations`, `mouse_move`, `touch_move`, `shrink_on_leave`).
    pub fn apply_params(&mut self, params: &serde_json::Value) {
        self.grain = self.grain.with_json(params);
        self.policy = self.policy.with_json(params);
        self.striations = param_usize(params, "striations", self.striations);
    }

    /// Builds the field model the config describes.
    pub fn field_model(&self) -> FieldModel {
        FieldModel::new(self.knots.clone(), self.viewport, self.tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MoveResponse;
    use glam::DVec2;
    use serde_json::json;

    #[test]
    fn empty_json_is_default_config() {
        let c = WoodgrainConfig::from_json_str("{}").unwrap();
        assert_eq!(c, WoodgrainConfig::default());
    }

    #[test]
    fn default_config_validates() {
        assert!(WoodgrainConfig::default().validate().is_ok());
    }

    #[test]
    fn json_round_trip() {
        let mut c = WoodgrainConfig::default();
        c.grain.rows = 12;
        c.policy.shrink_on_leave = true;
        let json = serde_json::to_string_pretty(&c).unwrap();
        let back = WoodgrainConfig::from_json_str(&json).unwrap();
        assert_eq!(c, back);
    }

    #[test]
    fn rejects_zero_rows() {
        let err = WoodgrainConfig::from_json_str(r#"{"grain": {"rows": 0}}"#).unwrap_err();
        assert!(err.to_string().contains("rows"));
    }

    #[test]
    fn rejects_zero_samples() {
        assert!(WoodgrainConfig::from_json_str(r#"{"grain": {"samples": 0}}"#).is_err());
    }

    #[test]
    fn rejects_negative_viewport() {
        let err = WoodgrainConfig::from_json_str(r#"{"viewport": {"width": -5, "height": 10}}"#)
            .unwrap_err();
        assert!(matches!(err, WoodgrainError::InvalidDimensions { .. }));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let mut c = WoodgrainConfig::default();
        c.tuning.bounds.radius.min = 200.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_epsilon() {
        for eps in ["0", "-1e-4"] {
            let json = format!(r#"{{"weights": {{"epsilon": {eps}}}}}"#);
            let err = WoodgrainConfig::from_json_str(&json).unwrap_err();
            assert!(err.to_string().contains("epsilon"), "{err}");
        }
        let mut c = WoodgrainConfig::default();
        c.weights.epsilon = f64::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_knot_outside_unit_square() {
        let err = WoodgrainConfig::from_json_str(
            r#"{"knots": [{"id": 1, "growth": "growing", "position": [2.0, -1.0], "radius": 100, "sigma": 200, "strength": 10}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unit square"), "{err}");
    }

    #[test]
    fn rejects_duplicate_knot_ids() {
        let mut c = WoodgrainConfig::default();
        c.knots[1].id = c.knots[0].id;
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate knot id"), "{err}");
    }

    #[test]
    fn field_model_keeps_positions_in_unit_square() {
        let mut c = WoodgrainConfig::default();
        c.knots[0].position = DVec2::new(2.0, -1.0);
        let m = c.field_model();
        assert_eq!(m.knots()[0].position, DVec2::new(1.0, 0.0));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            WoodgrainConfig::from_json_str("{rows"),
            Err(WoodgrainError::InvalidConfig(_))
        ));
    }

    #[test]
    fn accepts_custom_knots() {
        let c = WoodgrainConfig::from_json_str(
            r#"{"knots": [{"id": 7, "growth": "shrinking", "position": [0.5, 0.5], "radius": 100, "sigma": 200, "strength": 10}]}"#,
        )
        .unwrap();
        assert_eq!(c.knots.len(), 1);
        assert_eq!(c.knots[0].id, 7);
        assert_eq!(c.field_model().knots()[0].sigma, 200.0);
    }

    #[test]
    fn field_model_clamps_configured_knots() {
        let mut c = WoodgrainConfig::default();
        c.knots[0].sigma = 999.0;
        let m = c.field_model();
        assert_eq!(m.knots()[0].sigma, 300.0);
    }

    #[test]
    fn apply_params_overlays_flat_keys() {
        let mut c = WoodgrainConfig::default();
        c.apply_params(&json!({
            "rows": 40,
            "striations": 0,
            "touch_move": "hysteresis",
            "unknown": 1
        }));
        assert_eq!(c.grain.rows, 40);
        assert_eq!(c.grain.samples, 180);
        assert_eq!(c.striations, 0);
        assert_eq!(c.policy.touch_move, MoveResponse::Hysteresis);
        assert_eq!(c.policy.mouse_move, MoveResponse::Hysteresis);
    }
}
