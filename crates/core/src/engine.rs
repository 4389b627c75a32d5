//! The woodgrain background as one stateful unit.
//!
//! [`WoodgrainEngine`] owns the field model and input policy, applies host
//! events, and hands out a [`Scene`] that is recomputed only when the
//! viewport or the knots differ from the last one built.

use serde_json::{json, Value};

use crate::config::WoodgrainConfig;
use crate::error::WoodgrainError;
use crate::field::{FieldModel, Viewport};
use crate::field_source::KnotField;
use crate::grain::{generate_lines, GrainLine};
use crate::input::{apply_event, InputEvent};
use crate::knot::Knot;
use crate::scene::Scene;

/// Inputs the scene is derived from.
#[derive(Debug, Clone, PartialEq)]
struct SceneKey {
    viewport: Viewport,
    knots: Vec<Knot>,
}

pub struct WoodgrainEngine {
    config: WoodgrainConfig,
    model: FieldModel,
    cache: Option<(SceneKey, Scene)>,
    rebuilds: usize,
}

impl WoodgrainEngine {
    /// Returns the config's validation error if it is not usable.
    pub fn new(config: WoodgrainConfig) -> Result<Self, WoodgrainError> {
        config.validate()?;
        let model = config.field_model();
        Ok(Self {
            config,
            model,
            cache: None,
            rebuilds: 0,
        })
    }

    pub fn config(&self) -> &WoodgrainConfig {
        &self.config
    }

    pub fn model(&self) -> &FieldModel {
        &self.model
    }

    /// Number of times the scene has been rebuilt.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Applies one host event; true when the scene inputs may have changed.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        let changed = apply_event(&mut self.model, &self.config.policy, event);
        log::trace!("{event:?} -> changed={changed}");
        changed
    }

    /// Grain lines for the current state, computed fresh.
    pub fn lines(&self) -> Vec<GrainLine> {
        let knots = self.model.pixel_knots();
        let field = KnotField::new(&knots, self.config.weights);
        generate_lines(self.model.viewport(), &self.config.grain, &field)
    }

    /// The scene for the current state, rebuilt only if viewport or knots
    /// changed since the last call.
    pub fn scene(&mut self) -> &Scene {
        let key = SceneKey {
            viewport: self.model.viewport(),
            knots: self.model.knots().to_vec(),
        };
        let entry = match self.cache.take() {
            Some((cached, scene)) if cached == key => (cached, scene),
            _ => {
                let scene = Scene::new(
                    key.viewport,
                    self.model.pixel_knots(),
                    &self.lines(),
                    self.config.striations,
                    self.config.theme.clone(),
                );
                self.rebuilds += 1;
                log::debug!(
                    "rebuilt scene {}x{} ({} paths)",
                    key.viewport.width(),
                    key.viewport.height(),
                    scene.paths.len()
                );
                (key, scene)
            }
        };
        &self.cache.insert(entry).1
    }

    /// Current knot state as JSON.
    pub fn knots_json(&self) -> Value {
        json!({
            "viewport": self.model.viewport(),
            "cursor": self.model.cursor().map(|c| [c.x, c.y]),
            "knots": self.model.knots(),
        })
    }

    /// Current tunables as a flat JSON object.
    pub fn params(&self) -> Value {
        json!({
            "rows": self.config.grain.rows,
            "samples": self.config.grain.samples,
            "margin": self.config.grain.margin,
            "striations": self.config.striations,
            "mouse_move": self.config.policy.mouse_move,
            "touch_move": self.config.policy.touch_move,
            "shrink_on_leave": self.config.policy.shrink_on_leave,
        })
    }

    /// Schema describing every flat parameter, its type, range and default.
    pub fn param_schema(&self) -> Value {
        let defaults = WoodgrainConfig::default();
        json!({
            "rows": {
                "type": "integer",
                "default": defaults.grain.rows,
                "min": 1,
                "description": "Number of grain lines"
            },
            "samples": {
                "type": "integer",
                "default": defaults.grain.samples,
                "min": 1,
                "description": "Points per grain line"
            },
            "margin": {
                "type": "number",
                "default": defaults.grain.margin,
                "min": 0.0,
                "description": "Inset from the viewport edges in pixels"
            },
            "striations": {
                "type": "integer",
                "default": defaults.striations,
                "min": 0,
                "description": "Number of vertical striation lines"
            },
            "mouse_move": {
                "type": "string",
                "default": defaults.policy.mouse_move,
                "enum": ["grow", "hysteresis"],
                "description": "Knot update on mouse movement"
            },
            "touch_move": {
                "type": "string",
                "default": defaults.policy.touch_move,
                "enum": ["grow", "hysteresis"],
                "description": "Knot update on touch movement"
            },
            "shrink_on_leave": {
                "type": "boolean",
                "default": defaults.policy.shrink_on_leave,
                "description": "Shrink all knots when the pointer leaves or a touch ends"
            }
        })
    }
}
