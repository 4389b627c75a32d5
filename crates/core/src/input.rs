//! Input controller: translates host UI events into field model updates.
//!
//! The default [`InputPolicy`] reproduces the established behavior exactly,
//! including its asymmetries: mouse movement steps the nearest knot through
//! the hysteresis machine while touch movement always grows it, and shrinking
//! happens on pointer press/release rather than when the pointer leaves.
//! Leave and touch-end events are only acted on when `shrink_on_leave` is set.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::WoodgrainError;
use crate::field::{FieldModel, Viewport};
use crate::params::{param_bool, param_choice};

/// A host UI event, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Resize { width: f64, height: f64 },
    PointerMove { x: f64, y: f64 },
    /// First active touch point, if any.
    TouchMove { touch: Option<DVec2> },
    PointerDown,
    PointerUp,
    PointerLeave,
    TouchEnd,
}

impl InputEvent {
    /// Parses one tagged event, e.g. `{"type": "pointer_move", "x": 1, "y": 2}`.
    pub fn from_json_str(s: &str) -> Result<Self, WoodgrainError> {
        serde_json::from_str(s).map_err(|e| WoodgrainError::InvalidConfig(format!("bad event: {e}")))
    }
}

/// Window-level event the host must listen to for the component's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Resize,
    MouseMove,
    MouseDown,
    MouseUp,
    MouseLeave,
    TouchMove,
    TouchEnd,
}

impl EventKind {
    /// Everything the background reacts to.
    pub const ALL: [EventKind; 7] = [
        EventKind::Resize,
        EventKind::MouseMove,
        EventKind::MouseDown,
        EventKind::MouseUp,
        EventKind::MouseLeave,
        EventKind::TouchMove,
        EventKind::TouchEnd,
    ];

    /// DOM event type name.
    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::Resize => "resize",
            EventKind::MouseMove => "mousemove",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseUp => "mouseup",
            EventKind::MouseLeave => "mouseleave",
            EventKind::TouchMove => "touchmove",
            EventKind::TouchEnd => "touchend",
        }
    }

    /// Kinds worth subscribing to under `policy`.
    pub fn for_policy(policy: &InputPolicy) -> Vec<EventKind> {
        Self::ALL
            .into_iter()
            .filter(|k| {
                policy.shrink_on_leave || !matches!(k, EventKind::MouseLeave | EventKind::TouchEnd)
            })
            .collect()
    }
}

/// How a move event updates the nearest knot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveResponse {
    /// Always grow.
    Grow,
    /// Grow or shrink depending on the knot's hysteresis state.
    Hysteresis,
}

impl MoveResponse {
    const CHOICES: [(&'static str, MoveResponse); 2] = [
        ("grow", MoveResponse::Grow),
        ("hysteresis", MoveResponse::Hysteresis),
    ];
}

/// Which knot update each event triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPolicy {
    pub mouse_move: MoveResponse,
    pub touch_move: MoveResponse,
    /// Treat pointer-leave and touch-end like pointer release.
    pub shrink_on_leave: bool,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            mouse_move: MoveResponse::Hysteresis,
            touch_move: MoveResponse::Grow,
            shrink_on_leave: false,
        }
    }
}

impl InputPolicy {
    /// Overlays `mouse_move`, `touch_move` and `shrink_on_leave` from JSON.
    pub fn with_json(self, params: &serde_json::Value) -> Self {
        Self {
            mouse_move: param_choice(params, "mouse_move", &MoveResponse::CHOICES, self.mouse_move),
            touch_move: param_choice(params, "touch_move", &MoveResponse::CHOICES, self.touch_move),
            shrink_on_leave: param_bool(params, "shrink_on_leave", self.shrink_on_leave),
        }
    }
}

fn respond(model: &mut FieldModel, response: MoveResponse, point: DVec2) -> bool {
    model.set_cursor(point);
    let stepped = match response {
        MoveResponse::Grow => model.grow_nearest(point),
        MoveResponse::Hysteresis => model.grow_or_shrink_nearest(point),
    };
    stepped.is_some()
}

fn release(model: &mut FieldModel) -> bool {
    model.clear_cursor();
    model.shrink_all();
    !model.knots().is_empty()
}

/// Applies one event to `model`.
///
/// Returns true when the viewport or any knot may have changed, i.e. when
/// derived geometry needs recomputing. Cursor-only changes return false.
pub fn apply_event(model: &mut FieldModel, policy: &InputPolicy, event: &InputEvent) -> bool {
    match *event {
        InputEvent::Resize { width, height } => match Viewport::new(width, height) {
            Ok(viewport) => {
                let changed = viewport != model.viewport();
                model.set_viewport(viewport);
                changed
            }
            Err(e) => {
                log::warn!("ignoring resize: {e}");
                false
            }
        },
        InputEvent::PointerMove { x, y } => respond(model, policy.mouse_move, DVec2::new(x, y)),
        InputEvent::TouchMove { touch: Some(p) } => respond(model, policy.touch_move, p),
        InputEvent::TouchMove { touch: None } => false,
        InputEvent::PointerDown | InputEvent::PointerUp => release(model),
        InputEvent::PointerLeave | InputEvent::TouchEnd => {
            if policy.shrink_on_leave {
                release(model)
            } else {
                false
            }
        }
    }
}
