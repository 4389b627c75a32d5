#![deny(unsafe_code)]
//! Core of the woodgrain background: an animated field of grain lines that
//! bend around simulated wood knots and react to the pointer.
//!
//! Provides the `Knot` model and its grow/shrink hysteresis, the knot
//! displacement field (`FieldSource`, `KnotField`), the `FieldModel` that
//! input events mutate, grain line generation, scoped listener
//! registration, and the SVG `Scene` handed to the page.

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod field_source;
pub mod grain;
pub mod input;
pub mod knot;
pub mod mount;
pub mod params;
pub mod scene;

pub use color::Rgba;
pub use config::WoodgrainConfig;
pub use engine::WoodgrainEngine;
pub use error::WoodgrainError;
pub use field::{FieldModel, Viewport};
pub use field_source::{DisplacementWeights, FieldSource, KnotField};
pub use grain::{GrainLine, GrainParams};
pub use input::{EventKind, InputEvent, InputPolicy, MoveResponse};
pub use knot::{Growth, Knot, KnotTuning, PixelKnot};
pub use mount::{ListenerHost, Subscriptions};
pub use scene::{Scene, Theme};
