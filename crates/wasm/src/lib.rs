#![deny(unsafe_code)]
//! WASM bindings that mount the woodgrain background into a page.
//!
//! `WoodgrainBackground` attaches its window listeners on construction and
//! detaches them on `unmount()` or when freed from JS, so a page can mount
//! and unmount the background any number of times without leaking handlers.

use glam::DVec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;
use woodgrain_core::{
    EventKind, InputEvent, ListenerHost, Subscriptions, WoodgrainConfig, WoodgrainEngine,
    WoodgrainError,
};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

fn to_js(e: WoodgrainError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Input is accepted only while listeners are attached.
fn check_mounted(mounted: bool) -> Result<(), &'static str> {
    if mounted {
        Ok(())
    } else {
        Err("background is unmounted")
    }
}

/// Engine plus the element its SVG is written into.
struct Mounted {
    engine: WoodgrainEngine,
    root: web::Element,
}

impl Mounted {
    fn dispatch(&mut self, event: &InputEvent) {
        if self.engine.handle(event) {
            self.render();
        }
    }

    fn render(&mut self) {
        let svg = self.engine.scene().to_svg();
        self.root.set_inner_html(&svg);
    }
}

fn window_size(window: &web::Window) -> Option<(f64, f64)> {
    let w = window.inner_width().ok()?.as_f64()?;
    let h = window.inner_height().ok()?.as_f64()?;
    Some((w, h))
}

/// Converts a DOM event into the matching input event.
fn translate(kind: EventKind, ev: &web::Event, window: &web::Window) -> Option<InputEvent> {
    match kind {
        EventKind::Resize => {
            let (width, height) = window_size(window)?;
            Some(InputEvent::Resize { width, height })
        }
        EventKind::MouseMove => {
            let m = ev.dyn_ref::<web::MouseEvent>()?;
            Some(InputEvent::PointerMove {
                x: m.client_x() as f64,
                y: m.client_y() as f64,
            })
        }
        EventKind::MouseDown => Some(InputEvent::PointerDown),
        EventKind::MouseUp => Some(InputEvent::PointerUp),
        EventKind::MouseLeave => Some(InputEvent::PointerLeave),
        EventKind::TouchMove => {
            let t = ev.dyn_ref::<web::TouchEvent>()?;
            let touch = t
                .touches()
                .get(0)
                .map(|p| DVec2::new(p.client_x() as f64, p.client_y() as f64));
            Some(InputEvent::TouchMove { touch })
        }
        EventKind::TouchEnd => Some(InputEvent::TouchEnd),
    }
}

/// The browser window as a listener host for one mounted background.
struct WindowHost {
    window: web::Window,
    state: Rc<RefCell<Mounted>>,
}

struct Registration {
    kind: EventKind,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl ListenerHost for WindowHost {
    type Handle = Registration;

    fn attach(&self, kind: EventKind) -> Result<Registration, WoodgrainError> {
        let state = self.state.clone();
        let window = self.window.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::Event| {
            let Some(input) = translate(kind, &ev, &window) else {
                return;
            };
            match state.try_borrow_mut() {
                Ok(mut mounted) => mounted.dispatch(&input),
                Err(_) => log::warn!("dropped {} during another update", kind.dom_name()),
            }
        }) as Box<dyn FnMut(web::Event)>);
        self.window
            .add_event_listener_with_callback(kind.dom_name(), closure.as_ref().unchecked_ref())
            .map_err(|e| {
                WoodgrainError::Io(format!("addEventListener({}) failed: {e:?}", kind.dom_name()))
            })?;
        Ok(Registration { kind, closure })
    }

    fn detach(&self, reg: Registration) {
        if let Err(e) = self.window.remove_event_listener_with_callback(
            reg.kind.dom_name(),
            reg.closure.as_ref().unchecked_ref(),
        ) {
            log::warn!("removeEventListener({}) failed: {e:?}", reg.kind.dom_name());
        }
    }
}

/// A woodgrain background mounted into a container element.
#[wasm_bindgen]
pub struct WoodgrainBackground {
    state: Rc<RefCell<Mounted>>,
    subs: Option<Subscriptions<WindowHost>>,
}

#[wasm_bindgen]
impl WoodgrainBackground {
    /// Mounts into the element with id `container_id`, rendering immediately
    /// at the current window size. `config_json` may be omitted for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container_id: &str,
        config_json: Option<String>,
    ) -> Result<WoodgrainBackground, JsValue> {
        let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let root = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{container_id}")))?;

        let config = match config_json {
            Some(text) => WoodgrainConfig::from_json_str(&text).map_err(to_js)?,
            None => WoodgrainConfig::default(),
        };
        let kinds = EventKind::for_policy(&config.policy);
        let engine = WoodgrainEngine::new(config).map_err(to_js)?;
        let state = Rc::new(RefCell::new(Mounted { engine, root }));

        {
            let mut mounted = state.borrow_mut();
            if let Some((width, height)) = window_size(&window) {
                mounted.dispatch(&InputEvent::Resize { width, height });
            }
            mounted.render();
        }

        let host = WindowHost {
            window,
            state: state.clone(),
        };
        let subs = Subscriptions::attach(host, &kinds).map_err(to_js)?;
        log::info!("woodgrain mounted into #{container_id}");
        Ok(WoodgrainBackground {
            state,
            subs: Some(subs),
        })
    }

    /// Detaches every listener and clears the container. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(subs) = self.subs.take() {
            subs.detach_all();
            if let Ok(mounted) = self.state.try_borrow() {
                mounted.root.set_inner_html("");
            }
            log::info!("woodgrain unmounted");
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.subs.is_some()
    }

    /// Applies one JSON-encoded input event, e.g. `{"type":"pointer_down"}`.
    /// Fails once the background has been unmounted.
    pub fn dispatch(&self, event_json: &str) -> Result<(), JsValue> {
        check_mounted(self.subs.is_some()).map_err(JsValue::from_str)?;
        let event = InputEvent::from_json_str(event_json).map_err(to_js)?;
        self.state
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("background is busy"))?
            .dispatch(&event);
        Ok(())
    }

    /// Current knot state as a JSON string.
    pub fn knots(&self) -> Result<String, JsValue> {
        let mounted = self
            .state
            .try_borrow()
            .map_err(|_| JsValue::from_str("background is busy"))?;
        Ok(mounted.engine.knots_json().to_string())
    }
}

impl Drop for WoodgrainBackground {
    fn drop(&mut self) {
        self.unmount();
    }
}
