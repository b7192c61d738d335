//! Browser entry points.
//!
//! Built with the `wasm` feature and loaded as an ES module by the rendered
//! page:
//!
//! ```js
//! import init, { start } from "./pkg/gallery_lightbox.js";
//! await init();
//! start();
//! ```
//!
//! `start` resolves every card's preview and wires the lightbox: clicks on
//! zoomable surfaces open it; the close control, a click on the backdrop and
//! Escape close it; viewport resizes refit it. [`reset`] detaches everything
//! so `start` can run again.

mod overlay;
mod probe;

use std::cell::RefCell;
use std::rc::Rc;

use gloo::console;
use gloo::events::EventListener;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, KeyboardEvent, NodeList, Window};

use crate::config::{ConfigError, GalleryConfig};
use crate::geometry::{Rect, Viewport};
use crate::lightbox::{LightboxController, SourceSurface};

pub use overlay::{DomAnimation, DomOverlay, SharedController};
pub use probe::{CardProbe, DomSurface};

#[derive(Error, Debug)]
pub enum WebError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("required element {0:?} not found")]
    MissingElement(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("DOM error: {0}")]
    Dom(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        WebError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

thread_local! {
    static GALLERY: RefCell<Option<Gallery>> = const { RefCell::new(None) };
}

/// Everything `start` attached to the page.
struct Gallery {
    controller: SharedController,
    _probes: Vec<CardProbe>,
    _listeners: Vec<EventListener>,
}

impl Drop for Gallery {
    fn drop(&mut self) {
        if let Ok(mut controller) = self.controller.try_borrow_mut() {
            controller.reset();
        }
    }
}

/// Start with the stock configuration.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    install(GalleryConfig::default())?;
    Ok(())
}

/// Start with a JSON configuration (same structure as `config.toml`).
#[wasm_bindgen]
pub fn start_with_config(json: &str) -> Result<(), JsValue> {
    let config = GalleryConfig::from_json(json).map_err(WebError::from)?;
    install(config)?;
    Ok(())
}

/// Close the lightbox and detach every listener, timer and probe.
#[wasm_bindgen]
pub fn reset() {
    let previous = GALLERY.with(|slot| slot.borrow_mut().take());
    drop(previous);
}

fn install(config: GalleryConfig) -> Result<(), WebError> {
    console_error_panic_hook::set_once();
    reset();

    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoDocument)?;

    let overlay = required(&document, &config.selectors.overlay)?;
    let card = required(&document, &config.selectors.overlay_card)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| WebError::MissingElement(config.selectors.overlay_card.clone()))?;

    let controller: SharedController = Rc::new_cyclic(|weak| {
        RefCell::new(LightboxController::new(
            DomOverlay::new(overlay, card, weak.clone()),
            config.lightbox.clone(),
        ))
    });

    let probes = resolve_all_cards(&document, &config)?;
    let listeners = bind_lightbox(&window, &document, &controller, &config)?;
    console::debug!(format!(
        "gallery: probing {} cards, {} listeners",
        probes.len(),
        listeners.len()
    ));

    GALLERY.with(|slot| {
        *slot.borrow_mut() = Some(Gallery {
            controller,
            _probes: probes,
            _listeners: listeners,
        })
    });
    Ok(())
}

fn required(document: &Document, selector: &str) -> Result<Element, WebError> {
    document
        .query_selector(selector)?
        .ok_or_else(|| WebError::MissingElement(selector.to_string()))
}

fn elements(list: NodeList) -> impl Iterator<Item = Element> {
    (0..list.length())
        .filter_map(move |i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
}

// ============================================================================
// Asset resolution
// ============================================================================

/// Start a probe for every card with a surface and a numbered caption.
fn resolve_all_cards(document: &Document, config: &GalleryConfig) -> Result<Vec<CardProbe>, WebError> {
    let selectors = &config.selectors;
    let mut probes = Vec::new();
    for card in elements(document.query_selector_all(&selectors.cards)?) {
        let Ok(Some(surface)) = card.query_selector(&selectors.surface) else {
            continue;
        };
        let caption = card
            .query_selector(&selectors.caption)
            .ok()
            .flatten()
            .and_then(|caption| caption.text_content())
            .unwrap_or_default();
        if let Some(probe) = CardProbe::start(document, surface, &caption, config) {
            probes.push(probe);
        }
    }
    Ok(probes)
}

// ============================================================================
// Lightbox wiring
// ============================================================================

fn bind_lightbox(
    window: &Window,
    document: &Document,
    controller: &SharedController,
    config: &GalleryConfig,
) -> Result<Vec<EventListener>, WebError> {
    let mut listeners = Vec::new();

    for surface in elements(document.query_selector_all(&config.selectors.zoomable)?) {
        let controller = Rc::clone(controller);
        let window = window.clone();
        let source = surface.clone();
        listeners.push(EventListener::new(&surface, "click", move |_| {
            let captured = capture_source(&window, &source);
            controller
                .borrow_mut()
                .open_from(&captured, viewport(&window), prefers_reduced_motion(&window));
        }));
    }

    if let Some(close) = document.query_selector(&config.selectors.close)? {
        let controller = Rc::clone(controller);
        listeners.push(EventListener::new(&close, "click", move |_| {
            controller.borrow_mut().close();
        }));
    }

    let overlay = controller.borrow().overlay().element().clone();
    {
        let controller = Rc::clone(controller);
        let backdrop = overlay.clone();
        listeners.push(EventListener::new(&overlay, "click", move |event| {
            // Clicks inside the card bubble up with a different target
            let on_backdrop = event
                .target()
                .is_some_and(|target| js_sys::Object::is(&target, &backdrop));
            if on_backdrop {
                controller.borrow_mut().close();
            }
        }));
    }

    {
        let controller = Rc::clone(controller);
        listeners.push(EventListener::new(document, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if event.key() == "Escape" && controller.borrow().state().is_open() {
                controller.borrow_mut().close();
            }
        }));
    }

    {
        let controller = Rc::clone(controller);
        let resized = window.clone();
        listeners.push(EventListener::new(window, "resize", move |_| {
            controller.borrow_mut().handle_resize(viewport(&resized));
        }));
    }

    Ok(listeners)
}

/// Read what the controller needs from a clicked surface.
fn capture_source(window: &Window, surface: &Element) -> SourceSurface {
    let bounds = surface.get_bounding_client_rect();
    let natural_size = surface
        .query_selector("img")
        .ok()
        .flatten()
        .and_then(|img| img.dyn_into::<HtmlImageElement>().ok())
        .map(|img| (img.natural_width(), img.natural_height()));
    let declared_ratio = window
        .get_computed_style(surface)
        .ok()
        .flatten()
        .and_then(|style| style.get_property_value("aspect-ratio").ok());
    let class_list = surface.class_list();
    let classes = (0..class_list.length())
        .filter_map(|i| class_list.item(i))
        .collect();

    SourceSurface {
        rect: Rect::new(bounds.left(), bounds.top(), bounds.width(), bounds.height()),
        natural_size,
        declared_ratio,
        classes,
        content: surface.inner_html(),
    }
}

fn viewport(window: &Window) -> Viewport {
    let dimension = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(dimension(window.inner_width()), dimension(window.inner_height()))
}

fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches())
}
