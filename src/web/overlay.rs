//! The lightbox overlay in the DOM.
//!
//! [`DomOverlay`] writes what the controller decides onto the `#lightbox`
//! container and its `.lightbox-card`, and runs the entry animation with the
//! Web Animations API. The animation's `finish` event is routed back to the
//! controller with the ticket it was started under.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::console;
use gloo::events::EventListener;
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Animation, Element, HtmlElement};

use crate::geometry::{Rect, Transform};
use crate::lightbox::{AnimationTicket, LightboxController, OverlayView, Presentation, Timing};

pub type SharedController = Rc<RefCell<LightboxController<DomOverlay>>>;

/// A running entry animation and its finish listener.
pub struct DomAnimation {
    animation: Option<Animation>,
    _on_finish: Option<EventListener>,
}

pub struct DomOverlay {
    overlay: Element,
    card: HtmlElement,
    controller: Weak<RefCell<LightboxController<DomOverlay>>>,
    /// Last naturally finished animation. Its listener is still on the call
    /// stack when the controller releases it, so it is dropped on the next
    /// release instead.
    spent: Option<DomAnimation>,
}

impl DomOverlay {
    pub fn new(
        overlay: Element,
        card: HtmlElement,
        controller: Weak<RefCell<LightboxController<DomOverlay>>>,
    ) -> Self {
        Self {
            overlay,
            card,
            controller,
            spent: None,
        }
    }

    pub fn element(&self) -> &Element {
        &self.overlay
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Err(err) = self.card.style().set_property(property, value) {
            console::debug!("lightbox: could not set", property, err);
        }
    }
}

impl OverlayView for DomOverlay {
    type Animation = DomAnimation;

    fn present(&mut self, presentation: &Presentation) {
        self.card.set_class_name(&presentation.class_name);
        self.card.set_inner_html(&presentation.content);
    }

    fn set_size(&mut self, rect: &Rect) {
        self.set_style("width", &format!("{}px", rect.width));
        self.set_style("height", &format!("{}px", rect.height));
    }

    fn set_open(&mut self, open: bool) {
        let classes = self.overlay.class_list();
        let toggled = if open {
            classes.add_1("open")
        } else {
            classes.remove_1("open")
        };
        let hidden = self
            .overlay
            .set_attribute("aria-hidden", if open { "false" } else { "true" });
        if let Err(err) = toggled.and(hidden) {
            console::debug!("lightbox: could not toggle overlay", err);
        }
    }

    fn set_transform(&mut self, transform: Option<&Transform>) {
        match transform {
            Some(t) => self.set_style("transform", &t.to_css()),
            None => self.set_style("transform", "none"),
        }
    }

    fn set_motion_hint(&mut self, active: bool) {
        if active {
            self.set_style("transform-origin", "top left");
            self.set_style("will-change", "transform");
        } else {
            self.set_style("will-change", "auto");
        }
    }

    fn commit_layout(&mut self) {
        self.card.get_bounding_client_rect();
    }

    fn play(&mut self, from: &Transform, timing: &Timing, ticket: AnimationTicket) -> DomAnimation {
        let animation = match animate(&self.card, from, timing) {
            Ok(animation) => animation,
            Err(err) => {
                // No Web Animations support: show the card where it belongs
                console::debug!("lightbox: animate failed", err);
                self.set_style("transform", "none");
                return DomAnimation {
                    animation: None,
                    _on_finish: None,
                };
            }
        };

        let controller = self.controller.clone();
        let on_finish = EventListener::once(&animation, "finish", move |_| {
            let Some(controller) = controller.upgrade() else {
                return;
            };
            if let Ok(mut controller) = controller.try_borrow_mut() {
                controller.finish(ticket);
            };
        });

        DomAnimation {
            animation: Some(animation),
            _on_finish: Some(on_finish),
        }
    }

    fn cancel(&mut self, animation: DomAnimation) {
        if let Some(running) = &animation.animation {
            running.cancel();
        }
    }

    fn release(&mut self, animation: DomAnimation) {
        self.spent = Some(animation);
    }
}

/// `card.animate(keyframes, options)`, called through `Reflect` like the
/// options object is built.
fn animate(card: &HtmlElement, from: &Transform, timing: &Timing) -> Result<Animation, JsValue> {
    let keyframes = Array::of2(
        &keyframe(&from.to_css())?.into(),
        &keyframe(&Transform::IDENTITY.to_css())?.into(),
    );

    let options = Object::new();
    Reflect::set(&options, &"duration".into(), &JsValue::from_f64(timing.duration_ms as f64))?;
    Reflect::set(&options, &"easing".into(), &JsValue::from_str(&timing.easing))?;
    Reflect::set(&options, &"fill".into(), &"forwards".into())?;

    let animate = Reflect::get(card, &"animate".into())?.dyn_into::<Function>()?;
    animate.call2(card, &keyframes, &options)?.dyn_into::<Animation>()
}

fn keyframe(transform: &str) -> Result<Object, JsValue> {
    let frame = Object::new();
    Reflect::set(&frame, &"transform".into(), &JsValue::from_str(transform))?;
    Ok(frame)
}
