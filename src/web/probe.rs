//! Event-driven probe driver for one card surface.
//!
//! Each attempt creates a detached preview element and listens for its
//! `load`/`error` events; document attempts also arm the probe timeout. The
//! first signal settles the attempt through [`ProbeSequence`], later ones are
//! ignored. A failed attempt's element is removed before the next is created.
//!
//! Document viewers only load once they are in the document, so a probing
//! `embed` is appended to the surface hidden and revealed on load.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::console;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element};

use crate::config::GalleryConfig;
use crate::naming::{self, AssetKind, Candidate};
use crate::probe::{Attempt, AttemptId, ProbeOutcome, ProbeSequence, Settlement, Step};
use crate::resolver::PreviewSurface;

/// Previews attached by an earlier resolution.
const PREVIEW_SELECTOR: &str = "img.paper-image, embed.paper-pdf, object.paper-pdf";

const PROBING_STYLE: &str = "visibility: hidden";

/// A card surface element.
pub struct DomSurface {
    element: Element,
}

impl DomSurface {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl PreviewSurface for DomSurface {
    type Preview = Element;

    fn clear_previews(&mut self) {
        let Ok(stale) = self.element.query_selector_all(PREVIEW_SELECTOR) else {
            return;
        };
        for i in 0..stale.length() {
            if let Some(preview) = stale.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                preview.remove();
            }
        }
    }

    fn set_marker(&mut self, kind: Option<AssetKind>) {
        let classes = self.element.class_list();
        let marked = classes
            .remove_2(AssetKind::Image.marker(), AssetKind::Document.marker())
            .and_then(|()| match kind {
                Some(kind) => classes.add_1(kind.marker()),
                None => Ok(()),
            });
        if let Err(err) = marked {
            console::debug!("probe: could not update surface marker", err);
        }
    }

    fn attach(&mut self, preview: Element) {
        let attached = preview
            .remove_attribute("style")
            .and_then(|()| self.element.append_child(&preview));
        if let Err(err) = attached {
            console::debug!("probe: could not attach preview", err);
        }
    }
}

/// The element and signal sources of one attempt.
struct LiveAttempt {
    element: Element,
    _on_load: EventListener,
    _on_error: EventListener,
    _timeout: Option<Timeout>,
}

struct ProbeState {
    document: Document,
    surface: DomSurface,
    caption: String,
    sequence: ProbeSequence,
    document_timeout_ms: u32,
    live: Option<LiveAttempt>,
    /// Last settled attempt. Kept until the next settlement because the
    /// listener that settled it is still running.
    spent: Option<LiveAttempt>,
}

impl ProbeState {
    fn park(&mut self, attempt: LiveAttempt) {
        self.spent = Some(attempt);
    }
}

/// Resolution in progress (or finished) for one card. Dropping it detaches
/// every listener and cancels a pending timeout.
pub struct CardProbe {
    state: Rc<RefCell<ProbeState>>,
}

impl CardProbe {
    /// Clear the surface and start probing the card named by `caption`.
    ///
    /// Returns `None`, leaving the surface untouched, when the caption has no
    /// usable project number.
    pub fn start(
        document: &Document,
        surface: Element,
        caption: &str,
        config: &GalleryConfig,
    ) -> Option<Self> {
        let identifier =
            naming::extract_identifier(caption).filter(|&id| naming::is_card_identifier(id))?;

        let mut surface = DomSurface::new(surface);
        surface.clear_previews();
        surface.set_marker(None);

        let base = naming::candidate_base(&config.asset_dir, identifier);
        let (sequence, step) = ProbeSequence::start(naming::candidates(&base, &config.extensions));

        let state = Rc::new(RefCell::new(ProbeState {
            document: document.clone(),
            surface,
            caption: caption.trim().to_string(),
            sequence,
            document_timeout_ms: config.probe.document_timeout_ms,
            live: None,
            spent: None,
        }));
        advance(&state, step);
        Some(Self { state })
    }

    /// The candidate now shown on the surface, once one has loaded.
    pub fn resolved(&self) -> Option<Candidate> {
        self.state.borrow().sequence.resolved().cloned()
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.borrow().sequence.is_exhausted()
    }

    /// Attempts that failed or timed out so far.
    pub fn failures(&self) -> usize {
        self.state.borrow().sequence.failures()
    }
}

/// Launch `step`, skipping candidates whose element cannot even be created.
fn advance(state: &Rc<RefCell<ProbeState>>, mut step: Step) {
    let mut s = state.borrow_mut();
    loop {
        let attempt = match step {
            Step::Probe(attempt) => attempt,
            Step::Exhausted => {
                s.surface.set_marker(None);
                console::debug!(format!("{}: no preview found", s.caption));
                return;
            }
        };

        match launch(Rc::downgrade(state), &s, &attempt) {
            Ok(live) => {
                s.live = Some(live);
                return;
            }
            Err(err) => {
                console::debug!("probe: could not create preview element", err);
                step = match s.sequence.settle(attempt.id, ProbeOutcome::Failed) {
                    Settlement::Discard { then, .. } => then,
                    _ => return,
                };
            }
        }
    }
}

fn launch(
    state: Weak<RefCell<ProbeState>>,
    s: &ProbeState,
    attempt: &Attempt,
) -> Result<LiveAttempt, JsValue> {
    let id = attempt.id;
    let kind = attempt.candidate.kind();

    let element = match kind {
        AssetKind::Image => {
            let image = s.document.create_element("img")?;
            image.set_class_name("paper-image");
            image.set_attribute("alt", "Project preview")?;
            image
        }
        AssetKind::Document => {
            let embed = s.document.create_element("embed")?;
            embed.set_class_name("paper-pdf");
            embed.set_attribute("type", "application/pdf")?;
            embed.set_attribute("style", PROBING_STYLE)?;
            embed
        }
    };

    // Listen before the source is set so no signal can be missed
    let on_load = {
        let state = state.clone();
        EventListener::once(&element, "load", move |_| report(&state, id, ProbeOutcome::Loaded))
    };
    let on_error = {
        let state = state.clone();
        EventListener::once(&element, "error", move |_| report(&state, id, ProbeOutcome::Failed))
    };
    let timeout = (kind == AssetKind::Document).then(|| {
        Timeout::new(s.document_timeout_ms, move || {
            report(&state, id, ProbeOutcome::TimedOut)
        })
    });

    element.set_attribute("src", &attempt.candidate.src())?;
    if kind == AssetKind::Document {
        s.surface.element.append_child(&element)?;
    }

    Ok(LiveAttempt {
        element,
        _on_load: on_load,
        _on_error: on_error,
        _timeout: timeout,
    })
}

fn report(state: &Weak<RefCell<ProbeState>>, id: AttemptId, outcome: ProbeOutcome) {
    let Some(state) = state.upgrade() else {
        return;
    };

    let then = {
        let mut s = state.borrow_mut();
        match s.sequence.settle(id, outcome) {
            Settlement::Ignored => {
                console::debug!(format!("{}: ignoring late probe signal", s.caption));
                return;
            }
            Settlement::Attach { kind, .. } => {
                if let Some(live) = s.live.take() {
                    s.surface.set_marker(Some(kind));
                    s.surface.attach(live.element.clone());
                    s.park(live);
                }
                return;
            }
            Settlement::Discard { then, .. } => {
                if let Some(live) = s.live.take() {
                    live.element.remove();
                    s.park(live);
                }
                then
            }
        }
    };

    advance(&state, then);
}
