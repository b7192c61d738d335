//! Shared-element lightbox controller.
//!
//! Clicking a card surface enlarges it into a single overlay card: the overlay
//! is laid out at its final, fitted rectangle, then transformed back onto the
//! clicked surface's rectangle and animated to the identity transform, so the
//! thumbnail appears to grow in place.
//!
//! ## States
//!
//! ```text
//!            open_from                 finish(ticket)
//! Closed ─────────────► Opening ─────────────────────► Open
//!   ▲                      │  (reduced motion: straight to Open)
//!   └──── close ───────────┴──────────────────────────────┘
//! ```
//!
//! Resizing while `Opening` or `Open` refits width/height only.
//!
//! ## Animation ownership
//!
//! The controller owns at most one live animation. Every open and every close
//! first cancels the live one, and each animation carries an
//! [`AnimationTicket`] so a finish signal from a superseded animation is
//! ignored. The settle cleanup (transform back to `none`, motion hint off) runs
//! on both natural finish and cancellation.
//!
//! DOM access sits behind [`OverlayView`]; the browser implementation is
//! `web::overlay::DomOverlay`.

use crate::config::LightboxConfig;
use crate::geometry::{self, Rect, Transform, Viewport};

/// Classes that make an element a card surface; not copied into the overlay.
const STRUCTURAL_CLASSES: [&str; 2] = ["canvas", "paper"];

/// Base class of the overlay card.
pub const OVERLAY_CARD_CLASS: &str = "lightbox-card";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    /// Entry animation in flight.
    Opening,
    Open,
}

/// Identifies one entry animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationTicket(u64);

/// Entry animation timing.
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    pub duration_ms: u32,
    pub easing: String,
}

/// What the controller reads from the clicked surface, captured at click time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSurface {
    /// On-screen rectangle of the surface.
    pub rect: Rect,
    /// Natural size of a loaded preview image inside the surface.
    pub natural_size: Option<(u32, u32)>,
    /// Computed CSS `aspect-ratio` of the surface.
    pub declared_ratio: Option<String>,
    pub classes: Vec<String>,
    /// Inner markup, copied by value.
    pub content: String,
}

impl SourceSurface {
    /// Aspect ratio for the overlay: the loaded image's natural ratio, else the
    /// declared CSS ratio, else `fallback`.
    pub fn aspect_ratio(&self, fallback: f64) -> f64 {
        self.natural_size
            .and_then(|(w, h)| geometry::natural_ratio(w, h))
            .unwrap_or_else(|| geometry::parse_ratio(self.declared_ratio.as_deref(), fallback))
    }
}

/// Class list and content the overlay card takes from a source surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub class_name: String,
    pub content: String,
}

impl Presentation {
    pub fn from_source(source: &SourceSurface) -> Self {
        let mut classes = vec![OVERLAY_CARD_CLASS];
        for class in &source.classes {
            let class = class.as_str();
            if !STRUCTURAL_CLASSES.contains(&class) && !classes.contains(&class) {
                classes.push(class);
            }
        }
        Self {
            class_name: classes.join(" "),
            content: source.content.clone(),
        }
    }
}

/// The overlay as the controller drives it.
pub trait OverlayView {
    type Animation;

    /// Replace the overlay card's classes and content.
    fn present(&mut self, presentation: &Presentation);

    /// Apply width/height of the fitted rectangle to the overlay card.
    fn set_size(&mut self, rect: &Rect);

    /// Show or hide the overlay container (`open` class and `aria-hidden`).
    fn set_open(&mut self, open: bool);

    /// Set the inline transform; `None` writes `none`.
    fn set_transform(&mut self, transform: Option<&Transform>);

    /// Top-left transform origin plus `will-change: transform`, or back to `auto`.
    fn set_motion_hint(&mut self, active: bool);

    /// Force a layout read so the starting transform is committed.
    fn commit_layout(&mut self);

    /// Animate from `from` to the identity transform, filling forwards.
    fn play(&mut self, from: &Transform, timing: &Timing, ticket: AnimationTicket) -> Self::Animation;

    /// Stop an animation that has not finished.
    fn cancel(&mut self, animation: Self::Animation);

    /// Dispose of an animation that finished on its own.
    fn release(&mut self, animation: Self::Animation) {
        drop(animation);
    }
}

/// Overlay state for the page session.
#[derive(Debug)]
pub struct LightboxState<A> {
    phase: Phase,
    current_ratio: f64,
    active: Option<(AnimationTicket, A)>,
    next_ticket: u64,
}

impl<A> LightboxState<A> {
    pub fn new(default_ratio: f64) -> Self {
        Self {
            phase: Phase::Closed,
            current_ratio: default_ratio,
            active: None,
            next_ticket: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != Phase::Closed
    }

    pub fn current_ratio(&self) -> f64 {
        self.current_ratio
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    fn issue_ticket(&mut self) -> AnimationTicket {
        self.next_ticket += 1;
        AnimationTicket(self.next_ticket)
    }
}

pub struct LightboxController<O: OverlayView> {
    overlay: O,
    config: LightboxConfig,
    state: LightboxState<O::Animation>,
}

impl<O: OverlayView> LightboxController<O> {
    pub fn new(overlay: O, config: LightboxConfig) -> Self {
        let state = LightboxState::new(config.default_ratio());
        Self {
            overlay,
            config,
            state,
        }
    }

    pub fn state(&self) -> &LightboxState<O::Animation> {
        &self.state
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Enlarge `source` into the overlay. Returns the fitted rectangle.
    pub fn open_from(&mut self, source: &SourceSurface, viewport: Viewport, reduced_motion: bool) -> Rect {
        self.state.current_ratio = source.aspect_ratio(self.config.default_ratio());

        self.overlay.present(&Presentation::from_source(source));

        let target = self.fitted(viewport);
        self.overlay.set_size(&target);
        self.overlay.set_open(true);

        self.cancel_active();

        if reduced_motion {
            self.overlay.set_transform(None);
            self.state.phase = Phase::Open;
            return target;
        }

        let from = Transform::between(source.rect, target);
        self.overlay.set_motion_hint(true);
        self.overlay.set_transform(Some(&from));
        self.overlay.commit_layout();

        let ticket = self.state.issue_ticket();
        let timing = Timing {
            duration_ms: self.config.duration_ms,
            easing: self.config.easing.clone(),
        };
        let animation = self.overlay.play(&from, &timing, ticket);
        self.state.active = Some((ticket, animation));
        self.state.phase = Phase::Opening;
        target
    }

    /// Entry animation `ticket` finished. Stale tickets are ignored.
    pub fn finish(&mut self, ticket: AnimationTicket) -> bool {
        match self.state.active.take() {
            Some((active, animation)) if active == ticket => {
                self.overlay.release(animation);
                self.settle_motion();
                self.state.phase = Phase::Open;
                true
            }
            other => {
                self.state.active = other;
                false
            }
        }
    }

    /// Hide the overlay, cancelling any entry animation. Idempotent.
    pub fn close(&mut self) {
        self.cancel_active();
        self.settle_motion();
        self.overlay.set_open(false);
        self.state.phase = Phase::Closed;
    }

    /// Refit the overlay card to a new viewport while open. Never animates.
    pub fn handle_resize(&mut self, viewport: Viewport) -> Option<Rect> {
        if !self.state.is_open() {
            return None;
        }
        let target = self.fitted(viewport);
        self.overlay.set_size(&target);
        Some(target)
    }

    /// Close and return to the initial state (default ratio, no tickets live).
    pub fn reset(&mut self) {
        self.close();
        self.state = LightboxState::new(self.config.default_ratio());
    }

    fn fitted(&self, viewport: Viewport) -> Rect {
        geometry::fitted_rect(viewport, self.state.current_ratio, self.config.viewport_fraction)
    }

    fn cancel_active(&mut self) {
        if let Some((_, animation)) = self.state.active.take() {
            self.overlay.cancel(animation);
            self.settle_motion();
        }
    }

    fn settle_motion(&mut self) {
        self.overlay.set_transform(None);
        self.overlay.set_motion_hint(false);
    }
}
