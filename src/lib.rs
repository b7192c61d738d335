//! # Gallery Lightbox
//!
//! The behavior layer of a paper-card image gallery, plus a small authoring
//! companion. On page load every card finds its own preview: the project
//! number in its caption (`No. 07`) names a family of candidate files
//! (`images/project-07.jpg`, `.png`, `.pdf`, ...) that are tried strictly in
//! order until one loads. Clicking a card enlarges it into a lightbox with a
//! shared-element transition from the card's on-screen rectangle.
//!
//! # Architecture
//!
//! ```text
//!   naming ──► probe ──► resolver ──┬── web::probe   (browser, event driven)
//!                                   └── FsLoader     (offline `check`)
//!
//!   geometry ──► lightbox ──────────┬── web::overlay (DOM + Web Animations)
//!                                   └── test doubles
//! ```
//!
//! The core is free of DOM access. State machines ([`probe::ProbeSequence`],
//! [`lightbox::LightboxController`]) take events and return what to do; the
//! `web` module (behind the `wasm` feature) binds them to `web-sys` elements
//! and `gloo` listeners and timers.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` / JSON loading, merging over stock defaults, validation |
//! | [`naming`] | Caption identifier extraction and candidate asset names |
//! | [`probe`] | Sequential probe state machine with idempotent settlement |
//! | [`resolver`] | Card resolution over a preview surface; filesystem loader; parallel catalog check |
//! | [`geometry`] | Ratio parsing, fitted overlay rectangle, shared-element transform |
//! | [`lightbox`] | Overlay controller: open, close, resize, animation ownership |
//! | [`page`] | Renders the page markup with Maud |
//! | [`output`] | CLI output formatting |
//! | `web` | wasm entry points (`start`, `start_with_config`, `reset`) |
//!
//! # Design Decisions
//!
//! ## One Live Attempt Per Card
//!
//! A failed candidate's element is discarded before the next one is created,
//! and a success ends the sequence, so a card never shows two previews and
//! never leaks failed elements. Document viewers may report nothing at all, so
//! document probes also fail after a timeout; whichever of load, error or
//! timeout arrives first decides, and the rest are ignored.
//!
//! ## One Live Animation
//!
//! The overlay has a single entry animation slot. Opening or closing cancels
//! whatever occupies it before anything else happens, and finish signals carry
//! a ticket so a superseded animation cannot settle its successor.

pub mod config;
pub mod geometry;
pub mod lightbox;
pub mod naming;
pub mod output;
pub mod page;
pub mod probe;
pub mod resolver;

#[cfg(feature = "wasm")]
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
