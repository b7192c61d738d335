//! Shared test doubles for the resolver and the lightbox controller.
//!
//! - [`ScriptedLoader`]: blocking loader whose outcome per source is fixed up
//!   front; records every source it was asked for.
//! - [`RecordingSurface`]: preview surface that keeps attached sources and the
//!   current marker.
//! - [`RecordingOverlay`]: overlay view that mirrors the DOM state the
//!   controller writes and tracks which animations are still live.
//! - [`write_png`] / [`write_pdf`]: real asset files for filesystem tests.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use crate::geometry::{Rect, Transform};
use crate::lightbox::{AnimationTicket, OverlayView, Presentation, Timing};
use crate::naming::{AssetKind, Candidate};
use crate::resolver::{AssetLoader, Load, PreviewSurface};

// =========================================================================
// Resolver doubles
// =========================================================================

/// Loads succeed for the listed sources, time out for `timing_out`, and fail
/// for everything else. Uses Mutex (not RefCell) so it is Sync.
#[derive(Default)]
pub struct ScriptedLoader {
    succeed: HashSet<String>,
    time_out: HashSet<String>,
    attempted: Mutex<Vec<String>>,
}

impl ScriptedLoader {
    pub fn succeeding(sources: &[&str]) -> Self {
        Self {
            succeed: sources.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn timing_out(mut self, sources: &[&str]) -> Self {
        self.time_out = sources.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn attempted(&self) -> Vec<String> {
        self.attempted.lock().unwrap().clone()
    }
}

impl AssetLoader for ScriptedLoader {
    type Preview = String;

    fn load(&self, candidate: &Candidate) -> Load<String> {
        let src = candidate.src();
        self.attempted.lock().unwrap().push(src.clone());
        if self.succeed.contains(&src) {
            Load::Loaded(src)
        } else if self.time_out.contains(&src) {
            Load::TimedOut
        } else {
            Load::Failed
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub attached: Vec<String>,
    pub marker: Option<AssetKind>,
    pub clears: usize,
}

impl PreviewSurface for RecordingSurface {
    type Preview = String;

    fn clear_previews(&mut self) {
        self.attached.clear();
        self.clears += 1;
    }

    fn set_marker(&mut self, kind: Option<AssetKind>) {
        self.marker = kind;
    }

    fn attach(&mut self, preview: String) {
        self.attached.push(preview);
    }
}

// =========================================================================
// Overlay double
// =========================================================================

/// Mirrors the overlay DOM. Animations are identified by their ticket.
#[derive(Debug, Default)]
pub struct RecordingOverlay {
    pub class_name: String,
    pub content: String,
    pub size: Option<(f64, f64)>,
    pub open: bool,
    /// `None` is the inline `transform: none`.
    pub transform: Option<Transform>,
    pub motion_hint: bool,
    pub layout_commits: usize,
    /// Every animation ever started, in order, with its starting transform.
    pub played: Vec<(AnimationTicket, Transform)>,
    pub live: Vec<AnimationTicket>,
    pub cancelled: Vec<AnimationTicket>,
}

impl OverlayView for RecordingOverlay {
    type Animation = AnimationTicket;

    fn present(&mut self, presentation: &Presentation) {
        self.class_name = presentation.class_name.clone();
        self.content = presentation.content.clone();
    }

    fn set_size(&mut self, rect: &Rect) {
        self.size = Some((rect.width, rect.height));
    }

    fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    fn set_transform(&mut self, transform: Option<&Transform>) {
        self.transform = transform.copied();
    }

    fn set_motion_hint(&mut self, active: bool) {
        self.motion_hint = active;
    }

    fn commit_layout(&mut self) {
        self.layout_commits += 1;
    }

    fn play(&mut self, from: &Transform, _timing: &Timing, ticket: AnimationTicket) -> AnimationTicket {
        self.played.push((ticket, *from));
        self.live.push(ticket);
        ticket
    }

    fn cancel(&mut self, animation: AnimationTicket) {
        self.live.retain(|t| *t != animation);
        self.cancelled.push(animation);
    }

    fn release(&mut self, animation: AnimationTicket) {
        self.live.retain(|t| *t != animation);
    }
}

// =========================================================================
// Asset files
// =========================================================================

/// Write a solid `width`×`height` PNG, creating parent directories.
pub fn write_png(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::from_pixel(width, height, image::Rgb([200, 190, 170]))
        .save(path)
        .unwrap();
}

/// Write a minimal file carrying the PDF magic, creating parent directories.
pub fn write_pdf(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"%PDF-1.4\n%%EOF\n").unwrap();
}
