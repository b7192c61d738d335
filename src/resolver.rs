//! Asset resolution for gallery cards.
//!
//! For each card: extract the project number from its caption, clear whatever
//! preview it carried, and walk the candidate list with a [`ProbeSequence`]
//! until one loads. The browser drives the sequence asynchronously from
//! element events (see `web::probe`); this module holds the blocking driver
//! used by the offline `check` command and by tests.
//!
//! | Piece | Role |
//! |---|---|
//! | [`PreviewSurface`] | Where a resolved preview is attached and marked |
//! | [`AssetLoader`] | Performs one blocking load per candidate |
//! | [`FsLoader`] | Loader over a local asset directory (`image` headers, PDF magic) |
//! | [`resolve_catalog`] | Resolves every configured card in parallel |

use crate::config::{CardEntry, GalleryConfig};
use crate::naming::{self, AssetKind, Candidate};
use crate::probe::{ProbeOutcome, ProbeSequence, Settlement, Step};
use log::{debug, info};
use rayon::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A card's display area.
pub trait PreviewSurface {
    type Preview;

    /// Remove previews attached by an earlier resolution.
    fn clear_previews(&mut self);

    /// Set the `has-image`/`has-pdf` marker for `kind`, or clear both.
    fn set_marker(&mut self, kind: Option<AssetKind>);

    fn attach(&mut self, preview: Self::Preview);
}

/// Result of a single blocking load.
#[derive(Debug)]
pub enum Load<P> {
    Loaded(P),
    Failed,
    TimedOut,
}

/// Blocking loader. `Sync` so catalogs can be resolved on the rayon pool.
pub trait AssetLoader: Sync {
    type Preview;

    fn load(&self, candidate: &Candidate) -> Load<Self::Preview>;
}

/// Summary of one resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Candidate that loaded, if any.
    pub resolved: Option<Candidate>,
    /// Candidates tried and discarded before the outcome.
    pub failures: usize,
}

/// Probe `candidates` against `surface`, blocking on each load in turn.
///
/// Failed previews are dropped before the next candidate is loaded, so at most
/// one preview exists at any time and only a successful one is attached.
pub fn probe_blocking<S, L>(surface: &mut S, candidates: Vec<Candidate>, loader: &L) -> Resolution
where
    S: PreviewSurface,
    L: AssetLoader<Preview = S::Preview>,
{
    let (mut sequence, mut step) = ProbeSequence::start(candidates);

    while let Step::Probe(attempt) = step {
        let (outcome, mut preview) = match loader.load(&attempt.candidate) {
            Load::Loaded(preview) => (ProbeOutcome::Loaded, Some(preview)),
            Load::Failed => (ProbeOutcome::Failed, None),
            Load::TimedOut => (ProbeOutcome::TimedOut, None),
        };

        step = match sequence.settle(attempt.id, outcome) {
            Settlement::Attach { kind, .. } => {
                surface.set_marker(Some(kind));
                if let Some(preview) = preview.take() {
                    surface.attach(preview);
                }
                break;
            }
            Settlement::Discard { then, .. } => {
                debug!("probe failed: {}", attempt.candidate.src());
                drop(preview);
                then
            }
            Settlement::Ignored => break,
        };
    }

    if sequence.is_exhausted() {
        surface.set_marker(None);
    }

    Resolution {
        resolved: sequence.resolved().cloned(),
        failures: sequence.failures(),
    }
}

/// Resolve one card from its caption.
///
/// Returns `None` without touching the surface when the caption carries no
/// usable project number.
pub fn resolve_card<S, L>(
    surface: &mut S,
    caption: &str,
    config: &GalleryConfig,
    loader: &L,
) -> Option<Resolution>
where
    S: PreviewSurface,
    L: AssetLoader<Preview = S::Preview>,
{
    let identifier = naming::extract_identifier(caption).filter(|&id| naming::is_card_identifier(id))?;

    surface.clear_previews();
    surface.set_marker(None);

    let base = naming::candidate_base(&config.asset_dir, identifier);
    let candidates = naming::candidates(&base, &config.extensions);
    Some(probe_blocking(surface, candidates, loader))
}

// ============================================================================
// Filesystem loader
// ============================================================================

/// A preview found on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct FsPreview {
    pub path: PathBuf,
    /// Natural size for images; `None` for documents.
    pub natural_size: Option<(u32, u32)>,
}

/// Loads candidates relative to a site root directory.
///
/// Images succeed when the `image` crate can read their dimensions, documents
/// when the file starts with the `%PDF-` magic. Missing files fail.
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Asset paths are site-relative even when written web-root absolute
    /// (`/images`), so they never escape `root`.
    fn path_for(&self, candidate: &Candidate) -> PathBuf {
        let src = candidate.src();
        self.root.join(src.trim_start_matches('/'))
    }
}

impl AssetLoader for FsLoader {
    type Preview = FsPreview;

    fn load(&self, candidate: &Candidate) -> Load<FsPreview> {
        let path = self.path_for(candidate);
        if !path.is_file() {
            return Load::Failed;
        }
        match candidate.kind() {
            AssetKind::Image => match image::image_dimensions(&path) {
                Ok(size) => Load::Loaded(FsPreview {
                    path,
                    natural_size: Some(size),
                }),
                Err(e) => {
                    debug!("{} is not a readable image: {}", path.display(), e);
                    Load::Failed
                }
            },
            AssetKind::Document => {
                if has_pdf_magic(&path) {
                    Load::Loaded(FsPreview {
                        path,
                        natural_size: None,
                    })
                } else {
                    Load::Failed
                }
            }
        }
    }
}

fn has_pdf_magic(path: &Path) -> bool {
    let mut magic = [0u8; 5];
    File::open(path)
        .and_then(|mut f| f.read_exact(&mut magic))
        .map(|_| &magic == b"%PDF-")
        .unwrap_or(false)
}

/// Surface used when resolving outside the browser: remembers what was attached.
#[derive(Debug, Default)]
pub struct ReportSurface {
    pub marker: Option<AssetKind>,
    pub preview: Option<FsPreview>,
}

impl PreviewSurface for ReportSurface {
    type Preview = FsPreview;

    fn clear_previews(&mut self) {
        self.preview = None;
    }

    fn set_marker(&mut self, kind: Option<AssetKind>) {
        self.marker = kind;
    }

    fn attach(&mut self, preview: FsPreview) {
        self.preview = Some(preview);
    }
}

// ============================================================================
// Catalog resolution
// ============================================================================

/// Outcome for one catalog card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardReport {
    pub caption: String,
    /// `None` when the caption has no usable project number.
    pub identifier: Option<u32>,
    pub resolution: Option<Resolution>,
    pub marker: Option<AssetKind>,
    pub preview: Option<FsPreview>,
}

impl CardReport {
    pub fn is_resolved(&self) -> bool {
        self.preview.is_some()
    }
}

/// Resolve every configured card against `loader`, in catalog order.
pub fn resolve_catalog<L>(config: &GalleryConfig, loader: &L) -> Vec<CardReport>
where
    L: AssetLoader<Preview = FsPreview>,
{
    config
        .cards
        .par_iter()
        .map(|card| resolve_entry(card, config, loader))
        .collect()
}

fn resolve_entry<L>(card: &CardEntry, config: &GalleryConfig, loader: &L) -> CardReport
where
    L: AssetLoader<Preview = FsPreview>,
{
    let caption = naming::format_caption(card.number, &card.title);
    let mut surface = ReportSurface::default();
    let resolution = resolve_card(&mut surface, &caption, config, loader);

    match surface.preview.as_ref() {
        Some(preview) => info!("{} → {}", caption, preview.path.display()),
        None => debug!("{}: no preview", caption),
    }

    CardReport {
        identifier: naming::extract_identifier(&caption).filter(|&id| naming::is_card_identifier(id)),
        caption,
        resolution,
        marker: surface.marker,
        preview: surface.preview,
    }
}
