//! Gallery configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. A user config file
//! is sparse: its values are merged over the stock defaults, unknown keys are
//! rejected, and the merged result is validated before use.
//!
//! The browser build receives the same structure as JSON through
//! [`GalleryConfig::from_json`].
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! asset_dir = "./images"                        # Where project-NN.<ext> files live
//! extensions = ["jpg", "jpeg", "png", "webp", "pdf"]  # Probe priority order
//!
//! [lightbox]
//! viewport_fraction = 0.82                      # Share of the viewport the overlay may use
//! default_ratio = [4, 5]                        # width:height fallback
//! duration_ms = 300                             # Entry animation length
//! easing = "cubic-bezier(0.2, 0.75, 0.2, 1)"
//!
//! [probe]
//! document_timeout_ms = 1200                    # Give up on a silent PDF viewer after this
//!
//! [page]
//! title = "Gallery"
//! columns = 3
//! script = "./pkg/gallery_lightbox.js"
//!
//! [[cards]]
//! number = 7
//! title = "Harbor"
//! aspect_ratio = "4 / 5"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `config.toml`.
///
/// All fields have defaults matching the stock page. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Directory (relative to the page) holding `project-NN.<ext>` assets.
    pub asset_dir: String,
    /// Extensions probed per card, highest priority first.
    pub extensions: Vec<String>,
    /// Overlay geometry and animation timing.
    pub lightbox: LightboxConfig,
    /// Probe behavior.
    pub probe: ProbeConfig,
    /// CSS selectors binding the behavior layer to the page markup.
    pub selectors: SelectorConfig,
    /// Page scaffold settings (used by `render`).
    pub page: PageConfig,
    /// Catalog entries rendered as cards.
    pub cards: Vec<CardEntry>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            asset_dir: "./images".to_string(),
            extensions: ["jpg", "jpeg", "png", "webp", "pdf"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            lightbox: LightboxConfig::default(),
            probe: ProbeConfig::default(),
            selectors: SelectorConfig::default(),
            page: PageConfig::default(),
            cards: Vec::new(),
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "extensions must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|e| e.is_empty() || e.contains(['/', '\\', '.']))
        {
            return Err(ConfigError::Validation(format!(
                "extensions entry {bad:?} must be a bare extension like \"jpg\""
            )));
        }
        let fraction = self.lightbox.viewport_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ConfigError::Validation(
                "lightbox.viewport_fraction must be in (0, 1]".into(),
            ));
        }
        if self.lightbox.default_ratio[0] == 0 || self.lightbox.default_ratio[1] == 0 {
            return Err(ConfigError::Validation(
                "lightbox.default_ratio values must be non-zero".into(),
            ));
        }
        if self.lightbox.duration_ms == 0 {
            return Err(ConfigError::Validation(
                "lightbox.duration_ms must be non-zero".into(),
            ));
        }
        if self.page.columns == 0 {
            return Err(ConfigError::Validation(
                "page.columns must be non-zero".into(),
            ));
        }
        if let Some(card) = self.cards.iter().find(|c| c.number > 99) {
            return Err(ConfigError::Validation(format!(
                "cards: number {} does not fit the two-digit caption pattern",
                card.number
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config (the browser entry point's format).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GalleryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Overlay geometry and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightboxConfig {
    /// Fraction of the viewport width/height available to the overlay card.
    pub viewport_fraction: f64,
    /// Fallback aspect ratio as `[width, height]`.
    pub default_ratio: [u32; 2],
    /// Entry animation duration in milliseconds.
    pub duration_ms: u32,
    /// CSS timing function for the entry animation.
    pub easing: String,
}

impl LightboxConfig {
    pub fn default_ratio(&self) -> f64 {
        self.default_ratio[0] as f64 / self.default_ratio[1] as f64
    }
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            viewport_fraction: 0.82,
            default_ratio: [4, 5],
            duration_ms: 300,
            easing: "cubic-bezier(0.2, 0.75, 0.2, 1)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// Document probes that neither load nor error within this window fail.
    pub document_timeout_ms: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            document_timeout_ms: 1200,
        }
    }
}

/// Selectors for the markup contract. The defaults match what `render` emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorConfig {
    pub cards: String,
    /// Caption element, relative to a card.
    pub caption: String,
    /// Surface element, relative to a card.
    pub surface: String,
    /// Surfaces that open the lightbox on click.
    pub zoomable: String,
    pub overlay: String,
    /// Close control, anywhere in the document.
    pub close: String,
    pub overlay_card: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            cards: ".gallery-col .art".to_string(),
            caption: ".meta-row".to_string(),
            surface: ".canvas".to_string(),
            zoomable: ".zoomable .canvas".to_string(),
            overlay: "#lightbox".to_string(),
            close: ".close".to_string(),
            overlay_card: ".lightbox-card".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Document title.
    pub title: String,
    /// Number of gallery columns; cards are dealt round-robin.
    pub columns: u32,
    /// ES module that exports the wasm `default` init and `start`.
    pub script: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Gallery".to_string(),
            columns: 3,
            script: "./pkg/gallery_lightbox.js".to_string(),
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardEntry {
    /// Two-digit project number shown in the caption and used for asset names.
    pub number: u32,
    pub title: String,
    /// CSS `aspect-ratio` declared on the surface (e.g. `"4 / 5"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// Extra presentation classes on the surface (copied into the lightbox).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Whether clicking the surface opens the lightbox.
    #[serde(default = "default_zoomable")]
    pub zoomable: bool,
}

fn default_zoomable() -> bool {
    true
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(GalleryConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, arrays included.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, over stock defaults.
pub fn load_config(root: &Path) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallery Lightbox Configuration
# ==============================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory, relative to the page, holding project-NN.<ext> assets.
asset_dir = "./images"

# Extensions tried for each card, highest priority first. The first one that
# loads wins. "pdf" is embedded as a document; everything else is an image.
extensions = ["jpg", "jpeg", "png", "webp", "pdf"]

# ---------------------------------------------------------------------------
# Lightbox
# ---------------------------------------------------------------------------
[lightbox]
# Share of the viewport width and height the enlarged card may occupy.
viewport_fraction = 0.82
# Aspect ratio used when neither the image nor the surface declares one.
default_ratio = [4, 5]
# Entry animation.
duration_ms = 300
easing = "cubic-bezier(0.2, 0.75, 0.2, 1)"

# ---------------------------------------------------------------------------
# Asset probing
# ---------------------------------------------------------------------------
[probe]
# PDF viewers do not always report load or error. A document probe that stays
# silent this long counts as failed and the next extension is tried.
document_timeout_ms = 1200

# ---------------------------------------------------------------------------
# Markup selectors (defaults match the rendered page)
# ---------------------------------------------------------------------------
[selectors]
cards = ".gallery-col .art"
caption = ".meta-row"
surface = ".canvas"
zoomable = ".zoomable .canvas"
overlay = "#lightbox"
close = ".close"
overlay_card = ".lightbox-card"

# ---------------------------------------------------------------------------
# Page scaffold
# ---------------------------------------------------------------------------
[page]
title = "Gallery"
columns = 3
script = "./pkg/gallery_lightbox.js"

# ---------------------------------------------------------------------------
# Catalog
# ---------------------------------------------------------------------------
# [[cards]]
# number = 7
# title = "Harbor"
# aspect_ratio = "4 / 5"   # optional, CSS aspect-ratio of the surface
# classes = ["cream"]      # optional, copied into the lightbox card
# zoomable = true
"##
}
