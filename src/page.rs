//! Page scaffold rendering.
//!
//! Renders the markup the behavior layer binds to: gallery columns of cards,
//! each with an empty surface and a `No. NN` caption, plus the single lightbox
//! overlay. The behavior layer itself is loaded as a wasm ES module at the end
//! of the body.
//!
//! ## Output
//!
//! ```text
//! dist/
//! └── index.html      # Cards, overlay, inline CSS, module bootstrap
//! ```
//!
//! Assets are not copied: the page probes `{asset_dir}/project-NN.<ext>`
//! relative to wherever it is served from.
//!
//! ## Markup
//!
//! ```html
//! <main class="gallery">
//!   <div class="gallery-col">
//!     <figure class="art zoomable">
//!       <div class="canvas paper cream" style="aspect-ratio: 4 / 5"></div>
//!       <figcaption class="meta-row">No. 07 — Harbor</figcaption>
//!     </figure>
//!   </div>
//! </main>
//! <div id="lightbox" class="lightbox" aria-hidden="true">
//!   <button class="close" type="button" aria-label="Close">×</button>
//!   <div class="lightbox-card"></div>
//! </div>
//! ```
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.

use crate::config::{CardEntry, GalleryConfig};
use crate::naming;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS: &str = include_str!("../static/style.css");

/// Render the page and write it to `output_dir/index.html`.
pub fn write_page(config: &GalleryConfig, output_dir: &Path) -> Result<PathBuf, PageError> {
    fs::create_dir_all(output_dir)?;
    let page = render_page(config)?;
    let path = output_dir.join("index.html");
    fs::write(&path, page.into_string())?;
    Ok(path)
}

/// Render the complete page document.
pub fn render_page(config: &GalleryConfig) -> Result<Markup, PageError> {
    let bootstrap = module_bootstrap(config)?;
    Ok(html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.page.title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (render_gallery(config))
                (render_overlay())
                script type="module" { (PreEscaped(bootstrap)) }
            }
        }
    })
}

// ============================================================================
// HTML Components
// ============================================================================

/// Cards dealt round-robin into `page.columns` columns.
fn render_gallery(config: &GalleryConfig) -> Markup {
    let columns = deal_columns(&config.cards, config.page.columns as usize);
    html! {
        main.gallery {
            @for column in &columns {
                div.gallery-col {
                    @for card in column {
                        (render_card(card))
                    }
                }
            }
        }
    }
}

fn render_card(card: &CardEntry) -> Markup {
    let aspect = card
        .aspect_ratio
        .as_deref()
        .map(|ratio| format!("aspect-ratio: {ratio}"));
    html! {
        figure.art.zoomable[card.zoomable] {
            div class=(surface_classes(card)) style=[aspect] {}
            figcaption.meta-row { (naming::format_caption(card.number, &card.title)) }
        }
    }
}

fn render_overlay() -> Markup {
    html! {
        div #lightbox.lightbox aria-hidden="true" {
            button.close type="button" aria-label="Close" { "×" }
            div.lightbox-card {}
        }
    }
}

fn surface_classes(card: &CardEntry) -> String {
    let mut classes = vec!["canvas", "paper"];
    classes.extend(card.classes.iter().map(String::as_str));
    classes.join(" ")
}

fn deal_columns(cards: &[CardEntry], columns: usize) -> Vec<Vec<&CardEntry>> {
    let columns = columns.max(1);
    let mut dealt: Vec<Vec<&CardEntry>> = vec![Vec::new(); columns];
    for (i, card) in cards.iter().enumerate() {
        dealt[i % columns].push(card);
    }
    dealt
}

/// Module script that initialises the wasm bundle and starts the behavior
/// layer. Stock runtime settings use `start()`; anything else is passed
/// through as JSON.
fn module_bootstrap(config: &GalleryConfig) -> Result<String, PageError> {
    let runtime = GalleryConfig {
        cards: Vec::new(),
        page: Default::default(),
        ..config.clone()
    };
    let script = serde_json::to_string(&config.page.script)?;

    if runtime == GalleryConfig::default() {
        return Ok(format!(
            "import init, {{ start }} from {script};\nawait init();\nstart();\n"
        ));
    }

    // Inline JSON must not be able to close the script element
    let json = serde_json::to_string(&serde_json::to_string(&runtime)?)?.replace("</", "<\\/");
    Ok(format!(
        "import init, {{ start_with_config }} from {script};\nawait init();\nstart_with_config({json});\n"
    ))
}

// ============================================================================
// Tests
// ============================================================================
