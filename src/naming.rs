//! Caption and asset naming conventions.
//!
//! Every card caption carries a project number in the form `No. NN`, and the
//! preview assets for that project live next to the page as
//! `{asset_dir}/project-NN.{ext}`. This module is the single place that knows
//! both conventions:
//!
//! - `"No. 07 — Harbor"` → identifier `7`
//! - identifier `7` → base path `./images/project-07`
//! - base + `["jpg", "pdf"]` → `./images/project-07.jpg`, `./images/project-07.pdf`

use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)No\.\s*([0-9]{1,2})").expect("identifier pattern"));

/// How a candidate is embedded once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Displayed through an `<img>`; marks the surface `has-image`.
    Image,
    /// Displayed through an embedded PDF viewer; marks the surface `has-pdf`.
    Document,
}

impl AssetKind {
    pub fn from_extension(extension: &str) -> Self {
        if extension.eq_ignore_ascii_case("pdf") {
            AssetKind::Document
        } else {
            AssetKind::Image
        }
    }

    /// Surface class applied when an asset of this kind is attached.
    pub fn marker(self) -> &'static str {
        match self {
            AssetKind::Image => "has-image",
            AssetKind::Document => "has-pdf",
        }
    }
}

/// A single file to try for a card: `{base}.{extension}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub base: String,
    pub extension: String,
}

impl Candidate {
    pub fn new(base: &str, extension: &str) -> Self {
        Self {
            base: base.to_string(),
            extension: extension.to_string(),
        }
    }

    pub fn src(&self) -> String {
        format!("{}.{}", self.base, self.extension)
    }

    pub fn kind(&self) -> AssetKind {
        AssetKind::from_extension(&self.extension)
    }
}

/// Extract the project number from a caption.
///
/// Returns the first run of one or two digits after `No.` (case-insensitive,
/// optional whitespace). A longer run is truncated to its first two digits,
/// so `"No. 123"` yields `12`.
pub fn extract_identifier(caption: &str) -> Option<u32> {
    let captures = IDENTIFIER.captures(caption)?;
    captures.get(1)?.as_str().parse().ok()
}

/// Whether an extracted identifier names a real card. `0` never does.
pub fn is_card_identifier(identifier: u32) -> bool {
    identifier > 0
}

/// Base path (no extension) of the assets for a project number.
pub fn candidate_base(asset_dir: &str, identifier: u32) -> String {
    let dir = asset_dir.trim_end_matches('/');
    format!("{}/project-{:02}", dir, identifier)
}

/// Candidates for a base path, in the given priority order.
pub fn candidates(base: &str, extensions: &[String]) -> Vec<Candidate> {
    extensions.iter().map(|ext| Candidate::new(base, ext)).collect()
}

/// Render the caption for a catalog entry, e.g. `No. 07 — Harbor`.
pub fn format_caption(number: u32, title: &str) -> String {
    format!("No. {:02} — {}", number, title)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // extract_identifier tests
    // =========================================================================

    #[test]
    fn identifier_with_title() {
        assert_eq!(extract_identifier("No. 07 — Title"), Some(7));
    }

    #[test]
    fn identifier_lowercase_no_space() {
        assert_eq!(extract_identifier("no.3"), Some(3));
    }

    #[test]
    fn identifier_uppercase() {
        assert_eq!(extract_identifier("NO. 42 Quarry"), Some(42));
    }

    #[test]
    fn identifier_embedded_in_text() {
        assert_eq!(extract_identifier("Series B · No. 15 · 2021"), Some(15));
    }

    #[test]
    fn identifier_first_match_wins() {
        assert_eq!(extract_identifier("No. 04, after No. 03"), Some(4));
    }

    #[test]
    fn identifier_three_digits_truncated() {
        assert_eq!(extract_identifier("No. 123"), Some(12));
    }

    #[test]
    fn identifier_missing_pattern() {
        assert_eq!(extract_identifier("Untitled study"), None);
        assert_eq!(extract_identifier(""), None);
        assert_eq!(extract_identifier("No 07"), None);
        assert_eq!(extract_identifier("No. seven"), None);
    }

    #[test]
    fn identifier_zero_is_extracted_but_not_a_card() {
        assert_eq!(extract_identifier("No. 00"), Some(0));
        assert!(!is_card_identifier(0));
        assert!(is_card_identifier(1));
    }

    // =========================================================================
    // candidate naming tests
    // =========================================================================

    #[test]
    fn base_pads_single_digit() {
        assert!(candidate_base("./images", 7).ends_with("project-07"));
        assert_eq!(candidate_base("./images", 7), "./images/project-07");
    }

    #[test]
    fn base_two_digits() {
        assert_eq!(candidate_base("./images", 23), "./images/project-23");
    }

    #[test]
    fn base_trailing_slash_not_doubled() {
        assert_eq!(candidate_base("assets/", 5), "assets/project-05");
    }

    #[test]
    fn candidates_keep_priority_order() {
        let exts = vec!["jpg".to_string(), "png".to_string(), "pdf".to_string()];
        let list = candidates("./images/project-02", &exts);
        let srcs: Vec<String> = list.iter().map(Candidate::src).collect();
        assert_eq!(
            srcs,
            vec![
                "./images/project-02.jpg",
                "./images/project-02.png",
                "./images/project-02.pdf",
            ]
        );
    }

    #[test]
    fn kind_from_extension() {
        assert_eq!(AssetKind::from_extension("pdf"), AssetKind::Document);
        assert_eq!(AssetKind::from_extension("PDF"), AssetKind::Document);
        assert_eq!(AssetKind::from_extension("webp"), AssetKind::Image);
        assert_eq!(AssetKind::Image.marker(), "has-image");
        assert_eq!(AssetKind::Document.marker(), "has-pdf");
    }

    #[test]
    fn caption_roundtrips_through_extraction() {
        let caption = format_caption(9, "Harbor");
        assert_eq!(caption, "No. 09 — Harbor");
        assert_eq!(extract_identifier(&caption), Some(9));
    }
}
