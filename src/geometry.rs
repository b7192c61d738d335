//! Pure geometry for the lightbox: ratio parsing, the fitted overlay
//! rectangle, and the shared-element transform between two rectangles.
//!
//! Nothing here touches the DOM, so every function is unit testable.

/// An on-screen rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Parse a CSS `aspect-ratio` value into width / height.
///
/// Accepts `"W/H"` (whitespace around either side allowed) or a bare number.
/// Both parts must be finite and positive; anything else, including `auto`
/// and an absent value, yields `fallback`.
///
/// # Examples
/// ```
/// # use gallery_lightbox::geometry::parse_ratio;
/// assert_eq!(parse_ratio(Some("3 / 2"), 0.8), 1.5);
/// assert_eq!(parse_ratio(Some("1.25"), 0.8), 1.25);
/// assert_eq!(parse_ratio(Some("auto"), 0.8), 0.8);
/// ```
pub fn parse_ratio(value: Option<&str>, fallback: f64) -> f64 {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return fallback;
    };

    let parts: Vec<&str> = value.split('/').collect();
    if let [w, h] = parts.as_slice() {
        if let (Some(w), Some(h)) = (positive(w), positive(h)) {
            return w / h;
        }
    }

    positive(value).unwrap_or(fallback)
}

fn positive(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
}

/// Ratio of a loaded image, if both natural dimensions are known.
pub fn natural_ratio(width: u32, height: u32) -> Option<f64> {
    (width > 0 && height > 0).then(|| width as f64 / height as f64)
}

/// Compute the centered overlay rectangle for `ratio` inside `viewport`.
///
/// The card may use `fraction` of each viewport axis. When the available area
/// is proportionally wider than `ratio` the height is maximized, otherwise
/// the width is. Size and offsets are floored to whole pixels; offsets are
/// derived from the unfloored size.
///
/// # Examples
/// ```
/// # use gallery_lightbox::geometry::{fitted_rect, Rect, Viewport};
/// let rect = fitted_rect(Viewport::new(1000.0, 1000.0), 4.0 / 5.0, 0.82);
/// assert_eq!(rect, Rect::new(172.0, 90.0, 656.0, 820.0));
/// ```
pub fn fitted_rect(viewport: Viewport, ratio: f64, fraction: f64) -> Rect {
    let max_width = viewport.width * fraction;
    let max_height = viewport.height * fraction;
    let available_ratio = max_width / max_height;

    let (width, height) = if available_ratio > ratio {
        // Available area is wider: height is the constraint
        (max_height * ratio, max_height)
    } else {
        (max_width, max_width / ratio)
    };

    Rect {
        width: width.floor(),
        height: height.floor(),
        left: ((viewport.width - width) / 2.0).floor(),
        top: ((viewport.height - height) / 2.0).floor(),
    }
}

/// A translate + scale transform with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
    };

    /// Transform that makes an element laid out at `target` appear at `source`.
    pub fn between(source: Rect, target: Rect) -> Self {
        Self {
            translate_x: source.left - target.left,
            translate_y: source.top - target.top,
            scale_x: source.width / target.width,
            scale_y: source.height / target.height,
        }
    }

    /// CSS `transform` value. Pair with `transform-origin: top left`.
    pub fn to_css(&self) -> String {
        if *self == Self::IDENTITY {
            return "translate(0, 0) scale(1, 1)".to_string();
        }
        format!(
            "translate({}px, {}px) scale({}, {})",
            self.translate_x, self.translate_y, self.scale_x, self.scale_y
        )
    }

    /// Where `target` lands on screen with this transform applied.
    pub fn apply(&self, target: Rect) -> Rect {
        Rect {
            left: target.left + self.translate_x,
            top: target.top + self.translate_y,
            width: target.width * self.scale_x,
            height: target.height * self.scale_y,
        }
    }
}
