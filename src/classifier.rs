//! Page brightness classification.
//!
//! The effective background of a page is found by walking from `<body>` (or
//! the root element when there is no body) towards the root until an element
//! paints a non transparent background. The walk visits at most
//! [`MAX_ANCESTOR_DEPTH`] elements. Anything that cannot be resolved or parsed
//! is treated as white, so an unknown page is classified as light.

use crate::utils::rgb::{is_transparent, Rgb};

/// Pages with a relative luminance at or above this value are light.
pub const LIGHT_THRESHOLD: f64 = 0.35;

/// Maximum number of elements inspected while resolving the background.
pub const MAX_ANCESTOR_DEPTH: usize = 6;

/// Brightness class of a page background.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Mode {
    /// Dark background, the overlay must not be applied.
    Dark,
    /// Light background, the overlay is worth applying.
    Light,
}

impl Mode {
    fn from_luminance(luminance: f64) -> Self {
        if luminance >= LIGHT_THRESHOLD {
            Mode::Light
        } else {
            Mode::Dark
        }
    }

    pub fn is_light(self) -> bool {
        self == Mode::Light
    }
}

/// Read access to the rendered style of a document.
///
/// Implementations only need to expose the element tree upwards from the
/// body and the computed `background-color` of each element.
pub trait Document {
    type Element;

    fn body(&self) -> Option<Self::Element>;
    fn document_element(&self) -> Option<Self::Element>;
    fn parent_element(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Computed `background-color` of `element`, if the host can provide one.
    fn background_color(&self, element: &Self::Element) -> Option<String>;
}

/// Returns the first painted background color on the way from the body to
/// the root, or `None` if nothing within [`MAX_ANCESTOR_DEPTH`] paints one.
pub fn resolve_background<D: Document + ?Sized>(document: &D) -> Option<String> {
    let mut element = document.body().or_else(|| document.document_element());

    for _ in 0..MAX_ANCESTOR_DEPTH {
        let current = element?;

        if let Some(color) = document.background_color(&current) {
            if !is_transparent(&color) {
                return Some(color);
            }
        }

        element = document.parent_element(&current);
    }

    None
}

/// Resolves and parses the effective background, falling back to white.
pub fn background_sample<D: Document + ?Sized>(document: &D) -> Rgb {
    resolve_background(document)
        .and_then(|color| Rgb::parse_css(&color))
        .unwrap_or(Rgb::WHITE)
}

/// Relative luminance in `[0, 1]` of an sRGB sample.
pub fn luminance(rgb: Rgb) -> f64 {
    let Rgb(r, g, b) = rgb;

    0.2126 * srgb_to_linear(r) + 0.7152 * srgb_to_linear(g) + 0.0722 * srgb_to_linear(b)
}

fn srgb_to_linear(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Classifies the page background.
pub fn detect<D: Document + ?Sized>(document: &D) -> Mode {
    Mode::from_luminance(luminance(background_sample(document)))
}

pub fn is_page_light<D: Document + ?Sized>(document: &D) -> bool {
    detect(document).is_light()
}
