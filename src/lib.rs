//! Decide whether a page is light enough to darken, and keep the user's
//! dark mode choice in sync between the page, the popup and the toolbar
//! action.
//!
//! # Examples
//!
//! ```
//! use dark_mode_reader::{Config, RootStyle, StaticDocument, ThemeMachine};
//!
//! let page = StaticDocument::with_body_background("rgb(250, 250, 250)");
//! assert_eq!(dark_mode_reader::detect(&page), dark_mode_reader::Mode::Light);
//!
//! let mut machine = ThemeMachine::new(page, RootStyle::new(&Config::default()));
//! let outcome = machine.enable();
//! assert!(outcome.theme_applied);
//! ```

pub mod background;
pub mod classifier;
pub mod config;
pub mod document;
pub mod overlay;
pub mod page;
pub mod popup;
pub mod portapi;
pub mod storage;
pub mod theme;
pub mod utils;

pub use classifier::{detect, is_page_light, luminance, Document, Mode};
pub use config::Config;
pub use document::StaticDocument;
pub use overlay::RootStyle;
pub use theme::{Overlay, StateSnapshot, ThemeMachine, ThemeOutcome, ThemeState};
pub use utils::rgb::Rgb;
