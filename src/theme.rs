use log::debug;
use serde::{Deserialize, Serialize};

use crate::classifier::{is_page_light, Document};

/// Runtime theme state of one loaded document.
///
/// `Disabled` and `EnabledSuppressed` look the same on screen; they only
/// differ in the user's intent.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum ThemeState {
    #[default]
    Disabled,
    /// The user wants the overlay but the page is already dark.
    EnabledSuppressed,
    EnabledApplied,
}

impl ThemeState {
    pub fn is_enabled(self) -> bool {
        self != ThemeState::Disabled
    }

    pub fn is_applied(self) -> bool {
        self == ThemeState::EnabledApplied
    }
}

/// Result of a transition.
#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ThemeOutcome {
    pub enabled: bool,
    pub page_was_light: bool,
    pub theme_applied: bool,
}

/// Read-only view of the current state plus a fresh brightness sample.
#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub enabled: bool,
    pub theme_applied: bool,
    pub page_is_light: bool,
}

/// The visual override. Setting it must switch every style variable and
/// the marker as one unit; there is no partially applied state.
pub trait Overlay {
    fn set_applied(&mut self, applied: bool);
    fn is_applied(&self) -> bool;
}

/// Owns the theme state of a single document together with the document
/// handle and its overlay.
#[derive(Debug)]
pub struct ThemeMachine<D, O> {
    document: D,
    overlay: O,
    state: ThemeState,
}

impl<D: Document, O: Overlay> ThemeMachine<D, O> {
    pub fn new(document: D, overlay: O) -> Self {
        ThemeMachine {
            document,
            overlay,
            state: ThemeState::Disabled,
        }
    }

    /// Turns the theme on. The page brightness is sampled on every call, so
    /// enabling again after the page changed its background can move the
    /// machine between `EnabledApplied` and `EnabledSuppressed`.
    pub fn enable(&mut self) -> ThemeOutcome {
        let page_was_light = is_page_light(&self.document);

        self.state = if page_was_light {
            ThemeState::EnabledApplied
        } else {
            ThemeState::EnabledSuppressed
        };
        self.overlay.set_applied(page_was_light);

        debug!("theme enabled: state={:?}", self.state);
        self.outcome(page_was_light)
    }

    pub fn disable(&mut self) -> ThemeOutcome {
        self.state = ThemeState::Disabled;
        self.overlay.set_applied(false);

        debug!("theme disabled");
        self.outcome(is_page_light(&self.document))
    }

    pub fn toggle(&mut self) -> ThemeOutcome {
        if self.state.is_enabled() {
            self.disable()
        } else {
            self.enable()
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            enabled: self.state.is_enabled(),
            theme_applied: self.state.is_applied(),
            page_is_light: is_page_light(&self.document),
        }
    }

    pub fn state(&self) -> ThemeState {
        self.state
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    fn outcome(&self, page_was_light: bool) -> ThemeOutcome {
        ThemeOutcome {
            enabled: self.state.is_enabled(),
            page_was_light,
            theme_applied: self.state.is_applied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::StaticDocument;
    use crate::overlay::RootStyle;

    fn machine(background: &str) -> ThemeMachine<StaticDocument, RootStyle> {
        ThemeMachine::new(
            StaticDocument::with_body_background(background),
            RootStyle::new(&Config::default()),
        )
    }

    #[test]
    fn enable_on_light_page_applies() {
        let mut m = machine("rgb(250, 250, 250)");
        let outcome = m.enable();

        assert_eq!(
            outcome,
            ThemeOutcome {
                enabled: true,
                page_was_light: true,
                theme_applied: true
            }
        );
        assert_eq!(m.state(), ThemeState::EnabledApplied);
        assert!(m.overlay().is_applied());
    }

    #[test]
    fn enable_on_dark_page_is_suppressed() {
        let mut m = machine("rgb(10, 10, 10)");
        let outcome = m.enable();

        assert!(outcome.enabled);
        assert!(!outcome.page_was_light);
        assert!(!outcome.theme_applied);
        assert_eq!(m.state(), ThemeState::EnabledSuppressed);
        assert!(!m.overlay().is_applied());
    }

    #[test]
    fn disable_is_idempotent() {
        let mut m = machine("rgb(250, 250, 250)");

        for _ in 0..2 {
            let outcome = m.disable();
            assert!(!outcome.enabled);
            assert!(!outcome.theme_applied);
            assert_eq!(m.state(), ThemeState::Disabled);
        }
    }

    #[test]
    fn toggle_twice_restores_state() {
        for background in ["rgb(250, 250, 250)", "rgb(10, 10, 10)"] {
            let mut m = machine(background);
            let before = m.snapshot();

            m.toggle();
            let after = m.toggle();

            assert_eq!((after.enabled, after.theme_applied), (before.enabled, before.theme_applied));
            assert_eq!(m.state(), ThemeState::Disabled);
        }
    }

    #[test]
    fn toggle_from_suppressed_disables() {
        let mut m = machine("rgb(10, 10, 10)");
        m.enable();

        let outcome = m.toggle();
        assert!(!outcome.enabled);
        assert_eq!(m.state(), ThemeState::Disabled);
    }

    #[test]
    fn reenabling_resamples_brightness() {
        let mut m = machine("rgb(250, 250, 250)");
        assert!(m.enable().theme_applied);

        let body = m.document().body_element().unwrap();
        m.document_mut().set_background(body, Some("rgb(10, 10, 10)"));

        let outcome = m.enable();
        assert!(outcome.enabled);
        assert!(!outcome.theme_applied);
        assert_eq!(m.state(), ThemeState::EnabledSuppressed);
        assert!(!m.overlay().is_applied());
    }

    #[test]
    fn snapshot_does_not_mutate() {
        let mut m = machine("rgb(250, 250, 250)");
        m.enable();

        for _ in 0..3 {
            let snapshot = m.snapshot();
            assert!(snapshot.enabled);
            assert!(snapshot.theme_applied);
            assert!(snapshot.page_is_light);
        }
        assert_eq!(m.state(), ThemeState::EnabledApplied);
    }
}
