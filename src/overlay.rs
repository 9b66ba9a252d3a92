use std::collections::{BTreeMap, BTreeSet};

use crate::config::Config;
use crate::theme::Overlay;

/// In-memory model of the root element's inline style and class list.
///
/// Holds the configured palette and marker class and writes or clears all
/// of them together.
#[derive(Clone, Debug, Default)]
pub struct RootStyle {
    palette: BTreeMap<String, String>,
    marker_class: String,
    properties: BTreeMap<String, String>,
    classes: BTreeSet<String>,
}

impl RootStyle {
    pub fn new(config: &Config) -> Self {
        RootStyle {
            palette: config.palette.clone(),
            marker_class: config.marker_class.clone(),
            properties: BTreeMap::new(),
            classes: BTreeSet::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

impl Overlay for RootStyle {
    fn set_applied(&mut self, applied: bool) {
        if applied {
            self.classes.insert(self.marker_class.clone());
            for (name, value) in &self.palette {
                self.properties.insert(name.clone(), value.clone());
            }
        } else {
            self.classes.remove(&self.marker_class);
            for name in self.palette.keys() {
                self.properties.remove(name);
            }
        }
    }

    fn is_applied(&self) -> bool {
        self.classes.contains(&self.marker_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_and_clears_as_a_unit() {
        let config = Config::default();
        let mut style = RootStyle::new(&config);
        assert!(!style.is_applied());
        assert!(style.properties().is_empty());

        style.set_applied(true);
        assert!(style.has_class("deep-dark-mode-root"));
        assert_eq!(style.properties(), &config.palette);
        assert_eq!(style.property("--dd-text"), Some("#e5e7eb"));

        style.set_applied(false);
        assert!(!style.is_applied());
        assert!(style.properties().is_empty());
    }

    #[test]
    fn applying_twice_is_harmless() {
        let mut style = RootStyle::new(&Config::default());
        style.set_applied(true);
        style.set_applied(true);
        assert_eq!(style.properties().len(), 6);

        style.set_applied(false);
        style.set_applied(false);
        assert!(style.properties().is_empty());
    }
}
