use log::debug;

use crate::portapi::client::PageClient;

/// The popup's on/off indicator.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Indicator {
    On,
    #[default]
    Off,
}

impl Indicator {
    pub fn from_bool(on: bool) -> Self {
        if on {
            Indicator::On
        } else {
            Indicator::Off
        }
    }

    pub fn is_on(self) -> bool {
        self == Indicator::On
    }

    pub fn label(self) -> &'static str {
        match self {
            Indicator::On => "On",
            Indicator::Off => "Off",
        }
    }
}

/// The popup shown from the toolbar. It talks to the page of the active
/// tab, if there is one, and never surfaces errors: an unreachable page
/// reads as off.
#[derive(Debug)]
pub struct Popup {
    page: Option<PageClient>,
    indicator: Indicator,
}

impl Popup {
    /// Opens the popup for the active tab's page and renders its state.
    pub async fn open(page: Option<PageClient>) -> Self {
        let mut popup = Popup {
            page,
            indicator: Indicator::Off,
        };

        if let Some(page) = &popup.page {
            popup.indicator = match page.get_state().await {
                Ok(state) => Indicator::from_bool(state.enabled),
                Err(err) => {
                    debug!("page did not answer state query: {}", err);
                    Indicator::Off
                }
            };
        }

        popup
    }

    /// The user flipped the switch. The indicator is re-rendered from the
    /// page's answer; without an answer the state is unknown and it reads off.
    pub async fn on_toggle(&mut self) -> Indicator {
        if let Some(page) = &self.page {
            match page.toggle().await {
                Ok(outcome) => self.indicator = Indicator::from_bool(outcome.enabled),
                Err(err) => {
                    debug!("page did not answer toggle: {}", err);
                    self.indicator = Indicator::Off;
                }
            }
        }

        self.indicator
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }
}
