use log::{debug, warn};
use tokio::sync::broadcast;

use crate::page::Trigger;

const TRIGGER_BUFFER: usize = 16;

/// The toolbar action of one tab.
///
/// The action surface cannot address the page's request channel, so a click
/// is posted as a page-internal signal that the page relays into its own
/// toggle path.
#[derive(Clone, Debug)]
pub struct ActionButton {
    triggers: broadcast::Sender<Trigger>,
}

impl ActionButton {
    /// Creates the button together with the receiving end the page listens on.
    pub fn channel() -> (ActionButton, broadcast::Receiver<Trigger>) {
        let (triggers, receiver) = broadcast::channel(TRIGGER_BUFFER);
        (ActionButton { triggers }, receiver)
    }

    /// Another receiving end, e.g. for a page loaded after a navigation.
    pub fn subscribe(&self) -> broadcast::Receiver<Trigger> {
        self.triggers.subscribe()
    }

    /// Posts a toggle signal into the page. Returns `false` when no page is
    /// listening; the click is then dropped.
    ///
    /// At most `TRIGGER_BUFFER` clicks wait for the page. If the page falls
    /// further behind, the oldest waiting clicks are lost (the page logs how
    /// many) and so are their toggles.
    pub fn click(&self) -> bool {
        match self.triggers.send(Trigger::ToggleFromAction) {
            Ok(listeners) => {
                debug!("action click delivered to {} listener(s)", listeners);
                true
            }
            Err(_) => {
                warn!("toggle failed: no page is listening for action clicks");
                false
            }
        }
    }
}
