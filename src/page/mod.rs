//! The page side of the synchronization protocol.
//!
//! A [`PageContext`] exists once per loaded document. It owns the theme
//! machine, answers requests from other surfaces, relays action triggers into
//! the same toggle path and mirrors the user's intent into the preference
//! store.
//!
//! The store is advisory. Reading it may fail, in which case the intent
//! defaults to on. Writing it may fail, in which case the error is logged and
//! dropped. The in-memory state of the page that ran a toggle is what counts
//! for the rest of its session.

// The runtime module spawns the page's event loop on the tokio runtime.
mod runtime;

pub use runtime::PageRuntime;

use log::{debug, error, info, warn};

use crate::classifier::Document;
use crate::portapi::message::{Message, MessageError, Payload};
use crate::portapi::types::{Request, Response};
use crate::storage::{self, PreferenceStore};
use crate::theme::{Overlay, StateSnapshot, ThemeMachine, ThemeOutcome};

/// Page-internal signals that do not come through the addressed request
/// channel.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Trigger {
    /// The action button was clicked; treat as a toggle.
    ToggleFromAction,
    /// A page message of another kind or from another origin. Ignored.
    Foreign(String),
}

pub struct PageContext<D, O, S> {
    machine: ThemeMachine<D, O>,
    store: S,
    storage_key: String,
}

impl<D, O, S> PageContext<D, O, S>
where
    D: Document,
    O: Overlay,
    S: PreferenceStore,
{
    /// Seeds the theme from the stored intent. A missing key means off; an
    /// unreadable store means on.
    pub async fn load(machine: ThemeMachine<D, O>, store: S, storage_key: impl Into<String>) -> Self {
        let mut context = PageContext {
            machine,
            store,
            storage_key: storage_key.into(),
        };

        let enabled = match context.store.get(&context.storage_key).await {
            Ok(value) => value.unwrap_or(false),
            Err(err) => {
                warn!("failed to read theme preference, assuming enabled: {}", err);
                true
            }
        };

        if enabled {
            let outcome = context.machine.enable();
            info!("theme enabled on load: applied={}", outcome.theme_applied);
        }

        context
    }

    /// Toggles the theme and persists the new intent.
    pub async fn toggle(&mut self) -> ThemeOutcome {
        let outcome = self.machine.toggle();

        let persisted = self.store.set(&self.storage_key, outcome.enabled).await;
        ignore_persist_error(persisted);

        outcome
    }

    /// Current state with a fresh brightness sample. Never changes state.
    pub fn state(&self) -> StateSnapshot {
        self.machine.snapshot()
    }

    pub async fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::Toggle => Response::Toggled(self.toggle().await),
            Request::GetState => Response::State(self.state()),
        }
    }

    /// Decodes one wire frame, handles it and encodes the answer. Frames
    /// that cannot be decoded are answered with an error response.
    pub async fn handle_frame(&mut self, frame: &str) -> String {
        let msg = match frame.parse::<Message>() {
            Ok(msg) => msg,
            Err(err) => {
                error!("failed to deserialize message {:?}: {}", frame, err);
                return encode_response(0, Response::Error(err.to_string()));
            }
        };

        let id = msg.id;
        let response = match Request::try_from(msg) {
            Ok(request) => {
                debug!("handling request {}: {:?}", id, request);
                self.handle(request).await
            }
            Err(err) => {
                error!("invalid request: {}", err);
                Response::Error(err.to_string())
            }
        };

        encode_response(id, response)
    }

    /// Handles a page-internal signal. Returns the outcome if it toggled.
    pub async fn on_trigger(&mut self, trigger: Trigger) -> Option<ThemeOutcome> {
        match trigger {
            Trigger::ToggleFromAction => {
                debug!("toggle requested by action button");
                Some(self.toggle().await)
            }
            Trigger::Foreign(kind) => {
                debug!("ignoring page message {:?}", kind);
                None
            }
        }
    }

    pub fn machine(&self) -> &ThemeMachine<D, O> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut ThemeMachine<D, O> {
        &mut self.machine
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Persisting the intent is best effort. A failed write is logged and
/// otherwise ignored on purpose.
fn ignore_persist_error(result: storage::Result<()>) {
    if let Err(err) = result {
        warn!("failed to persist theme preference, dropping write: {}", err);
    }
}

fn encode_response(id: usize, response: Response) -> String {
    let mut msg = match Message::try_from(response) {
        Ok(msg) => msg,
        Err(err) => {
            error!("failed to encode response: {}", err);
            encoding_failure(err)
        }
    };

    msg.id = id;
    msg.into()
}

fn encoding_failure(err: MessageError) -> Message {
    let payload = Payload::json(&err.to_string())
        .unwrap_or_else(|_| Payload::Json("\"failed to encode response\"".to_string()));

    Message {
        id: 0,
        cmd: "error".to_string(),
        payload: Some(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::StaticDocument;
    use crate::overlay::RootStyle;
    use crate::storage::MemoryStore;
    use crate::theme::ThemeState;
    use assert_matches::assert_matches;

    const KEY: &str = "deepDarkModeEnabled";

    async fn page(background: &str, store: &MemoryStore) -> PageContext<StaticDocument, RootStyle, MemoryStore> {
        let machine = ThemeMachine::new(
            StaticDocument::with_body_background(background),
            RootStyle::new(&Config::default()),
        );
        PageContext::load(machine, store.clone(), KEY).await
    }

    #[tokio::test]
    async fn missing_key_loads_disabled() {
        let store = MemoryStore::new();
        let page = page("rgb(255, 255, 255)", &store).await;

        assert_eq!(page.machine().state(), ThemeState::Disabled);
    }

    #[tokio::test]
    async fn stored_intent_is_applied_on_load() {
        let store = MemoryStore::new();
        store.set(KEY, true).await.unwrap();

        let light = page("rgb(255, 255, 255)", &store).await;
        assert_eq!(light.machine().state(), ThemeState::EnabledApplied);

        let dark = page("rgb(0, 0, 0)", &store).await;
        assert_eq!(dark.machine().state(), ThemeState::EnabledSuppressed);
    }

    #[tokio::test]
    async fn read_failure_fails_open() {
        let store = MemoryStore::new();
        store.fail_reads(true);

        let page = page("rgb(255, 255, 255)", &store).await;
        assert!(page.state().enabled);
        assert!(page.state().theme_applied);
    }

    #[tokio::test]
    async fn toggle_persists_intent() {
        let store = MemoryStore::new();
        let mut page = page("rgb(10, 10, 10)", &store).await;

        let outcome = page.toggle().await;
        assert!(outcome.enabled);
        assert!(!outcome.theme_applied);
        assert_eq!(store.value(KEY), Some(true));

        page.toggle().await;
        assert_eq!(store.value(KEY), Some(false));
    }

    #[tokio::test]
    async fn write_failure_does_not_affect_toggle() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        let mut page = page("rgb(255, 255, 255)", &store).await;

        let outcome = page.toggle().await;
        assert!(outcome.enabled);
        assert!(outcome.theme_applied);
        assert_eq!(store.value(KEY), None);
    }

    #[tokio::test]
    async fn frames_are_answered_with_same_id() {
        let store = MemoryStore::new();
        let mut page = page("rgb(255, 255, 255)", &store).await;

        let answer = page.handle_frame("42|GET_STATE").await;
        assert_eq!(
            answer,
            r#"42|state|J{"enabled":false,"themeApplied":false,"pageIsLight":true}"#
        );

        let answer = page.handle_frame("43|TOGGLE").await;
        assert_eq!(
            answer,
            r#"43|toggled|J{"enabled":true,"pageWasLight":true,"themeApplied":true}"#
        );
    }

    #[tokio::test]
    async fn bad_frames_get_error_responses() {
        let store = MemoryStore::new();
        let mut page = page("rgb(255, 255, 255)", &store).await;

        let answer: Message = page.handle_frame("5|DDM_TOGGLE").await.parse().unwrap();
        assert_eq!(answer.id, 5);
        assert_matches!(Response::try_from(answer), Ok(Response::Error(_)));

        let answer: Message = page.handle_frame("garbage").await.parse().unwrap();
        assert_eq!(answer.id, 0);
        assert_eq!(answer.cmd, "error");

        assert_eq!(page.machine().state(), ThemeState::Disabled);
    }

    #[tokio::test]
    async fn only_action_triggers_toggle() {
        let store = MemoryStore::new();
        let mut page = page("rgb(255, 255, 255)", &store).await;

        assert_eq!(page.on_trigger(Trigger::Foreign("SOMETHING_ELSE".to_string())).await, None);
        assert_eq!(page.machine().state(), ThemeState::Disabled);

        let outcome = page.on_trigger(Trigger::ToggleFromAction).await;
        assert_matches!(outcome, Some(ThemeOutcome { enabled: true, .. }));
        assert_eq!(store.value(KEY), Some(true));
    }

    #[test]
    fn encoding_failure_is_valid_json() {
        let err = MessageError::UnknownCommand("\u{1b}[31m\"quoted\"".to_string());

        let wire: String = encoding_failure(err).into();
        let answer: Message = wire.parse().unwrap();
        assert_matches!(
            Response::try_from(answer),
            Ok(Response::Error(reason)) if reason.ends_with("\u{1b}[31m\"quoted\"")
        );
    }
}
