use log::{debug, error, warn};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::{PageContext, Trigger};
use crate::classifier::Document;
use crate::portapi::client::{Command, PageClient};
use crate::storage::PreferenceStore;
use crate::theme::Overlay;

const REQUEST_BUFFER: usize = 64;

/// A page context running as its own task.
///
/// The task handles one request or trigger at a time and runs each to
/// completion before looking at the next, so no two transitions interleave.
/// It stops on [`PageRuntime::unload`] or when the runtime is dropped; from
/// then on every [`PageClient`] request fails as unreachable.
pub struct PageRuntime {
    client: PageClient,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl PageRuntime {
    /// Spawns the page's event loop on the current tokio runtime.
    pub fn spawn<D, O, S>(context: PageContext<D, O, S>, triggers: broadcast::Receiver<Trigger>) -> Self
    where
        D: Document + Send + 'static,
        O: Overlay + Send + 'static,
        S: PreferenceStore + 'static,
    {
        let (dispatch, requests) = mpsc::channel::<Command>(REQUEST_BUFFER);
        let (shutdown, unloaded) = oneshot::channel();

        let task = tokio::spawn(run(context, requests, triggers, unloaded));

        PageRuntime {
            client: PageClient::new(dispatch),
            shutdown,
            task,
        }
    }

    /// Returns a client addressed to this page.
    pub fn client(&self) -> PageClient {
        self.client.clone()
    }

    /// Tears the page down, e.g. on navigation. A request that is already
    /// being handled finishes first.
    pub async fn unload(self) {
        let _ = self.shutdown.send(());

        if let Err(err) = self.task.await {
            error!("page task failed: {}", err);
        }
    }
}

async fn run<D, O, S>(
    mut context: PageContext<D, O, S>,
    mut requests: mpsc::Receiver<Command>,
    mut triggers: broadcast::Receiver<Trigger>,
    mut unloaded: oneshot::Receiver<()>,
) where
    D: Document,
    O: Overlay,
    S: PreferenceStore,
{
    let mut listen_for_triggers = true;

    loop {
        // triggers before requests: a click posted ahead of a request is
        // handled ahead of it
        tokio::select! {
            biased;

            _ = &mut unloaded => {
                debug!("page unloading");
                return;
            },

            trigger = triggers.recv(), if listen_for_triggers => {
                match trigger {
                    Ok(trigger) => {
                        context.on_trigger(trigger).await;
                    }
                    Err(RecvError::Lagged(missed)) => {
                        warn!("page missed {} trigger(s)", missed);
                    }
                    Err(RecvError::Closed) => {
                        debug!("trigger channel closed");
                        listen_for_triggers = false;
                    }
                }
            },

            cmd = requests.recv() => {
                let Some(cmd) = cmd else {
                    debug!("all page clients dropped");
                    return;
                };

                let answer = context.handle_frame(&cmd.frame).await;
                if cmd.reply.send(answer).is_err() {
                    debug!("requester went away before the page answered");
                }
            },
        }
    }
}
