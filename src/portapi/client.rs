use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::debug;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::message::*;
use super::types::*;
use crate::theme::{StateSnapshot, ThemeOutcome};

/// A wire frame on its way into a page context together with the channel
/// the page answers on.
#[derive(Debug)]
pub struct Command {
    pub frame: String,
    pub reply: oneshot::Sender<String>,
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The page context is gone (closed or navigated away) or dropped the
    /// request without answering. Callers must treat this as "state
    /// unknown, assume disabled".
    #[error("page context is unreachable")]
    Unreachable,

    #[error("page rejected request: {0}")]
    Rejected(String),

    #[error("response id {got} does not match request id {expected}")]
    MismatchedID { expected: usize, got: usize },

    #[error("unexpected response to {0:?}")]
    UnexpectedResponse(Request),

    #[error(transparent)]
    Message(#[from] MessageError),
}

/// Addresses a single page context. Cheap to clone; all clones talk to the
/// same page.
#[derive(Clone, Debug)]
pub struct PageClient {
    dispatch: mpsc::Sender<Command>,
    next_id: Arc<AtomicUsize>,
}

impl PageClient {
    pub fn new(dispatch: mpsc::Sender<Command>) -> Self {
        PageClient {
            dispatch,
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Sends `request` and waits for the page's answer. There is no
    /// timeout: the request either gets answered or fails with
    /// [`ClientError::Unreachable`] once the page goes away.
    pub async fn request(&self, request: Request) -> Result<Response, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut msg: Message = request.into();
        msg.id = id;
        let frame: String = msg.into();

        debug!("sending frame to page: {}", frame);

        let (reply, answer) = oneshot::channel();
        self.dispatch
            .send(Command { frame, reply })
            .await
            .map_err(|_| ClientError::Unreachable)?;

        let answer = answer.await.map_err(|_| ClientError::Unreachable)?;
        debug!("received frame from page: {}", answer);

        let msg: Message = answer.parse()?;
        if msg.id != id {
            return Err(ClientError::MismatchedID {
                expected: id,
                got: msg.id,
            });
        }

        Ok(msg.try_into()?)
    }

    pub async fn toggle(&self) -> Result<ThemeOutcome, ClientError> {
        match self.request(Request::Toggle).await? {
            Response::Toggled(outcome) => Ok(outcome),
            Response::Error(reason) => Err(ClientError::Rejected(reason)),
            Response::State(_) => Err(ClientError::UnexpectedResponse(Request::Toggle)),
        }
    }

    pub async fn get_state(&self) -> Result<StateSnapshot, ClientError> {
        match self.request(Request::GetState).await? {
            Response::State(snapshot) => Ok(snapshot),
            Response::Error(reason) => Err(ClientError::Rejected(reason)),
            Response::Toggled(_) => Err(ClientError::UnexpectedResponse(Request::GetState)),
        }
    }

    /// Reports whether the page context has gone away.
    pub fn is_closed(&self) -> bool {
        self.dispatch.is_closed()
    }
}
