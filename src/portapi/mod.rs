//! Request/response messaging between a control surface (popup, action
//! trigger) and one page context.
//!
//! Requests and responses travel as text frames (see [`message::Message`])
//! over an in-process channel, each request carrying its own reply channel.

pub mod client;
pub mod message;
pub mod types;
