//! Live reload over WebSocket.
//!
//! The dev server pushes [`ReloadMessage`]s to connected browsers after
//! watch-triggered task runs. The client script is injected into served
//! HTML by [`crate::embed`].

mod message;
mod server;

pub use message::ReloadMessage;
pub use server::ReloadServer;
