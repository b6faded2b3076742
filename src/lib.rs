//! vizlink - client-side message dispatch over one persistent channel.
//!
//! This library is the page-resident half of a visualization session: it
//! keeps one persistent, bidirectional WebSocket channel back to the
//! server process that served the page, and routes inbound JSON messages
//! to registered handlers by command name.
//!
//! # Architecture
//!
//! - One [`Client`] owns: handler registry + readiness queues + channel
//! - Messages carry `cmd`/`status`/`callback`/`payload`; replies correlate
//!   through the request's `callback` field, not request IDs
//! - Two readiness queues defer work until "document usable" and
//!   "channel open" respectively
//! - All dispatch runs sequentially on the channel's event-loop task
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use url::Url;
//! use vizlink::{Client, MemoryPage, Message};
//!
//! #[tokio::main]
//! async fn main() -> vizlink::Result<()> {
//!     let client = Client::new(Arc::new(MemoryPage::new()));
//!
//!     // App-specific command handler; replies route through the
//!     // request's callback field.
//!     client.register("plotData", |client, message| {
//!         let reply = Message::reply_to(message, "plotted".into());
//!         if let Err(e) = client.send(&reply) {
//!             eprintln!("reply failed: {e}");
//!         }
//!     });
//!
//!     // Deferred until the channel is open.
//!     client.on_channel_ready(|| println!("channel is up"));
//!
//!     let page_url = Url::parse("http://localhost:9000/viz")?;
//!     client.init(&page_url)?;
//!     client.start();
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | The [`Client`] session facade |
//! | [`channel`] | Channel lifecycle and WebSocket transport |
//! | [`dispatch`] | Handler registry and message routing |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`page`] | Host-document boundary trait |
//! | [`protocol`] | Wire message types |
//! | [`ready`] | Readiness callback queues |
//!
//! # Scope
//!
//! One channel per session, no reconnection, no persistence, no
//! backpressure: a lost channel is terminal, and only a fresh session
//! recovers.

// ============================================================================
// Modules
// ============================================================================

/// Channel lifecycle and WebSocket transport.
pub mod channel;

/// The client session facade.
pub mod client;

/// Handler registry and message routing.
pub mod dispatch;

/// Error types and [`Result`] alias.
pub mod error;

/// Built-in command handlers.
mod handlers;

/// Host-document boundary.
pub mod page;

/// Wire message types.
pub mod protocol;

/// Readiness callback queues.
pub mod ready;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{ChannelManager, ChannelState, channel_uri};
pub use client::Client;
pub use dispatch::{Dispatcher, Handler, HandlerRegistry};
pub use error::{Error, Result};
pub use page::{MemoryPage, Page, Viewport};
pub use protocol::{Message, STATUS_ERROR, STATUS_SUCCESS};
pub use ready::ReadyQueue;
