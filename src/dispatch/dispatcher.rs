//! Inbound message routing.
//!
//! The dispatcher looks up an inbound message's `cmd` in the handler
//! registry and invokes every registered handler in registration order.
//! Dispatch is synchronous: handlers run to completion on the channel
//! event-loop task before the next inbound frame is considered.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, trace};

use crate::client::Client;
use crate::protocol::Message;

// ============================================================================
// Dispatcher
// ============================================================================

/// Routes inbound messages to registered handlers.
pub struct Dispatcher;

impl Dispatcher {
    /// Dispatches `message` to every handler registered for its `cmd`.
    ///
    /// An unregistered command is tolerated: the registry is populated
    /// incrementally and the client and server versions may disagree on
    /// the command set, so the message is dropped with a diagnostic.
    ///
    /// Handler panics are not caught here: a failing handler is a defect
    /// in the command implementation and propagates to the runtime's
    /// panic channel rather than being masked.
    pub fn dispatch(client: &Client, message: &Message) {
        // Handlers are cloned out of the registry lock so they may
        // re-enter the client (register, send) while running.
        let Some(handlers) = client.handlers_for(&message.cmd) else {
            debug!(cmd = %message.cmd, "no handler registered, message dropped");
            return;
        };

        trace!(
            cmd = %message.cmd,
            handlers = handlers.len(),
            "dispatching message"
        );

        for handler in &handlers {
            handler(client, message);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
