//! Transport ownership and event loop.
//!
//! The [`ChannelManager`] owns the WebSocket handle and the lifecycle
//! state machine. It spawns one tokio task per session that handles:
//!
//! - Incoming text frames (decoded and dispatched to handlers)
//! - Outgoing frames queued by [`ChannelManager::send`]
//! - The open and close transport events
//!
//! All dispatch, handler execution, and channel-ready draining happen on
//! that single task, so one inbound frame is fully processed before the
//! next is considered.

// ============================================================================
// Imports
// ============================================================================

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::client::Client;
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::protocol::Message;

use super::ChannelState;

// ============================================================================
// ChannelManager
// ============================================================================

/// Owns the channel's transport handle and lifecycle state.
///
/// The manager never queues or retries: `send` before `Open` is a caller
/// error, a failed connect leaves the state machine at `Connecting`, and
/// a closed channel is terminal for the session.
pub struct ChannelManager {
    /// Lifecycle state, advanced only by `advance`.
    state: Mutex<ChannelState>,
    /// Outbound frame queue into the event loop; installed on connect,
    /// dropped on close.
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
}

impl Default for ChannelManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelManager {
    /// Creates a manager with no connection attempt made.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ChannelState::Unopened),
            outbound: Mutex::new(None),
        }
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ChannelState {
        *self.state.lock()
    }

    /// Opens the channel to `uri`.
    ///
    /// Transitions `Unopened -> Connecting` and spawns the connect task.
    /// Connect failure is logged and non-fatal: there is no recovery path
    /// client-side, so the state machine stays at `Connecting` with no
    /// retry. Must be called from within a tokio runtime.
    pub fn open(&self, uri: Url, client: Client) {
        if !self.advance(ChannelState::Connecting) {
            return;
        }

        info!(%uri, "opening channel");
        tokio::spawn(Self::run(uri, client));
    }

    /// Serializes `message` and hands it to the event loop.
    ///
    /// Fire-and-forget: there is no delivery confirmation and no
    /// backpressure.
    ///
    /// # Errors
    ///
    /// - [`Error::ChannelNotOpen`] if the state is not `Open` (a
    ///   caller-contract violation; nothing is queued)
    /// - [`Error::Json`] if serialization fails
    /// - [`Error::ConnectionClosed`] if the send races with teardown
    pub fn send(&self, message: &Message) -> Result<()> {
        let state = self.state();
        if !state.is_open() {
            error!(cmd = %message.cmd, %state, "send attempted while channel not open");
            return Err(Error::channel_not_open(state));
        }

        let frame = message.to_frame()?;

        let outbound = self.outbound.lock();
        let tx = outbound.as_ref().ok_or(Error::ConnectionClosed)?;
        tx.send(frame).map_err(|_| Error::ConnectionClosed)?;

        debug!(cmd = %message.cmd, "message sent");
        Ok(())
    }

    // ========================================================================
    // Transport Events
    // ========================================================================
    //
    // The event loop funnels every transport event through these entry
    // points; tests drive them directly to exercise the same code paths
    // without a socket.

    /// Installs the outbound frame queue.
    pub(crate) fn attach(&self, tx: mpsc::UnboundedSender<String>) {
        *self.outbound.lock() = Some(tx);
    }

    /// Transport open: transition to `Open` and drain the channel-ready
    /// queue in insertion order.
    pub(crate) fn handle_open(&self, client: &Client) {
        if !self.advance(ChannelState::Open) {
            return;
        }

        info!("channel open");
        client.drain_channel_ready();
    }

    /// Transport message: decode the frame and dispatch it.
    ///
    /// Malformed frames are dropped with a diagnostic, never fatal.
    /// Nothing is dispatched once the channel has closed.
    pub(crate) fn handle_frame(&self, client: &Client, text: &str) {
        if self.state().is_terminal() {
            trace!("frame after close, ignored");
            return;
        }

        match Message::from_frame(text) {
            Ok(message) => {
                debug!(cmd = %message.cmd, "message received");
                Dispatcher::dispatch(client, &message);
            }
            Err(e) => {
                warn!(error = %e, frame = %text, "malformed frame dropped");
            }
        }
    }

    /// Transport close: transition to `Closed` and drop the outbound
    /// queue. No ready queue is drained; nothing is dispatched afterward.
    pub(crate) fn handle_close(&self) {
        if self.advance(ChannelState::Closed) {
            info!("channel closed");
        }
        *self.outbound.lock() = None;
    }

    /// Walks the state machine to `Connecting` without a socket, standing
    /// in for `open` when tests drive the transport events directly.
    #[cfg(test)]
    pub(crate) fn open_for_test(&self) {
        assert!(self.advance(ChannelState::Connecting));
    }

    /// Advances the state machine, rejecting illegal transitions.
    fn advance(&self, next: ChannelState) -> bool {
        let mut state = self.state.lock();
        if !state.can_transition_to(next) {
            warn!(from = %*state, to = %next, "illegal channel transition ignored");
            return false;
        }

        debug!(from = %*state, to = %next, "channel state transition");
        *state = next;
        true
    }

    // ========================================================================
    // Event Loop
    // ========================================================================

    /// Connects to `uri` and runs the session event loop to completion.
    async fn run(uri: Url, client: Client) {
        let ws_stream = match connect_async(uri.as_str()).await {
            Ok((ws_stream, _response)) => ws_stream,
            Err(e) => {
                // No retry: the state machine stays at Connecting.
                error!(%uri, error = %e, "channel connect failed");
                return;
            }
        };

        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
        let channel = client.channel();
        channel.attach(outbound_tx);
        channel.handle_open(&client);

        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                // Inbound frames from the server
                incoming = ws_read.next() => {
                    match incoming {
                        Some(Ok(WsMessage::Text(text))) => {
                            channel.handle_frame(&client, &text);
                        }

                        Some(Ok(WsMessage::Close(_))) => {
                            debug!("close frame received");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "channel transport error");
                            break;
                        }

                        None => {
                            debug!("channel stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Outbound frames queued by send
                frame = outbound_rx.recv() => {
                    match frame {
                        Some(frame) => {
                            if let Err(e) = ws_write.send(WsMessage::Text(frame.into())).await {
                                error!(error = %e, "failed to write frame");
                                break;
                            }
                        }
                        None => {
                            debug!("outbound queue closed");
                            break;
                        }
                    }
                }
            }
        }

        channel.handle_close();
        debug!("event loop terminated");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::Value;

    use super::*;
    use crate::page::MemoryPage;

    fn test_client() -> Client {
        Client::new(Arc::new(MemoryPage::new()))
    }

    /// Walks the manager to `Open` with a captured outbound queue.
    fn open_channel(client: &Client) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let channel = client.channel();
        assert!(channel.advance(ChannelState::Connecting));
        channel.attach(tx);
        channel.handle_open(client);
        rx
    }

    #[test]
    fn test_lifecycle_transitions_once() {
        let client = test_client();
        let channel = client.channel();
        assert_eq!(channel.state(), ChannelState::Unopened);

        assert!(channel.advance(ChannelState::Connecting));
        assert_eq!(channel.state(), ChannelState::Connecting);

        channel.handle_open(&client);
        assert_eq!(channel.state(), ChannelState::Open);

        // A second open event is an illegal transition and is ignored.
        channel.handle_open(&client);
        assert_eq!(channel.state(), ChannelState::Open);

        channel.handle_close();
        assert_eq!(channel.state(), ChannelState::Closed);

        // Closed is terminal.
        channel.handle_open(&client);
        assert_eq!(channel.state(), ChannelState::Closed);
    }

    #[test]
    fn test_send_requires_open() {
        let client = test_client();
        let channel = client.channel();
        let message = Message::request("ping", "", Value::Null);

        let err = channel.send(&message).expect_err("unopened");
        assert!(matches!(
            err,
            Error::ChannelNotOpen {
                state: ChannelState::Unopened
            }
        ));

        assert!(channel.advance(ChannelState::Connecting));
        let err = channel.send(&message).expect_err("connecting");
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_send_writes_frame_when_open() {
        let client = test_client();
        let mut rx = open_channel(&client);

        let message = Message::request("ping", "", Value::Null);
        client.channel().send(&message).expect("send while open");

        let frame = rx.try_recv().expect("one frame queued");
        let decoded = Message::from_frame(&frame).expect("decode");
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_send_after_close_fails() {
        let client = test_client();
        let _rx = open_channel(&client);
        client.channel().handle_close();

        let message = Message::request("ping", "", Value::Null);
        let err = client.channel().send(&message).expect_err("closed");
        assert!(matches!(
            err,
            Error::ChannelNotOpen {
                state: ChannelState::Closed
            }
        ));
    }

    #[test]
    fn test_open_drains_channel_ready_queue() {
        let client = test_client();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = Arc::clone(&count);
        client.on_channel_ready(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(count.load(Ordering::SeqCst), 0);
        let _rx = open_channel(&client);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_frame_dispatches_to_handler() {
        let client = test_client();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = Arc::clone(&count);
        client.register("probe", move |_client, _message| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        let _rx = open_channel(&client);
        client
            .channel()
            .handle_frame(&client, r#"{"cmd":"probe","status":"","callback":"","payload":null}"#);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_malformed_frame_dropped() {
        let client = test_client();
        let _rx = open_channel(&client);

        // Neither of these may panic or change state.
        client.channel().handle_frame(&client, "not json");
        client.channel().handle_frame(&client, r#"{"cmd":""}"#);

        assert_eq!(client.channel().state(), ChannelState::Open);
    }

    #[test]
    fn test_no_dispatch_after_close() {
        let client = test_client();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = Arc::clone(&count);
        client.register("probe", move |_client, _message| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        let _rx = open_channel(&client);
        client.channel().handle_close();
        client
            .channel()
            .handle_frame(&client, r#"{"cmd":"probe","status":"","callback":"","payload":null}"#);

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
