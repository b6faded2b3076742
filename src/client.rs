//! Client facade.
//!
//! [`Client`] composes the handler registry, the two readiness queues,
//! the channel manager, and the host page into one session object. The
//! surrounding application touches exactly two lifecycle entry points:
//!
//! - [`Client::init`] derives the channel endpoint from the page URL,
//!   registers the built-in command handlers, and opens the channel.
//! - [`Client::start`] drains the document-ready queue once the host
//!   document is usable.
//!
//! Everything else is reached through handler registration or
//! [`Client::send`]. A `Client` is an explicit instance, not a global:
//! cloning yields another handle to the same session, and independent
//! sessions coexist freely.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use url::Url;
//! use vizlink::{Client, MemoryPage};
//!
//! #[tokio::main]
//! async fn main() -> vizlink::Result<()> {
//!     let client = Client::new(Arc::new(MemoryPage::new()));
//!
//!     client.on_channel_ready(|| println!("channel is up"));
//!
//!     let page_url = Url::parse("http://localhost:9000/viz")?;
//!     client.init(&page_url)?;
//!     client.start();
//!     Ok(())
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};
use url::Url;

use crate::channel::{ChannelManager, ChannelState, channel_uri};
use crate::dispatch::{Handler, HandlerRegistry};
use crate::error::Result;
use crate::handlers;
use crate::page::Page;
use crate::protocol::Message;
use crate::ready::ReadyQueue;

// ============================================================================
// Client
// ============================================================================

/// Handle to one client session.
///
/// Cheap to clone; all clones share the same registry, queues, and
/// channel. Callbacks handed to the channel or the queues capture a
/// clone of this handle, never an ambient global, so dispatch and send
/// always resolve against the owning session.
#[derive(Clone)]
pub struct Client {
    /// Shared session state.
    inner: Arc<ClientInner>,
}

/// State owned by one session.
struct ClientInner {
    /// Client name reported in diagnostics.
    name: String,
    /// The host document boundary.
    page: Arc<dyn Page>,
    /// Command-keyed handler registry.
    registry: Mutex<HandlerRegistry>,
    /// Callbacks deferred until the host document is usable.
    document_ready: ReadyQueue,
    /// Callbacks deferred until the channel is open.
    channel_ready: ReadyQueue,
    /// The channel lifecycle and transport owner.
    channel: ChannelManager,
}

impl Client {
    /// Default client name.
    const DEFAULT_NAME: &'static str = "vizlink client";

    /// Creates a session over `page` with the default name.
    #[must_use]
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self::with_name(page, Self::DEFAULT_NAME)
    }

    /// Creates a session over `page` with an explicit name.
    #[must_use]
    pub fn with_name(page: Arc<dyn Page>, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                name: name.into(),
                page,
                registry: Mutex::new(HandlerRegistry::new()),
                document_ready: ReadyQueue::new("document-ready"),
                channel_ready: ReadyQueue::new("channel-ready"),
                channel: ChannelManager::new(),
            }),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Initializes the session.
    ///
    /// Derives the channel endpoint from `page_url` (scheme promotion
    /// only: `http -> ws`, `https -> wss`), registers the built-in
    /// command handlers, and opens the channel. Must be called from
    /// within a tokio runtime.
    ///
    /// There is no way to abort the attempt: the channel proceeds to
    /// `Open` or `Closed`, and once closed only a fresh session recovers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if `page_url` has
    /// no corresponding channel scheme. Connect failures are not
    /// reported here; they are logged by the channel task.
    pub fn init(&self, page_url: &Url) -> Result<()> {
        let uri = channel_uri(page_url)?;
        info!(client = %self.inner.name, page = %page_url, channel = %uri, "initializing");

        handlers::register_builtins(self);
        self.inner.channel.open(uri, self.clone());
        Ok(())
    }

    /// Signals that the host document is usable.
    ///
    /// Drains the document-ready queue in insertion order.
    pub fn start(&self) {
        debug!(client = %self.inner.name, "document ready");
        self.inner.document_ready.drain();
    }

    // ========================================================================
    // Registration Surface
    // ========================================================================

    /// Registers `handler` for `cmd`.
    ///
    /// Handlers for the same command accumulate and run in registration
    /// order. A handler may reply by calling [`send`](Self::send) on the
    /// client it receives.
    pub fn register(
        &self,
        cmd: impl Into<String>,
        handler: impl Fn(&Client, &Message) + Send + Sync + 'static,
    ) {
        self.inner.registry.lock().register(cmd, Arc::new(handler));
    }

    /// Returns the registered command names, sorted.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.inner.registry.lock().commands()
    }

    /// Defers `callback` until the host document is usable.
    pub fn on_document_ready(&self, callback: impl FnOnce() + Send + 'static) {
        self.inner.document_ready.push(callback);
    }

    /// Defers `callback` until the channel is open.
    pub fn on_channel_ready(&self, callback: impl FnOnce() + Send + 'static) {
        self.inner.channel_ready.push(callback);
    }

    // ========================================================================
    // Channel Surface
    // ========================================================================

    /// Sends `message` over the channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelNotOpen`](crate::Error::ChannelNotOpen)
    /// if the channel is not open; the message is never queued.
    pub fn send(&self, message: &Message) -> Result<()> {
        self.inner.channel.send(message)
    }

    /// Returns the channel's lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ChannelState {
        self.inner.channel.state()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the client name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the host page.
    #[inline]
    #[must_use]
    pub fn page(&self) -> &dyn Page {
        self.inner.page.as_ref()
    }

    // ========================================================================
    // Crate Internals
    // ========================================================================

    /// Returns the ordered handlers for `cmd`, cloned out of the
    /// registry lock.
    pub(crate) fn handlers_for(&self, cmd: &str) -> Option<Vec<Handler>> {
        self.inner.registry.lock().handlers_for(cmd)
    }

    /// Returns the channel manager.
    pub(crate) fn channel(&self) -> &ChannelManager {
        &self.inner.channel
    }

    /// Drains the channel-ready queue; called on the transport open event.
    pub(crate) fn drain_channel_ready(&self) {
        self.inner.channel_ready.drain();
    }
}

// ============================================================================
// Tests
// ============================================================================
