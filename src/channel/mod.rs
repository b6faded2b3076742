//! Channel transport layer.
//!
//! This module owns the single persistent WebSocket channel between the
//! page-resident client and the controlling server, from endpoint
//! derivation through the lifecycle state machine to the event loop.
//!
//! # Connection Lifecycle
//!
//! 1. `channel_uri` - derive the endpoint from the hosting page's URL
//! 2. `ChannelManager::open` - `Unopened -> Connecting`, spawn the connect task
//! 3. Transport open - `Connecting -> Open`, drain the channel-ready queue
//! 4. Text frames - decoded and dispatched until the transport closes
//! 5. Transport close - `-> Closed`, terminal; only a fresh `init` recovers
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `state` | Lifecycle state machine |
//! | `uri` | Endpoint derivation from the page URL |
//! | `manager` | Transport ownership, send, event loop |

// ============================================================================
// Submodules
// ============================================================================

/// Lifecycle state machine.
pub mod state;

/// Channel endpoint derivation.
pub mod uri;

/// Transport ownership and event loop.
pub mod manager;

// ============================================================================
// Re-exports
// ============================================================================

pub use manager::ChannelManager;
pub use state::ChannelState;
pub use uri::channel_uri;
