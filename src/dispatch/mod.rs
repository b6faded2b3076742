//! Command dispatch.
//!
//! Inbound messages are routed by their `cmd` field: the registry maps a
//! command name to an ordered list of handlers, and the dispatcher invokes
//! every handler registered for an inbound message's command, in
//! registration order.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `registry` | Command-keyed handler registry |
//! | `dispatcher` | Inbound message routing |

// ============================================================================
// Submodules
// ============================================================================

/// Command-keyed handler registry.
pub mod registry;

/// Inbound message routing.
pub mod dispatcher;

// ============================================================================
// Re-exports
// ============================================================================

pub use dispatcher::Dispatcher;
pub use registry::{Handler, HandlerRegistry};
