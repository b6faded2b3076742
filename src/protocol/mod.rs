//! Wire protocol message types.
//!
//! This module defines the message format exchanged over the channel
//! between the page-resident client and the controlling server.
//!
//! # Protocol Overview
//!
//! Every frame is a JSON object with exactly four fields:
//!
//! | Field | Purpose |
//! |-------|---------|
//! | `cmd` | Command or reply-routing key |
//! | `status` | `"success"` / `"error"` on replies |
//! | `callback` | Command name the recipient replies with (`""` = no reply) |
//! | `payload` | Opaque value, shape determined by `cmd` |
//!
//! Correlation works without request IDs: a request names the reply
//! command in `callback`, and the reply carries that name as its `cmd`.

// ============================================================================
// Submodules
// ============================================================================

/// Message wire type and frame encoding.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use message::{Message, STATUS_ERROR, STATUS_SUCCESS};
