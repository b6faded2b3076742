//! Message wire type and frame encoding.
//!
//! Defines the single message shape carried over the channel in both
//! directions, plus builders for the request/reply correlation convention.
//!
//! # Format
//!
//! Request from server to client:
//!
//! ```json
//! {"cmd":"getWindowTitle","status":"","callback":"handleWindowTitle","payload":null}
//! ```
//!
//! Reply from client to server:
//!
//! ```json
//! {"cmd":"handleWindowTitle","status":"success","callback":"","payload":"My Page"}
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Status string carried by successful replies.
pub const STATUS_SUCCESS: &str = "success";

/// Status string carried by error replies.
pub const STATUS_ERROR: &str = "error";

// ============================================================================
// Message
// ============================================================================

/// The wire-level unit exchanged over the channel.
///
/// `cmd` is never empty while a message is in flight. A request that
/// expects a reply sets `callback` to a non-empty command name; the
/// reply's `cmd` equals the request's `callback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Command or reply-routing key.
    pub cmd: String,

    /// Reply status (`"success"` / `"error"`); empty on requests.
    #[serde(default)]
    pub status: String,

    /// Command name the recipient should reply with; empty means no
    /// reply is expected.
    #[serde(default)]
    pub callback: String,

    /// Opaque payload, shape determined by `cmd`.
    #[serde(default)]
    pub payload: Value,
}

impl Message {
    /// Creates a request message.
    ///
    /// Pass an empty `callback` when no reply is expected.
    #[must_use]
    pub fn request(
        cmd: impl Into<String>,
        callback: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            cmd: cmd.into(),
            status: String::new(),
            callback: callback.into(),
            payload,
        }
    }

    /// Creates a successful reply to `request`.
    ///
    /// The reply routes back through the command named in the request's
    /// `callback` field and itself expects no further reply.
    #[must_use]
    pub fn reply_to(request: &Message, payload: Value) -> Self {
        Self {
            cmd: request.callback.clone(),
            status: STATUS_SUCCESS.to_string(),
            callback: String::new(),
            payload,
        }
    }

    /// Returns `true` if the sender expects a reply.
    #[inline]
    #[must_use]
    pub fn expects_reply(&self) -> bool {
        !self.callback.is_empty()
    }

    /// Returns `true` if this is a successful reply.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Decodes a text frame into a message.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the frame is not valid JSON for this shape
    /// - [`Error::Protocol`] if `cmd` is empty
    pub fn from_frame(text: &str) -> Result<Self> {
        let message: Message = serde_json::from_str(text)?;
        if message.cmd.is_empty() {
            return Err(Error::protocol("message has empty cmd"));
        }
        Ok(message)
    }

    /// Encodes this message as a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_frame(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
