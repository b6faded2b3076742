//! Built-in command handlers.
//!
//! Registered during `init`, these answer the server's standing questions
//! about the client: liveness, runtime identity, document title, and
//! viewport size. Each one is a thin request/response function with no
//! state of its own; all document access goes through the [`Page`] trait.
//!
//! | Command | Reply payload |
//! |---------|---------------|
//! | `ready` | `"ready"` via the fixed `handleResponse` command |
//! | `getBrowserInfo` | user-agent string |
//! | `getWindowTitle` | current title string |
//! | `setWindowTitle` | new title string (after applying it) |
//! | `getWindowSize` | `{"width":..,"height":..}` JSON-encoded as a string |

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, error, warn};

use crate::client::Client;
use crate::page::Page;
use crate::protocol::{Message, STATUS_SUCCESS};

// ============================================================================
// Constants
// ============================================================================

/// Fixed reply command for the liveness handshake.
const READY_REPLY_CMD: &str = "handleResponse";

// ============================================================================
// Registration
// ============================================================================

/// Registers every built-in handler on `client`.
pub(crate) fn register_builtins(client: &Client) {
    client.register("ready", ready);
    client.register("getBrowserInfo", get_browser_info);
    client.register("getWindowTitle", get_window_title);
    client.register("setWindowTitle", set_window_title);
    client.register("getWindowSize", get_window_size);
}

// ============================================================================
// Handlers
// ============================================================================

/// Liveness handshake.
///
/// Replies immediately with a fixed `handleResponse`/success message.
/// This is the one round-trip the server uses to confirm the client is
/// usable end-to-end, as opposed to the transport-level open which only
/// confirms the socket connected.
fn ready(client: &Client, _message: &Message) {
    let reply = Message {
        cmd: READY_REPLY_CMD.to_string(),
        status: STATUS_SUCCESS.to_string(),
        callback: String::new(),
        payload: json!("ready"),
    };

    if let Err(e) = client.send(&reply) {
        error!(error = %e, "failed to send ready handshake reply");
    }
}

/// Reports a string identifying the browser or runtime.
fn get_browser_info(client: &Client, message: &Message) {
    let user_agent = client.page().user_agent();
    reply(client, message, json!(user_agent));
}

/// Reports the current document title.
fn get_window_title(client: &Client, message: &Message) {
    let title = client.page().title();
    reply(client, message, json!(title));
}

/// Expected payload of `setWindowTitle`.
#[derive(Debug, Deserialize)]
struct TitleChange {
    /// The new document title.
    title: String,
    /// Whether to also render a visible heading with the title.
    #[serde(default)]
    proclaim: bool,
}

/// Sets the document title, optionally proclaiming it as a heading.
///
/// Replies with the title as read back from the page. An undecodable
/// payload is an invalid argument: logged and dropped, no reply.
fn set_window_title(client: &Client, message: &Message) {
    let change: TitleChange = match serde_json::from_value(message.payload.clone()) {
        Ok(change) => change,
        Err(e) => {
            warn!(error = %e, payload = %message.payload, "bad setWindowTitle payload");
            return;
        }
    };

    let page = client.page();
    page.set_title(&change.title);
    if change.proclaim {
        page.proclaim(&change.title);
    }

    reply(client, message, json!(page.title()));
}

/// Reports the viewport size.
///
/// The dimensions are JSON-encoded as a *string* payload, matching what
/// size-reply consumers parse.
fn get_window_size(client: &Client, message: &Message) {
    let viewport = client.page().viewport();
    match serde_json::to_string(&viewport) {
        Ok(encoded) => reply(client, message, Value::String(encoded)),
        Err(e) => error!(error = %e, "failed to encode viewport"),
    }
}

// ============================================================================
// Reply Helper
// ============================================================================

/// Sends a success reply routed through the request's callback.
///
/// A request with an empty callback expects no reply; replying anyway
/// would put a message with an empty `cmd` on the wire.
fn reply(client: &Client, request: &Message, payload: Value) {
    if !request.expects_reply() {
        debug!(cmd = %request.cmd, "request carries no callback, reply skipped");
        return;
    }

    if let Err(e) = client.send(&Message::reply_to(request, payload)) {
        error!(cmd = %request.cmd, error = %e, "failed to send reply");
    }
}

// ============================================================================
// Tests
// ============================================================================
