//! Command-keyed handler registry.
//!
//! Maps a command name to an ordered list of handlers. The registry is
//! populated incrementally: built-in handlers during `init`, embedder
//! handlers at any point after.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::client::Client;
use crate::protocol::Message;

// ============================================================================
// Types
// ============================================================================

/// A registered command handler.
///
/// Handlers receive the owning [`Client`] explicitly alongside the inbound
/// message, so replies always resolve against the correct facade instance
/// no matter who invokes the callback. Handlers reply by calling
/// [`Client::send`].
pub type Handler = Arc<dyn Fn(&Client, &Message) + Send + Sync>;

// ============================================================================
// HandlerRegistry
// ============================================================================

/// Ordered, command-keyed handler registry.
///
/// Registering a second handler for an already-registered command appends
/// rather than replaces; dispatch order equals registration order. The
/// registry does not deduplicate: registering the identical handler twice
/// for the same command yields two invocations per dispatch.
#[derive(Default)]
pub struct HandlerRegistry {
    /// Command name to ordered handler list.
    handlers: FxHashMap<String, Vec<Handler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to `cmd`'s list, creating the list if absent.
    pub fn register(&mut self, cmd: impl Into<String>, handler: Handler) {
        self.handlers.entry(cmd.into()).or_default().push(handler);
    }

    /// Returns the ordered handler list for `cmd`, if any.
    ///
    /// The returned handlers are cloned out of the registry so callers can
    /// invoke them without holding any lock on the registry itself.
    #[must_use]
    pub fn handlers_for(&self, cmd: &str) -> Option<Vec<Handler>> {
        self.handlers.get(cmd).cloned()
    }

    /// Returns the registered command names, sorted for determinism.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        let mut commands: Vec<String> = self.handlers.keys().cloned().collect();
        commands.sort_unstable();
        commands
    }

    /// Returns the number of handlers registered for `cmd`.
    #[inline]
    #[must_use]
    pub fn handler_count(&self, cmd: &str) -> usize {
        self.handlers.get(cmd).map_or(0, Vec::len)
    }

    /// Returns `true` if no command has been registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Handler {
        Arc::new(|_client, _message| {})
    }

    #[test]
    fn test_register_creates_list() {
        let mut registry = HandlerRegistry::new();
        assert!(registry.is_empty());

        registry.register("ready", noop());

        assert_eq!(registry.handler_count("ready"), 1);
        assert_eq!(registry.commands(), vec!["ready".to_string()]);
    }

    #[test]
    fn test_register_appends_not_replaces() {
        let mut registry = HandlerRegistry::new();
        registry.register("getWindowTitle", noop());
        registry.register("getWindowTitle", noop());

        assert_eq!(registry.handler_count("getWindowTitle"), 2);
        assert_eq!(registry.commands().len(), 1);
    }

    #[test]
    fn test_duplicate_handler_not_deduplicated() {
        let handler = noop();
        let mut registry = HandlerRegistry::new();
        registry.register("ready", Arc::clone(&handler));
        registry.register("ready", handler);

        assert_eq!(registry.handler_count("ready"), 2);
    }

    #[test]
    fn test_unknown_command_has_no_handlers() {
        let registry = HandlerRegistry::new();
        assert!(registry.handlers_for("missing").is_none());
        assert_eq!(registry.handler_count("missing"), 0);
    }

    #[test]
    fn test_commands_sorted() {
        let mut registry = HandlerRegistry::new();
        registry.register("setWindowTitle", noop());
        registry.register("getBrowserInfo", noop());
        registry.register("ready", noop());

        assert_eq!(
            registry.commands(),
            vec![
                "getBrowserInfo".to_string(),
                "ready".to_string(),
                "setWindowTitle".to_string(),
            ]
        );
    }
}
