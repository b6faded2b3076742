//! Host-document boundary.
//!
//! The built-in command handlers answer questions about the hosting page
//! (user agent, title, viewport) without caring how that page is rendered,
//! so the page sits behind the [`Page`] trait. Embedders with a real
//! document implement it; everything else, including every test, uses
//! [`MemoryPage`].

// ============================================================================
// Imports
// ============================================================================

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

// ============================================================================
// Viewport
// ============================================================================

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport.
    #[inline]
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

// ============================================================================
// Page Trait
// ============================================================================

/// The host document as seen by the built-in command handlers.
///
/// Implementations use interior mutability: handlers hold `&dyn Page` and
/// run on the channel event-loop task.
pub trait Page: Send + Sync {
    /// Returns a string identifying the browser or runtime.
    fn user_agent(&self) -> String;

    /// Returns the current document title.
    fn title(&self) -> String;

    /// Sets the document title.
    fn set_title(&self, title: &str);

    /// Renders a visible heading with the given text.
    fn proclaim(&self, heading: &str);

    /// Returns the current viewport size.
    fn viewport(&self) -> Viewport;
}

// ============================================================================
// MemoryPage
// ============================================================================

/// In-process [`Page`] implementation.
///
/// Holds the document state in memory: a title, the headings rendered by
/// `proclaim`, a fixed viewport, and a user-agent string.
pub struct MemoryPage {
    /// Mutable document state.
    inner: Mutex<MemoryPageState>,
}

/// Mutable state behind [`MemoryPage`].
struct MemoryPageState {
    user_agent: String,
    title: String,
    headings: Vec<String>,
    viewport: Viewport,
}

impl MemoryPage {
    /// Default viewport for pages that never set one.
    const DEFAULT_VIEWPORT: Viewport = Viewport {
        width: 1024,
        height: 768,
    };

    /// Creates a page with an empty title and the default viewport.
    #[must_use]
    pub fn new() -> Self {
        Self::with_viewport(Self::DEFAULT_VIEWPORT.width, Self::DEFAULT_VIEWPORT.height)
    }

    /// Creates a page with the given viewport.
    #[must_use]
    pub fn with_viewport(width: u32, height: u32) -> Self {
        Self {
            inner: Mutex::new(MemoryPageState {
                user_agent: format!("vizlink MemoryPage/{}", env!("CARGO_PKG_VERSION")),
                title: String::new(),
                headings: Vec::new(),
                viewport: Viewport::new(width, height),
            }),
        }
    }

    /// Overrides the reported user-agent string.
    pub fn set_user_agent(&self, user_agent: impl Into<String>) {
        self.inner.lock().user_agent = user_agent.into();
    }

    /// Returns the headings rendered so far, oldest first.
    #[must_use]
    pub fn headings(&self) -> Vec<String> {
        self.inner.lock().headings.clone()
    }
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for MemoryPage {
    fn user_agent(&self) -> String {
        self.inner.lock().user_agent.clone()
    }

    fn title(&self) -> String {
        self.inner.lock().title.clone()
    }

    fn set_title(&self, title: &str) {
        self.inner.lock().title = title.to_string();
    }

    fn proclaim(&self, heading: &str) {
        self.inner.lock().headings.push(heading.to_string());
    }

    fn viewport(&self) -> Viewport {
        self.inner.lock().viewport
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_round_trip() {
        let page = MemoryPage::new();
        assert_eq!(page.title(), "");

        page.set_title("My Page");
        assert_eq!(page.title(), "My Page");
    }

    #[test]
    fn test_proclaim_accumulates_headings() {
        let page = MemoryPage::new();
        page.proclaim("First");
        page.proclaim("Second");

        assert_eq!(page.headings(), vec!["First", "Second"]);
    }

    #[test]
    fn test_viewport() {
        let page = MemoryPage::with_viewport(800, 600);
        assert_eq!(page.viewport(), Viewport::new(800, 600));
    }

    #[test]
    fn test_viewport_serializes_as_width_height() {
        let json = serde_json::to_string(&Viewport::new(800, 600)).expect("serialize");
        assert_eq!(json, r#"{"width":800,"height":600}"#);
    }

    #[test]
    fn test_user_agent_override() {
        let page = MemoryPage::new();
        assert!(page.user_agent().starts_with("vizlink MemoryPage/"));

        page.set_user_agent("TestRuntime/1.0");
        assert_eq!(page.user_agent(), "TestRuntime/1.0");
    }
}
