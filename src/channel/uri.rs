//! Channel endpoint derivation.
//!
//! The client derives the channel endpoint from the hosting page's own
//! URL: the server that served the page also terminates the channel, so
//! only the scheme changes. A plaintext page gets a plaintext channel
//! (`http -> ws`), an encrypted page gets an encrypted channel
//! (`https -> wss`). Host, port, and path are untouched.

// ============================================================================
// Imports
// ============================================================================

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Derivation
// ============================================================================

/// Derives the channel endpoint from the hosting page's URL.
///
/// # Errors
///
/// Returns [`Error::Config`] if the page scheme has no corresponding
/// channel scheme (anything other than `http` or `https`).
pub fn channel_uri(page_url: &Url) -> Result<Url> {
    let channel_scheme = match page_url.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => {
            return Err(Error::config(format!(
                "no channel scheme for page scheme: {other}"
            )));
        }
    };

    let mut uri = page_url.clone();
    uri.set_scheme(channel_scheme)
        .map_err(|()| Error::config(format!("cannot promote scheme on: {page_url}")))?;
    Ok(uri)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_page_gets_plaintext_channel() {
        let page = Url::parse("http://localhost:9000/viz").expect("valid url");
        let uri = channel_uri(&page).expect("derive");
        assert_eq!(uri.as_str(), "ws://localhost:9000/viz");
    }

    #[test]
    fn test_encrypted_page_gets_encrypted_channel() {
        let page = Url::parse("https://viz.example.com/session/1").expect("valid url");
        let uri = channel_uri(&page).expect("derive");
        assert_eq!(uri.as_str(), "wss://viz.example.com/session/1");
    }

    #[test]
    fn test_host_port_and_path_preserved() {
        let page = Url::parse("http://127.0.0.1:12345/a/b?x=1").expect("valid url");
        let uri = channel_uri(&page).expect("derive");

        assert_eq!(uri.host_str(), Some("127.0.0.1"));
        assert_eq!(uri.port(), Some(12345));
        assert_eq!(uri.path(), "/a/b");
        assert_eq!(uri.query(), Some("x=1"));
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        let page = Url::parse("file:///tmp/page.html").expect("valid url");
        let result = channel_uri(&page);
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
