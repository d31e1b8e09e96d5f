//! Unified error handling for `embed-client`.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the crate.
pub type Result<T> = std::result::Result<T, EmbedError>;

/// Top-level error for embedding provider calls.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// API key is required but missing.
    #[error("missing API key for embedding provider")]
    MissingApiKey,

    /// The endpoint is empty or does not start with http/https.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Input text was empty.
    #[error("input text must not be empty")]
    EmptyInput,

    /// Input text exceeded the configured provider limit.
    #[error("input of {len} chars exceeds provider limit of {max}")]
    InputTooLarge { len: usize, max: usize },

    /// Upstream returned a non-successful HTTP status.
    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("decode error: {0}")]
    Decode(String),

    /// Underlying HTTP transport error (e.g., connect or timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Trims a response body into a short single-line snippet for logs and
/// error messages.
pub fn make_snippet(body: &str) -> String {
    const MAX: usize = 200;
    let s: String = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.chars().count() > MAX {
        let mut t: String = s.chars().take(MAX).collect();
        t.push('…');
        t
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_collapses_whitespace_and_truncates() {
        let s = make_snippet("a  b\n\tc");
        assert_eq!(s, "a b c");

        let long = "x".repeat(500);
        let s = make_snippet(&long);
        assert!(s.len() <= 204); // 200 bytes + ellipsis
        assert!(s.ends_with('…'));
    }
}
