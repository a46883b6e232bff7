//! Tally Analysis Backend Layer
//!
//! Pluggable document-analysis backend implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `AnalysisBackend` trait from
//! `tally-domain`. A backend takes one document plus an instruction and
//! returns free-form reply text; everything downstream (JSON extraction,
//! normalization) lives in `tally-extractor`.
//!
//! # Backends
//!
//! - `MockBackend`: Deterministic mock for testing
//! - `AnthropicBackend`: Anthropic Messages API with document support
//!
//! # Examples
//!
//! ```
//! use tally_llm::MockBackend;
//! use tally_domain::{AnalysisBackend, Document};
//!
//! let backend = MockBackend::new(r#"{"Vendor": "Acme"}"#);
//! let doc = Document::pdf("contract.pdf", vec![]);
//! let reply = backend.analyze(&doc, "extract the metrics").unwrap();
//! assert_eq!(reply, r#"{"Vendor": "Acme"}"#);
//! ```

#![warn(missing_docs)]

pub mod anthropic;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tally_domain::{AnalysisBackend, Document};
use thiserror::Error;

pub use anthropic::AnthropicBackend;

/// Errors that can occur during backend operations
#[derive(Error, Debug)]
pub enum BackendError {
    /// No API key available
    #[error("No API key configured (set {0})")]
    MissingApiKey(&'static str),

    /// Network or transport error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Authentication rejected
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// API returned a non-success status
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the response body, when present
        message: String,
    },

    /// Response body was not in the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Scripted outcome for one document label
#[derive(Debug, Clone)]
enum MockReply {
    Reply(String),
    Error(String),
}

/// Mock analysis backend for deterministic testing
///
/// Returns pre-configured replies keyed by document label without making
/// any network calls. Unknown labels get the default reply.
///
/// # Examples
///
/// ```
/// use tally_llm::MockBackend;
/// use tally_domain::{AnalysisBackend, Document};
///
/// let mut backend = MockBackend::new("{}");
/// backend.add_reply("a.pdf", r#"{"Vendor": "Acme"}"#);
/// backend.add_error("b.pdf", "document unreadable");
///
/// let a = Document::pdf("a.pdf", vec![]);
/// assert!(backend.analyze(&a, "extract").unwrap().contains("Acme"));
///
/// let b = Document::pdf("b.pdf", vec![]);
/// assert!(backend.analyze(&b, "extract").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockBackend {
    default_reply: String,
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Create a mock with a fixed reply for all documents
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            default_reply: reply.into(),
            replies: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific reply for a given document label
    pub fn add_reply(&mut self, label: impl Into<String>, reply: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(label.into(), MockReply::Reply(reply.into()));
    }

    /// Script a failure for a given document label
    pub fn add_error(&mut self, label: impl Into<String>, message: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(label.into(), MockReply::Error(message.into()));
    }

    /// Number of analyze calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Labels of the documents analyzed so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Reset the call log
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl AnalysisBackend for MockBackend {
    type Error = BackendError;

    fn analyze(&self, document: &Document, _instruction: &str) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(document.label.clone());

        let replies = self.replies.lock().unwrap();
        match replies.get(&document.label) {
            Some(MockReply::Reply(reply)) => Ok(reply.clone()),
            Some(MockReply::Error(message)) => {
                Err(BackendError::Communication(message.clone()))
            }
            None => Ok(self.default_reply.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(label: &str) -> Document {
        Document::pdf(label, vec![])
    }

    #[test]
    fn test_mock_default_reply() {
        let backend = MockBackend::new("fixed reply");
        let result = backend.analyze(&doc("anything.pdf"), "prompt");

        assert_eq!(result.unwrap(), "fixed reply");
    }

    #[test]
    fn test_mock_specific_replies() {
        let mut backend = MockBackend::default();
        backend.add_reply("a.pdf", "alpha");
        backend.add_reply("b.pdf", "beta");

        assert_eq!(backend.analyze(&doc("a.pdf"), "p").unwrap(), "alpha");
        assert_eq!(backend.analyze(&doc("b.pdf"), "p").unwrap(), "beta");
        assert_eq!(backend.analyze(&doc("c.pdf"), "p").unwrap(), "{}");
    }

    #[test]
    fn test_mock_scripted_error() {
        let mut backend = MockBackend::default();
        backend.add_error("bad.pdf", "simulated outage");

        let result = backend.analyze(&doc("bad.pdf"), "p");
        match result {
            Err(BackendError::Communication(msg)) => assert_eq!(msg, "simulated outage"),
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }

    #[test]
    fn test_mock_call_log() {
        let backend = MockBackend::new("r");

        assert_eq!(backend.call_count(), 0);
        backend.analyze(&doc("one.pdf"), "p").unwrap();
        backend.analyze(&doc("two.pdf"), "p").unwrap();

        assert_eq!(backend.call_count(), 2);
        assert_eq!(backend.calls(), vec!["one.pdf", "two.pdf"]);

        backend.reset_calls();
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_mock_clone_shares_call_log() {
        let backend1 = MockBackend::new("r");
        let backend2 = backend1.clone();

        backend1.analyze(&doc("one.pdf"), "p").unwrap();

        // Both should see the call due to Arc
        assert_eq!(backend1.call_count(), 1);
        assert_eq!(backend2.call_count(), 1);
    }
}
