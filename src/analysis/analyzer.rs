//! Analyzer trait for computing inlay hints and diagnostics

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::lsp::types::{Diagnostic, InlayHint, Position, Range};

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("analysis failed for {uri}: {reason}")]
    Failed { uri: String, reason: String },
}

/// Semantic analysis backend queried by the dispatcher
///
/// `text` is the current content from the document store, or empty when the
/// document was never opened.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Returns hints inside `range`, ordered by position
    async fn inlay_hints(
        &self,
        uri: &str,
        text: &str,
        range: crate::lsp::types::Range,
    ) -> Result<Vec<InlayHint>, AnalyzerError>;

    /// Returns all diagnostics for the document
    async fn diagnostics(&self, uri: &str, text: &str) -> Result<Vec<Diagnostic>, AnalyzerError>;
}

/// Stand-in analyzer returning fixed sample results
///
/// The optional delay simulates a slow type checker; it holds up the whole
/// message loop while it runs.
#[derive(Debug, Default, Clone)]
pub struct PlaceholderAnalyzer {
    delay: Duration,
}

impl PlaceholderAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    async fn simulate_work(&self) {
        if !self.delay.is_zero() {
            debug!("Simulating analysis for {:?}", self.delay);
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl Analyzer for PlaceholderAnalyzer {
    async fn inlay_hints(
        &self,
        _uri: &str,
        _text: &str,
        _range: Range,
    ) -> Result<Vec<InlayHint>, AnalyzerError> {
        self.simulate_work().await;
        Ok(vec![InlayHint::new(Position::new(5, 19), ": Admin")])
    }

    async fn diagnostics(&self, _uri: &str, _text: &str) -> Result<Vec<Diagnostic>, AnalyzerError> {
        self.simulate_work().await;
        Ok(vec![Diagnostic::new(
            Range::new(Position::new(25, 0), Position::new(25, 21)),
            "Type Mismatch: type Admin is not assignable to type User",
        )])
    }
}
