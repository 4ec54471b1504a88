//! Per-method handlers

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::{Analyzer, AnalyzerError, SessionState};
use crate::lsp::types::{
    DiagnosticOptions, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, DocumentDiagnosticParams, DocumentDiagnosticReport,
    InitializeParams, InitializeResult, InlayHintParams, ServerCapabilities, ServerInfo,
    TextDocumentSyncKind, method,
};
use crate::rpc::{ErrorCode, ResponseError};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid params for {method}: {source}")]
    InvalidParams {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    #[error("failed to serialize result: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl DispatchError {
    pub fn to_response_error(&self) -> ResponseError {
        let code = match self {
            DispatchError::InvalidParams { .. } => ErrorCode::InvalidParams,
            DispatchError::Analyzer(_) | DispatchError::Serialize(_) => ErrorCode::InternalError,
        };
        ResponseError::new(code, self.to_string())
    }
}

/// Behavior bound to one method name
///
/// Returns the result for requests; notifications return `Ok(None)`.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(
        &self,
        state: &mut SessionState,
        analyzer: &dyn Analyzer,
        params: Value,
    ) -> Result<Option<Value>, DispatchError>;
}

fn parse_params<T: DeserializeOwned>(method: &'static str, params: Value) -> Result<T, DispatchError> {
    serde_json::from_value(params).map_err(|source| DispatchError::InvalidParams { method, source })
}

fn to_result<T: Serialize>(result: &T) -> Result<Option<Value>, DispatchError> {
    serde_json::to_value(result)
        .map(Some)
        .map_err(DispatchError::Serialize)
}

pub struct Initialize {
    server_info: ServerInfo,
}

impl Initialize {
    pub fn new(server_info: ServerInfo) -> Self {
        Self { server_info }
    }

    pub fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: TextDocumentSyncKind::FULL,
            inlay_hint_provider: true,
            diagnostic_provider: DiagnosticOptions {
                inter_file_dependencies: false,
                workspace_diagnostics: true,
            },
        }
    }
}

#[async_trait]
impl Handler for Initialize {
    async fn handle(
        &self,
        _state: &mut SessionState,
        _analyzer: &dyn Analyzer,
        params: Value,
    ) -> Result<Option<Value>, DispatchError> {
        let params: InitializeParams = if params.is_null() {
            InitializeParams::default()
        } else {
            parse_params(method::INITIALIZE, params)?
        };

        match &params.client_info {
            Some(client) => info!(
                "Connected to {} {}",
                client.name,
                client.version.as_deref().unwrap_or("")
            ),
            None => info!("Connected to unnamed client"),
        }

        to_result(&InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: self.server_info.clone(),
        })
    }
}

pub struct Initialized;

#[async_trait]
impl Handler for Initialized {
    async fn handle(
        &self,
        _state: &mut SessionState,
        _analyzer: &dyn Analyzer,
        _params: Value,
    ) -> Result<Option<Value>, DispatchError> {
        info!("Client finished initialization");
        Ok(None)
    }
}

pub struct Shutdown;

#[async_trait]
impl Handler for Shutdown {
    async fn handle(
        &self,
        state: &mut SessionState,
        _analyzer: &dyn Analyzer,
        _params: Value,
    ) -> Result<Option<Value>, DispatchError> {
        info!("Shutting down");
        state.begin_shutdown();
        Ok(Some(Value::Null))
    }
}

pub struct Exit;

#[async_trait]
impl Handler for Exit {
    async fn handle(
        &self,
        state: &mut SessionState,
        _analyzer: &dyn Analyzer,
        _params: Value,
    ) -> Result<Option<Value>, DispatchError> {
        state.exit();
        info!("Exit requested ({:?})", state.lifecycle);
        Ok(None)
    }
}

pub struct DidOpen;

#[async_trait]
impl Handler for DidOpen {
    async fn handle(
        &self,
        state: &mut SessionState,
        _analyzer: &dyn Analyzer,
        params: Value,
    ) -> Result<Option<Value>, DispatchError> {
        let params: DidOpenTextDocumentParams = parse_params(method::DID_OPEN, params)?;
        let document = params.text_document;

        state.documents.open(&document.uri, &document.text);
        info!("Opened document: {}", document.uri);
        debug!("{}", document.text);
        Ok(None)
    }
}

pub struct DidChange;

#[async_trait]
impl Handler for DidChange {
    async fn handle(
        &self,
        state: &mut SessionState,
        _analyzer: &dyn Analyzer,
        params: Value,
    ) -> Result<Option<Value>, DispatchError> {
        let params: DidChangeTextDocumentParams = parse_params(method::DID_CHANGE, params)?;
        let uri = params.text_document.uri;

        state.change_count += 1;
        info!(
            "Changed document: {} ({} changes, change count {})",
            uri,
            params.content_changes.len(),
            state.change_count
        );

        for change in &params.content_changes {
            if change.range.is_some() {
                // Full sync is advertised; a ranged edit still carries replacement text
                warn!("Ignoring range on content change for {}", uri);
            }
            state.documents.update(&uri, &change.text);
        }
        Ok(None)
    }
}

pub struct DidClose;

#[async_trait]
impl Handler for DidClose {
    async fn handle(
        &self,
        state: &mut SessionState,
        _analyzer: &dyn Analyzer,
        params: Value,
    ) -> Result<Option<Value>, DispatchError> {
        let params: DidCloseTextDocumentParams = parse_params(method::DID_CLOSE, params)?;
        let uri = params.text_document.uri;

        if state.documents.close(&uri) {
            info!("Closed document: {}", uri);
        } else {
            warn!("Close for unopened document {}", uri);
        }
        Ok(None)
    }
}

fn document_text<'a>(state: &'a SessionState, uri: &str) -> &'a str {
    state.documents.text(uri).unwrap_or_else(|| {
        warn!("No text for {}, analyzing empty document", uri);
        ""
    })
}

pub struct InlayHints;

#[async_trait]
impl Handler for InlayHints {
    async fn handle(
        &self,
        state: &mut SessionState,
        analyzer: &dyn Analyzer,
        params: Value,
    ) -> Result<Option<Value>, DispatchError> {
        let params: InlayHintParams = parse_params(method::INLAY_HINT, params)?;
        let uri = params.text_document.uri;
        info!(
            "Got inlay hint request for {} at {} ({})",
            uri, params.range.start.line, params.range.start.character
        );

        let text = document_text(state, &uri);
        let hints = analyzer.inlay_hints(&uri, text, params.range).await?;

        debug!("Returning {} inlay hints", hints.len());
        to_result(&hints)
    }
}

pub struct Diagnostics;

#[async_trait]
impl Handler for Diagnostics {
    async fn handle(
        &self,
        state: &mut SessionState,
        analyzer: &dyn Analyzer,
        params: Value,
    ) -> Result<Option<Value>, DispatchError> {
        let params: DocumentDiagnosticParams = parse_params(method::DIAGNOSTIC, params)?;
        let uri = params.text_document.uri;
        info!("Got diagnostics request for {}", uri);

        let text = document_text(state, &uri);
        let items = analyzer.diagnostics(&uri, text).await?;

        debug!("Returning {} diagnostics", items.len());
        to_result(&DocumentDiagnosticReport::Full { items })
    }
}
