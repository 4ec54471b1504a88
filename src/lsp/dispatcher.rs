//! Routes decoded messages to the handler registered for their method

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::analysis::{Analyzer, SessionState};
use crate::lsp::handlers::{
    DidChange, DidClose, DidOpen, Diagnostics, Exit, Handler, Initialize, Initialized,
    InlayHints, Shutdown,
};
use crate::lsp::types::{ServerInfo, method};
use crate::rpc::{ErrorCode, Message, Response, ResponseError};

pub const SERVER_NAME: &str = "Loom";

pub fn server_info() -> ServerInfo {
    ServerInfo {
        name: SERVER_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

pub struct Dispatcher {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
    analyzer: Arc<dyn Analyzer>,
}

impl Dispatcher {
    /// Creates a dispatcher with every built-in method registered
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        let mut dispatcher = Self::empty(analyzer);
        dispatcher.register(method::INITIALIZE, Initialize::new(server_info()));
        dispatcher.register(method::INITIALIZED, Initialized);
        dispatcher.register(method::SHUTDOWN, Shutdown);
        dispatcher.register(method::EXIT, Exit);
        dispatcher.register(method::DID_OPEN, DidOpen);
        dispatcher.register(method::DID_CHANGE, DidChange);
        dispatcher.register(method::DID_CLOSE, DidClose);
        dispatcher.register(method::INLAY_HINT, InlayHints);
        dispatcher.register(method::DIAGNOSTIC, Diagnostics);
        dispatcher
    }

    /// Creates a dispatcher with no methods registered
    pub fn empty(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            handlers: HashMap::new(),
            analyzer,
        }
    }

    /// Binds `method` to `handler`, replacing any previous binding
    pub fn register(&mut self, method: &'static str, handler: impl Handler + 'static) {
        self.handlers.insert(method, Box::new(handler));
    }

    pub fn handles(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Handles one message. Returns the response to write, if any.
    ///
    /// A response always carries the id of the request that produced it.
    pub async fn dispatch(&self, state: &mut SessionState, message: Message) -> Option<Response> {
        match message {
            Message::Request { id, method, params } => {
                info!("Received request {} (id {})", method, id);

                if state.is_shutting_down() && method != method::EXIT {
                    warn!("Rejecting {} after shutdown", method);
                    return Some(Response::failure(
                        id,
                        ResponseError::new(ErrorCode::InvalidRequest, "server is shutting down"),
                    ));
                }

                let Some(handler) = self.handlers.get(method.as_str()) else {
                    warn!("[unhandled]: {}", method);
                    return None;
                };

                let response = match handler.handle(state, self.analyzer.as_ref(), params).await {
                    Ok(result) => {
                        info!("Sent {} response (id {})", method, id);
                        Response::success(id, result.unwrap_or(Value::Null))
                    }
                    Err(e) => {
                        error!("Got an error for {} request: {}", method, e);
                        Response::failure(id, e.to_response_error())
                    }
                };
                Some(response)
            }
            Message::Notification { method, params } => {
                info!("Received notification {}", method);

                if state.is_shutting_down() && method != method::EXIT {
                    warn!("Ignoring {} after shutdown", method);
                    return None;
                }

                let Some(handler) = self.handlers.get(method.as_str()) else {
                    warn!("[unhandled]: {}", method);
                    return None;
                };

                if let Err(e) = handler.handle(state, self.analyzer.as_ref(), params).await {
                    error!("Got an error for {} notification: {}", method, e);
                }
                None
            }
            Message::Response { id, error, .. } => {
                debug!("Ignoring client response (id {:?}, error {:?})", id, error);
                None
            }
        }
    }
}
