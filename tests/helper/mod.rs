//! Shared fixtures for end-to-end tests
#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};

use loom_lsp::analysis::{Analyzer, PlaceholderAnalyzer, SessionState};
use loom_lsp::lsp::dispatcher::Dispatcher;
use loom_lsp::lsp::server::{SessionOutcome, serve};
use loom_lsp::rpc::{encode, split};

pub struct SessionRun {
    pub outcome: SessionOutcome,
    pub state: SessionState,
    pub output: Vec<u8>,
}

impl SessionRun {
    /// Response bodies in the order they were written
    pub fn responses(&self) -> Vec<Value> {
        read_frames(&self.output)
    }
}

/// Concatenates the framed encoding of each message
pub fn input_of(messages: &[Value]) -> Vec<u8> {
    messages
        .iter()
        .flat_map(|message| encode(message).unwrap())
        .collect()
}

pub fn read_frames(mut output: &[u8]) -> Vec<Value> {
    let mut bodies = Vec::new();
    while let Some(frame) = split(output).expect("server wrote a malformed frame") {
        bodies.push(serde_json::from_slice(frame.body).unwrap());
        output = &output[frame.consumed..];
    }
    assert!(output.is_empty(), "trailing bytes after last frame");
    bodies
}

pub async fn run_raw_with(analyzer: Arc<dyn Analyzer>, input: Vec<u8>) -> SessionRun {
    let dispatcher = Dispatcher::new(analyzer);
    let mut state = SessionState::new();
    let mut output = Vec::new();

    let outcome = serve(input.as_slice(), &mut output, &dispatcher, &mut state)
        .await
        .expect("in-memory session should not hit I/O errors");

    SessionRun {
        outcome,
        state,
        output,
    }
}

pub async fn run_raw(input: Vec<u8>) -> SessionRun {
    run_raw_with(Arc::new(PlaceholderAnalyzer::new()), input).await
}

pub async fn run_session(messages: &[Value]) -> SessionRun {
    run_raw(input_of(messages)).await
}

pub fn initialize_request(id: i64) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "initialize",
        "params": {"clientInfo": {"name": "ed", "version": "1.0"}}
    })
}

pub fn did_open_notification(uri: &str, text: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "textDocument/didOpen",
        "params": {
            "textDocument": {"uri": uri, "languageId": "loom", "version": 1, "text": text}
        }
    })
}

pub fn did_change_notification(uri: &str, version: i32, texts: &[&str]) -> Value {
    let changes: Vec<Value> = texts.iter().map(|text| json!({"text": text})).collect();
    json!({
        "jsonrpc": "2.0",
        "method": "textDocument/didChange",
        "params": {
            "textDocument": {"uri": uri, "version": version},
            "contentChanges": changes
        }
    })
}

pub fn inlay_hint_request(id: i64, uri: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "textDocument/inlayHint",
        "params": {
            "textDocument": {"uri": uri},
            "range": {
                "start": {"line": 0, "character": 0},
                "end": {"line": 30, "character": 0}
            }
        }
    })
}

pub fn diagnostic_request(id: i64, uri: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "textDocument/diagnostic",
        "params": {"textDocument": {"uri": uri}}
    })
}
