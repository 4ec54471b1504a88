//! Document sync, inlay hint and diagnostic E2E tests

mod helper;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use helper::{
    diagnostic_request, did_change_notification, did_open_notification, inlay_hint_request,
    input_of, run_raw_with, run_session,
};
use loom_lsp::analysis::{Analyzer, AnalyzerError};
use loom_lsp::lsp::types::{Diagnostic, InlayHint, Position, Range};

/// Echoes the text it was given, so tests can see which version of a
/// document reached the analyzer
struct EchoAnalyzer;

#[async_trait]
impl Analyzer for EchoAnalyzer {
    async fn inlay_hints(
        &self,
        _uri: &str,
        text: &str,
        range: Range,
    ) -> Result<Vec<InlayHint>, AnalyzerError> {
        Ok(vec![InlayHint::new(range.start, format!(": {}", text))])
    }

    async fn diagnostics(&self, uri: &str, text: &str) -> Result<Vec<Diagnostic>, AnalyzerError> {
        if text.is_empty() {
            return Err(AnalyzerError::Failed {
                uri: uri.to_string(),
                reason: "empty document".to_string(),
            });
        }
        Ok(vec![Diagnostic::new(
            Range::new(Position::new(0, 0), Position::new(0, text.len() as u32)),
            text,
        )])
    }
}

#[tokio::test]
async fn open_then_change_keeps_last_text() {
    let run = run_session(&[
        did_open_notification("file:///a", "hello"),
        did_change_notification("file:///a", 2, &["world"]),
    ])
    .await;

    assert!(run.output.is_empty());
    assert_eq!(run.state.documents.text("file:///a"), Some("world"));
    assert_eq!(run.state.change_count, 1);
}

#[tokio::test]
async fn change_count_is_per_notification() {
    let run = run_session(&[
        did_open_notification("file:///a", "v1"),
        did_change_notification("file:///a", 2, &["v2", "v3", "v4"]),
        did_change_notification("file:///a", 3, &["v5"]),
    ])
    .await;

    assert_eq!(run.state.change_count, 2);
    assert_eq!(run.state.documents.text("file:///a"), Some("v5"));
}

#[tokio::test]
async fn change_for_unopened_document_creates_it() {
    let run = run_session(&[did_change_notification("file:///b", 1, &["fresh"])]).await;

    assert_eq!(run.state.documents.text("file:///b"), Some("fresh"));
}

#[tokio::test]
async fn placeholder_inlay_hint_response() {
    let run = run_session(&[
        did_open_notification("file:///a", "class {}"),
        inlay_hint_request(2, "file:///a"),
    ])
    .await;

    assert_eq!(
        run.responses(),
        vec![json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": [{"position": {"line": 5, "character": 19}, "label": ": Admin"}]
        })]
    );
}

#[tokio::test]
async fn placeholder_diagnostic_response() {
    let run = run_session(&[diagnostic_request(3, "file:///a")]).await;

    assert_eq!(
        run.responses(),
        vec![json!({
            "jsonrpc": "2.0",
            "id": 3,
            "result": {
                "kind": "full",
                "items": [{
                    "range": {
                        "start": {"line": 25, "character": 0},
                        "end": {"line": 25, "character": 21}
                    },
                    "message": "Type Mismatch: type Admin is not assignable to type User"
                }]
            }
        })]
    );
}

#[tokio::test]
async fn analyzer_sees_text_after_changes_in_arrival_order() {
    let input = input_of(&[
        did_open_notification("file:///a", "one"),
        inlay_hint_request(1, "file:///a"),
        did_change_notification("file:///a", 2, &["two"]),
        inlay_hint_request(2, "file:///a"),
        diagnostic_request(3, "file:///a"),
    ]);

    let run = run_raw_with(Arc::new(EchoAnalyzer), input).await;

    let responses = run.responses();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"][0]["label"], ": one");
    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["result"][0]["label"], ": two");
    assert_eq!(responses[2]["result"]["items"][0]["message"], "two");
}

#[tokio::test]
async fn analyzer_error_is_answered_with_internal_error() {
    let run = run_raw_with(
        Arc::new(EchoAnalyzer),
        input_of(&[diagnostic_request(4, "file:///missing")]),
    )
    .await;

    let responses = run.responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 4);
    assert_eq!(responses[0]["error"]["code"], -32603);
}

#[tokio::test]
async fn malformed_request_params_get_invalid_params_error() {
    let run = run_session(&[
        json!({"jsonrpc": "2.0", "id": 5, "method": "textDocument/inlayHint",
               "params": {"textDocument": {"uri": "file:///a"}}}),
    ])
    .await;

    let responses = run.responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 5);
    assert_eq!(responses[0]["error"]["code"], -32602);
}
