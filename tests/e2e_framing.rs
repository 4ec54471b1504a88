//! Framing recovery E2E tests

mod helper;

use serde_json::json;

use helper::{did_open_notification, initialize_request, input_of, run_raw};
use loom_lsp::lsp::server::SessionOutcome;

#[tokio::test]
async fn bad_header_is_skipped_and_next_frame_handled() {
    let mut input = b"Content-Length: twelve\r\n\r\n{\"id\":1}".to_vec();
    input.extend(input_of(&[initialize_request(2)]));

    let run = run_raw(input).await;

    let responses = run.responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 2);
}

#[tokio::test]
async fn oversized_content_length_does_not_swallow_later_frames() {
    let mut input = b"Content-Length: 999999999999\r\n\r\n".to_vec();
    input.extend(input_of(&[initialize_request(6)]));

    let run = run_raw(input).await;

    let responses = run.responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 6);
}

#[tokio::test]
async fn missing_content_length_is_skipped() {
    let mut input = b"Content-Type: application/json\r\n\r\n".to_vec();
    input.extend(input_of(&[did_open_notification("file:///a", "hello")]));

    let run = run_raw(input).await;

    assert_eq!(run.state.documents.text("file:///a"), Some("hello"));
}

#[tokio::test]
async fn body_without_method_is_skipped() {
    let input = input_of(&[
        json!({"jsonrpc": "2.0", "params": {}}),
        initialize_request(3),
    ]);

    let run = run_raw(input).await;

    let responses = run.responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 3);
}

#[tokio::test]
async fn truncated_final_frame_ends_session_normally() {
    let mut input = input_of(&[did_open_notification("file:///a", "hello")]);
    input.extend(b"Content-Length: 100\r\n\r\n{\"jsonrpc\"");

    let run = run_raw(input).await;

    assert_eq!(run.outcome, SessionOutcome::EndOfStream);
    assert_eq!(run.state.documents.text("file:///a"), Some("hello"));
}
