//! Content-Length framing
//!
//! A frame on the wire is `Content-Length: <n>\r\n\r\n` followed by exactly `n`
//! bytes of UTF-8 JSON. Other headers are tolerated and ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rpc::error::{DecodeError, FramingError};
use crate::rpc::message::{JSONRPC_VERSION, Message, RequestId};

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const CONTENT_LENGTH: &str = "content-length";

/// Upper bound on a header block that has not been terminated yet
pub const MAX_HEADER_LEN: usize = 8 * 1024;

/// Upper bound on a declared body length
pub const MAX_BODY_LEN: usize = 64 * 1024 * 1024;

/// A complete frame found at the start of a buffer
#[derive(Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    /// The JSON body, header stripped
    pub body: &'a [u8],
    /// Header plus body length; the caller advances its cursor by this much
    pub consumed: usize,
}

/// Looks for one complete frame at the start of `buf`.
///
/// Returns `Ok(None)` when more input is needed. Nothing is consumed in that
/// case, so the caller keeps the buffer and appends the next chunk.
pub fn split(buf: &[u8]) -> Result<Option<Frame<'_>>, FramingError> {
    let Some(header_end) = find(buf, HEADER_TERMINATOR) else {
        if buf.len() > MAX_HEADER_LEN {
            return Err(FramingError::HeaderTooLarge(MAX_HEADER_LEN));
        }
        return Ok(None);
    };

    if header_end > MAX_HEADER_LEN {
        return Err(FramingError::HeaderTooLarge(MAX_HEADER_LEN));
    }

    let content_length = parse_content_length(&buf[..header_end])?;
    if content_length > MAX_BODY_LEN {
        return Err(FramingError::BodyTooLarge {
            declared: content_length,
            limit: MAX_BODY_LEN,
        });
    }
    let body_start = header_end + HEADER_TERMINATOR.len();
    let total = body_start
        .checked_add(content_length)
        .ok_or_else(|| FramingError::InvalidContentLength(content_length.to_string()))?;

    if buf.len() < total {
        return Ok(None);
    }

    Ok(Some(Frame {
        body: &buf[body_start..total],
        consumed: total,
    }))
}

/// Number of bytes to drop after a framing error so scanning resumes at the
/// next plausible `Content-Length` header. Always at least 1 for a non-empty
/// buffer.
pub fn resync_offset(buf: &[u8]) -> usize {
    if buf.is_empty() {
        return 0;
    }

    match find_ignore_ascii_case(&buf[1..], CONTENT_LENGTH.as_bytes()) {
        Some(pos) => pos + 1,
        // Keep a tail that might be the start of a header split across reads
        None => buf
            .len()
            .saturating_sub(CONTENT_LENGTH.len() - 1)
            .max(1),
    }
}

/// Header plus declared body length, once a valid header block is buffered
pub(crate) fn declared_len(buf: &[u8]) -> Option<usize> {
    let header_end = find(buf, HEADER_TERMINATOR)?;
    let content_length = parse_content_length(&buf[..header_end]).ok()?;
    (header_end + HEADER_TERMINATOR.len()).checked_add(content_length)
}

fn parse_content_length(header: &[u8]) -> Result<usize, FramingError> {
    let header = std::str::from_utf8(header).map_err(|_| FramingError::InvalidHeaderEncoding)?;

    let mut content_length = None;
    for line in header.split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if !name.trim().eq_ignore_ascii_case(CONTENT_LENGTH) {
            continue;
        }
        let value = value.trim();
        let parsed = value
            .parse::<usize>()
            .map_err(|_| FramingError::InvalidContentLength(value.to_string()))?;
        content_length = Some(parsed);
    }

    content_length.ok_or(FramingError::MissingContentLength)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn find_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    jsonrpc: Option<String>,
    #[serde(default)]
    id: Option<RequestId>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Decodes a frame body far enough to route it. `params` stays untyped.
pub fn decode(body: &[u8]) -> Result<Message, DecodeError> {
    let raw: RawMessage = serde_json::from_slice(body)?;

    if let Some(version) = &raw.jsonrpc
        && version != JSONRPC_VERSION
    {
        return Err(DecodeError::UnsupportedVersion(version.clone()));
    }

    let params = raw.params.unwrap_or(Value::Null);
    match (raw.method, raw.id) {
        (Some(method), Some(id)) => Ok(Message::Request { id, method, params }),
        (Some(method), None) => Ok(Message::Notification { method, params }),
        (None, id) if id.is_some() || raw.result.is_some() || raw.error.is_some() => {
            Ok(Message::Response {
                id,
                result: raw.result,
                error: raw.error,
            })
        }
        (None, _) => Err(DecodeError::MissingMethod),
    }
}

/// Serializes `value` and prepends its header. Header and body come back as
/// one buffer so they can be written in a single call.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let body = serde_json::to_vec(value)?;
    let mut frame = format!("Content-Length: {}\r\n\r\n", body.len()).into_bytes();
    frame.extend_from_slice(&body);
    Ok(frame)
}
