use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    #[error("missing Content-Length header")]
    MissingContentLength,

    #[error("invalid Content-Length header: {0:?}")]
    InvalidContentLength(String),

    #[error("header block is not valid UTF-8")]
    InvalidHeaderEncoding,

    #[error("header block exceeds {0} bytes without a terminator")]
    HeaderTooLarge(usize),

    #[error("declared body of {declared} bytes exceeds the {limit} byte limit")]
    BodyTooLarge { declared: usize, limit: usize },

    #[error("stream ended mid-frame: {received} of {expected} bytes buffered")]
    Truncated { expected: usize, received: usize },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message has no method and is not a response")]
    MissingMethod,

    #[error("unsupported jsonrpc version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Framing(#[from] FramingError),

    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

impl TransportError {
    /// Only I/O failures end the process loop; everything else is recoverable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TransportError::Io(_))
    }
}
