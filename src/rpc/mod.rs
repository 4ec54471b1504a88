// JSON-RPC layer
// - codec.rs: Content-Length framing, decode/encode
// - error.rs: Framing, decode, and transport errors
// - message.rs: JSON-RPC envelopes
// - transport.rs: Async frame reader/writer

pub mod codec;
pub mod error;
pub mod message;
pub mod transport;

pub use codec::{Frame, MAX_BODY_LEN, MAX_HEADER_LEN, decode, encode, resync_offset, split};
pub use error::{DecodeError, FramingError, TransportError};
pub use message::{ErrorCode, JSONRPC_VERSION, Message, RequestId, Response, ResponseError};
pub use transport::{FrameReader, FrameWriter};
