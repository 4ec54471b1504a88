//! Async frame reader and writer over the editor's byte streams

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::rpc::codec::{declared_len, encode, resync_offset, split};
use crate::rpc::error::{FramingError, TransportError};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Accumulates input chunks and hands out complete frame bodies
pub struct FrameReader<R> {
    reader: R,
    buffer: Vec<u8>,
    eof: bool,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            eof: false,
        }
    }

    /// Returns the next frame body, `Ok(None)` at end of stream.
    ///
    /// A framing error drops the malformed bytes before returning, so calling
    /// again continues with whatever follows.
    pub async fn next_frame(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        loop {
            match split(&self.buffer) {
                Ok(Some(frame)) => {
                    let body = frame.body.to_vec();
                    let consumed = frame.consumed;
                    self.buffer.drain(..consumed);
                    return Ok(Some(body));
                }
                Ok(None) => {}
                Err(e) => {
                    let skip = resync_offset(&self.buffer);
                    warn!("Dropping {} bytes after framing error: {}", skip, e);
                    self.buffer.drain(..skip);
                    return Err(e.into());
                }
            }

            if self.eof {
                return self.finish();
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = self.reader.read(&mut chunk).await?;
            if read == 0 {
                debug!("Input stream closed");
                self.eof = true;
                continue;
            }
            self.buffer.extend_from_slice(&chunk[..read]);
        }
    }

    fn finish(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        if self.buffer.iter().all(u8::is_ascii_whitespace) {
            self.buffer.clear();
            return Ok(None);
        }

        let received = self.buffer.len();
        let expected = declared_len(&self.buffer).unwrap_or(received);
        self.buffer.clear();
        Err(FramingError::Truncated { expected, received }.into())
    }
}

/// Writes framed messages. Each frame goes out in a single write.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn write<T: Serialize + ?Sized>(&mut self, message: &T) -> Result<(), TransportError> {
        let frame = encode(message).map_err(TransportError::Encode)?;
        self.writer.write_all(&frame).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
