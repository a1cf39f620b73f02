//! Message-framed request channel.
//!
//! The worker loop only needs "give me the next request body" and "send this
//! response body"; whether frames travel over stdio, a TCP socket or an
//! in-memory buffer is an adapter concern.

use crate::error::ProtocolError;

/// Bidirectional channel of length-delimited frames.
pub trait FrameChannel {
    /// Read the next frame body (the bytes after the length prefix).
    ///
    /// Returns `Ok(None)` when the peer closed the stream cleanly between
    /// frames.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] on malformed framing or a stream that ends
    /// inside a frame. The channel must not be used afterwards.
    fn read_frame(&mut self) -> Result<Option<Vec<u8>>, ProtocolError>;

    /// Write one frame body, prefixing it with its length.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] if the underlying stream fails.
    fn write_frame(&mut self, body: &[u8]) -> Result<(), ProtocolError>;
}
