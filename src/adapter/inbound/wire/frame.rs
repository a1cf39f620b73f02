//! Length-prefixed framing over any byte stream.

use std::io::{ErrorKind, Read, Write};

use tracing::trace;

use crate::error::ProtocolError;
use crate::port::FrameChannel;

const PREFIX_LEN: usize = 4;

/// [`FrameChannel`] over a reader/writer pair (stdio, TCP, in-memory).
///
/// Frames are `[u32 length, big-endian][body]`, where `length` counts the body
/// bytes. Zero-length frames and frames above `max_frame_bytes` are protocol
/// errors.
pub struct StreamChannel<R, W> {
    reader: R,
    writer: W,
    max_frame_bytes: usize,
}

impl<R: Read, W: Write> StreamChannel<R, W> {
    pub fn new(reader: R, writer: W, max_frame_bytes: usize) -> Self {
        Self {
            reader,
            writer,
            max_frame_bytes,
        }
    }

    /// Consume the channel and return the underlying writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Fill `buf` completely, returning how many bytes arrived before EOF.
    fn read_full(&mut self, buf: &mut [u8]) -> Result<usize, ProtocolError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

impl<R: Read, W: Write> FrameChannel for StreamChannel<R, W> {
    fn read_frame(&mut self) -> Result<Option<Vec<u8>>, ProtocolError> {
        let mut prefix = [0u8; PREFIX_LEN];
        match self.read_full(&mut prefix)? {
            0 => return Ok(None),
            PREFIX_LEN => {}
            got => {
                return Err(ProtocolError::Truncated {
                    expected: PREFIX_LEN,
                    got,
                })
            }
        }

        let length = u32::from_be_bytes(prefix) as usize;
        if length == 0 {
            return Err(ProtocolError::EmptyFrame);
        }
        if length > self.max_frame_bytes {
            return Err(ProtocolError::FrameTooLarge {
                length,
                max: self.max_frame_bytes,
            });
        }

        let mut body = vec![0u8; length];
        let got = self.read_full(&mut body)?;
        if got != length {
            return Err(ProtocolError::Truncated {
                expected: length,
                got,
            });
        }
        trace!(length, "frame received");
        Ok(Some(body))
    }

    fn write_frame(&mut self, body: &[u8]) -> Result<(), ProtocolError> {
        let length = u32::try_from(body.len()).map_err(|_| ProtocolError::FrameTooLarge {
            length: body.len(),
            max: u32::MAX as usize,
        })?;
        self.writer.write_all(&length.to_be_bytes())?;
        self.writer.write_all(body)?;
        self.writer.flush()?;
        trace!(length, "frame sent");
        Ok(())
    }
}
