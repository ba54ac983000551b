use std::io::{ErrorKind, Read, Write};

use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, trace};

use crate::config::ChannelConfig;
use crate::error::{ChannelError, Result};
use crate::session::MessageWriter;
use crate::traits::{Decoder, Encoder};

/// A byte channel over one underlying stream.
///
/// Reads go straight to the stream. Writes are appended to an in-memory
/// accumulator and reach the stream only on [`flush`](Channel::flush).
/// Interleaving unflushed writes with reads on the same channel is not
/// supported: a peer will never see a request that is still sitting in the
/// accumulator.
///
/// A channel has a single owner. Share descriptors freely, not channels.
pub struct Channel<T> {
    inner: T,
    buf: BytesMut,
    config: ChannelConfig,
}

impl<T> Channel<T> {
    /// Create a new channel with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, ChannelConfig::default())
    }

    /// Create a new channel with explicit configuration.
    pub fn with_config(inner: T, config: ChannelConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(config.initial_capacity),
            config,
        }
    }

    /// Number of bytes written but not yet flushed.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Bytes written but not yet flushed.
    pub fn pending_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Begin a message. See [`MessageWriter`].
    pub fn message(&mut self) -> MessageWriter<'_, T> {
        MessageWriter::new(self)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the channel and return the inner stream.
    ///
    /// Unflushed bytes are dropped.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current channel configuration.
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Update the maximum length of a single read.
    pub fn set_max_read_len(&mut self, max_read_len: usize) {
        self.config.max_read_len = max_read_len;
    }

    /// Drop everything written after `len` pending bytes.
    pub(crate) fn truncate_pending(&mut self, len: usize) {
        self.buf.truncate(len);
    }
}

impl<T: Write> Channel<T> {
    /// Write the whole accumulator to the stream in one go, then clear it.
    ///
    /// Bytes accepted by the stream leave the accumulator as they go, so a
    /// flush retried after an error resumes where the failed one stopped.
    pub fn flush(&mut self) -> Result<()> {
        let mut written = 0usize;
        while !self.buf.is_empty() {
            match self.inner.write(&self.buf) {
                Ok(0) => return Err(ChannelError::SinkClosed),
                Ok(n) => {
                    self.buf.advance(n);
                    written += n;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            }
        }

        loop {
            match self.inner.flush() {
                Ok(()) => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            }
        }

        trace!(bytes = written, "flushed channel");
        Ok(())
    }

    /// Write one message with `write_fn`, flushing only if it succeeds.
    ///
    /// On failure the partially written message is discarded and the error
    /// is returned unchanged.
    pub fn send_message<F, E>(&mut self, write_fn: F) -> std::result::Result<(), E>
    where
        F: FnOnce(&mut Self) -> std::result::Result<(), E>,
        E: From<ChannelError>,
    {
        let mut message = self.message();
        write_fn(message.channel())?;
        message.commit()?;
        Ok(())
    }
}

impl<T: Read> Decoder for Channel<T> {
    fn read(&mut self, n: usize) -> Result<Bytes> {
        if n > self.config.max_read_len {
            return Err(ChannelError::ReadTooLarge {
                size: n,
                max: self.config.max_read_len,
            });
        }

        let mut out = BytesMut::zeroed(n);
        let mut filled = 0usize;
        while filled < n {
            match self.inner.read(&mut out[filled..]) {
                Ok(0) => {
                    debug!(expected = n, received = filled, "stream ended mid-read");
                    return Err(ChannelError::Truncated {
                        expected: n,
                        received: filled,
                    });
                }
                Ok(read) => filled += read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            }
        }

        Ok(out.freeze())
    }

    fn read_limit(&self) -> usize {
        self.config.max_read_len
    }
}

impl<T> Encoder for Channel<T> {
    fn write(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }
}
