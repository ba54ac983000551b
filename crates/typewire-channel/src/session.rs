use std::io::Write;

use tracing::debug;

use crate::channel::Channel;
use crate::error::Result;

/// Scoped write of one logical message.
///
/// Everything written through the guard is flushed exactly once, by
/// [`commit`](MessageWriter::commit). A guard dropped without committing,
/// for instance because encoding a field failed and `?` returned early,
/// removes the partial message from the accumulator so it can never be
/// flushed later.
pub struct MessageWriter<'a, T> {
    channel: &'a mut Channel<T>,
    start: usize,
    committed: bool,
}

impl<'a, T> MessageWriter<'a, T> {
    pub(crate) fn new(channel: &'a mut Channel<T>) -> Self {
        let start = channel.pending();
        Self {
            channel,
            start,
            committed: false,
        }
    }

    /// The channel to encode the message into.
    pub fn channel(&mut self) -> &mut Channel<T> {
        &mut *self.channel
    }

    /// Bytes written since the message began.
    pub fn len(&self) -> usize {
        self.channel.pending().saturating_sub(self.start)
    }

    /// True if nothing has been written since the message began.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Write> MessageWriter<'_, T> {
    /// Flush the message to the underlying stream.
    ///
    /// If the flush fails the message is discarded like an uncommitted one.
    pub fn commit(mut self) -> Result<()> {
        let before = self.channel.pending();
        let result = self.channel.flush();
        match result {
            Ok(()) => self.committed = true,
            Err(_) => {
                // bytes the stream accepted are gone from the front
                let sent = before.saturating_sub(self.channel.pending());
                self.start = self.start.saturating_sub(sent);
            }
        }
        result
    }
}

impl<T> Drop for MessageWriter<'_, T> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let discarded = self.len();
        if discarded > 0 {
            debug!(bytes = discarded, "discarding uncommitted message");
        }
        self.channel.truncate_pending(self.start);
    }
}
