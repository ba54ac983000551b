/// Errors that can occur while moving bytes through a channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The source ended before the requested number of bytes arrived.
    #[error("truncated stream (expected {expected} bytes, received {received})")]
    Truncated { expected: usize, received: usize },

    /// A single read asked for more bytes than the channel allows.
    #[error("read too large ({size} bytes, max {max})")]
    ReadTooLarge { size: usize, max: usize },

    /// The sink accepted zero bytes while flushing.
    #[error("sink closed during flush")]
    SinkClosed,

    /// An I/O error occurred on the underlying stream.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChannelError>;
