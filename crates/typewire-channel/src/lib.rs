//! Buffered byte channel for typewire payloads.
//!
//! Reads pull exactly the requested number of bytes from the underlying
//! stream. Writes accumulate in memory and only reach the stream on an
//! explicit flush, so a logical message costs one write call no matter how
//! many fields it has.
//!
//! All multi-byte integers are little-endian.

pub mod channel;
pub mod config;
pub mod error;
pub mod session;
pub mod traits;

pub use channel::Channel;
pub use config::{ChannelConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_READ_LEN};
pub use error::{ChannelError, Result};
pub use session::MessageWriter;
pub use traits::{Decoder, Encoder};
