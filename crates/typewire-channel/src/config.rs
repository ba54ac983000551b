/// Default capacity reserved for the output accumulator: 8 KiB.
pub const DEFAULT_INITIAL_CAPACITY: usize = 8 * 1024;

/// Default upper bound for a single read: 16 MiB.
pub const DEFAULT_MAX_READ_LEN: usize = 16 * 1024 * 1024;

/// Configuration for a [`Channel`](crate::Channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Bytes reserved up front for the output accumulator.
    pub initial_capacity: usize,
    /// Largest byte count a single `read` may request.
    ///
    /// Length prefixes come off the wire, so a corrupt stream could otherwise
    /// ask for a multi-gigabyte allocation.
    pub max_read_len: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_read_len: DEFAULT_MAX_READ_LEN,
        }
    }
}
