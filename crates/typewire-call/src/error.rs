/// Errors that can occur while performing a call.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Channel-level error.
    #[error("channel error: {0}")]
    Channel(#[from] typewire_channel::ChannelError),

    /// Encoding arguments or decoding the reply failed.
    #[error("descriptor error: {0}")]
    Descriptor(#[from] typewire_descriptor::DescriptorError),

    /// The server did not answer the ping as expected.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// The server reported a status other than the ok code.
    #[error("call `{method}` failed with status: {status}")]
    Status { method: String, status: String },
}

pub type Result<T> = std::result::Result<T, CallError>;
