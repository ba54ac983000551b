use typewire_channel::ChannelError;

/// Errors that can occur while building descriptors or transcoding values.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    /// The underlying channel failed, including truncated input.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Integer descriptors only support 1, 2 and 4 byte widths.
    #[error("unsupported integer width: {0} bytes (expected 1, 2 or 4)")]
    UnsupportedWidth(u8),

    /// The value does not fit the descriptor's signedness and width.
    #[error("integer {value} out of range for {kind}")]
    IntegerOutOfRange { value: i64, kind: &'static str },

    /// A length or count does not fit the `u32` prefix.
    #[error("length {len} exceeds u32 prefix")]
    LengthOverflow { len: usize },

    /// A boolean byte other than 0 or 1.
    #[error("invalid bool byte 0x{0:02x}")]
    InvalidBool(u8),

    /// Two fields of a record share a name.
    #[error("duplicate field `{field}` in record `{record}`")]
    DuplicateField { record: String, field: String },

    /// A dynamic record value lacks a declared field.
    #[error("missing field `{field}` in record `{record}`")]
    MissingField { record: String, field: String },

    /// A dynamic value does not match the descriptor it is written with.
    #[error("type mismatch (expected {expected}, found {found})")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A JSON value could not be converted for the descriptor.
    #[error("invalid value at {path}: {message}")]
    InvalidValue { path: String, message: String },

    /// Input remained after decoding a complete value.
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    /// A schema document could not be parsed.
    #[error("invalid schema: {0}")]
    Schema(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DescriptorError>;
