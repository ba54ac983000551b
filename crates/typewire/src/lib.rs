//! Schema-matched binary serialization for RPC payloads.
//!
//! typewire turns typed values into bytes and back using descriptor trees
//! that both peers build from the same message definition. Nothing on the
//! wire says what type comes next.
//!
//! # Crate Structure
//!
//! - [`channel`]: Buffered byte channel with explicit flush
//! - [`descriptor`]: Primitive and composite type descriptors, runtime schemas
//! - [`call`]: Client call protocol for generated stubs (behind `call` feature)

/// Re-export channel types.
pub mod channel {
    pub use typewire_channel::*;
}

/// Re-export descriptor types.
pub mod descriptor {
    pub use typewire_descriptor::*;
}

/// Re-export call types (requires `call` feature).
#[cfg(feature = "call")]
pub mod call {
    pub use typewire_call::*;
}
