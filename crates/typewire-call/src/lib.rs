//! Client call protocol for generated typewire RPC stubs.
//!
//! One call on the wire, all values typewire-encoded:
//!
//! ```text
//! client -> server   string "<<<PING>>>"                 (flush)
//! server -> client   string "<<<PONG>>>"
//! client -> server   string method, u32 version, args... (flush)
//! server -> client   string status ("OK"), return value
//! ```
//!
//! Connecting, pooling and dispatch live elsewhere; [`Client`] works over any
//! blocking `Read + Write` stream.

pub mod client;
pub mod config;
pub mod error;

pub use client::Client;
pub use config::{CallConfig, DEFAULT_OK_CODE, DEFAULT_PING, DEFAULT_PONG, DEFAULT_PROTOCOL_VERSION};
pub use error::{CallError, Result};
