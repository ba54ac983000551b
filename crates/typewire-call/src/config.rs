/// Protocol version sent with every call.
pub const DEFAULT_PROTOCOL_VERSION: u32 = 1;

/// Liveness check sent before each call.
pub const DEFAULT_PING: &str = "<<<PING>>>";

/// Expected answer to [`DEFAULT_PING`].
pub const DEFAULT_PONG: &str = "<<<PONG>>>";

/// Status string of a successful call.
pub const DEFAULT_OK_CODE: &str = "OK";

/// Call protocol settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallConfig {
    /// Version written after the method name.
    pub protocol_version: u32,
    /// Token written to check the server is alive.
    pub ping_token: String,
    /// Token the server must answer with.
    pub pong_token: String,
    /// Status the server reports for a successful call.
    pub ok_code: String,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            protocol_version: DEFAULT_PROTOCOL_VERSION,
            ping_token: DEFAULT_PING.to_string(),
            pong_token: DEFAULT_PONG.to_string(),
            ok_code: DEFAULT_OK_CODE.to_string(),
        }
    }
}
