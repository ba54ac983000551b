use std::io::{Read, Write};

use bytes::Bytes;
use tracing::debug;
use typewire_channel::{Channel, ChannelConfig, Encoder};
use typewire_descriptor::{ByteString, Descriptor, Integer};

use crate::config::CallConfig;
use crate::error::{CallError, Result};

/// Performs typewire calls over one blocking stream.
///
/// Calls are strictly sequential: each one is written, flushed, and its
/// reply fully read before the next may start.
pub struct Client<T> {
    channel: Channel<T>,
    config: CallConfig,
}

impl<T: Read + Write> Client<T> {
    /// Create a client with default configuration.
    pub fn new(stream: T) -> Self {
        Self::with_config(stream, CallConfig::default())
    }

    /// Create a client with explicit call configuration.
    pub fn with_config(stream: T, config: CallConfig) -> Self {
        Self::from_channel(Channel::new(stream), config)
    }

    /// Create a client on top of an existing channel.
    pub fn from_channel(channel: Channel<T>, config: CallConfig) -> Self {
        Self { channel, config }
    }

    /// Create a client with explicit channel configuration.
    pub fn with_channel_config(stream: T, channel: ChannelConfig, config: CallConfig) -> Self {
        Self::from_channel(Channel::with_config(stream, channel), config)
    }

    /// Probe the server with the ping token and check the answer.
    pub fn ping(&mut self) -> Result<()> {
        let ping = Bytes::from(self.config.ping_token.clone());
        self.channel.send_message(|channel| -> Result<()> {
            ByteString.write(channel, &ping)?;
            Ok(())
        })?;

        let pong = ByteString.read(&mut self.channel)?;
        if pong.as_ref() != self.config.pong_token.as_bytes() {
            return Err(CallError::Handshake(format!(
                "unexpected ping answer: {}",
                String::from_utf8_lossy(&pong)
            )));
        }
        Ok(())
    }

    /// Call `method` and decode its return value with `returns`.
    ///
    /// `write_args` encodes the arguments in declaration order, each with its
    /// own descriptor. The whole request is flushed once; if `write_args`
    /// fails nothing is sent.
    pub fn call<R, F>(&mut self, method: &str, returns: &R, write_args: F) -> Result<R::Value>
    where
        R: Descriptor + ?Sized,
        F: FnOnce(&mut dyn Encoder) -> typewire_descriptor::Result<()>,
    {
        self.ping()?;

        debug!(method, version = self.config.protocol_version, "sending call");
        let name = Bytes::copy_from_slice(method.as_bytes());
        let version = i64::from(self.config.protocol_version);
        self.channel.send_message(|channel| -> Result<()> {
            ByteString.write(channel, &name)?;
            Integer::U32.write(channel, &version)?;
            let args: &mut dyn Encoder = channel;
            write_args(args)?;
            Ok(())
        })?;

        let status = ByteString.read(&mut self.channel)?;
        if status.as_ref() != self.config.ok_code.as_bytes() {
            let status = String::from_utf8_lossy(&status).into_owned();
            debug!(method, %status, "call rejected");
            return Err(CallError::Status {
                method: method.to_string(),
                status,
            });
        }

        Ok(returns.read(&mut self.channel)?)
    }

    /// Current call configuration.
    pub fn config(&self) -> &CallConfig {
        &self.config
    }

    /// Borrow the underlying channel.
    pub fn channel(&mut self) -> &mut Channel<T> {
        &mut self.channel
    }

    /// Consume the client and return the inner stream.
    pub fn into_inner(self) -> T {
        self.channel.into_inner()
    }
}
