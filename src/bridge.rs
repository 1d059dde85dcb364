//! TCP socket bridge to the BRL-CAD MGED listener.
//!
//! Each call is a one-shot exchange: open a fresh connection, send one
//! newline-terminated command, read one response, close. There is no
//! pooling and no persistent session; every call pays the full TCP
//! handshake cost. That keeps concurrent invocations trivially independent.
//!
//! The configured timeout covers the whole exchange (connect, send, read).
//! The connection is dropped on every exit path, success or failure.

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::config::BridgeConfig;
use crate::error::BridgeError;

/// The command-relay seam between the tool surface and the CAD listener.
///
/// Implemented by [`TcpBridge`] in production and by recording stubs in
/// tests.
#[async_trait]
pub trait CommandBridge: Send + Sync {
    /// Sends a single MGED command and returns the listener's response,
    /// decoded as UTF-8 and trimmed of surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Timeout`] if the listener does not complete
    /// the exchange within the configured window, or
    /// [`BridgeError::ConnectionFailed`] for any other socket-level failure.
    async fn send_command(&self, cmd: &str) -> Result<String, BridgeError>;
}

/// One-shot TCP bridge to the MGED Tcl listener.
pub struct TcpBridge {
    config: BridgeConfig,
}

impl TcpBridge {
    /// Creates a bridge with the given connection settings.
    #[must_use]
    pub const fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    /// Performs the raw exchange without timeout handling.
    async fn exchange(&self, cmd: &str) -> std::io::Result<String> {
        let mut stream = TcpStream::connect(self.config.address()).await?;

        stream.write_all(cmd.as_bytes()).await?;
        stream.write_all(b"\n").await?;

        // The protocol has no framing or length prefix: one read of up to
        // buffer_size bytes is the whole response. Anything longer is
        // silently truncated.
        let mut buf = vec![0u8; self.config.buffer_size];
        let n = stream.read(&mut buf).await?;

        Ok(String::from_utf8_lossy(&buf[..n]).trim().to_string())
    }
}

#[async_trait]
impl CommandBridge for TcpBridge {
    async fn send_command(&self, cmd: &str) -> Result<String, BridgeError> {
        let result = tokio::time::timeout(self.config.timeout, self.exchange(cmd)).await;

        let response = match result {
            Err(_elapsed) => {
                return Err(BridgeError::Timeout {
                    host: self.config.host.clone(),
                    port: self.config.port,
                })
            }
            Ok(Err(source)) => {
                return Err(BridgeError::ConnectionFailed {
                    host: self.config.host.clone(),
                    port: self.config.port,
                    source,
                })
            }
            Ok(Ok(response)) => response,
        };

        debug!(command = cmd, response = %response, "MGED exchange");
        Ok(response)
    }
}
