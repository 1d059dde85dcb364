//! Error types for brlcad-mcp.
//!
//! The bridge distinguishes timeouts from other socket failures as two
//! separate variants so callers can pattern-match without inspecting
//! message text. Both variants carry the listener address.

use thiserror::Error;

/// Errors that can occur while talking to the BRL-CAD listener.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The listener did not respond within the configured timeout.
    #[error("BRL-CAD listener at {host}:{port} timed out")]
    Timeout {
        /// Listener host.
        host: String,
        /// Listener port.
        port: u16,
    },

    /// The listener was unreachable, refused the connection, or reset it.
    #[error("could not reach BRL-CAD listener at {host}:{port}: {source}")]
    ConnectionFailed {
        /// Listener host.
        host: String,
        /// Listener port.
        port: u16,
        /// The underlying socket error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while resolving configuration from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value '{value}' for {variable}: {reason}")]
    InvalidValue {
        /// The environment variable name.
        variable: &'static str,
        /// The offending value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors that can occur in the interactive chat agent.
#[derive(Error, Debug)]
pub enum AgentError {
    /// No API key is configured for the LLM backend.
    #[error("OPENAI_API_KEY environment variable is not set")]
    MissingApiKey,

    /// The LLM backend request failed at the HTTP level.
    #[error("LLM request failed")]
    Http(#[from] reqwest::Error),

    /// The LLM backend returned a non-success status.
    #[error("LLM backend returned {status}: {body}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the backend.
        body: String,
    },

    /// The LLM response could not be interpreted.
    #[error("malformed LLM response: {0}")]
    MalformedResponse(String),

    /// Reading user input from the terminal failed.
    #[error("terminal I/O error")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display_carries_address() {
        let error = BridgeError::Timeout {
            host: "127.0.0.1".to_string(),
            port: 5555,
        };
        let msg = error.to_string();
        assert!(msg.contains("127.0.0.1:5555"));
        assert!(msg.contains("timed out"));
    }

    #[test]
    fn connection_failed_display_carries_address() {
        let error = BridgeError::ConnectionFailed {
            host: "10.0.0.2".to_string(),
            port: 5555,
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        let msg = error.to_string();
        assert!(msg.contains("10.0.0.2:5555"));
    }

    #[test]
    fn config_error_display() {
        let error = ConfigError::InvalidValue {
            variable: "BRLCAD_PORT",
            value: "not-a-port".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("BRLCAD_PORT"));
        assert!(msg.contains("not-a-port"));
    }
}
