//! Configuration structures.
//!
//! Every value has a default so a bare environment yields a working
//! configuration pointed at a local MGED listener.

use std::time::Duration;

/// Settings for the BRL-CAD TCP socket bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Listener host.
    pub host: String,

    /// Listener port.
    pub port: u16,

    /// Timeout applied uniformly to connect, send, and receive.
    pub timeout: Duration,

    /// Maximum number of response bytes read per exchange. Responses longer
    /// than this are silently truncated; the wire protocol has no framing.
    pub buffer_size: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5555,
            timeout: Duration::from_secs_f64(2.0),
            buffer_size: 4096,
        }
    }
}

impl BridgeConfig {
    /// Returns the listener address in `host:port` form.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the OpenAI-compatible LLM backend used by the chat agent.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// API key. Only required by the `chat` subcommand.
    pub api_key: Option<String>,

    /// Base URL of the chat-completions endpoint.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// Sampling temperature. Zero for deterministic CAD math.
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.0,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Top-level configuration aggregating all sub-configs.
///
/// Constructed once at startup and injected into the bridge, tool surface,
/// and agent. Nothing reads the environment after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Socket bridge settings.
    pub bridge: BridgeConfig,

    /// LLM backend settings.
    pub llm: LlmConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}
