//! Configuration loading from environment variables.
//!
//! All settings are environment-sourced with defaults suitable for a local
//! MGED listener:
//!
//! | Variable              | Default                     |
//! |-----------------------|-----------------------------|
//! | `BRLCAD_HOST`         | `127.0.0.1`                 |
//! | `BRLCAD_PORT`         | `5555`                      |
//! | `BRLCAD_TIMEOUT`      | `2.0` (seconds)             |
//! | `BRLCAD_BUFFER_SIZE`  | `4096` (bytes)              |
//! | `OPENAI_API_KEY`      | unset (required for `chat`) |
//! | `OPENAI_BASE_URL`     | `https://api.openai.com/v1` |
//! | `OPENAI_MODEL`        | `gpt-4o`                    |
//! | `OPENAI_TEMPERATURE`  | `0`                         |
//! | `BRLCAD_MCP_LOG`      | `warn`                      |
//!
//! The configuration is loaded once in `main` and passed down explicitly;
//! no module reads the environment afterwards.

mod settings;

pub use settings::{BridgeConfig, Config, LlmConfig, LoggingConfig};

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Reads an environment variable, parsing it with `FromStr`.
///
/// Returns `default` when the variable is unset.
fn env_parse<T>(variable: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                variable,
                value: raw,
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// Reads an environment variable as a string, falling back to `default`.
fn env_string(variable: &str, default: &str) -> String {
    std::env::var(variable).unwrap_or_else(|_| default.to_string())
}

/// Converts a timeout in seconds to a `Duration`.
///
/// Rejects non-positive, non-finite, and overflowing values.
fn parse_timeout(timeout_secs: f64) -> Result<Duration, ConfigError> {
    if timeout_secs <= 0.0 {
        return Err(ConfigError::InvalidValue {
            variable: "BRLCAD_TIMEOUT",
            value: timeout_secs.to_string(),
            reason: "timeout must be a positive number of seconds".to_string(),
        });
    }

    Duration::try_from_secs_f64(timeout_secs).map_err(|e| ConfigError::InvalidValue {
        variable: "BRLCAD_TIMEOUT",
        value: timeout_secs.to_string(),
        reason: e.to_string(),
    })
}

/// Loads the full configuration from the environment.
///
/// # Errors
///
/// Returns an error if any set variable fails to parse, if the timeout is
/// not a positive, finite, representable number of seconds, or if the
/// buffer size is zero.
pub fn load_config() -> Result<Config, ConfigError> {
    let timeout = parse_timeout(env_parse("BRLCAD_TIMEOUT", 2.0)?)?;

    let buffer_size: usize = env_parse("BRLCAD_BUFFER_SIZE", 4096)?;
    if buffer_size == 0 {
        return Err(ConfigError::InvalidValue {
            variable: "BRLCAD_BUFFER_SIZE",
            value: "0".to_string(),
            reason: "buffer size must be non-zero".to_string(),
        });
    }

    let bridge = BridgeConfig {
        host: env_string("BRLCAD_HOST", "127.0.0.1"),
        port: env_parse("BRLCAD_PORT", 5555)?,
        timeout,
        buffer_size,
    };

    let llm = LlmConfig {
        api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
        base_url: env_string("OPENAI_BASE_URL", "https://api.openai.com/v1"),
        model: env_string("OPENAI_MODEL", "gpt-4o"),
        temperature: env_parse("OPENAI_TEMPERATURE", 0.0)?,
    };

    let logging = LoggingConfig {
        level: env_string("BRLCAD_MCP_LOG", "warn"),
    };

    Ok(Config {
        bridge,
        llm,
        logging,
    })
}
