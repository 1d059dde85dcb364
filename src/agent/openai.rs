//! Minimal OpenAI-compatible chat-completions client with tool calling.
//!
//! Only what the interactive agent needs: one non-streaming completion
//! call, with the tool catalog attached as function definitions.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::LlmConfig;
use crate::error::AgentError;
use crate::tools::ToolDefinition;

/// A chat message in the OpenAI wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user`, `assistant`, or `tool`.
    pub role: String,
    /// Message text. Absent on assistant turns that only carry tool calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool calls requested by the assistant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// For `tool` role messages: the call this message answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Creates a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Creates a tool-result message answering `tool_call_id`.
    #[must_use]
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A tool call requested by the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Backend-assigned call identifier.
    pub id: String,
    /// Always "function".
    #[serde(rename = "type")]
    pub kind: String,
    /// The function to invoke.
    pub function: FunctionCall,
}

/// The function member of a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Tool name.
    pub name: String,
    /// Arguments as a JSON-encoded string (OpenAI wire convention).
    pub arguments: String,
}

/// A function-type tool advertised to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionSpec,
}

#[derive(Debug, Clone, Serialize)]
struct FunctionSpec {
    name: &'static str,
    description: &'static str,
    parameters: Value,
}

impl From<&ToolDefinition> for ToolSpec {
    fn from(def: &ToolDefinition) -> Self {
        Self {
            kind: "function",
            function: FunctionSpec {
                name: def.name,
                description: def.description,
                parameters: def.input_schema.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolSpec]>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Chat-completions client for an OpenAI-compatible backend.
pub struct ChatClient {
    http: Client,
    config: LlmConfig,
    api_key: String,
}

impl ChatClient {
    /// Creates a client from the LLM configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if the API key is unset or the HTTP client
    /// cannot be constructed.
    pub fn new(config: LlmConfig) -> Result<Self, AgentError> {
        let Some(api_key) = config.api_key.clone() else {
            return Err(AgentError::MissingApiKey);
        };

        let http = Client::builder().build()?;

        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    /// Requests one completion for `messages` with `tools` attached.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on HTTP failure, non-success status, or a
    /// response with no choices.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatMessage, AgentError> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let body = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            tools: (!tools.is_empty()).then_some(tools),
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AgentError::MalformedResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| AgentError::MalformedResponse("response has no choices".to_string()))
    }
}
