//! JSON-RPC 2.0 message types for the MCP stdio transport.
//!
//! MCP constrains plain JSON-RPC in two ways that matter here: request IDs
//! must be strings or integers (never null), and messages are single lines
//! of UTF-8 JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The MCP protocol version this implementation supports.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name for capability negotiation.
pub const SERVER_NAME: &str = "brlcad-mcp";

/// A JSON-RPC 2.0 request ID: string or integer, never null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID.
    Number(i64),
    /// String request ID.
    String(String),
}

/// An incoming request, expecting a response.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Must be "2.0".
    pub jsonrpc: String,
    /// Unique request identifier.
    pub id: RequestId,
    /// The method to invoke.
    pub method: String,
    /// Optional method parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

/// An incoming notification; no response is expected.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    /// Must be "2.0".
    pub jsonrpc: String,
    /// The notification method.
    pub method: String,
    /// Optional parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

/// A successful response.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Always "2.0".
    pub jsonrpc: &'static str,
    /// The request ID this response corresponds to.
    pub id: RequestId,
    /// The method result.
    pub result: Value,
}

impl Response {
    /// Creates a success response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result,
        }
    }
}

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    /// Invalid JSON was received.
    pub const PARSE_ERROR: i32 = -32700;
    /// The JSON is not a valid request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// The method does not exist.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid method parameters.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal server error.
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// The error member of an error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorObject {
    /// The error code.
    pub code: i32,
    /// A short description of the error.
    pub message: String,
}

/// An error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,
    /// The request ID, when it could be determined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    /// The error details.
    pub error: ErrorObject,
}

impl ErrorResponse {
    fn new(id: Option<RequestId>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            error: ErrorObject {
                code,
                message: message.into(),
            },
        }
    }

    /// Invalid JSON; the request ID cannot be determined.
    #[must_use]
    pub fn parse_error() -> Self {
        Self::new(None, error_codes::PARSE_ERROR, "Parse error")
    }

    /// Structurally invalid request.
    #[must_use]
    pub fn invalid_request(id: Option<RequestId>) -> Self {
        Self::new(id, error_codes::INVALID_REQUEST, "Invalid Request")
    }

    /// Unknown method.
    #[must_use]
    pub fn method_not_found(id: RequestId, method: &str) -> Self {
        Self::new(
            Some(id),
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
        )
    }

    /// Parameters failed validation.
    #[must_use]
    pub fn invalid_params(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(Some(id), error_codes::INVALID_PARAMS, message)
    }

    /// Internal server failure.
    #[must_use]
    pub fn internal_error(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(Some(id), error_codes::INTERNAL_ERROR, message)
    }

    /// Request received in a state that does not permit it.
    #[must_use]
    pub fn invalid_state(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(Some(id), error_codes::INVALID_REQUEST, message)
    }
}

/// An incoming message: request or notification.
#[derive(Debug, Clone)]
pub enum Message {
    /// A request expecting a response.
    Request(Request),
    /// A one-way notification.
    Notification(Notification),
}

/// Parses one line of JSON into an incoming message.
///
/// A message with an `id` member is a request; without, a notification.
///
/// # Errors
///
/// Returns a ready-to-send [`ErrorResponse`] if the JSON is malformed or
/// not a valid JSON-RPC 2.0 message.
pub fn parse_message(json: &str) -> Result<Message, ErrorResponse> {
    let value: Value = serde_json::from_str(json).map_err(|_| ErrorResponse::parse_error())?;

    let obj = value
        .as_object()
        .ok_or_else(ErrorResponse::parse_error)?;

    let version = obj
        .get("jsonrpc")
        .and_then(Value::as_str)
        .ok_or_else(|| ErrorResponse::invalid_request(None))?;
    if version != "2.0" {
        return Err(ErrorResponse::invalid_request(None));
    }

    if obj.contains_key("id") {
        let request: Request =
            serde_json::from_value(value).map_err(|_| ErrorResponse::invalid_request(None))?;
        if request.method.is_empty() {
            return Err(ErrorResponse::invalid_request(Some(request.id)));
        }
        Ok(Message::Request(request))
    } else {
        let notification: Notification =
            serde_json::from_value(value).map_err(|_| ErrorResponse::invalid_request(None))?;
        Ok(Message::Notification(notification))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_request_with_numeric_id() {
        let json = r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}"#;
        let Message::Request(req) = parse_message(json).unwrap() else {
            panic!("expected Request");
        };
        assert_eq!(req.id, RequestId::Number(1));
        assert_eq!(req.method, "initialize");
    }

    #[test]
    fn parse_request_with_string_id() {
        let json = r#"{"jsonrpc": "2.0", "id": "abc-123", "method": "ping"}"#;
        let Message::Request(req) = parse_message(json).unwrap() else {
            panic!("expected Request");
        };
        assert_eq!(req.id, RequestId::String("abc-123".to_string()));
    }

    #[test]
    fn parse_notification() {
        let json = r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#;
        let Message::Notification(notif) = parse_message(json).unwrap() else {
            panic!("expected Notification");
        };
        assert_eq!(notif.method, "notifications/initialized");
    }

    #[test]
    fn reject_invalid_json() {
        let err = parse_message("not valid json").unwrap_err();
        assert_eq!(err.error.code, error_codes::PARSE_ERROR);
    }

    #[test]
    fn reject_missing_version() {
        let err = parse_message(r#"{"id": 1, "method": "test"}"#).unwrap_err();
        assert_eq!(err.error.code, error_codes::INVALID_REQUEST);
    }

    #[test]
    fn reject_wrong_version() {
        let err = parse_message(r#"{"jsonrpc": "1.0", "id": 1, "method": "test"}"#).unwrap_err();
        assert_eq!(err.error.code, error_codes::INVALID_REQUEST);
    }

    #[test]
    fn reject_empty_method() {
        let err = parse_message(r#"{"jsonrpc": "2.0", "id": 7, "method": ""}"#).unwrap_err();
        assert_eq!(err.error.code, error_codes::INVALID_REQUEST);
        assert_eq!(err.id, Some(RequestId::Number(7)));
    }

    #[test]
    fn serialise_success_response() {
        let response = Response::success(RequestId::Number(1), serde_json::json!({"ok": true}));
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""jsonrpc":"2.0""#));
        assert!(json.contains(r#""id":1"#));
        assert!(json.contains(r#""result":{"ok":true}"#));
    }

    #[test]
    fn serialise_error_response() {
        let error = ErrorResponse::method_not_found(RequestId::Number(1), "unknown/method");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains(r#""code":-32601"#));
        assert!(json.contains("unknown/method"));
    }

    #[test]
    fn parse_error_has_no_id() {
        let err = ErrorResponse::parse_error();
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains(r#""id""#));
    }
}
