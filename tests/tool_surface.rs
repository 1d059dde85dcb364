//! Integration tests for the tool surface.
//!
//! A recording stub stands in for the TCP bridge so every test can assert
//! the exact command sequence an operation produces. The wire protocol is
//! one-directional: commands are formatted and sent, never parsed back, so
//! these tests compare literal command strings.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use brlcad_mcp::bridge::CommandBridge;
use brlcad_mcp::error::BridgeError;
use brlcad_mcp::tools::ToolRegistry;

/// Records every command and replays scripted responses in order.
///
/// Once the script is exhausted, further calls answer "ok". A call index
/// listed in `fail_at` produces a timeout error instead.
struct StubBridge {
    calls: Mutex<Vec<String>>,
    responses: Mutex<Vec<String>>,
    fail_at: Option<usize>,
}

impl StubBridge {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(Vec::new()),
            fail_at: None,
        }
    }

    fn scripted(responses: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.iter().rev().map(ToString::to_string).collect()),
            fail_at: None,
        }
    }

    fn failing_at(index: usize) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(Vec::new()),
            fail_at: Some(index),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandBridge for StubBridge {
    async fn send_command(&self, cmd: &str) -> Result<String, BridgeError> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(cmd.to_string());

        if self.fail_at == Some(index) {
            return Err(BridgeError::Timeout {
                host: "127.0.0.1".to_string(),
                port: 5555,
            });
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| "ok".to_string()))
    }
}

#[tokio::test]
async fn create_sphere_sends_create_draw_autoview() {
    let bridge = StubBridge::scripted(&["SUCCESS", "drawn", "viewed"]);
    let registry = ToolRegistry::builtin();

    let output = registry
        .call(
            "create_sphere",
            &json!({"name": "ball.s", "x": 0, "y": 0, "z": 0, "radius": 10}),
            &bridge,
        )
        .await
        .unwrap();

    assert_eq!(
        bridge.calls(),
        ["in ball.s sph 0 0 0 10", "draw ball.s", "autoview"]
    );

    // The summary embeds the create response only.
    assert!(!output.is_error);
    assert!(output.text.contains("ball.s"));
    assert!(output.text.contains("SUCCESS"));
    assert!(!output.text.contains("drawn"));
}

#[tokio::test]
async fn create_cylinder_command_shape() {
    let bridge = StubBridge::new();
    let registry = ToolRegistry::builtin();

    let output = registry
        .call(
            "create_cylinder",
            &json!({
                "name": "tube.s",
                "base_x": 0, "base_y": 0, "base_z": 0,
                "height_x": 0, "height_y": 0, "height_z": 25.5,
                "radius": 4
            }),
            &bridge,
        )
        .await
        .unwrap();

    assert_eq!(
        bridge.calls(),
        ["in tube.s rcc 0 0 0 0 0 25.5 4", "draw tube.s", "autoview"]
    );
    assert!(output.text.contains("tube.s"));
}

#[tokio::test]
async fn create_box_interleaves_min_max_per_axis() {
    let bridge = StubBridge::new();
    let registry = ToolRegistry::builtin();

    registry
        .call(
            "create_box",
            &json!({
                "name": "block.s",
                "x_min": -1, "y_min": -2, "z_min": -3,
                "x_max": 1, "y_max": 2, "z_max": 3
            }),
            &bridge,
        )
        .await
        .unwrap();

    assert_eq!(
        bridge.calls(),
        ["in block.s rpp -1 1 -2 2 -3 3", "draw block.s", "autoview"]
    );
}

#[tokio::test]
async fn boolean_invalid_operator_makes_no_bridge_calls() {
    let bridge = StubBridge::new();
    let registry = ToolRegistry::builtin();

    let output = registry
        .call(
            "boolean_combination",
            &json!({
                "output_name": "result.r",
                "base_object": "a.s",
                "operator": "x",
                "target_object": "b.s"
            }),
            &bridge,
        )
        .await
        .unwrap();

    // Validation failure is a normal textual result, not a tool error.
    assert!(!output.is_error);
    assert!(output.text.contains("Error"));
    assert!(output.text.contains('x'));
    assert!(bridge.calls().is_empty());
}

#[tokio::test]
async fn boolean_new_region_unions_base_then_cleans_up() {
    let bridge = StubBridge::scripted(&["REGION CREATED"]);
    let registry = ToolRegistry::builtin();

    let output = registry
        .call(
            "boolean_combination",
            &json!({
                "output_name": "result.r",
                "base_object": "a.s",
                "operator": "-",
                "target_object": "b.s"
            }),
            &bridge,
        )
        .await
        .unwrap();

    assert_eq!(
        bridge.calls(),
        [
            "r result.r u a.s - b.s",
            "erase a.s",
            "erase b.s",
            "erase result.r",
            "draw result.r",
            "autoview",
        ]
    );
    assert!(output.text.contains("result.r = a.s - b.s"));
    assert!(output.text.contains("REGION CREATED"));
}

#[tokio::test]
async fn boolean_append_mode_skips_base_erase() {
    let bridge = StubBridge::new();
    let registry = ToolRegistry::builtin();

    registry
        .call(
            "boolean_combination",
            &json!({
                "output_name": "result.r",
                "base_object": "result.r",
                "operator": "+",
                "target_object": "b.s"
            }),
            &bridge,
        )
        .await
        .unwrap();

    // Three-token operator clause, no embedded union of the base, and the
    // base object (which IS the output) is not separately erased.
    assert_eq!(
        bridge.calls(),
        [
            "r result.r + b.s",
            "erase b.s",
            "erase result.r",
            "draw result.r",
            "autoview",
        ]
    );
}

#[tokio::test]
async fn unknown_tool_is_error_without_bridge_traffic() {
    let bridge = StubBridge::new();
    let registry = ToolRegistry::builtin();

    let output = registry.call("extrude", &json!({}), &bridge).await.unwrap();
    assert!(output.is_error);
    assert!(output.text.contains("extrude"));
    assert!(bridge.calls().is_empty());
}

#[tokio::test]
async fn missing_arguments_are_rejected_before_io() {
    let bridge = StubBridge::new();
    let registry = ToolRegistry::builtin();

    let output = registry
        .call("create_sphere", &json!({"name": "ball.s"}), &bridge)
        .await
        .unwrap();

    assert!(output.is_error);
    assert!(output.text.contains("create_sphere"));
    assert!(bridge.calls().is_empty());
}

#[tokio::test]
async fn bridge_failure_propagates_unchanged() {
    // Fail on the draw step: the create command has already been applied
    // and is not rolled back.
    let bridge = StubBridge::failing_at(1);
    let registry = ToolRegistry::builtin();

    let err = registry
        .call(
            "create_sphere",
            &json!({"name": "ball.s", "x": 0, "y": 0, "z": 0, "radius": 10}),
            &bridge,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Timeout { .. }));
    assert_eq!(bridge.calls().len(), 2);
}
