//! The tool surface: typed, self-describing CAD operations.
//!
//! Tools are held in an explicit [`ToolRegistry`] built once at startup and
//! handed to whichever layer hosts them (the MCP server for `serve`, the
//! chat agent for `chat`). The registry maps each operation name to its
//! parameter schema and handler.
//!
//! Every operation validates its inputs, renders MGED commands through
//! [`crate::geometry`], relays them through a [`CommandBridge`], and
//! composes a human-readable summary. That summary is what the LLM
//! ultimately shows the end user, so it embeds the key parameters and the
//! raw listener response.

mod boolean;
mod primitives;

pub use boolean::{boolean_combination, BooleanParams};
pub use primitives::{create_box, create_cylinder, create_sphere, BoxParams, CylinderParams, SphereParams};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::bridge::CommandBridge;
use crate::error::BridgeError;

/// A tool definition advertised to the hosting framework.
///
/// The schema field follows JSON Schema, with a natural-language
/// description per parameter for LLM argument elicitation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Outcome of a tool invocation that did not fail at the transport level.
///
/// Operator-validation failures are ordinary text results (`is_error` is
/// false) so the agent can relay them conversationally. Malformed argument
/// payloads set `is_error`.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// The text to relay to the caller.
    pub text: String,
    /// Whether this output represents a tool-level error.
    pub is_error: bool,
}

impl ToolOutput {
    /// Creates a normal text output.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// Creates an error output.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Handler selector for a registered tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolKind {
    CreateSphere,
    CreateCylinder,
    CreateBox,
    BooleanCombination,
}

struct ToolEntry {
    kind: ToolKind,
    definition: ToolDefinition,
}

/// The operation catalog: name → (schema, handler).
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
}

impl ToolRegistry {
    /// Builds the registry of built-in CAD tools.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                ToolEntry {
                    kind: ToolKind::CreateSphere,
                    definition: sphere_definition(),
                },
                ToolEntry {
                    kind: ToolKind::CreateCylinder,
                    definition: cylinder_definition(),
                },
                ToolEntry {
                    kind: ToolKind::CreateBox,
                    definition: box_definition(),
                },
                ToolEntry {
                    kind: ToolKind::BooleanCombination,
                    definition: boolean_definition(),
                },
            ],
        }
    }

    /// Returns the advertised tool definitions.
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.entries.iter().map(|e| &e.definition)
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invokes a tool by name.
    ///
    /// Unknown tools and malformed argument payloads yield error outputs
    /// without touching the bridge.
    ///
    /// # Errors
    ///
    /// Propagates [`BridgeError`] unchanged; no retry or compensation
    /// happens here. The hosting layer decides how to present it.
    pub async fn call(
        &self,
        name: &str,
        arguments: &Value,
        bridge: &dyn CommandBridge,
    ) -> Result<ToolOutput, BridgeError> {
        let Some(entry) = self.entries.iter().find(|e| e.definition.name == name) else {
            return Ok(ToolOutput::error(format!("Unknown tool: {name}")));
        };

        match entry.kind {
            ToolKind::CreateSphere => match parse_arguments::<SphereParams>(name, arguments) {
                Ok(params) => create_sphere(bridge, &params).await.map(ToolOutput::text),
                Err(output) => Ok(output),
            },
            ToolKind::CreateCylinder => match parse_arguments::<CylinderParams>(name, arguments) {
                Ok(params) => create_cylinder(bridge, &params).await.map(ToolOutput::text),
                Err(output) => Ok(output),
            },
            ToolKind::CreateBox => match parse_arguments::<BoxParams>(name, arguments) {
                Ok(params) => create_box(bridge, &params).await.map(ToolOutput::text),
                Err(output) => Ok(output),
            },
            ToolKind::BooleanCombination => match parse_arguments::<BooleanParams>(name, arguments)
            {
                Ok(params) => boolean_combination(bridge, &params)
                    .await
                    .map(ToolOutput::text),
                Err(output) => Ok(output),
            },
        }
    }
}

/// Deserialises a tool argument payload, mapping failures to an error output.
fn parse_arguments<T: DeserializeOwned>(name: &str, arguments: &Value) -> Result<T, ToolOutput> {
    serde_json::from_value(arguments.clone())
        .map_err(|e| ToolOutput::error(format!("Invalid arguments for {name}: {e}")))
}

fn sphere_definition() -> ToolDefinition {
    ToolDefinition {
        name: "create_sphere",
        description: "Creates a perfect mathematical sphere in BRL-CAD.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Name of the sphere, e.g., 'ball.s'"
                },
                "x": {
                    "type": "number",
                    "description": "X coordinate of the center"
                },
                "y": {
                    "type": "number",
                    "description": "Y coordinate of the center"
                },
                "z": {
                    "type": "number",
                    "description": "Z coordinate of the center"
                },
                "radius": {
                    "type": "number",
                    "description": "Radius of the sphere"
                }
            },
            "required": ["name", "x", "y", "z", "radius"]
        }),
    }
}

fn cylinder_definition() -> ToolDefinition {
    ToolDefinition {
        name: "create_cylinder",
        description: "Creates a right circular cylinder (RCC) in BRL-CAD. \
                      The height is a vector from the base center, not a scalar length.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Name of the cylinder, e.g., 'tube.s'"
                },
                "base_x": {
                    "type": "number",
                    "description": "X coordinate of the base center"
                },
                "base_y": {
                    "type": "number",
                    "description": "Y coordinate of the base center"
                },
                "base_z": {
                    "type": "number",
                    "description": "Z coordinate of the base center"
                },
                "height_x": {
                    "type": "number",
                    "description": "X component of the height vector"
                },
                "height_y": {
                    "type": "number",
                    "description": "Y component of the height vector"
                },
                "height_z": {
                    "type": "number",
                    "description": "Z component of the height vector"
                },
                "radius": {
                    "type": "number",
                    "description": "Radius of the cylinder"
                }
            },
            "required": ["name", "base_x", "base_y", "base_z", "height_x", "height_y", "height_z", "radius"]
        }),
    }
}

fn box_definition() -> ToolDefinition {
    ToolDefinition {
        name: "create_box",
        description: "Creates an axis-aligned rectangular parallelepiped (box) in BRL-CAD.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Name of the box, e.g., 'block.s'"
                },
                "x_min": {
                    "type": "number",
                    "description": "Minimum X coordinate"
                },
                "y_min": {
                    "type": "number",
                    "description": "Minimum Y coordinate"
                },
                "z_min": {
                    "type": "number",
                    "description": "Minimum Z coordinate"
                },
                "x_max": {
                    "type": "number",
                    "description": "Maximum X coordinate"
                },
                "y_max": {
                    "type": "number",
                    "description": "Maximum Y coordinate"
                },
                "z_max": {
                    "type": "number",
                    "description": "Maximum Z coordinate"
                }
            },
            "required": ["name", "x_min", "y_min", "z_min", "x_max", "y_max", "z_max"]
        }),
    }
}

fn boolean_definition() -> ToolDefinition {
    ToolDefinition {
        name: "boolean_combination",
        description: "Performs Constructive Solid Geometry (CSG) boolean math on two objects. \
                      Creates a region (not just a combination) so the result is visible in \
                      raytrace. When output_name equals base_object, the operation is appended \
                      to the existing region instead of nesting it, which avoids overlap issues \
                      in raytrace.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "output_name": {
                    "type": "string",
                    "description": "Name of the region for the result. To modify an existing \
                                    region (e.g., subtract another object from it), pass the \
                                    SAME name as base_object. To create a brand-new region, \
                                    use a new name ending in '.r'."
                },
                "base_object": {
                    "type": "string",
                    "description": "The main object to start with"
                },
                "operator": {
                    "type": "string",
                    "description": "Must be 'u' (union), '-' (subtract), or '+' (intersect)"
                },
                "target_object": {
                    "type": "string",
                    "description": "The object being added, subtracted, or intersected"
                }
            },
            "required": ["output_name", "base_object", "operator", "target_object"]
        }),
    }
}
