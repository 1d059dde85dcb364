//! CSG boolean combination tool.

use serde::Deserialize;

use crate::bridge::CommandBridge;
use crate::error::BridgeError;
use crate::geometry::{self, BooleanOperator};

/// Parameters for `boolean_combination`.
#[derive(Debug, Clone, Deserialize)]
pub struct BooleanParams {
    /// Name of the region for the result. Pass the same name as
    /// `base_object` to extend an existing region.
    pub output_name: String,
    /// The main object to start with.
    pub base_object: String,
    /// MGED operator symbol: `u`, `-`, or `+`.
    pub operator: String,
    /// The object being added, subtracted, or intersected.
    pub target_object: String,
}

/// Performs a boolean combination of two objects into a region.
///
/// The operator is validated before any bridge traffic; an invalid symbol
/// yields a normal textual result so the agent can relay it
/// conversationally. On success the sequence is: combine, erase the base
/// object (only when a new region was created), erase the target object,
/// erase the output region from the current view, draw the output, refit
/// the view. The individual pieces are hidden so only the combined region
/// remains visible.
///
/// # Errors
///
/// Propagates any [`BridgeError`] from the underlying exchanges.
pub async fn boolean_combination(
    bridge: &dyn CommandBridge,
    params: &BooleanParams,
) -> Result<String, BridgeError> {
    let Some(op) = BooleanOperator::from_symbol(&params.operator) else {
        return Ok(format!(
            "Error: operator must be one of 'u', '-', '+', got '{}'.",
            params.operator
        ));
    };

    let cmd = geometry::format_boolean(
        &params.output_name,
        &params.base_object,
        op,
        &params.target_object,
    );
    let result = bridge.send_command(&cmd).await?;

    // Hide the individual pieces and show only the region. When extending
    // an existing region the base object IS the output, so it gets no
    // separate erase.
    if params.output_name != params.base_object {
        bridge
            .send_command(&geometry::format_erase(&params.base_object))
            .await?;
    }
    bridge
        .send_command(&geometry::format_erase(&params.target_object))
        .await?;
    bridge
        .send_command(&geometry::format_erase(&params.output_name))
        .await?;
    bridge
        .send_command(&geometry::format_draw(&params.output_name))
        .await?;
    bridge.send_command(geometry::autoview()).await?;

    Ok(format!(
        "CSG result: {} = {} {op} {}. Output: {result}",
        params.output_name, params.base_object, params.target_object
    ))
}
