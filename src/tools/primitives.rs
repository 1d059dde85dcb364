//! Primitive geometry creation tools.
//!
//! Each creation operation performs exactly three bridge calls in order:
//! the create command, `draw <name>`, then `autoview`. The returned summary
//! embeds the raw response of the create command only. A bridge failure at
//! any step propagates unchanged; geometry already applied is not rolled
//! back.

use serde::Deserialize;

use crate::bridge::CommandBridge;
use crate::error::BridgeError;
use crate::geometry;

/// Parameters for `create_sphere`.
#[derive(Debug, Clone, Deserialize)]
pub struct SphereParams {
    /// Name of the sphere, e.g. `ball.s`.
    pub name: String,
    /// X coordinate of the center.
    pub x: f64,
    /// Y coordinate of the center.
    pub y: f64,
    /// Z coordinate of the center.
    pub z: f64,
    /// Radius of the sphere.
    pub radius: f64,
}

/// Parameters for `create_cylinder`.
#[derive(Debug, Clone, Deserialize)]
pub struct CylinderParams {
    /// Name of the cylinder, e.g. `tube.s`.
    pub name: String,
    /// X coordinate of the base center.
    pub base_x: f64,
    /// Y coordinate of the base center.
    pub base_y: f64,
    /// Z coordinate of the base center.
    pub base_z: f64,
    /// X component of the height vector.
    pub height_x: f64,
    /// Y component of the height vector.
    pub height_y: f64,
    /// Z component of the height vector.
    pub height_z: f64,
    /// Radius of the cylinder.
    pub radius: f64,
}

/// Parameters for `create_box`.
#[derive(Debug, Clone, Deserialize)]
pub struct BoxParams {
    /// Name of the box, e.g. `block.s`.
    pub name: String,
    /// Minimum X coordinate.
    pub x_min: f64,
    /// Minimum Y coordinate.
    pub y_min: f64,
    /// Minimum Z coordinate.
    pub z_min: f64,
    /// Maximum X coordinate.
    pub x_max: f64,
    /// Maximum Y coordinate.
    pub y_max: f64,
    /// Maximum Z coordinate.
    pub z_max: f64,
}

/// Creates a sphere, draws it, and refits the view.
///
/// # Errors
///
/// Propagates any [`BridgeError`] from the underlying exchanges.
pub async fn create_sphere(
    bridge: &dyn CommandBridge,
    params: &SphereParams,
) -> Result<String, BridgeError> {
    let cmd = geometry::format_sphere(&params.name, params.x, params.y, params.z, params.radius);
    let result = bridge.send_command(&cmd).await?;

    bridge
        .send_command(&geometry::format_draw(&params.name))
        .await?;
    bridge.send_command(geometry::autoview()).await?;

    Ok(format!(
        "Created sphere '{}' at ({}, {}, {}) with radius {}. Output: {result}",
        params.name, params.x, params.y, params.z, params.radius
    ))
}

/// Creates a right circular cylinder, draws it, and refits the view.
///
/// # Errors
///
/// Propagates any [`BridgeError`] from the underlying exchanges.
pub async fn create_cylinder(
    bridge: &dyn CommandBridge,
    params: &CylinderParams,
) -> Result<String, BridgeError> {
    let cmd = geometry::format_cylinder(
        &params.name,
        [params.base_x, params.base_y, params.base_z],
        [params.height_x, params.height_y, params.height_z],
        params.radius,
    );
    let result = bridge.send_command(&cmd).await?;

    bridge
        .send_command(&geometry::format_draw(&params.name))
        .await?;
    bridge.send_command(geometry::autoview()).await?;

    Ok(format!(
        "Created cylinder '{}'. Output: {result}",
        params.name
    ))
}

/// Creates an axis-aligned box, draws it, and refits the view.
///
/// # Errors
///
/// Propagates any [`BridgeError`] from the underlying exchanges.
pub async fn create_box(
    bridge: &dyn CommandBridge,
    params: &BoxParams,
) -> Result<String, BridgeError> {
    let cmd = geometry::format_box(
        &params.name,
        [params.x_min, params.y_min, params.z_min],
        [params.x_max, params.y_max, params.z_max],
    );
    let result = bridge.send_command(&cmd).await?;

    bridge
        .send_command(&geometry::format_draw(&params.name))
        .await?;
    bridge.send_command(geometry::autoview()).await?;

    Ok(format!(
        "Created box '{}' from ({}, {}, {}) to ({}, {}, {}). Output: {result}",
        params.name,
        params.x_min,
        params.y_min,
        params.z_min,
        params.x_max,
        params.y_max,
        params.z_max
    ))
}
