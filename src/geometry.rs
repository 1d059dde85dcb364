//! MGED command formatting.
//!
//! Pure, deterministic mapping from typed parameters to single-line MGED
//! commands. Numeric values pass through `Display` formatting verbatim; no
//! rounding or unit conversion happens here, and nothing in this module
//! performs I/O.
//!
//! The protocol is one-directional: commands are formatted and sent, and the
//! response is opaque text. There is deliberately no parser for the command
//! vocabulary.

use std::fmt;

/// CSG boolean operator, restricted to the three MGED symbols.
///
/// Invalid operators are rejected before any command is formatted, so the
/// socket bridge is never invoked with an unvalidated operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperator {
    /// `u` — union.
    Union,
    /// `-` — subtraction.
    Subtract,
    /// `+` — intersection.
    Intersect,
}

impl BooleanOperator {
    /// Parses an MGED operator symbol.
    ///
    /// Returns `None` for anything other than `u`, `-`, or `+`.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "u" => Some(Self::Union),
            "-" => Some(Self::Subtract),
            "+" => Some(Self::Intersect),
            _ => None,
        }
    }

    /// Returns the MGED symbol for this operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Union => "u",
            Self::Subtract => "-",
            Self::Intersect => "+",
        }
    }
}

impl fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Formats a `create sphere` command: `in <name> sph <x> <y> <z> <radius>`.
#[must_use]
pub fn format_sphere(name: &str, x: f64, y: f64, z: f64, radius: f64) -> String {
    format!("in {name} sph {x} {y} {z} {radius}")
}

/// Formats a right circular cylinder command:
/// `in <name> rcc <bx> <by> <bz> <hx> <hy> <hz> <radius>`.
///
/// The height is a vector from the base point, not a scalar length.
#[must_use]
pub fn format_cylinder(name: &str, base: [f64; 3], height: [f64; 3], radius: f64) -> String {
    format!(
        "in {name} rcc {} {} {} {} {} {} {radius}",
        base[0], base[1], base[2], height[0], height[1], height[2]
    )
}

/// Formats an axis-aligned box command:
/// `in <name> rpp <xmin> <xmax> <ymin> <ymax> <zmin> <zmax>`.
///
/// Note the axis-interleaved field order: MGED wants min/max per axis, not
/// the min corner followed by the max corner.
#[must_use]
pub fn format_box(name: &str, min: [f64; 3], max: [f64; 3]) -> String {
    format!(
        "in {name} rpp {} {} {} {} {} {}",
        min[0], max[0], min[1], max[1], min[2], max[2]
    )
}

/// Formats a region boolean command.
///
/// When `output == base`, the operation is appended to the existing region:
/// `r <output> <op> <target>`. Re-deriving the region from scratch would
/// union in geometry already present and produce overlap artifacts in
/// raytrace. Otherwise a new region is created, unioning in the base first:
/// `r <output> u <base> <op> <target>`.
#[must_use]
pub fn format_boolean(output: &str, base: &str, op: BooleanOperator, target: &str) -> String {
    if output == base {
        format!("r {output} {op} {target}")
    } else {
        format!("r {output} u {base} {op} {target}")
    }
}

/// Formats a `draw <name>` command.
#[must_use]
pub fn format_draw(name: &str) -> String {
    format!("draw {name}")
}

/// Formats an `erase <name>` command.
#[must_use]
pub fn format_erase(name: &str) -> String {
    format!("erase {name}")
}

/// The `autoview` command: fit the view to all drawn objects.
#[must_use]
pub const fn autoview() -> &'static str {
    "autoview"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_command_verbatim() {
        let cmd = format_sphere("ball.s", 0.0, 0.0, 0.0, 10.0);
        assert_eq!(cmd, "in ball.s sph 0 0 0 10");
    }

    #[test]
    fn sphere_command_fractional_values() {
        let cmd = format_sphere("ball.s", 1.5, -2.25, 0.125, 3.75);
        assert_eq!(cmd, "in ball.s sph 1.5 -2.25 0.125 3.75");
    }

    #[test]
    fn cylinder_command_field_order() {
        let cmd = format_cylinder("tube.s", [0.0, 0.0, 0.0], [0.0, 0.0, 20.0], 5.0);
        assert_eq!(cmd, "in tube.s rcc 0 0 0 0 0 20 5");
    }

    #[test]
    fn box_command_interleaves_axes() {
        // min/max are interleaved per axis, not grouped by corner.
        let cmd = format_box("block.s", [-1.0, -2.0, -3.0], [1.0, 2.0, 3.0]);
        assert_eq!(cmd, "in block.s rpp -1 1 -2 2 -3 3");
    }

    #[test]
    fn boolean_new_region_unions_base() {
        let cmd = format_boolean("out.r", "a.s", BooleanOperator::Subtract, "b.s");
        assert_eq!(cmd, "r out.r u a.s - b.s");
    }

    #[test]
    fn boolean_append_to_existing_region() {
        let cmd = format_boolean("out.r", "out.r", BooleanOperator::Subtract, "b.s");
        assert_eq!(cmd, "r out.r - b.s");
    }

    #[test]
    fn operator_symbols() {
        assert_eq!(BooleanOperator::from_symbol("u"), Some(BooleanOperator::Union));
        assert_eq!(BooleanOperator::from_symbol("-"), Some(BooleanOperator::Subtract));
        assert_eq!(BooleanOperator::from_symbol("+"), Some(BooleanOperator::Intersect));
        assert_eq!(BooleanOperator::from_symbol("x"), None);
        assert_eq!(BooleanOperator::from_symbol("union"), None);
        assert_eq!(BooleanOperator::from_symbol(""), None);
    }

    #[test]
    fn draw_erase_autoview() {
        assert_eq!(format_draw("ball.s"), "draw ball.s");
        assert_eq!(format_erase("ball.s"), "erase ball.s");
        assert_eq!(autoview(), "autoview");
    }
}
