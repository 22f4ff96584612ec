use std::fmt;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::coerce;

/// The declared kind of value an action produces.
///
/// `Unknown` means the kind is taken from the first value delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Vector2,
    Vector3,
    #[default]
    Unknown,
}

impl ValueKind {
    /// Map a device-layer control type name onto a value kind.
    ///
    /// Unrecognised names map to [`ValueKind::Unknown`].
    pub fn from_control_type(control_type: &str) -> Self {
        match control_type {
            "Button" | "Digital" => Self::Bool,
            "Axis" | "Analog" => Self::Float,
            "Integer" => Self::Int,
            "Vector2" => Self::Vector2,
            "Vector3" => Self::Vector3,
            _ => Self::Unknown,
        }
    }

    /// The rest value for this kind. `Unknown` rests as `Bool(false)`.
    pub fn zero_value(self) -> RawValue {
        match self {
            Self::Bool | Self::Unknown => RawValue::Bool(false),
            Self::Int => RawValue::Int(0),
            Self::Float => RawValue::Float(0.0),
            Self::Vector2 => RawValue::Vector2(Vec2::ZERO),
            Self::Vector3 => RawValue::Vector3(Vec3::ZERO),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Vector2 => "Vector2",
            Self::Vector3 => "Vector3",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// An action value as delivered by the source, before coercion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vector2(Vec2),
    Vector3(Vec3),
}

impl RawValue {
    /// The kind tag of this value. Never `Unknown`.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Vector2(_) => ValueKind::Vector2,
            Self::Vector3(_) => ValueKind::Vector3,
        }
    }

    pub fn as_bool(&self) -> bool {
        coerce::to_bool(self)
    }

    pub fn as_int(&self) -> i32 {
        coerce::to_int(self)
    }

    pub fn as_float(&self) -> f32 {
        coerce::to_float(self)
    }

    pub fn as_vec2(&self) -> Vec2 {
        coerce::to_vec2(self)
    }

    pub fn as_vec3(&self) -> Vec3 {
        coerce::to_vec3(self)
    }

    /// Whether this value counts as pressed/non-zero for edge detection.
    pub fn is_active(&self) -> bool {
        coerce::is_active(self)
    }
}

impl Default for RawValue {
    fn default() -> Self {
        ValueKind::Unknown.zero_value()
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for RawValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<Vec2> for RawValue {
    fn from(v: Vec2) -> Self {
        Self::Vector2(v)
    }
}

impl From<Vec3> for RawValue {
    fn from(v: Vec3) -> Self {
        Self::Vector3(v)
    }
}

/// Human-readable form with two decimals for floating components.
impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:.2}"),
            Self::Vector2(v) => write!(f, "({:.2}, {:.2})", v.x, v.y),
            Self::Vector3(v) => write!(f, "({:.2}, {:.2}, {:.2})", v.x, v.y, v.z),
        }
    }
}
