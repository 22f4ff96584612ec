//! Total conversions between action value representations.
//!
//! Every function here is pure and never fails. Booleans read as `0`/`1`,
//! vectors collapse to their magnitude, and scalars widen into the first axis.

use glam::{Vec2, Vec3};

use crate::value::RawValue;

/// Magnitude above which a float or vector value counts as active.
pub const ACTIVITY_THRESHOLD: f32 = 0.1;

pub fn to_bool(value: &RawValue) -> bool {
    match *value {
        RawValue::Bool(b) => b,
        RawValue::Int(i) => i != 0,
        RawValue::Float(x) => x.abs() > ACTIVITY_THRESHOLD,
        RawValue::Vector2(v) => v.length() > ACTIVITY_THRESHOLD,
        RawValue::Vector3(v) => v.length() > ACTIVITY_THRESHOLD,
    }
}

pub fn to_float(value: &RawValue) -> f32 {
    match *value {
        RawValue::Bool(b) => {
            if b {
                1.0
            } else {
                0.0
            }
        }
        RawValue::Int(i) => i as f32,
        RawValue::Float(x) => x,
        RawValue::Vector2(v) => v.length(),
        RawValue::Vector3(v) => v.length(),
    }
}

/// Nearest integer, ties to even. NaN reads as `0`; out-of-range values saturate.
pub fn to_int(value: &RawValue) -> i32 {
    match *value {
        RawValue::Int(i) => i,
        RawValue::Bool(b) => i32::from(b),
        _ => to_float(value).round_ties_even() as i32,
    }
}

pub fn to_vec2(value: &RawValue) -> Vec2 {
    match *value {
        RawValue::Vector2(v) => v,
        RawValue::Vector3(v) => v.truncate(),
        _ => Vec2::new(to_float(value), 0.0),
    }
}

pub fn to_vec3(value: &RawValue) -> Vec3 {
    match *value {
        RawValue::Vector3(v) => v,
        RawValue::Vector2(v) => v.extend(0.0),
        _ => Vec3::new(to_float(value), 0.0, 0.0),
    }
}

/// Edge-detection predicate. Shares [`ACTIVITY_THRESHOLD`] with [`to_bool`].
pub fn is_active(value: &RawValue) -> bool {
    to_bool(value)
}
