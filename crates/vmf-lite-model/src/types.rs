// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core value types for VMF property data
//!
//! This module defines the primitive geometric values a property can hold and
//! the closed [`TypedValue`] variant produced once per property during parsing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-component vector, written `[x y]` in VMF text
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.x, self.y)
    }
}

/// Three-component vector, written `(x y z)` in VMF text
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.x, self.y, self.z)
    }
}

/// Four-component vector (texture axis direction plus shift)
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vec4 {
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }
}

/// Plane through three points, written `(x y z) (x y z) (x y z)`
///
/// Only the points are stored. Their winding order decides which side of the
/// plane is inside; normals are derived by the geometry crate.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Plane {
    pub v1: Vec3,
    pub v2: Vec3,
    pub v3: Vec3,
}

impl Plane {
    pub const fn new(v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        Self { v1, v2, v3 }
    }

    /// The three defining points
    pub fn points(&self) -> [Vec3; 3] {
        [self.v1, self.v2, self.v3]
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.v1, self.v2, self.v3)
    }
}

/// One texture projection axis, written `[x y z shift] scale`
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct UvAxis {
    /// Axis direction (x, y, z) and texture shift (w)
    pub axis: Vec4,
    /// Texture scale along the axis
    pub scale: f64,
}

impl UvAxis {
    pub const fn new(axis: Vec4, scale: f64) -> Self {
        Self { axis, scale }
    }
}

impl fmt::Display for UvAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {} {} {}] {}",
            self.axis.x, self.axis.y, self.axis.z, self.axis.w, self.scale
        )
    }
}

/// Typed property value
///
/// Inferred once from the raw text when a property line is parsed and never
/// re-inferred afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TypedValue {
    /// Anything that is not recognized as a number or vector
    String(String),
    /// Whole number (`"16"`)
    Integer(i32),
    /// Number with a fractional part (`"0.25"`)
    Float(f64),
    /// `[x y]`
    Vector2(Vec2),
    /// `(x y z)` or `[x y z]`
    Vector3(Vec3),
    /// `(x y z) (x y z) (x y z)`
    Plane(Plane),
    /// `[x y z shift] scale`
    Uv(UvAxis),
}

impl TypedValue {
    /// Name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            TypedValue::String(_) => "string",
            TypedValue::Integer(_) => "integer",
            TypedValue::Float(_) => "float",
            TypedValue::Vector2(_) => "vector2",
            TypedValue::Vector3(_) => "vector3",
            TypedValue::Plane(_) => "plane",
            TypedValue::Uv(_) => "uv",
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            TypedValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as float (integers widen)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            TypedValue::Float(f) => Some(*f),
            TypedValue::Integer(i) => Some(f64::from(*i)),
            _ => None,
        }
    }

    /// Try to get as 2-component vector
    pub fn as_vector2(&self) -> Option<Vec2> {
        match self {
            TypedValue::Vector2(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as 3-component vector
    pub fn as_vector3(&self) -> Option<Vec3> {
        match self {
            TypedValue::Vector3(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as plane
    pub fn as_plane(&self) -> Option<&Plane> {
        match self {
            TypedValue::Plane(p) => Some(p),
            _ => None,
        }
    }

    /// Try to get as texture axis
    pub fn as_uv(&self) -> Option<&UvAxis> {
        match self {
            TypedValue::Uv(uv) => Some(uv),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::String(s) => f.write_str(s),
            TypedValue::Integer(i) => write!(f, "{}", i),
            // Keep a fractional part so the text reads back as a float
            TypedValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            TypedValue::Float(v) => write!(f, "{}", v),
            TypedValue::Vector2(v) => write!(f, "{}", v),
            TypedValue::Vector3(v) => write!(f, "{}", v),
            TypedValue::Plane(p) => write!(f, "{}", p),
            TypedValue::Uv(uv) => write!(f, "{}", uv),
        }
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::String(s)
    }
}

impl From<i32> for TypedValue {
    fn from(i: i32) -> Self {
        TypedValue::Integer(i)
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        TypedValue::Float(v)
    }
}

impl From<Vec3> for TypedValue {
    fn from(v: Vec3) -> Self {
        TypedValue::Vector3(v)
    }
}

impl From<Plane> for TypedValue {
    fn from(p: Plane) -> Self {
        TypedValue::Plane(p)
    }
}
