// core/value.rs
//
// Animatable value variant and the per-type arithmetic the tween engine
// needs: add, subtract, lerp and field indexing.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::api::error::TweenError;

/// Linear RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }

    fn from_vec4(v: Vec4) -> Self {
        Self::rgba(v.x, v.y, v.z, v.w)
    }
}

/// Discriminant of a `Value`, used for type checks and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Color,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Vec2 => "Vec2",
            ValueKind::Vec3 => "Vec3",
            ValueKind::Vec4 => "Vec4",
            ValueKind::Color => "Color",
        }
    }
}

/// A dynamically typed value that a tween can read, interpolate and write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Color(Color),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Vec4(_) => ValueKind::Vec4,
            Value::Color(_) => ValueKind::Color,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Scalar view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(i as f64),
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match *self {
            Value::Vec2(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match *self {
            Value::Color(c) => Some(c),
            _ => None,
        }
    }

    /// Cast between `Int` and `Float` so that `to` matches `kind`.
    /// Any other combination of differing kinds is a type mismatch.
    pub fn coerce_to(self, kind: ValueKind, context: &'static str) -> Result<Value, TweenError> {
        if self.kind() == kind {
            return Ok(self);
        }
        match (self, kind) {
            (Value::Int(i), ValueKind::Float) => Ok(Value::Float(i as f64)),
            (Value::Float(f), ValueKind::Int) => Ok(Value::Int(f as i64)),
            _ => Err(TweenError::TypeMismatch {
                context,
                expected: kind.name(),
                found: self.type_name(),
            }),
        }
    }

    /// Type-specific addition. Mismatched kinds return `self` unchanged.
    pub fn add(&self, other: &Value) -> Value {
        match (*self, *other) {
            (Value::Bool(a), b) => match b.as_f64() {
                Some(d) => Value::Bool(bool_to_f64(a) + d >= 0.5),
                None => *self,
            },
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_add(b)),
            (Value::Int(a), Value::Float(b)) => Value::Int((a as f64 + b).round() as i64),
            (Value::Float(a), Value::Float(b)) => Value::Float(a + b),
            (Value::Float(a), Value::Int(b)) => Value::Float(a + b as f64),
            (Value::Vec2(a), Value::Vec2(b)) => Value::Vec2(a + b),
            (Value::Vec3(a), Value::Vec3(b)) => Value::Vec3(a + b),
            (Value::Vec4(a), Value::Vec4(b)) => Value::Vec4(a + b),
            (Value::Color(a), Value::Color(b)) => Value::Color(Color::from_vec4(a.to_vec4() + b.to_vec4())),
            _ => *self,
        }
    }

    /// Type-specific subtraction (`self - other`).
    ///
    /// Booleans subtract as 0/1 and yield a `Float` delta.
    pub fn subtract(&self, other: &Value) -> Value {
        match (*self, *other) {
            (Value::Bool(a), Value::Bool(b)) => Value::Float(bool_to_f64(a) - bool_to_f64(b)),
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_sub(b)),
            (Value::Float(a), Value::Float(b)) => Value::Float(a - b),
            (Value::Float(a), Value::Int(b)) => Value::Float(a - b as f64),
            (Value::Int(a), Value::Float(b)) => Value::Float(a as f64 - b),
            (Value::Vec2(a), Value::Vec2(b)) => Value::Vec2(a - b),
            (Value::Vec3(a), Value::Vec3(b)) => Value::Vec3(a - b),
            (Value::Vec4(a), Value::Vec4(b)) => Value::Vec4(a - b),
            (Value::Color(a), Value::Color(b)) => Value::Color(Color::from_vec4(a.to_vec4() - b.to_vec4())),
            _ => *self,
        }
    }

    /// Interpolate between `a` and `b` at fraction `t` (not clamped).
    pub fn interpolate(a: &Value, b: &Value, t: f64) -> Value {
        let tf = t as f32;
        match (*a, *b) {
            (Value::Bool(x), Value::Bool(y)) => Value::Bool(if t >= 0.5 { y } else { x }),
            (Value::Int(x), Value::Int(y)) => {
                Value::Int((x as f64 + (y as f64 - x as f64) * t + 0.5).floor() as i64)
            }
            (Value::Float(x), Value::Float(y)) => Value::Float(x + (y - x) * t),
            (Value::Vec2(x), Value::Vec2(y)) => Value::Vec2(x.lerp(y, tf)),
            (Value::Vec3(x), Value::Vec3(y)) => Value::Vec3(x.lerp(y, tf)),
            (Value::Vec4(x), Value::Vec4(y)) => Value::Vec4(x.lerp(y, tf)),
            (Value::Color(x), Value::Color(y)) => Value::Color(Color::from_vec4(x.to_vec4().lerp(y.to_vec4(), tf))),
            _ => *a,
        }
    }

    /// Read a named component (`x`, `y`, `z`, `w` or `r`, `g`, `b`, `a`).
    pub fn get_field(&self, field: &str) -> Option<Value> {
        let f = match (self, field) {
            (Value::Vec2(v), "x") => v.x,
            (Value::Vec2(v), "y") => v.y,
            (Value::Vec3(v), "x") => v.x,
            (Value::Vec3(v), "y") => v.y,
            (Value::Vec3(v), "z") => v.z,
            (Value::Vec4(v), "x") => v.x,
            (Value::Vec4(v), "y") => v.y,
            (Value::Vec4(v), "z") => v.z,
            (Value::Vec4(v), "w") => v.w,
            (Value::Color(c), "r") => c.r,
            (Value::Color(c), "g") => c.g,
            (Value::Color(c), "b") => c.b,
            (Value::Color(c), "a") => c.a,
            _ => return None,
        };
        Some(Value::Float(f as f64))
    }

    /// Return a copy with a named component replaced by a scalar value.
    pub fn with_field(&self, field: &str, value: &Value) -> Option<Value> {
        let f = value.as_f64()? as f32;
        let mut out = *self;
        match (&mut out, field) {
            (Value::Vec2(v), "x") => v.x = f,
            (Value::Vec2(v), "y") => v.y = f,
            (Value::Vec3(v), "x") => v.x = f,
            (Value::Vec3(v), "y") => v.y = f,
            (Value::Vec3(v), "z") => v.z = f,
            (Value::Vec4(v), "x") => v.x = f,
            (Value::Vec4(v), "y") => v.y = f,
            (Value::Vec4(v), "z") => v.z = f,
            (Value::Vec4(v), "w") => v.w = f,
            (Value::Color(c), "r") => c.r = f,
            (Value::Color(c), "g") => c.g = f,
            (Value::Color(c), "b") => c.b = f,
            (Value::Color(c), "a") => c.a = f,
            _ => return None,
        }
        Some(out)
    }
}

#[inline]
fn bool_to_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Value::Vec2(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Value::Vec3(v)
    }
}

impl From<Vec4> for Value {
    fn from(v: Vec4) -> Self {
        Value::Vec4(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Value::Color(v)
    }
}

/// A property reference such as `"position"` or `"position:x"`.
///
/// The first segment names the property on the object, the remaining
/// segments index into the property's value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    names: Vec<String>,
}

impl PropertyPath {
    pub fn parse(path: &str) -> Result<Self, TweenError> {
        let names: Vec<String> = path.split(':').map(str::to_owned).collect();
        if names.iter().any(|n| n.is_empty()) {
            return Err(TweenError::InvalidPath(path.to_owned()));
        }
        Ok(Self { names })
    }

    /// Name of the property on the target object.
    pub fn property(&self) -> &str {
        &self.names[0]
    }

    /// Sub-component names below the property.
    pub fn subnames(&self) -> &[String] {
        &self.names[1..]
    }
}

impl std::fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names.join(":"))
    }
}
