use glam::Vec2;

use crate::api::error::CallError;
use crate::core::scene::Animatable;
use crate::core::value::{Color, Value};

/// Fat 2D node: a single struct with the properties games usually tween.
/// Designed for simplicity and rapid prototyping; custom types can
/// implement `Animatable` themselves.
#[derive(Debug, Clone)]
pub struct Entity {
    /// String tag for finding entities by name.
    pub tag: String,
    /// Position in world space.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Scale factor.
    pub scale: Vec2,
    /// Tint multiplied over the rendered sprite.
    pub modulate: Color,
    pub visible: bool,
    pub z_index: i64,
}

impl Entity {
    /// Create a new entity at the origin.
    pub fn new() -> Self {
        Self {
            tag: String::new(),
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            modulate: Color::WHITE,
            visible: true,
            z_index: 0,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_modulate(mut self, modulate: Color) -> Self {
        self.modulate = modulate;
        self
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl Animatable for Entity {
    fn get_property(&self, name: &str) -> Option<Value> {
        Some(match name {
            "position" => Value::Vec2(self.pos),
            "rotation" => Value::Float(self.rotation as f64),
            "scale" => Value::Vec2(self.scale),
            "modulate" => Value::Color(self.modulate),
            "visible" => Value::Bool(self.visible),
            "z_index" => Value::Int(self.z_index),
            _ => return None,
        })
    }

    fn set_property(&mut self, name: &str, value: Value) -> bool {
        match (name, value) {
            ("position", Value::Vec2(v)) => self.pos = v,
            ("rotation", Value::Float(f)) => self.rotation = f as f32,
            ("scale", Value::Vec2(v)) => self.scale = v,
            ("modulate", Value::Color(c)) => self.modulate = c,
            ("visible", Value::Bool(b)) => self.visible = b,
            ("z_index", Value::Int(i)) => self.z_index = i,
            _ => return false,
        }
        true
    }

    fn call(&mut self, method: &str, args: &[Value]) -> Result<Value, CallError> {
        match method {
            "show" | "hide" => {
                expect_args(args, 0)?;
                self.visible = method == "show";
            }
            "set_visible" => {
                expect_args(args, 1)?;
                self.visible = args[0].as_bool().ok_or(CallError::InvalidArgument {
                    index: 0,
                    expected: "bool",
                    found: args[0].type_name(),
                })?;
            }
            "translate" => {
                expect_args(args, 1)?;
                let offset = args[0].as_vec2().ok_or(CallError::InvalidArgument {
                    index: 0,
                    expected: "Vec2",
                    found: args[0].type_name(),
                })?;
                self.pos += offset;
            }
            _ => return Err(CallError::InvalidMethod(method.to_owned())),
        }
        Ok(Value::Bool(true))
    }
}

fn expect_args(args: &[Value], expected: usize) -> Result<(), CallError> {
    if args.len() != expected {
        return Err(CallError::InvalidArgumentCount {
            expected,
            given: args.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_roundtrip() {
        let mut e = Entity::new();
        assert!(e.set_property("rotation", Value::Float(1.5)));
        assert_eq!(e.get_property("rotation"), Some(Value::Float(1.5)));
        assert!(!e.set_property("rotation", Value::Bool(true)));
        assert!(!e.set_property("nope", Value::Float(0.0)));
    }

    #[test]
    fn methods_check_arity() {
        let mut e = Entity::new();
        assert!(e.call("hide", &[]).is_ok());
        assert!(!e.visible);
        assert_eq!(
            e.call("set_visible", &[]),
            Err(CallError::InvalidArgumentCount { expected: 1, given: 0 })
        );
        assert!(e.call("translate", &[Value::Vec2(Vec2::new(2.0, 0.0))]).is_ok());
        assert_eq!(e.pos, Vec2::new(2.0, 0.0));
        assert!(matches!(e.call("fly", &[]), Err(CallError::InvalidMethod(_))));
    }
}
