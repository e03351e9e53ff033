// extensions/callable.rs
//
// Something a CallbackTweener or MethodTweener can invoke: either a Rust
// closure with scene access, or a named method on a scene object.

use crate::api::error::CallError;
use crate::api::types::ObjectId;
use crate::core::scene::Scene;
use crate::core::value::Value;

type CallbackFn = dyn FnMut(&mut Scene, &[Value]) -> Result<(), CallError>;

pub enum Callable {
    /// A closure receiving the scene and the call arguments.
    Func(Box<CallbackFn>),
    /// A method looked up by name on a scene object at call time.
    Method { target: ObjectId, method: String },
}

impl Callable {
    pub fn func<F>(f: F) -> Self
    where
        F: FnMut(&mut Scene, &[Value]) -> Result<(), CallError> + 'static,
    {
        Callable::Func(Box::new(f))
    }

    /// A closure that ignores its arguments and cannot fail.
    pub fn action<F>(mut f: F) -> Self
    where
        F: FnMut(&mut Scene) + 'static,
    {
        Callable::func(move |scene, _| {
            f(scene);
            Ok(())
        })
    }

    pub fn method(target: ObjectId, method: impl Into<String>) -> Self {
        Callable::Method {
            target,
            method: method.into(),
        }
    }

    pub fn call(&mut self, scene: &mut Scene, args: &[Value]) -> Result<(), CallError> {
        match self {
            Callable::Func(f) => f(scene, args),
            Callable::Method { target, method } => {
                let object = scene.get_mut(*target).ok_or(CallError::InstanceFreed(*target))?;
                object.call(method, args).map(|_| ())
            }
        }
    }
}

impl std::fmt::Debug for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Callable::Func(_) => write!(f, "Callable::Func(..)"),
            Callable::Method { target, method } => write!(f, "Callable::Method({}::{})", target, method),
        }
    }
}

impl std::fmt::Display for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Callable::Func(_) => write!(f, "<closure>"),
            Callable::Method { target, method } => write!(f, "{}::{}", target, method),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;

    #[test]
    fn method_on_freed_object_fails() {
        let mut scene = Scene::new();
        let id = scene.add(Entity::new());
        let mut hide = Callable::method(id, "hide");
        assert!(hide.call(&mut scene, &[]).is_ok());

        scene.despawn(id);
        assert_eq!(hide.call(&mut scene, &[]), Err(CallError::InstanceFreed(id)));
    }

    #[test]
    fn closure_sees_arguments() {
        let mut scene = Scene::new();
        let mut seen = Callable::func(|_, args| {
            if args.len() == 1 {
                Ok(())
            } else {
                Err(CallError::InvalidArgumentCount { expected: 1, given: args.len() })
            }
        });
        assert!(seen.call(&mut scene, &[Value::Float(1.0)]).is_ok());
        assert!(seen.call(&mut scene, &[]).is_err());
    }
}
