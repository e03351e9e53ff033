use crate::api::error::CallError;
use crate::api::types::ObjectId;
use crate::core::value::{PropertyPath, Value};

/// An object whose properties can be read, written and whose methods can
/// be invoked by name. This is the only view the tween engine has of the
/// things it animates.
pub trait Animatable {
    /// Current value of a top-level property, `None` if it does not exist.
    fn get_property(&self, name: &str) -> Option<Value>;

    /// Write a top-level property. Returns `false` if it does not exist or
    /// rejected the value.
    fn set_property(&mut self, name: &str, value: Value) -> bool;

    /// Invoke a method by name.
    fn call(&mut self, method: &str, _args: &[Value]) -> Result<Value, CallError> {
        Err(CallError::InvalidMethod(method.to_owned()))
    }

    /// Read a property, descending into its sub-components.
    fn get_indexed(&self, path: &PropertyPath) -> Option<Value> {
        let mut value = self.get_property(path.property())?;
        for name in path.subnames() {
            value = value.get_field(name)?;
        }
        Some(value)
    }

    /// Write a property, descending into its sub-components.
    fn set_indexed(&mut self, path: &PropertyPath, value: Value) -> bool {
        if path.subnames().is_empty() {
            return self.set_property(path.property(), value);
        }
        let Some(root) = self.get_property(path.property()) else {
            return false;
        };
        match set_nested(&root, path.subnames(), &value) {
            Some(updated) => self.set_property(path.property(), updated),
            None => false,
        }
    }
}

fn set_nested(current: &Value, names: &[String], value: &Value) -> Option<Value> {
    match names.split_first() {
        None => Some(*value),
        Some((head, rest)) => {
            let child = current.get_field(head)?;
            let child = set_nested(&child, rest, value)?;
            current.with_field(head, &child)
        }
    }
}

/// A scene slot: the object plus the lifecycle flags the tween engine
/// consults for bound tweens.
pub struct SceneObject {
    pub id: ObjectId,
    /// Whether the object is currently attached to the active tree.
    pub inside_tree: bool,
    /// Whether the object is allowed to process (not paused).
    pub can_process: bool,
    pub object: Box<dyn Animatable>,
}

impl SceneObject {
    pub fn new(id: ObjectId, object: impl Animatable + 'static) -> Self {
        Self {
            id,
            inside_tree: true,
            can_process: true,
            object: Box::new(object),
        }
    }

    pub fn detached(mut self) -> Self {
        self.inside_tree = false;
        self
    }

    pub fn with_can_process(mut self, can_process: bool) -> Self {
        self.can_process = can_process;
        self
    }
}

impl std::fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneObject")
            .field("id", &self.id)
            .field("inside_tree", &self.inside_tree)
            .field("can_process", &self.can_process)
            .finish()
    }
}

/// Simple object storage using a flat Vec.
/// Designed for small-to-medium object counts (hundreds, not millions).
#[derive(Debug)]
pub struct Scene {
    objects: Vec<SceneObject>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::with_capacity(256),
            next_id: 1,
        }
    }

    /// Create a scene with a specific object capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: Vec::with_capacity(capacity),
            next_id: 1,
        }
    }

    /// Generate the next unique object ID.
    pub fn next_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an object under a freshly generated ID.
    pub fn add(&mut self, object: impl Animatable + 'static) -> ObjectId {
        let id = self.next_id();
        self.spawn_with(SceneObject::new(id, object));
        id
    }

    /// Add an object under the given ID, replacing any previous occupant.
    pub fn spawn(&mut self, id: ObjectId, object: impl Animatable + 'static) {
        self.spawn_with(SceneObject::new(id, object));
    }

    pub fn spawn_with(&mut self, slot: SceneObject) {
        if slot.id.0 >= self.next_id {
            self.next_id = slot.id.0 + 1;
        }
        self.despawn(slot.id);
        self.objects.push(slot);
    }

    /// Remove an object by ID. Returns the removed slot if found.
    pub fn despawn(&mut self, id: ObjectId) -> Option<SceneObject> {
        let idx = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.swap_remove(idx))
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.iter().any(|o| o.id == id)
    }

    /// Get a reference to an object by ID.
    pub fn get(&self, id: ObjectId) -> Option<&dyn Animatable> {
        self.slot(id).map(|o| o.object.as_ref())
    }

    /// Get a mutable reference to an object by ID.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut (dyn Animatable + 'static)> {
        self.slot_mut(id).map(|o| o.object.as_mut())
    }

    pub fn slot(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn slot_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn set_inside_tree(&mut self, id: ObjectId, inside: bool) {
        if let Some(slot) = self.slot_mut(id) {
            slot.inside_tree = inside;
        }
    }

    pub fn set_can_process(&mut self, id: ObjectId, can_process: bool) {
        if let Some(slot) = self.slot_mut(id) {
            slot.can_process = can_process;
        }
    }

    /// `false` for unknown objects.
    pub fn is_inside_tree(&self, id: ObjectId) -> bool {
        self.slot(id).is_some_and(|o| o.inside_tree)
    }

    /// `false` for unknown objects.
    pub fn can_process(&self, id: ObjectId) -> bool {
        self.slot(id).is_some_and(|o| o.can_process)
    }

    /// Number of objects in the scene.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove all objects.
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;
    use glam::Vec2;

    #[test]
    fn add_and_get() {
        let mut scene = Scene::new();
        let id = scene.add(Entity::new().with_pos(Vec2::new(10.0, 20.0)));
        let e = scene.get(id).unwrap();
        assert_eq!(e.get_property("position"), Some(Value::Vec2(Vec2::new(10.0, 20.0))));
    }

    #[test]
    fn despawn_removes_object() {
        let mut scene = Scene::new();
        let id = scene.add(Entity::new());
        assert_eq!(scene.len(), 1);
        scene.despawn(id);
        assert_eq!(scene.len(), 0);
        assert!(scene.get(id).is_none());
    }

    #[test]
    fn spawn_reserves_explicit_ids() {
        let mut scene = Scene::new();
        scene.spawn(ObjectId(7), Entity::new());
        assert_eq!(scene.next_id(), ObjectId(8));
    }

    #[test]
    fn indexed_access() {
        let mut scene = Scene::new();
        let id = scene.add(Entity::new().with_pos(Vec2::new(1.0, 2.0)));
        let path = PropertyPath::parse("position:y").unwrap();
        let obj = scene.get_mut(id).unwrap();
        assert_eq!(obj.get_indexed(&path), Some(Value::Float(2.0)));
        assert!(obj.set_indexed(&path, Value::Float(5.0)));
        assert_eq!(obj.get_property("position"), Some(Value::Vec2(Vec2::new(1.0, 5.0))));

        let bad = PropertyPath::parse("position:q").unwrap();
        assert!(!obj.set_indexed(&bad, Value::Float(1.0)));
    }

    #[test]
    fn lifecycle_flags() {
        let mut scene = Scene::new();
        let id = scene.add(Entity::new());
        assert!(scene.is_inside_tree(id));
        scene.set_inside_tree(id, false);
        assert!(!scene.is_inside_tree(id));
        assert!(!scene.can_process(ObjectId(99)));
    }
}
