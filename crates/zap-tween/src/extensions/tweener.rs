// extensions/tweener.rs
//
// The four kinds of animation step a Tween sequences. Each one consumes a
// slice of the tick's delta budget and reports how much it left over.

use crate::api::types::ObjectId;
use crate::core::scene::Scene;
use crate::core::value::{PropertyPath, Value};
use super::callable::Callable;
use super::easing::{interpolate_value, EaseType, TransitionType};

/// Outcome of advancing a tweener by one delta budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// `true` once the tweener no longer needs time.
    pub finished: bool,
    /// Unconsumed part of the budget. Always 0 while running.
    pub leftover: f64,
    /// `true` only on the call where the tweener ran to completion.
    pub completed: bool,
}

impl StepResult {
    pub fn running() -> Self {
        Self {
            finished: false,
            leftover: 0.0,
            completed: false,
        }
    }

    pub fn completed(leftover: f64) -> Self {
        Self {
            finished: true,
            leftover,
            completed: true,
        }
    }

    /// Finished earlier (or aborted): nothing consumed, no notification.
    pub fn inactive(delta: f64) -> Self {
        Self {
            finished: true,
            leftover: delta,
            completed: false,
        }
    }
}

/// A single unit of animation inside a tween step.
#[derive(Debug)]
pub enum Tweener {
    Property(PropertyTweener),
    Interval(IntervalTweener),
    Callback(CallbackTweener),
    Method(MethodTweener),
}

impl Tweener {
    /// Reset elapsed time and resolve start values. Called whenever the
    /// tweener's step becomes current, including on every loop.
    pub fn start(&mut self, scene: &Scene) {
        match self {
            Tweener::Property(t) => t.start(scene),
            Tweener::Interval(t) => t.start(),
            Tweener::Callback(t) => t.start(),
            Tweener::Method(t) => t.start(),
        }
    }

    pub fn step(&mut self, delta: f64, scene: &mut Scene) -> StepResult {
        match self {
            Tweener::Property(t) => t.step(delta, scene),
            Tweener::Interval(t) => t.step(delta),
            Tweener::Callback(t) => t.step(delta, scene),
            Tweener::Method(t) => t.step(delta, scene),
        }
    }

    /// Fill in the owning tween's curve for tweeners that did not pick one.
    pub(crate) fn adopt_defaults(&mut self, trans: TransitionType, ease: EaseType) {
        match self {
            Tweener::Property(t) => {
                t.trans.get_or_insert(trans);
                t.ease.get_or_insert(ease);
            }
            Tweener::Method(t) => {
                t.trans.get_or_insert(trans);
                t.ease.get_or_insert(ease);
            }
            Tweener::Interval(_) | Tweener::Callback(_) => {}
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            Tweener::Property(t) => t.finished,
            Tweener::Interval(t) => t.finished,
            Tweener::Callback(t) => t.finished,
            Tweener::Method(t) => t.finished,
        }
    }

    pub fn elapsed_time(&self) -> f64 {
        match self {
            Tweener::Property(t) => t.elapsed_time,
            Tweener::Interval(t) => t.elapsed_time,
            Tweener::Callback(t) => t.elapsed_time,
            Tweener::Method(t) => t.elapsed_time,
        }
    }
}

/// Animates a property on a scene object.
#[derive(Debug)]
pub struct PropertyTweener {
    target: ObjectId,
    property: PropertyPath,
    initial_value: Value,
    base_final_value: Value,
    final_value: Value,
    delta_value: Value,
    duration: f64,
    delay: f64,
    elapsed_time: f64,
    finished: bool,
    relative: bool,
    /// Re-read the target's current value on every start.
    continue_from_current: bool,
    trans: Option<TransitionType>,
    ease: Option<EaseType>,
}

impl PropertyTweener {
    /// `current` is the property's value at creation time; `to` must
    /// already match its type.
    pub(crate) fn new(target: ObjectId, property: PropertyPath, current: Value, to: Value, duration: f64) -> Self {
        Self {
            target,
            property,
            initial_value: current,
            base_final_value: to,
            final_value: to,
            delta_value: to.subtract(&current),
            duration,
            delay: 0.0,
            elapsed_time: 0.0,
            finished: false,
            relative: false,
            continue_from_current: true,
            trans: None,
            ease: None,
        }
    }

    /// Start from a fixed value instead of the property's current one.
    pub fn from(&mut self, value: impl Into<Value>) -> &mut Self {
        match value.into().coerce_to(self.base_final_value.kind(), "start and final value") {
            Ok(value) => {
                self.initial_value = value;
                self.continue_from_current = false;
            }
            Err(e) => log::warn!("Ignoring start value for '{}': {}", self.property, e),
        }
        self
    }

    /// Start from the value the property had when the tweener was created.
    pub fn from_current(&mut self) -> &mut Self {
        self.continue_from_current = false;
        self
    }

    /// Treat the final value as an offset from the start value.
    pub fn as_relative(&mut self) -> &mut Self {
        self.relative = true;
        self
    }

    pub fn set_trans(&mut self, trans: TransitionType) -> &mut Self {
        self.trans = Some(trans);
        self
    }

    pub fn set_ease(&mut self, ease: EaseType) -> &mut Self {
        self.ease = Some(ease);
        self
    }

    pub fn set_delay(&mut self, delay: f64) -> &mut Self {
        self.delay = delay;
        self
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    pub fn property(&self) -> &PropertyPath {
        &self.property
    }

    pub fn final_value(&self) -> Value {
        self.final_value
    }

    fn start(&mut self, scene: &Scene) {
        self.elapsed_time = 0.0;
        self.finished = false;

        let Some(object) = scene.get(self.target) else {
            log::warn!("Target {} freed before starting, aborting tweener on '{}'.", self.target, self.property);
            self.finished = true;
            return;
        };

        if self.continue_from_current {
            if let Some(current) = object.get_indexed(&self.property) {
                self.initial_value = current;
            }
        }

        if self.relative {
            self.final_value = self.initial_value.add(&self.base_final_value);
        }

        self.delta_value = self.final_value.subtract(&self.initial_value);
    }

    fn step(&mut self, delta: f64, scene: &mut Scene) -> StepResult {
        if self.finished {
            // A parallel sibling with a longer duration keeps the step alive.
            return StepResult::inactive(delta);
        }

        let Some(object) = scene.get_mut(self.target) else {
            log::warn!("Target {} freed while tweening '{}', aborting tweener.", self.target, self.property);
            self.finished = true;
            return StepResult::inactive(delta);
        };

        self.elapsed_time += delta;
        if self.elapsed_time < self.delay {
            return StepResult::running();
        }

        let time = (self.elapsed_time - self.delay).min(self.duration);
        if time < self.duration {
            let value = interpolate_value(
                &self.initial_value,
                &self.delta_value,
                time,
                self.duration,
                self.trans.unwrap_or_default(),
                self.ease.unwrap_or_default(),
            );
            if !object.set_indexed(&self.property, value) {
                log::warn!("Couldn't write '{}' on {}.", self.property, self.target);
            }
            StepResult::running()
        } else {
            if !object.set_indexed(&self.property, self.final_value) {
                log::warn!("Couldn't write final value of '{}' on {}.", self.property, self.target);
            }
            self.finished = true;
            StepResult::completed(self.elapsed_time - self.delay - self.duration)
        }
    }
}

/// A pure wait.
#[derive(Debug)]
pub struct IntervalTweener {
    duration: f64,
    elapsed_time: f64,
    finished: bool,
}

impl IntervalTweener {
    pub(crate) fn new(duration: f64) -> Self {
        Self {
            duration,
            elapsed_time: 0.0,
            finished: false,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    fn start(&mut self) {
        self.elapsed_time = 0.0;
        self.finished = false;
    }

    fn step(&mut self, delta: f64) -> StepResult {
        if self.finished {
            return StepResult::inactive(delta);
        }

        self.elapsed_time += delta;
        if self.elapsed_time < self.duration {
            StepResult::running()
        } else {
            self.finished = true;
            StepResult::completed(self.elapsed_time - self.duration)
        }
    }
}

/// Invokes a callable once after its delay.
#[derive(Debug)]
pub struct CallbackTweener {
    callback: Callable,
    delay: f64,
    elapsed_time: f64,
    finished: bool,
}

impl CallbackTweener {
    pub(crate) fn new(callback: Callable) -> Self {
        Self {
            callback,
            delay: 0.0,
            elapsed_time: 0.0,
            finished: false,
        }
    }

    pub fn set_delay(&mut self, delay: f64) -> &mut Self {
        self.delay = delay;
        self
    }

    fn start(&mut self) {
        self.elapsed_time = 0.0;
        self.finished = false;
    }

    fn step(&mut self, delta: f64, scene: &mut Scene) -> StepResult {
        if self.finished {
            return StepResult::inactive(delta);
        }

        self.elapsed_time += delta;
        if self.elapsed_time < self.delay {
            return StepResult::running();
        }

        self.finished = true;
        if let Err(e) = self.callback.call(scene, &[]) {
            log::error!("Error calling {} from CallbackTweener: {}", self.callback, e);
            return StepResult::inactive(delta);
        }
        StepResult::completed(self.elapsed_time - self.delay)
    }
}

/// Feeds an interpolated value to a callable on every step.
#[derive(Debug)]
pub struct MethodTweener {
    callback: Callable,
    initial_value: Value,
    final_value: Value,
    delta_value: Value,
    duration: f64,
    delay: f64,
    elapsed_time: f64,
    finished: bool,
    trans: Option<TransitionType>,
    ease: Option<EaseType>,
}

impl MethodTweener {
    /// `to` must already match the type of `from`.
    pub(crate) fn new(callback: Callable, from: Value, to: Value, duration: f64) -> Self {
        Self {
            callback,
            initial_value: from,
            final_value: to,
            delta_value: to.subtract(&from),
            duration,
            delay: 0.0,
            elapsed_time: 0.0,
            finished: false,
            trans: None,
            ease: None,
        }
    }

    pub fn set_delay(&mut self, delay: f64) -> &mut Self {
        self.delay = delay;
        self
    }

    pub fn set_trans(&mut self, trans: TransitionType) -> &mut Self {
        self.trans = Some(trans);
        self
    }

    pub fn set_ease(&mut self, ease: EaseType) -> &mut Self {
        self.ease = Some(ease);
        self
    }

    fn start(&mut self) {
        self.elapsed_time = 0.0;
        self.finished = false;
    }

    fn step(&mut self, delta: f64, scene: &mut Scene) -> StepResult {
        if self.finished {
            return StepResult::inactive(delta);
        }

        self.elapsed_time += delta;
        if self.elapsed_time < self.delay {
            return StepResult::running();
        }

        let time = (self.elapsed_time - self.delay).min(self.duration);
        let current = if time < self.duration {
            interpolate_value(
                &self.initial_value,
                &self.delta_value,
                time,
                self.duration,
                self.trans.unwrap_or_default(),
                self.ease.unwrap_or_default(),
            )
        } else {
            self.final_value
        };

        if let Err(e) = self.callback.call(scene, &[current]) {
            log::error!("Error calling {} from MethodTweener: {}", self.callback, e);
            self.finished = true;
            return StepResult::inactive(delta);
        }

        if time < self.duration {
            StepResult::running()
        } else {
            self.finished = true;
            StepResult::completed(self.elapsed_time - self.delay - self.duration)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::CallError;
    use crate::components::entity::Entity;
    use std::cell::RefCell;
    use std::rc::Rc;

    const EPS: f64 = 1e-9;

    fn rotation_tweener(scene: &mut Scene, to: f64, duration: f64) -> (ObjectId, PropertyTweener) {
        let id = scene.add(Entity::new());
        let path = PropertyPath::parse("rotation").unwrap();
        let mut t = PropertyTweener::new(id, path, Value::Float(0.0), Value::Float(to), duration);
        t.trans = Some(TransitionType::Linear);
        t.ease = Some(EaseType::In);
        (id, t)
    }

    fn rotation(scene: &Scene, id: ObjectId) -> f64 {
        scene.get(id).unwrap().get_property("rotation").unwrap().as_f64().unwrap()
    }

    #[test]
    fn interval_reports_leftover() {
        let mut t = IntervalTweener::new(1.0);
        t.start();
        assert_eq!(t.step(0.6), StepResult::running());
        let r = t.step(0.6);
        assert!(r.finished && r.completed);
        assert!((r.leftover - 0.2).abs() < EPS);
    }

    #[test]
    fn finished_tweener_is_a_noop() {
        let mut t = IntervalTweener::new(0.5);
        t.start();
        assert!(t.step(1.0).completed);
        let again = t.step(0.3);
        assert_eq!(again, StepResult::inactive(0.3));
    }

    #[test]
    fn zero_duration_finishes_on_first_step() {
        let mut t = IntervalTweener::new(0.0);
        t.start();
        let r = t.step(0.0);
        assert!(r.completed);
        assert_eq!(r.leftover, 0.0);
    }

    #[test]
    fn property_snaps_to_final_value() {
        let mut scene = Scene::new();
        let (id, mut t) = rotation_tweener(&mut scene, 2.0, 1.0);
        t.start(&scene);

        assert!(!t.step(0.5, &mut scene).finished);
        assert!((rotation(&scene, id) - 1.0).abs() < 1e-6);

        let r = t.step(0.75, &mut scene);
        assert!(r.completed);
        assert!((r.leftover - 0.25).abs() < EPS);
        assert_eq!(rotation(&scene, id), 2.0);
    }

    #[test]
    fn property_waits_for_delay() {
        let mut scene = Scene::new();
        let (id, mut t) = rotation_tweener(&mut scene, 1.0, 1.0);
        t.set_delay(0.5);
        t.start(&scene);
        assert!(!t.step(0.4, &mut scene).finished);
        assert_eq!(rotation(&scene, id), 0.0);
        let r = t.step(1.2, &mut scene);
        assert!(r.completed);
        assert!((r.leftover - 0.1).abs() < 1e-6);
    }

    #[test]
    fn relative_property_adds_to_start() {
        let mut scene = Scene::new();
        let id = scene.add(Entity::new().with_rotation(1.0));
        let path = PropertyPath::parse("rotation").unwrap();
        let mut t = PropertyTweener::new(id, path, Value::Float(1.0), Value::Float(2.0), 1.0);
        t.as_relative();
        t.start(&scene);
        t.step(1.0, &mut scene);
        assert_eq!(rotation(&scene, id), 3.0);
    }

    #[test]
    fn freed_target_degrades_gracefully() {
        let mut scene = Scene::new();
        let (id, mut t) = rotation_tweener(&mut scene, 1.0, 1.0);
        t.start(&scene);
        t.step(0.2, &mut scene);
        scene.despawn(id);
        let r = t.step(0.2, &mut scene);
        assert_eq!(r, StepResult::inactive(0.2));
        assert!(t.finished);
    }

    #[test]
    fn callback_fires_once_after_delay() {
        let mut scene = Scene::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let mut t = CallbackTweener::new(Callable::action(move |_| *c.borrow_mut() += 1));
        t.set_delay(0.5);
        t.start();

        assert!(!t.step(0.3, &mut scene).finished);
        let r = t.step(0.3, &mut scene);
        assert!(r.completed);
        assert!((r.leftover - 0.1).abs() < EPS);
        t.step(1.0, &mut scene);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn callback_failure_finishes_without_completion() {
        let mut scene = Scene::new();
        let mut t = CallbackTweener::new(Callable::func(|_, _| Err(CallError::Custom("boom".into()))));
        t.start();
        let r = t.step(0.1, &mut scene);
        assert_eq!(r, StepResult::inactive(0.1));
        assert!(t.finished);
    }

    #[test]
    fn method_failure_finishes_without_completion() {
        let mut scene = Scene::new();
        let cb = Callable::func(|_, _| Err(CallError::InvalidArgumentCount { expected: 2, given: 1 }));
        let mut t = MethodTweener::new(cb, Value::Float(0.0), Value::Float(1.0), 1.0);
        t.start();
        let r = t.step(0.25, &mut scene);
        assert_eq!(r, StepResult::inactive(0.25));
        assert!(t.finished);
        assert_eq!(t.step(0.5, &mut scene), StepResult::inactive(0.5));
    }

    struct Gauge {
        level: f64,
    }

    impl crate::core::scene::Animatable for Gauge {
        fn get_property(&self, name: &str) -> Option<Value> {
            (name == "level").then_some(Value::Float(self.level))
        }

        fn set_property(&mut self, _name: &str, _value: Value) -> bool {
            false
        }
    }

    #[test]
    fn rejected_writes_still_finish() {
        let mut scene = Scene::new();
        let id = scene.add(Gauge { level: 1.0 });
        let path = PropertyPath::parse("level").unwrap();
        let mut t = PropertyTweener::new(id, path, Value::Float(1.0), Value::Float(5.0), 1.0);
        t.start(&scene);

        assert_eq!(t.step(0.5, &mut scene), StepResult::running());
        assert!(t.step(0.5, &mut scene).completed);
        assert_eq!(scene.get(id).unwrap().get_property("level"), Some(Value::Float(1.0)));
    }

    #[test]
    fn method_receives_exact_final_value() {
        let mut scene = Scene::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let cb = Callable::func(move |_, args| {
            s.borrow_mut().push(args[0]);
            Ok(())
        });
        let mut t = MethodTweener::new(cb, Value::Float(0.0), Value::Float(10.0), 1.0);
        t.trans = Some(TransitionType::Linear);
        t.ease = Some(EaseType::In);
        t.start();
        t.step(0.25, &mut scene);
        t.step(1.0, &mut scene);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!((seen[0].as_f64().unwrap() - 2.5).abs() < EPS);
        assert_eq!(seen[1], Value::Float(10.0));
    }

    #[test]
    fn adopt_defaults_keeps_overrides() {
        let mut scene = Scene::new();
        let (_, mut t) = rotation_tweener(&mut scene, 1.0, 1.0);
        t.trans = None;
        let mut tweener = Tweener::Property(t);
        tweener.adopt_defaults(TransitionType::Bounce, EaseType::Out);
        match tweener {
            Tweener::Property(t) => {
                assert_eq!(t.trans, Some(TransitionType::Bounce));
                assert_eq!(t.ease, Some(EaseType::In));
            }
            _ => unreachable!(),
        }
    }
}
