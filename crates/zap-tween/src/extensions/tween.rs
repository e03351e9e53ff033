// extensions/tween.rs
//
// Tween: sequences steps of parallel tweeners against a delta-time budget.
// Decoupled from whatever owns the tween: the owner calls `step` once per
// tick and drops the tween when `step` returns false.
//
// Usage:
//   let mut tween = Tween::new();
//   tween.tween_property(&scene, id, "position:x", 100.0, 0.5)?;
//   tween.parallel().tween_property(&scene, id, "modulate:a", 0.0, 0.5)?;
//   tween.tween_callback(Callable::method(id, "hide"))?;
//   tween.step(dt, &mut scene);

use serde::{Deserialize, Serialize};

use crate::api::error::TweenError;
use crate::api::types::ObjectId;
use crate::config::TweenConfig;
use crate::core::scene::Scene;
use crate::core::value::{PropertyPath, Value};
use super::callable::Callable;
use super::easing::{EaseType, TransitionType};
use super::tweener::{CallbackTweener, IntervalTweener, MethodTweener, PropertyTweener, Tweener};

/// How a tween reacts to the scene being paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenPauseMode {
    /// Follow the bound node's processing state; behaves like `Stop` when unbound.
    #[default]
    Bound,
    /// Freeze while the scene is paused.
    Stop,
    /// Keep running while the scene is paused.
    Process,
}

/// Which tick phase drives the tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenProcessMode {
    /// Fixed-rate physics ticks.
    Physics,
    /// Once per rendered frame.
    #[default]
    Idle,
}

/// Notifications emitted synchronously from `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenEvent {
    /// A tweener ran to completion.
    TweenerFinished { step: usize, index: usize },
    /// Every tweener of a step is done.
    StepFinished(usize),
    /// A loop ended and another one starts. Carries the loops done so far.
    LoopFinished(u32),
    /// The last loop ended; the tween is dead.
    Finished,
}

type Listener = Box<dyn FnMut(&TweenEvent)>;

/// Event queue plus synchronous listeners.
#[derive(Default)]
struct Signals {
    queue: Vec<TweenEvent>,
    listeners: Vec<Listener>,
}

impl Signals {
    fn emit(&mut self, event: TweenEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
        self.queue.push(event);
    }
}

/// A sequence of steps, each a set of tweeners running in parallel.
pub struct Tween {
    steps: Vec<Vec<Tweener>>,
    current_step: usize,
    loops: u32,
    loops_done: u32,
    total_time: f64,
    speed_scale: f64,
    default_transition: TransitionType,
    default_ease: EaseType,
    parallel_enabled: bool,
    default_parallel: bool,
    valid: bool,
    started: bool,
    running: bool,
    dead: bool,
    bound_node: Option<ObjectId>,
    pause_mode: TweenPauseMode,
    process_mode: TweenProcessMode,
    signals: Signals,
}

impl Tween {
    /// A valid tween, running as soon as it has tweeners.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            current_step: 0,
            loops: 1,
            loops_done: 0,
            total_time: 0.0,
            speed_scale: 1.0,
            default_transition: TransitionType::Linear,
            default_ease: EaseType::InOut,
            parallel_enabled: false,
            default_parallel: false,
            valid: true,
            started: false,
            running: true,
            dead: false,
            bound_node: None,
            pause_mode: TweenPauseMode::Bound,
            process_mode: TweenProcessMode::Idle,
            signals: Signals::default(),
        }
    }

    /// A tween that refuses all composition, as if created outside a manager.
    pub fn invalid() -> Self {
        Self {
            valid: false,
            ..Self::new()
        }
    }

    pub fn with_config(config: &TweenConfig) -> Self {
        let mut tween = Self::new();
        tween.apply_config(config);
        tween
    }

    // -- Composition --

    /// Animate `property` on `target` to `to` over `duration` seconds.
    ///
    /// `to` is cast between int and float to match the property; any other
    /// type difference is rejected.
    pub fn tween_property(
        &mut self,
        scene: &Scene,
        target: ObjectId,
        property: &str,
        to: impl Into<Value>,
        duration: f64,
    ) -> Result<&mut PropertyTweener, TweenError> {
        self.ensure_composable()?;

        let path = PropertyPath::parse(property)?;
        let object = scene.get(target).ok_or(TweenError::TargetNotFound(target))?;
        let current = object.get_indexed(&path).ok_or_else(|| TweenError::PropertyNotFound {
            target,
            property: path.to_string(),
        })?;
        let to = to.into().coerce_to(current.kind(), "property and final value")?;

        match self.append(Tweener::Property(PropertyTweener::new(target, path, current, to, duration))) {
            Tweener::Property(t) => Ok(t),
            _ => unreachable!("appended a property tweener"),
        }
    }

    /// Wait for `time` seconds.
    pub fn tween_interval(&mut self, time: f64) -> Result<&mut IntervalTweener, TweenError> {
        self.ensure_composable()?;
        match self.append(Tweener::Interval(IntervalTweener::new(time))) {
            Tweener::Interval(t) => Ok(t),
            _ => unreachable!("appended an interval tweener"),
        }
    }

    /// Invoke `callback` once.
    pub fn tween_callback(&mut self, callback: Callable) -> Result<&mut CallbackTweener, TweenError> {
        self.ensure_composable()?;
        match self.append(Tweener::Callback(CallbackTweener::new(callback))) {
            Tweener::Callback(t) => Ok(t),
            _ => unreachable!("appended a callback tweener"),
        }
    }

    /// Call `callback` with a value interpolated from `from` to `to` on
    /// every step for `duration` seconds.
    pub fn tween_method(
        &mut self,
        callback: Callable,
        from: impl Into<Value>,
        to: impl Into<Value>,
        duration: f64,
    ) -> Result<&mut MethodTweener, TweenError> {
        self.ensure_composable()?;
        let from = from.into();
        let to = to.into().coerce_to(from.kind(), "method start and final value")?;
        match self.append(Tweener::Method(MethodTweener::new(callback, from, to, duration))) {
            Tweener::Method(t) => Ok(t),
            _ => unreachable!("appended a method tweener"),
        }
    }

    fn ensure_composable(&self) -> Result<(), TweenError> {
        if !self.valid {
            return Err(TweenError::Invalid);
        }
        if self.started {
            return Err(TweenError::AlreadyStarted);
        }
        Ok(())
    }

    fn append(&mut self, mut tweener: Tweener) -> &mut Tweener {
        tweener.adopt_defaults(self.default_transition, self.default_ease);

        if !self.parallel_enabled || self.steps.is_empty() {
            self.steps.push(Vec::new());
        }
        self.parallel_enabled = self.default_parallel;
        self.current_step = self.steps.len() - 1;

        let step = &mut self.steps[self.current_step];
        step.push(tweener);
        let last = step.len() - 1;
        &mut step[last]
    }

    // -- Configuration --

    /// Make every following append join the current step (or not).
    pub fn set_parallel(&mut self, parallel: bool) -> &mut Self {
        self.default_parallel = parallel;
        self.parallel_enabled = parallel;
        self
    }

    /// Run the next appended tweener alongside the previous one.
    pub fn parallel(&mut self) -> &mut Self {
        self.parallel_enabled = true;
        self
    }

    /// Run the next appended tweener after the previous step.
    pub fn chain(&mut self) -> &mut Self {
        self.parallel_enabled = false;
        self
    }

    /// 0 loops forever.
    pub fn set_loops(&mut self, loops: u32) -> &mut Self {
        self.loops = loops;
        self
    }

    pub fn set_speed_scale(&mut self, speed: f64) -> &mut Self {
        self.speed_scale = speed;
        self
    }

    /// Curve used by tweeners appended from now on.
    pub fn set_trans(&mut self, trans: TransitionType) -> &mut Self {
        self.default_transition = trans;
        self
    }

    pub fn set_ease(&mut self, ease: EaseType) -> &mut Self {
        self.default_ease = ease;
        self
    }

    pub fn set_pause_mode(&mut self, mode: TweenPauseMode) -> &mut Self {
        self.pause_mode = mode;
        self
    }

    pub fn set_process_mode(&mut self, mode: TweenProcessMode) -> &mut Self {
        self.process_mode = mode;
        self
    }

    /// Tie the tween's lifetime and processing to a scene object.
    pub fn bind_node(&mut self, node: ObjectId) -> &mut Self {
        self.bound_node = Some(node);
        self
    }

    pub fn apply_config(&mut self, config: &TweenConfig) -> &mut Self {
        self.set_trans(config.trans)
            .set_ease(config.ease)
            .set_loops(config.loops)
            .set_speed_scale(config.speed_scale)
            .set_parallel(config.parallel)
            .set_pause_mode(config.pause_mode)
            .set_process_mode(config.process_mode)
    }

    /// Register a listener called synchronously for every event.
    pub fn connect(&mut self, listener: impl FnMut(&TweenEvent) + 'static) -> &mut Self {
        self.signals.listeners.push(Box::new(listener));
        self
    }

    // -- Control --

    pub fn play(&mut self) -> Result<(), TweenError> {
        if !self.valid {
            return Err(TweenError::Invalid);
        }
        if self.dead {
            return Err(TweenError::Dead);
        }
        self.running = true;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Reset to the composing state, keeping the tweeners.
    /// `play` has to be called again to resume stepping.
    pub fn stop(&mut self) {
        self.started = false;
        self.running = false;
        self.dead = false;
        self.total_time = 0.0;
    }

    /// Finish immediately without emitting anything.
    pub fn kill(&mut self) {
        self.running = false;
        self.dead = true;
    }

    /// Invalidate the tween and drop its tweeners. Irreversible.
    pub fn clear(&mut self) {
        self.valid = false;
        self.steps.clear();
    }

    // -- Queries --

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Scaled time fed into the tween since it started.
    pub fn total_elapsed_time(&self) -> f64 {
        self.total_time
    }

    pub fn loops(&self) -> u32 {
        self.loops
    }

    pub fn loops_done(&self) -> u32 {
        self.loops_done
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn tweener_count(&self, step: usize) -> usize {
        self.steps.get(step).map_or(0, Vec::len)
    }

    pub fn tweeners(&self, step: usize) -> &[Tweener] {
        self.steps.get(step).map_or(&[], Vec::as_slice)
    }

    pub fn bound_node(&self) -> Option<ObjectId> {
        self.bound_node
    }

    pub fn trans(&self) -> TransitionType {
        self.default_transition
    }

    pub fn ease(&self) -> EaseType {
        self.default_ease
    }

    pub fn speed_scale(&self) -> f64 {
        self.speed_scale
    }

    pub fn pause_mode(&self) -> TweenPauseMode {
        self.pause_mode
    }

    pub fn process_mode(&self) -> TweenProcessMode {
        self.process_mode
    }

    /// Drain queued events in emission order.
    pub fn drain_events(&mut self) -> impl Iterator<Item = TweenEvent> + '_ {
        self.signals.queue.drain(..)
    }

    // -- Driving --

    /// Whether the owner should step this tween on the current tick.
    pub fn can_process(&self, tree_paused: bool, scene: &Scene) -> bool {
        if let (Some(node), TweenPauseMode::Bound) = (self.bound_node, self.pause_mode) {
            if let Some(slot) = scene.slot(node) {
                return slot.inside_tree && slot.can_process;
            }
        }
        !tree_paused || self.pause_mode == TweenPauseMode::Process
    }

    /// Step even when paused. The paused state is restored afterwards
    /// unless the tween finished during the step.
    pub fn custom_step(&mut self, delta: f64, scene: &mut Scene) -> bool {
        let was_running = self.running;
        self.running = true;
        let keep = self.step(delta, scene);
        self.running = self.running && was_running;
        keep
    }

    /// Advance by `delta` seconds. Returns `false` when the owner should
    /// stop scheduling this tween.
    pub fn step(&mut self, delta: f64, scene: &mut Scene) -> bool {
        if self.dead {
            return false;
        }

        if !self.running {
            return true;
        }

        if let Some(node) = self.bound_node {
            match scene.slot(node) {
                None => return false,
                Some(slot) if !slot.inside_tree => return true,
                Some(_) => {}
            }
        }

        if !self.started {
            if self.steps.is_empty() {
                log::error!("{}", TweenError::NoTweeners);
                self.kill();
                return false;
            }
            self.current_step = 0;
            self.loops_done = 0;
            self.total_time = 0.0;
            self.start_tweeners(scene);
            self.started = true;
        }

        let mut rem_delta = delta * self.speed_scale;
        self.total_time += rem_delta;

        let initial_delta = rem_delta;
        let mut potential_infinite = false;

        while rem_delta > 0.0 && self.running {
            let step_index = self.current_step;
            let mut step_delta = rem_delta;
            let mut step_active = false;

            for (index, tweener) in self.steps[step_index].iter_mut().enumerate() {
                let result = tweener.step(rem_delta, scene);
                step_active = !result.finished || step_active;
                step_delta = step_delta.min(result.leftover);
                if result.completed {
                    self.signals.emit(TweenEvent::TweenerFinished {
                        step: step_index,
                        index,
                    });
                }
            }

            rem_delta = step_delta;

            if step_active {
                continue;
            }

            self.signals.emit(TweenEvent::StepFinished(step_index));
            self.current_step += 1;

            if self.current_step < self.steps.len() {
                self.start_tweeners(scene);
                continue;
            }

            self.loops_done += 1;
            if self.loops_done == self.loops {
                self.running = false;
                self.dead = true;
                self.signals.emit(TweenEvent::Finished);
                break;
            }

            self.signals.emit(TweenEvent::LoopFinished(self.loops_done));
            self.current_step = 0;
            self.start_tweeners(scene);

            if cfg!(debug_assertions) && self.loops == 0 && is_equal_approx(rem_delta, initial_delta) {
                if potential_infinite {
                    // Two loops in a row without consuming any time.
                    log::error!("Infinite loop detected: a tween with infinite loops must take time on every loop.");
                    self.kill();
                    return false;
                }
                potential_infinite = true;
            }
        }

        true
    }

    fn start_tweeners(&mut self, scene: &Scene) {
        for tweener in &mut self.steps[self.current_step] {
            tweener.start(scene);
        }
    }
}

impl Default for Tween {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Tween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("steps", &self.steps.len())
            .field("current_step", &self.current_step)
            .field("loops", &self.loops)
            .field("loops_done", &self.loops_done)
            .field("total_time", &self.total_time)
            .field("valid", &self.valid)
            .field("started", &self.started)
            .field("running", &self.running)
            .field("dead", &self.dead)
            .field("bound_node", &self.bound_node)
            .finish()
    }
}

fn is_equal_approx(a: f64, b: f64) -> bool {
    const CMP_EPSILON: f64 = 0.00001;
    if a == b {
        return true;
    }
    let tolerance = (CMP_EPSILON * a.abs()).max(CMP_EPSILON);
    (a - b).abs() < tolerance
}
