// extensions/manager.rs
//
// TweenManager: owns every live tween, hands out handles, and steps tweens
// in creation order. Finished tweens and tweens whose bound node was
// despawned are dropped automatically.
//
// Usage:
//   let mut tweens = TweenManager::new();
//   let id = tweens.create_bound_tween(node);
//   if let Some(tween) = tweens.get_mut(id) { tween.tween_interval(1.0)?; }
//   tweens.advance(frame_dt, &mut scene);
//   for (id, event) in tweens.drain_events() { ... }

use crate::api::error::TweenError;
use crate::api::types::{ObjectId, TweenId};
use crate::config::TweenConfig;
use crate::core::scene::Scene;
use crate::core::time::FixedTimestep;
use super::tween::{Tween, TweenEvent, TweenProcessMode};

/// Which tick is being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessPhase {
    Idle,
    Physics,
}

impl ProcessPhase {
    fn matches(self, mode: TweenProcessMode) -> bool {
        matches!(
            (self, mode),
            (ProcessPhase::Idle, TweenProcessMode::Idle) | (ProcessPhase::Physics, TweenProcessMode::Physics)
        )
    }
}

/// Manages all live tweens.
#[derive(Debug)]
pub struct TweenManager {
    tweens: Vec<(TweenId, Tween)>,
    next_id: u32,
    defaults: TweenConfig,
    physics: FixedTimestep,
    paused: bool,
    events: Vec<(TweenId, TweenEvent)>,
}

impl TweenManager {
    pub fn new() -> Self {
        Self::with_defaults(TweenConfig::default())
    }

    pub fn with_defaults(defaults: TweenConfig) -> Self {
        Self {
            tweens: Vec::new(),
            next_id: 0,
            physics: FixedTimestep::new(defaults.physics_dt),
            defaults,
            paused: false,
            events: Vec::new(),
        }
    }

    /// Defaults for tweens created from now on. Live tweens keep theirs.
    /// A partial physics tick accumulated under the old rate is dropped.
    pub fn set_defaults(&mut self, defaults: TweenConfig) {
        if defaults.physics_dt != self.defaults.physics_dt {
            self.physics = FixedTimestep::new(defaults.physics_dt);
        } else {
            self.physics.reset();
        }
        self.defaults = defaults;
    }

    /// How far the physics clock is into its next tick (0.0 to 1.0).
    pub fn physics_alpha(&self) -> f64 {
        self.physics.alpha()
    }

    pub fn defaults(&self) -> &TweenConfig {
        &self.defaults
    }

    /// Create an empty tween. It starts on the first tick after it gets
    /// a tweener.
    pub fn create_tween(&mut self) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.push((id, Tween::with_config(&self.defaults)));
        log::debug!("Tween {} created", id);
        id
    }

    /// Create a tween bound to `node`: it pauses with the node and dies
    /// with it.
    pub fn create_bound_tween(&mut self, node: ObjectId) -> TweenId {
        let id = self.create_tween();
        if let Some(tween) = self.get_mut(id) {
            tween.bind_node(node);
        }
        id
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.iter().find(|(i, _)| *i == id).map(|(_, t)| t)
    }

    pub fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.tweens.iter_mut().find(|(i, _)| *i == id).map(|(_, t)| t)
    }

    pub fn contains(&self, id: TweenId) -> bool {
        self.get(id).is_some()
    }

    /// Resume a paused tween.
    pub fn play(&mut self, id: TweenId) -> Result<(), TweenError> {
        self.get_mut(id).ok_or(TweenError::UnknownTween(id))?.play()
    }

    pub fn pause(&mut self, id: TweenId) -> Result<(), TweenError> {
        self.get_mut(id).ok_or(TweenError::UnknownTween(id))?.pause();
        Ok(())
    }

    /// Clear and drop a tween. Returns `false` for unknown handles.
    pub fn remove(&mut self, id: TweenId) -> bool {
        let Some(index) = self.tweens.iter().position(|(i, _)| *i == id) else {
            return false;
        };
        let (_, mut tween) = self.tweens.remove(index);
        tween.clear();
        log::debug!("Tween {} removed", id);
        true
    }

    /// Kill and drop every tween. Nothing is emitted.
    pub fn kill_all(&mut self) {
        for (_, tween) in &mut self.tweens {
            tween.kill();
            tween.clear();
        }
        self.tweens.clear();
        self.physics.reset();
    }

    /// Tree pause. Only `Process` tweens (and `Bound` tweens whose node
    /// still processes) keep running.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Step every tween that processes in `phase`. Returns the number of
    /// tweens dropped this tick.
    pub fn tick(&mut self, dt: f64, scene: &mut Scene, phase: ProcessPhase) -> usize {
        let mut dropped = 0;
        let paused = self.paused;
        let events = &mut self.events;

        self.tweens.retain_mut(|(id, tween)| {
            if !phase.matches(tween.process_mode()) || !tween.can_process(paused, scene) {
                return true;
            }

            let keep = tween.step(dt, scene);
            events.extend(tween.drain_events().map(|event| (*id, event)));
            if !keep {
                tween.clear();
                dropped += 1;
                log::debug!("Tween {} finished", id);
            }
            keep
        });

        dropped
    }

    /// Run one idle tick with `frame_dt` plus as many fixed physics ticks
    /// as the accumulator allows.
    pub fn advance(&mut self, frame_dt: f64, scene: &mut Scene) -> usize {
        let steps = self.physics.accumulate(frame_dt);
        let dt = self.physics.dt();
        let mut dropped = 0;
        for _ in 0..steps {
            dropped += self.tick(dt, scene, ProcessPhase::Physics);
        }
        dropped + self.tick(frame_dt, scene, ProcessPhase::Idle)
    }

    /// Drain events from every tween, tagged with their handle.
    pub fn drain_events(&mut self) -> impl Iterator<Item = (TweenId, TweenEvent)> + '_ {
        self.events.drain(..)
    }

    pub fn ids(&self) -> impl Iterator<Item = TweenId> + '_ {
        self.tweens.iter().map(|(id, _)| *id)
    }

    /// Number of live tweens.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

impl Default for TweenManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;
    use crate::extensions::tween::TweenPauseMode;

    #[test]
    fn finished_tweens_are_dropped() {
        let mut scene = Scene::new();
        let mut tweens = TweenManager::new();
        let id = tweens.create_tween();
        tweens.get_mut(id).unwrap().tween_interval(0.5).unwrap();

        assert_eq!(tweens.tick(0.25, &mut scene, ProcessPhase::Idle), 0);
        assert_eq!(tweens.tick(0.25, &mut scene, ProcessPhase::Idle), 1);
        assert!(tweens.is_empty());

        let events: Vec<_> = tweens.drain_events().collect();
        assert_eq!(events.last(), Some(&(id, TweenEvent::Finished)));
    }

    #[test]
    fn empty_tween_is_dropped_on_first_tick() {
        let mut scene = Scene::new();
        let mut tweens = TweenManager::new();
        tweens.create_tween();
        assert_eq!(tweens.tick(0.1, &mut scene, ProcessPhase::Idle), 1);
    }

    #[test]
    fn remove_invalidates_handle() {
        let mut tweens = TweenManager::new();
        let id = tweens.create_tween();
        assert!(tweens.remove(id));
        assert!(!tweens.remove(id));
        assert!(tweens.get(id).is_none());
        assert_eq!(tweens.play(id), Err(TweenError::UnknownTween(id)));
    }

    #[test]
    fn handles_are_unique() {
        let mut tweens = TweenManager::new();
        let a = tweens.create_tween();
        tweens.remove(a);
        let b = tweens.create_tween();
        assert_ne!(a, b);
        assert_eq!(tweens.ids().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn bound_tween_dies_with_node() {
        let mut scene = Scene::new();
        let node = scene.add(Entity::new());
        let mut tweens = TweenManager::new();
        let id = tweens.create_bound_tween(node);
        tweens.get_mut(id).unwrap().tween_interval(10.0).unwrap();

        tweens.tick(0.1, &mut scene, ProcessPhase::Idle);
        assert!(tweens.contains(id));

        scene.despawn(node);
        assert_eq!(tweens.tick(0.1, &mut scene, ProcessPhase::Idle), 1);
        assert!(!tweens.contains(id));
    }

    #[test]
    fn tree_pause_respects_pause_mode() {
        let mut scene = Scene::new();
        let mut tweens = TweenManager::new();
        let stopped = tweens.create_tween();
        let processed = tweens.create_tween();
        for id in [stopped, processed] {
            tweens.get_mut(id).unwrap().tween_interval(1.0).unwrap();
        }
        tweens
            .get_mut(processed)
            .unwrap()
            .set_pause_mode(TweenPauseMode::Process);

        tweens.set_paused(true);
        tweens.tick(0.5, &mut scene, ProcessPhase::Idle);
        assert_eq!(tweens.get(stopped).unwrap().total_elapsed_time(), 0.0);
        assert_eq!(tweens.get(processed).unwrap().total_elapsed_time(), 0.5);
    }

    #[test]
    fn phases_select_process_mode() {
        let mut scene = Scene::new();
        let mut tweens = TweenManager::with_defaults(TweenConfig {
            process_mode: TweenProcessMode::Physics,
            physics_dt: 0.25,
            ..TweenConfig::default()
        });
        let id = tweens.create_tween();
        tweens.get_mut(id).unwrap().tween_interval(10.0).unwrap();

        tweens.tick(1.0, &mut scene, ProcessPhase::Idle);
        assert_eq!(tweens.get(id).unwrap().total_elapsed_time(), 0.0);

        // 0.6s of frame time is two fixed ticks of 0.25s.
        tweens.advance(0.6, &mut scene);
        assert!((tweens.get(id).unwrap().total_elapsed_time() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn physics_clock_keeps_partial_ticks_until_reset() {
        let mut scene = Scene::new();
        let mut tweens = TweenManager::with_defaults(TweenConfig {
            physics_dt: 0.25,
            ..TweenConfig::default()
        });
        tweens.advance(0.6, &mut scene);
        assert!((tweens.physics_alpha() - 0.4).abs() < 1e-9);

        tweens.set_defaults(TweenConfig {
            physics_dt: 0.25,
            loops: 3,
            ..TweenConfig::default()
        });
        assert_eq!(tweens.physics_alpha(), 0.0);

        tweens.advance(0.1, &mut scene);
        tweens.kill_all();
        assert_eq!(tweens.physics_alpha(), 0.0);
    }

    #[test]
    fn kill_all_emits_nothing() {
        let mut scene = Scene::new();
        let mut tweens = TweenManager::new();
        for _ in 0..3 {
            let id = tweens.create_tween();
            tweens.get_mut(id).unwrap().tween_interval(1.0).unwrap();
        }
        tweens.kill_all();
        assert!(tweens.is_empty());
        tweens.tick(1.0, &mut scene, ProcessPhase::Idle);
        assert_eq!(tweens.drain_events().count(), 0);
    }
}
