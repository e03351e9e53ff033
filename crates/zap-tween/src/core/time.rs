/// Turns variable frame time into whole physics ticks for
/// `TweenProcessMode::Physics` tweens.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f64,
    accumulator: f64,
}

/// Upper bound on ticks per frame; time beyond it is dropped.
const MAX_STEPS_PER_FRAME: u32 = 10;

impl FixedTimestep {
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Feed one frame's delta. Returns how many fixed ticks are due.
    /// A non-positive `dt` never ticks.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        if self.dt <= 0.0 {
            return 0;
        }
        self.accumulator = (self.accumulator + frame_dt).min(self.dt * MAX_STEPS_PER_FRAME as f64);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f64 * self.dt;
        steps
    }

    /// Fraction of a tick left in the accumulator.
    pub fn alpha(&self) -> f64 {
        if self.dt <= 0.0 {
            return 0.0;
        }
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_second_ticks() {
        let mut clock = FixedTimestep::new(0.25);
        assert_eq!(clock.accumulate(0.6), 2);
        assert!((clock.alpha() - 0.4).abs() < 1e-9);
        assert_eq!(clock.accumulate(0.2), 1);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut clock = FixedTimestep::new(0.1);
        assert_eq!(clock.accumulate(5.0), MAX_STEPS_PER_FRAME);
        assert_eq!(clock.accumulate(0.0), 0);
    }

    #[test]
    fn reset_drops_partial_tick() {
        let mut clock = FixedTimestep::new(1.0 / 60.0);
        clock.accumulate(0.01);
        clock.reset();
        assert_eq!(clock.accumulate(0.01), 0);
    }

    #[test]
    fn non_positive_dt_never_ticks() {
        let mut clock = FixedTimestep::new(0.0);
        assert_eq!(clock.accumulate(1.0), 0);
        assert_eq!(clock.alpha(), 0.0);
    }
}
