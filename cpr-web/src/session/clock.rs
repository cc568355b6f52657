//! Fixed-step clock - turns variable frame time into whole physics steps
//!
//! The detection tick runs once per rendered frame at whatever rate the
//! display manages; the chest spring must step at a fixed rate to stay
//! reproducible. Frame time accumulates here and is paid out in whole steps.

/// Accumulator paying out fixed physics steps
#[derive(Clone, Debug)]
pub struct FixedStepClock {
    step: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedStepClock {
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Add one frame's elapsed time, returning how many steps to run.
    ///
    /// After a long stall (tab backgrounded, debugger) at most `max_steps`
    /// are paid out and the backlog is dropped, so the frame after a stall
    /// does not spend itself catching up.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !(frame_dt > 0.0) || !frame_dt.is_finite() || !(self.step > 0.0) {
            return 0;
        }

        self.accumulator += frame_dt;
        let due = (self.accumulator / self.step).floor();

        if due >= self.max_steps as f32 {
            self.accumulator = 0.0;
            return self.max_steps;
        }

        let steps = due as u32;
        self.accumulator -= steps as f32 * self.step;
        // Rounding can leave a hair below zero
        self.accumulator = self.accumulator.max(0.0);
        steps
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Fraction of a step left over (render interpolation)
    pub fn alpha(&self) -> f32 {
        if self.step > 0.0 {
            (self.accumulator / self.step).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
