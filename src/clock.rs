//! Fixed timestep driver
//!
//! Real elapsed time goes into an accumulator; the simulation consumes it in
//! constant steps so physics does not depend on the frame rate.

use crate::consts::MAX_FRAME_TIME;

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
    /// Total ticks run since creation
    pub ticks: u64,
}

impl FixedTimestep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
            ticks: 0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Unprocessed time left over from the last frame
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Drop any pending time, e.g. after a pause.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Feed one frame's worth of real time and run `tick` once per whole step.
    ///
    /// At most `max_substeps` ticks run per call. Whatever backlog is left
    /// after that is discarded rather than carried into the next frame.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: f32, mut tick: impl FnMut(f32)) -> u32 {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_TIME);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            tick(self.step);
            self.accumulator -= self.step;
            substeps += 1;
        }
        self.ticks += substeps as u64;

        if self.accumulator >= self.step {
            log::warn!(
                "Simulation fell behind, dropping {:.3}s of backlog",
                self.accumulator
            );
            self.accumulator %= self.step;
        }
        substeps
    }
}
