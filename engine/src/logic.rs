//! Shared stepping loop and the two cadence strategies that pace it.

use std::{
    sync::atomic::{AtomicBool, AtomicU32, Ordering},
    thread,
    time::Instant,
};

use drawmachine_canvas::SharedCanvas;
use drawmachine_core::{PixelColor, ProgressSink, RunError, RunOutcome, RunReport, SharedParams};

use crate::machine::{MachineModel, MachineState};
use crate::raster;

/// Observable run state shared between the engine, the worker thread
/// and any reader polling for progress.
#[derive(Debug, Default)]
pub(crate) struct RunStatus {
    running: AtomicBool,
    stop_requested: AtomicBool,
    current_step: AtomicU32,
}

impl RunStatus {
    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Atomically claims the engine for a new run.
    ///
    /// Returns `false` when a run is already active, in which case no
    /// state is touched.
    pub(crate) fn try_begin(&self) -> bool {
        if self.running.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.stop_requested.store(false, Ordering::SeqCst);
        self.current_step.store(0, Ordering::SeqCst);
        true
    }

    /// Marks the run idle again. The worker calls this before the
    /// completion callback so that observers inside the callback see a
    /// consistent idle state.
    pub(crate) fn finish(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub(crate) fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    pub(crate) fn publish_step(&self, step: u32) {
        self.current_step.store(step, Ordering::SeqCst);
    }

    pub(crate) fn current_step(&self) -> u32 {
        self.current_step.load(Ordering::SeqCst)
    }
}

/// Pacing strategy applied after each rasterized step.
///
/// The per-step algorithm itself lives in [`run_steps`] and is shared,
/// so a cadence only decides what happens between steps: the animated
/// cadence reports and throttles, the batch cadence does neither.
pub(crate) trait Cadence {
    /// Invoked after the step with the provided index was rasterized.
    fn after_step(&mut self, step: u32, step_started: Instant);
}

/// Cadence of an animated run: reports every step and sleeps away the
/// remainder of the step's time budget.
pub(crate) struct AnimatedCadence<'a> {
    sink: &'a dyn ProgressSink,
    params: &'a SharedParams,
}

impl<'a> AnimatedCadence<'a> {
    pub(crate) fn new(sink: &'a dyn ProgressSink, params: &'a SharedParams) -> Self {
        Self { sink, params }
    }
}

impl Cadence for AnimatedCadence<'_> {
    fn after_step(&mut self, step: u32, step_started: Instant) {
        self.sink.on_step(step);

        // Speed is re-read on every iteration so that slider changes
        // take effect mid-run. At or above the ceiling there is no
        // period and the sleep is skipped entirely.
        if let Some(period) = self.params.speed().step_period() {
            if let Some(remaining) = period.checked_sub(step_started.elapsed()) {
                thread::sleep(remaining);
            }
        }
    }
}

/// Cadence of a fast run: steps execute back-to-back with no reporting.
pub(crate) struct BatchCadence;

impl Cadence for BatchCadence {
    fn after_step(&mut self, _step: u32, _step_started: Instant) {}
}

/// Everything a worker thread needs to execute one run.
pub(crate) struct RunContext<'a> {
    pub(crate) canvas: &'a SharedCanvas,
    pub(crate) status: &'a RunStatus,
    pub(crate) ink: PixelColor,
    pub(crate) target_steps: u32,
}

/// Advances the machine until the target step count is reached, a stop
/// request is observed, or the model produces an invalid position.
///
/// Each iteration asks the model for the next pen position, rasterizes
/// the connecting segment, accumulates its Euclidean length and
/// publishes the new step index, in that order. The stop flag is polled
/// once per iteration, so cancellation may overshoot by the in-flight
/// step but never interrupts one.
pub(crate) fn run_steps(
    model: &mut dyn MachineModel,
    context: &RunContext<'_>,
    cadence: &mut dyn Cadence,
) -> RunReport {
    let run_started = Instant::now();
    let origin = model.origin();
    if !origin.is_finite() {
        return RunReport {
            steps: 0,
            travel_distance: 0.0,
            elapsed: run_started.elapsed(),
            outcome: RunOutcome::Failed(RunError::NonFinitePosition { step: 0 }),
        };
    }

    let mut state = MachineState::at_origin(origin);

    let outcome = loop {
        if context.status.stop_requested() {
            break RunOutcome::Stopped;
        }
        if state.step >= context.target_steps {
            break RunOutcome::Completed;
        }

        let step_started = Instant::now();
        let next = model.advance(state.pen, state.step);
        if !next.is_finite() {
            break RunOutcome::Failed(RunError::NonFinitePosition { step: state.step });
        }

        {
            let mut canvas = context.canvas.lock();
            raster::draw_segment(&mut canvas, state.pen, next, context.ink);
        }

        state.travel_distance += f64::from(state.pen.distance(next));
        state.pen = next;
        state.step += 1;
        context.status.publish_step(state.step);
        cadence.after_step(state.step, step_started);
    };

    RunReport {
        steps: state.step,
        travel_distance: state.travel_distance,
        elapsed: run_started.elapsed(),
        outcome,
    }
}
