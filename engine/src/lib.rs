#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation engine for the drawing machine.
//!
//! [`Engine`] owns the run state machine. A call to [`Engine::start`]
//! claims the engine, snapshots the configuration, selects the animated
//! or batch cadence, and launches the stepping loop on a dedicated
//! worker thread; at most one simulation is ever active. Cancellation
//! is cooperative: [`Engine::stop`] raises a flag the worker polls once
//! per step. Both cadences drive the same per-step algorithm, so an
//! animated run and a fast run over the same machine model produce
//! bit-identical drawings.

pub mod machine;
pub mod raster;

mod logic;

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use drawmachine_canvas::SharedCanvas;
use drawmachine_core::{
    PixelColor, ProgressSink, RunOutcome, SharedParams, SimulationConfig, StepLimit,
};
use tracing::{debug, info, warn};

use crate::logic::{AnimatedCadence, BatchCadence, RunContext, RunStatus};
use crate::machine::MachineModel;

/// Orchestrates simulation runs over a shared canvas.
///
/// The engine is owned by the control thread; the canvas handle and the
/// shared parameters may be cloned out for concurrent painting and
/// live tuning while a run is active.
pub struct Engine {
    canvas: SharedCanvas,
    params: Arc<SharedParams>,
    sink: Arc<dyn ProgressSink>,
    status: Arc<RunStatus>,
    step_limit: StepLimit,
    ink: PixelColor,
    worker: Option<JoinHandle<()>>,
}

impl Engine {
    /// Creates an idle engine drawing onto the provided canvas.
    #[must_use]
    pub fn new(
        canvas: SharedCanvas,
        params: Arc<SharedParams>,
        sink: Arc<dyn ProgressSink>,
        step_limit: StepLimit,
        ink: PixelColor,
    ) -> Self {
        Self {
            canvas,
            params,
            sink,
            status: Arc::new(RunStatus::default()),
            step_limit,
            ink,
            worker: None,
        }
    }

    /// Cloneable handle to the canvas the engine draws onto.
    #[must_use]
    pub fn canvas(&self) -> SharedCanvas {
        self.canvas.clone()
    }

    /// Shared live-tunable parameters read by the worker thread.
    #[must_use]
    pub fn params(&self) -> Arc<SharedParams> {
        Arc::clone(&self.params)
    }

    /// Reports whether a simulation run is currently active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    /// Last step index published by the worker thread.
    #[must_use]
    pub fn current_step(&self) -> u32 {
        self.status.current_step()
    }

    /// Starts a new run with the provided configuration and machine
    /// model.
    ///
    /// A call while a run is already active is a silent no-op; callers
    /// gate the action through [`Engine::is_running`]. The target step
    /// count is clamped against the configured limit, surfacing a
    /// warning through the sink, and the clamped values are published to
    /// the shared parameters so the control surface reflects them.
    pub fn start(&mut self, config: SimulationConfig, mut model: Box<dyn MachineModel>) {
        if !self.status.try_begin() {
            debug!("start ignored: a simulation is already running");
            return;
        }

        // The previous worker marked itself idle before try_begin could
        // succeed; reap its handle so the thread is not leaked.
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        let (config, warning) = config.clamped(self.step_limit);
        if let Some(warning) = warning {
            warn!(%warning, "run configuration adjusted");
            self.sink.on_config_warning(&warning);
        }
        self.params.set_speed(config.speed());
        self.params.set_target_steps(config.target_steps());

        info!(
            target_steps = config.target_steps(),
            fast_mode = config.fast_mode(),
            "simulation run started"
        );

        let canvas = self.canvas.clone();
        let params = Arc::clone(&self.params);
        let status = Arc::clone(&self.status);
        let sink = Arc::clone(&self.sink);
        let ink = self.ink;

        self.worker = Some(thread::spawn(move || {
            let context = RunContext {
                canvas: &canvas,
                status: &status,
                ink,
                target_steps: config.target_steps(),
            };

            let report = if config.fast_mode() {
                logic::run_steps(model.as_mut(), &context, &mut BatchCadence)
            } else {
                let mut cadence = AnimatedCadence::new(sink.as_ref(), &params);
                logic::run_steps(model.as_mut(), &context, &mut cadence)
            };

            // Idle must be observable before the completion callback.
            status.finish();

            match report.outcome {
                RunOutcome::Completed => info!(
                    steps = report.steps,
                    travel = report.travel_distance,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "simulation run completed"
                ),
                RunOutcome::Stopped => info!(steps = report.steps, "simulation run stopped"),
                RunOutcome::Failed(error) => {
                    warn!(%error, steps = report.steps, "simulation run failed");
                }
            }

            sink.on_complete(&report);
        }));
    }

    /// Requests cooperative cancellation of the active run.
    ///
    /// Returns immediately; the worker observes the request at its next
    /// per-step check, so the in-flight step is still rasterized.
    pub fn stop(&self) {
        self.status.request_stop();
        debug!("cooperative stop requested");
    }

    /// Clears the canvas back to its background colour.
    ///
    /// Rejected while a run is active. On success the sink is notified
    /// with step zero so observers repaint the blank sheet.
    #[must_use]
    pub fn reset_canvas(&self) -> bool {
        if self.is_running() {
            return false;
        }
        self.canvas.reset();
        self.sink.on_step(0);
        true
    }

    /// Blocks until the active worker thread, if any, has exited.
    ///
    /// Headless adapters and tests use this to wait for the completion
    /// callback of a run they started.
    pub fn join(&mut self) {
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.status.request_stop();
        self.join();
    }
}
