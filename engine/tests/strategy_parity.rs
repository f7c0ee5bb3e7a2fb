use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::{Arc, Mutex},
};

use drawmachine_canvas::{CanvasSnapshot, PixelCanvas, SharedCanvas, INK_BLACK, PAPER_WHITE};
use drawmachine_core::{
    CanvasDimensions, ConfigWarning, ProgressSink, RunOutcome, RunReport, SharedParams, SimSpeed,
    SimulationConfig, StepLimit, UNTHROTTLED_SPEED,
};
use drawmachine_engine::{machine::MachineModel, Engine};
use glam::Vec2;

/// Pen orbiting the canvas centre on a slowly widening spiral. The
/// position is a pure function of the step index, so repeated runs
/// trace the same path bit for bit.
struct Spiral {
    center: Vec2,
    base_radius: f32,
}

impl MachineModel for Spiral {
    fn origin(&self) -> Vec2 {
        self.center + Vec2::new(self.base_radius, 0.0)
    }

    fn advance(&mut self, _current: Vec2, step: u32) -> Vec2 {
        let angle = (step + 1) as f32 * 0.05;
        let radius = self.base_radius + (step + 1) as f32 * 0.008;
        self.center + Vec2::new(angle.cos(), angle.sin()) * radius
    }
}

#[derive(Default)]
struct CollectingSink {
    reports: Mutex<Vec<RunReport>>,
}

impl ProgressSink for CollectingSink {
    fn on_step(&self, _step: u32) {}

    fn on_complete(&self, report: &RunReport) {
        self.reports.lock().unwrap().push(report.clone());
    }

    fn on_config_warning(&self, _warning: &ConfigWarning) {}
}

fn run_once(fast_mode: bool) -> (CanvasSnapshot, RunReport) {
    let canvas = SharedCanvas::new(PixelCanvas::new(CanvasDimensions::new(96, 96), PAPER_WHITE));
    let params = Arc::new(SharedParams::new(SimSpeed::new(UNTHROTTLED_SPEED), 4000));
    let sink = Arc::new(CollectingSink::default());
    let mut engine = Engine::new(
        canvas,
        params,
        sink.clone(),
        StepLimit::default(),
        INK_BLACK,
    );

    let model = Spiral {
        center: Vec2::new(48.0, 48.0),
        base_radius: 6.0,
    };
    engine.start(
        SimulationConfig::new(4000, SimSpeed::new(UNTHROTTLED_SPEED), fast_mode),
        Box::new(model),
    );
    engine.join();

    let report = sink
        .reports
        .lock()
        .unwrap()
        .pop()
        .expect("run should have completed");
    (engine.canvas().snapshot(), report)
}

fn fingerprint(snapshot: &CanvasSnapshot) -> u64 {
    let mut hasher = DefaultHasher::new();
    for pixel in snapshot.pixels() {
        pixel.hash(&mut hasher);
    }
    hasher.finish()
}

#[test]
fn fast_and_animated_runs_produce_identical_drawings() {
    let (fast_snapshot, fast_report) = run_once(true);
    let (animated_snapshot, animated_report) = run_once(false);

    assert_eq!(fast_report.outcome, RunOutcome::Completed);
    assert_eq!(animated_report.outcome, RunOutcome::Completed);
    assert_eq!(fast_report.steps, animated_report.steps);
    assert_eq!(
        fast_report.travel_distance,
        animated_report.travel_distance,
    );
    assert_eq!(
        fingerprint(&fast_snapshot),
        fingerprint(&animated_snapshot),
        "strategies diverged on the final raster"
    );
    assert_eq!(fast_snapshot.pixels(), animated_snapshot.pixels());
}

#[test]
fn fast_run_replay_is_deterministic() {
    let (first, first_report) = run_once(true);
    let (second, second_report) = run_once(true);

    assert_eq!(first_report.steps, second_report.steps);
    assert_eq!(first_report.travel_distance, second_report.travel_distance);
    assert_eq!(first_report.outcome, second_report.outcome);
    assert_eq!(fingerprint(&first), fingerprint(&second));
}
