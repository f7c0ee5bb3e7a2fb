#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the drawing machine headlessly.
//!
//! Wires a canvas, a sample machine model and a console progress sink
//! into the engine, runs one simulation to completion and prints the
//! summary the windowed monitor would otherwise display.

mod models;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use drawmachine_canvas::{PixelCanvas, SharedCanvas, INK_BLACK, PAPER_WHITE};
use drawmachine_core::{
    CanvasDimensions, ConfigWarning, ProgressSink, RunOutcome, RunReport, SharedParams, SimSpeed,
    SimulationConfig, StepLimit, DEFAULT_STEP_LIMIT, UNTHROTTLED_SPEED,
};
use drawmachine_engine::Engine;
use tracing_subscriber::EnvFilter;

use crate::models::{Hypotrochoid, Lissajous};
use crate::settings::Settings;

const DEFAULT_CANVAS_EDGE: u32 = 800;
const PROGRESS_STRIDE: u32 = 500;

/// Command line options of the headless simulator.
#[derive(Debug, Parser)]
#[command(name = "drawmachine", about = "Headless drawing machine simulator")]
struct Options {
    /// Number of steps to simulate.
    #[arg(long, default_value_t = DEFAULT_STEP_LIMIT)]
    steps: u32,

    /// Speed factor in steps per second; at or above the ceiling the
    /// run is unthrottled.
    #[arg(long, default_value_t = UNTHROTTLED_SPEED)]
    speed: u32,

    /// Run in batch mode without per-step progress.
    #[arg(long)]
    fast: bool,

    /// Machine model tracing the path.
    #[arg(long, value_enum, default_value = "spirograph")]
    model: ModelKind,

    /// Canvas width in pixels; falls back to the settings file.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels; falls back to the settings file.
    #[arg(long)]
    height: Option<u32>,

    /// Optional TOML settings file with machine defaults.
    #[arg(long)]
    settings: Option<PathBuf>,
}

/// Sample machine models selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModelKind {
    /// Lissajous figure driven by two sine oscillators.
    Lissajous,
    /// Hypotrochoid traced by a wheel rolling inside a ring.
    Spirograph,
}

impl ModelKind {
    fn build(self, dimensions: CanvasDimensions) -> Box<dyn drawmachine_engine::machine::MachineModel> {
        match self {
            Self::Lissajous => Box::new(Lissajous::for_canvas(dimensions)),
            Self::Spirograph => Box::new(Hypotrochoid::for_canvas(dimensions)),
        }
    }
}

/// Progress sink that mirrors the windowed monitor on the console.
struct ConsoleSink {
    target_steps: u32,
}

impl ProgressSink for ConsoleSink {
    fn on_step(&self, step: u32) {
        if step % PROGRESS_STRIDE == 0 {
            println!("step {step}/{}", self.target_steps);
        }
    }

    fn on_complete(&self, report: &RunReport) {
        match report.outcome {
            RunOutcome::Completed => println!("run completed"),
            RunOutcome::Stopped => println!("run stopped"),
            RunOutcome::Failed(error) => eprintln!("run failed: {error}"),
        }
        println!("steps: {}", report.steps);
        println!("travel: {:.2}", report.travel_distance / 100.0);
        println!("timer ms: {}", report.elapsed.as_millis());
    }

    fn on_config_warning(&self, warning: &ConfigWarning) {
        eprintln!("warning: {warning}");
    }
}

/// Entry point of the drawing machine command line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = Options::parse();
    let settings = match &options.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let width = options
        .width
        .or(settings.canvas_width)
        .unwrap_or(DEFAULT_CANVAS_EDGE);
    let height = options
        .height
        .or(settings.canvas_height)
        .unwrap_or(DEFAULT_CANVAS_EDGE);
    let dimensions = CanvasDimensions::new(width, height);
    let step_limit = StepLimit::new(settings.max_simulation_steps.unwrap_or(DEFAULT_STEP_LIMIT));

    let canvas = SharedCanvas::new(PixelCanvas::new(dimensions, PAPER_WHITE));
    let speed = SimSpeed::new(options.speed);
    let params = Arc::new(SharedParams::new(speed, options.steps));
    let sink = Arc::new(ConsoleSink {
        target_steps: options.steps.min(step_limit.get()),
    });

    let mut engine = Engine::new(canvas, params, sink, step_limit, INK_BLACK);
    engine.start(
        SimulationConfig::new(options.steps, speed, options.fast),
        options.model.build(dimensions),
    );
    engine.join();

    Ok(())
}
