#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the drawing machine simulator.
//!
//! This crate defines the vocabulary that connects the control surface,
//! the canvas, and the simulation engine: colour and dimension value
//! types, the run configuration with its clamping rules, the shared
//! live-tunable parameters read by the worker thread, and the progress
//! sink through which the engine reports back to its observer.

use std::{
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Speed factor at or above which the animated run stops throttling.
pub const UNTHROTTLED_SPEED: u32 = 1000;

/// Default upper bound for the target step count of a single run.
pub const DEFAULT_STEP_LIMIT: u32 = 10_000;

/// Opaque RGB colour stored in a canvas cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl PixelColor {
    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Fixed raster dimensions of a canvas, established at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasDimensions {
    width: u32,
    height: u32,
}

impl CanvasDimensions {
    /// Creates new canvas dimensions. Zero extents are coerced to one so
    /// that a canvas always contains at least a single addressable cell.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        let width = if width == 0 { 1 } else { width };
        let height = if height == 0 { 1 } else { height };
        Self { width, height }
    }

    /// Number of pixel columns in the canvas.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of pixel rows in the canvas.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells contained in the raster.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Speed factor of an animated run, expressed in steps per second.
///
/// The control surface presents the factor divided by ten with an "x"
/// suffix; the top of the range reads as unthrottled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimSpeed(u32);

impl SimSpeed {
    /// Creates a new speed factor. Zero is coerced to one.
    #[must_use]
    pub const fn new(factor: u32) -> Self {
        Self(if factor == 0 { 1 } else { factor })
    }

    /// Retrieves the raw steps-per-second factor.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the factor disables throttling entirely.
    #[must_use]
    pub const fn is_unthrottled(&self) -> bool {
        self.0 >= UNTHROTTLED_SPEED
    }

    /// Time budget of a single step, or `None` when unthrottled.
    #[must_use]
    pub fn step_period(&self) -> Option<Duration> {
        if self.is_unthrottled() {
            None
        } else {
            Some(Duration::from_secs_f64(1.0 / f64::from(self.0)))
        }
    }
}

/// Configured upper bound that run targets are validated against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepLimit(u32);

impl StepLimit {
    /// Creates a new step limit. Zero is coerced to one.
    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self(if limit == 0 { 1 } else { limit })
    }

    /// Retrieves the maximum permitted target step count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for StepLimit {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_LIMIT)
    }
}

/// Parameters of a single simulation run, captured when the run starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    target_steps: u32,
    speed: SimSpeed,
    fast_mode: bool,
}

impl SimulationConfig {
    /// Creates a new run configuration. A zero step target is coerced to
    /// one so that every run performs at least a single step.
    #[must_use]
    pub const fn new(target_steps: u32, speed: SimSpeed, fast_mode: bool) -> Self {
        Self {
            target_steps: if target_steps == 0 { 1 } else { target_steps },
            speed,
            fast_mode,
        }
    }

    /// Number of steps the run is asked to perform.
    #[must_use]
    pub const fn target_steps(&self) -> u32 {
        self.target_steps
    }

    /// Speed factor the animated cadence starts from.
    #[must_use]
    pub const fn speed(&self) -> SimSpeed {
        self.speed
    }

    /// Whether the run executes in unthrottled batch mode.
    #[must_use]
    pub const fn fast_mode(&self) -> bool {
        self.fast_mode
    }

    /// Validates the target step count against the provided limit.
    ///
    /// A target above the limit is clamped and the returned warning
    /// describes the adjustment; the run proceeds with the clamped value.
    #[must_use]
    pub fn clamped(self, limit: StepLimit) -> (Self, Option<ConfigWarning>) {
        if self.target_steps <= limit.get() {
            return (self, None);
        }

        let warning = ConfigWarning::StepCountClamped {
            requested: self.target_steps,
            limit: limit.get(),
        };
        let clamped = Self {
            target_steps: limit.get(),
            ..self
        };
        (clamped, Some(warning))
    }
}

/// Live-tunable run parameters shared between the control surface and
/// the worker thread.
///
/// The animated cadence re-reads the speed on every iteration, so slider
/// changes take effect mid-run; the target step count is only read when
/// a run starts.
#[derive(Debug)]
pub struct SharedParams {
    speed: AtomicU32,
    target_steps: AtomicU32,
}

impl SharedParams {
    /// Creates shared parameters seeded with the provided values.
    #[must_use]
    pub fn new(speed: SimSpeed, target_steps: u32) -> Self {
        Self {
            speed: AtomicU32::new(speed.get()),
            target_steps: AtomicU32::new(target_steps),
        }
    }

    /// Current speed factor.
    #[must_use]
    pub fn speed(&self) -> SimSpeed {
        SimSpeed::new(self.speed.load(Ordering::Relaxed))
    }

    /// Publishes a new speed factor to the worker thread.
    pub fn set_speed(&self, speed: SimSpeed) {
        self.speed.store(speed.get(), Ordering::Relaxed);
    }

    /// Current target step count.
    #[must_use]
    pub fn target_steps(&self) -> u32 {
        self.target_steps.load(Ordering::Relaxed)
    }

    /// Publishes a new target step count for subsequent runs.
    pub fn set_target_steps(&self, target_steps: u32) {
        self.target_steps.store(target_steps, Ordering::Relaxed);
    }
}

/// Recoverable configuration adjustments surfaced to the observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    /// The requested target step count exceeded the configured limit.
    #[error("requested {requested} steps exceeds the permitted maximum of {limit}")]
    StepCountClamped {
        /// Step count the caller asked for.
        requested: u32,
        /// Maximum the target was clamped to.
        limit: u32,
    },
}

/// Fatal conditions that end a run before its target is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RunError {
    /// The machine model produced a non-finite pen position.
    #[error("machine model produced a non-finite position at step {step}")]
    NonFinitePosition {
        /// Step index at which the invalid position was observed.
        step: u32,
    },
}

/// Terminal state of a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run rasterized every requested step.
    Completed,
    /// A cooperative stop request ended the run early.
    Stopped,
    /// The run was aborted by a fatal condition.
    Failed(RunError),
}

/// Summary delivered to the observer when a run ends.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Number of steps that were rasterized before the run ended.
    pub steps: u32,
    /// Cumulative Euclidean length of all rasterized segments, in pixels.
    pub travel_distance: f64,
    /// Wall-clock duration between run start and the terminal step.
    pub elapsed: Duration,
    /// How the run ended.
    pub outcome: RunOutcome,
}

/// Observer that receives progress notifications from the worker thread.
///
/// Callbacks are invoked on the worker thread; implementations marshal
/// any UI mutation back to their own thread themselves. Step callbacks
/// arrive in strictly increasing order and the completion callback is
/// the last observable event of a run.
pub trait ProgressSink: Send + Sync {
    /// Reports that the animated cadence finished rasterizing a step.
    fn on_step(&self, step: u32);

    /// Reports that the run ended, in whichever terminal state.
    fn on_complete(&self, report: &RunReport);

    /// Reports a recoverable configuration adjustment made at run start.
    fn on_config_warning(&self, warning: &ConfigWarning);
}
