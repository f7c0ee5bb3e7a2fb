//! Sample machine models shipped with the command line adapter.
//!
//! The engine treats every model as an opaque deterministic rule; these
//! two parametric curves stand in for the wheel-and-arm geometry of a
//! physical drawing machine and are scaled to the configured canvas.

use drawmachine_core::CanvasDimensions;
use drawmachine_engine::machine::MachineModel;
use glam::Vec2;

/// Fraction of the shorter canvas edge the figures may reach.
const FIGURE_MARGIN: f32 = 0.45;

/// Lissajous figure: both axes follow sine oscillators with different
/// frequencies.
pub(crate) struct Lissajous {
    center: Vec2,
    amplitude: f32,
    angular_step: f32,
}

impl Lissajous {
    /// Creates a figure centred on and scaled to the provided canvas.
    pub(crate) fn for_canvas(dimensions: CanvasDimensions) -> Self {
        let width = dimensions.width() as f32;
        let height = dimensions.height() as f32;
        Self {
            center: Vec2::new(width / 2.0, height / 2.0),
            amplitude: FIGURE_MARGIN * width.min(height),
            angular_step: 0.005,
        }
    }

    fn position(&self, t: f32) -> Vec2 {
        let x = (3.0 * t + std::f32::consts::FRAC_PI_2).sin();
        let y = (2.0 * t).sin();
        self.center + Vec2::new(x, y) * self.amplitude
    }
}

impl MachineModel for Lissajous {
    fn origin(&self) -> Vec2 {
        self.position(0.0)
    }

    fn advance(&mut self, _current: Vec2, step: u32) -> Vec2 {
        self.position((step + 1) as f32 * self.angular_step)
    }
}

/// Hypotrochoid: a pen mounted off-centre on a wheel rolling inside a
/// fixed ring, the classic spirograph trace.
pub(crate) struct Hypotrochoid {
    center: Vec2,
    arm: f32,
    pen_offset: f32,
    wheel_ratio: f32,
    scale: f32,
    angular_step: f32,
}

impl Hypotrochoid {
    /// Creates a trace centred on and scaled to the provided canvas.
    ///
    /// Ring, wheel and pen radii are fixed ratios chosen for a dense
    /// figure; only the overall scale follows the canvas.
    pub(crate) fn for_canvas(dimensions: CanvasDimensions) -> Self {
        let width = dimensions.width() as f32;
        let height = dimensions.height() as f32;
        let ring = 1.0f32;
        let wheel = 0.52f32;
        let pen_offset = 0.4f32;
        let arm = ring - wheel;

        Self {
            center: Vec2::new(width / 2.0, height / 2.0),
            arm,
            pen_offset,
            wheel_ratio: arm / wheel,
            scale: FIGURE_MARGIN * width.min(height) / (arm + pen_offset),
            angular_step: 0.02,
        }
    }

    fn position(&self, t: f32) -> Vec2 {
        let x = self.arm * t.cos() + self.pen_offset * (self.wheel_ratio * t).cos();
        let y = self.arm * t.sin() - self.pen_offset * (self.wheel_ratio * t).sin();
        self.center + Vec2::new(x, y) * self.scale
    }
}

impl MachineModel for Hypotrochoid {
    fn origin(&self) -> Vec2 {
        self.position(0.0)
    }

    fn advance(&mut self, _current: Vec2, step: u32) -> Vec2 {
        self.position((step + 1) as f32 * self.angular_step)
    }
}
