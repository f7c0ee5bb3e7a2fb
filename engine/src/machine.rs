//! Pluggable machine model seam.

use glam::Vec2;

/// Deterministic rule that evolves the pen position one step at a time.
///
/// The engine treats the rule as opaque: it never inspects the
/// mathematics behind a model, only the positions it returns. A model
/// must be deterministic for a given construction so that batch and
/// animated runs trace bit-identical paths. Models may keep internal
/// state, which is why [`MachineModel::advance`] takes `&mut self`; the
/// worker thread owns the model for the duration of a run.
pub trait MachineModel: Send {
    /// Pen position before the first step.
    fn origin(&self) -> Vec2;

    /// Computes the pen position after the step with the provided
    /// zero-based index.
    fn advance(&mut self, current: Vec2, step: u32) -> Vec2;
}

/// Mutable state carried through a run by the worker thread.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MachineState {
    /// Current pen position in canvas coordinates.
    pub(crate) pen: Vec2,
    /// Number of steps completed so far.
    pub(crate) step: u32,
    /// Cumulative Euclidean length of all rasterized segments.
    pub(crate) travel_distance: f64,
}

impl MachineState {
    /// Creates the initial state for a run starting at the model origin.
    pub(crate) fn at_origin(origin: Vec2) -> Self {
        Self {
            pen: origin,
            step: 0,
            travel_distance: 0.0,
        }
    }
}
