#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative pixel raster for the drawing machine simulator.
//!
//! [`PixelCanvas`] owns the dense colour grid the worker thread draws
//! into. [`SharedCanvas`] wraps it in a cloneable handle so the control
//! surface can take paint snapshots while a run is writing: the writer
//! holds the lock only for the duration of a single segment or copy.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use drawmachine_core::{CanvasDimensions, PixelColor};

/// Background colour of a freshly prepared sheet of paper.
pub const PAPER_WHITE: PixelColor = PixelColor::from_rgb(255, 255, 255);

/// Ink colour used for the traced path unless the caller picks another.
pub const INK_BLACK: PixelColor = PixelColor::from_rgb(0, 0, 0);

/// Fixed-size raster buffer the machine draws onto.
///
/// Coordinates are addressed as `(x, y)` with the origin in the top-left
/// corner. Writes outside `[0, width) × [0, height)` are silently
/// ignored so that a pen wandering off the paper clips instead of
/// failing the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelCanvas {
    dimensions: CanvasDimensions,
    background: PixelColor,
    pixels: Vec<PixelColor>,
}

impl PixelCanvas {
    /// Creates a canvas with every cell set to the background colour.
    #[must_use]
    pub fn new(dimensions: CanvasDimensions, background: PixelColor) -> Self {
        Self {
            dimensions,
            background,
            pixels: vec![background; dimensions.cell_count()],
        }
    }

    /// Raster dimensions fixed at construction.
    #[must_use]
    pub const fn dimensions(&self) -> CanvasDimensions {
        self.dimensions
    }

    /// Background colour restored by [`PixelCanvas::reset`].
    #[must_use]
    pub const fn background(&self) -> PixelColor {
        self.background
    }

    /// Writes a colour at the provided coordinate.
    ///
    /// Out-of-range coordinates are silently dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: PixelColor) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = color;
        }
    }

    /// Reads the colour at the provided coordinate, if it is in range.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<PixelColor> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    /// Restores every cell to the background colour.
    pub fn reset(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Captures a point-in-time copy of the raster for painting.
    #[must_use]
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            dimensions: self.dimensions,
            pixels: self.pixels.clone(),
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let width = self.dimensions.width();
        let height = self.dimensions.height();
        if x < 0 || y < 0 {
            return None;
        }

        let x = x as u32;
        let y = y as u32;
        if x < width && y < height {
            Some(y as usize * width as usize + x as usize)
        } else {
            None
        }
    }
}

/// Immutable copy of the raster taken while a run may still be writing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanvasSnapshot {
    dimensions: CanvasDimensions,
    pixels: Vec<PixelColor>,
}

impl CanvasSnapshot {
    /// Raster dimensions of the captured canvas.
    #[must_use]
    pub const fn dimensions(&self) -> CanvasDimensions {
        self.dimensions
    }

    /// Reads the captured colour at the provided coordinate.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<PixelColor> {
        if x < self.dimensions.width() && y < self.dimensions.height() {
            let index = y as usize * self.dimensions.width() as usize + x as usize;
            Some(self.pixels[index])
        } else {
            None
        }
    }

    /// Row-major slice of the captured cells.
    #[must_use]
    pub fn pixels(&self) -> &[PixelColor] {
        &self.pixels
    }
}

/// Cloneable handle sharing one canvas between the worker and readers.
#[derive(Clone, Debug)]
pub struct SharedCanvas {
    dimensions: CanvasDimensions,
    inner: Arc<Mutex<PixelCanvas>>,
}

impl SharedCanvas {
    /// Wraps the provided canvas in a shared handle.
    #[must_use]
    pub fn new(canvas: PixelCanvas) -> Self {
        Self {
            dimensions: canvas.dimensions(),
            inner: Arc::new(Mutex::new(canvas)),
        }
    }

    /// Raster dimensions, readable without taking the lock.
    #[must_use]
    pub const fn dimensions(&self) -> CanvasDimensions {
        self.dimensions
    }

    /// Locks the canvas for exclusive write access.
    ///
    /// The writer is expected to hold the guard only for the duration of
    /// a single rasterized segment so that paint snapshots stay cheap.
    #[must_use]
    pub fn lock(&self) -> MutexGuard<'_, PixelCanvas> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Captures a copy of the raster without blocking the writer beyond
    /// the duration of the copy itself.
    #[must_use]
    pub fn snapshot(&self) -> CanvasSnapshot {
        self.lock().snapshot()
    }

    /// Restores every cell to the background colour.
    pub fn reset(&self) {
        self.lock().reset();
    }
}
