//! Deterministic segment rasterization shared by both run cadences.

use drawmachine_canvas::PixelCanvas;
use drawmachine_core::PixelColor;
use glam::Vec2;

/// Rasterizes the line segment between two pen positions.
///
/// The segment is first clipped against the raster rectangle so that a
/// pen far off the paper never inflates the walk, then traced with an
/// integer Bresenham walk. The covered cells are a pure function of the
/// two endpoints, which keeps batch and animated runs pixel-identical
/// for the same path. Both endpoints are plotted; cells outside the
/// raster are dropped by the canvas itself.
pub fn draw_segment(canvas: &mut PixelCanvas, from: Vec2, to: Vec2, ink: PixelColor) {
    let width = canvas.dimensions().width() as f32;
    let height = canvas.dimensions().height() as f32;

    let Some((from, to)) = clip_to_rect(from, to, width, height) else {
        return;
    };

    let mut x0 = from.x.round() as i64;
    let mut y0 = from.y.round() as i64;
    let x1 = to.x.round() as i64;
    let y1 = to.y.round() as i64;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let step_x = if x0 < x1 { 1 } else { -1 };
    let step_y = if y0 < y1 { 1 } else { -1 };
    let mut error = dx + dy;

    loop {
        plot(canvas, x0, y0, ink);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            x0 += step_x;
        }
        if doubled <= dx {
            error += dx;
            y0 += step_y;
        }
    }
}

fn plot(canvas: &mut PixelCanvas, x: i64, y: i64, ink: PixelColor) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        canvas.set_pixel(x, y, ink);
    }
}

/// Liang-Barsky clip against the raster rectangle, padded by half a
/// cell so that boundary positions still round into range.
fn clip_to_rect(from: Vec2, to: Vec2, width: f32, height: f32) -> Option<(Vec2, Vec2)> {
    let min_x = -0.5f32;
    let min_y = -0.5f32;
    let max_x = width - 0.5;
    let max_y = height - 0.5;

    let delta = to - from;
    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;

    let boundaries = [
        (-delta.x, from.x - min_x),
        (delta.x, max_x - from.x),
        (-delta.y, from.y - min_y),
        (delta.y, max_y - from.y),
    ];

    for (direction, distance) in boundaries {
        if direction == 0.0 {
            if distance < 0.0 {
                return None;
            }
            continue;
        }

        let t = distance / direction;
        if direction < 0.0 {
            if t > t_exit {
                return None;
            }
            if t > t_enter {
                t_enter = t;
            }
        } else {
            if t < t_enter {
                return None;
            }
            if t < t_exit {
                t_exit = t;
            }
        }
    }

    Some((from + delta * t_enter, from + delta * t_exit))
}

#[cfg(test)]
mod tests {
    use super::draw_segment;
    use drawmachine_canvas::{PixelCanvas, INK_BLACK, PAPER_WHITE};
    use drawmachine_core::CanvasDimensions;
    use glam::Vec2;

    fn canvas(width: u32, height: u32) -> PixelCanvas {
        PixelCanvas::new(CanvasDimensions::new(width, height), PAPER_WHITE)
    }

    fn inked_cells(canvas: &PixelCanvas) -> Vec<(i32, i32)> {
        let mut cells = Vec::new();
        for y in 0..canvas.dimensions().height() as i32 {
            for x in 0..canvas.dimensions().width() as i32 {
                if canvas.pixel(x, y) == Some(INK_BLACK) {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    #[test]
    fn horizontal_segment_covers_every_cell_between_endpoints() {
        let mut canvas = canvas(8, 3);
        draw_segment(&mut canvas, Vec2::new(1.0, 1.0), Vec2::new(6.0, 1.0), INK_BLACK);
        assert_eq!(
            inked_cells(&canvas),
            vec![(1, 1), (2, 1), (3, 1), (4, 1), (5, 1), (6, 1)]
        );
    }

    #[test]
    fn vertical_segment_covers_every_cell_between_endpoints() {
        let mut canvas = canvas(3, 6);
        draw_segment(&mut canvas, Vec2::new(1.0, 0.0), Vec2::new(1.0, 4.0), INK_BLACK);
        assert_eq!(
            inked_cells(&canvas),
            vec![(1, 0), (1, 1), (1, 2), (1, 3), (1, 4)]
        );
    }

    #[test]
    fn diagonal_segment_walks_the_main_diagonal() {
        let mut canvas = canvas(4, 4);
        draw_segment(&mut canvas, Vec2::ZERO, Vec2::new(3.0, 3.0), INK_BLACK);
        assert_eq!(inked_cells(&canvas), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn zero_length_segment_plots_a_single_cell() {
        let mut canvas = canvas(3, 3);
        draw_segment(&mut canvas, Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0), INK_BLACK);
        assert_eq!(inked_cells(&canvas), vec![(1, 1)]);
    }

    #[test]
    fn segment_fully_outside_the_raster_draws_nothing() {
        let mut canvas = canvas(4, 4);
        draw_segment(
            &mut canvas,
            Vec2::new(-100.0, -100.0),
            Vec2::new(-50.0, -40.0),
            INK_BLACK,
        );
        assert!(inked_cells(&canvas).is_empty());
    }

    #[test]
    fn segment_entering_the_raster_clips_silently() {
        let mut canvas = canvas(5, 3);
        draw_segment(&mut canvas, Vec2::new(-4.0, 1.0), Vec2::new(3.0, 1.0), INK_BLACK);
        assert_eq!(inked_cells(&canvas), vec![(0, 1), (1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn distant_endpoint_terminates_after_the_clipped_walk() {
        let mut canvas = canvas(16, 16);
        draw_segment(
            &mut canvas,
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0e9, 1.0e9),
            INK_BLACK,
        );
        assert!(inked_cells(&canvas).contains(&(1, 1)));
        assert!(inked_cells(&canvas).contains(&(15, 15)));
    }
}
