//! Renderer trait abstraction.

use kurbo::Point;
use rang_core::stroke::{Stroke, StrokeStyle};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Something strokes can be painted onto.
///
/// Compositing is chosen per paint call from the style's tool: eraser calls
/// remove what is beneath them, every other call paints over it. No call
/// leaves a mode behind for the next one.
pub trait StrokeRenderer {
    /// Paint a polyline with round caps and joins. Fewer than two points
    /// paint nothing.
    fn paint_points(&mut self, points: &[Point], style: &StrokeStyle);

    /// Erase everything.
    fn clear(&mut self);

    /// Paint the newest segment of a stroke in progress.
    fn paint_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        self.paint_points(&[from, to], style);
    }

    /// Paint a committed stroke.
    fn paint_stroke(&mut self, stroke: &Stroke) {
        self.paint_points(&stroke.points, &stroke.style());
    }

    /// Clear, then paint every stroke in ascending timestamp order. Strokes
    /// sharing a timestamp keep their order in `strokes`.
    fn replay(&mut self, strokes: &[Stroke]) {
        let mut ordered: Vec<&Stroke> = strokes.iter().collect();
        ordered.sort_by_key(|s| s.timestamp);

        self.clear();
        for stroke in ordered {
            self.paint_stroke(stroke);
        }
    }
}
