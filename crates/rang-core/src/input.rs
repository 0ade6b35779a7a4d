//! Pointer and touch sampling into stroke points.
//!
//! Device events arrive in client coordinates. The sampler subtracts the
//! drawing surface's origin so every point it produces is surface-local, and
//! tracks the press/move/release cycle of a single stroke.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Device input, unified across mouse and touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Mouse button pressed at a client position.
    Down { position: Point },
    /// Mouse moved to a client position.
    Move { position: Point },
    /// Mouse button released.
    Up,
    /// Pointer left the drawing surface.
    Leave,
    /// Touch began; `touches` lists the active contacts, primary first.
    TouchStart { touches: Vec<Point> },
    /// Touch contacts moved.
    TouchMove { touches: Vec<Point> },
    /// Touch ended.
    TouchEnd,
}

/// Signal raised when a stroke begins or ends, consumed by presence reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingSignal {
    Started,
    Ended,
}

/// Outcome of feeding one event to the sampler.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    /// The event did not affect stroke capture.
    Ignored,
    /// A stroke began at `point`.
    Started { point: Point },
    /// The stroke was extended by the segment `from` → `to`.
    Extended { from: Point, to: Point },
    /// The stroke ended; `points` is the full captured sequence.
    Ended { points: Vec<Point> },
}

impl Sample {
    /// Presence signal carried by this sample, if any.
    pub fn signal(&self) -> Option<DrawingSignal> {
        match self {
            Sample::Started { .. } => Some(DrawingSignal::Started),
            Sample::Ended { .. } => Some(DrawingSignal::Ended),
            Sample::Ignored | Sample::Extended { .. } => None,
        }
    }
}

/// Captures one stroke at a time from a device event stream.
#[derive(Debug, Clone, Default)]
pub struct StrokeSampler {
    /// Client-space position of the surface's top-left corner.
    origin: Vec2,
    /// Points of the stroke in progress (`None` when idle).
    current: Option<Vec<Point>>,
}

impl StrokeSampler {
    /// Create a sampler for a surface whose top-left corner is at the client origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sampler for a surface offset from the client origin.
    pub fn with_origin(origin: Point) -> Self {
        Self {
            origin: origin.to_vec2(),
            current: None,
        }
    }

    /// Update the surface origin (e.g. after the surface moved or resized).
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin.to_vec2();
    }

    /// Whether a stroke is being captured.
    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    /// Points captured so far in the current stroke.
    pub fn points(&self) -> &[Point] {
        self.current.as_deref().unwrap_or(&[])
    }

    /// Convert a client position into surface-local coordinates.
    pub fn to_surface(&self, client: Point) -> Point {
        client - self.origin
    }

    /// Feed one device event.
    pub fn handle(&mut self, event: PointerEvent) -> Sample {
        match event {
            PointerEvent::Down { position } => self.press(position),
            PointerEvent::TouchStart { touches } => match touches.first() {
                Some(&primary) => self.press(primary),
                None => Sample::Ignored,
            },
            PointerEvent::Move { position } => self.motion(position),
            PointerEvent::TouchMove { touches } => match touches.first() {
                Some(&primary) => self.motion(primary),
                None => Sample::Ignored,
            },
            PointerEvent::Up | PointerEvent::Leave | PointerEvent::TouchEnd => self.release(),
        }
    }

    fn press(&mut self, client: Point) -> Sample {
        if self.current.is_some() {
            // A second contact while drawing does not restart the stroke.
            return Sample::Ignored;
        }
        let point = self.to_surface(client);
        self.current = Some(vec![point]);
        Sample::Started { point }
    }

    fn motion(&mut self, client: Point) -> Sample {
        let to = self.to_surface(client);
        let Some(points) = self.current.as_mut() else {
            return Sample::Ignored;
        };
        let from = points.last().copied().unwrap_or(to);
        points.push(to);
        Sample::Extended { from, to }
    }

    fn release(&mut self) -> Sample {
        match self.current.take() {
            Some(points) => Sample::Ended { points },
            None => Sample::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_move_release() {
        let mut sampler = StrokeSampler::new();

        let started = sampler.handle(PointerEvent::Down { position: Point::new(10.0, 10.0) });
        assert_eq!(started, Sample::Started { point: Point::new(10.0, 10.0) });
        assert_eq!(started.signal(), Some(DrawingSignal::Started));
        assert!(sampler.is_drawing());

        let moved = sampler.handle(PointerEvent::Move { position: Point::new(20.0, 15.0) });
        assert_eq!(
            moved,
            Sample::Extended { from: Point::new(10.0, 10.0), to: Point::new(20.0, 15.0) }
        );
        assert_eq!(moved.signal(), None);

        let ended = sampler.handle(PointerEvent::Up);
        assert_eq!(ended.signal(), Some(DrawingSignal::Ended));
        match ended {
            Sample::Ended { points } => {
                assert_eq!(points, vec![Point::new(10.0, 10.0), Point::new(20.0, 15.0)]);
            }
            other => panic!("expected Ended, got {other:?}"),
        }
        assert!(!sampler.is_drawing());
    }

    #[test]
    fn test_one_point_per_move() {
        let mut sampler = StrokeSampler::new();
        sampler.handle(PointerEvent::Down { position: Point::ZERO });
        for i in 1..=5 {
            sampler.handle(PointerEvent::Move { position: Point::new(i as f64, 0.0) });
        }
        assert_eq!(sampler.points().len(), 6);
    }

    #[test]
    fn test_origin_offset() {
        let mut sampler = StrokeSampler::with_origin(Point::new(100.0, 50.0));
        sampler.handle(PointerEvent::Down { position: Point::new(110.0, 75.0) });
        assert_eq!(sampler.points(), &[Point::new(10.0, 25.0)]);

        sampler.set_origin(Point::new(0.0, 0.0));
        sampler.handle(PointerEvent::Move { position: Point::new(30.0, 30.0) });
        assert_eq!(sampler.points()[1], Point::new(30.0, 30.0));
    }

    #[test]
    fn test_touch_uses_primary_contact() {
        let mut sampler = StrokeSampler::with_origin(Point::new(5.0, 5.0));
        sampler.handle(PointerEvent::TouchStart {
            touches: vec![Point::new(15.0, 15.0), Point::new(200.0, 200.0)],
        });
        sampler.handle(PointerEvent::TouchMove {
            touches: vec![Point::new(25.0, 15.0), Point::new(300.0, 300.0)],
        });
        let ended = sampler.handle(PointerEvent::TouchEnd);
        assert_eq!(
            ended,
            Sample::Ended { points: vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0)] }
        );
    }

    #[test]
    fn test_empty_touch_list_ignored() {
        let mut sampler = StrokeSampler::new();
        assert_eq!(sampler.handle(PointerEvent::TouchStart { touches: vec![] }), Sample::Ignored);
        assert!(!sampler.is_drawing());
    }

    #[test]
    fn test_move_without_press_ignored() {
        let mut sampler = StrokeSampler::new();
        assert_eq!(
            sampler.handle(PointerEvent::Move { position: Point::new(1.0, 1.0) }),
            Sample::Ignored
        );
        assert_eq!(sampler.handle(PointerEvent::Up), Sample::Ignored);
    }

    #[test]
    fn test_leave_ends_stroke() {
        let mut sampler = StrokeSampler::new();
        sampler.handle(PointerEvent::Down { position: Point::ZERO });
        let ended = sampler.handle(PointerEvent::Leave);
        assert_eq!(ended.signal(), Some(DrawingSignal::Ended));
    }

    #[test]
    fn test_second_press_does_not_restart() {
        let mut sampler = StrokeSampler::new();
        sampler.handle(PointerEvent::Down { position: Point::ZERO });
        sampler.handle(PointerEvent::Move { position: Point::new(4.0, 0.0) });
        assert_eq!(
            sampler.handle(PointerEvent::Down { position: Point::new(50.0, 50.0) }),
            Sample::Ignored
        );
        assert_eq!(sampler.points().len(), 2);
    }
}
