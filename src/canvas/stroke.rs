//! Stroke primitives
//!
//! A stroke is an ordered run of pixel-space points with a kind and a
//! thickness. Open strokes receive smoothed points; sealed strokes are
//! immutable and owned by the canvas.

use std::collections::VecDeque;

use crate::tracking::Point;

/// What a stroke does to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeKind {
    /// Deposits ink.
    Ink,
    /// Paints background over existing ink.
    Erase,
}

/// One drawn stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    kind: StrokeKind,
    /// Full stamp diameter in pixels.
    thickness: f32,
    points: Vec<Point>,
}

impl Stroke {
    pub fn new(kind: StrokeKind, thickness: f32) -> Self {
        Self {
            kind,
            thickness,
            points: Vec::new(),
        }
    }

    pub fn kind(&self) -> StrokeKind {
        self.kind
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn radius(&self) -> f32 {
        self.thickness / 2.0
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub(crate) fn push_point(&mut self, point: Point) {
        self.points.push(point);
    }
}

/// Moving-average smoother over the most recent raw fingertip points.
///
/// Purely a rendering-quality measure against per-frame landmark jitter;
/// temporal gesture stability is the classifier's job, not this one's.
pub struct PointSmoother {
    window: VecDeque<Point>,
    capacity: usize,
}

impl PointSmoother {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Feed one raw point, get the windowed average back.
    pub fn push(&mut self, raw: Point) -> Point {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(raw);

        let n = self.window.len() as f32;
        let (sx, sy) = self
            .window
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / n, sy / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoother_averages_window() {
        let mut smoother = PointSmoother::new(2);
        assert_eq!(smoother.push(Point::new(0.0, 0.0)), Point::new(0.0, 0.0));
        assert_eq!(smoother.push(Point::new(2.0, 4.0)), Point::new(1.0, 2.0));
        // Window slides: (2,4) and (4,0).
        assert_eq!(smoother.push(Point::new(4.0, 0.0)), Point::new(3.0, 2.0));
    }

    #[test]
    fn test_smoother_damps_outlier() {
        let mut smoother = PointSmoother::new(3);
        smoother.push(Point::new(10.0, 10.0));
        smoother.push(Point::new(10.0, 10.0));
        let smoothed = smoother.push(Point::new(40.0, 10.0));
        assert!(smoothed.x < 25.0);
    }

    #[test]
    fn test_stroke_radius() {
        let stroke = Stroke::new(StrokeKind::Ink, 25.0);
        assert!((stroke.radius() - 12.5).abs() < f32::EPSILON);
    }
}
