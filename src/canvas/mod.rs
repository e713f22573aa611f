//! Stroke Canvas Layer
//!
//! The accumulating drawing surface: sealed strokes live in an ink mask
//! raster, the single open stroke stays vector-only until it seals, and
//! erasing is a destructive raster overwrite. The mask (rendered black on
//! white by [`Canvas::snapshot`]) is the one and only read path the OCR
//! collaborator sees.

pub mod render;
pub mod stroke;

pub use stroke::{PointSmoother, Stroke, StrokeKind};

use anyhow::{Context, Result};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::drawing::{draw_filled_circle_mut, Canvas as DrawTarget};
use std::path::Path;
use tracing::{debug, info};

use crate::tracking::Point;

/// Mask value for inked pixels.
const INK: u8 = 255;
/// Mask value for blank pixels.
const BLANK: u8 = 0;

struct OpenStroke {
    stroke: Stroke,
    smoother: PointSmoother,
}

/// The accumulating stroke canvas.
pub struct Canvas {
    width: u32,
    height: u32,
    /// Sealed ink only; the open stroke is composited live by the renderer.
    mask: GrayImage,
    strokes: Vec<Stroke>,
    open: Option<OpenStroke>,
    smoothing_window: usize,
    min_point_spacing: f32,
}

impl Canvas {
    pub fn new(width: u32, height: u32, smoothing_window: usize, min_point_spacing: f32) -> Self {
        Self {
            width,
            height,
            mask: GrayImage::from_pixel(width, height, Luma([BLANK])),
            strokes: Vec::new(),
            open: None,
            smoothing_window,
            min_point_spacing,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Open a new stroke, sealing any previous one first.
    pub fn begin_stroke(&mut self, kind: StrokeKind, thickness: f32) {
        self.seal();
        debug!(?kind, thickness, "stroke begun");
        self.open = Some(OpenStroke {
            stroke: Stroke::new(kind, thickness),
            smoother: PointSmoother::new(self.smoothing_window),
        });
    }

    /// Append a fingertip point to the open stroke. Points are smoothed and
    /// thinned; erase strokes overwrite the mask as they go. No-op when
    /// nothing is open.
    pub fn extend(&mut self, point: Point) {
        let Some(open) = self.open.as_mut() else {
            return;
        };
        let smoothed = open.smoother.push(point);

        match open.stroke.points().last().copied() {
            Some(last) => {
                if last.distance(smoothed) < self.min_point_spacing {
                    return;
                }
                if open.stroke.kind() == StrokeKind::Erase {
                    stamp_segment(&mut self.mask, last, smoothed, open.stroke.radius(), Luma([BLANK]));
                }
            }
            None => {
                if open.stroke.kind() == StrokeKind::Erase {
                    stamp_circle(&mut self.mask, smoothed, open.stroke.radius(), Luma([BLANK]));
                }
            }
        }
        open.stroke.push_point(smoothed);
    }

    /// Close the open stroke. Ink is committed to the mask here and the
    /// stroke becomes immutable; an empty open stroke is discarded.
    pub fn seal(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        let stroke = open.stroke;
        if stroke.is_empty() {
            return;
        }
        if stroke.kind() == StrokeKind::Ink {
            rasterize_polyline(&mut self.mask, stroke.points(), stroke.radius(), Luma([INK]));
        }
        debug!(points = stroke.points().len(), "stroke sealed");
        self.strokes.push(stroke);
    }

    /// Pixel-accurate erase: clear ink within `radius` of `point`. This is a
    /// raster overwrite, never stroke deletion.
    pub fn erase(&mut self, point: Point, radius: f32) {
        stamp_circle(&mut self.mask, point, radius, Luma([BLANK]));
    }

    /// Discard every stroke and blank the mask.
    pub fn clear(&mut self) {
        info!("canvas cleared");
        self.mask = GrayImage::from_pixel(self.width, self.height, Luma([BLANK]));
        self.strokes.clear();
        self.open = None;
    }

    /// Render the sealed ink black-on-white. Side-effect free; this is the
    /// image the OCR collaborator reads and the save command exports.
    pub fn snapshot(&self) -> GrayImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| {
            Luma([u8::MAX - self.mask.get_pixel(x, y)[0]])
        })
    }

    /// Export the snapshot to `path` (format from the extension).
    pub fn export(&self, path: &Path) -> Result<()> {
        self.snapshot()
            .save(path)
            .with_context(|| format!("failed to export canvas to {}", path.display()))?;
        info!(path = %path.display(), "canvas exported");
        Ok(())
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn open_stroke(&self) -> Option<&Stroke> {
        self.open.as_ref().map(|o| &o.stroke)
    }

    pub fn mask(&self) -> &GrayImage {
        &self.mask
    }

    pub fn is_blank(&self) -> bool {
        self.mask.pixels().all(|p| p[0] == BLANK)
    }
}

/// Stamp a filled circle, clipped to the target.
pub(crate) fn stamp_circle<C>(target: &mut C, center: Point, radius: f32, color: C::Pixel)
where
    C: DrawTarget,
    C::Pixel: Copy,
{
    draw_filled_circle_mut(
        target,
        (center.x.round() as i32, center.y.round() as i32),
        radius.round().max(1.0) as i32,
        color,
    );
}

/// Stamp circles along a segment at roughly one-pixel spacing, giving thick
/// continuous lines without gaps on fast fingertip motion.
pub(crate) fn stamp_segment<C>(target: &mut C, a: Point, b: Point, radius: f32, color: C::Pixel)
where
    C: DrawTarget,
    C::Pixel: Copy,
{
    let steps = a.distance(b).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let p = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
        stamp_circle(target, p, radius, color);
    }
}

/// Stamp a full polyline (used when an ink stroke commits at seal time).
pub(crate) fn rasterize_polyline<C>(target: &mut C, points: &[Point], radius: f32, color: C::Pixel)
where
    C: DrawTarget,
    C::Pixel: Copy,
{
    match points {
        [] => {}
        [single] => stamp_circle(target, *single, radius, color),
        _ => {
            for pair in points.windows(2) {
                stamp_segment(target, pair[0], pair[1], radius, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        // No smoothing, no thinning: tests control exact geometry.
        Canvas::new(200, 200, 1, 0.0)
    }

    fn draw_sealed_line(c: &mut Canvas, from: Point, to: Point) {
        c.begin_stroke(StrokeKind::Ink, 10.0);
        c.extend(from);
        c.extend(to);
        c.seal();
    }

    #[test]
    fn test_open_stroke_not_in_mask_until_sealed() {
        let mut c = canvas();
        c.begin_stroke(StrokeKind::Ink, 10.0);
        c.extend(Point::new(100.0, 100.0));
        assert!(c.is_blank());

        c.seal();
        assert!(!c.is_blank());
        assert_eq!(c.mask().get_pixel(100, 100)[0], INK);
    }

    #[test]
    fn test_seal_then_extend_does_not_mutate_sealed_stroke() {
        let mut c = canvas();
        draw_sealed_line(&mut c, Point::new(50.0, 50.0), Point::new(50.0, 150.0));
        let sealed = c.strokes()[0].clone();

        // Extending with nothing open is a no-op.
        c.extend(Point::new(150.0, 150.0));
        assert_eq!(c.strokes()[0], sealed);

        // Extending a fresh stroke leaves the sealed one alone too.
        c.begin_stroke(StrokeKind::Ink, 10.0);
        c.extend(Point::new(150.0, 150.0));
        assert_eq!(c.strokes()[0], sealed);
        assert_eq!(c.strokes().len(), 1);
    }

    #[test]
    fn test_clear_restores_blank_snapshot() {
        let mut c = canvas();
        let blank = c.snapshot();

        draw_sealed_line(&mut c, Point::new(20.0, 20.0), Point::new(180.0, 180.0));
        c.begin_stroke(StrokeKind::Ink, 10.0);
        c.extend(Point::new(10.0, 10.0));
        assert_ne!(c.snapshot().as_raw(), blank.as_raw());

        c.clear();
        assert_eq!(c.snapshot().as_raw(), blank.as_raw());
        assert!(c.strokes().is_empty());
        assert!(c.open_stroke().is_none());
    }

    #[test]
    fn test_erase_clears_only_within_radius() {
        let mut c = canvas();
        draw_sealed_line(&mut c, Point::new(50.0, 100.0), Point::new(150.0, 100.0));

        c.erase(Point::new(100.0, 100.0), 10.0);
        assert_eq!(c.mask().get_pixel(100, 100)[0], BLANK);
        // Ink well outside the radius survives.
        assert_eq!(c.mask().get_pixel(60, 100)[0], INK);
        assert_eq!(c.mask().get_pixel(140, 100)[0], INK);
    }

    #[test]
    fn test_erase_stroke_overwrites_as_it_extends() {
        let mut c = canvas();
        draw_sealed_line(&mut c, Point::new(50.0, 100.0), Point::new(150.0, 100.0));

        c.begin_stroke(StrokeKind::Erase, 20.0);
        c.extend(Point::new(80.0, 100.0));
        c.extend(Point::new(120.0, 100.0));
        // Destructive before sealing.
        assert_eq!(c.mask().get_pixel(100, 100)[0], BLANK);
        c.seal();
        assert_eq!(c.strokes().len(), 2);
    }

    #[test]
    fn test_min_spacing_thins_points() {
        let mut c = Canvas::new(200, 200, 1, 5.0);
        c.begin_stroke(StrokeKind::Ink, 10.0);
        c.extend(Point::new(100.0, 100.0));
        c.extend(Point::new(101.0, 100.0));
        c.extend(Point::new(102.0, 100.0));
        c.extend(Point::new(110.0, 100.0));
        assert_eq!(c.open_stroke().unwrap().points().len(), 2);
    }

    #[test]
    fn test_empty_open_stroke_discarded_on_seal() {
        let mut c = canvas();
        c.begin_stroke(StrokeKind::Ink, 10.0);
        c.seal();
        assert!(c.strokes().is_empty());
    }

    #[test]
    fn test_begin_stroke_seals_previous() {
        let mut c = canvas();
        c.begin_stroke(StrokeKind::Ink, 10.0);
        c.extend(Point::new(30.0, 30.0));
        c.begin_stroke(StrokeKind::Ink, 10.0);
        assert_eq!(c.strokes().len(), 1);
        assert!(!c.is_blank());
    }

    #[test]
    fn test_snapshot_is_black_on_white() {
        let mut c = canvas();
        assert_eq!(c.snapshot().get_pixel(0, 0)[0], 255);

        draw_sealed_line(&mut c, Point::new(100.0, 100.0), Point::new(100.0, 100.0));
        assert_eq!(c.snapshot().get_pixel(100, 100)[0], 0);
    }

    #[test]
    fn test_export_writes_image_file() {
        let mut c = canvas();
        draw_sealed_line(&mut c, Point::new(20.0, 20.0), Point::new(60.0, 60.0));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.png");
        c.export(&path).unwrap();

        let reloaded = image::open(&path).unwrap().into_luma8();
        assert_eq!(reloaded.dimensions(), (200, 200));
        assert_eq!(reloaded.get_pixel(40, 40)[0], 0);
    }
}
