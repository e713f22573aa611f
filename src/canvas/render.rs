//! Frame compositor
//!
//! Blends the camera frame, the sealed ink mask, the live open stroke, the
//! header strip and the fingertip cursor into the image the presenter shows.
//! The open stroke is drawn here from its vector points so the display
//! tracks the fingertip even though the mask only holds sealed ink.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::intent::{HeaderLayout, PaintMode};
use crate::tracking::Point;

use super::{rasterize_polyline, stamp_circle, Canvas, StrokeKind};

/// Colors and cursor geometry for the composite.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub brush_color: Rgba<u8>,
    pub header_background: Rgba<u8>,
    pub button_fill: Rgba<u8>,
    pub active_button_fill: Rgba<u8>,
    pub cursor_radius: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            brush_color: Rgba([255, 0, 255, 255]),
            header_background: Rgba([35, 35, 35, 255]),
            button_fill: Rgba([90, 90, 90, 255]),
            active_button_fill: Rgba([190, 60, 190, 255]),
            cursor_radius: 15.0,
        }
    }
}

/// Compose one output frame in place.
pub fn compose(
    frame: &mut RgbaImage,
    canvas: &Canvas,
    layout: &HeaderLayout,
    mode: PaintMode,
    fingertip: Option<Point>,
    style: &RenderStyle,
) {
    paint_sealed_ink(frame, canvas, style);
    paint_open_stroke(frame, canvas, style);
    paint_header(frame, layout, mode, style);
    if let Some(tip) = fingertip {
        stamp_circle(frame, tip, style.cursor_radius, style.brush_color);
    }
}

/// Replace frame pixels wherever the mask holds ink.
fn paint_sealed_ink(frame: &mut RgbaImage, canvas: &Canvas, style: &RenderStyle) {
    let mask = canvas.mask();
    let (w, h) = frame.dimensions();
    for y in 0..h.min(mask.height()) {
        for x in 0..w.min(mask.width()) {
            if mask.get_pixel(x, y)[0] > 0 {
                frame.put_pixel(x, y, style.brush_color);
            }
        }
    }
}

fn paint_open_stroke(frame: &mut RgbaImage, canvas: &Canvas, style: &RenderStyle) {
    if let Some(stroke) = canvas.open_stroke() {
        // Open erase strokes already overwrote the mask; nothing to preview.
        if stroke.kind() == StrokeKind::Ink {
            rasterize_polyline(frame, stroke.points(), stroke.radius(), style.brush_color);
        }
    }
}

fn paint_header(frame: &mut RgbaImage, layout: &HeaderLayout, mode: PaintMode, style: &RenderStyle) {
    let header_height = layout.height() as u32;
    if header_height == 0 {
        return;
    }
    draw_filled_rect_mut(
        frame,
        Rect::at(0, 0).of_size(frame.width(), header_height.min(frame.height())),
        style.header_background,
    );

    let button_height = header_height.saturating_sub(14).max(1);
    for button in layout.buttons() {
        let fill = if button.mode == mode {
            style.active_button_fill
        } else {
            style.button_fill
        };
        let width = (button.x_max - button.x_min).max(1.0) as u32;
        draw_filled_rect_mut(
            frame,
            Rect::at(button.x_min as i32, 7).of_size(width, button_height),
            fill,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_frame() -> RgbaImage {
        RgbaImage::from_pixel(1280, 720, Rgba([0, 0, 0, 255]))
    }

    #[test]
    fn test_sealed_ink_painted_in_brush_color() {
        let mut canvas = Canvas::new(1280, 720, 1, 0.0);
        canvas.begin_stroke(StrokeKind::Ink, 10.0);
        canvas.extend(Point::new(640.0, 400.0));
        canvas.seal();

        let mut frame = blank_frame();
        let layout = HeaderLayout::standard(1280, 137);
        let style = RenderStyle::default();
        compose(&mut frame, &canvas, &layout, PaintMode::Idle, None, &style);

        assert_eq!(*frame.get_pixel(640, 400), style.brush_color);
    }

    #[test]
    fn test_open_stroke_previewed_without_mask_commit() {
        let mut canvas = Canvas::new(1280, 720, 1, 0.0);
        canvas.begin_stroke(StrokeKind::Ink, 10.0);
        canvas.extend(Point::new(400.0, 300.0));

        let mut frame = blank_frame();
        let layout = HeaderLayout::standard(1280, 137);
        let style = RenderStyle::default();
        compose(&mut frame, &canvas, &layout, PaintMode::Draw, None, &style);

        assert_eq!(*frame.get_pixel(400, 300), style.brush_color);
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_header_strip_covers_top_rows() {
        let canvas = Canvas::new(1280, 720, 1, 0.0);
        let mut frame = blank_frame();
        let layout = HeaderLayout::standard(1280, 137);
        let style = RenderStyle::default();
        compose(&mut frame, &canvas, &layout, PaintMode::Idle, None, &style);

        // Between buttons the bar background shows; below the strip the
        // frame is untouched.
        assert_eq!(*frame.get_pixel(195, 60), style.header_background);
        assert_eq!(*frame.get_pixel(195, 200), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_active_button_highlighted() {
        let canvas = Canvas::new(1280, 720, 1, 0.0);
        let mut frame = blank_frame();
        let layout = HeaderLayout::standard(1280, 137);
        let style = RenderStyle::default();
        compose(&mut frame, &canvas, &layout, PaintMode::Erase, None, &style);

        assert_eq!(*frame.get_pixel(300, 60), style.active_button_fill);
        assert_eq!(*frame.get_pixel(100, 60), style.button_fill);
    }
}
