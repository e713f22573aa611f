//! Header button layout and hit-testing
//!
//! A fixed strip of screen-space rectangles along the top of the frame, each
//! bound to one application mode. Selecting one is the only way to change
//! mode. Geometry follows the original 1280-wide interface strip, scaled
//! proportionally to the configured canvas width.

use crate::tracking::Point;

use super::PaintMode;

/// Reference layout at 1280 px width: (x_min, x_max, mode).
const REFERENCE_WIDTH: f32 = 1280.0;
const REFERENCE_BUTTONS: [(f32, f32, PaintMode); 6] = [
    (5.0, 190.0, PaintMode::Draw),
    (200.0, 390.0, PaintMode::Erase),
    (400.0, 590.0, PaintMode::Save),
    (600.0, 790.0, PaintMode::SpeakEn),
    (800.0, 990.0, PaintMode::SpeakFr),
    (1000.0, 1270.0, PaintMode::FingerCounter),
];

/// One selectable header region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderButton {
    pub mode: PaintMode,
    pub x_min: f32,
    pub x_max: f32,
}

/// The full header strip.
#[derive(Debug, Clone)]
pub struct HeaderLayout {
    height: f32,
    buttons: Vec<HeaderButton>,
}

impl HeaderLayout {
    /// Standard six-button strip scaled to `width` pixels.
    pub fn standard(width: u32, header_height: u32) -> Self {
        let scale = width as f32 / REFERENCE_WIDTH;
        let buttons = REFERENCE_BUTTONS
            .iter()
            .map(|(x_min, x_max, mode)| HeaderButton {
                mode: *mode,
                x_min: x_min * scale,
                x_max: x_max * scale,
            })
            .collect();
        Self {
            height: header_height as f32,
            buttons,
        }
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn buttons(&self) -> &[HeaderButton] {
        &self.buttons
    }

    /// Whether a pixel-space point lies anywhere in the header strip.
    pub fn contains(&self, point: Point) -> bool {
        point.y < self.height
    }

    /// The button under a pixel-space point, if any.
    pub fn hit_test(&self, point: Point) -> Option<PaintMode> {
        if !self.contains(point) {
            return None;
        }
        self.buttons
            .iter()
            .find(|b| point.x > b.x_min && point.x < b.x_max)
            .map(|b| b.mode)
    }
}
