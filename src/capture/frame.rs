//! Frame data structures for captured video content

use std::time::Instant;

use image::{Rgba, RgbaImage};

/// A captured frame from the video source
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// RGBA pixel data
    pub image: RgbaImage,
    /// Timestamp when the frame was captured
    pub timestamp: Instant,
}

impl CapturedFrame {
    /// Wrap a decoded frame
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            timestamp: Instant::now(),
        }
    }

    /// A uniform dark frame, used by sources with no real camera behind them
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, Rgba([20, 20, 20, 255])))
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}
