//! Snapshot preprocessing for OCR
//!
//! Normalizes the canvas snapshot before recognition: downscale to a fixed
//! working size, hard binary threshold, then a median blur to knock out
//! isolated speckle from stroke edges.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use imageproc::filter::median_filter;
use tracing::debug;

use crate::config::OcrSettings;

/// Run the full preprocessing chain on a black-on-white snapshot.
pub fn prepare_for_ocr(snapshot: &GrayImage, settings: &OcrSettings) -> GrayImage {
    let resized = imageops::resize(
        snapshot,
        settings.target_width,
        settings.target_height,
        FilterType::Triangle,
    );

    let binarized = binarize(&resized, settings.threshold);

    let prepared = if settings.median_blur {
        median_filter(&binarized, 1, 1)
    } else {
        binarized
    };

    debug!(
        width = prepared.width(),
        height = prepared.height(),
        "snapshot prepared for OCR"
    );
    prepared
}

/// Hard threshold: at or above `threshold` becomes white, below black.
fn binarize(image: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y)[0] >= threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}
