//! Raster preview of crop rectangles, for checking coordinates before running LaTeX.

use std::path::Path;

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use super::fs_service::{open_image, save_png};
use crate::config::CropRect;
use crate::error::ImagingError;

const OUTLINE_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]);
const OUTLINE_THICKNESS: u32 = 3;

/// Draws every crop outline onto `canvas` in place.
///
/// Pixel space is used directly, so unlike the LaTeX overlay there is no axis flip.
pub fn draw_crop_outlines(canvas: &mut RgbaImage, crops: &[CropRect]) {
    for rect in crops {
        // Nested 1px rectangles growing inward give a thick outline.
        for inset in 0..OUTLINE_THICKNESS {
            let width = rect.width().saturating_sub(2 * inset);
            let height = rect.height().saturating_sub(2 * inset);
            if width == 0 || height == 0 {
                break;
            }
            let outline = Rect::at((rect.left + inset) as i32, (rect.top + inset) as i32)
                .of_size(width, height);
            draw_hollow_rect_mut(canvas, outline, OUTLINE_COLOR);
        }
    }
}

/// Loads `source`, outlines every crop and writes the result to `dest` as PNG.
pub fn write_overlay_preview(
    source: &Path,
    crops: &[CropRect],
    dest: &Path,
) -> Result<(), ImagingError> {
    let mut canvas = open_image(source)?.to_rgba8();
    draw_crop_outlines(&mut canvas, crops);
    save_png(&DynamicImage::ImageRgba8(canvas), dest)
}
