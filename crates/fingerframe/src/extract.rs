use image::{imageops, Rgba, RgbaImage};

use crate::gesture::{CaptureEvent, CropRegion, FrameSize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced when cutting a crop region out of a bitmap.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("image is {got_width}x{got_height} but the capture was projected onto {width}x{height}")]
    FrameMismatch {
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },

    #[error("crop region {x_max}x{y_max} (exclusive corner) exceeds the {width}x{height} image")]
    OutOfBounds {
        x_max: u32,
        y_max: u32,
        width: u32,
        height: u32,
    },

    #[error("crop region is empty")]
    EmptyRegion,
}

/// Native size of an image, as the crop projector expects it.
pub fn frame_size(img: &RgbaImage) -> FrameSize {
    FrameSize::new(img.width(), img.height())
}

/// Cut `region` out of `img`.
///
/// Rectangles are copied as is. Polygons are cropped to their bounding box
/// and pixels outside the polygon are made fully transparent.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img), fields(width = img.width(), height = img.height()))
)]
pub fn extract_region(img: &RgbaImage, region: &CropRegion) -> Result<RgbaImage, ExtractError> {
    let rect = region.bounding_rect();
    if rect.is_empty() {
        return Err(ExtractError::EmptyRegion);
    }
    if rect.x_max() > img.width() || rect.y_max() > img.height() {
        return Err(ExtractError::OutOfBounds {
            x_max: rect.x_max(),
            y_max: rect.y_max(),
            width: img.width(),
            height: img.height(),
        });
    }

    let mut out = imageops::crop_imm(img, rect.x, rect.y, rect.width, rect.height).to_image();
    if let CropRegion::Polygon { .. } = region {
        for (x, y, px) in out.enumerate_pixels_mut() {
            if !region.contains(rect.x + x, rect.y + y) {
                *px = Rgba([0, 0, 0, 0]);
            }
        }
    }
    Ok(out)
}

/// Extract the region of `capture` from the frame it was projected onto.
pub fn extract_capture(
    img: &RgbaImage,
    capture: &CaptureEvent,
) -> Result<RgbaImage, ExtractError> {
    if frame_size(img) != capture.frame {
        return Err(ExtractError::FrameMismatch {
            width: capture.frame.width,
            height: capture.frame.height,
            got_width: img.width(),
            got_height: img.height(),
        });
    }
    extract_region(img, &capture.crop.region)
}
