//! Background raster: PNG storage, region flattening and extraction.
//!
//! The background keeps its encoded PNG bytes so a scene snapshot carries
//! the exact pixels (base64 in JSON). Operations decode to RGBA, work in
//! the image's native pixel space, and re-encode.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, Rgba, RgbaImage, imageops};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geometry::Rect;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("image codec failed: {0}")]
    Codec(#[from] image::ImageError),
    #[error("region lies outside the background image")]
    OutsideImage,
    #[error("region has no area")]
    EmptyRegion,
    #[error("no background image loaded")]
    NoBackground,
}

/// An encoded PNG with its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    #[serde(serialize_with = "png_to_base64", deserialize_with = "png_from_base64")]
    pub png: Vec<u8>,
}

fn png_to_base64<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&STANDARD.encode(bytes))
}

fn png_from_base64<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
    let raw = String::deserialize(d)?;
    STANDARD.decode(raw.as_bytes()).map_err(serde::de::Error::custom)
}

/// Integer pixel rectangle in native image space, clamped to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Where the background sits in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Placement {
    /// Map a world-space x/y to fractional native pixel coordinates.
    #[must_use]
    pub fn to_native(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.left) / self.scale_x, (y - self.top) / self.scale_y)
    }
}

impl RasterImage {
    /// Wrap PNG (or any decodable) bytes, recording their dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Codec`] if the bytes do not decode.
    pub fn from_encoded(bytes: &[u8]) -> Result<Self, RasterError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        Self::from_rgba(&img)
    }

    /// Encode an RGBA buffer as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Codec`] if PNG encoding fails.
    pub fn from_rgba(img: &RgbaImage) -> Result<Self, RasterError> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png)?;
        Ok(Self { width: img.width(), height: img.height(), png: out.into_inner() })
    }

    /// Decode into an RGBA buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Codec`] if the stored bytes are corrupt.
    pub fn decode(&self) -> Result<RgbaImage, RasterError> {
        Ok(image::load_from_memory_with_format(&self.png, ImageFormat::Png)?.to_rgba8())
    }

    /// Convert a world rectangle into the covered native pixels, clamped to
    /// the image. Partially covered edge pixels are included.
    ///
    /// # Errors
    ///
    /// [`RasterError::EmptyRegion`] for a zero-size rectangle,
    /// [`RasterError::OutsideImage`] when nothing of it overlaps the image.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn native_region(&self, world: &Rect, placement: &Placement) -> Result<PixelRect, RasterError> {
        if world.is_empty() {
            return Err(RasterError::EmptyRegion);
        }
        let (x0, y0) = placement.to_native(world.left, world.top);
        let (x1, y1) = placement.to_native(world.right(), world.bottom());
        let clamp_x = |v: f64| v.clamp(0.0, f64::from(self.width));
        let clamp_y = |v: f64| v.clamp(0.0, f64::from(self.height));
        let (x0, x1) = (clamp_x(x0.min(x1).floor()), clamp_x(x0.max(x1).ceil()));
        let (y0, y1) = (clamp_y(y0.min(y1).floor()), clamp_y(y0.max(y1).ceil()));
        if x1 <= x0 || y1 <= y0 {
            return Err(RasterError::OutsideImage);
        }
        Ok(PixelRect { x: x0 as u32, y: y0 as u32, width: (x1 - x0) as u32, height: (y1 - y0) as u32 })
    }

    /// Paint the world rectangle opaque white and re-encode.
    ///
    /// # Errors
    ///
    /// Propagates region and codec errors; the original image is untouched.
    pub fn flatten(&self, world: &Rect, placement: &Placement) -> Result<RasterImage, RasterError> {
        let region = self.native_region(world, placement)?;
        let mut img = self.decode()?;
        for y in region.y..region.y + region.height {
            for x in region.x..region.x + region.width {
                img.put_pixel(x, y, WHITE);
            }
        }
        Self::from_rgba(&img)
    }

    /// Copy the world rectangle out at native resolution.
    ///
    /// The output is `world.width / scale_x` by `world.height / scale_y`
    /// pixels regardless of how the region is currently viewed, clipped to
    /// the image, so it never exceeds the image's own size.
    ///
    /// # Errors
    ///
    /// [`RasterError::EmptyRegion`] for a zero-size rectangle,
    /// [`RasterError::OutsideImage`] when nothing of it overlaps the image,
    /// or a codec error.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn extract(&self, world: &Rect, placement: &Placement) -> Result<RasterImage, RasterError> {
        let out_w = (world.width / placement.scale_x).round();
        let out_h = (world.height / placement.scale_y).round();
        if world.is_empty() || out_w < 1.0 || out_h < 1.0 {
            return Err(RasterError::EmptyRegion);
        }
        let (ox, oy) = placement.to_native(world.left, world.top);
        let (ox, oy) = (ox.round(), oy.round());
        let clamp_x = |v: f64| v.clamp(0.0, f64::from(self.width));
        let clamp_y = |v: f64| v.clamp(0.0, f64::from(self.height));
        let (x0, x1) = (clamp_x(ox), clamp_x(ox + out_w));
        let (y0, y1) = (clamp_y(oy), clamp_y(oy + out_h));
        if x1 <= x0 || y1 <= y0 {
            return Err(RasterError::OutsideImage);
        }
        let src = self.decode()?;
        let out = imageops::crop_imm(&src, x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32).to_image();
        Self::from_rgba(&out)
    }
}
