use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{ImageEncoder, RgbaImage};

use crate::error::Result;

/// A decoded icon: `width * height` pixels, 4 bytes each, in RGBA order,
/// addressed top-left first in row-major order.
///
/// Owns no OS resources and can be cloned and sent freely.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap RGBA bytes that are already top-down. Returns `None` when the
    /// length does not match the dimensions or either dimension is zero.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != byte_len(width, height)? {
            return None;
        }
        Some(PixelBuffer {
            width,
            height,
            data,
        })
    }

    /// Repack a bottom-up BGRA device-independent bitmap into a top-down RGBA buffer.
    ///
    /// The first source row lands on the last destination row, so the last
    /// source row becomes pixel row 0. Returns `None` on a size mismatch.
    pub fn from_bgra_bottom_up(width: u32, height: u32, bgra: &[u8]) -> Option<Self> {
        if width == 0 || height == 0 || bgra.len() != byte_len(width, height)? {
            return None;
        }

        let stride = width as usize * 4;
        let mut data = vec![0u8; bgra.len()];

        for (src_row, row) in bgra.chunks_exact(stride).enumerate() {
            let dst_row = height as usize - 1 - src_row;
            let dst = &mut data[dst_row * stride..(dst_row + 1) * stride];

            for (out, px) in dst.chunks_exact_mut(4).zip(row.chunks_exact(4)) {
                out[0] = px[2];
                out[1] = px[1];
                out[2] = px[0];
                out[3] = px[3];
            }
        }

        Some(PixelBuffer {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA bytes, top row first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at `(x, y)` packed as `0xAARRGGBB`.
    pub fn argb(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let [r, g, b, a] = [
            self.data[i] as u32,
            self.data[i + 1] as u32,
            self.data[i + 2] as u32,
            self.data[i + 3] as u32,
        ];
        Some((a << 24) | (r << 16) | (g << 8) | b)
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }

    pub fn into_rgba_image(self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data)
    }

    /// Encode as a PNG file image.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.data, self.width, self.height)
    }

    /// Encode as a `data:image/png;base64,...` URI.
    pub fn to_data_uri(&self) -> Result<String> {
        let png = self.encode_png()?;
        Ok(format!("data:image/png;base64,{}", BASE64.encode(&png)))
    }
}

pub(crate) fn encode_png(rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes: Vec<u8> = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder.write_image(rgba, width, height, image::ExtendedColorType::Rgba8)?;
    Ok(png_bytes)
}

fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(4)
}
