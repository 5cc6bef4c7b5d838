use anyhow::Context;
use image::{DynamicImage, RgbaImage};

use crate::foundation::error::{LcrError, LcrResult};

/// Index of the alpha channel in an RGBA8 pixel.
pub const ALPHA_CHANNEL: usize = 3;

/// Renders `image` into a tightly packed, premultiplied RGBA8 buffer at its
/// natural size.
pub fn rasterize(image: &DynamicImage) -> LcrResult<RgbaImage> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(LcrError::rasterization(format!(
            "source image has zero size ({width}x{height})"
        )));
    }
    let mut rgba = image.to_rgba8();
    premultiply_rgba8_in_place(&mut rgba);
    Ok(rgba)
}

/// Decodes encoded image bytes (PNG, JPEG, ...) and rasterizes them.
pub fn decode_image(bytes: &[u8]) -> LcrResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    rasterize(&dyn_img)
}

/// Checks that `rgba` is a usable premultiplied buffer (non-zero size, tightly
/// packed).
pub fn check_raster(rgba: &RgbaImage) -> LcrResult<()> {
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(LcrError::rasterization(format!(
            "raster has zero size ({width}x{height})"
        )));
    }
    let expected = width as usize * height as usize * 4;
    if rgba.as_raw().len() != expected {
        return Err(LcrError::rasterization(format!(
            "raster backing store holds {} bytes, expected {expected}",
            rgba.as_raw().len()
        )));
    }
    Ok(())
}

/// Copies one channel of an RGBA8 buffer into a single-byte-per-pixel plane.
pub fn extract_channel(rgba: &[u8], channel: usize) -> LcrResult<Vec<u8>> {
    if channel > 3 || !rgba.len().is_multiple_of(4) {
        return Err(LcrError::rasterization(format!(
            "cannot extract channel {channel} from a {}-byte rgba8 buffer",
            rgba.len()
        )));
    }
    Ok(rgba.chunks_exact(4).map(|px| px[channel]).collect())
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Straight-alpha copy of a premultiplied RGBA8 image, for display or export.
pub fn unpremultiply(rgba: &RgbaImage) -> RgbaImage {
    let mut out = rgba.clone();
    for px in out.pixels_mut() {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in 0..3 {
            let v = (u16::from(px[c]) * 255 + a / 2) / a;
            px[c] = v.min(255) as u8;
        }
    }
    out
}

/// Source-over of one premultiplied pixel onto another.
pub fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    if src[3] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Draws premultiplied `src` onto `dst` with its top-left corner at `(x, y)`,
/// clipping to `dst`'s bounds.
pub fn draw_over(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    for (sx, sy, px) in src.enumerate_pixels() {
        let tx = x + i64::from(sx);
        let ty = y + i64::from(sy);
        if tx < 0 || ty < 0 || tx >= dw || ty >= dh {
            continue;
        }
        let d = dst.get_pixel_mut(tx as u32, ty as u32);
        d.0 = over(d.0, px.0);
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;
