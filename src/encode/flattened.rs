use image::{RgbaImage, imageops::FilterType};
use kurbo::{Rect, Size};

use crate::{
    assets::{
        codec::encode_jpeg,
        raster::{check_raster, draw_over},
    },
    encode::layer::LayerSource,
    format::{
        info::{StructuredInfo, encode_list},
        rendition::RenditionKind,
    },
    foundation::{
        bytes::{concat, le_len, zeros},
        error::{LcrError, LcrResult},
    },
};

/// Name of the flattened rendition.
pub const FLATTENED_NAME: &str = "Image-Flattened";

const RAW_DATA_MAGIC: &[u8; 4] = b"DWAR";

/// Flattened preview rendition.
#[derive(Clone, Debug)]
pub struct FlattenedRendition {
    /// Composited canvas (premultiplied RGBA8).
    pub preview: RgbaImage,
    pub color: Vec<u8>,
    pub rendition: Vec<u8>,
}

/// Rectangle a layer of `layer` size is drawn into on a `canvas`, in a
/// bottom-left origin space.
///
/// The scale is `min(canvas.w / layer.w, layer.h / canvas.h)`. The second
/// operand mixes axes.
pub fn draw_rect(layer: Size, canvas: Size) -> Rect {
    let ratio = (canvas.width / layer.width).min(layer.height / canvas.height);
    Rect::new(0.0, 0.0, layer.width * ratio, layer.height * ratio)
}

/// Composites `layers` (back to front) onto a transparent canvas.
pub fn composite(layers: &[&LayerSource], canvas: Size) -> LcrResult<RgbaImage> {
    let (cw, ch) = canvas_pixels(canvas)?;
    let mut out = RgbaImage::new(cw, ch);

    for layer in layers {
        check_raster(&layer.image)?;
        let rect = draw_rect(layer.size(), canvas);
        let dw = rect.width().round();
        let dh = rect.height().round();
        if !(dw >= 1.0 && dh >= 1.0) {
            continue;
        }
        // Flip into top-left pixel space: the rect hugs the bottom edge.
        let top = i64::from(ch) - dh as i64;
        let visible_w = dw.min(f64::from(cw));
        let first_row = if top < 0 { -top as f64 } else { 0.0 };
        let visible_h = dh - first_row;

        let (sw, sh) = (f64::from(layer.image.width()), f64::from(layer.image.height()));
        let (sx, sy) = (sw / dw, sh / dh);
        let src_x1 = (visible_w * sx).ceil().min(sw) as u32;
        let src_y0 = (first_row * sy).floor() as u32;
        let src_y1 = (dh * sy).ceil().min(sh) as u32;
        if src_x1 == 0 || src_y1 <= src_y0 {
            continue;
        }

        let crop = image::imageops::crop_imm(&layer.image, 0, src_y0, src_x1, src_y1 - src_y0)
            .to_image();
        let scaled = if crop.dimensions() == (visible_w as u32, visible_h as u32) {
            crop
        } else {
            image::imageops::resize(
                &crop,
                visible_w as u32,
                visible_h as u32,
                FilterType::Triangle,
            )
        };
        draw_over(&mut out, &scaled, 0, top.max(0));
    }

    Ok(out)
}

/// Composites `layers`, JPEG-encodes the canvas and wraps it as the flattened
/// rendition.
pub fn encode_flattened(
    layers: &[&LayerSource],
    canvas: Size,
    jpeg_quality: u8,
) -> LcrResult<FlattenedRendition> {
    let preview = composite(layers, canvas)?;
    let color = encode_jpeg(
        preview.as_raw(),
        preview.width(),
        preview.height(),
        jpeg_quality,
    )?;

    let payload = concat(&[RAW_DATA_MAGIC, &zeros(4), &le_len(color.len())?, &color]);
    let info = encode_list(&[StructuredInfo::Composition, StructuredInfo::ExifOrientation])?;
    let kind = RenditionKind::Flattened {
        name: FLATTENED_NAME.to_string(),
    };
    let rendition = kind.encode(&info, &payload)?;

    Ok(FlattenedRendition {
        preview,
        color,
        rendition,
    })
}

/// Largest canvas side the JPEG encoder accepts.
const MAX_CANVAS_SIDE: f64 = u16::MAX as f64;

fn canvas_pixels(canvas: Size) -> LcrResult<(u32, u32)> {
    let valid = |v: f64| v.is_finite() && (1.0..=MAX_CANVAS_SIDE).contains(&v);
    if !valid(canvas.width) || !valid(canvas.height) {
        return Err(LcrError::rasterization(format!(
            "canvas sides must be in 1..={MAX_CANVAS_SIDE} pixels, got {}x{}",
            canvas.width, canvas.height
        )));
    }
    let (cw, ch) = (canvas.width as u32, canvas.height as u32);
    (cw as usize)
        .checked_mul(ch as usize)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(|| {
            LcrError::rasterization(format!("canvas {cw}x{ch} overflows an rgba8 buffer"))
        })?;
    Ok((cw, ch))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/flattened.rs"]
mod tests;
