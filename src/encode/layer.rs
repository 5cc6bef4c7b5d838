use image::{DynamicImage, RgbaImage};
use kurbo::{Point, Rect, Size};

use crate::{
    assets::{
        codec::{ByteCodec, compress_alpha, encode_jpeg},
        raster::{ALPHA_CHANNEL, check_raster, extract_channel, rasterize},
    },
    format::{
        info::{StructuredInfo, encode_list},
        rendition::RenditionKind,
    },
    foundation::{
        bytes::{concat, le_i32, le_len, zeros},
        error::LcrResult,
    },
};

const CORE_ELEMENT_MAGIC: &[u8; 4] = b"MLEC";

/// One input layer: a premultiplied RGBA8 raster placed at `origin`.
#[derive(Clone, Debug)]
pub struct LayerSource {
    pub origin: Point,
    pub image: RgbaImage,
}

impl LayerSource {
    /// Rasterizes `image` (straight alpha, any pixel format) into a layer.
    pub fn new(origin: Point, image: &DynamicImage) -> LcrResult<Self> {
        Ok(Self {
            origin,
            image: rasterize(image)?,
        })
    }

    /// Wraps an already premultiplied RGBA8 raster.
    pub fn from_premultiplied(origin: Point, image: RgbaImage) -> Self {
        Self { origin, image }
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.image.width()), f64::from(self.image.height()))
    }
}

/// A fully encoded layer rendition.
#[derive(Clone, Debug)]
pub struct EncodedLayer {
    /// Unique name, shared by the theme-info record and the key table.
    pub name: String,
    pub origin: Point,
    pub width: u32,
    pub height: u32,
    pub compressed_alpha: Vec<u8>,
    pub color: Vec<u8>,
    /// Serialized rendition (header, info list, core element).
    pub rendition: Vec<u8>,
}

impl EncodedLayer {
    /// Placement rectangle in canvas space.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(
            self.origin,
            Size::new(f64::from(self.width), f64::from(self.height)),
        )
    }
}

/// Encodes one layer: alpha plane compressed with `codec`, color as JPEG.
pub fn encode_layer(
    source: &LayerSource,
    name: String,
    codec: &dyn ByteCodec,
    jpeg_quality: u8,
) -> LcrResult<EncodedLayer> {
    check_raster(&source.image)?;
    let (width, height) = source.image.dimensions();

    let alpha = extract_channel(source.image.as_raw(), ALPHA_CHANNEL)?;
    let compressed_alpha = compress_alpha(codec, &alpha)?;
    drop(alpha);

    let color = encode_jpeg(source.image.as_raw(), width, height, jpeg_quality)?;

    let payload = concat(&[
        &zeros(8),
        &le_len(compressed_alpha.len())?,
        &le_len(width as usize)?,
        &le_len(color.len())?,
        &compressed_alpha,
        &color,
    ]);
    let core_element = concat(&[
        CORE_ELEMENT_MAGIC,
        &zeros(4),
        &le_i32(codec.compression_id()),
        &le_len(payload.len())?,
        &payload,
    ]);

    let info = encode_list(&[
        StructuredInfo::Slices { width, height },
        StructuredInfo::Metrics { width, height },
        StructuredInfo::Composition,
        StructuredInfo::ExifOrientation,
        StructuredInfo::BytesPerRow { width },
    ])?;

    let kind = RenditionKind::Layer {
        name: name.clone(),
        width,
        height,
    };
    let rendition = kind.encode(&info, &core_element)?;

    tracing::trace!(
        name = %name,
        width,
        height,
        alpha_bytes = compressed_alpha.len(),
        color_bytes = color.len(),
        "encoded layer"
    );

    Ok(EncodedLayer {
        name,
        origin: source.origin,
        width,
        height,
        compressed_alpha,
        color,
        rendition,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/layer.rs"]
mod tests;
