//! Structured-info records: tagged metadata chunks that follow a rendition
//! header.
//!
//! Wire form is `tag(4) + length(4) + payload`, all little-endian, where the
//! length counts the payload only. Consumers find records by tag and position,
//! so every rendition kind emits its records in a fixed order.

use kurbo::Point;

use crate::foundation::{
    bytes::{concat, le_i16, le_i32, le_len, padded_ascii, zeros},
    error::LcrResult,
};

/// Uniform type identifier of the layered-image rendition.
pub const UTI_LAYERED_IMAGE: &str = "public.layeredimage";

const UTI_FIELD_LEN: usize = 0x14;
const THEME_LAYER_MAGIC: u32 = 0xED0D_EC0D;
/// IEEE-754 bits of `1.0f32`.
const OPACITY_ONE: i32 = 0x3F80_0000;

/// Record tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum InfoTag {
    SliceRects = 0x03E9,
    Metrics = 0x03EB,
    Composition = 0x03EC,
    TypeIdentifier = 0x03ED,
    ImageMetadata = 0x03EE,
    BytesPerRow = 0x03EF,
    ThemeInformation = 0x03F4,
}

/// Placement of one layer as recorded in the theme-information record.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeLayer {
    pub origin: Point,
    pub width: u32,
    pub height: u32,
}

/// One structured-info record.
#[derive(Clone, Debug, PartialEq)]
pub enum StructuredInfo {
    /// A single slice covering the whole canvas.
    Slices { width: u32, height: u32 },
    /// One metric with zero cap insets.
    Metrics { width: u32, height: u32 },
    /// Normal blend mode at full opacity.
    Composition,
    /// EXIF orientation 1 (up).
    ExifOrientation,
    /// Row stride of an RGBA8 bitmap of `width` pixels.
    BytesPerRow { width: u32 },
    /// UTI string in a fixed 20-byte field.
    TypeIdentifier(&'static str),
    /// Per-layer placement table of a layered image, in encoded order.
    ThemeInformation(Vec<ThemeLayer>),
}

impl StructuredInfo {
    pub fn tag(&self) -> InfoTag {
        match self {
            StructuredInfo::Slices { .. } => InfoTag::SliceRects,
            StructuredInfo::Metrics { .. } => InfoTag::Metrics,
            StructuredInfo::Composition => InfoTag::Composition,
            StructuredInfo::ExifOrientation => InfoTag::ImageMetadata,
            StructuredInfo::BytesPerRow { .. } => InfoTag::BytesPerRow,
            StructuredInfo::TypeIdentifier(_) => InfoTag::TypeIdentifier,
            StructuredInfo::ThemeInformation(_) => InfoTag::ThemeInformation,
        }
    }

    /// Record payload without the tag/length prefix.
    pub fn payload(&self) -> LcrResult<Vec<u8>> {
        Ok(match self {
            StructuredInfo::Slices { width, height } => concat(&[
                &le_i32(1),
                &le_i32(0),
                &le_i32(0),
                &le_u32(*width)?,
                &le_u32(*height)?,
            ]),
            StructuredInfo::Metrics { width, height } => concat(&[
                &le_i32(1),
                &zeros(16),
                &le_u32(*width)?,
                &le_u32(*height)?,
            ]),
            StructuredInfo::Composition => concat(&[&le_i32(0), &le_i32(OPACITY_ONE)]),
            StructuredInfo::ExifOrientation => le_i32(1).to_vec(),
            StructuredInfo::BytesPerRow { width } => {
                let stride = u64::from(*width) * 4;
                le_len(stride as usize)?.to_vec()
            }
            StructuredInfo::TypeIdentifier(uti) => concat(&[
                &le_i32(UTI_FIELD_LEN as i32),
                &zeros(4),
                &padded_ascii(uti, UTI_FIELD_LEN)?,
            ]),
            StructuredInfo::ThemeInformation(layers) => {
                let mut out = concat(&[&le_len(layers.len())?, &zeros(4)]);
                for (i, layer) in layers.iter().enumerate() {
                    out.extend_from_slice(&theme_layer_entry(layer, i + 1)?);
                }
                out
            }
        })
    }

    /// Full wire form: tag + length + payload.
    pub fn encode(&self) -> LcrResult<Vec<u8>> {
        let payload = self.payload()?;
        Ok(concat(&[
            &le_i32(self.tag() as i32),
            &le_len(payload.len())?,
            &payload,
        ]))
    }
}

/// Encodes `records` back to back.
pub fn encode_list(records: &[StructuredInfo]) -> LcrResult<Vec<u8>> {
    let mut out = Vec::new();
    for r in records {
        out.extend_from_slice(&r.encode()?);
    }
    Ok(out)
}

fn theme_layer_entry(layer: &ThemeLayer, index: usize) -> LcrResult<Vec<u8>> {
    Ok(concat(&[
        &THEME_LAYER_MAGIC.to_le_bytes(),
        &le_i32(layer.origin.x as i32),
        &le_i32(layer.origin.y as i32),
        &le_u32(layer.width)?,
        &le_u32(layer.height)?,
        &zeros(6),
        &le_i16(0x3F80),
        &le_i32(0x14),
        &le_i16(0x01),
        &le_i16(0x55),
        &le_i16(0x02),
        &le_i16(0xB5),
        &le_i16(0x0C),
        &le_i16(0x01),
        &le_i16(0x11),
        &le_len(index)?,
        &zeros(2),
    ]))
}

fn le_u32(v: u32) -> LcrResult<[u8; 4]> {
    le_len(v as usize)
}

#[cfg(test)]
#[path = "../../tests/unit/format/info.rs"]
mod tests;
