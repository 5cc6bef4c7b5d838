use crate::foundation::{
    bytes::{concat, le_i32, le_len, padded_ascii},
    error::LcrResult,
};

/// Serialized size of a rendition header (header + meta + info length +
/// bitmap info).
pub const RENDITION_HEADER_LEN: usize = 184;

const MAGIC: &[u8; 4] = b"ISTC";
const NAME_FIELD_LEN: usize = 128;
/// 100 = 1x, 200 = 2x.
const SCALE_1X: i32 = 100;

/// The rendition variants a layered image is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenditionKind {
    /// JPEG preview of all layers composited together. Carries no dimensions.
    Flattened { name: String },
    /// One parallax layer: JPEG color plus compressed alpha.
    Layer { name: String, width: u32, height: u32 },
    /// The layered image itself; its payload is empty.
    LayeredImage { name: String, width: u32, height: u32 },
}

impl RenditionKind {
    pub fn name(&self) -> &str {
        match self {
            RenditionKind::Flattened { name }
            | RenditionKind::Layer { name, .. }
            | RenditionKind::LayeredImage { name, .. } => name,
        }
    }

    /// Pixel format code, stored as these literal bytes.
    pub fn pixel_format(&self) -> &'static [u8; 4] {
        match self {
            RenditionKind::Flattened { .. } => b"GEPJ",
            RenditionKind::Layer { .. } => b"BGRA",
            RenditionKind::LayeredImage { .. } => b"ATAD",
        }
    }

    pub fn color_space_id(&self) -> i32 {
        match self {
            RenditionKind::Flattened { .. } | RenditionKind::LayeredImage { .. } => 15,
            RenditionKind::Layer { .. } => 1,
        }
    }

    /// Rendition layout (type) code.
    pub fn layout(&self) -> i32 {
        match self {
            RenditionKind::Flattened { .. } | RenditionKind::Layer { .. } => 10,
            RenditionKind::LayeredImage { .. } => 0x03EA,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        match self {
            RenditionKind::Flattened { .. } => (0, 0),
            RenditionKind::Layer { width, height, .. }
            | RenditionKind::LayeredImage { width, height, .. } => (*width, *height),
        }
    }

    /// Header bytes preceding the structured-info list and the payload.
    ///
    /// The payload itself is owned and appended by the caller.
    pub fn header(&self, info_len: usize, payload_len: usize) -> LcrResult<Vec<u8>> {
        let (width, height) = self.size();
        Ok(concat(&[
            MAGIC,
            // version
            &le_i32(1),
            // rendition flags
            &le_i32(0),
            &le_len(width as usize)?,
            &le_len(height as usize)?,
            &le_i32(SCALE_1X),
            self.pixel_format(),
            &le_i32(self.color_space_id()),
            // modified date
            &le_i32(0),
            &le_i32(self.layout()),
            &padded_ascii(self.name(), NAME_FIELD_LEN)?,
            &le_len(info_len)?,
            // bitmap count, reserved, payload size
            &le_i32(1),
            &le_i32(0),
            &le_len(payload_len)?,
        ]))
    }

    /// Header, info list and payload back to back.
    pub fn encode(&self, info: &[u8], payload: &[u8]) -> LcrResult<Vec<u8>> {
        let header = self.header(info.len(), payload.len())?;
        Ok(concat(&[&header, info, payload]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/format/rendition.rs"]
mod tests;
