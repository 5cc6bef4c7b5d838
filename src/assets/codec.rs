use anyhow::Context;
use image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder};

use crate::foundation::error::{LcrError, LcrResult};

/// Compression id the container records for LZFSE-compressed alpha planes.
pub const LZFSE_COMPRESSION_ID: i32 = 5;

/// General-purpose byte compressor used for alpha masks.
pub trait ByteCodec: Send + Sync {
    /// Compression id written into the core-element record.
    fn compression_id(&self) -> i32;

    /// Compresses `src`. An empty result is treated as a failure by callers.
    fn compress(&self, src: &[u8]) -> LcrResult<Vec<u8>>;
}

/// LZFSE, which handles low-entropy masks well.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lzfse;

impl ByteCodec for Lzfse {
    fn compression_id(&self) -> i32 {
        LZFSE_COMPRESSION_ID
    }

    fn compress(&self, src: &[u8]) -> LcrResult<Vec<u8>> {
        let mut out = Vec::with_capacity(src.len() / 4 + 64);
        lzfse_rust::encode_bytes(src, &mut out).context("lzfse encode")?;
        Ok(out)
    }
}

/// Compresses an alpha plane.
///
/// The compressed plane has to fit in the space of the raw plane; an empty or
/// larger result is a [`LcrError::CompressionFailure`].
pub fn compress_alpha(codec: &dyn ByteCodec, alpha: &[u8]) -> LcrResult<Vec<u8>> {
    let compressed = codec.compress(alpha)?;
    if compressed.is_empty() {
        return Err(LcrError::compression("alpha plane compressed to 0 bytes"));
    }
    if compressed.len() > alpha.len() {
        return Err(LcrError::compression(format!(
            "alpha plane compressed to {} bytes, more than its raw {} bytes",
            compressed.len(),
            alpha.len()
        )));
    }
    Ok(compressed)
}

/// JPEG-encodes the color of a premultiplied RGBA8 buffer.
///
/// Alpha is dropped; premultiplied color is exactly the image composited over
/// black. The encoder writes no EXIF/XMP metadata.
pub fn encode_jpeg(rgba_premul: &[u8], width: u32, height: u32, quality: u8) -> LcrResult<Vec<u8>> {
    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 || rgba_premul.len() != expected {
        return Err(LcrError::rasterization(format!(
            "jpeg input must be {width}x{height} rgba8 ({expected} bytes), got {} bytes",
            rgba_premul.len()
        )));
    }

    let rgb: Vec<u8> = rgba_premul
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .context("jpeg encode")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/codec.rs"]
mod tests;
