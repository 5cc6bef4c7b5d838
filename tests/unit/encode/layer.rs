use super::*;
use crate::{
    assets::codec::Lzfse,
    format::{info::InfoTag, rendition::RENDITION_HEADER_LEN},
    foundation::error::LcrError,
};

struct Inflating;

impl ByteCodec for Inflating {
    fn compression_id(&self) -> i32 {
        1
    }

    fn compress(&self, src: &[u8]) -> LcrResult<Vec<u8>> {
        Ok(vec![0; src.len() + 1])
    }
}

fn le_i32_at(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
}

fn half_opaque(w: u32, h: u32) -> LayerSource {
    let img = RgbaImage::from_fn(w, h, |x, _| {
        if x < w / 2 {
            image::Rgba([0, 0, 0, 0])
        } else {
            image::Rgba([40, 160, 80, 255])
        }
    });
    LayerSource::from_premultiplied(Point::new(5.0, 6.0), img)
}

#[test]
fn rendition_wraps_info_and_core_element() {
    let layer = encode_layer(&half_opaque(100, 100), "Image-a".into(), &Lzfse, 100).unwrap();
    let r = &layer.rendition;

    assert_eq!(&r[24..28], b"BGRA");
    assert_eq!(le_i32_at(r, 12), 100);
    let info_len = le_i32_at(r, 168) as usize;
    let payload_len = le_i32_at(r, 180) as usize;
    assert_eq!(r.len(), RENDITION_HEADER_LEN + info_len + payload_len);

    let info = &r[RENDITION_HEADER_LEN..RENDITION_HEADER_LEN + info_len];
    let mut tags = Vec::new();
    let mut at = 0;
    while at < info.len() {
        tags.push(le_i32_at(info, at));
        at += 8 + le_i32_at(info, at + 4) as usize;
    }
    assert_eq!(
        tags,
        vec![
            InfoTag::SliceRects as i32,
            InfoTag::Metrics as i32,
            InfoTag::Composition as i32,
            InfoTag::ImageMetadata as i32,
            InfoTag::BytesPerRow as i32,
        ]
    );

    let core = &r[RENDITION_HEADER_LEN + info_len..];
    assert_eq!(&core[..4], b"MLEC");
    assert_eq!(le_i32_at(core, 8), 5);
    assert_eq!(le_i32_at(core, 12) as usize, core.len() - 16);

    let payload = &core[16..];
    assert_eq!(&payload[..8], &[0; 8]);
    let alpha_len = le_i32_at(payload, 8) as usize;
    assert_eq!(le_i32_at(payload, 12), 100);
    let color_len = le_i32_at(payload, 16) as usize;
    assert_eq!(alpha_len, layer.compressed_alpha.len());
    assert_eq!(color_len, layer.color.len());
    assert_eq!(payload.len(), 20 + alpha_len + color_len);
    assert_eq!(&payload[20..20 + alpha_len], &layer.compressed_alpha[..]);
    assert_eq!(&payload[20 + alpha_len..20 + alpha_len + 2], &[0xFF, 0xD8]);
}

#[test]
fn alpha_plane_round_trips_through_lzfse() {
    let source = half_opaque(128, 64);
    let layer = encode_layer(&source, "Image-b".into(), &Lzfse, 100).unwrap();

    let mut alpha = Vec::new();
    lzfse_rust::decode_bytes(&layer.compressed_alpha, &mut alpha).unwrap();
    let expected: Vec<u8> = source.image.pixels().map(|p| p[3]).collect();
    assert_eq!(alpha, expected);
}

#[test]
fn records_placement() {
    let layer = encode_layer(&half_opaque(80, 60), "Image-c".into(), &Lzfse, 90).unwrap();
    assert_eq!(layer.name, "Image-c");
    assert_eq!((layer.width, layer.height), (80, 60));
    assert_eq!(layer.rect(), Rect::new(5.0, 6.0, 85.0, 66.0));
}

#[test]
fn incompressible_alpha_is_reported() {
    let err = encode_layer(&half_opaque(16, 16), "Image-d".into(), &Inflating, 100).unwrap_err();
    assert!(matches!(err, LcrError::CompressionFailure(_)));
}

#[test]
fn zero_sized_sources_are_rejected() {
    let img = DynamicImage::new_rgba8(0, 0);
    assert!(matches!(
        LayerSource::new(Point::ZERO, &img),
        Err(LcrError::RasterizationFailure(_))
    ));

    let empty = LayerSource::from_premultiplied(Point::ZERO, RgbaImage::new(0, 0));
    assert!(encode_layer(&empty, "Image-e".into(), &Lzfse, 100).is_err());
}
