use super::*;
use image::RgbaImage;
use kurbo::Point;

use crate::{
    assets::codec::Lzfse,
    format::rendition::RENDITION_HEADER_LEN,
    foundation::ids::SequentialIds,
};

fn le_i32_at(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
}

fn opaque(w: u32, h: u32, origin: Point) -> LayerSource {
    let img = RgbaImage::from_pixel(w, h, image::Rgba([90, 90, 90, 255]));
    LayerSource::from_premultiplied(origin, img)
}

fn resources() -> StaticResources {
    StaticResources {
        radiosity: vec![0xAA; 32],
        format_key_prefix: vec![0; 64],
        format_key_trailer: vec![1, 2, 3, 4],
        index_preamble: vec![0; 61],
    }
}

fn build_two() -> LayeredImage {
    let front = opaque(80, 60, Point::new(2.0, 3.0));
    let back = opaque(100, 100, Point::ZERO);
    LayeredImage::build(
        &[front, back],
        Size::new(100.0, 100.0),
        &mut SequentialIds::new(1),
        &Lzfse,
        100,
    )
    .unwrap()
}

#[test]
fn layer_prefix_records() {
    let normal = LayerPrefix::Normal(3).encode();
    assert_eq!(normal.len(), 28);
    assert_eq!(&normal[..4], &[0x55, 0, 0xB5, 0]);
    assert_eq!(&normal[10..12], &[3, 0]);
    assert_eq!(le_i32_at(&normal, 22), 1);

    let flattened = LayerPrefix::Flattened.encode();
    assert_eq!(&flattened[2..4], &[0xD0, 0]);
    assert_eq!(&flattened[10..12], &[0, 0]);

    let radiosity = LayerPrefix::Radiosity.encode();
    assert_eq!(&radiosity[2..4], &[0xD1, 0]);

    let layered = layered_image_prefix();
    assert_eq!(layered.len(), 28);
    assert_eq!(&layered[22..24], &[1, 0]);
}

#[test]
fn key_table_indexes_names_in_order() {
    let table = format_key_table("L", &["A", "BB"], &[7; 64], &[9, 9]).unwrap();
    assert_eq!(&table.data[..4], b"tmfk");
    assert_eq!(table.header_len, 68);

    let spans: Vec<_> = table
        .keys
        .iter()
        .map(|k| (k.name.as_str(), k.name_entry, k.data_entry))
        .collect();
    assert_eq!(
        spans,
        vec![
            ("L", IndexEntry::new(68, 1), IndexEntry::new(69, 4)),
            ("A", IndexEntry::new(73, 1), IndexEntry::new(74, 4)),
            ("BB", IndexEntry::new(78, 2), IndexEntry::new(80, 4)),
        ]
    );
    assert_eq!(&table.data[80..84], &[9, 9, 2, 0]);
    assert_eq!(table.data.len(), 84);
}

#[test]
fn key_table_rejects_non_ascii_names() {
    assert!(matches!(
        format_key_table("L", &["\u{e9}"], &[], &[]),
        Err(LcrError::EncodingOverflow(_))
    ));
}

#[test]
fn build_reverses_layers_and_draws_names_in_order() {
    let img = build_two();
    let hex = |counter: u64| format!("{:016x}{:016x}", 1u64, counter);

    assert_eq!(img.name, format!("LayeredImage-{}", hex(1)));
    assert_eq!(img.layers[0].name, format!("Image-{}", hex(2)));
    assert_eq!(img.layers[1].name, format!("Image-{}", hex(3)));

    assert_eq!((img.layers[0].width, img.layers[0].height), (100, 100));
    assert_eq!(img.layers[1].origin, Point::new(2.0, 3.0));
    assert_eq!((img.width, img.height), (100, 100));
    assert_eq!(img.flattened.preview.dimensions(), (100, 100));
}

#[test]
fn build_rejects_empty_input() {
    let err = LayeredImage::build(
        &[],
        Size::new(1.0, 1.0),
        &mut SequentialIds::new(0),
        &Lzfse,
        100,
    )
    .unwrap_err();
    assert!(matches!(err, LcrError::Validation(_)));
}

#[test]
fn region_entries_tile_the_region() {
    let img = build_two();
    let res = resources();
    let region = img.region(&res).unwrap();

    assert_eq!(region.key_format, IndexEntry::new(0, 68));
    assert_eq!(region.entries.len(), 4 * 2 + 8);
    assert_eq!(region.entries[0].offset, region.key_format.length);
    for pair in region.entries.windows(2) {
        assert_eq!(pair[1].offset, pair[0].offset + pair[0].length);
    }
    let last = region.entries[region.entries.len() - 1];
    assert_eq!(last.offset + last.length, region.data.len());
    assert_eq!(&region.data[last.offset..], &res.radiosity[..]);
}

#[test]
fn region_holds_renditions_in_slot_order() {
    let img = build_two();
    let region = img.region(&resources()).unwrap();
    let slice = |i: usize| {
        let e = region.entries[i];
        &region.data[e.offset..e.offset + e.length]
    };

    assert_eq!(slice(0), img.name.as_bytes());
    assert_eq!(slice(2), img.layers[0].name.as_bytes());
    assert_eq!(slice(6), &layered_image_prefix()[..]);

    let header = slice(7);
    assert_eq!(&header[24..28], b"ATAD");
    assert_eq!(le_i32_at(header, 12), 100);
    let info_len = le_i32_at(header, 168) as usize;
    assert_eq!(info_len, (8 + 8 + 2 * 52) + 16 + 36 + 12);
    assert_eq!(le_i32_at(header, 180), 0);
    assert_eq!(header.len(), RENDITION_HEADER_LEN + info_len + 12);
    assert_eq!(&header[header.len() - 12..header.len() - 8], b"DWAR");

    assert_eq!(slice(8), &LayerPrefix::Normal(1).encode()[..]);
    assert_eq!(slice(9), &img.layers[0].rendition[..]);
    assert_eq!(slice(10), &LayerPrefix::Normal(2).encode()[..]);
    assert_eq!(slice(12), &LayerPrefix::Flattened.encode()[..]);
    assert_eq!(slice(13), &img.flattened.rendition[..]);
    assert_eq!(slice(14), &LayerPrefix::Radiosity.encode()[..]);
}
