use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba(px))
}

#[test]
fn rasterize_premultiplies_straight_alpha() {
    let img = DynamicImage::ImageRgba8(solid(2, 1, [200, 100, 50, 128]));
    let out = rasterize(&img).unwrap();
    assert_eq!(out.dimensions(), (2, 1));
    assert_eq!(out.get_pixel(0, 0).0, [100, 50, 25, 128]);
}

#[test]
fn rasterize_clears_color_under_zero_alpha() {
    let img = DynamicImage::ImageRgba8(solid(1, 1, [255, 255, 255, 0]));
    let out = rasterize(&img).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 0]);
}

#[test]
fn rasterize_converts_rgb_sources_to_opaque_rgba() {
    let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(3, 2, image::Rgb([9, 8, 7])));
    let out = rasterize(&img).unwrap();
    assert_eq!(out.as_raw().len(), 3 * 2 * 4);
    assert_eq!(out.get_pixel(2, 1).0, [9, 8, 7, 255]);
}

#[test]
fn rasterize_rejects_zero_sized_images() {
    let img = DynamicImage::new_rgba8(0, 4);
    assert!(matches!(
        rasterize(&img),
        Err(LcrError::RasterizationFailure(_))
    ));
}

#[test]
fn decode_image_reads_png_bytes() {
    let img = DynamicImage::ImageRgba8(solid(4, 3, [10, 20, 30, 255]));
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();

    let out = decode_image(&png).unwrap();
    assert_eq!(out.dimensions(), (4, 3));
    assert_eq!(out.get_pixel(3, 2).0, [10, 20, 30, 255]);
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn extract_channel_picks_one_byte_per_pixel() {
    let rgba = [1, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(extract_channel(&rgba, ALPHA_CHANNEL).unwrap(), vec![4, 8]);
    assert_eq!(extract_channel(&rgba, 0).unwrap(), vec![1, 5]);
    assert!(extract_channel(&rgba, 4).is_err());
    assert!(extract_channel(&rgba[..7], 0).is_err());
}

#[test]
fn unpremultiply_restores_straight_color() {
    let premul = solid(1, 1, [100, 50, 25, 128]);
    let px = unpremultiply(&premul).get_pixel(0, 0).0;
    assert!(px[0].abs_diff(200) <= 1, "{px:?}");
    assert!(px[1].abs_diff(100) <= 1, "{px:?}");
    assert!(px[2].abs_diff(50) <= 1, "{px:?}");
    assert_eq!(px[3], 128);

    let opaque = solid(1, 1, [1, 2, 3, 255]);
    assert_eq!(unpremultiply(&opaque).get_pixel(0, 0).0, [1, 2, 3, 255]);
}

#[test]
fn over_blends_premultiplied_pixels() {
    assert_eq!(over([0, 0, 255, 255], [0, 0, 0, 0]), [0, 0, 255, 255]);
    assert_eq!(over([0, 0, 255, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
    assert_eq!(over([0, 0, 255, 255], [128, 0, 0, 128]), [128, 0, 127, 255]);
}

#[test]
fn draw_over_clips_to_destination() {
    let mut dst = solid(4, 4, [0, 0, 0, 0]);
    let src = solid(3, 3, [255, 255, 255, 255]);
    draw_over(&mut dst, &src, 2, -1);

    assert_eq!(dst.get_pixel(2, 0).0, [255, 255, 255, 255]);
    assert_eq!(dst.get_pixel(3, 1).0, [255, 255, 255, 255]);
    assert_eq!(dst.get_pixel(1, 0).0, [0, 0, 0, 0]);
    assert_eq!(dst.get_pixel(2, 2).0, [0, 0, 0, 0]);
}

#[test]
fn check_raster_rejects_empty_buffers() {
    assert!(check_raster(&solid(2, 2, [0; 4])).is_ok());
    assert!(check_raster(&RgbaImage::new(0, 0)).is_err());
}
