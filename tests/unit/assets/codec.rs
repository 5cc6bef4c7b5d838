use super::*;

struct FixedCodec(Vec<u8>);

impl ByteCodec for FixedCodec {
    fn compression_id(&self) -> i32 {
        99
    }

    fn compress(&self, _src: &[u8]) -> LcrResult<Vec<u8>> {
        Ok(self.0.clone())
    }
}

fn gradient_mask(len: usize) -> Vec<u8> {
    (0..len).map(|i| if i < len / 2 { 0 } else { 255 }).collect()
}

#[test]
fn lzfse_output_decodes_back_to_the_mask() {
    let mask = gradient_mask(100 * 100);
    let compressed = compress_alpha(&Lzfse, &mask).unwrap();
    assert!(compressed.len() < mask.len());

    let mut decoded = Vec::new();
    lzfse_rust::decode_bytes(&compressed, &mut decoded).unwrap();
    assert_eq!(decoded, mask);
}

#[test]
fn lzfse_reports_its_compression_id() {
    assert_eq!(Lzfse.compression_id(), LZFSE_COMPRESSION_ID);
    assert_eq!(LZFSE_COMPRESSION_ID, 5);
}

#[test]
fn empty_compressed_output_is_a_failure() {
    let err = compress_alpha(&FixedCodec(Vec::new()), &[255; 64]).unwrap_err();
    assert!(matches!(err, LcrError::CompressionFailure(_)));
}

#[test]
fn output_larger_than_the_raw_plane_is_a_failure() {
    let err = compress_alpha(&FixedCodec(vec![1; 65]), &[255; 64]).unwrap_err();
    assert!(matches!(err, LcrError::CompressionFailure(_)));

    let ok = compress_alpha(&FixedCodec(vec![1; 64]), &[255; 64]).unwrap();
    assert_eq!(ok.len(), 64);
}

#[test]
fn jpeg_is_a_complete_baseline_stream() {
    let rgba: Vec<u8> = (0..16 * 16).flat_map(|_| [200, 10, 10, 255]).collect();
    let jpeg = encode_jpeg(&rgba, 16, 16, 100).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);

    let decoded = image::load_from_memory(&jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (16, 16));
}

#[test]
fn jpeg_rejects_mismatched_buffers() {
    assert!(matches!(
        encode_jpeg(&[0; 12], 2, 2, 100),
        Err(LcrError::RasterizationFailure(_))
    ));
    assert!(encode_jpeg(&[], 0, 0, 100).is_err());
}
