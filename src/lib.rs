//! lcrkit encodes layered parallax still images.
//!
//! The output is an LCR container: a BOM archive holding a header record, two
//! single-leaf index trees and one payload region with every rendition of a
//! layered image (one per layer, a flattened preview, a radiosity
//! placeholder), followed by the block index table.
//!
//! # Pipeline overview
//!
//! 1. **Rasterize**: each source image becomes premultiplied RGBA8 ([`LayerSource`]).
//! 2. **Encode layers**: alpha plane LZFSE-compressed, color JPEG-encoded, wrapped as a
//!    rendition with its structured-info records.
//! 3. **Flatten**: all layers composited into one preview rendition.
//! 4. **Assemble**: key table, prefix records and renditions serialized into one region,
//!    then the header record, trees and index table are built around it and every offset
//!    is rebased to its absolute file position.
//!
//! Static vendor blobs are supplied through a [`ResourceProvider`] and identifiers through
//! an [`IdSource`], so a fixed identifier source yields byte-identical output.
#![forbid(unsafe_code)]

mod assets;
mod encode;
mod format;
mod foundation;

pub use assets::codec::{ByteCodec, LZFSE_COMPRESSION_ID, Lzfse, compress_alpha, encode_jpeg};
pub use assets::raster::{decode_image, extract_channel, rasterize, unpremultiply};
pub use assets::resources::{
    DirResources, MemoryResources, ResourceKind, ResourceProvider, StaticResources,
};
pub use encode::config::EncodeConfig;
pub use encode::flattened::{FLATTENED_NAME, FlattenedRendition, draw_rect, encode_flattened};
pub use encode::layer::{EncodedLayer, LayerSource, encode_layer};
pub use encode::layered::{
    FormatKeyEntry, FormatKeyTable, LayerPrefix, LayeredImage, LayeredRegion, format_key_table,
};
pub use encode::parallax::{
    LcrEncoder, ParallaxImage, bounding_canvas, facet_count, non_null_block_count,
    rendition_count,
};
pub use format::bom::{
    INDEX_SLOT_CAPACITY, INDEX_TABLE_LEN, IndexEntry, STORE_HEADER_LEN, TREE_BLOCK_LEN,
    TREE_HEADER_LEN,
};
pub use format::car_header::CAR_HEADER_LEN;
pub use format::info::{InfoTag, StructuredInfo, ThemeLayer};
pub use format::rendition::{RENDITION_HEADER_LEN, RenditionKind};
pub use foundation::error::{LcrError, LcrResult};
pub use foundation::ids::{Id128, IdSource, RandomIds, SequentialIds, hex_id};

pub use kurbo::{Point, Size};
