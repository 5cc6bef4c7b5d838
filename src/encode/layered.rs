use kurbo::Size;
use rayon::prelude::*;

use crate::{
    assets::{codec::ByteCodec, resources::StaticResources},
    encode::{
        flattened::{FlattenedRendition, encode_flattened},
        layer::{EncodedLayer, LayerSource, encode_layer},
    },
    format::{
        bom::{IndexEntry, push_entry},
        info::{StructuredInfo, ThemeLayer, UTI_LAYERED_IMAGE, encode_list},
        rendition::RenditionKind,
    },
    foundation::{
        bytes::{concat, le_i16, le_i32, zeros},
        error::{LcrError, LcrResult},
        ids::{IdSource, hex_id},
    },
};

const KEY_TABLE_MAGIC: &[u8; 4] = b"tmfk";
const RAW_DATA_MAGIC: &[u8; 4] = b"DWAR";

/// Structural record written in front of each layer-like rendition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerPrefix {
    /// A parallax layer, 1-based in encoded (back to front) order.
    Normal(u16),
    Flattened,
    Radiosity,
}

impl LayerPrefix {
    fn kind_code(self) -> i16 {
        match self {
            LayerPrefix::Normal(_) => 0xB5,
            LayerPrefix::Flattened => 0xD0,
            LayerPrefix::Radiosity => 0xD1,
        }
    }

    pub fn encode(self) -> Vec<u8> {
        let index = match self {
            LayerPrefix::Normal(i) => i,
            LayerPrefix::Flattened | LayerPrefix::Radiosity => 0,
        };
        concat(&[
            &le_i16(0x55),
            &le_i16(self.kind_code()),
            &zeros(6),
            &index.to_le_bytes(),
            &zeros(10),
            &le_i32(1),
            &zeros(2),
        ])
    }
}

/// Prefix record of the layered image itself.
pub fn layered_image_prefix() -> Vec<u8> {
    concat(&[
        &le_i16(0x55),
        &le_i16(0xB5),
        &zeros(18),
        &le_i16(0x01),
        &zeros(4),
    ])
}

/// One key of the format-key table: a name and its metadata, each reachable
/// through its own index entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatKeyEntry {
    pub name: String,
    pub name_entry: IndexEntry,
    pub data_entry: IndexEntry,
}

/// Serialized format-key table with region-relative entries.
#[derive(Clone, Debug)]
pub struct FormatKeyTable {
    pub data: Vec<u8>,
    /// Length of the `tmfk` magic plus the static prefix.
    pub header_len: usize,
    pub keys: Vec<FormatKeyEntry>,
}

/// Builds the key table: the layered image's name with index 0, then each
/// layer name with its 1-based index.
pub fn format_key_table(
    layered_name: &str,
    layer_names: &[&str],
    prefix: &[u8],
    trailer: &[u8],
) -> LcrResult<FormatKeyTable> {
    let mut data = concat(&[KEY_TABLE_MAGIC, prefix]);
    let header_len = data.len();

    let names = std::iter::once(layered_name).chain(layer_names.iter().copied());
    let mut keys = Vec::with_capacity(layer_names.len() + 1);
    for (index, name) in names.enumerate() {
        if !name.is_ascii() {
            return Err(LcrError::encoding_overflow(format!(
                "key name '{name}' is not ASCII"
            )));
        }
        let index = i16::try_from(index).map_err(|_| {
            LcrError::encoding_overflow(format!("key index {index} exceeds i16"))
        })?;
        let name_entry = push_entry(&mut data, name.as_bytes());
        let data_entry = push_entry(&mut data, &concat(&[trailer, &le_i16(index)]));
        keys.push(FormatKeyEntry {
            name: name.to_string(),
            name_entry,
            data_entry,
        });
    }

    Ok(FormatKeyTable {
        data,
        header_len,
        keys,
    })
}

/// Payload region of the container plus its region-relative index entries.
#[derive(Clone, Debug)]
pub struct LayeredRegion {
    pub data: Vec<u8>,
    /// Two entries per key, then a (prefix, payload) pair per sub-blob.
    pub entries: Vec<IndexEntry>,
    /// Region-relative span of the `tmfk` header.
    pub key_format: IndexEntry,
}

/// All renditions of one layered image, encoded and ready to serialize.
#[derive(Clone, Debug)]
pub struct LayeredImage {
    pub name: String,
    /// Layers in encoded order: index 0 is the visually bottom-most layer.
    pub layers: Vec<EncodedLayer>,
    pub flattened: FlattenedRendition,
    pub width: u32,
    pub height: u32,
}

impl LayeredImage {
    /// Encodes every rendition. `sources` are in caller order (front-most
    /// first) and are reversed here.
    ///
    /// Identifiers are drawn in a fixed order (layered-image name, then each
    /// layer in encoded order) before the layers are encoded in parallel.
    #[tracing::instrument(skip_all, fields(layers = sources.len()))]
    pub fn build(
        sources: &[LayerSource],
        canvas: Size,
        ids: &mut dyn IdSource,
        codec: &dyn ByteCodec,
        jpeg_quality: u8,
    ) -> LcrResult<Self> {
        if sources.is_empty() {
            return Err(LcrError::validation(
                "a layered image needs at least one layer",
            ));
        }

        let ordered: Vec<&LayerSource> = sources.iter().rev().collect();
        let name = format!("LayeredImage-{}", hex_id(&ids.next_id()));
        let jobs: Vec<(&LayerSource, String)> = ordered
            .iter()
            .map(|src| (*src, format!("Image-{}", hex_id(&ids.next_id()))))
            .collect();

        let layers = jobs
            .into_par_iter()
            .map(|(src, layer_name)| encode_layer(src, layer_name, codec, jpeg_quality))
            .collect::<LcrResult<Vec<_>>>()?;

        let flattened = encode_flattened(&ordered, canvas, jpeg_quality)?;
        let (width, height) = (layers[0].width, layers[0].height);

        tracing::debug!(
            name = %name,
            width,
            height,
            flattened_bytes = flattened.rendition.len(),
            "encoded layered image"
        );

        Ok(Self {
            name,
            layers,
            flattened,
            width,
            height,
        })
    }

    fn rendition_kind(&self) -> RenditionKind {
        RenditionKind::LayeredImage {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
        }
    }

    /// Layered-image header, info list and an empty raw-data record.
    fn pre_layer_header(&self) -> LcrResult<Vec<u8>> {
        let theme = self
            .layers
            .iter()
            .map(|l| ThemeLayer {
                origin: l.origin,
                width: l.width,
                height: l.height,
            })
            .collect();
        let info = encode_list(&[
            StructuredInfo::ThemeInformation(theme),
            StructuredInfo::Composition,
            StructuredInfo::TypeIdentifier(UTI_LAYERED_IMAGE),
            StructuredInfo::ExifOrientation,
        ])?;
        let header = self.rendition_kind().header(info.len(), 0)?;
        Ok(concat(&[
            &header,
            &info,
            RAW_DATA_MAGIC,
            &zeros(4),
            &le_i32(0),
        ]))
    }

    /// Serializes the payload region. Offsets in the returned entries are
    /// relative to the start of the region.
    pub fn region(&self, resources: &StaticResources) -> LcrResult<LayeredRegion> {
        let layer_names: Vec<&str> = self.layers.iter().map(|l| l.name.as_str()).collect();
        let keys = format_key_table(
            &self.name,
            &layer_names,
            &resources.format_key_prefix,
            &resources.format_key_trailer,
        )?;

        let mut data = keys.data;
        let key_format = IndexEntry::new(0, keys.header_len);
        let mut entries = Vec::with_capacity(4 * self.layers.len() + 8);
        for key in &keys.keys {
            entries.push(key.name_entry);
            entries.push(key.data_entry);
        }

        entries.push(push_entry(&mut data, &layered_image_prefix()));
        entries.push(push_entry(&mut data, &self.pre_layer_header()?));

        for (i, layer) in self.layers.iter().enumerate() {
            let index = u16::try_from(i + 1).map_err(|_| {
                LcrError::encoding_overflow(format!("layer index {} exceeds u16", i + 1))
            })?;
            entries.push(push_entry(&mut data, &LayerPrefix::Normal(index).encode()));
            entries.push(push_entry(&mut data, &layer.rendition));
        }

        entries.push(push_entry(&mut data, &LayerPrefix::Flattened.encode()));
        entries.push(push_entry(&mut data, &self.flattened.rendition));

        entries.push(push_entry(&mut data, &LayerPrefix::Radiosity.encode()));
        entries.push(push_entry(&mut data, &resources.radiosity));

        tracing::debug!(
            region_bytes = data.len(),
            entries = entries.len(),
            "serialized layered-image region"
        );

        Ok(LayeredRegion {
            data,
            entries,
            key_format,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/layered.rs"]
mod tests;
