use std::path::Path;

use anyhow::Context as _;
use image::{DynamicImage, RgbaImage};
use kurbo::{Point, Size};

use crate::{
    assets::{
        codec::{ByteCodec, Lzfse},
        raster::unpremultiply,
        resources::{ResourceProvider, StaticResources},
    },
    encode::{config::EncodeConfig, layer::LayerSource, layered::LayeredImage},
    format::{
        bom::{
            FIRST_DYNAMIC_SLOT, INDEX_TABLE_LEN, IndexEntry, SLOT_FACETS_LEAF,
            SLOT_RENDITIONS_LEAF, STORE_HEADER_LEN, SingleLeafTree, StoreHeader, TREE_BLOCK_LEN,
            TREE_HEADER_LEN, encode_index_table, facet_paths, rendition_paths,
        },
        car_header::CarHeader,
    },
    foundation::{
        bytes::concat,
        error::{LcrError, LcrResult},
        ids::{IdSource, RandomIds},
    },
};

/// Renditions besides the layers: layered image, flattened, radiosity.
const EXTRA_RENDITIONS: usize = 3;
/// Facets besides the layers: the layered image.
const EXTRA_FACETS: usize = 1;

/// Number of renditions a container with `layer_count` layers holds.
pub fn rendition_count(layer_count: usize) -> usize {
    EXTRA_RENDITIONS + layer_count
}

/// Number of facets a container with `layer_count` layers holds.
pub fn facet_count(layer_count: usize) -> usize {
    EXTRA_FACETS + layer_count
}

/// Non-null block count declared in the store header.
///
/// Equals the number of populated index slots: 6 fixed, 2 per key and 2 per
/// rendition.
pub fn non_null_block_count(layer_count: usize) -> usize {
    14 + 4 * layer_count
}

/// Builds layered parallax containers.
///
/// Collaborators are injected: static resources, the identifier source
/// (random by default) and the alpha codec (LZFSE by default).
pub struct LcrEncoder {
    config: EncodeConfig,
    resources: Box<dyn ResourceProvider>,
    ids: Box<dyn IdSource + Send>,
    alpha_codec: Box<dyn ByteCodec>,
}

impl LcrEncoder {
    pub fn new(resources: impl ResourceProvider + 'static) -> Self {
        Self {
            config: EncodeConfig::default(),
            resources: Box::new(resources),
            ids: Box::new(RandomIds),
            alpha_codec: Box::new(Lzfse),
        }
    }

    pub fn with_config(mut self, config: EncodeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_id_source(mut self, ids: impl IdSource + Send + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_alpha_codec(mut self, codec: impl ByteCodec + 'static) -> Self {
        self.alpha_codec = Box::new(codec);
        self
    }

    pub fn config(&self) -> &EncodeConfig {
        &self.config
    }

    /// Encodes plain images: every origin is zero and the canvas is the
    /// bounding box of all image sizes.
    pub fn encode_images(&mut self, images: &[DynamicImage]) -> LcrResult<ParallaxImage> {
        let sources = images
            .iter()
            .map(|img| LayerSource::new(Point::ZERO, img))
            .collect::<LcrResult<Vec<_>>>()?;
        let canvas = bounding_canvas(&sources);
        self.encode(&sources, canvas)
    }

    /// Encodes `layers` (front-most first) onto a `canvas`-sized image.
    #[tracing::instrument(skip_all, fields(layers = layers.len(), width = canvas.width, height = canvas.height))]
    pub fn encode(&mut self, layers: &[LayerSource], canvas: Size) -> LcrResult<ParallaxImage> {
        self.config.validate()?;
        if layers.is_empty() {
            return Err(LcrError::validation(
                "a parallax image needs at least one layer",
            ));
        }
        let resources = StaticResources::load(self.resources.as_ref())?;

        let layered = LayeredImage::build(
            layers,
            canvas,
            self.ids.as_mut(),
            self.alpha_codec.as_ref(),
            self.config.jpeg_quality,
        )?;

        let n = layered.layers.len();
        let rendition_count = rendition_count(n);
        let facet_count = facet_count(n);

        let car_header = CarHeader {
            rendition_count,
            program: self.config.program.clone(),
            version: self.config.version.clone(),
            uuid: self.ids.next_id(),
        }
        .encode()?;

        let (facets, next_slot) = facet_paths(facet_count);
        let facets_tree = SingleLeafTree {
            child_slot: SLOT_FACETS_LEAF,
            paths: facets,
        }
        .encode()?;
        let renditions_tree = SingleLeafTree {
            child_slot: SLOT_RENDITIONS_LEAF,
            paths: rendition_paths(rendition_count, next_slot),
        }
        .encode()?;

        let region = layered.region(&resources)?;

        // Second pass: absolute offsets are known once every region is sized.
        let car_offset = STORE_HEADER_LEN;
        let renditions_offset = car_offset + car_header.len();
        let facets_offset = renditions_offset + renditions_tree.len();
        let region_offset = facets_offset + facets_tree.len();
        let vars_offset = region_offset + region.data.len();
        let index_offset = vars_offset + resources.index_preamble.len();

        let mut entries = vec![
            IndexEntry::new(car_offset, car_header.len()),
            IndexEntry::new(renditions_offset, TREE_HEADER_LEN),
            IndexEntry::new(renditions_offset + TREE_HEADER_LEN, TREE_BLOCK_LEN),
            IndexEntry::new(facets_offset, TREE_HEADER_LEN),
            IndexEntry::new(facets_offset + TREE_HEADER_LEN, TREE_BLOCK_LEN),
            region.key_format.rebased(region_offset),
        ];
        debug_assert_eq!(entries.len() as u32 + 1, FIRST_DYNAMIC_SLOT);
        entries.extend(region.entries.iter().map(|e| e.rebased(region_offset)));

        let non_null_block_count = non_null_block_count(n);
        if entries.len() != non_null_block_count {
            return Err(LcrError::validation(format!(
                "index table holds {} entries but the store header declares {non_null_block_count}",
                entries.len()
            )));
        }
        let index_table = encode_index_table(&entries)?;

        let store_header = StoreHeader {
            non_null_block_count,
            index_offset,
            index_length: INDEX_TABLE_LEN,
            vars_offset,
            vars_length: resources.index_preamble.len(),
        }
        .encode()?;

        let data = concat(&[
            &store_header,
            &car_header,
            &renditions_tree,
            &facets_tree,
            &region.data,
            &resources.index_preamble,
            &index_table,
        ]);

        tracing::debug!(
            total_bytes = data.len(),
            region_offset,
            region_bytes = region.data.len(),
            index_offset,
            rendition_count,
            facet_count,
            "assembled container"
        );

        Ok(ParallaxImage {
            data,
            name: layered.name,
            layer_names: layered.layers.into_iter().map(|l| l.name).collect(),
            preview: layered.flattened.preview,
            rendition_count,
            facet_count,
        })
    }
}

/// Canvas spanning the largest width and the largest height among `sources`.
pub fn bounding_canvas(sources: &[LayerSource]) -> Size {
    sources.iter().fold(Size::ZERO, |acc, s| {
        let size = s.size();
        Size::new(acc.width.max(size.width), acc.height.max(size.height))
    })
}

/// An encoded container together with its flattened preview.
#[derive(Clone, Debug)]
pub struct ParallaxImage {
    data: Vec<u8>,
    name: String,
    layer_names: Vec<String>,
    preview: RgbaImage,
    rendition_count: usize,
    facet_count: usize,
}

impl ParallaxImage {
    /// Container bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Name of the layered-image rendition.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layer rendition names in encoded (back to front) order.
    pub fn layer_names(&self) -> &[String] {
        &self.layer_names
    }

    /// Composited premultiplied RGBA8 canvas, as stored in the flattened
    /// rendition. Not needed for format correctness; useful for display.
    pub fn preview(&self) -> &RgbaImage {
        &self.preview
    }

    /// The preview with straight alpha, ready to display or save.
    pub fn flattened_image(&self) -> RgbaImage {
        unpremultiply(&self.preview)
    }

    pub fn rendition_count(&self) -> usize {
        self.rendition_count
    }

    pub fn facet_count(&self) -> usize {
        self.facet_count
    }

    /// Writes the container to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> LcrResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(path, &self.data)
            .with_context(|| format!("write container '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/parallax.rs"]
mod tests;
