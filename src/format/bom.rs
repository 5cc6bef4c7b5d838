//! BOM archive structures: store header, single-leaf trees and the block
//! index table. Everything here is big-endian.

use crate::foundation::{
    bytes::{be_len, be_u16, be_u32, concat, pad_to, zeros},
    error::{LcrError, LcrResult},
};

/// Size of the store header block.
pub const STORE_HEADER_LEN: usize = 512;
/// Size of a tree's leaf block.
pub const TREE_BLOCK_LEN: usize = 4096;
/// Size of a tree's header block.
pub const TREE_HEADER_LEN: usize = 21;
/// Size of the index table, including its count field.
pub const INDEX_TABLE_LEN: usize = 0x5568;
/// Number of slots the index table declares (and can hold). The table keeps
/// 20 bytes of zero slack after the last slot.
pub const INDEX_SLOT_CAPACITY: usize = 0xAAA;

// Fixed slots 1..=6: header record, renditions tree header, renditions leaf,
// facets tree header, facets leaf, key-format header.
pub const SLOT_RENDITIONS_LEAF: u32 = 3;
pub const SLOT_FACETS_LEAF: u32 = 5;
/// First slot holding a layered-image entry.
pub const FIRST_DYNAMIC_SLOT: u32 = 7;

const LEAF_HEADER_LEN: usize = 12;
const PATH_LEN: usize = 8;

/// One `(offset, length)` slot of the index table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexEntry {
    pub offset: usize,
    pub length: usize,
}

impl IndexEntry {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Same entry moved by `base` bytes.
    pub fn rebased(self, base: usize) -> Self {
        Self {
            offset: self.offset + base,
            length: self.length,
        }
    }

    pub fn encode(&self) -> LcrResult<[u8; 8]> {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&be_len(self.offset)?);
        out[4..].copy_from_slice(&be_len(self.length)?);
        Ok(out)
    }
}

/// Appends `bytes` to `region` and returns the entry locating them.
pub fn push_entry(region: &mut Vec<u8>, bytes: &[u8]) -> IndexEntry {
    let entry = IndexEntry::new(region.len(), bytes.len());
    region.extend_from_slice(bytes);
    entry
}

/// The `BOMStore` header block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreHeader {
    pub non_null_block_count: usize,
    pub index_offset: usize,
    pub index_length: usize,
    pub vars_offset: usize,
    pub vars_length: usize,
}

impl StoreHeader {
    pub fn encode(&self) -> LcrResult<Vec<u8>> {
        let fields = concat(&[
            b"BOMStore",
            &be_u32(1),
            &be_len(self.non_null_block_count)?,
            &be_len(self.index_offset)?,
            &be_len(self.index_length)?,
            &be_len(self.vars_offset)?,
            &be_len(self.vars_length)?,
        ]);
        pad_to(&fields, STORE_HEADER_LEN)
    }
}

/// A `(payload slot, prefix slot)` pair stored per path in a tree leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreePath {
    pub value_slot: u32,
    pub key_slot: u32,
}

/// Degenerate tree: one leaf block, no branches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleLeafTree {
    /// Index slot of the leaf block.
    pub child_slot: u32,
    pub paths: Vec<TreePath>,
}

impl SingleLeafTree {
    /// Header block followed by the leaf block padded to [`TREE_BLOCK_LEN`].
    pub fn encode(&self) -> LcrResult<Vec<u8>> {
        let count = u16::try_from(self.paths.len()).map_err(|_| {
            LcrError::encoding_overflow(format!("{} tree paths exceed u16", self.paths.len()))
        })?;
        if LEAF_HEADER_LEN + self.paths.len() * PATH_LEN > TREE_BLOCK_LEN {
            return Err(LcrError::encoding_overflow(format!(
                "{} tree paths do not fit one {TREE_BLOCK_LEN}-byte leaf",
                self.paths.len()
            )));
        }

        let mut leaf = concat(&[
            // isLeaf
            &be_u16(1),
            &be_u16(count),
            // forward, backward: no siblings
            &be_u32(0),
            &be_u32(0),
        ]);
        for path in &self.paths {
            leaf.extend_from_slice(&be_u32(path.value_slot));
            leaf.extend_from_slice(&be_u32(path.key_slot));
        }

        Ok(concat(&[
            b"tree",
            // version
            &be_u32(1),
            &be_u32(self.child_slot),
            &be_len(TREE_BLOCK_LEN)?,
            &be_len(self.paths.len())?,
            &zeros(1),
            &pad_to(&leaf, TREE_BLOCK_LEN)?,
        ]))
    }
}

/// Paths of the facets tree: one `(data, name)` pair per facet starting at
/// [`FIRST_DYNAMIC_SLOT`], with the first pair rotated to the end.
///
/// Returns the paths and the next free slot.
pub fn facet_paths(facet_count: usize) -> (Vec<TreePath>, u32) {
    let mut slot = FIRST_DYNAMIC_SLOT + 1;
    let mut paths: Vec<TreePath> = (0..facet_count)
        .map(|_| {
            let path = TreePath {
                value_slot: slot,
                key_slot: slot - 1,
            };
            slot += 2;
            path
        })
        .collect();
    if !paths.is_empty() {
        paths.rotate_left(1);
    }
    (paths, slot)
}

/// Paths of the renditions tree: one `(payload, prefix)` pair per rendition,
/// starting at `first_value_slot`.
pub fn rendition_paths(rendition_count: usize, first_value_slot: u32) -> Vec<TreePath> {
    (0..rendition_count as u32)
        .map(|i| TreePath {
            value_slot: first_value_slot + 2 * i,
            key_slot: first_value_slot + 2 * i - 1,
        })
        .collect()
}

/// Serializes the index table: declared slot count, the null slot, then
/// `entries` in slot order starting at slot 1, zero-padded to
/// [`INDEX_TABLE_LEN`].
pub fn encode_index_table(entries: &[IndexEntry]) -> LcrResult<Vec<u8>> {
    if entries.len() + 1 > INDEX_SLOT_CAPACITY {
        return Err(LcrError::encoding_overflow(format!(
            "{} index entries exceed the {INDEX_SLOT_CAPACITY}-slot table",
            entries.len()
        )));
    }
    let mut table = Vec::with_capacity(INDEX_TABLE_LEN);
    table.extend_from_slice(&be_len(INDEX_SLOT_CAPACITY)?);
    table.extend_from_slice(&IndexEntry::default().encode()?);
    for e in entries {
        table.extend_from_slice(&e.encode()?);
    }
    pad_to(&table, INDEX_TABLE_LEN)
}

#[cfg(test)]
#[path = "../../tests/unit/format/bom.rs"]
mod tests;
