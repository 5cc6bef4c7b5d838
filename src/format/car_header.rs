use crate::foundation::{
    bytes::{concat, le_i32, le_len, padded_ascii, zeros},
    error::LcrResult,
    ids::Id128,
};

/// Serialized size of the header record.
pub const CAR_HEADER_LEN: usize = 436;

const MAGIC: &[u8; 4] = b"RATC";
const CORE_UI_VERSION: i32 = 372;
const STORAGE_VERSION: i32 = 10;
const PROGRAM_FIELD_LEN: usize = 128;
const VERSION_FIELD_LEN: usize = 256;
const SCHEMA_VERSION: i32 = 5;
const COLOR_SPACE_ID: i32 = 1;
const KEY_SEMANTICS: i32 = 1;

/// Asset-catalog header record. A pure function of its fields; all integers
/// little-endian.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarHeader {
    pub rendition_count: usize,
    pub program: String,
    pub version: String,
    pub uuid: Id128,
}

impl CarHeader {
    pub fn encode(&self) -> LcrResult<Vec<u8>> {
        Ok(concat(&[
            MAGIC,
            &le_i32(CORE_UI_VERSION),
            &le_i32(STORAGE_VERSION),
            &zeros(4),
            &le_len(self.rendition_count)?,
            &padded_ascii(&self.program, PROGRAM_FIELD_LEN)?,
            &padded_ascii(&self.version, VERSION_FIELD_LEN)?,
            &self.uuid,
            // checksum
            &le_i32(0),
            &le_i32(SCHEMA_VERSION),
            &le_i32(COLOR_SPACE_ID),
            &le_i32(KEY_SEMANTICS),
        ]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/format/car_header.rs"]
mod tests;
