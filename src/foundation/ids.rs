/// 128-bit identifier used for the header uuid and generated rendition names.
pub type Id128 = [u8; 16];

/// Source of 128-bit identifiers.
///
/// The encoder draws every identifier it needs through this trait so callers
/// can swap the process-wide random source for a deterministic one.
pub trait IdSource {
    /// Returns the next identifier.
    fn next_id(&mut self) -> Id128;
}

/// Random version-4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> Id128 {
        *uuid::Uuid::new_v4().as_bytes()
    }
}

/// Deterministic identifiers: a seed in the high half and a counter in the low
/// half, both big-endian.
#[derive(Clone, Copy, Debug)]
pub struct SequentialIds {
    seed: u64,
    counter: u64,
}

impl SequentialIds {
    /// Starts a new sequence for `seed`.
    pub fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> Id128 {
        self.counter += 1;
        let mut id = [0u8; 16];
        id[..8].copy_from_slice(&self.seed.to_be_bytes());
        id[8..].copy_from_slice(&self.counter.to_be_bytes());
        id
    }
}

/// Lowercase hex rendering (32 digits) used in generated names.
pub fn hex_id(id: &Id128) -> String {
    id.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
