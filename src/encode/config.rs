use crate::foundation::error::{LcrError, LcrResult};

/// Tunables for container construction.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Program identification string stored in the header record (≤ 128 bytes).
    pub program: String,
    /// Tool version string stored in the header record (≤ 256 bytes).
    pub version: String,
    /// JPEG quality for layer color and the flattened preview (1..=100).
    pub jpeg_quality: u8,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            program: concat!("@(#)PROGRAM:", env!("CARGO_PKG_NAME")).to_string(),
            version: concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION")).to_string(),
            jpeg_quality: 100,
        }
    }
}

impl EncodeConfig {
    pub fn validate(&self) -> LcrResult<()> {
        if !self.program.is_ascii() || self.program.len() > 128 {
            return Err(LcrError::validation(
                "program must be ASCII and at most 128 bytes",
            ));
        }
        if !self.version.is_ascii() || self.version.len() > 256 {
            return Err(LcrError::validation(
                "version must be ASCII and at most 256 bytes",
            ));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(LcrError::validation("jpeg_quality must be in 1..=100"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/config.rs"]
mod tests;
