//! The compiled 324-byte output.

use std::fmt;

use ddr_calib::CALIBRATION_BINARY_LEN;
use ddr_core::error::copy_into;
use sha2::{Digest, Sha256};

/// Length of every compiled binary, whichever dialect produced it.
pub const COMPILED_BINARY_LEN: usize = CALIBRATION_BINARY_LEN;

/// Offset where the second section (RDD header) starts.
pub const SECOND_SECTION_OFFSET: usize = 192;

/// A compiled DDR configuration binary.
#[derive(Clone, PartialEq, Eq)]
pub struct CompiledBinary {
    bytes: [u8; COMPILED_BINARY_LEN],
}

impl CompiledBinary {
    pub fn as_bytes(&self) -> &[u8; COMPILED_BINARY_LEN] {
        &self.bytes
    }

    pub fn into_bytes(self) -> [u8; COMPILED_BINARY_LEN] {
        self.bytes
    }

    /// Always [`COMPILED_BINARY_LEN`].
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The FIDB-headed and RDD-headed halves.
    pub fn sections(&self) -> (&[u8], &[u8]) {
        self.bytes.split_at(SECOND_SECTION_OFFSET)
    }

    /// SHA-256 of the whole binary, lowercase hex.
    pub fn sha256_hex(&self) -> String {
        hex(&Sha256::digest(self.bytes))
    }

    /// Copy into `out`, returning bytes written. Fails without writing if
    /// `out` is shorter than 324 bytes.
    pub fn write_into(&self, out: &mut [u8]) -> ddr_core::Result<usize> {
        copy_into(&self.bytes, out)
    }
}

impl From<[u8; COMPILED_BINARY_LEN]> for CompiledBinary {
    fn from(bytes: [u8; COMPILED_BINARY_LEN]) -> Self {
        Self { bytes }
    }
}

impl AsRef<[u8]> for CompiledBinary {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for CompiledBinary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledBinary")
            .field("sha256", &self.sha256_hex())
            .finish()
    }
}

/// Lowercase hex encoding.
pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_encoding() {
        assert_eq!(hex(&[0x00, 0x0f, 0xab]), "000fab");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn zero_binary_digest() {
        let bin = CompiledBinary::from([0u8; COMPILED_BINARY_LEN]);
        assert_eq!(bin.len(), 324);
        assert_eq!(bin.sha256_hex().len(), 64);
        assert_eq!(bin.sha256_hex(), hex(&Sha256::digest([0u8; 324])));
    }

    #[test]
    fn sections_split_at_rdd_header() {
        let mut bytes = [0u8; COMPILED_BINARY_LEN];
        bytes[192] = 0xaa;
        let bin = CompiledBinary::from(bytes);
        let (first, second) = bin.sections();
        assert_eq!(first.len(), 192);
        assert_eq!(second.len(), 132);
        assert_eq!(second[0], 0xaa);
    }

    #[test]
    fn write_into_refuses_short_buffer() {
        let bin = CompiledBinary::from([7u8; COMPILED_BINARY_LEN]);
        let mut short = [0u8; 100];
        assert!(bin.write_into(&mut short).is_err());
        assert!(short.iter().all(|&b| b == 0));
        let mut exact = [0u8; COMPILED_BINARY_LEN];
        assert_eq!(bin.write_into(&mut exact), Ok(324));
        assert_eq!(exact, *bin.as_bytes());
    }
}
