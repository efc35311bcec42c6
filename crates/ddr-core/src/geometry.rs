//! Row/column address-bit encodings.
//!
//! Three mutually incompatible encodings exist for the same geometry.
//! They are kept as separate paths, selected by output dialect.

use serde::{Deserialize, Serialize};

use crate::error::{DdrError, Result};

/// Which dialect's row/column encoding to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeometryEncoding {
    /// RDD block: row raw, column `col_bits - 6`.
    Calibration,
    /// Vendor parameter object: column `col_bits - 4`, row `row_bits - 11`.
    Txx,
    /// Bootloader style: column `col_bits - 8`, row `row_bits - 12`.
    /// No output dialect uses it yet.
    UBoot,
}

/// Encoded row/column field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedGeometry {
    pub row: u32,
    pub col: u32,
}

impl GeometryEncoding {
    fn offsets(self) -> (u32, u32) {
        match self {
            GeometryEncoding::Calibration => (0, 6),
            GeometryEncoding::Txx => (11, 4),
            GeometryEncoding::UBoot => (12, 8),
        }
    }

    /// Encode `row_bits`/`col_bits`. Fails if either is below the
    /// encoding's bias.
    pub fn encode(self, row_bits: u32, col_bits: u32) -> Result<EncodedGeometry> {
        let (row_bias, col_bias) = self.offsets();
        let row = row_bits.checked_sub(row_bias).ok_or_else(|| {
            DdrError::invalid(format!(
                "{self:?} encoding needs at least {row_bias} row bits, got {row_bits}"
            ))
        })?;
        let col = col_bits.checked_sub(col_bias).ok_or_else(|| {
            DdrError::invalid(format!(
                "{self:?} encoding needs at least {col_bias} column bits, got {col_bits}"
            ))
        })?;
        Ok(EncodedGeometry { row, col })
    }

    /// Byte-field form of [`encode`](Self::encode): wraps instead of failing,
    /// matching a plain byte store.
    pub fn encode_byte(self, row_bits: u8, col_bits: u8) -> (u8, u8) {
        let (row_bias, col_bias) = self.offsets();
        (
            row_bits.wrapping_sub(row_bias as u8),
            col_bits.wrapping_sub(col_bias as u8),
        )
    }

    /// Inverse of [`encode`](Self::encode).
    pub fn decode(self, encoded: EncodedGeometry) -> (u32, u32) {
        let (row_bias, col_bias) = self.offsets();
        (encoded.row + row_bias, encoded.col + col_bias)
    }
}
