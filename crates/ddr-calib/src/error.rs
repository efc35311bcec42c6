//! Errors reported when checking a calibration binary.

/// A calibration binary failed structural validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("calibration binary is {actual} bytes, expected {expected}")]
    WrongLength { expected: usize, actual: usize },

    #[error("invalid {section} magic: found {found:02x?}")]
    InvalidMagic {
        section: &'static str,
        found: [u8; 4],
    },

    #[error("{section} declares length {declared:#x}, expected {expected:#x}")]
    DeclaredLength {
        section: &'static str,
        declared: u32,
        expected: u32,
    },

    #[error("RDD checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },
}

/// Result type for format validation.
pub type Result<T> = std::result::Result<T, FormatError>;
