//! Error types for register generation.

use ddr_core::DdrError;

/// Errors that can occur while generating register images.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TxxError {
    /// The logical configuration is unusable.
    #[error(transparent)]
    Config(#[from] DdrError),

    /// A chip-select size does not fit the 32-bit memory-map arithmetic.
    #[error("chip-select size {size_mb} MB does not fit the memory map")]
    MemoryMap {
        /// Offending size in megabytes.
        size_mb: u64,
    },
}

/// Result type for register generation.
pub type Result<T> = std::result::Result<T, TxxError>;
