//! Core data model and arithmetic primitives for the Ingenic DDR
//! configuration compiler.
//!
//! Everything here is pure and allocation-free:
//! - **Types:** the logical DDR description, platform defaults, and the
//!   cycle-domain PHY parameters consumed by the calibration dialect
//! - **Cycles:** picosecond-to-cycle conversion with the vendor rounding rules
//! - **Checksum:** reflected CRC-32 over a compile-time table
//! - **Geometry:** the three incompatible row/column encodings

pub mod crc32;
pub mod cycles;
pub mod error;
pub mod geometry;
pub mod types;

pub use error::{DdrError, Result};
pub use geometry::{EncodedGeometry, GeometryEncoding};
pub use types::{lpddr_rl_wl_code, DdrPhyParams, DdrType, LogicalDdrConfig, PlatformConfig};
