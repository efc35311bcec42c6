//! Register-dialect binary.
//!
//! Same framing as the calibration binary, different payloads:
//! ```text
//! [0x000..0x004]  "FIDB"
//! [0x004..0x008]  0xB8
//! [0x008..0x0c0]  DDRC image, first 184 bytes
//! [0x0c0..0x0c4]  "\0RDD"
//! [0x0c4..0x0c8]  0x7C
//! [0x0c8..0x144]  DDRP image
//! ```
//! No checksum is computed in this dialect. Both images come from one
//! [`VendorObject`]: the DDRC pass runs first and the PHY pass reads its
//! scratch state.

use ddr_calib::fidb::{FIDB_DECLARED_LEN, FIDB_MAGIC};
use ddr_calib::rdd::{RDD_DECLARED_LEN, RDD_MAGIC};
use ddr_calib::CALIBRATION_BINARY_LEN;
use ddr_core::LogicalDdrConfig;

use crate::ddrc::{generate_ddrc_in, DdrcStrategy};
use crate::ddrp::{generate_ddrp_in, DDRP_IMAGE_LEN};
use crate::error::Result;
use crate::object::VendorObject;

/// Total length; identical to the calibration binary.
pub const REGISTER_BINARY_LEN: usize = CALIBRATION_BINARY_LEN;

/// DDRC bytes that fit between the two headers.
pub const DDRC_EMBEDDED_LEN: usize = 0xb8;

const DDRC_OFFSET: usize = 0x08;
const RDD_HEADER_OFFSET: usize = DDRC_OFFSET + DDRC_EMBEDDED_LEN;
const DDRP_OFFSET: usize = RDD_HEADER_OFFSET + 8;

/// Generate both register images and frame them.
pub fn build_register_binary(
    config: &LogicalDdrConfig,
    strategy: DdrcStrategy,
) -> Result<[u8; REGISTER_BINARY_LEN]> {
    let mut obj = VendorObject::populate(config)?;
    let ddrc = generate_ddrc_in(&mut obj, config, strategy)?;
    let ddrp = generate_ddrp_in(&mut obj, config)?;

    let mut out = [0u8; REGISTER_BINARY_LEN];
    out[0..4].copy_from_slice(&FIDB_MAGIC);
    out[4..8].copy_from_slice(&FIDB_DECLARED_LEN.to_le_bytes());
    out[DDRC_OFFSET..RDD_HEADER_OFFSET].copy_from_slice(&ddrc.as_bytes()[..DDRC_EMBEDDED_LEN]);
    out[RDD_HEADER_OFFSET..RDD_HEADER_OFFSET + 4].copy_from_slice(&RDD_MAGIC);
    out[RDD_HEADER_OFFSET + 4..DDRP_OFFSET].copy_from_slice(&RDD_DECLARED_LEN.to_le_bytes());
    out[DDRP_OFFSET..DDRP_OFFSET + DDRP_IMAGE_LEN].copy_from_slice(ddrp.as_bytes());
    Ok(out)
}
