//! RDD section: PHY geometry and timing.
//!
//! Layout (132 bytes, little-endian):
//! ```text
//! [0x00..0x04]  magic          00 'R' 'D' 'D'
//! [0x04..0x08]  declared len   0x7C
//! [0x08..0x0c]  CRC-32 of [0x0c..0x84)
//! [0x0c..0x10]  technology code (RDD encoding)
//! [0x10..0x18]  reserved
//! [0x18..0x1c]  ddr_freq / 100_000
//! [0x1c..0x20]  secondary frequency constant 10240
//! [0x20..0x24]  opaque         01 00 c2 00
//! [0x24]        CL  (or LPDDR RL/WL code)
//! [0x25]        BL  (or LPDDR RL/WL code)
//! [0x26]        row bits
//! [0x27]        column bits - 6
//! [0x28..0x34]  tRAS tRC tRCD tRP tRFC 04 tRTP 20 tFAW 00 tRRD tWTR
//! [0x34..0x70]  reserved
//! [0x70..0x84]  DQ pin mapping
//! ```

use ddr_core::crc32::crc32;
use ddr_core::geometry::GeometryEncoding;
use ddr_core::{DdrPhyParams, PlatformConfig};
use tracing::debug;

use crate::binary::put_u32;

/// `"\0RDD"` read as a little-endian word.
pub const RDD_MAGIC: [u8; 4] = [0x00, b'R', b'D', b'D'];

/// Value of the declared-length field. Constant, not derived.
pub const RDD_DECLARED_LEN: u32 = 0x7C;

/// Total section size including the 8-byte header.
pub const RDD_SECTION_LEN: usize = 132;

/// Offset of the stored checksum.
pub const CRC_OFFSET: usize = 0x08;

/// First byte covered by the checksum; coverage runs to the end.
pub const CRC_START: usize = 0x0c;

/// Default DQ pin mapping.
pub const DQ_MAP: [u8; 20] = [
    12, 13, 14, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 1, 2, 15, 16, 17, 18, 19,
];

const DQ_MAP_OFFSET: usize = RDD_SECTION_LEN - DQ_MAP.len();

// Opaque values observed in every stock capture. Do not derive.
const SECONDARY_FREQ: u32 = 10240;
const OPAQUE_20: [u8; 4] = [0x01, 0x00, 0xc2, 0x00];
const OPAQUE_2D: u8 = 0x04;
const OPAQUE_2F: u8 = 0x20;
const OPAQUE_31: u8 = 0x00;

/// Build the RDD section with its checksum filled in.
pub fn build_rdd(platform: &PlatformConfig, params: &DdrPhyParams) -> [u8; RDD_SECTION_LEN] {
    let mut buf = [0u8; RDD_SECTION_LEN];
    buf[0..4].copy_from_slice(&RDD_MAGIC);
    put_u32(&mut buf, 0x04, RDD_DECLARED_LEN);
    put_u32(&mut buf, 0x0c, params.ddr_type);
    put_u32(&mut buf, 0x18, platform.ddr_freq / 100_000);
    put_u32(&mut buf, 0x1c, SECONDARY_FREQ);
    buf[0x20..0x24].copy_from_slice(&OPAQUE_20);

    let (row, col) = GeometryEncoding::Calibration.encode_byte(params.row_bits, params.col_bits);
    buf[0x24] = params.cl;
    buf[0x25] = params.bl;
    buf[0x26] = row;
    buf[0x27] = col;

    buf[0x28..0x34].copy_from_slice(&[
        params.t_ras,
        params.t_rc,
        params.t_rcd,
        params.t_rp,
        params.t_rfc,
        OPAQUE_2D,
        params.t_rtp,
        OPAQUE_2F,
        params.t_faw,
        OPAQUE_31,
        params.t_rrd,
        params.t_wtr,
    ]);
    buf[DQ_MAP_OFFSET..].copy_from_slice(&DQ_MAP);

    let crc = rdd_checksum(&buf);
    put_u32(&mut buf, CRC_OFFSET, crc);
    debug!(crc = format_args!("{crc:#010x}"), ddr_type = params.ddr_type, "built RDD section");
    buf
}

/// Checksum over the covered range of an RDD section.
pub fn rdd_checksum(section: &[u8; RDD_SECTION_LEN]) -> u32 {
    crc32(&section[CRC_START..])
}
