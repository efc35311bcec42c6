//! DDRC register image.
//!
//! Generation runs in three passes over a [`VendorObject`]:
//!
//! 1. populate the parameter and timing blocks from the logical config
//! 2. compute register fields into the DDRC scratch region
//! 3. copy selected object words into the image
//!
//! Pass 2 always runs the config creator (CFG, CTRL, MMAP). What follows
//! depends on the [`DdrcStrategy`]. Every timing that
//! [`validate_timings`] range-checks is written from its clamped count.

use std::fmt;
use std::str::FromStr;

use ddr_core::cycles::{ps_to_cycles_ceil_scaled, PS_PER_NS};
use ddr_core::error::copy_into;
use ddr_core::{DdrError, DdrType, LogicalDdrConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::mmap::memory_map;
use crate::object::*;
use crate::validate::{validate_timings, TimingCycles};

/// Size of the DDRC image.
pub const DDRC_IMAGE_LEN: usize = 0xbc;

/// Which timing pass runs after the config creator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DdrcStrategy {
    /// Config creator only; timing registers stay zero. Matches the
    /// captured reference output.
    #[default]
    ConfigOnly,
    /// Vendor base timing pass, plus the DDR2 override pass for DDR2.
    VendorTiming,
    /// Validated-cycle packing with the extended copy map.
    Legacy,
}

impl DdrcStrategy {
    pub const ALL: [DdrcStrategy; 3] = [
        DdrcStrategy::ConfigOnly,
        DdrcStrategy::VendorTiming,
        DdrcStrategy::Legacy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DdrcStrategy::ConfigOnly => "config-only",
            DdrcStrategy::VendorTiming => "vendor-timing",
            DdrcStrategy::Legacy => "legacy",
        }
    }
}

impl fmt::Display for DdrcStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DdrcStrategy {
    type Err = DdrError;

    fn from_str(s: &str) -> ddr_core::Result<Self> {
        DdrcStrategy::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| DdrError::invalid(format!("unknown DDRC strategy '{s}'")))
    }
}

/// The 188-byte DDRC register image.
#[derive(Clone, PartialEq, Eq)]
pub struct DdrcImage {
    bytes: [u8; DDRC_IMAGE_LEN],
}

impl fmt::Debug for DdrcImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DdrcImage")
            .field("cfg", &format_args!("{:#010x}", self.word(0x00)))
            .field("ctrl", &format_args!("{:#010x}", self.word(0x04)))
            .finish_non_exhaustive()
    }
}

impl DdrcImage {
    pub fn as_bytes(&self) -> &[u8; DDRC_IMAGE_LEN] {
        &self.bytes
    }

    /// Little-endian word at `offset`. Panics past the end of the image.
    pub fn word(&self, offset: usize) -> u32 {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&self.bytes[offset..offset + 4]);
        u32::from_le_bytes(buf)
    }

    /// Copy into `out`, returning bytes written. Fails without writing if
    /// `out` is too short.
    pub fn write_into(&self, out: &mut [u8]) -> ddr_core::Result<usize> {
        copy_into(&self.bytes, out)
    }
}

const fn copy(out: usize, from: usize) -> CopyEntry {
    CopyEntry::new(out, from, DDRC_IMAGE_LEN)
}

/// Copy map for the config-only and vendor-timing strategies. The image
/// beyond the last entry stays zero.
const CONVERT_MAP: [CopyEntry; 31] = [
    copy(0x00, 0x7c),
    copy(0x04, 0x80),
    copy(0x08, 0x8c),
    copy(0x0c, 0x84),
    copy(0x10, 0x90),
    copy(0x14, 0x94),
    copy(0x18, 0x88),
    copy(0x1c, 0xac),
    copy(0x20, 0xb0),
    copy(0x24, 0xb4),
    copy(0x28, 0xb8),
    copy(0x2c, 0xbc),
    copy(0x30, 0xc0),
    copy(0x34, 0xc4),
    copy(0x38, 0xd0),
    copy(0x3c, 0xd8),
    copy(0x40, 0xdc),
    copy(0x44, 0x1d4),
    copy(0x48, 0x1dc),
    copy(0x4c, 0x1e4),
    copy(0x50, 0x1e8),
    copy(0x54, 0x1ec),
    copy(0x58, 0x1f0),
    copy(0x5c, 0x1f4),
    copy(0x60, 0x150),
    copy(0x64, 0x154),
    copy(0x68, 0x1c0),
    copy(0x6c, 0x1c4),
    copy(0x70, 0x1c8),
    copy(0x74, 0x1cc),
    copy(0x78, 0x1d0),
];

/// Copy map for the legacy strategy; covers the whole image.
const LEGACY_MAP: [CopyEntry; 47] = [
    copy(0x00, 0x7c),
    copy(0x04, 0x80),
    copy(0x08, 0x90),
    copy(0x0c, 0x94),
    copy(0x10, 0x88),
    copy(0x14, 0xac),
    copy(0x18, 0xb0),
    copy(0x1c, 0xb4),
    copy(0x20, 0xb8),
    copy(0x24, 0xbc),
    copy(0x28, 0xc0),
    copy(0x2c, 0xc4),
    copy(0x30, 0xcc),
    copy(0x34, 0xd0),
    copy(0x38, 0xd4),
    copy(0x3c, 0xd8),
    copy(0x40, 0xdc),
    copy(0x44, 0xe4),
    copy(0x48, 0xe4),
    copy(0x4c, 0xe4),
    copy(0x50, 0xf0),
    copy(0x54, 0xf4),
    copy(0x58, 0xf8),
    copy(0x5c, 0xe0),
    copy(0x60, 0xfc),
    copy(0x64, 0x100),
    copy(0x68, 0x108),
    copy(0x6c, 0x110),
    copy(0x70, 0x118),
    copy(0x74, 0x120),
    copy(0x78, 0x124),
    copy(0x7c, 0x128),
    copy(0x80, 0x12c),
    copy(0x84, 0x130),
    copy(0x88, 0x134),
    copy(0x8c, 0x138),
    copy(0x90, 0x13c),
    copy(0x94, 0x140),
    copy(0x98, 0x144),
    copy(0x9c, 0x148),
    copy(0xa0, 0x14c),
    copy(0xa4, 0x150),
    copy(0xa8, 0x18c),
    copy(0xac, 0x1a0),
    copy(0xb0, 0x1fc),
    copy(0xb4, 0x200),
    copy(0xb8, 0x204),
];

// DDRC CTRL bits.
const CTRL_ACTPD: u32 = 1 << 15;
const CTRL_PDT_64: u32 = 4 << 12;
const CTRL_ACTSTP: u32 = 1 << 11;
const CTRL_PRET_8: u32 = 1 << 8;
const CTRL_UNALIGN: u32 = 1 << 4;
const CTRL_ALH: u32 = 1 << 3;
const CTRL_RDC: u32 = 1 << 2;
const CTRL_CKE: u32 = 1 << 1;

/// Fixed DDRC CTRL value.
pub const DDRC_CTRL_VALUE: u32 = CTRL_ACTPD
    | CTRL_PDT_64
    | CTRL_ACTSTP
    | CTRL_PRET_8
    | CTRL_UNALIGN
    | CTRL_ALH
    | CTRL_RDC
    | CTRL_CKE;

/// Generate the DDRC image for `config` on a fresh object.
pub fn generate_ddrc(config: &LogicalDdrConfig, strategy: DdrcStrategy) -> Result<DdrcImage> {
    let mut obj = VendorObject::populate(config)?;
    generate_ddrc_in(&mut obj, config, strategy)
}

/// Run the DDRC passes on an already populated `obj` and copy out the
/// image. The register scratch is left in `obj` for the PHY pass.
pub(crate) fn generate_ddrc_in(
    obj: &mut VendorObject,
    config: &LogicalDdrConfig,
    strategy: DdrcStrategy,
) -> Result<DdrcImage> {
    let cycles = validate_timings(config)?.cycles;
    config_creator(obj);

    let map: &[CopyEntry] = match strategy {
        DdrcStrategy::ConfigOnly => &CONVERT_MAP,
        DdrcStrategy::VendorTiming => {
            vendor_timing(obj, &cycles);
            if config.ddr_type == DdrType::Ddr2 {
                ddr2_timing(obj, &cycles);
            }
            &CONVERT_MAP
        }
        DdrcStrategy::Legacy => {
            legacy_timing(obj, config, &cycles);
            &LEGACY_MAP
        }
    };

    let mut image = DdrcImage {
        bytes: [0; DDRC_IMAGE_LEN],
    };
    obj.copy_out(map, &mut image.bytes);
    debug!(
        %strategy,
        cfg = format_args!("{:#010x}", image.word(0x00)),
        "generated DDRC image"
    );
    Ok(image)
}

/// CFG, CTRL and MMAP from the parameter block.
pub(crate) fn config_creator(obj: &mut VendorObject) {
    let ddr_type = obj.get(PARAM_TYPE);
    let cs0_en = obj.get(PARAM_CS0_EN);
    let cs1_en = obj.get(PARAM_CS1_EN);
    let dw32 = obj.get(PARAM_DW32);
    let bl = obj.get(PARAM_BL);
    let (col0, row0) = (obj.get(PARAM_COL0), obj.get(PARAM_ROW0));
    let (col1, row1) = (obj.get(PARAM_COL1), obj.get(PARAM_ROW1));
    let bank8 = obj.get(PARAM_BANK8);

    obj.clear_ddrc_scratch();

    let row_field = |row: u32| (row.wrapping_mul(8).wrapping_add(0x20) & 0x38) as u8;

    let b0 = ((cs1_en as u8) << 7)
        | (((cs0_en & 1) as u8) << 6)
        | (((bank8 & 1) as u8) << 1)
        | (dw32 & 1) as u8;

    let b1 = if cs0_en == 0 {
        0x80
    } else {
        0x80 | row_field(row0) | (col0 & 7) as u8
    };

    let mut b2 = ((bank8 as u8) << 7) | 0x40 | (u8::from(bl == 8) << 5);
    if ddr_type < 5 {
        let nibble = match ddr_type {
            0 => 0x0c,
            1 => 0x06,
            4 => 0x08,
            _ => 0x0a,
        };
        b2 = (b2 & 0xf0) | nibble;
    }

    // The top two bits of byte 3 are carried over from byte 2.
    let (row3, col3) = if cs1_en == 0 { (row0, col0) } else { (row1, col1) };
    let b3 = (b2 & 0xc0) | row_field(row3) | (col3 & 7) as u8;

    obj.set(DDRC_CFG, u32::from_le_bytes([b0, b1, b2, b3]));
    obj.set(DDRC_CTRL, DDRC_CTRL_VALUE);

    let map = memory_map(obj.get(PARAM_CS0_MB), obj.get(PARAM_CS1_MB));
    obj.set(DDRC_MMAP0, map.mmap0);
    obj.set(DDRC_MMAP1, map.mmap1);
}

/// Vendor `PS2CYCLE_DIV` on the object word at `w`, against the stored
/// clock period.
fn cycles_at(obj: &VendorObject, w: Word, div: u32) -> u32 {
    ps_to_cycles_ceil_scaled(obj.get(w), obj.get(CLOCK_PERIOD_PS), div)
}

/// Base timing pass. Range-checked timings come from `c`; the rest are
/// converted from the picosecond timing block.
fn vendor_timing(obj: &mut VendorObject, c: &TimingCycles) {
    obj.store_cycles6(DDRC_TIMING1.byte(1), c.t_wr);
    let t_rtp = cycles_at(obj, BASE_TRTP, 1);
    obj.set_cycles6(DDRC_TIMING1.byte(0), t_rtp);
    let t_ccd = cycles_at(obj, BASE_TCCD, 1);
    obj.set_cycles6(DDRC_TIMING2.byte(2), t_ccd);
    obj.store_cycles6(DDRC_TIMING2.byte(1), c.t_ras);
    obj.store_cycles6(DDRC_TIMING2.byte(0), c.t_rc);

    obj.merge_byte(DDRC_TIMING3.byte(3), 0x87, 0x20);
    obj.store_cycles6(DDRC_TIMING3.byte(2), c.t_rcd);
    obj.store_cycles6(DDRC_TIMING3.byte(1), c.t_rrd);
    obj.store_cycles6(DDRC_TIMING3.byte(0), c.t_rp);

    // Half-rate ceiling, halved again, minus one. Wraps for a zero tRTW.
    let t_rtw = (cycles_at(obj, BASE_TRTW, 2) / 2).wrapping_sub(1);
    obj.set_cycles6(DDRC_TIMING4.byte(3), t_rtw);

    obj.merge_byte(DDRC_TIMING4.byte(2), 0x07, 0x60);
    let t_wtr = cycles_at(obj, BASE_TWTR, 1).wrapping_add(1);
    obj.merge_byte(DDRC_TIMING4.byte(2), 0xf8, (t_wtr & 7) as u8);

    let t_rtr = cycles_at(obj, BASE_TRTR, 1);
    obj.merge_byte(DDRC_TIMING4.byte(0), 0x8f, ((t_rtr & 7) << 4) as u8);

    // Opaque constants matching the vendor pass. Do not derive.
    obj.set_byte(DDRC_TIMING5.byte(3), 0xff);
    obj.merge_byte(DDRC_TIMING6.byte(1), 0xc0, 5);
    obj.merge_byte(DDRC_TIMING6.byte(0), 0xc0, 5);
    obj.set(DDRC_AUTOSR_EN, 0);
}

/// DDR2 overrides, run after [`vendor_timing`].
fn ddr2_timing(obj: &mut VendorObject, c: &TimingCycles) {
    obj.store_cycles6(DDRC_TIMING1.byte(3), c.t_wr);

    let burst = obj.get(PARAM_BL);
    let write_latency = c
        .t_wl
        .wrapping_add(obj.get(PARAM_CL))
        .wrapping_sub(1)
        .wrapping_add(burst / 2);
    obj.set_cycles6(DDRC_TIMING1.byte(2), write_latency);

    match burst {
        4 => obj.merge_byte(DDRC_TIMING5.byte(2), 0xc0, 4),
        8 => obj.merge_byte(DDRC_TIMING5.byte(2), 0xc0, 6),
        _ => {}
    }

    let rtp = obj.byte(DDRC_TIMING1.byte(0)) & 0x3f;
    if rtp > 0 {
        obj.set_cycles6(DDRC_TIMING5.byte(0), u32::from(rtp - 1));
    }
    let rc = obj.byte(DDRC_TIMING2.byte(0)) & 0x3f;
    if rc >= 2 {
        obj.set_cycles6(DDRC_TIMING5.byte(1), u32::from(rc.wrapping_sub(3)));
    }

    let t_wtr = cycles_at(obj, DDR2_TWTR, 1);
    obj.set_cycles6(DDRC_TIMING2.byte(3), t_wtr);

    obj.merge_byte(DDRC_TIMING3.byte(3), 0xf8, 0);

    obj.merge_byte(DDRC_TIMING4.byte(0), 0xfc, (c.t_rfc.wrapping_sub(1) & 3) as u8);

    // ceil(ceil(x / p) / 4) == ceil(x / 4p), so the quarter-rate counts
    // follow from the clamped ones. Clamped counts are at most 127.
    let quarter = c.t_ras.div_ceil(4).max(c.t_rc.div_ceil(4));
    obj.set_byte(DDRC_TIMING6.byte(3), quarter as u8);

    let rfc8 = c.t_rfc.div_ceil(8);
    obj.merge_byte(DDRC_TIMING4.byte(1), 0xf0, (rfc8.wrapping_sub(1) & 0xf) as u8);

    obj.store_cycles6(DDRC_TIMING6.byte(2), c.t_rrd);
}

/// Type field of the legacy type/CL word.
fn legacy_type_field(ddr_type: DdrType) -> u32 {
    match ddr_type {
        DdrType::Ddr2 => 3,
        DdrType::Ddr3 => 0,
        DdrType::Lpddr | DdrType::Lpddr2 => 4,
        DdrType::Lpddr3 => 2,
    }
}

/// REFCNT word for a refresh interval of `t_refi_ns` at `clock_mhz`.
///
/// The count is divided by 16 until it fits in a byte, at most seven
/// times; the divider exponent goes in bits 3:1 and bit 0 enables refresh.
pub fn refresh_count(t_refi_ns: u32, clock_mhz: u32) -> u32 {
    if clock_mhz == 0 {
        return 1;
    }
    let count = (t_refi_ns / clock_mhz).wrapping_sub(16);
    if (count as i32) < 0 {
        return 1;
    }
    let (mut count, mut shift) = (count, 0u32);
    while count > 255 && shift < 7 {
        count /= 16;
        shift += 1;
    }
    (count << 16) | (shift * 2) | 1
}

fn legacy_timing(obj: &mut VendorObject, config: &LogicalDdrConfig, c: &TimingCycles) {
    obj.store_cycles6(DDRC_TIMING1.byte(1), c.t_wr);
    obj.store_cycles6(DDRC_TIMING1.byte(0), c.t_wl);
    obj.store_cycles6(DDRC_TIMING2.byte(2), c.t_ras);
    obj.store_cycles6(DDRC_TIMING2.byte(1), c.t_rcd);
    obj.store_cycles6(DDRC_TIMING2.byte(0), c.t_rl);
    obj.merge_byte(DDRC_TIMING3.byte(3), 0x87, 0x20);
    obj.store_cycles6(DDRC_TIMING3.byte(2), c.t_rp);
    obj.store_cycles6(DDRC_TIMING3.byte(1), c.t_rrd);
    obj.store_cycles6(DDRC_TIMING3.byte(0), c.t_rc);
    obj.merge_byte(DDRC_TIMING4.byte(2), 0x07, 0x60);
    obj.store_cycles6(DDRC_TIMING4.byte(3), c.t_rfc);
    obj.set_byte(DDRC_TIMING5.byte(3), 0xff);
    obj.merge_byte(DDRC_TIMING4.byte(0), 0x8f, ((c.t_xp & 7) << 4) as u8);
    obj.merge_byte(DDRC_TIMING6.byte(1), 0xc0, 5);
    obj.merge_byte(DDRC_TIMING6.byte(0), 0xc0, 5);
    obj.merge_byte(DDRC_TIMING4.byte(2), 0xf8, (c.t_cke & 7) as u8);

    obj.set(
        DDRC_REFCNT,
        refresh_count(config.t_refi / PS_PER_NS, config.clock_mhz),
    );
    obj.set(DDRC_AUTOSR_EN, 0);
    obj.set(
        LEGACY_TYPE_CL,
        (config.cas_latency << 3) | legacy_type_field(config.ddr_type),
    );
}
