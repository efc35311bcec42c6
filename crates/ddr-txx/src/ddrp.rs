//! DDR PHY register image.
//!
//! Layout (124 bytes, little-endian words):
//! ```text
//! [0x00]        DCR    DDRMD technology code, bit 3 = 8 banks
//! [0x04]        MR0
//! [0x08]        MR1
//! [0x0c]        MR2
//! [0x10]        MR3
//! [0x14]        DTPR0  tMRD tRTP tWTR tRP tRCD tRAS tRRD tRC
//! [0x18]        DTPR1  tFAW tRFC (tDQSCK for low-power parts)
//! [0x1c]        DTPR2  tXS tXP tCKE tDLLK
//! [0x20..0x68)  reserved
//! [0x68..0x7c)  DQ pin mapping
//! ```
//!
//! The PHY pass runs after the DDRC config creator on the same
//! [`VendorObject`]. It takes the bank count from the CFG word the DDRC
//! pass computed, writes every register into the PHY scratch region and
//! then copies the image out through [`DDRP_MAP`].
//!
//! Cycle counts come from [`validate_timings`]. Each field saturates at
//! its bit width.

use std::fmt;

use ddr_calib::rdd::DQ_MAP;
use ddr_core::cycles::ps_to_cycles_ceil;
use ddr_core::error::copy_into;
use ddr_core::{lpddr_rl_wl_code, DdrType, LogicalDdrConfig};
use tracing::debug;

use crate::ddrc::config_creator;
use crate::error::Result;
use crate::object::*;
use crate::validate::{validate_timings, TimingCycles};

/// Size of the PHY image.
pub const DDRP_IMAGE_LEN: usize = 0x7c;

const DCR: usize = 0x00;
const MR0: usize = 0x04;
const MR1: usize = 0x08;
const MR2: usize = 0x0c;
const MR3: usize = 0x10;
const DTPR0: usize = 0x14;
const DTPR1: usize = 0x18;
const DTPR2: usize = 0x1c;
const DQ_MAP_OFFSET: usize = DDRP_IMAGE_LEN - DQ_MAP.len();

const fn copy(out: usize, from: usize) -> CopyEntry {
    CopyEntry::new(out, from, DDRP_IMAGE_LEN)
}

/// Image words and the PHY scratch words they are taken from. The
/// reserved range stays zero.
const DDRP_MAP: [CopyEntry; 13] = [
    copy(DCR, PHY_DCR.offset()),
    copy(MR0, PHY_MR0.offset()),
    copy(MR1, PHY_MR1.offset()),
    copy(MR2, PHY_MR2.offset()),
    copy(MR3, PHY_MR3.offset()),
    copy(DTPR0, PHY_DTPR0.offset()),
    copy(DTPR1, PHY_DTPR1.offset()),
    copy(DTPR2, PHY_DTPR2.offset()),
    copy(DQ_MAP_OFFSET, PHY_DQ_MAP.offset()),
    copy(DQ_MAP_OFFSET + 0x04, PHY_DQ_MAP.offset() + 0x04),
    copy(DQ_MAP_OFFSET + 0x08, PHY_DQ_MAP.offset() + 0x08),
    copy(DQ_MAP_OFFSET + 0x0c, PHY_DQ_MAP.offset() + 0x0c),
    copy(DQ_MAP_OFFSET + 0x10, PHY_DQ_MAP.offset() + 0x10),
];

/// CFG byte 0, set by the config creator for eight-bank parts.
const CFG_BANK8: u32 = 1 << 1;
const DCR_BANK8: u32 = 1 << 3;
const T_MRD: u32 = 2;
const T_XS: u32 = 200;
const T_DLLK_DDR3: u32 = 512;
const T_DLLK_DDR2: u32 = 200;
const T_DQSCK: u32 = 1;
const T_DQSCK_MAX: u32 = 2;
/// LPDDR2/3 MR3 drive strength, 40 ohm.
const LPDDR_DS_40: u32 = 2;

/// The 124-byte PHY register image.
#[derive(Clone, PartialEq, Eq)]
pub struct DdrpImage {
    bytes: [u8; DDRP_IMAGE_LEN],
}

impl fmt::Debug for DdrpImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DdrpImage")
            .field("dcr", &format_args!("{:#010x}", self.word(DCR)))
            .field("dtpr0", &format_args!("{:#010x}", self.word(DTPR0)))
            .finish_non_exhaustive()
    }
}

impl DdrpImage {
    pub fn as_bytes(&self) -> &[u8; DDRP_IMAGE_LEN] {
        &self.bytes
    }

    pub fn word(&self, offset: usize) -> u32 {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&self.bytes[offset..offset + 4]);
        u32::from_le_bytes(buf)
    }

    pub fn write_into(&self, out: &mut [u8]) -> ddr_core::Result<usize> {
        copy_into(&self.bytes, out)
    }

}

/// `value` saturated to `width` bits and shifted into place.
fn field(value: u32, width: u32, shift: u32) -> u32 {
    value.min((1 << width) - 1) << shift
}

/// Mode register values, indexed MR0..MR3.
fn mode_registers(config: &LogicalDdrConfig, c: &TimingCycles) -> [u32; 4] {
    let cl = config.cas_latency;
    let bl_code = match config.burst_length {
        4 => 2,
        16 => 4,
        _ => 3,
    };
    match config.ddr_type {
        DdrType::Ddr2 => [
            bl_code | field(cl, 3, 4) | field(c.t_wr.saturating_sub(1), 3, 9),
            0,
            0,
            0,
        ],
        DdrType::Ddr3 => {
            // BL8 fixed, or on-the-fly BC4 for four-beat bursts.
            let bl = if config.burst_length == 4 { 2 } else { 0 };
            let cl_code = cl.saturating_sub(4);
            let mr0 = bl
                | field(cl_code, 3, 4)
                | field(cl_code >> 3, 1, 2)
                | field(ddr3_write_recovery(c.t_wr), 3, 9);
            let mr2 = field(c.t_wl.saturating_sub(5), 3, 3);
            [mr0, 0, mr2, 0]
        }
        DdrType::Lpddr => [bl_code | field(cl, 3, 4), 0, 0, 0],
        DdrType::Lpddr2 | DdrType::Lpddr3 => {
            let mr1 = bl_code | field(c.t_wr.saturating_sub(2), 3, 5);
            let mr2 = u32::from(lpddr_rl_wl_code(c.t_rl, c.t_wl));
            [0, mr1, mr2, LPDDR_DS_40]
        }
    }
}

/// DDR3 MR0 write-recovery code.
fn ddr3_write_recovery(t_wr: u32) -> u32 {
    match t_wr {
        0..=5 => 1,
        6..=8 => t_wr - 4,
        9 | 10 => 5,
        11 | 12 => 6,
        13 | 14 => 7,
        _ => 0,
    }
}

/// Generate the PHY image for `config` on a fresh object. The DDRC config
/// creator runs first, as it would in a full build.
pub fn generate_ddrp(config: &LogicalDdrConfig) -> Result<DdrpImage> {
    let mut obj = VendorObject::populate(config)?;
    config_creator(&mut obj);
    generate_ddrp_in(&mut obj, config)
}

/// Run the PHY pass on `obj`, which the DDRC pass has already been run
/// against, and copy out the image.
pub(crate) fn generate_ddrp_in(
    obj: &mut VendorObject,
    config: &LogicalDdrConfig,
) -> Result<DdrpImage> {
    config.validate()?;
    let period = config.clock_period_ps()?;
    let c = validate_timings(config)?.cycles;
    let ceil = |ps| ps_to_cycles_ceil(ps, period);

    obj.clear_phy_scratch();

    let mut dcr = config.ddr_type.phy_dcr_code();
    if obj.get(DDRC_CFG) & CFG_BANK8 != 0 {
        dcr |= DCR_BANK8;
    }
    obj.set(PHY_DCR, dcr);

    let mr = mode_registers(config, &c);
    for (word, value) in [PHY_MR0, PHY_MR1, PHY_MR2, PHY_MR3].into_iter().zip(mr) {
        obj.set(word, value);
    }

    let dtpr0 = field(T_MRD, 2, 0)
        | field(ceil(config.t_rtp), 3, 2)
        | field(ceil(config.t_wtr), 3, 5)
        | field(c.t_rp, 4, 8)
        | field(c.t_rcd, 4, 12)
        | field(c.t_ras, 5, 16)
        | field(c.t_rrd, 4, 21)
        | field(c.t_rc, 6, 25);
    obj.set(PHY_DTPR0, dtpr0);

    let mut dtpr1 = field(ceil(config.t_faw), 6, 3) | field(c.t_rfc, 8, 16);
    if config.ddr_type.is_low_power() {
        dtpr1 |= field(T_DQSCK, 3, 26) | field(T_DQSCK_MAX, 3, 29);
    }
    obj.set(PHY_DTPR1, dtpr1);

    let t_dllk = match config.ddr_type {
        DdrType::Ddr3 => T_DLLK_DDR3,
        DdrType::Ddr2 => T_DLLK_DDR2,
        _ => 0,
    };
    let dtpr2 = field(T_XS, 10, 0)
        | field(c.t_xp, 5, 10)
        | field(c.t_cke, 4, 15)
        | field(t_dllk, 10, 19);
    obj.set(PHY_DTPR2, dtpr2);

    obj.set_bytes(PHY_DQ_MAP, &DQ_MAP);

    let mut image = DdrpImage {
        bytes: [0; DDRP_IMAGE_LEN],
    };
    obj.copy_out(&DDRP_MAP, &mut image.bytes);

    debug!(
        dcr = format_args!("{dcr:#x}"),
        mr0 = format_args!("{:#x}", mr[0]),
        dtpr0 = format_args!("{dtpr0:#010x}"),
        dtpr1 = format_args!("{dtpr1:#010x}"),
        dtpr2 = format_args!("{dtpr2:#010x}"),
        "generated DDRP image"
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ddr2_400;

    fn bits(word: u32, width: u32, shift: u32) -> u32 {
        (word >> shift) & ((1 << width) - 1)
    }

    #[test]
    fn dcr_and_dq_map() {
        let image = generate_ddrp(&ddr2_400()).unwrap();
        assert_eq!(image.word(DCR), 2 | DCR_BANK8);
        assert_eq!(&image.as_bytes()[0x68..], &DQ_MAP);
        assert!(image.as_bytes()[0x20..0x68].iter().all(|&b| b == 0));
    }

    #[test]
    fn ddr2_mode_register() {
        let image = generate_ddrp(&ddr2_400()).unwrap();
        let mr0 = image.word(MR0);
        assert_eq!(bits(mr0, 3, 0), 3);
        assert_eq!(bits(mr0, 3, 4), 7);
        assert_eq!(bits(mr0, 3, 9), 5);
        assert_eq!(image.word(MR1), 0);
    }

    #[test]
    fn ddr2_timing_words() {
        let image = generate_ddrp(&ddr2_400()).unwrap();
        let d0 = image.word(DTPR0);
        assert_eq!(bits(d0, 2, 0), 2);
        assert_eq!(bits(d0, 3, 2), 3);
        assert_eq!(bits(d0, 3, 5), 3);
        assert_eq!(bits(d0, 4, 8), 7);
        assert_eq!(bits(d0, 4, 12), 7);
        assert_eq!(bits(d0, 5, 16), 18);
        assert_eq!(bits(d0, 4, 21), 4);
        assert_eq!(bits(d0, 6, 25), 23);

        let d1 = image.word(DTPR1);
        assert_eq!(bits(d1, 6, 3), 18);
        assert_eq!(bits(d1, 8, 16), 51);
        assert_eq!(bits(d1, 6, 26), 0);

        let d2 = image.word(DTPR2);
        assert_eq!(bits(d2, 10, 0), 200);
        assert_eq!(bits(d2, 5, 10), 3);
        assert_eq!(bits(d2, 4, 15), 3);
        assert_eq!(bits(d2, 10, 19), 200);
    }

    #[test]
    fn ddr3_mode_registers() {
        let mut cfg = ddr2_400();
        cfg.ddr_type = DdrType::Ddr3;
        let image = generate_ddrp(&cfg).unwrap();
        assert_eq!(image.word(DCR), 3 | DCR_BANK8);
        let mr0 = image.word(MR0);
        assert_eq!(bits(mr0, 2, 0), 0);
        assert_eq!(bits(mr0, 3, 4), 3);
        assert_eq!(bits(mr0, 3, 9), 2);
        // CWL 6
        assert_eq!(bits(image.word(MR2), 3, 3), 1);
        assert_eq!(bits(image.word(DTPR2), 10, 19), 512);
    }

    #[test]
    fn lpddr2_latency_code_and_dqsck() {
        let mut cfg = ddr2_400();
        cfg.ddr_type = DdrType::Lpddr2;
        cfg.banks = 4;
        cfg.total_size_bytes = cfg.geometry_size_bytes();
        cfg.t_rl = 6 * 2500;
        cfg.t_wl = 3 * 2500;
        cfg.burst_length = 4;
        let image = generate_ddrp(&cfg).unwrap();
        assert_eq!(image.word(DCR), 4);
        assert_eq!(image.word(MR0), 0);
        assert_eq!(bits(image.word(MR1), 3, 0), 2);
        assert_eq!(image.word(MR2), 4);
        assert_eq!(image.word(MR3), 2);
        let d1 = image.word(DTPR1);
        assert_eq!(bits(d1, 3, 26), 1);
        assert_eq!(bits(d1, 3, 29), 2);
        assert_eq!(bits(image.word(DTPR2), 10, 19), 0);
    }

    #[test]
    fn phy_pass_reads_bank_count_from_ddrc_scratch() {
        let cfg = ddr2_400();
        let mut obj = VendorObject::populate(&cfg).unwrap();
        config_creator(&mut obj);
        assert_ne!(obj.get(DDRC_CFG) & CFG_BANK8, 0);
        // Whatever the DDRC pass left in CFG is what the PHY pass sees.
        obj.merge_byte(DDRC_CFG.byte(0), !(CFG_BANK8 as u8), 0);
        let image = generate_ddrp_in(&mut obj, &cfg).unwrap();
        assert_eq!(image.word(DCR), 2);
        // Without the DDRC pass CFG is still zero.
        let mut fresh = VendorObject::populate(&cfg).unwrap();
        assert_eq!(generate_ddrp_in(&mut fresh, &cfg).unwrap().word(DCR), 2);
    }

    #[test]
    fn image_is_copied_from_phy_scratch() {
        let cfg = ddr2_400();
        let mut obj = VendorObject::populate(&cfg).unwrap();
        config_creator(&mut obj);
        let image = generate_ddrp_in(&mut obj, &cfg).unwrap();
        assert_eq!(obj.get(PHY_DCR), image.word(DCR));
        assert_eq!(obj.get(PHY_MR0), image.word(MR0));
        assert_eq!(obj.get(PHY_DTPR0), image.word(DTPR0));
        assert_eq!(obj.get(PHY_DTPR2), image.word(DTPR2));
        let dq = PHY_DQ_MAP.offset();
        assert_eq!(&obj.as_bytes()[dq..dq + DQ_MAP.len()], &DQ_MAP);
        assert_eq!(image, generate_ddrp(&cfg).unwrap());
    }

    #[test]
    fn timing_fields_saturate() {
        let mut cfg = ddr2_400();
        // tRAS 280 cycles, clamped to 127; the field holds 5 bits.
        cfg.t_ras = 700_000;
        cfg.t_xp = 0;
        let image = generate_ddrp(&cfg).unwrap();
        assert_eq!(bits(image.word(DTPR0), 5, 16), 31);
        // Neighbouring fields are untouched.
        assert_eq!(bits(image.word(DTPR0), 4, 21), 4);
        assert_eq!(bits(image.word(DTPR0), 4, 12), 7);
        // tXP clamped up to 1
        assert_eq!(bits(image.word(DTPR2), 5, 10), 1);
    }

    #[test]
    fn ddr3_write_recovery_codes() {
        assert_eq!(ddr3_write_recovery(5), 1);
        assert_eq!(ddr3_write_recovery(8), 4);
        assert_eq!(ddr3_write_recovery(10), 5);
        assert_eq!(ddr3_write_recovery(12), 6);
        assert_eq!(ddr3_write_recovery(14), 7);
        assert_eq!(ddr3_write_recovery(16), 0);
    }

    #[test]
    fn invalid_geometry_is_rejected() {
        let mut cfg = ddr2_400();
        cfg.banks = 2;
        assert!(generate_ddrp(&cfg).is_err());
    }

    #[test]
    fn write_into_short_buffer() {
        let image = generate_ddrp(&ddr2_400()).unwrap();
        let mut buf = [0u8; 64];
        assert!(image.write_into(&mut buf).is_err());
        assert!(buf.iter().all(|&b| b == 0));
    }
}
