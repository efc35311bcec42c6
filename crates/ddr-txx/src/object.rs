//! The vendor parameter object.
//!
//! The vendor tool works on a 0x300-byte scratch object: a parameter
//! block and timing block are filled in first, register fields are then
//! computed from them in place, and finally selected words are copied out
//! into the DDRC and PHY images. Both register passes run against the same
//! object, so the PHY pass sees what the DDRC pass left behind. All offsets
//! below are byte offsets into that object. Durations are stored in
//! picoseconds.
//!
//! ```text
//! [0x07c..0x0cc)  DDRC register scratch (CFG, CTRL, REFCNT, MMAP, TIMING1..6)
//! [0x0cc]         legacy type / CL word
//! [0x118..0x158)  parameter block (type, chip selects, geometry, sizes)
//! [0x158..0x188)  base timing block, picoseconds
//! [0x188]         CAS latency
//! [0x194..0x1c8)  DDR2 timing block, picoseconds
//! [0x22c]         clock period, picoseconds
//! [0x26c]         clock, MHz
//! [0x274..0x2a8)  PHY register scratch (DCR, MR0..3, DTPR0..2, DQ map)
//! ```

use ddr_core::geometry::GeometryEncoding;
use ddr_core::LogicalDdrConfig;

use crate::error::{Result, TxxError};

/// Size of the vendor object.
pub const OBJECT_LEN: usize = 0x300;

/// Offset of a little-endian 32-bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word(usize);

impl Word {
    /// Panics at compile time when used in a `const` with a misaligned or
    /// out-of-bounds offset.
    pub const fn at(offset: usize) -> Self {
        assert!(offset % 4 == 0, "word offset must be 4-byte aligned");
        assert!(offset + 4 <= OBJECT_LEN, "word offset past end of object");
        Word(offset)
    }

    pub const fn offset(self) -> usize {
        self.0
    }

    /// The `index`th byte of this word (0 is least significant).
    pub const fn byte(self, index: usize) -> Byte {
        assert!(index < 4, "byte index out of word");
        Byte(self.0 + index)
    }
}

/// Offset of a single byte field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Byte(usize);

impl Byte {
    pub const fn at(offset: usize) -> Self {
        assert!(offset < OBJECT_LEN, "byte offset past end of object");
        Byte(offset)
    }

    pub const fn offset(self) -> usize {
        self.0
    }
}

// DDRC register scratch.
pub const DDRC_CFG: Word = Word::at(0x7c);
pub const DDRC_CTRL: Word = Word::at(0x80);
pub const DDRC_LMR: Word = Word::at(0x84);
pub const DDRC_REFCNT: Word = Word::at(0x88);
pub const DDRC_DLP: Word = Word::at(0x8c);
pub const DDRC_MMAP0: Word = Word::at(0x90);
pub const DDRC_MMAP1: Word = Word::at(0x94);
pub const DDRC_TIMING1: Word = Word::at(0xac);
pub const DDRC_TIMING2: Word = Word::at(0xb0);
pub const DDRC_TIMING3: Word = Word::at(0xb4);
pub const DDRC_TIMING4: Word = Word::at(0xb8);
pub const DDRC_TIMING5: Word = Word::at(0xbc);
pub const DDRC_TIMING6: Word = Word::at(0xc0);
pub const DDRC_AUTOSR_EN: Word = Word::at(0xc4);
pub const LEGACY_TYPE_CL: Word = Word::at(0xcc);

/// Start and end of the region cleared before the register fields are
/// computed.
pub const DDRC_SCRATCH_START: usize = 0x7c;
pub const DDRC_SCRATCH_END: usize = 0xcc;

// Parameter block.
pub const PARAM_TYPE: Word = Word::at(0x118);
pub const PARAM_CS0_EN: Word = Word::at(0x124);
pub const PARAM_CS1_EN: Word = Word::at(0x128);
pub const PARAM_DW32: Word = Word::at(0x12c);
pub const PARAM_CL: Word = Word::at(0x130);
pub const PARAM_BL: Word = Word::at(0x138);
pub const PARAM_COL0: Word = Word::at(0x13c);
pub const PARAM_ROW0: Word = Word::at(0x140);
pub const PARAM_COL1: Word = Word::at(0x144);
pub const PARAM_ROW1: Word = Word::at(0x148);
pub const PARAM_BANK8: Word = Word::at(0x14c);
pub const PARAM_CS0_MB: Word = Word::at(0x150);
pub const PARAM_CS1_MB: Word = Word::at(0x154);

// Base timing block.
pub const BASE_TCCD: Word = Word::at(0x158);
pub const BASE_TRCD: Word = Word::at(0x15c);
pub const BASE_TRAS: Word = Word::at(0x160);
pub const BASE_TRP: Word = Word::at(0x164);
pub const BASE_TWR: Word = Word::at(0x168);
pub const BASE_TRRD: Word = Word::at(0x16c);
pub const BASE_TWL: Word = Word::at(0x170);
pub const BASE_TRTW: Word = Word::at(0x174);
pub const BASE_TRTR: Word = Word::at(0x178);
pub const BASE_TWTR: Word = Word::at(0x17c);
pub const BASE_TRC: Word = Word::at(0x180);
pub const BASE_TRTP: Word = Word::at(0x184);

pub const PHY_CL: Word = Word::at(0x188);

// DDR2 timing block.
pub const DDR2_TRAS: Word = Word::at(0x194);
pub const DDR2_TRP: Word = Word::at(0x198);
pub const DDR2_TRCD: Word = Word::at(0x19c);
pub const DDR2_TRC: Word = Word::at(0x1a0);
pub const DDR2_TWR: Word = Word::at(0x1a4);
pub const DDR2_TWTR: Word = Word::at(0x1a8);
pub const DDR2_TRRD: Word = Word::at(0x1ac);
pub const DDR2_TRFC: Word = Word::at(0x1b0);
pub const DDR2_TXP: Word = Word::at(0x1b4);
pub const DDR2_TCKE: Word = Word::at(0x1b8);
pub const DDR2_TRL: Word = Word::at(0x1bc);
pub const DDR2_TWL: Word = Word::at(0x1c0);
pub const DDR2_TREFI: Word = Word::at(0x1c4);

pub const CLOCK_PERIOD_PS: Word = Word::at(0x22c);
pub const CLOCK_MHZ: Word = Word::at(0x26c);
pub const INIT_FLAG: Word = Word::at(0x270);

// PHY register scratch.
pub const PHY_DCR: Word = Word::at(0x274);
pub const PHY_MR0: Word = Word::at(0x278);
pub const PHY_MR1: Word = Word::at(0x27c);
pub const PHY_MR2: Word = Word::at(0x280);
pub const PHY_MR3: Word = Word::at(0x284);
pub const PHY_DTPR0: Word = Word::at(0x288);
pub const PHY_DTPR1: Word = Word::at(0x28c);
pub const PHY_DTPR2: Word = Word::at(0x290);
pub const PHY_DQ_MAP: Byte = Byte::at(0x294);

pub const PHY_SCRATCH_START: usize = 0x274;
pub const PHY_SCRATCH_END: usize = 0x2a8;

/// One word of a copy map: image offset and the object word it takes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CopyEntry {
    pub out: usize,
    pub from: Word,
}

impl CopyEntry {
    /// Panics at compile time when `out` is misaligned or the word does
    /// not fit in an image of `image_len` bytes.
    pub const fn new(out: usize, from: usize, image_len: usize) -> Self {
        assert!(out % 4 == 0 && out + 4 <= image_len);
        CopyEntry {
            out,
            from: Word::at(from),
        }
    }
}

const MB: u64 = 1024 * 1024;

/// Largest chip-select size whose byte count still fits in 32 bits.
const MAX_CS_MB: u64 = (u32::MAX as u64 + 1) / MB - 1;

/// The vendor scratch object.
#[derive(Clone, PartialEq, Eq)]
pub struct VendorObject {
    bytes: [u8; OBJECT_LEN],
}

impl std::fmt::Debug for VendorObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorObject")
            .field("len", &OBJECT_LEN)
            .finish_non_exhaustive()
    }
}

impl Default for VendorObject {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl VendorObject {
    pub fn zeroed() -> Self {
        Self {
            bytes: [0; OBJECT_LEN],
        }
    }

    /// Fill the parameter and timing blocks from `config`.
    ///
    /// Only chip select 0 is populated; chip select 1 is always disabled.
    pub fn populate(config: &LogicalDdrConfig) -> Result<Self> {
        config.validate()?;
        let period = config.clock_period_ps()?;
        let geom = GeometryEncoding::Txx.encode(config.row_bits, config.col_bits)?;

        let cs0_mb = config.geometry_size_bytes() / MB;
        if cs0_mb > MAX_CS_MB {
            return Err(TxxError::MemoryMap { size_mb: cs0_mb });
        }

        let mut obj = Self::zeroed();

        obj.set(PARAM_TYPE, config.ddr_type.txx_code());
        obj.set(PARAM_CS0_EN, 1);
        obj.set(PARAM_CS1_EN, 0);
        obj.set(PARAM_DW32, u32::from(config.data_width == 32));
        obj.set(PARAM_CL, config.cas_latency);
        obj.set(PARAM_BL, config.burst_length);
        obj.set(PARAM_COL0, geom.col);
        obj.set(PARAM_ROW0, geom.row);
        obj.set(PARAM_COL1, geom.col);
        obj.set(PARAM_ROW1, geom.row);
        obj.set(PARAM_BANK8, u32::from(config.banks == 8));
        obj.set(PARAM_CS0_MB, cs0_mb as u32);
        obj.set(PARAM_CS1_MB, 0);

        obj.set(BASE_TRCD, config.t_rcd);
        obj.set(BASE_TRAS, config.t_ras);
        obj.set(BASE_TRP, config.t_rp);
        obj.set(BASE_TWR, config.t_wr);
        obj.set(BASE_TRRD, config.t_rrd);
        obj.set(BASE_TWL, config.t_wl);
        obj.set(BASE_TWTR, config.t_wtr);
        obj.set(BASE_TRC, config.t_rc);
        obj.set(BASE_TRTP, config.t_rtp);

        obj.set(PHY_CL, config.cas_latency);

        obj.set(DDR2_TRAS, config.t_ras);
        obj.set(DDR2_TRP, config.t_rp);
        obj.set(DDR2_TRCD, config.t_rcd);
        obj.set(DDR2_TRC, config.t_rc);
        obj.set(DDR2_TWR, config.t_wr);
        obj.set(DDR2_TWTR, config.t_wtr);
        obj.set(DDR2_TRRD, config.t_rrd);
        obj.set(DDR2_TRFC, config.t_rfc);
        obj.set(DDR2_TXP, config.t_xp);
        obj.set(DDR2_TCKE, config.t_cke);
        obj.set(DDR2_TRL, config.t_rl);
        obj.set(DDR2_TWL, config.t_wl);
        obj.set(DDR2_TREFI, config.t_refi);

        obj.set(CLOCK_PERIOD_PS, period);
        obj.set(CLOCK_MHZ, config.clock_mhz);
        obj.set(INIT_FLAG, 0);

        Ok(obj)
    }

    pub fn get(&self, word: Word) -> u32 {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&self.bytes[word.0..word.0 + 4]);
        u32::from_le_bytes(buf)
    }

    pub fn set(&mut self, word: Word, value: u32) {
        self.bytes[word.0..word.0 + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn byte(&self, byte: Byte) -> u8 {
        self.bytes[byte.0]
    }

    pub fn set_byte(&mut self, byte: Byte, value: u8) {
        self.bytes[byte.0] = value;
    }

    /// `b = (b & keep) | bits`.
    pub fn merge_byte(&mut self, byte: Byte, keep: u8, bits: u8) {
        self.bytes[byte.0] = (self.bytes[byte.0] & keep) | bits;
    }

    /// Store a 6-bit cycle count, preserving the top two bits.
    pub fn set_cycles6(&mut self, byte: Byte, cycles: u32) {
        self.merge_byte(byte, 0xc0, (cycles & 0x3f) as u8);
    }

    /// Like [`set_cycles6`](Self::set_cycles6), but counts above 63
    /// saturate instead of wrapping. Used for range-checked timings.
    pub fn store_cycles6(&mut self, byte: Byte, cycles: u32) {
        self.set_cycles6(byte, cycles.min(0x3f));
    }

    /// Copy `src` into the object starting at `start`. Panics past the end
    /// of the object.
    pub fn set_bytes(&mut self, start: Byte, src: &[u8]) {
        self.bytes[start.0..start.0 + src.len()].copy_from_slice(src);
    }

    /// Zero the DDRC register scratch region.
    pub fn clear_ddrc_scratch(&mut self) {
        self.bytes[DDRC_SCRATCH_START..DDRC_SCRATCH_END].fill(0);
    }

    /// Zero the PHY register scratch region.
    pub fn clear_phy_scratch(&mut self) {
        self.bytes[PHY_SCRATCH_START..PHY_SCRATCH_END].fill(0);
    }

    /// Copy the words named by `map` into `out`. Bytes of `out` not named
    /// by the map are left alone.
    pub(crate) fn copy_out(&self, map: &[CopyEntry], out: &mut [u8]) {
        for entry in map {
            out[entry.out..entry.out + 4].copy_from_slice(&self.get(entry.from).to_le_bytes());
        }
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_LEN] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ddr2_400;
    use ddr_core::DdrError;

    #[test]
    fn populate_parameter_block() {
        let obj = VendorObject::populate(&ddr2_400()).unwrap();
        assert_eq!(obj.get(PARAM_TYPE), 4);
        assert_eq!(obj.get(PARAM_CS0_EN), 1);
        assert_eq!(obj.get(PARAM_CS1_EN), 0);
        assert_eq!(obj.get(PARAM_DW32), 0);
        assert_eq!(obj.get(PARAM_BL), 8);
        assert_eq!(obj.get(PARAM_COL0), 6);
        assert_eq!(obj.get(PARAM_ROW0), 2);
        assert_eq!(obj.get(PARAM_BANK8), 1);
        assert_eq!(obj.get(PARAM_CS0_MB), 128);
        assert_eq!(obj.get(PARAM_CS1_MB), 0);
    }

    #[test]
    fn populate_clock_and_timings() {
        let obj = VendorObject::populate(&ddr2_400()).unwrap();
        assert_eq!(obj.get(CLOCK_PERIOD_PS), 2500);
        assert_eq!(obj.get(CLOCK_MHZ), 400);
        assert_eq!(obj.get(DDR2_TRFC), 127_500);
        assert_eq!(obj.get(DDR2_TREFI), 7_800_000);
        assert_eq!(obj.get(BASE_TRAS), 45_000);
        assert_eq!(obj.get(BASE_TCCD), 0);
        assert_eq!(obj.get(BASE_TRTW), 0);
        assert_eq!(obj.get(PARAM_CL), 7);
        assert_eq!(obj.get(PHY_CL), 7);
    }

    #[test]
    fn populate_rejects_zero_clock() {
        let mut cfg = ddr2_400();
        cfg.clock_mhz = 0;
        assert!(matches!(
            VendorObject::populate(&cfg),
            Err(TxxError::Config(DdrError::InvalidParameter { .. }))
        ));
    }

    #[test]
    fn populate_rejects_oversized_chip_select() {
        let mut cfg = ddr2_400();
        cfg.row_bits = 16;
        cfg.col_bits = 12;
        cfg.data_width = 32;
        cfg.total_size_bytes = cfg.geometry_size_bytes();
        assert_eq!(
            VendorObject::populate(&cfg),
            Err(TxxError::MemoryMap { size_mb: 8192 })
        );
    }

    #[test]
    fn byte_helpers() {
        let mut obj = VendorObject::zeroed();
        let b = DDRC_TIMING1.byte(1);
        assert_eq!(b.offset(), 0xad);
        obj.set_byte(b, 0xff);
        obj.set_cycles6(b, 0x41);
        assert_eq!(obj.byte(b), 0xc1);
        obj.merge_byte(b, 0x0f, 0x20);
        assert_eq!(obj.byte(b), 0x21);
        assert_eq!(obj.get(DDRC_TIMING1), 0x2100);
    }

    #[test]
    fn range_checked_counts_saturate() {
        let mut obj = VendorObject::zeroed();
        let b = DDRC_TIMING2.byte(1);
        obj.set_byte(b, 0x80);
        obj.store_cycles6(b, 127);
        assert_eq!(obj.byte(b), 0xbf);
        obj.store_cycles6(b, 18);
        assert_eq!(obj.byte(b), 0x92);
        // The masking store wraps the same count.
        obj.set_cycles6(b, 70);
        assert_eq!(obj.byte(b), 0x86);
    }

    #[test]
    fn copy_out_follows_map() {
        const MAP: [CopyEntry; 2] = [
            CopyEntry::new(0x00, 0x274, 8),
            CopyEntry::new(0x04, 0x7c, 8),
        ];
        let mut obj = VendorObject::zeroed();
        obj.set(PHY_DCR, 0x0a);
        obj.set(DDRC_CFG, 0x1234_5678);
        let mut out = [0xeeu8; 12];
        obj.copy_out(&MAP, &mut out);
        assert_eq!(&out[0..4], &[0x0a, 0, 0, 0]);
        assert_eq!(&out[4..8], &0x1234_5678u32.to_le_bytes());
        assert_eq!(&out[8..], &[0xee; 4]);
    }

    #[test]
    fn phy_scratch_is_separate_from_ddrc_scratch() {
        let mut obj = VendorObject::populate(&ddr2_400()).unwrap();
        obj.set(PHY_DTPR0, 7);
        obj.set_bytes(PHY_DQ_MAP, &[1, 2, 3]);
        obj.clear_ddrc_scratch();
        assert_eq!(obj.get(PHY_DTPR0), 7);
        assert_eq!(obj.byte(Byte::at(0x296)), 3);
        obj.set(DDRC_CFG, 1);
        obj.clear_phy_scratch();
        assert_eq!(obj.get(PHY_DTPR0), 0);
        assert_eq!(obj.get(DDRC_CFG), 1);
        assert_eq!(obj.get(INIT_FLAG), 0);
    }

    #[test]
    fn clear_scratch_leaves_parameters() {
        let mut obj = VendorObject::populate(&ddr2_400()).unwrap();
        obj.set(DDRC_CFG, 0xdead_beef);
        obj.set(LEGACY_TYPE_CL, 0x3b);
        obj.clear_ddrc_scratch();
        assert_eq!(obj.get(DDRC_CFG), 0);
        assert_eq!(obj.get(LEGACY_TYPE_CL), 0x3b);
        assert_eq!(obj.get(PARAM_CS0_MB), 128);
    }
}
