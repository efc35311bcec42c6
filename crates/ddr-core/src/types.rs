//! Value types flowing through the compiler.
//!
//! [`LogicalDdrConfig`] is the human-meaningful input (durations in
//! picoseconds, geometry in bits). [`DdrPhyParams`] is the already
//! cycle-converted input of the calibration dialect. [`PlatformConfig`]
//! carries the SoC-level frequencies written into the FIDB block.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cycles::{ps_to_cycles_ceil, ps_to_cycles_ceil_halved};
use crate::error::{DdrError, Result};

/// Memory technology.
///
/// The discriminants are the logical encoding used by [`LogicalDdrConfig`].
/// Each output dialect has its own numeric encoding; see the `*_code`
/// methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DdrType {
    Ddr2 = 0,
    Ddr3 = 1,
    Lpddr = 2,
    Lpddr2 = 3,
    Lpddr3 = 4,
}

impl DdrType {
    /// All technologies, in logical-code order.
    pub const ALL: [DdrType; 5] = [
        DdrType::Ddr2,
        DdrType::Ddr3,
        DdrType::Lpddr,
        DdrType::Lpddr2,
        DdrType::Lpddr3,
    ];

    /// Logical enumeration value.
    pub fn logical_code(self) -> u32 {
        self as u32
    }

    /// Encoding used in the RDD block of the calibration dialect.
    pub fn rdd_code(self) -> u32 {
        match self {
            DdrType::Ddr3 => 0,
            DdrType::Ddr2 => 1,
            DdrType::Lpddr | DdrType::Lpddr2 => 2,
            DdrType::Lpddr3 => 4,
        }
    }

    /// Encoding stored in the vendor parameter object of the TXX dialect:
    /// 4 for DDR2, the logical value for everything else.
    ///
    /// LPDDR3 therefore collides with DDR2. That collision is what the
    /// vendor object holds and is kept as-is.
    pub fn txx_code(self) -> u32 {
        match self {
            DdrType::Ddr2 => 4,
            other => other.logical_code(),
        }
    }

    /// DDRMD field of the PHY DCR register.
    pub fn phy_dcr_code(self) -> u32 {
        match self {
            DdrType::Lpddr => 0,
            DdrType::Ddr2 => 2,
            DdrType::Ddr3 => 3,
            DdrType::Lpddr2 | DdrType::Lpddr3 => 4,
        }
    }

    /// Whether this is a low-power part (RL/WL instead of CL/BL).
    pub fn is_low_power(self) -> bool {
        matches!(self, DdrType::Lpddr | DdrType::Lpddr2 | DdrType::Lpddr3)
    }

    /// Lowercase name as used in catalog files and chip suffixes.
    pub fn as_str(self) -> &'static str {
        match self {
            DdrType::Ddr2 => "ddr2",
            DdrType::Ddr3 => "ddr3",
            DdrType::Lpddr => "lpddr",
            DdrType::Lpddr2 => "lpddr2",
            DdrType::Lpddr3 => "lpddr3",
        }
    }
}

impl fmt::Display for DdrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for DdrType {
    type Err = DdrError;

    fn from_str(s: &str) -> Result<Self> {
        DdrType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DdrError::invalid(format!("unknown memory technology '{s}'")))
    }
}

/// Logical DDR configuration: the compiler's input.
///
/// All `t_*` fields are durations in picoseconds. A zero timing means
/// "unset" and converts to zero cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LogicalDdrConfig {
    /// Memory technology.
    pub ddr_type: DdrType,
    /// DDR clock in MHz. Must be non-zero.
    pub clock_mhz: u32,
    /// CAS latency in cycles.
    pub cas_latency: u32,
    /// Burst length in beats.
    pub burst_length: u32,
    /// Row active time.
    pub t_ras: u32,
    /// Row precharge time.
    pub t_rp: u32,
    /// RAS-to-CAS delay.
    pub t_rcd: u32,
    /// Row cycle time.
    pub t_rc: u32,
    /// Write recovery time.
    pub t_wr: u32,
    /// Row-to-row activate delay.
    pub t_rrd: u32,
    /// Write-to-read delay.
    pub t_wtr: u32,
    /// Refresh cycle time.
    pub t_rfc: u32,
    /// Read-to-precharge delay.
    pub t_rtp: u32,
    /// Four-activate window.
    pub t_faw: u32,
    /// Power-down exit time.
    pub t_xp: u32,
    /// Minimum CKE pulse width.
    pub t_cke: u32,
    /// Read latency.
    pub t_rl: u32,
    /// Write latency.
    pub t_wl: u32,
    /// Average refresh interval.
    pub t_refi: u32,
    /// Bank count (4 or 8).
    pub banks: u32,
    /// Row address bits.
    pub row_bits: u32,
    /// Column address bits.
    pub col_bits: u32,
    /// Data bus width in bits (8, 16 or 32).
    pub data_width: u32,
    /// Total addressable size in bytes. Must equal the size implied by
    /// the geometry.
    pub total_size_bytes: u64,
}

impl LogicalDdrConfig {
    /// Clock period in picoseconds as the vendor object stores it
    /// (`1_000_000 / clock_mhz`, truncating).
    pub fn clock_period_ps(&self) -> Result<u32> {
        if self.clock_mhz == 0 {
            return Err(DdrError::invalid("clock frequency must be non-zero"));
        }
        Ok(1_000_000 / self.clock_mhz)
    }

    /// Check the structural ranges the register packers rely on.
    pub fn validate(&self) -> Result<()> {
        self.clock_period_ps()?;
        if !matches!(self.banks, 4 | 8) {
            return Err(DdrError::invalid(format!(
                "bank count {} is not 4 or 8",
                self.banks
            )));
        }
        if !matches!(self.data_width, 8 | 16 | 32) {
            return Err(DdrError::invalid(format!(
                "data width {} is not 8, 16 or 32",
                self.data_width
            )));
        }
        if !(11..=16).contains(&self.row_bits) {
            return Err(DdrError::invalid(format!(
                "row bits {} outside 11..=16",
                self.row_bits
            )));
        }
        if !(8..=12).contains(&self.col_bits) {
            return Err(DdrError::invalid(format!(
                "column bits {} outside 8..=12",
                self.col_bits
            )));
        }
        if !matches!(self.burst_length, 4 | 8 | 16) {
            return Err(DdrError::invalid(format!(
                "burst length {} is not 4, 8 or 16",
                self.burst_length
            )));
        }
        // Only chip select 0 is populated, so it holds the whole part.
        let geometry = self.geometry_size_bytes();
        if self.total_size_bytes != geometry {
            return Err(DdrError::invalid(format!(
                "total size {} bytes does not match the geometry ({} bytes)",
                self.total_size_bytes, geometry
            )));
        }
        Ok(())
    }

    /// Capacity of one chip select implied by the geometry, in bytes.
    pub fn geometry_size_bytes(&self) -> u64 {
        (1u64 << self.row_bits)
            * (1u64 << self.col_bits)
            * u64::from(self.banks)
            * u64::from(self.data_width / 8)
    }
}

/// Platform-level values written into the FIDB block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformConfig {
    /// Crystal oscillator frequency in Hz.
    pub crystal_freq: u32,
    /// CPU frequency in Hz.
    pub cpu_freq: u32,
    /// DDR frequency in Hz.
    pub ddr_freq: u32,
    /// Bootloader console baud rate.
    pub uart_baud: u32,
    /// Memory size field in bytes.
    pub mem_size: u32,
}

/// Cycle-domain PHY parameters for the RDD block.
///
/// Every field is stored as-is; values wider than a byte are the caller's
/// responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DdrPhyParams {
    /// RDD technology code (see [`DdrType::rdd_code`]).
    pub ddr_type: u32,
    pub row_bits: u8,
    pub col_bits: u8,
    pub cl: u8,
    pub bl: u8,
    pub t_ras: u8,
    pub t_rc: u8,
    pub t_rcd: u8,
    pub t_rp: u8,
    pub t_rfc: u8,
    pub t_rtp: u8,
    pub t_faw: u8,
    pub t_rrd: u8,
    pub t_wtr: u8,
}

fn saturate_u8(value: u32) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

/// LPDDR read/write latency code: `(rl << 4) | wl` mapped to 1..=6.
/// Unknown pairs encode as 1.
pub fn lpddr_rl_wl_code(rl: u32, wl: u32) -> u8 {
    match (rl << 4) | wl {
        0x31 => 1,
        0x42 => 2,
        0x52 => 3,
        0x63 => 4,
        0x74 => 5,
        0x84 => 6,
        _ => 1,
    }
}

impl DdrPhyParams {
    /// Derive RDD parameters from a logical configuration at `period_ps`.
    ///
    /// tRFC uses the halved ceiling for DDR2/DDR3 and a plain ceiling
    /// otherwise. LPDDR/LPDDR2 parts carry the RL/WL code in both the CL and
    /// BL bytes. Cycle counts wider than a byte saturate at 255.
    pub fn from_logical(config: &LogicalDdrConfig, period_ps: u32) -> Self {
        let ceil = |ps: u32| saturate_u8(ps_to_cycles_ceil(ps, period_ps));

        let t_rfc = saturate_u8(match config.ddr_type {
            DdrType::Ddr2 | DdrType::Ddr3 => ps_to_cycles_ceil_halved(config.t_rfc, period_ps),
            _ => ps_to_cycles_ceil(config.t_rfc, period_ps),
        });

        let (cl, bl) = match config.ddr_type {
            DdrType::Lpddr | DdrType::Lpddr2 => {
                let code = lpddr_rl_wl_code(
                    ps_to_cycles_ceil(config.t_rl, period_ps),
                    ps_to_cycles_ceil(config.t_wl, period_ps),
                );
                (code, code)
            }
            _ => (config.cas_latency as u8, config.burst_length as u8),
        };

        DdrPhyParams {
            ddr_type: config.ddr_type.rdd_code(),
            row_bits: config.row_bits as u8,
            col_bits: config.col_bits as u8,
            cl,
            bl,
            t_ras: ceil(config.t_ras),
            t_rc: ceil(config.t_rc),
            t_rcd: ceil(config.t_rcd),
            t_rp: ceil(config.t_rp),
            t_rfc,
            t_rtp: ceil(config.t_rtp),
            t_faw: ceil(config.t_faw),
            t_rrd: ceil(config.t_rrd),
            t_wtr: ceil(config.t_wtr),
        }
    }
}
