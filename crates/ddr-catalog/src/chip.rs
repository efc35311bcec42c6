//! DDR chip entries and the derivations built on them.

use ddr_core::cycles::{period_ps_from_hz, period_ps_from_mhz, tck_to_ps};
use ddr_core::{DdrPhyParams, DdrType, LogicalDdrConfig};
use serde::{Deserialize, Serialize};

/// Timing and geometry defaults for one DDR part.
///
/// Durations are picoseconds, except `t_cke` and `t_xp` which datasheets
/// give in clock cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChipTiming {
    /// Part name with technology suffix (e.g., "M14D1G1664A_DDR2").
    pub name: String,
    pub vendor: String,
    pub ddr_type: DdrType,
    pub banks: u32,
    pub data_width: u32,
    pub row_bits: u32,
    pub col_bits: u32,
    /// CAS latency in cycles.
    pub cl: u32,
    /// Burst length in beats.
    pub bl: u32,
    /// Read latency in cycles (LPDDR parts).
    pub rl: u32,
    /// Write latency in cycles.
    pub wl: u32,
    pub t_ras: u32,
    pub t_rc: u32,
    pub t_rcd: u32,
    pub t_rp: u32,
    pub t_rfc: u32,
    pub t_rtp: u32,
    pub t_faw: u32,
    pub t_rrd: u32,
    pub t_wtr: u32,
    pub t_wr: u32,
    pub t_refi: u32,
    /// Minimum CKE pulse width in cycles.
    pub t_cke: u32,
    /// Power-down exit in cycles.
    pub t_xp: u32,
}

impl ChipTiming {
    /// Capacity of one device implied by the geometry, in bytes.
    pub fn density_bytes(&self) -> u64 {
        (1u64 << self.row_bits)
            * (1u64 << self.col_bits)
            * u64::from(self.banks)
            * u64::from(self.data_width / 8)
    }

    /// Cycle-domain parameters for the RDD block at `ddr_freq_hz`.
    pub fn phy_params(&self, ddr_freq_hz: u32) -> DdrPhyParams {
        let logical = self.logical_config(ddr_freq_hz / 1_000_000, self.density_bytes());
        DdrPhyParams::from_logical(&logical, period_ps_from_hz(ddr_freq_hz))
    }

    /// Logical configuration for this chip clocked at `clock_mhz`.
    ///
    /// Cycle-denominated values (tCKE, tXP, RL, WL) are converted to
    /// picoseconds at that clock.
    pub fn logical_config(&self, clock_mhz: u32, total_size_bytes: u64) -> LogicalDdrConfig {
        let period = period_ps_from_mhz(clock_mhz);
        let read_latency = if self.ddr_type.is_low_power() {
            self.rl
        } else {
            self.cl
        };
        LogicalDdrConfig {
            ddr_type: self.ddr_type,
            clock_mhz,
            cas_latency: self.cl,
            burst_length: self.bl,
            t_ras: self.t_ras,
            t_rp: self.t_rp,
            t_rcd: self.t_rcd,
            t_rc: self.t_rc,
            t_wr: self.t_wr,
            t_rrd: self.t_rrd,
            t_wtr: self.t_wtr,
            t_rfc: self.t_rfc,
            t_rtp: self.t_rtp,
            t_faw: self.t_faw,
            t_xp: tck_to_ps(self.t_xp, period),
            t_cke: tck_to_ps(self.t_cke, period),
            t_rl: tck_to_ps(read_latency, period),
            t_wl: tck_to_ps(self.wl, period),
            t_refi: self.t_refi,
            banks: self.banks,
            row_bits: self.row_bits,
            col_bits: self.col_bits,
            data_width: self.data_width,
            total_size_bytes,
        }
    }
}
