//! Compilation pipeline.

use std::fmt;
use std::str::FromStr;

use ddr_calib::{build_binary, get_platform_config};
use ddr_core::{DdrError, DdrPhyParams, LogicalDdrConfig, PlatformConfig};
use ddr_txx::{build_register_binary, validate_timings, DdrcStrategy, RangeIssue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::binary::CompiledBinary;
use crate::error::Result;
use crate::report::CompileReport;

/// Output binary dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// FIDB platform block plus CRC-guarded RDD PHY block.
    #[default]
    Calibration,
    /// FIDB-framed DDRC registers plus RDD-framed PHY registers.
    Registers,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Calibration, Dialect::Registers];

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Calibration => "calibration",
            Dialect::Registers => "registers",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = DdrError;

    fn from_str(s: &str) -> ddr_core::Result<Self> {
        Dialect::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| DdrError::invalid(format!("unknown dialect '{s}'")))
    }
}

/// Options for a compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub dialect: Dialect,
    /// DDRC timing strategy (registers dialect only).
    pub strategy: DdrcStrategy,
    /// Platform block values (calibration dialect only). Defaults to the
    /// T31 profile with the DDR frequency taken from the config clock.
    pub platform: Option<PlatformConfig>,
}

/// Output of a successful compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub binary: CompiledBinary,
    /// Timings that fell outside their field range and were clamped.
    pub issues: Vec<RangeIssue>,
    pub report: CompileReport,
}

impl CompileOutput {
    pub fn out_of_range_count(&self) -> usize {
        self.issues.len()
    }
}

/// Platform for the calibration dialect when none is given.
pub fn default_platform(config: &LogicalDdrConfig) -> PlatformConfig {
    PlatformConfig {
        ddr_freq: config.clock_mhz.saturating_mul(1_000_000),
        ..get_platform_config(None)
    }
}

/// Compile `config` into a 324-byte binary.
///
/// Out-of-range timings never fail compilation; they are clamped,
/// logged and returned in [`CompileOutput::issues`]. Both dialects emit
/// the clamped counts.
pub fn compile(config: &LogicalDdrConfig, options: &CompileOptions) -> Result<CompileOutput> {
    // 1. Structural checks (clock, geometry, burst length)
    config.validate()?;

    // 2. Range checks, shared by both dialects
    let validated = validate_timings(config)?;
    for issue in &validated.issues {
        warn!(
            field = issue.field,
            cycles = issue.cycles,
            min = issue.min,
            max = issue.max,
            clamped_to = issue.clamped_to,
            "timing out of range"
        );
    }

    // 3. Dialect-specific build
    let binary = match options.dialect {
        Dialect::Calibration => {
            let platform = options
                .platform
                .unwrap_or_else(|| default_platform(config));
            let params = validated.phy_params(config, config.clock_period_ps()?);
            debug!(?platform, ?params, "calibration inputs");
            compile_phy_params(&platform, &params)
        }
        Dialect::Registers => {
            CompiledBinary::from(build_register_binary(config, options.strategy)?)
        }
    };

    let report = CompileReport::new(config, options, &binary, &validated.issues);
    info!(
        dialect = %options.dialect,
        ddr_type = %config.ddr_type,
        clock_mhz = config.clock_mhz,
        out_of_range = validated.issues.len(),
        sha256 = %report.sha256,
        "compiled DDR configuration"
    );

    Ok(CompileOutput {
        binary,
        issues: validated.issues,
        report,
    })
}

/// Calibration binary from an explicit platform and cycle-domain
/// parameter set, bypassing the logical config.
pub fn compile_phy_params(platform: &PlatformConfig, params: &DdrPhyParams) -> CompiledBinary {
    CompiledBinary::from(build_binary(platform, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddr_core::DdrType;

    fn ddr2_400() -> LogicalDdrConfig {
        LogicalDdrConfig {
            ddr_type: DdrType::Ddr2,
            clock_mhz: 400,
            cas_latency: 7,
            burst_length: 8,
            t_ras: 45_000,
            t_rp: 15_000,
            t_rcd: 15_000,
            t_rc: 57_500,
            t_wr: 15_000,
            t_rrd: 10_000,
            t_wtr: 7_500,
            t_rfc: 127_500,
            t_rtp: 7_500,
            t_faw: 45_000,
            t_xp: 7_500,
            t_cke: 7_500,
            t_rl: 17_500,
            t_wl: 15_000,
            t_refi: 7_800_000,
            banks: 8,
            row_bits: 13,
            col_bits: 10,
            data_width: 16,
            total_size_bytes: 128 << 20,
        }
    }

    #[test]
    fn default_options() {
        let o = CompileOptions::default();
        assert_eq!(o.dialect, Dialect::Calibration);
        assert_eq!(o.strategy, DdrcStrategy::ConfigOnly);
        assert!(o.platform.is_none());
    }

    #[test]
    fn default_platform_takes_config_clock() {
        let p = default_platform(&ddr2_400());
        assert_eq!(p.ddr_freq, 400_000_000);
        assert_eq!(p.crystal_freq, 24_000_000);
    }

    #[test]
    fn both_dialects_are_324_bytes() {
        for dialect in Dialect::ALL {
            let options = CompileOptions {
                dialect,
                ..Default::default()
            };
            let out = compile(&ddr2_400(), &options).unwrap();
            assert_eq!(out.binary.len(), 324);
            assert_eq!(&out.binary.as_bytes()[0..4], b"FIDB");
            assert!(out.issues.is_empty());
        }
    }

    #[test]
    fn calibration_uses_derived_params() {
        let out = compile(&ddr2_400(), &CompileOptions::default()).unwrap();
        let rdd = &out.binary.as_bytes()[192..];
        // CL, BL, rows, cols - 6
        assert_eq!(&rdd[0x24..0x28], &[7, 8, 13, 4]);
        // tRAS tRC tRCD tRP tRFC(halved)
        assert_eq!(&rdd[0x28..0x2d], &[18, 23, 6, 6, 26]);
        assert!(ddr_calib::validate_calibration_binary(out.binary.as_bytes()).is_ok());
    }

    #[test]
    fn explicit_platform_is_used() {
        let platform = PlatformConfig {
            crystal_freq: 12_000_000,
            cpu_freq: 800_000_000,
            ddr_freq: 400_000_000,
            uart_baud: 115_200,
            mem_size: 64 << 20,
        };
        let options = CompileOptions {
            platform: Some(platform),
            ..Default::default()
        };
        let out = compile(&ddr2_400(), &options).unwrap();
        assert_eq!(&out.binary.as_bytes()[8..12], &12_000_000u32.to_le_bytes());
    }

    #[test]
    fn out_of_range_is_counted_not_fatal() {
        let mut cfg = ddr2_400();
        cfg.t_rfc = 400_000;
        cfg.t_xp = 0;
        let out = compile(&cfg, &CompileOptions::default()).unwrap();
        assert_eq!(out.out_of_range_count(), 2);
        assert_eq!(out.report.issues.len(), 2);
    }

    #[test]
    fn calibration_emits_clamped_counts() {
        let mut cfg = ddr2_400();
        cfg.t_ras = 700_000;
        cfg.t_rp = 0;
        cfg.t_rfc = 400_000;
        let out = compile(&cfg, &CompileOptions::default()).unwrap();
        let rdd = &out.binary.as_bytes()[192..];
        let offsets = [("tRAS", 0x28), ("tRP", 0x2b), ("tRFC", 0x2c)];
        assert_eq!(out.issues.len(), offsets.len());
        for (field, offset) in offsets {
            let issue = out.issues.iter().find(|i| i.field == field).unwrap();
            assert_eq!(u32::from(rdd[offset]), issue.clamped_to, "{field}");
        }
        // 127, 23, 6, 1, 63
        assert_eq!(&rdd[0x28..0x2d], &[127, 23, 6, 1, 63]);
        assert!(ddr_calib::validate_calibration_binary(out.binary.as_bytes()).is_ok());
    }

    #[test]
    fn registers_emit_clamped_counts() {
        let mut cfg = ddr2_400();
        cfg.t_ras = 0;
        for strategy in DdrcStrategy::ALL {
            let options = CompileOptions {
                dialect: Dialect::Registers,
                strategy,
                ..Default::default()
            };
            let out = compile(&cfg, &options).unwrap();
            let bin = out.binary.as_bytes();
            assert_eq!(out.issues[0].clamped_to, 1);
            // DDRC TIMING2 tRAS byte
            match strategy {
                DdrcStrategy::ConfigOnly => {}
                DdrcStrategy::VendorTiming => assert_eq!(bin[0x29], 1),
                DdrcStrategy::Legacy => assert_eq!(bin[0x22], 1),
            }
            // PHY DTPR0 tRAS
            assert_eq!(bin[0xde] & 0x1f, 1, "{strategy}");
        }
    }

    #[test]
    fn zero_clock_is_invalid() {
        let mut cfg = ddr2_400();
        cfg.clock_mhz = 0;
        for dialect in Dialect::ALL {
            let options = CompileOptions {
                dialect,
                ..Default::default()
            };
            assert!(matches!(
                compile(&cfg, &options),
                Err(crate::CompileError::Config(DdrError::InvalidParameter { .. }))
            ));
        }
    }

    #[test]
    fn dialect_names() {
        assert_eq!("registers".parse::<Dialect>().unwrap(), Dialect::Registers);
        assert!("uboot".parse::<Dialect>().is_err());
        assert_eq!(Dialect::Calibration.to_string(), "calibration");
    }
}
