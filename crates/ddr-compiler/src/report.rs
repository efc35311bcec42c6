//! Compile report.

use std::fmt;

use ddr_core::{DdrType, LogicalDdrConfig};
use ddr_txx::{DdrcStrategy, RangeIssue};
use serde::Serialize;

use crate::binary::{hex, CompiledBinary, SECOND_SECTION_OFFSET};
use crate::pipeline::{CompileOptions, Dialect};

/// Hex dump of one output section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SectionDump {
    pub name: &'static str,
    pub offset: usize,
    pub len: usize,
    pub hex: String,
}

/// Summary of one compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompileReport {
    pub dialect: Dialect,
    /// Only meaningful for the registers dialect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<DdrcStrategy>,
    pub ddr_type: DdrType,
    pub clock_mhz: u32,
    pub issues: Vec<RangeIssue>,
    pub sha256: String,
    pub sections: Vec<SectionDump>,
}

impl CompileReport {
    pub fn new(
        config: &LogicalDdrConfig,
        options: &CompileOptions,
        binary: &CompiledBinary,
        issues: &[RangeIssue],
    ) -> Self {
        let (first, second) = binary.sections();
        let names = match options.dialect {
            Dialect::Calibration => ("fidb", "rdd"),
            Dialect::Registers => ("ddrc", "ddrp"),
        };
        let strategy = match options.dialect {
            Dialect::Calibration => None,
            Dialect::Registers => Some(options.strategy),
        };
        CompileReport {
            dialect: options.dialect,
            strategy,
            ddr_type: config.ddr_type,
            clock_mhz: config.clock_mhz,
            issues: issues.to_vec(),
            sha256: binary.sha256_hex(),
            sections: vec![
                SectionDump {
                    name: names.0,
                    offset: 0,
                    len: first.len(),
                    hex: hex(first),
                },
                SectionDump {
                    name: names.1,
                    offset: SECOND_SECTION_OFFSET,
                    len: second.len(),
                    hex: hex(second),
                },
            ],
        }
    }
}

impl fmt::Display for CompileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Compile Report ===")?;
        writeln!(f, "Dialect: {}", self.dialect)?;
        if let Some(strategy) = self.strategy {
            writeln!(f, "Strategy: {strategy}")?;
        }
        writeln!(f, "Memory: {} @ {} MHz", self.ddr_type, self.clock_mhz)?;
        writeln!(f, "SHA-256: {}", self.sha256)?;

        if self.issues.is_empty() {
            writeln!(f, "Timings: all in range")?;
        } else {
            writeln!(f)?;
            writeln!(f, "--- Out-of-range timings ({}) ---", self.issues.len())?;
            for issue in &self.issues {
                writeln!(f, "  {issue}")?;
            }
        }

        writeln!(f)?;
        for section in &self.sections {
            writeln!(
                f,
                "--- {} [{:#05x}..{:#05x}) ---",
                section.name,
                section.offset,
                section.offset + section.len
            )?;
            for line in section.hex.as_bytes().chunks(32) {
                writeln!(f, "  {}", String::from_utf8_lossy(line))?;
            }
        }
        Ok(())
    }
}
