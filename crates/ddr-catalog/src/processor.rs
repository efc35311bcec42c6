//! Processor entries and variant identifiers.

use std::fmt;
use std::str::FromStr;

use ddr_core::{DdrError, PlatformConfig};
use serde::{Deserialize, Serialize};

/// Platform defaults for one SoC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProcessorConfig {
    /// Catalog name (e.g., "t31x").
    pub name: String,
    /// Crystal oscillator frequency in Hz.
    pub crystal_freq: u32,
    /// CPU frequency in Hz.
    pub cpu_freq: u32,
    /// DDR frequency in Hz.
    pub ddr_freq: u32,
    /// Bootloader UART baud rate.
    pub uart_baud: u32,
    /// FIDB memory size field in bytes. This is a working-region size,
    /// not total DRAM.
    pub mem_size: u32,
    /// Chip usually paired with this SoC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_chip: Option<String>,
}

impl ProcessorConfig {
    /// Platform values for the FIDB block.
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            crystal_freq: self.crystal_freq,
            cpu_freq: self.cpu_freq,
            ddr_freq: self.ddr_freq,
            uart_baud: self.uart_baud,
            mem_size: self.mem_size,
        }
    }
}

/// Ingenic SoC variants known to the bootloader tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorVariant {
    T10,
    T20,
    T21,
    T23,
    T30,
    T31,
    T31X,
    T31ZX,
    T31A,
    T31AL,
    T40,
    T41,
    A1,
}

impl ProcessorVariant {
    pub const ALL: [ProcessorVariant; 13] = [
        ProcessorVariant::T10,
        ProcessorVariant::T20,
        ProcessorVariant::T21,
        ProcessorVariant::T23,
        ProcessorVariant::T30,
        ProcessorVariant::T31,
        ProcessorVariant::T31X,
        ProcessorVariant::T31ZX,
        ProcessorVariant::T31A,
        ProcessorVariant::T31AL,
        ProcessorVariant::T40,
        ProcessorVariant::T41,
        ProcessorVariant::A1,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessorVariant::T10 => "t10",
            ProcessorVariant::T20 => "t20",
            ProcessorVariant::T21 => "t21",
            ProcessorVariant::T23 => "t23",
            ProcessorVariant::T30 => "t30",
            ProcessorVariant::T31 => "t31",
            ProcessorVariant::T31X => "t31x",
            ProcessorVariant::T31ZX => "t31zx",
            ProcessorVariant::T31A => "t31a",
            ProcessorVariant::T31AL => "t31al",
            ProcessorVariant::T40 => "t40",
            ProcessorVariant::T41 => "t41",
            ProcessorVariant::A1 => "a1",
        }
    }

    /// Whether this belongs to the T31 family.
    pub fn is_t31_family(self) -> bool {
        matches!(
            self,
            ProcessorVariant::T31
                | ProcessorVariant::T31X
                | ProcessorVariant::T31ZX
                | ProcessorVariant::T31A
                | ProcessorVariant::T31AL
        )
    }
}

impl fmt::Display for ProcessorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessorVariant {
    type Err = DdrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcessorVariant::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DdrError::invalid(format!("unknown processor variant '{s}'")))
    }
}
