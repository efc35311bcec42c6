//! `ddrgen validate`: structural check of a calibration binary.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ddr_calib::validate_calibration_binary;
use ddr_compiler::{CompiledBinary, COMPILED_BINARY_LEN};

pub fn run(file: &Path) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    validate_calibration_binary(&bytes).with_context(|| format!("validating {}", file.display()))?;

    let mut fixed = [0u8; COMPILED_BINARY_LEN];
    fixed.copy_from_slice(&bytes);
    let binary = CompiledBinary::from(fixed);

    println!("{}: OK", file.display());
    println!("  Length:  {} bytes", binary.len());
    println!("  SHA-256: {}", binary.sha256_hex());
    Ok(())
}
