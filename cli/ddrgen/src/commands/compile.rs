//! `ddrgen compile`: resolve, compile, write the binary.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ddr_compiler::compile;

use super::{wants_json, Selection};

pub fn run(selection: &Selection, output: &Path, report: Option<&str>) -> Result<()> {
    let json = wants_json(report)?;
    let resolved = selection.resolve()?;

    let out = compile(&resolved.config, &resolved.options).with_context(|| {
        format!(
            "compiling {} for {}",
            resolved.chip_name, selection.processor
        )
    })?;

    fs::write(output, out.binary.as_bytes())
        .with_context(|| format!("writing {}", output.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&out.report)?);
    } else {
        print!("{}", out.report);
        println!();
        println!(
            "Wrote {} bytes to {} ({} on {})",
            out.binary.len(),
            output.display(),
            resolved.chip_name,
            selection.processor
        );
        if out.out_of_range_count() > 0 {
            println!(
                "warning: {} timing(s) clamped to register range",
                out.out_of_range_count()
            );
        }
    }
    Ok(())
}
