//! `ddrgen compare`: compile and diff against a captured binary.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use ddr_compiler::compare_against_reference;

use super::{wants_json, Selection};

pub fn run(selection: &Selection, reference: &Path, report: Option<&str>) -> Result<()> {
    let json = wants_json(report)?;
    let resolved = selection.resolve()?;
    let expected =
        fs::read(reference).with_context(|| format!("reading {}", reference.display()))?;

    let result = compare_against_reference(&resolved.config, &resolved.options, &expected)
        .with_context(|| format!("compiling {}", resolved.chip_name))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "{} ({} on {}) vs {}",
            resolved.options.dialect,
            resolved.chip_name,
            selection.processor,
            reference.display()
        );
        print!("{result}");
        if result.is_match() {
            println!();
        }
    }

    if !result.is_match() {
        bail!("{} differs from the generated binary", reference.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddr_compiler::{DdrcStrategy, Dialect};

    fn selection() -> Selection {
        Selection {
            processor: "t31".into(),
            chip: None,
            dialect: Dialect::Registers,
            strategy: DdrcStrategy::ConfigOnly,
            catalog: None,
            freq: None,
        }
    }

    #[test]
    fn own_output_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.bin");
        crate::commands::compile::run(&selection(), &path, None).unwrap();
        run(&selection(), &path, None).unwrap();
    }

    #[test]
    fn altered_reference_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.bin");
        crate::commands::compile::run(&selection(), &path, None).unwrap();
        let mut bytes = fs::read(&path).unwrap();
        bytes[0x80] ^= 1;
        fs::write(&path, &bytes).unwrap();
        assert!(run(&selection(), &path, Some("json")).is_err());
    }

    #[test]
    fn missing_reference_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&selection(), &dir.path().join("absent.bin"), None).is_err());
    }
}
