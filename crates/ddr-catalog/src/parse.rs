//! TOML parsing, serialization, and validation for catalog files.
//!
//! A catalog file holds `[[processor]]` and `[[chip]]` tables with
//! kebab-case keys. Loaded catalogs are usually merged over the built-in
//! one with [`Catalog::merge`].

use std::collections::HashSet;
use std::path::Path;

use crate::catalog::Catalog;
use crate::chip::ChipTiming;
use crate::error::{CatalogError, Result};

/// A validation issue found in a catalog.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    fn error(message: String) -> Self {
        Self {
            severity: "error",
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            severity: "warning",
            message,
        }
    }
}

/// Load a catalog from a TOML file.
pub fn load_catalog_toml(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        return Err(CatalogError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_catalog_toml(&content)
}

/// Load the catalog file at `path`, merge it over the built-in catalog and
/// validate the result.
///
/// Error-severity issues fail with [`CatalogError::Validation`]; warnings
/// are returned alongside the merged catalog.
pub fn load_overlay(path: &Path) -> Result<(Catalog, Vec<ValidationIssue>)> {
    let overlay = load_catalog_toml(path)?;
    let mut catalog = Catalog::builtin().clone();
    catalog.merge(overlay);

    let Err(issues) = validate_catalog(&catalog) else {
        return Ok((catalog, Vec::new()));
    };
    let (errors, warnings): (Vec<_>, Vec<_>) =
        issues.into_iter().partition(|i| i.severity == "error");
    if errors.is_empty() {
        return Ok((catalog, warnings));
    }
    let detail = errors
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(CatalogError::Validation { detail })
}

/// Parse a catalog from a TOML string.
pub fn parse_catalog_toml(toml_str: &str) -> Result<Catalog> {
    let catalog: Catalog = toml::from_str(toml_str)?;
    Ok(catalog)
}

/// Serialize a catalog to pretty TOML.
pub fn catalog_to_toml(catalog: &Catalog) -> Result<String> {
    let toml_str = toml::to_string_pretty(catalog)?;
    Ok(toml_str)
}

/// Validate a catalog for structural correctness.
///
/// Returns `Ok(())` if valid, or `Err(issues)` with a list of problems.
/// Warnings alone still produce `Err`; callers filter by severity.
pub fn validate_catalog(catalog: &Catalog) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    // 1. Names are non-empty and unique
    let mut seen = HashSet::new();
    for p in &catalog.processors {
        if p.name.is_empty() {
            issues.push(ValidationIssue::error("processor with empty name".into()));
        } else if !seen.insert(p.name.as_str()) {
            issues.push(ValidationIssue::error(format!(
                "duplicate processor '{}'",
                p.name
            )));
        }
    }
    let mut seen = HashSet::new();
    for c in &catalog.chips {
        if c.name.is_empty() {
            issues.push(ValidationIssue::error("chip with empty name".into()));
        } else if !seen.insert(c.name.as_str()) {
            issues.push(ValidationIssue::error(format!("duplicate chip '{}'", c.name)));
        }
    }

    // 2. Processor frequencies are usable as divisors
    for p in &catalog.processors {
        if p.ddr_freq < 1000 {
            issues.push(ValidationIssue::error(format!(
                "processor '{}' DDR frequency {} Hz is below 1 kHz",
                p.name, p.ddr_freq
            )));
        }
        if p.crystal_freq == 0 || p.cpu_freq == 0 {
            issues.push(ValidationIssue::error(format!(
                "processor '{}' has a zero crystal or CPU frequency",
                p.name
            )));
        }
    }

    // 3. Default chips resolve
    for p in &catalog.processors {
        if let Some(chip) = &p.default_chip {
            if catalog.chip(chip).is_none() {
                issues.push(ValidationIssue::error(format!(
                    "processor '{}' default chip '{}' not found",
                    p.name, chip
                )));
            }
        }
    }

    // 4. Chip geometry and timing
    for c in &catalog.chips {
        validate_chip(c, &mut issues);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

fn validate_chip(c: &ChipTiming, issues: &mut Vec<ValidationIssue>) {
    if !matches!(c.banks, 4 | 8) {
        issues.push(ValidationIssue::error(format!(
            "chip '{}' bank count {} is not 4 or 8",
            c.name, c.banks
        )));
    }
    if !matches!(c.data_width, 8 | 16 | 32) {
        issues.push(ValidationIssue::error(format!(
            "chip '{}' data width {} is not 8, 16 or 32",
            c.name, c.data_width
        )));
    }
    if !(11..=16).contains(&c.row_bits) {
        issues.push(ValidationIssue::error(format!(
            "chip '{}' row bits {} outside 11..=16",
            c.name, c.row_bits
        )));
    }
    if !(8..=12).contains(&c.col_bits) {
        issues.push(ValidationIssue::error(format!(
            "chip '{}' column bits {} outside 8..=12",
            c.name, c.col_bits
        )));
    }
    if !matches!(c.bl, 4 | 8 | 16) {
        issues.push(ValidationIssue::error(format!(
            "chip '{}' burst length {} is not 4, 8 or 16",
            c.name, c.bl
        )));
    }
    if c.t_rc < c.t_ras {
        issues.push(ValidationIssue::warning(format!(
            "chip '{}' t-rc ({} ps) is shorter than t-ras ({} ps)",
            c.name, c.t_rc, c.t_ras
        )));
    }
    let required = [
        ("t-ras", c.t_ras),
        ("t-rc", c.t_rc),
        ("t-rcd", c.t_rcd),
        ("t-rp", c.t_rp),
        ("t-rfc", c.t_rfc),
        ("t-refi", c.t_refi),
    ];
    for (field, value) in required {
        if value == 0 {
            issues.push(ValidationIssue::warning(format!(
                "chip '{}' {field} is zero",
                c.name
            )));
        }
    }
}
