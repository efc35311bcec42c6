pub mod compare;
pub mod compile;
pub mod list;
pub mod show;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ddr_catalog::parse::load_overlay;
use ddr_catalog::Catalog;
use ddr_compiler::{CompileOptions, DdrcStrategy, Dialect};
use ddr_core::LogicalDdrConfig;
use tracing::{debug, warn};

/// Processor/chip choice shared by `compile` and `compare`.
#[derive(Debug, Clone)]
pub struct Selection {
    pub processor: String,
    pub chip: Option<String>,
    pub dialect: Dialect,
    pub strategy: DdrcStrategy,
    pub catalog: Option<PathBuf>,
    pub freq: Option<u32>,
}

/// A selection resolved against the catalog.
#[derive(Debug)]
pub struct Resolved {
    pub chip_name: String,
    pub config: LogicalDdrConfig,
    pub options: CompileOptions,
}

impl Selection {
    pub fn resolve(&self) -> Result<Resolved> {
        let catalog = load_catalog(self.catalog.as_deref())?;

        let Some(processor) = catalog.processor(&self.processor) else {
            bail!(
                "unknown processor: '{}'. Use 'ddrgen list processors' to see available processors.",
                self.processor
            );
        };

        let chip = match &self.chip {
            Some(name) => catalog.chip(name),
            None => catalog.default_chip_for(&processor.name),
        };
        let Some(chip) = chip else {
            match &self.chip {
                Some(name) => bail!(
                    "unknown chip: '{name}'. Use 'ddrgen list chips' to see available chips."
                ),
                None => bail!(
                    "processor '{}' has no default chip; pass --chip",
                    processor.name
                ),
            }
        };

        let freq = self.freq.unwrap_or(processor.ddr_freq);
        let clock_mhz = ddr_clock_mhz(freq)?;

        let mut platform = processor.platform_config();
        platform.ddr_freq = freq;

        debug!(
            processor = %processor.name,
            chip = %chip.name,
            freq,
            "resolved selection"
        );

        Ok(Resolved {
            chip_name: chip.name.clone(),
            config: chip.logical_config(clock_mhz, chip.density_bytes()),
            options: CompileOptions {
                dialect: self.dialect,
                strategy: self.strategy,
                platform: Some(platform),
            },
        })
    }
}

/// `freq` in MHz. The timing passes run on whole MHz while the platform
/// block keeps Hz, so anything in between is refused.
pub fn ddr_clock_mhz(freq: u32) -> Result<u32> {
    if freq < 1_000_000 {
        bail!("DDR frequency {freq} Hz is below 1 MHz");
    }
    if freq % 1_000_000 != 0 {
        bail!("DDR frequency {freq} Hz is not a whole number of MHz");
    }
    Ok(freq / 1_000_000)
}

/// The built-in catalog, with `path` merged over it when given.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::builtin().clone());
    };

    let (catalog, warnings) =
        load_overlay(path).with_context(|| format!("loading catalog {}", path.display()))?;
    for issue in &warnings {
        warn!("{}", issue.message);
    }
    Ok(catalog)
}

/// Whether `--report` asks for JSON.
pub fn wants_json(report: Option<&str>) -> Result<bool> {
    match report {
        None | Some("text") => Ok(false),
        Some("json") => Ok(true),
        Some(other) => bail!("unknown report format: '{other}' (expected text or json)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(processor: &str) -> Selection {
        Selection {
            processor: processor.into(),
            chip: None,
            dialect: Dialect::Calibration,
            strategy: DdrcStrategy::ConfigOnly,
            catalog: None,
            freq: None,
        }
    }

    #[test]
    fn resolves_default_chip() {
        let r = selection("t31x").resolve().unwrap();
        assert_eq!(r.chip_name, "M14D1G1664A_DDR2");
        assert_eq!(r.config.clock_mhz, 400);
        assert_eq!(r.options.platform.unwrap().ddr_freq, 400_000_000);
    }

    #[test]
    fn frequency_override_reaches_config_and_platform() {
        let sel = Selection {
            freq: Some(500_000_000),
            ..selection("t31x")
        };
        let r = sel.resolve().unwrap();
        assert_eq!(r.config.clock_mhz, 500);
        assert_eq!(r.options.platform.unwrap().ddr_freq, 500_000_000);
    }

    #[test]
    fn unknown_names_are_errors() {
        assert!(selection("t99").resolve().is_err());
        let sel = Selection {
            chip: Some("NOPE".into()),
            ..selection("t31x")
        };
        let err = sel.resolve().unwrap_err().to_string();
        assert!(err.contains("unknown chip"));
    }

    #[test]
    fn sub_megahertz_frequency_is_rejected() {
        let sel = Selection {
            freq: Some(999_999),
            ..selection("t31x")
        };
        assert!(sel.resolve().is_err());
    }

    #[test]
    fn fractional_megahertz_frequency_is_rejected() {
        let sel = Selection {
            freq: Some(400_500_000),
            ..selection("t31x")
        };
        let err = sel.resolve().unwrap_err().to_string();
        assert!(err.contains("not a whole number of MHz"), "{err}");
    }

    #[test]
    fn catalog_overlay_adds_chip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.toml");
        let mut overlay = Catalog::default();
        let mut chip = Catalog::builtin().chip("W631GU6NG_DDR3").unwrap().clone();
        chip.name = "BOARD_DDR3".into();
        overlay.chips.push(chip);
        std::fs::write(
            &path,
            ddr_catalog::parse::catalog_to_toml(&overlay).unwrap(),
        )
        .unwrap();

        let sel = Selection {
            chip: Some("BOARD_DDR3".into()),
            catalog: Some(path),
            ..selection("t40")
        };
        let r = sel.resolve().unwrap();
        assert_eq!(r.chip_name, "BOARD_DDR3");
    }

    #[test]
    fn invalid_catalog_overlay_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.toml");
        let mut overlay = Catalog::default();
        let mut chip = Catalog::builtin().chip("W631GU6NG_DDR3").unwrap().clone();
        chip.name = "BOARD_DDR3".into();
        chip.data_width = 24;
        overlay.chips.push(chip);
        std::fs::write(
            &path,
            ddr_catalog::parse::catalog_to_toml(&overlay).unwrap(),
        )
        .unwrap();

        let err = load_catalog(Some(&path)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ddr_catalog::CatalogError>(),
            Some(ddr_catalog::CatalogError::Validation { .. })
        ));
        assert!(format!("{err:#}").contains("data width 24"));
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_catalog(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn report_formats() {
        assert!(!wants_json(None).unwrap());
        assert!(wants_json(Some("json")).unwrap());
        assert!(wants_json(Some("yaml")).is_err());
    }
}
