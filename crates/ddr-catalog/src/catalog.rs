//! The catalog container and its lookup interface.

use std::sync::OnceLock;

use ddr_core::{DdrType, PlatformConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builtin;
use crate::chip::ChipTiming;
use crate::processor::ProcessorConfig;

/// A set of processor and chip entries.
///
/// Serialized as `[[processor]]` and `[[chip]]` tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "processor", default)]
    pub processors: Vec<ProcessorConfig>,
    #[serde(rename = "chip", default)]
    pub chips: Vec<ChipTiming>,
}

impl Catalog {
    /// The built-in catalog, constructed once.
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| Catalog {
            processors: builtin::processors(),
            chips: builtin::chips(),
        })
    }

    pub fn processor(&self, name: &str) -> Option<&ProcessorConfig> {
        self.processors.iter().find(|p| p.name == name)
    }

    pub fn chip(&self, name: &str) -> Option<&ChipTiming> {
        self.chips.iter().find(|c| c.name == name)
    }

    /// The chip a processor is usually paired with, if both are present.
    pub fn default_chip_for(&self, processor: &str) -> Option<&ChipTiming> {
        let name = self.processor(processor)?.default_chip.as_deref()?;
        self.chip(name)
    }

    pub fn chips_by_technology(&self, tech: DdrType) -> Vec<&ChipTiming> {
        self.chips.iter().filter(|c| c.ddr_type == tech).collect()
    }

    /// Add `overlay`'s entries. An entry whose name already exists replaces
    /// the existing one in place; new names are appended.
    pub fn merge(&mut self, overlay: Catalog) {
        for p in overlay.processors {
            match self.processors.iter_mut().find(|e| e.name == p.name) {
                Some(existing) => {
                    debug!(name = %p.name, "overriding processor entry");
                    *existing = p;
                }
                None => self.processors.push(p),
            }
        }
        for c in overlay.chips {
            match self.chips.iter_mut().find(|e| e.name == c.name) {
                Some(existing) => {
                    debug!(name = %c.name, "overriding chip entry");
                    *existing = c;
                }
                None => self.chips.push(c),
            }
        }
    }
}

/// Platform defaults for a processor in the built-in catalog.
pub fn lookup_processor(name: &str) -> Option<PlatformConfig> {
    Catalog::builtin()
        .processor(name)
        .map(ProcessorConfig::platform_config)
}

/// Chip timing from the built-in catalog.
pub fn lookup_chip(name: &str) -> Option<ChipTiming> {
    Catalog::builtin().chip(name).cloned()
}

/// Default chip for a processor in the built-in catalog.
pub fn default_chip_for_processor(name: &str) -> Option<ChipTiming> {
    Catalog::builtin().default_chip_for(name).cloned()
}

pub fn list_processors() -> &'static [ProcessorConfig] {
    &Catalog::builtin().processors
}

pub fn list_chips() -> &'static [ChipTiming] {
    &Catalog::builtin().chips
}

pub fn list_chips_by_technology(tech: DdrType) -> Vec<&'static ChipTiming> {
    Catalog::builtin().chips_by_technology(tech)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_present_and_absent() {
        assert!(lookup_processor("t31x").is_some());
        assert!(lookup_processor("nonexistent").is_none());
        assert!(lookup_chip("M14D1G1664A_DDR2").is_some());
        assert!(lookup_chip("nonexistent").is_none());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(lookup_processor("T31X").is_none());
        assert!(lookup_chip("m14d1g1664a_ddr2").is_none());
    }

    #[test]
    fn t31x_platform_defaults() {
        let p = lookup_processor("t31x").unwrap();
        assert_eq!(p.crystal_freq, 24_000_000);
        assert_eq!(p.cpu_freq, 576_000_000);
        assert_eq!(p.ddr_freq, 400_000_000);
        assert_eq!(p.uart_baud, 115_200);
        assert_eq!(p.mem_size, 8_388_608);
    }

    #[test]
    fn default_chip() {
        let chip = default_chip_for_processor("t31x").unwrap();
        assert_eq!(chip.name, "M14D1G1664A_DDR2");
        assert!(default_chip_for_processor("nonexistent").is_none());
    }

    #[test]
    fn listing_and_filtering() {
        assert!(list_processors().len() >= 3);
        let all = list_chips().len();
        let by_tech: usize = DdrType::ALL
            .iter()
            .map(|t| list_chips_by_technology(*t).len())
            .sum();
        assert_eq!(all, by_tech);
        assert!(list_chips_by_technology(DdrType::Ddr3)
            .iter()
            .all(|c| c.ddr_type == DdrType::Ddr3));
        assert!(list_chips_by_technology(DdrType::Lpddr3).is_empty());
    }

    #[test]
    fn merge_replaces_and_appends() {
        let mut catalog = Catalog::builtin().clone();
        let before = catalog.chips.len();

        let mut replaced = catalog.chip("W631GU6NG_DDR3").unwrap().clone();
        replaced.cl = 9;
        let mut added = replaced.clone();
        added.name = "CUSTOM_DDR3".into();

        catalog.merge(Catalog {
            processors: Vec::new(),
            chips: vec![replaced, added],
        });

        assert_eq!(catalog.chips.len(), before + 1);
        assert_eq!(catalog.chip("W631GU6NG_DDR3").unwrap().cl, 9);
        assert!(catalog.chip("CUSTOM_DDR3").is_some());
    }
}
