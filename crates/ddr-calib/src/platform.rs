//! Platform defaults for the FIDB block.

use ddr_catalog::builtin::DEFAULT_PROCESSOR;
use ddr_catalog::{lookup_processor, Catalog, ProcessorVariant};
use ddr_core::{DdrError, PlatformConfig};
use tracing::debug;

/// Platform defaults for `name`, falling back to the T31 profile when the
/// name is absent or unknown.
pub fn get_platform_config(name: Option<&str>) -> PlatformConfig {
    if let Some(config) = name.and_then(lookup_processor) {
        return config;
    }
    debug!(requested = ?name, fallback = DEFAULT_PROCESSOR, "using default platform profile");
    Catalog::builtin()
        .processor(DEFAULT_PROCESSOR)
        .map(|p| p.platform_config())
        .unwrap_or(PlatformConfig {
            crystal_freq: 24_000_000,
            cpu_freq: 576_000_000,
            ddr_freq: 400_000_000,
            uart_baud: 115_200,
            mem_size: 8 * 1024 * 1024,
        })
}

/// Platform defaults for a processor variant.
///
/// Only variants with captured reference blobs are supported: T30, the
/// T31 family, T40 and T41.
pub fn get_platform_config_by_variant(variant: ProcessorVariant) -> ddr_core::Result<PlatformConfig> {
    let name = match variant {
        ProcessorVariant::T30 => "t30",
        v if v.is_t31_family() => "t31",
        ProcessorVariant::T40 | ProcessorVariant::T41 => "t41",
        other => {
            return Err(DdrError::invalid(format!(
                "no platform defaults for processor variant {other}"
            )))
        }
    };
    Ok(get_platform_config(Some(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_profiles() {
        for name in ["t31", "t30", "t41"] {
            let p = get_platform_config(Some(name));
            assert_eq!(p.crystal_freq, 24_000_000);
            assert_eq!(p.ddr_freq, 400_000_000);
        }
    }

    #[test]
    fn unknown_and_absent_fall_back() {
        let default = get_platform_config(Some("t31"));
        assert_eq!(get_platform_config(Some("x2000")), default);
        assert_eq!(get_platform_config(None), default);
    }

    #[test]
    fn by_variant() {
        assert!(get_platform_config_by_variant(ProcessorVariant::T31X).is_ok());
        assert!(get_platform_config_by_variant(ProcessorVariant::T31ZX).is_ok());
        assert!(get_platform_config_by_variant(ProcessorVariant::T30).is_ok());
        assert!(get_platform_config_by_variant(ProcessorVariant::T41).is_ok());
        assert!(matches!(
            get_platform_config_by_variant(ProcessorVariant::T20),
            Err(DdrError::InvalidParameter { .. })
        ));
    }
}
