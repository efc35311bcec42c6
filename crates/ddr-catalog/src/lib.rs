//! Processor and DDR chip parameter catalog.
//!
//! A read-only database of named parameter bundles:
//! - **Processors:** platform defaults (crystal/CPU/DDR frequency, UART rate,
//!   memory size) plus the chip a board usually carries
//! - **Chips:** timing and geometry defaults for a DDR part
//!
//! The built-in catalog can be extended with TOML files (see [`parse`]).
//! Name lookups are case-sensitive exact matches and never fail; absence
//! is `None`.

pub mod builtin;
pub mod catalog;
pub mod chip;
pub mod error;
pub mod parse;
pub mod processor;

pub use catalog::{
    default_chip_for_processor, list_chips, list_chips_by_technology, list_processors,
    lookup_chip, lookup_processor, Catalog,
};
pub use chip::ChipTiming;
pub use error::{CatalogError, Result};
pub use processor::{ProcessorConfig, ProcessorVariant};
