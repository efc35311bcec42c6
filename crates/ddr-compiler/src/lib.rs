//! Ingenic DDR configuration compiler.
//!
//! Turns a [`LogicalDdrConfig`](ddr_core::LogicalDdrConfig) into the
//! 324-byte binary the Ingenic boot ROM and SPL consume. Two dialects
//! share the same FIDB/RDD framing:
//!
//! - [`Dialect::Calibration`]: platform frequencies plus cycle-domain PHY
//!   parameters, as uploaded by the stock cloner
//! - [`Dialect::Registers`]: DDRC and DDRP register images produced
//!   through the vendor parameter object
//!
//! Every compilation also produces a [`CompileReport`] and can be checked
//! byte-for-byte against a captured reference with
//! [`compare_against_reference`].

pub mod binary;
pub mod compare;
pub mod error;
pub mod pipeline;
pub mod report;

pub use binary::{CompiledBinary, COMPILED_BINARY_LEN};
pub use compare::{compare_against_reference, diff_bytes, ByteDiff, Comparison};
pub use ddr_txx::DdrcStrategy;
pub use error::{CompileError, Result};
pub use pipeline::{
    compile, compile_phy_params, default_platform, CompileOptions, CompileOutput, Dialect,
};
pub use report::{CompileReport, SectionDump};
