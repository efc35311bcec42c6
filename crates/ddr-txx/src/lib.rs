//! Hardware-register ("TXX") dialect builder.
//!
//! Produces the DDR controller (DDRC) and DDR PHY (DDRP) register images
//! from a [`LogicalDdrConfig`](ddr_core::LogicalDdrConfig), via the
//! vendor tool's scratch parameter object. [`build_register_binary`]
//! populates one [`VendorObject`] per call and runs the DDRC pass and then
//! the PHY pass against it. [`generate_ddrc`] and [`generate_ddrp`] are
//! pure: each builds its own object and returns its own image type.

pub mod binary;
pub mod ddrc;
pub mod ddrp;
pub mod error;
pub mod mmap;
pub mod object;
pub mod validate;

pub use binary::{build_register_binary, REGISTER_BINARY_LEN};
pub use ddrc::{generate_ddrc, DdrcImage, DdrcStrategy, DDRC_IMAGE_LEN};
pub use ddrp::{generate_ddrp, DdrpImage, DDRP_IMAGE_LEN};
pub use error::TxxError;
pub use object::VendorObject;
pub use validate::{validate_timings, RangeIssue, TimingCycles, ValidatedTimings};
