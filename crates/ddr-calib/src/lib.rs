//! Calibration-format (FIDB/RDD) section builder.
//!
//! The calibration binary is what the stock cloner uploads before the
//! SPL runs. It is exactly 324 bytes:
//!
//! ```text
//! [0..192)    FIDB  platform frequencies and flags
//! [192..324)  RDD   PHY geometry and timing, CRC-guarded
//! ```
//!
//! Both sections carry a declared length that is a format constant, not
//! the payload size.

pub mod binary;
pub mod error;
pub mod fidb;
pub mod platform;
pub mod rdd;

pub use binary::{build_binary, validate_calibration_binary, write_into, CALIBRATION_BINARY_LEN};
pub use error::FormatError;
pub use fidb::build_fidb;
pub use platform::{get_platform_config, get_platform_config_by_variant};
pub use rdd::build_rdd;
