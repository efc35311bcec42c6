//! Compilation errors.

use ddr_core::DdrError;
use ddr_txx::TxxError;
use thiserror::Error;

/// Errors that can occur while compiling a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Config(#[from] DdrError),

    #[error("register generation failed: {0}")]
    Registers(#[from] TxxError),
}

pub type Result<T> = std::result::Result<T, CompileError>;
