//! Error taxonomy shared by every stage of the compiler.

/// Errors that can occur while compiling a DDR configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DdrError {
    /// A required input is absent or unusable (zero clock, bad geometry).
    #[error("invalid parameter: {detail}")]
    InvalidParameter {
        /// Description of the offending input.
        detail: String,
    },

    /// A timing converted to a cycle count outside its field's range.
    #[error("{field} = {value} cycles is outside [{min}, {max}]")]
    OutOfRange {
        /// Timing parameter name (e.g. "tRAS").
        field: &'static str,
        /// The converted cycle count.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// A caller-supplied buffer is smaller than the fixed output size.
    #[error("buffer too small: need {required} bytes, got {actual}")]
    SizeMismatch {
        /// Bytes the output occupies.
        required: usize,
        /// Bytes the caller provided.
        actual: usize,
    },
}

impl DdrError {
    /// Shorthand for [`DdrError::InvalidParameter`].
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidParameter {
            detail: detail.into(),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, DdrError>;

/// Copy a fixed-size image into a caller buffer, refusing short buffers
/// before writing anything.
pub fn copy_into(image: &[u8], out: &mut [u8]) -> Result<usize> {
    let Some(dst) = out.get_mut(..image.len()) else {
        return Err(DdrError::SizeMismatch {
            required: image.len(),
            actual: out.len(),
        });
    };
    dst.copy_from_slice(image);
    Ok(image.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_into_exact_and_larger_buffers() {
        let image = [1u8, 2, 3];
        let mut exact = [0u8; 3];
        assert_eq!(copy_into(&image, &mut exact), Ok(3));
        assert_eq!(exact, image);

        let mut larger = [0xAAu8; 5];
        assert_eq!(copy_into(&image, &mut larger), Ok(3));
        assert_eq!(larger, [1, 2, 3, 0xAA, 0xAA]);
    }

    #[test]
    fn copy_into_short_buffer_is_untouched() {
        let image = [1u8, 2, 3, 4];
        let mut short = [0x55u8; 2];
        let err = copy_into(&image, &mut short).unwrap_err();
        assert_eq!(
            err,
            DdrError::SizeMismatch {
                required: 4,
                actual: 2
            }
        );
        assert_eq!(short, [0x55, 0x55]);
    }

    #[test]
    fn error_messages() {
        let e = DdrError::OutOfRange {
            field: "tRAS",
            value: 200,
            min: 1,
            max: 127,
        };
        assert_eq!(e.to_string(), "tRAS = 200 cycles is outside [1, 127]");
        assert_eq!(
            DdrError::invalid("clock is zero").to_string(),
            "invalid parameter: clock is zero"
        );
    }
}
