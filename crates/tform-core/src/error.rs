#![forbid(unsafe_code)]

//! Errors raised by field registry operations.

use core::fmt;

/// Failures of registry and manager operations.
///
/// Every variant is a local precondition violation. The operation that
/// returned it has not mutated the registry or the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// A field name does not match `<prefix><digits>`.
    Parse { name: String },
    /// A position at or beyond the registry length.
    IndexOutOfRange { position: usize, len: usize },
    /// The same index appears twice in the scanned field names.
    DuplicateIndex { index: u32 },
    /// No index above the current values fits in `u32`.
    IndexExhausted,
    /// The surface reports a different number of fields than the registry holds.
    SurfaceOutOfSync { registry: usize, rendered: usize },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { name } => write!(f, "malformed field name {name:?}"),
            Self::IndexOutOfRange { position, len } => {
                write!(f, "field position {position} out of range (len {len})")
            }
            Self::DuplicateIndex { index } => write!(f, "duplicate field index {index}"),
            Self::IndexExhausted => write!(f, "no field index left above the current maximum"),
            Self::SurfaceOutOfSync { registry, rendered } => write!(
                f,
                "surface renders {rendered} fields but registry holds {registry}"
            ),
        }
    }
}

impl std::error::Error for FieldError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            FieldError::Parse {
                name: "track_image_x".into()
            }
            .to_string(),
            "malformed field name \"track_image_x\""
        );
        assert_eq!(
            FieldError::IndexOutOfRange {
                position: 3,
                len: 2
            }
            .to_string(),
            "field position 3 out of range (len 2)"
        );
        assert_eq!(
            FieldError::SurfaceOutOfSync {
                registry: 2,
                rendered: 3
            }
            .to_string(),
            "surface renders 3 fields but registry holds 2"
        );
    }
}
