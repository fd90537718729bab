//! Error types for voxpaint

use thiserror::Error;

use crate::volume::ScalarType;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("No background image")]
    MissingBackground,

    #[error("Background image has no scalars")]
    MissingBackgroundScalars,

    #[error("Mask image has no scalars")]
    MissingMaskScalars,

    #[error("Mask scalars hold {actual} values but geometry requires {expected}")]
    MaskSizeMismatch { expected: usize, actual: usize },

    #[error("Brush color has {color} values but mask has {components} components")]
    ColorMismatch { color: usize, components: usize },

    #[error("Brush radius must be finite and positive, got {0}")]
    InvalidRadius(f64),

    #[error("Spacing must be finite and positive, got {0:?}")]
    InvalidSpacing([f64; 3]),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Raw {scalar_type:?} buffer of {len} bytes is not a multiple of {tuple_bytes} bytes per tuple")]
    BufferLength {
        scalar_type: ScalarType,
        len: usize,
        tuple_bytes: usize,
    },

    #[error("Tuple {index} out of range ({tuples} tuples)")]
    TupleOutOfRange { index: usize, tuples: usize },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
