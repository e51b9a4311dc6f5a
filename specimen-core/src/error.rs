//! Error types for Specimen tree generation.

use crate::property::Shape;
use thiserror::Error;

/// Main error type for Specimen tree generation.
///
/// All variants indicate a structural misconfiguration detected while a
/// node is generated, never during value materialization. A build either
/// produces a complete tree or fails as a whole; no partial tree is
/// returned and none of these errors are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecimenError {
    /// A property's generic arity does not match its resolved shape.
    #[error(
        "{shape} shape requires exactly {expected} generic argument(s), \
         but `{type_name}` exposes {actual}"
    )]
    InvalidShape {
        type_name: String,
        shape: Shape,
        expected: usize,
        actual: usize,
    },

    /// No shape generator is registered for a property's structural category.
    #[error("no shape generator registered for {shape} shape (`{type_name}`)")]
    UnsupportedShape { type_name: String, shape: Shape },

    /// A container size range has minimum greater than maximum.
    #[error("container size minimum {min} exceeds maximum {max}")]
    InvalidBounds { min: usize, max: usize },
}

/// Result type for Specimen operations.
pub type Result<T> = std::result::Result<T, SpecimenError>;
