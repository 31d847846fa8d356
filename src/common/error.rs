//! Error types for manifold_planning

use thiserror::Error;

/// Main error type for constrained planning setup
///
/// Traversal and sampling never fail with an error; their outcome is a
/// plain boolean. Errors only surface while configuring spaces and
/// constraints, or when rendering plots.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Constraint and ambient space disagree on dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Visualization error
    #[error("Visualization error: {0}")]
    Visualization(String),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for planning setup
pub type PlanningResult<T> = Result<T, PlanningError>;
