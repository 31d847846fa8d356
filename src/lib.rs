//! manifold_planning - sampling and traversal on constraint manifolds
//!
//! This crate lets sampling-based planners work with states that must
//! satisfy an implicit constraint: samples are projected onto the
//! constraint manifold, and motions are checked by walking along it.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod spaces;
pub mod constraint;

// Re-export common types for convenience
pub use common::{Constraint, StateSampler, StateSpace, StateValidityChecker, MotionValidator};
pub use common::{PlanningError, PlanningResult};
pub use constraint::{ProjectedStateSampler, ProjectedStateSpace, Traversal, TraversalOptions};
