//! Common types, traits, and error definitions for manifold_planning
//!
//! This module provides the collaborator interfaces shared by the ambient
//! spaces, the constraints and the projected state space.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
