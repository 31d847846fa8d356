//! Utility modules for manifold_planning

pub mod visualization;

pub use visualization::{colors, PathStyle, PointStyle, Visualizer};
