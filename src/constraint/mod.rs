// Constrained planning: projection, sampling and traversal on manifolds

pub mod projection;
pub mod sphere;
pub mod plane;
pub mod projected_state_sampler;
pub mod projected_state_space;
pub mod motion_validator;

pub use projection::*;
pub use sphere::*;
pub use plane::*;
pub use projected_state_sampler::*;
pub use projected_state_space::*;
pub use motion_validator::*;
