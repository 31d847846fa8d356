//! Motion validation along constraint manifolds

use itertools::Itertools;

use crate::common::{Constraint, MotionCheck, MotionValidator, StateSpace};
use crate::constraint::projected_state_space::ProjectedStateSpace;

/// Motion validator for projected state spaces
///
/// A motion is valid when the manifold traversal between its endpoints,
/// checking validity at every step, reaches the target.
pub struct ConstrainedMotionValidator<'a, Sp: StateSpace> {
    space: &'a ProjectedStateSpace<Sp>,
}

impl<'a, Sp: StateSpace> ConstrainedMotionValidator<'a, Sp> {
    pub fn new(space: &'a ProjectedStateSpace<Sp>) -> Self {
        Self { space }
    }
}

impl<'a, Sp: StateSpace> MotionValidator<Sp::State> for ConstrainedMotionValidator<'a, Sp> {
    fn check_motion(&self, s1: &Sp::State, s2: &Sp::State) -> bool {
        self.space.constraint().is_satisfied(s2)
            && self.space.traverse_manifold(s1, s2, Default::default()).success
    }

    fn check_motion_with_last_valid(&self, s1: &Sp::State, s2: &Sp::State) -> MotionCheck<Sp::State> {
        let traversal = self.space.discrete_geodesic(s1, s2, false);
        if traversal.success {
            return MotionCheck::Valid;
        }

        let geodesic = traversal.into_path();
        let last_valid = match geodesic.last() {
            Some(state) => state.clone(),
            // The start itself was off the manifold
            None => {
                return MotionCheck::Invalid {
                    last_valid: s1.clone(),
                    fraction: 0.0,
                }
            }
        };

        let travelled: f64 = geodesic
            .iter()
            .tuple_windows::<(_, _)>()
            .map(|(a, b)| self.space.distance(a, b))
            .sum();
        let total = self.space.distance(s1, s2);
        let fraction = if total > 0.0 { travelled / total } else { 0.0 };

        MotionCheck::Invalid { last_valid, fraction }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    use crate::common::{RealVectorBounds, RealVectorState};
    use crate::constraint::{ProjectedSpaceConfig, ProjectionConfig, SphereConstraint};
    use crate::spaces::RealVectorStateSpace;

    fn v3(x: f64, y: f64, z: f64) -> RealVectorState {
        DVector::from_vec(vec![x, y, z])
    }

    fn sphere_space() -> ProjectedStateSpace<RealVectorStateSpace> {
        ProjectedStateSpace::from_function(
            RealVectorStateSpace::new(RealVectorBounds::uniform(3, -2.0, 2.0).unwrap()).unwrap(),
            SphereConstraint::unit(3).unwrap(),
            ProjectionConfig::default(),
            ProjectedSpaceConfig { delta: 0.05 },
        )
        .unwrap()
    }

    #[test]
    fn test_free_motion_is_valid() {
        let space = sphere_space();
        let validator = ConstrainedMotionValidator::new(&space);
        let from = v3(1.0, 0.0, 0.0);
        let to = v3(0.0, 0.0, 1.0);

        assert!(validator.check_motion(&from, &to));
        assert!(validator.check_motion_with_last_valid(&from, &to).is_valid());
    }

    #[test]
    fn test_target_off_manifold_is_invalid() {
        let space = sphere_space();
        let validator = ConstrainedMotionValidator::new(&space);
        let from = v3(1.0, 0.0, 0.0);
        let to = v3(1.0, 0.0, 0.1);

        assert!(!space.constraint().is_satisfied(&to));
        assert!(!validator.check_motion(&from, &to));
    }

    #[test]
    fn test_blocked_motion_reports_last_valid() {
        let space = sphere_space().with_validity_checker(|state: &RealVectorState| state[1] <= 0.5);
        let validator = ConstrainedMotionValidator::new(&space);
        let from = v3(1.0, 0.0, 0.0);
        let to = v3(0.0, 1.0, 0.0);

        assert!(!validator.check_motion(&from, &to));
        match validator.check_motion_with_last_valid(&from, &to) {
            MotionCheck::Invalid { last_valid, fraction } => {
                assert!(last_valid[1] <= 0.5);
                assert!(last_valid[1] > 0.4);
                assert!(fraction > 0.0 && fraction < 1.0);
            }
            MotionCheck::Valid => panic!("motion through the obstacle must be invalid"),
        }
    }

    #[test]
    fn test_infeasible_start_reports_start() {
        let space = sphere_space();
        let validator = ConstrainedMotionValidator::new(&space);
        let from = v3(0.5, 0.0, 0.0);
        let to = v3(0.0, 1.0, 0.0);

        let check = validator.check_motion_with_last_valid(&from, &to);
        assert_eq!(
            check,
            MotionCheck::Invalid {
                last_valid: from.clone(),
                fraction: 0.0
            }
        );
        assert!(!space.constraint().is_satisfied(&from));
    }
}
