//! Sphere constraint: states at a fixed distance from a center

use nalgebra::{DMatrix, DVector};

use crate::common::{PlanningError, PlanningResult};
use crate::constraint::projection::ConstraintFunction;

/// Hypersphere `||x - center|| = radius`
#[derive(Debug, Clone)]
pub struct SphereConstraint {
    center: DVector<f64>,
    radius: f64,
}

impl SphereConstraint {
    pub fn new(center: DVector<f64>, radius: f64) -> PlanningResult<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "sphere radius must be positive, got {}",
                radius
            )));
        }
        if center.is_empty() {
            return Err(PlanningError::InvalidParameter(
                "sphere center must have at least one coordinate".to_string(),
            ));
        }
        Ok(Self { center, radius })
    }

    /// Unit sphere centered at the origin
    pub fn unit(dimension: usize) -> PlanningResult<Self> {
        Self::new(DVector::zeros(dimension), 1.0)
    }

    pub fn center(&self) -> &DVector<f64> {
        &self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl ConstraintFunction for SphereConstraint {
    fn ambient_dimension(&self) -> usize {
        self.center.len()
    }

    fn co_dimension(&self) -> usize {
        1
    }

    fn function(&self, x: &DVector<f64>, out: &mut DVector<f64>) {
        out[0] = (x - &self.center).norm() - self.radius;
    }

    fn jacobian(&self, x: &DVector<f64>, out: &mut DMatrix<f64>) {
        let offset = x - &self.center;
        let norm = offset.norm();
        if norm <= f64::EPSILON {
            // Any direction is a valid gradient at the center
            out.fill(0.0);
            out[(0, 0)] = 1.0;
            return;
        }
        for (j, value) in offset.iter().enumerate() {
            out[(0, j)] = value / norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Constraint;
    use crate::constraint::projection::{ProjectionConfig, ProjectionConstraint};

    #[test]
    fn test_sphere_function() {
        let sphere = SphereConstraint::new(DVector::from_vec(vec![1.0, 0.0, 0.0]), 2.0).unwrap();
        let mut out = DVector::zeros(1);
        sphere.function(&DVector::from_vec(vec![1.0, 2.0, 0.0]), &mut out);
        assert!(out[0].abs() < 1e-12);
        sphere.function(&DVector::from_vec(vec![1.0, 0.0, 0.0]), &mut out);
        assert!((out[0] + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_projection() {
        let constraint = ProjectionConstraint::new(
            SphereConstraint::unit(3).unwrap(),
            ProjectionConfig::default(),
        )
        .unwrap();
        let mut state = DVector::from_vec(vec![0.0, 0.0, 5.0]);
        assert!(constraint.project(&mut state));
        assert!((state[2] - 1.0).abs() < 1e-4);

        // Projection from the center picks some point on the sphere
        let mut state = DVector::zeros(3);
        assert!(constraint.project(&mut state));
        assert!(constraint.is_satisfied(&state));
    }

    #[test]
    fn test_invalid_sphere() {
        assert!(SphereConstraint::new(DVector::zeros(2), 0.0).is_err());
        assert!(SphereConstraint::new(DVector::zeros(2), f64::NAN).is_err());
        assert!(SphereConstraint::unit(0).is_err());
    }
}
