//! Plane constraint: states on an affine hyperplane

use nalgebra::{DMatrix, DVector};

use crate::common::{PlanningError, PlanningResult};
use crate::constraint::projection::ConstraintFunction;

/// Hyperplane `normal . x = offset`
#[derive(Debug, Clone)]
pub struct PlaneConstraint {
    normal: DVector<f64>,
    offset: f64,
}

impl PlaneConstraint {
    /// The normal is normalized so the residual is a signed distance
    pub fn new(normal: DVector<f64>, offset: f64) -> PlanningResult<Self> {
        let norm = normal.norm();
        if !(norm.is_finite() && norm > 0.0) {
            return Err(PlanningError::InvalidParameter(
                "plane normal must be a non-zero finite vector".to_string(),
            ));
        }
        Ok(Self {
            normal: normal / norm,
            offset: offset / norm,
        })
    }

    pub fn normal(&self) -> &DVector<f64> {
        &self.normal
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}

impl ConstraintFunction for PlaneConstraint {
    fn ambient_dimension(&self) -> usize {
        self.normal.len()
    }

    fn co_dimension(&self) -> usize {
        1
    }

    fn function(&self, x: &DVector<f64>, out: &mut DVector<f64>) {
        out[0] = self.normal.dot(x) - self.offset;
    }

    fn jacobian(&self, _x: &DVector<f64>, out: &mut DMatrix<f64>) {
        out.set_row(0, &self.normal.transpose());
    }
}
