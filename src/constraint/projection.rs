//! Newton-Raphson projection onto implicitly defined manifolds
//!
//! A manifold is given as the zero set of a vector function
//! `f: R^n -> R^k`. Projection repeatedly applies the least-squares
//! Newton update `x <- x - J(x)^+ f(x)` until the residual falls below
//! the tolerance or the iteration budget runs out.

use nalgebra::{DMatrix, DVector};

use crate::common::{Constraint, PlanningError, PlanningResult, RealVectorState};

/// Finite difference step for numerical Jacobians
const JACOBIAN_STEP: f64 = 1e-6;

/// Implicit vector function whose zero set is the constraint manifold
pub trait ConstraintFunction {
    /// Dimension of the ambient space
    fn ambient_dimension(&self) -> usize;

    /// Number of equations, i.e. the co-dimension of the manifold
    fn co_dimension(&self) -> usize;

    /// Evaluate the function at `x` into `out`
    fn function(&self, x: &DVector<f64>, out: &mut DVector<f64>);

    /// Evaluate the Jacobian at `x` into `out` (co_dimension x ambient_dimension).
    ///
    /// Central differences unless overridden.
    fn jacobian(&self, x: &DVector<f64>, out: &mut DMatrix<f64>) {
        let k = self.co_dimension();
        let mut forward = DVector::zeros(k);
        let mut backward = DVector::zeros(k);
        let mut probe = x.clone();

        for j in 0..self.ambient_dimension() {
            probe[j] = x[j] + JACOBIAN_STEP;
            self.function(&probe, &mut forward);
            probe[j] = x[j] - JACOBIAN_STEP;
            self.function(&probe, &mut backward);
            probe[j] = x[j];

            let column = (&forward - &backward) / (2.0 * JACOBIAN_STEP);
            out.set_column(j, &column);
        }
    }
}

/// Configuration for Newton projection
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Residual norm under which a state counts as on the manifold
    pub tolerance: f64,
    /// Maximum Newton iterations per projection
    pub max_iterations: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 50,
        }
    }
}

impl ProjectionConfig {
    pub fn validate(&self) -> PlanningResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "projection tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(PlanningError::InvalidParameter(
                "projection needs at least one iteration".to_string(),
            ));
        }
        Ok(())
    }
}

/// Constraint projecting states with Newton iterations on a `ConstraintFunction`
#[derive(Debug, Clone)]
pub struct ProjectionConstraint<F> {
    function: F,
    config: ProjectionConfig,
}

impl<F: ConstraintFunction> ProjectionConstraint<F> {
    pub fn new(function: F, config: ProjectionConfig) -> PlanningResult<Self> {
        config.validate()?;
        if function.co_dimension() == 0 || function.co_dimension() > function.ambient_dimension() {
            return Err(PlanningError::InvalidParameter(format!(
                "co-dimension {} is not valid in a {}-dimensional space",
                function.co_dimension(),
                function.ambient_dimension()
            )));
        }
        Ok(Self { function, config })
    }

    /// Check that the constraint lives in a space of `dimension`
    pub fn check_dimension(&self, dimension: usize) -> PlanningResult<()> {
        if self.function.ambient_dimension() != dimension {
            return Err(PlanningError::DimensionMismatch {
                expected: self.function.ambient_dimension(),
                actual: dimension,
            });
        }
        Ok(())
    }

    pub fn function(&self) -> &F {
        &self.function
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Norm of the constraint residual at `state`
    pub fn residual(&self, state: &RealVectorState) -> f64 {
        let mut f = DVector::zeros(self.function.co_dimension());
        self.function.function(state, &mut f);
        f.norm()
    }
}

impl<F: ConstraintFunction> Constraint<RealVectorState> for ProjectionConstraint<F> {
    fn is_satisfied(&self, state: &RealVectorState) -> bool {
        self.residual(state) <= self.config.tolerance
    }

    fn project(&self, state: &mut RealVectorState) -> bool {
        let k = self.function.co_dimension();
        let n = self.function.ambient_dimension();
        let squared_tolerance = self.config.tolerance * self.config.tolerance;

        let mut f = DVector::zeros(k);
        let mut j = DMatrix::zeros(k, n);
        self.function.function(state, &mut f);

        let mut iterations = 0;
        let mut norm = f.norm_squared();
        while norm > squared_tolerance && iterations < self.config.max_iterations {
            iterations += 1;
            self.function.jacobian(state, &mut j);

            let step = match j.clone().svd(true, true).solve(&f, f64::EPSILON) {
                Ok(step) => step,
                Err(_) => break,
            };
            *state -= step;

            self.function.function(state, &mut f);
            norm = f.norm_squared();
        }

        let converged = norm < squared_tolerance;
        if !converged {
            tracing::debug!(
                iterations,
                residual = norm.sqrt(),
                "projection did not converge"
            );
        }
        converged
    }
}
