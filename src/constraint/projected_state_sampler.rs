//! Sampler producing states on a constraint manifold
//!
//! Wraps any ambient sampler and projects each of its samples. Whether
//! the projection converged is not checked here: callers that need a
//! feasible state test it themselves.

use std::sync::Arc;

use crate::common::{Constraint, StateSampler};

/// Ambient sampler followed by projection onto the constraint
pub struct ProjectedStateSampler<Smp, S> {
    sampler: Smp,
    constraint: Arc<dyn Constraint<S>>,
}

impl<Smp, S> ProjectedStateSampler<Smp, S>
where
    Smp: StateSampler<S>,
{
    pub fn new(sampler: Smp, constraint: Arc<dyn Constraint<S>>) -> Self {
        Self { sampler, constraint }
    }
}

impl<Smp, S> StateSampler<S> for ProjectedStateSampler<Smp, S>
where
    Smp: StateSampler<S>,
{
    fn sample_uniform(&mut self, state: &mut S) {
        self.sampler.sample_uniform(state);
        self.constraint.project(state);
    }

    fn sample_uniform_near(&mut self, state: &mut S, near: &S, distance: f64) {
        self.sampler.sample_uniform_near(state, near, distance);
        self.constraint.project(state);
    }

    fn sample_gaussian(&mut self, state: &mut S, mean: &S, std_dev: f64) {
        self.sampler.sample_gaussian(state, mean, std_dev);
        self.constraint.project(state);
    }
}
