//! Bounded real vector space with Euclidean metric
//!
//! Serves as the ambient space in which constraint manifolds are embedded.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::common::{
    PlanningResult, RealVectorBounds, RealVectorState, StateSampler, StateSpace,
};

/// Euclidean space bounded by an axis-aligned box
#[derive(Debug, Clone)]
pub struct RealVectorStateSpace {
    bounds: RealVectorBounds,
}

impl RealVectorStateSpace {
    pub fn new(bounds: RealVectorBounds) -> PlanningResult<Self> {
        bounds.check()?;
        Ok(Self { bounds })
    }

    pub fn bounds(&self) -> &RealVectorBounds {
        &self.bounds
    }

    /// Build a state from coordinates
    pub fn state_from(&self, values: &[f64]) -> RealVectorState {
        RealVectorState::from_row_slice(values)
    }

    pub fn enforce_bounds(&self, state: &mut RealVectorState) {
        self.bounds.clamp(state);
    }

    pub fn satisfies_bounds(&self, state: &RealVectorState) -> bool {
        self.bounds.contains(state)
    }

    /// Sampler with a fixed seed, for reproducible runs
    pub fn seeded_sampler(&self, seed: u64) -> RealVectorStateSampler {
        RealVectorStateSampler::with_rng(self.bounds.clone(), StdRng::seed_from_u64(seed))
    }
}

impl StateSpace for RealVectorStateSpace {
    type State = RealVectorState;

    fn dimension(&self) -> usize {
        self.bounds.dimension()
    }

    fn alloc_state(&self) -> RealVectorState {
        RealVectorState::zeros(self.dimension())
    }

    fn distance(&self, a: &RealVectorState, b: &RealVectorState) -> f64 {
        (a - b).norm()
    }

    fn interpolate(&self, from: &RealVectorState, to: &RealVectorState, t: f64, out: &mut RealVectorState) {
        *out = from + (to - from) * t;
    }

    fn alloc_default_sampler(&self) -> Box<dyn StateSampler<RealVectorState>> {
        Box::new(RealVectorStateSampler::new(self.bounds.clone()))
    }
}

/// Sampler drawing states inside the bounds of a real vector space
#[derive(Debug, Clone)]
pub struct RealVectorStateSampler {
    bounds: RealVectorBounds,
    rng: StdRng,
}

impl RealVectorStateSampler {
    pub fn new(bounds: RealVectorBounds) -> Self {
        Self::with_rng(bounds, StdRng::from_entropy())
    }

    pub fn with_rng(bounds: RealVectorBounds, rng: StdRng) -> Self {
        Self { bounds, rng }
    }

    fn resize(&self, state: &mut RealVectorState) {
        if state.len() != self.bounds.dimension() {
            *state = RealVectorState::zeros(self.bounds.dimension());
        }
    }
}

impl StateSampler<RealVectorState> for RealVectorStateSampler {
    fn sample_uniform(&mut self, state: &mut RealVectorState) {
        self.resize(state);
        for (i, x) in state.iter_mut().enumerate() {
            *x = self.rng.gen_range(self.bounds.low[i]..=self.bounds.high[i]);
        }
    }

    fn sample_uniform_near(&mut self, state: &mut RealVectorState, near: &RealVectorState, distance: f64) {
        self.resize(state);
        let distance = distance.abs();
        for (i, x) in state.iter_mut().enumerate() {
            let lo = (near[i] - distance).max(self.bounds.low[i]);
            let hi = (near[i] + distance).min(self.bounds.high[i]);
            *x = if lo < hi {
                self.rng.gen_range(lo..=hi)
            } else {
                near[i].max(self.bounds.low[i]).min(self.bounds.high[i])
            };
        }
    }

    fn sample_gaussian(&mut self, state: &mut RealVectorState, mean: &RealVectorState, std_dev: f64) {
        self.resize(state);
        for (i, x) in state.iter_mut().enumerate() {
            let z: f64 = self.rng.sample(StandardNormal);
            *x = mean[i] + std_dev * z;
        }
        self.bounds.clamp(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_space() -> RealVectorStateSpace {
        RealVectorStateSpace::new(RealVectorBounds::uniform(3, -2.0, 2.0).unwrap()).unwrap()
    }

    #[test]
    fn test_distance_and_interpolate() {
        let space = create_test_space();
        let a = space.state_from(&[0.0, 0.0, 0.0]);
        let b = space.state_from(&[3.0, 4.0, 0.0]);
        assert!((space.distance(&a, &b) - 5.0).abs() < 1e-10);

        let mut out = space.alloc_state();
        space.interpolate(&a, &b, 0.5, &mut out);
        assert_eq!(out, space.state_from(&[1.5, 2.0, 0.0]));

        space.interpolate(&a, &b, 0.0, &mut out);
        assert_eq!(out, a);
        space.interpolate(&a, &b, 1.0, &mut out);
        assert_eq!(out, b);
    }

    #[test]
    #[should_panic]
    fn test_distance_rejects_mismatched_states() {
        let space = create_test_space();
        let a = space.state_from(&[0.0, 0.0, 0.0]);
        let b = space.state_from(&[3.0, 4.0]);
        space.distance(&a, &b);
    }

    #[test]
    #[should_panic]
    fn test_interpolate_rejects_mismatched_states() {
        let space = create_test_space();
        let a = space.state_from(&[0.0, 0.0, 0.0]);
        let b = space.state_from(&[3.0, 4.0]);
        let mut out = space.alloc_state();
        space.interpolate(&a, &b, 0.5, &mut out);
    }

    #[test]
    fn test_interpolate_resizes_output() {
        let space = create_test_space();
        let a = space.state_from(&[0.0, 2.0, -2.0]);
        let b = space.state_from(&[1.0, 0.0, 2.0]);
        let mut out = RealVectorState::zeros(1);
        space.interpolate(&a, &b, 0.25, &mut out);
        assert_eq!(out, space.state_from(&[0.25, 1.5, -1.0]));
    }

    #[test]
    fn test_copy_state() {
        let space = create_test_space();
        let source = space.state_from(&[1.0, -1.0, 0.5]);
        let mut destination = space.alloc_state();
        space.copy_state(&mut destination, &source);
        assert_eq!(destination, source);
    }

    #[test]
    fn test_uniform_samples_within_bounds() {
        let space = create_test_space();
        let mut sampler = space.seeded_sampler(7);
        let mut state = space.alloc_state();
        for _ in 0..200 {
            sampler.sample_uniform(&mut state);
            assert!(space.satisfies_bounds(&state));
        }
    }

    #[test]
    fn test_uniform_near_stays_close() {
        let space = create_test_space();
        let mut sampler = space.seeded_sampler(11);
        let near = space.state_from(&[1.9, 0.0, -1.0]);
        let mut state = space.alloc_state();
        for _ in 0..200 {
            sampler.sample_uniform_near(&mut state, &near, 0.25);
            assert!(space.satisfies_bounds(&state));
            for i in 0..3 {
                assert!((state[i] - near[i]).abs() <= 0.25 + 1e-12);
            }
        }
    }

    #[test]
    fn test_gaussian_zero_deviation_returns_mean() {
        let space = create_test_space();
        let mut sampler = space.seeded_sampler(3);
        let mean = space.state_from(&[0.5, -0.5, 1.0]);
        let mut state = space.alloc_state();
        sampler.sample_gaussian(&mut state, &mean, 0.0);
        assert_eq!(state, mean);
    }

    #[test]
    fn test_default_sampler_resizes_state() {
        let space = create_test_space();
        let mut sampler = space.alloc_default_sampler();
        let mut state = RealVectorState::zeros(1);
        sampler.sample_uniform(&mut state);
        assert_eq!(state.len(), 3);
    }
}
