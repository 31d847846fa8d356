//! Common traits defining the collaborators of constrained planning

use std::fmt::Debug;

/// Ambient configuration space
///
/// States are plain owned values: allocation is `alloc_state`, cloning is
/// `Clone`, and freeing happens on drop.
pub trait StateSpace {
    /// State type of this space
    type State: Clone + Debug + 'static;

    /// Number of coordinates of a state
    fn dimension(&self) -> usize;

    /// Allocate a fresh state
    fn alloc_state(&self) -> Self::State;

    /// Overwrite `destination` with `source`
    fn copy_state(&self, destination: &mut Self::State, source: &Self::State) {
        destination.clone_from(source);
    }

    /// Distance between two states
    fn distance(&self, a: &Self::State, b: &Self::State) -> f64;

    /// Write the point at parameter `t` in [0, 1] between `from` and `to` into `out`
    fn interpolate(&self, from: &Self::State, to: &Self::State, t: f64, out: &mut Self::State);

    /// Allocate the sampler this space uses by default
    fn alloc_default_sampler(&self) -> Box<dyn StateSampler<Self::State>>;
}

/// Trait for state samplers
///
/// Samplers give no feasibility guarantee; they only fill `state`.
pub trait StateSampler<S> {
    /// Sample a state uniformly from the space
    fn sample_uniform(&mut self, state: &mut S);

    /// Sample a state uniformly within `distance` of `near`
    fn sample_uniform_near(&mut self, state: &mut S, near: &S, distance: f64);

    /// Sample a state from a Gaussian centered at `mean`
    fn sample_gaussian(&mut self, state: &mut S, mean: &S, std_dev: f64);
}

impl<S, T: StateSampler<S> + ?Sized> StateSampler<S> for Box<T> {
    fn sample_uniform(&mut self, state: &mut S) {
        (**self).sample_uniform(state)
    }

    fn sample_uniform_near(&mut self, state: &mut S, near: &S, distance: f64) {
        (**self).sample_uniform_near(state, near, distance)
    }

    fn sample_gaussian(&mut self, state: &mut S, mean: &S, std_dev: f64) {
        (**self).sample_gaussian(state, mean, std_dev)
    }
}

/// Implicit constraint defining a manifold inside the ambient space
pub trait Constraint<S> {
    /// Whether `state` lies on the manifold within tolerance
    fn is_satisfied(&self, state: &S) -> bool;

    /// Move `state` onto the manifold in place, returning whether it converged
    fn project(&self, state: &mut S) -> bool;
}

/// Feasibility oracle (collision checking and the like)
pub trait StateValidityChecker<S> {
    fn is_valid(&self, state: &S) -> bool;
}

impl<S, F> StateValidityChecker<S> for F
where
    F: Fn(&S) -> bool,
{
    fn is_valid(&self, state: &S) -> bool {
        self(state)
    }
}

/// Validity checker that accepts every state
#[derive(Debug, Clone, Copy, Default)]
pub struct AllValidStateValidityChecker;

impl<S> StateValidityChecker<S> for AllValidStateValidityChecker {
    fn is_valid(&self, _state: &S) -> bool {
        true
    }
}

/// Outcome of a motion check that reports how far the motion got
#[derive(Debug, Clone, PartialEq)]
pub enum MotionCheck<S> {
    /// The whole motion is valid
    Valid,
    /// The motion stopped early
    Invalid {
        /// Last valid state along the motion
        last_valid: S,
        /// Fraction of the motion covered before `last_valid`
        fraction: f64,
    },
}

impl<S> MotionCheck<S> {
    pub fn is_valid(&self) -> bool {
        matches!(self, MotionCheck::Valid)
    }
}

/// Trait for local planners checking motions between two states
pub trait MotionValidator<S> {
    /// Check whether the motion from `s1` to `s2` is valid
    fn check_motion(&self, s1: &S, s2: &S) -> bool;

    /// Like `check_motion`, but report the last valid state on failure
    fn check_motion_with_last_valid(&self, s1: &S, s2: &S) -> MotionCheck<S>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSampler {
        calls: usize,
    }

    impl StateSampler<f64> for CountingSampler {
        fn sample_uniform(&mut self, state: &mut f64) {
            self.calls += 1;
            *state = 1.0;
        }

        fn sample_uniform_near(&mut self, state: &mut f64, near: &f64, _distance: f64) {
            self.calls += 1;
            *state = *near;
        }

        fn sample_gaussian(&mut self, state: &mut f64, mean: &f64, _std_dev: f64) {
            self.calls += 1;
            *state = *mean;
        }
    }

    #[test]
    fn test_closure_validity_checker() {
        let checker = |x: &f64| *x < 1.0;
        assert!(checker.is_valid(&0.5));
        assert!(!checker.is_valid(&1.5));
        assert!(AllValidStateValidityChecker.is_valid(&f64::NAN));
    }

    #[test]
    fn test_boxed_sampler_forwards() {
        let mut sampler: Box<CountingSampler> = Box::new(CountingSampler { calls: 0 });
        let mut state = 0.0;
        sampler.sample_uniform(&mut state);
        sampler.sample_gaussian(&mut state, &3.0, 1.0);
        assert_eq!(state, 3.0);
        assert_eq!(sampler.calls, 2);
    }

    #[test]
    fn test_motion_check_is_valid() {
        assert!(MotionCheck::<f64>::Valid.is_valid());
        let partial = MotionCheck::Invalid { last_valid: 0.5, fraction: 0.5 };
        assert!(!partial.is_valid());
    }
}
