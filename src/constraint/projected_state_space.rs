//! Projected state space: planning on constraint manifolds by projection
//!
//! States live in an ambient space, but only those satisfying the
//! constraint are feasible. Motions between feasible states are built by
//! stepping toward the target in the ambient space and projecting every
//! step back onto the manifold.

use std::sync::Arc;

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::common::{
    AllValidStateValidityChecker, Constraint, PlanningError, PlanningResult, StateSampler,
    StateSpace, StateValidityChecker,
};
use crate::constraint::projected_state_sampler::ProjectedStateSampler;
use crate::constraint::projection::{ConstraintFunction, ProjectionConfig, ProjectionConstraint};
use crate::spaces::RealVectorStateSpace;

/// Ratio between the deviation bound (lambda) and the step size (delta)
pub const DEVIATION_FACTOR: f64 = 2.0;

/// Configuration for a projected state space
#[derive(Debug, Clone)]
pub struct ProjectedSpaceConfig {
    /// Traversal step size, also the tolerance for reaching a target
    pub delta: f64,
}

impl Default for ProjectedSpaceConfig {
    fn default() -> Self {
        Self { delta: 0.05 }
    }
}

impl ProjectedSpaceConfig {
    pub fn validate(&self) -> PlanningResult<()> {
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "delta must be positive and finite, got {}",
                self.delta
            )));
        }
        Ok(())
    }
}

/// Options for a single manifold traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Skip the validity checker and only follow the manifold
    pub interpolate: bool,
    /// Record the accepted states
    pub collect_path: bool,
    /// Start the recorded path with a copy of `from`
    pub include_endpoints: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            interpolate: false,
            collect_path: false,
            include_endpoints: true,
        }
    }
}

impl TraversalOptions {
    /// Validity-checked traversal recording the path with endpoints
    pub fn with_path() -> Self {
        Self {
            collect_path: true,
            ..Default::default()
        }
    }

    pub fn interpolate(mut self, interpolate: bool) -> Self {
        self.interpolate = interpolate;
        self
    }

    pub fn collect_path(mut self, collect_path: bool) -> Self {
        self.collect_path = collect_path;
        self
    }

    pub fn include_endpoints(mut self, include_endpoints: bool) -> Self {
        self.include_endpoints = include_endpoints;
        self
    }
}

/// Why a traversal stopped stepping
///
/// Informational only: success is decided by the remaining distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalStop {
    /// `from` does not satisfy the constraint
    InfeasibleStart,
    /// `from` is already within one step of `to`
    AlreadyThere,
    /// The last accepted state is within tolerance of `to`
    Reached,
    /// Projection of the next step did not converge
    ProjectionFailed,
    /// The validity checker rejected the next step
    Invalid,
    /// Projection moved the next step further than lambda
    Deviated,
    /// The next step was no closer to `to`
    NoProgress,
}

/// Result of a manifold traversal
#[derive(Debug, Clone)]
pub struct Traversal<S> {
    /// Whether the traversal ended within delta of the target
    pub success: bool,
    pub stop: TraversalStop,
    /// Distance from the last accepted state to the target
    pub distance: f64,
    /// Accepted states, when requested; `None` if the start was infeasible
    pub path: Option<Vec<S>>,
}

impl<S> Traversal<S> {
    /// Recorded states, empty when none were recorded
    pub fn into_path(self) -> Vec<S> {
        self.path.unwrap_or_default()
    }
}

/// Ambient state space restricted to a constraint manifold
pub struct ProjectedStateSpace<Sp: StateSpace> {
    space: Sp,
    constraint: Arc<dyn Constraint<Sp::State>>,
    validity_checker: Arc<dyn StateValidityChecker<Sp::State>>,
    config: ProjectedSpaceConfig,
}

impl<Sp: StateSpace> ProjectedStateSpace<Sp> {
    /// Create a projected space accepting every state as valid
    ///
    /// The constraint is taken as is: its dimension is not compared with
    /// the ambient space. `with_projection` does that check for Newton
    /// projection constraints.
    pub fn new(
        space: Sp,
        constraint: Arc<dyn Constraint<Sp::State>>,
        config: ProjectedSpaceConfig,
    ) -> PlanningResult<Self> {
        config.validate()?;
        Ok(Self {
            space,
            constraint,
            validity_checker: Arc::new(AllValidStateValidityChecker),
            config,
        })
    }

    pub fn with_validity_checker<V>(mut self, checker: V) -> Self
    where
        V: StateValidityChecker<Sp::State> + 'static,
    {
        self.validity_checker = Arc::new(checker);
        self
    }

    pub fn ambient(&self) -> &Sp {
        &self.space
    }

    pub fn constraint(&self) -> &Arc<dyn Constraint<Sp::State>> {
        &self.constraint
    }

    pub fn validity_checker(&self) -> &Arc<dyn StateValidityChecker<Sp::State>> {
        &self.validity_checker
    }

    pub fn config(&self) -> &ProjectedSpaceConfig {
        &self.config
    }

    pub fn delta(&self) -> f64 {
        self.config.delta
    }

    /// Largest displacement a single projected step may have
    pub fn lambda(&self) -> f64 {
        DEVIATION_FACTOR * self.config.delta
    }

    /// Wrap an ambient sampler so its samples are projected onto the manifold
    pub fn projected_sampler<Smp>(&self, sampler: Smp) -> ProjectedStateSampler<Smp, Sp::State>
    where
        Smp: StateSampler<Sp::State>,
    {
        ProjectedStateSampler::new(sampler, self.constraint.clone())
    }

    /// Walk from `from` toward `to` along the manifold
    ///
    /// Each iteration steps `delta` toward `to` in the ambient space and
    /// projects the result. A step is accepted only if projection
    /// converges, the state is valid (unless `interpolate` is set), the
    /// projection moved it at most `lambda`, and it is strictly closer to
    /// `to`. Stepping stops at the first rejected step or once within
    /// `delta` of the target; the traversal succeeds iff the last accepted
    /// state is within `delta` of `to`.
    pub fn traverse_manifold(
        &self,
        from: &Sp::State,
        to: &Sp::State,
        options: TraversalOptions,
    ) -> Traversal<Sp::State> {
        // We can't move along the manifold if we were never there
        if !self.constraint.is_satisfied(from) {
            tracing::debug!("traversal start does not satisfy the constraint");
            return Traversal {
                success: false,
                stop: TraversalStop::InfeasibleStart,
                distance: self.space.distance(from, to),
                path: None,
            };
        }

        let mut path = if options.collect_path { Some(Vec::new()) } else { None };
        if options.include_endpoints {
            if let Some(path) = path.as_mut() {
                path.push(from.clone());
            }
        }

        let delta = self.config.delta;
        let lambda = self.lambda();

        let mut dist = self.space.distance(from, to);
        if dist <= delta {
            return Traversal {
                success: true,
                stop: TraversalStop::AlreadyThere,
                distance: dist,
                path,
            };
        }

        let mut previous = from.clone();
        let mut scratch = self.space.alloc_state();

        let stop = loop {
            self.space.interpolate(&previous, to, delta / dist, &mut scratch);

            let on_manifold = self.constraint.project(&mut scratch);
            let valid = options.interpolate || self.validity_checker.is_valid(&scratch);
            let step = self.space.distance(&previous, &scratch);

            if !on_manifold {
                break TraversalStop::ProjectionFailed;
            }
            if !valid {
                break TraversalStop::Invalid;
            }
            if step > lambda {
                break TraversalStop::Deviated;
            }

            let new_dist = self.space.distance(&scratch, to);
            if new_dist >= dist {
                break TraversalStop::NoProgress;
            }

            dist = new_dist;
            self.space.copy_state(&mut previous, &scratch);
            if let Some(path) = path.as_mut() {
                path.push(scratch.clone());
            }
            tracing::trace!(step, remaining = dist, "accepted manifold step");

            if dist < delta {
                break TraversalStop::Reached;
            }
        };

        let success = dist <= delta;
        tracing::debug!(?stop, success, remaining = dist, "manifold traversal stopped");

        Traversal {
            success,
            stop,
            distance: dist,
            path,
        }
    }

    /// Discretized path along the manifold from `from` toward `to`, endpoints included
    pub fn discrete_geodesic(
        &self,
        from: &Sp::State,
        to: &Sp::State,
        interpolate: bool,
    ) -> Traversal<Sp::State> {
        self.traverse_manifold(from, to, TraversalOptions::with_path().interpolate(interpolate))
    }

    /// State of `geodesic` whose relative arc length is closest to `t`
    ///
    /// Returns the first state of a zero-length geodesic and `None` for an
    /// empty one.
    pub fn geodesic_interpolate<'g>(&self, geodesic: &'g [Sp::State], t: f64) -> Option<&'g Sp::State> {
        let first = geodesic.first()?;

        let arc_lengths: Vec<f64> = std::iter::once(0.0)
            .chain(geodesic.iter().tuple_windows::<(_, _)>().scan(0.0, |total, (a, b)| {
                *total += self.space.distance(a, b);
                Some(*total)
            }))
            .collect();

        let last = arc_lengths.last().copied().unwrap_or(0.0);
        if last <= f64::EPSILON {
            return Some(first);
        }

        arc_lengths
            .iter()
            .position_min_by_key(|d| OrderedFloat((*d / last - t).abs()))
            .map(|i| &geodesic[i])
    }
}

impl ProjectedStateSpace<RealVectorStateSpace> {
    /// Projected space over a real vector space using Newton projection on `function`
    pub fn from_function<F>(
        space: RealVectorStateSpace,
        function: F,
        projection: ProjectionConfig,
        config: ProjectedSpaceConfig,
    ) -> PlanningResult<Self>
    where
        F: ConstraintFunction + 'static,
    {
        let constraint = ProjectionConstraint::new(function, projection)?;
        Self::with_projection(space, Arc::new(constraint), config)
    }

    /// Projected space over a real vector space sharing an existing projection constraint
    pub fn with_projection<F>(
        space: RealVectorStateSpace,
        constraint: Arc<ProjectionConstraint<F>>,
        config: ProjectedSpaceConfig,
    ) -> PlanningResult<Self>
    where
        F: ConstraintFunction + 'static,
    {
        constraint.check_dimension(space.dimension())?;
        Self::new(space, constraint, config)
    }
}

impl<Sp: StateSpace> StateSpace for ProjectedStateSpace<Sp> {
    type State = Sp::State;

    fn dimension(&self) -> usize {
        self.space.dimension()
    }

    fn alloc_state(&self) -> Self::State {
        self.space.alloc_state()
    }

    fn copy_state(&self, destination: &mut Self::State, source: &Self::State) {
        self.space.copy_state(destination, source);
    }

    fn distance(&self, a: &Self::State, b: &Self::State) -> f64 {
        self.space.distance(a, b)
    }

    /// Interpolate along the manifold; yields `from` when no geodesic reaches `to`
    fn interpolate(&self, from: &Self::State, to: &Self::State, t: f64, out: &mut Self::State) {
        let traversal = self.discrete_geodesic(from, to, true);
        let geodesic = if traversal.success { traversal.into_path() } else { Vec::new() };

        match self.geodesic_interpolate(&geodesic, t) {
            Some(state) => self.space.copy_state(out, state),
            None => self.space.copy_state(out, from),
        }
    }

    fn alloc_default_sampler(&self) -> Box<dyn StateSampler<Self::State>> {
        Box::new(self.projected_sampler(self.space.alloc_default_sampler()))
    }
}
