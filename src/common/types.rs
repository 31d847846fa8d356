//! Common types used throughout manifold_planning

use nalgebra::DVector;

use crate::common::error::{PlanningError, PlanningResult};

/// State of a real vector space
pub type RealVectorState = DVector<f64>;

/// Axis-aligned box bounding a real vector space
#[derive(Debug, Clone, PartialEq)]
pub struct RealVectorBounds {
    pub low: Vec<f64>,
    pub high: Vec<f64>,
}

impl RealVectorBounds {
    /// Create bounds from per-coordinate limits
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> PlanningResult<Self> {
        let bounds = Self { low, high };
        bounds.check()?;
        Ok(bounds)
    }

    /// Same limits on every coordinate
    pub fn uniform(dimension: usize, low: f64, high: f64) -> PlanningResult<Self> {
        Self::new(vec![low; dimension], vec![high; dimension])
    }

    pub fn dimension(&self) -> usize {
        self.low.len()
    }

    /// Check that the bounds are well formed
    pub fn check(&self) -> PlanningResult<()> {
        if self.low.len() != self.high.len() {
            return Err(PlanningError::DimensionMismatch {
                expected: self.low.len(),
                actual: self.high.len(),
            });
        }
        if self.low.is_empty() {
            return Err(PlanningError::InvalidParameter(
                "bounds must have at least one dimension".to_string(),
            ));
        }
        for (i, (lo, hi)) in self.low.iter().zip(self.high.iter()).enumerate() {
            // The width must be representable too, samplers draw from it
            if !lo.is_finite() || !hi.is_finite() || lo > hi || !(hi - lo).is_finite() {
                return Err(PlanningError::InvalidParameter(format!(
                    "bounds for dimension {} are invalid: [{}, {}]",
                    i, lo, hi
                )));
            }
        }
        Ok(())
    }

    /// Length of the box diagonal
    pub fn extent(&self) -> f64 {
        self.low
            .iter()
            .zip(self.high.iter())
            .map(|(lo, hi)| (hi - lo).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    pub fn contains(&self, state: &RealVectorState) -> bool {
        state.len() == self.dimension()
            && state
                .iter()
                .zip(self.low.iter().zip(self.high.iter()))
                .all(|(x, (lo, hi))| *x >= *lo && *x <= *hi)
    }

    /// Clamp every coordinate of `state` into the box
    pub fn clamp(&self, state: &mut RealVectorState) {
        for (x, (lo, hi)) in state.iter_mut().zip(self.low.iter().zip(self.high.iter())) {
            *x = x.max(*lo).min(*hi);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_validation() {
        assert!(RealVectorBounds::uniform(3, -1.0, 1.0).is_ok());
        assert!(RealVectorBounds::new(vec![0.0], vec![1.0, 2.0]).is_err());
        assert!(RealVectorBounds::new(vec![1.0], vec![0.0]).is_err());
        assert!(RealVectorBounds::new(vec![], vec![]).is_err());
        assert!(RealVectorBounds::uniform(2, f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_bounds_with_overflowing_width_rejected() {
        assert!(matches!(
            RealVectorBounds::uniform(2, -f64::MAX, f64::MAX),
            Err(PlanningError::InvalidParameter(_))
        ));
        assert!(RealVectorBounds::uniform(2, -f64::MAX / 4.0, f64::MAX / 4.0).is_ok());
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = RealVectorBounds::uniform(2, -1.0, 1.0).unwrap();
        let mut state = RealVectorState::from_vec(vec![2.0, -3.0]);
        assert!(!bounds.contains(&state));
        bounds.clamp(&mut state);
        assert_eq!(state, RealVectorState::from_vec(vec![1.0, -1.0]));
        assert!(bounds.contains(&state));
    }

    #[test]
    fn test_bounds_extent() {
        let bounds = RealVectorBounds::new(vec![0.0, 0.0], vec![3.0, 4.0]).unwrap();
        assert!((bounds.extent() - 5.0).abs() < 1e-10);
    }
}
