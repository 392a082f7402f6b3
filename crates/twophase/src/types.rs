//! Basic objective-space types and tolerances.
//!
//! - `Tolerances`: centralizes the domination and tie epsilons.
//! - `Objective`: selects one of the two objective variables of an oracle.
//! - `Solution`: immutable outcome pair plus optional decision snapshot.
//!
//! Code cross-refs: `frontier::NonDominatedFrontier`, `oracle::Oracle`

use nalgebra::Vector2;

/// Numeric tolerances used by the frontier and the phase engines.
///
/// Exact-integer instances can run with both values at zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    /// Slack in the domination test used by `NonDominatedFrontier::update`.
    pub eps_dominance: f64,
    /// Ties in phase one: anchor bounds and the "strictly below the chord" test.
    pub eps_tie: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            eps_dominance: 0.1,
            eps_tie: 0.001,
        }
    }
}

/// How far a phase got before returning.
///
/// Fatal failures travel as `Err(TpmError)` next to this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseStatus {
    Completed,
    /// Abandoned on a timeout; everything found so far is kept.
    Partial,
}

impl PhaseStatus {
    #[inline]
    pub fn is_partial(self) -> bool {
        matches!(self, PhaseStatus::Partial)
    }

    /// `Partial` wins.
    #[inline]
    pub fn and(self, other: PhaseStatus) -> PhaseStatus {
        if self.is_partial() || other.is_partial() {
            PhaseStatus::Partial
        } else {
            PhaseStatus::Completed
        }
    }
}

/// One of the two objective variables exposed by an oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Objective {
    First,
    Second,
}

impl Objective {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Objective::First => 0,
            Objective::Second => 1,
        }
    }
}

/// Outcome of a feasible assignment in objective space.
///
/// Never mutated after construction; the frontier stores these by value.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    outcome: Vector2<f64>,
    supported: bool,
    decisions: Vec<f64>,
}

impl Solution {
    /// Solution without a decision snapshot.
    #[inline]
    pub fn new(z1: f64, z2: f64, supported: bool) -> Self {
        Self {
            outcome: Vector2::new(z1, z2),
            supported,
            decisions: Vec::new(),
        }
    }

    #[inline]
    pub fn with_decisions(z1: f64, z2: f64, supported: bool, decisions: Vec<f64>) -> Self {
        Self {
            outcome: Vector2::new(z1, z2),
            supported,
            decisions,
        }
    }

    #[inline]
    pub fn z1(&self) -> f64 {
        self.outcome.x
    }

    #[inline]
    pub fn z2(&self) -> f64 {
        self.outcome.y
    }

    #[inline]
    pub fn outcome(&self) -> Vector2<f64> {
        self.outcome
    }

    #[inline]
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Decision vector, empty when it was not retained.
    #[inline]
    pub fn decisions(&self) -> &[f64] {
        &self.decisions
    }

    /// Weighted-sum value `w · z`.
    #[inline]
    pub fn weighted(&self, w: Vector2<f64>) -> f64 {
        w.dot(&self.outcome)
    }

    /// `self` is no worse than `other` in both coordinates, up to `eps`.
    ///
    /// Equal points cover each other; this is the discard test of `update`.
    #[inline]
    pub fn covers(&self, other: &Solution, eps: f64) -> bool {
        self.z1() - eps <= other.z1() && self.z2() - eps <= other.z2()
    }

    /// Strict Pareto domination: no worse in both, strictly better in one.
    #[inline]
    pub fn strictly_dominates(&self, other: &Solution) -> bool {
        (other.z1() > self.z1() && other.z2() >= self.z2())
            || (other.z1() >= self.z1() && other.z2() > self.z2())
    }

    /// Domination under tolerance: no worse within `eps` in both coordinates
    /// and different beyond `eps` in at least one.
    #[inline]
    pub fn dominates_eps(&self, other: &Solution, eps: f64) -> bool {
        self.covers(other, eps)
            && ((self.z1() - other.z1()).abs() > eps || (self.z2() - other.z2()).abs() > eps)
    }
}

/// Weight vector of the chord through `left` and `right` (left has smaller z1).
///
/// Both endpoints share the same weighted value under the returned weights.
#[inline]
pub fn chord_weights(left: &Solution, right: &Solution) -> Vector2<f64> {
    Vector2::new(left.z2() - right.z2(), right.z1() - left.z1())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_weights_level_both_endpoints() {
        let a = Solution::new(1.0, 10.0, true);
        let b = Solution::new(5.0, 2.0, true);
        let w = chord_weights(&a, &b);
        assert_eq!(w, Vector2::new(8.0, 4.0));
        assert!((a.weighted(w) - b.weighted(w)).abs() < 1e-12);
    }

    #[test]
    fn covers_is_weak_and_dominates_is_strict() {
        let a = Solution::new(3.0, 4.0, false);
        let same = Solution::new(3.05, 4.0, false);
        let worse = Solution::new(3.0, 6.0, false);
        assert!(a.covers(&same, 0.1));
        assert!(!a.dominates_eps(&same, 0.1));
        assert!(a.dominates_eps(&worse, 0.1));
        assert!(a.strictly_dominates(&worse));
        assert!(!worse.covers(&a, 0.1));
    }
}
