//! Single-objective oracle consumed by the two-phase engines.
//!
//! Purpose
//! - Abstract the external solver: a fixed feasible region, two auxiliary
//!   objective variables `f1`, `f2`, a weighted-sum objective `w1·f1 + w2·f2`
//!   (minimized), bounds on `f1`/`f2` and "no-good" exclusion constraints.
//! - Keep the frontier algorithms solver-agnostic; `enumerate` provides a pure
//!   Rust backend for small binary programs.
//!
//! Contract
//! - Bounds and weights persist across `solve` calls until changed.
//! - `clear_bound` restores the unbounded baseline for that objective.
//! - Exclusion constraints are permanent once added.

pub mod enumerate;
#[cfg(test)]
pub(crate) mod script;

pub use enumerate::{BinaryProgram, EnumerationOracle, LinearConstraint, Sense};

use crate::types::{Objective, Solution};

/// One disjunct of an exclusion constraint: `x[index] != excluded`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExclusionLiteral {
    pub index: usize,
    pub excluded: f64,
}

/// Optimal assignment returned by a successful solve.
#[derive(Clone, Debug, PartialEq)]
pub struct OracleSolution {
    /// Weighted objective value `w1·z1 + w2·z2`.
    pub value: f64,
    pub z1: f64,
    pub z2: f64,
    pub decisions: Vec<f64>,
    /// Branching nodes (or equivalent work units) spent by this solve.
    pub nodes: u64,
}

impl OracleSolution {
    /// Frontier entry for this assignment; drops the decision vector unless `keep_decisions`.
    pub fn into_solution(self, supported: bool, keep_decisions: bool) -> Solution {
        if keep_decisions {
            Solution::with_decisions(self.z1, self.z2, supported, self.decisions)
        } else {
            Solution::new(self.z1, self.z2, supported)
        }
    }
}

/// Three-way outcome of a blocking solve.
#[derive(Clone, Debug, PartialEq)]
pub enum SolveOutcome {
    Optimal(OracleSolution),
    Infeasible,
    /// The solver's own limit was hit before proving anything.
    TimedOut { nodes: u64 },
}

impl SolveOutcome {
    /// Work units consumed regardless of the outcome.
    #[inline]
    pub fn nodes(&self) -> u64 {
        match self {
            SolveOutcome::Optimal(sol) => sol.nodes,
            SolveOutcome::Infeasible => 0,
            SolveOutcome::TimedOut { nodes } => *nodes,
        }
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        match self {
            SolveOutcome::Optimal(_) => "optimal",
            SolveOutcome::Infeasible => "infeasible",
            SolveOutcome::TimedOut { .. } => "timed out",
        }
    }
}

/// Weighted-sum oracle over a fixed feasible region.
pub trait Oracle {
    /// Dimension of the decision vector.
    fn num_variables(&self) -> usize;

    /// Replace the active objective by `w1·f1 + w2·f2`.
    fn set_objective_weights(&mut self, w1: f64, w2: f64);

    /// Restrict `objective` to `[lower, upper]`; use infinities for open sides.
    fn set_bound(&mut self, objective: Objective, lower: f64, upper: f64);

    fn clear_bound(&mut self, objective: Objective);

    /// Require that at least one literal differs in every later solution.
    fn add_exclusion_constraint(&mut self, literals: Vec<ExclusionLiteral>);

    fn solve(&mut self) -> SolveOutcome;
}

impl<O: Oracle + ?Sized> Oracle for &mut O {
    fn num_variables(&self) -> usize {
        (**self).num_variables()
    }
    fn set_objective_weights(&mut self, w1: f64, w2: f64) {
        (**self).set_objective_weights(w1, w2)
    }
    fn set_bound(&mut self, objective: Objective, lower: f64, upper: f64) {
        (**self).set_bound(objective, lower, upper)
    }
    fn clear_bound(&mut self, objective: Objective) {
        (**self).clear_bound(objective)
    }
    fn add_exclusion_constraint(&mut self, literals: Vec<ExclusionLiteral>) {
        (**self).add_exclusion_constraint(literals)
    }
    fn solve(&mut self) -> SolveOutcome {
        (**self).solve()
    }
}

/// Exclusion literals forbidding a 0/1 assignment (values rounded at 0.5).
pub fn no_good(decisions: &[f64]) -> Vec<ExclusionLiteral> {
    decisions
        .iter()
        .enumerate()
        .map(|(index, &v)| ExclusionLiteral {
            index,
            excluded: if v >= 0.5 { 1.0 } else { 0.0 },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_good_excludes_rounded_values() {
        let lits = no_good(&[0.9999, 0.0, 1.0, 0.2]);
        let excluded: Vec<f64> = lits.iter().map(|l| l.excluded).collect();
        assert_eq!(excluded, vec![1.0, 0.0, 1.0, 0.0]);
        assert_eq!(lits[3].index, 3);
    }
}
