//! Scripted oracle for call-count scenarios in unit tests.

use std::collections::VecDeque;

use super::{ExclusionLiteral, Oracle, OracleSolution, SolveOutcome};
use crate::types::Objective;

/// Replays queued outcomes; answers `Infeasible` once the queue is empty.
#[derive(Debug, Default)]
pub(crate) struct ScriptedOracle {
    pub outcomes: VecDeque<SolveOutcome>,
    pub solves: usize,
    pub weights: Vec<(f64, f64)>,
    pub bounds: [Option<(f64, f64)>; 2],
    pub exclusions: Vec<Vec<ExclusionLiteral>>,
    pub dim: usize,
}

impl ScriptedOracle {
    pub fn new(dim: usize, outcomes: impl IntoIterator<Item = SolveOutcome>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
            dim,
            ..Self::default()
        }
    }
}

/// Optimal outcome at `(z1, z2)` whose value is taken under `w`.
pub(crate) fn optimal_at(z1: f64, z2: f64, w: (f64, f64), decisions: Vec<f64>) -> SolveOutcome {
    SolveOutcome::Optimal(OracleSolution {
        value: w.0 * z1 + w.1 * z2,
        z1,
        z2,
        decisions,
        nodes: 1,
    })
}

impl Oracle for ScriptedOracle {
    fn num_variables(&self) -> usize {
        self.dim
    }
    fn set_objective_weights(&mut self, w1: f64, w2: f64) {
        self.weights.push((w1, w2));
    }
    fn set_bound(&mut self, objective: Objective, lower: f64, upper: f64) {
        self.bounds[objective.index()] = Some((lower, upper));
    }
    fn clear_bound(&mut self, objective: Objective) {
        self.bounds[objective.index()] = None;
    }
    fn add_exclusion_constraint(&mut self, literals: Vec<ExclusionLiteral>) {
        self.exclusions.push(literals);
    }
    fn solve(&mut self) -> SolveOutcome {
        self.solves += 1;
        self.outcomes.pop_front().unwrap_or(SolveOutcome::Infeasible)
    }
}
