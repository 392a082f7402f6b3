//! Exhaustive reference oracle for small 0/1 programs.
//!
//! Walks all `2^n` assignments in Gray-code order, so each step flips one
//! variable and both objective rows and every constraint row are updated
//! incrementally. Only meant for small instances (tests, demos, verification);
//! programs above `MAX_VARIABLES` are rejected.

use nalgebra::DVector;

use super::{ExclusionLiteral, Oracle, OracleSolution, SolveOutcome};
use crate::error::TpmError;
use crate::types::Objective;

/// Largest supported number of binary variables.
pub const MAX_VARIABLES: usize = 25;

/// Feasibility slack for constraint rows and objective bounds.
const FEAS_EPS: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    LessEq,
    GreaterEq,
    Equal,
}

/// Row `coefs · x (sense) rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    pub coefs: DVector<f64>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(coefs: Vec<f64>, sense: Sense, rhs: f64) -> Self {
        Self {
            coefs: DVector::from_vec(coefs),
            sense,
            rhs,
        }
    }

    #[inline]
    fn satisfied(&self, lhs: f64) -> bool {
        match self.sense {
            Sense::LessEq => lhs <= self.rhs + FEAS_EPS,
            Sense::GreaterEq => lhs >= self.rhs - FEAS_EPS,
            Sense::Equal => (lhs - self.rhs).abs() <= FEAS_EPS,
        }
    }
}

/// Bi-objective 0/1 program: minimize `(c1·x, c2·x)` subject to linear rows.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryProgram {
    c1: DVector<f64>,
    c2: DVector<f64>,
    constraints: Vec<LinearConstraint>,
}

impl BinaryProgram {
    pub fn new(
        c1: Vec<f64>,
        c2: Vec<f64>,
        constraints: Vec<LinearConstraint>,
    ) -> Result<Self, TpmError> {
        let n = c1.len();
        if n == 0 {
            return Err(TpmError::InvalidInstance(
                "program has no variables".to_string(),
            ));
        }
        if n > MAX_VARIABLES {
            return Err(TpmError::InvalidInstance(format!(
                "{n} variables exceed the enumeration limit of {MAX_VARIABLES}"
            )));
        }
        if c2.len() != n {
            return Err(TpmError::InvalidInstance(format!(
                "objective rows differ in length ({n} vs {})",
                c2.len()
            )));
        }
        if let Some((k, row)) = constraints
            .iter()
            .enumerate()
            .find(|(_, row)| row.coefs.len() != n)
        {
            return Err(TpmError::InvalidInstance(format!(
                "constraint {k} has {} coefficients, expected {n}",
                row.coefs.len()
            )));
        }
        Ok(Self {
            c1: DVector::from_vec(c1),
            c2: DVector::from_vec(c2),
            constraints,
        })
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.c1.len()
    }

    /// Visit every feasible assignment as `(mask, z1, z2)`.
    fn for_each_feasible<F: FnMut(u64, f64, f64) -> bool>(&self, mut visit: F) -> u64 {
        let n = self.num_variables();
        let mut lhs = vec![0.0; self.constraints.len()];
        let (mut z1, mut z2) = (0.0, 0.0);
        let mut mask = 0u64;
        let total = 1u64 << n;
        for step in 0..total {
            if step > 0 {
                let bit = step.trailing_zeros() as usize;
                let sign = if mask & (1 << bit) == 0 { 1.0 } else { -1.0 };
                mask ^= 1 << bit;
                z1 += sign * self.c1[bit];
                z2 += sign * self.c2[bit];
                for (acc, row) in lhs.iter_mut().zip(&self.constraints) {
                    *acc += sign * row.coefs[bit];
                }
            }
            let feasible = self
                .constraints
                .iter()
                .zip(&lhs)
                .all(|(row, &acc)| row.satisfied(acc));
            if feasible && !visit(mask, z1, z2) {
                return step + 1;
            }
        }
        total
    }

    /// Brute-force Pareto set (minimization), sorted by ascending z1.
    pub fn nondominated_outcomes(&self) -> Vec<(f64, f64)> {
        let mut outcomes = Vec::new();
        self.for_each_feasible(|_, z1, z2| {
            outcomes.push((round_noise(z1), round_noise(z2)));
            true
        });
        outcomes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mut front: Vec<(f64, f64)> = Vec::new();
        for p in outcomes {
            // sorted by (z1, z2): only a strictly better z2 survives
            if front.last().map_or(true, |last| p.1 < last.1) {
                front.push(p);
            }
        }
        front
    }

    fn decisions_of(&self, mask: u64) -> Vec<f64> {
        (0..self.num_variables())
            .map(|i| if mask & (1 << i) != 0 { 1.0 } else { 0.0 })
            .collect()
    }
}

/// Incremental sums drift by a few ulps; snap them back onto the lattice.
#[inline]
fn round_noise(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < 1e-7 {
        r
    } else {
        v
    }
}

/// Exclusion constraint compiled to masks: violated iff `x & care == value`.
#[derive(Clone, Copy, Debug)]
struct Excluded {
    care: u64,
    value: u64,
}

/// Oracle that answers every solve by enumerating a `BinaryProgram`.
#[derive(Clone, Debug)]
pub struct EnumerationOracle {
    program: BinaryProgram,
    weights: (f64, f64),
    bounds: [(f64, f64); 2],
    exclusions: Vec<Excluded>,
    node_limit: Option<u64>,
    solves: u64,
}

impl EnumerationOracle {
    pub fn new(program: BinaryProgram) -> Self {
        Self {
            program,
            weights: (1.0, 1.0),
            bounds: [(f64::NEG_INFINITY, f64::INFINITY); 2],
            exclusions: Vec::new(),
            node_limit: None,
            solves: 0,
        }
    }

    /// Report `TimedOut` once a single solve examines more than `limit` assignments.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    #[inline]
    pub fn program(&self) -> &BinaryProgram {
        &self.program
    }

    /// Number of `solve` calls answered so far.
    #[inline]
    pub fn solves(&self) -> u64 {
        self.solves
    }

    #[inline]
    pub fn num_exclusions(&self) -> usize {
        self.exclusions.len()
    }

    #[inline]
    fn within_bounds(&self, z1: f64, z2: f64) -> bool {
        let [(lo1, hi1), (lo2, hi2)] = self.bounds;
        z1 >= lo1 - FEAS_EPS && z1 <= hi1 + FEAS_EPS && z2 >= lo2 - FEAS_EPS && z2 <= hi2 + FEAS_EPS
    }

    #[inline]
    fn excluded(&self, mask: u64) -> bool {
        self.exclusions.iter().any(|e| mask & e.care == e.value)
    }
}

impl Oracle for EnumerationOracle {
    fn num_variables(&self) -> usize {
        self.program.num_variables()
    }

    fn set_objective_weights(&mut self, w1: f64, w2: f64) {
        self.weights = (w1, w2);
    }

    fn set_bound(&mut self, objective: Objective, lower: f64, upper: f64) {
        self.bounds[objective.index()] = (lower, upper);
    }

    fn clear_bound(&mut self, objective: Objective) {
        self.bounds[objective.index()] = (f64::NEG_INFINITY, f64::INFINITY);
    }

    fn add_exclusion_constraint(&mut self, literals: Vec<ExclusionLiteral>) {
        let mut ex = Excluded { care: 0, value: 0 };
        for lit in literals {
            if lit.index >= self.program.num_variables() {
                continue;
            }
            ex.care |= 1 << lit.index;
            if lit.excluded >= 0.5 {
                ex.value |= 1 << lit.index;
            }
        }
        self.exclusions.push(ex);
    }

    fn solve(&mut self) -> SolveOutcome {
        self.solves += 1;
        let (w1, w2) = self.weights;
        let limit = self.node_limit.unwrap_or(u64::MAX);
        let mut best: Option<(f64, u64, f64, f64)> = None;
        let mut examined = 0u64;
        let mut hit_limit = false;
        let nodes = self.program.for_each_feasible(|mask, z1, z2| {
            examined += 1;
            if examined > limit {
                hit_limit = true;
                return false;
            }
            let (z1, z2) = (round_noise(z1), round_noise(z2));
            if !self.within_bounds(z1, z2) || self.excluded(mask) {
                return true;
            }
            let value = w1 * z1 + w2 * z2;
            if best.as_ref().map_or(true, |(v, ..)| value < *v) {
                best = Some((value, mask, z1, z2));
            }
            true
        });
        if hit_limit {
            return SolveOutcome::TimedOut { nodes };
        }
        match best {
            Some((value, mask, z1, z2)) => SolveOutcome::Optimal(OracleSolution {
                value,
                z1,
                z2,
                decisions: self.program.decisions_of(mask),
                nodes,
            }),
            None => SolveOutcome::Infeasible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // min (x0 + 2x1 + 3x2, 3x0 + 2x1 + x2) s.t. x0 + x1 + x2 >= 1
    fn pick_one() -> BinaryProgram {
        BinaryProgram::new(
            vec![1.0, 2.0, 3.0],
            vec![3.0, 2.0, 1.0],
            vec![LinearConstraint::new(
                vec![1.0, 1.0, 1.0],
                Sense::GreaterEq,
                1.0,
            )],
        )
        .unwrap()
    }

    fn optimal(out: SolveOutcome) -> OracleSolution {
        match out {
            SolveOutcome::Optimal(sol) => sol,
            other => panic!("expected optimal, got {other:?}"),
        }
    }

    #[test]
    fn weighted_solve_respects_bounds_and_exclusions() {
        let mut o = EnumerationOracle::new(pick_one());
        o.set_objective_weights(1.0, 0.0);
        let sol = optimal(o.solve());
        assert_eq!((sol.z1, sol.z2), (1.0, 3.0));
        assert_eq!(sol.decisions, vec![1.0, 0.0, 0.0]);
        assert_eq!(sol.nodes, 8);

        o.set_bound(Objective::First, 2.0, f64::INFINITY);
        let sol = optimal(o.solve());
        assert_eq!((sol.z1, sol.z2), (2.0, 2.0));

        o.add_exclusion_constraint(crate::oracle::no_good(&sol.decisions));
        o.set_objective_weights(1.0, 1.0);
        let sol = optimal(o.solve());
        assert_eq!((sol.z1, sol.z2), (3.0, 1.0));

        o.set_bound(Objective::Second, f64::NEG_INFINITY, 0.5);
        assert_eq!(o.solve(), SolveOutcome::Infeasible);
        o.clear_bound(Objective::Second);
        o.clear_bound(Objective::First);
        assert_eq!(optimal(o.solve()).z1, 1.0);
        assert_eq!(o.solves(), 5);
    }

    #[test]
    fn node_limit_reports_timeout() {
        let mut o = EnumerationOracle::new(pick_one()).with_node_limit(3);
        assert!(matches!(o.solve(), SolveOutcome::TimedOut { .. }));
    }

    #[test]
    fn brute_force_frontier_of_pick_one() {
        // feasible outcomes: every non-empty subset; singletons form the frontier
        assert_eq!(
            pick_one().nondominated_outcomes(),
            vec![(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)]
        );
    }

    #[test]
    fn rejects_malformed_programs() {
        assert!(matches!(
            BinaryProgram::new(vec![], vec![], vec![]),
            Err(TpmError::InvalidInstance(_))
        ));
        assert!(matches!(
            BinaryProgram::new(vec![1.0], vec![1.0, 2.0], vec![]),
            Err(TpmError::InvalidInstance(_))
        ));
        let row = LinearConstraint::new(vec![1.0, 1.0], Sense::LessEq, 1.0);
        assert!(matches!(
            BinaryProgram::new(vec![1.0], vec![1.0], vec![row]),
            Err(TpmError::InvalidInstance(_))
        ));
        assert!(BinaryProgram::new(vec![0.0; 26], vec![0.0; 26], vec![]).is_err());
    }
}
