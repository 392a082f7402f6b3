//! Phase one: NISE search for the supported non-dominated points.
//!
//! Purpose
//! - Find the two lexicographic anchors (upper-left, lower-right), then refine
//!   every chord between adjacent supported points by a weighted-sum solve
//!   perpendicular to it until no point lies strictly below any chord.
//!
//! Failure policy
//! - Infeasible solves are fatal here: without anchors no frontier exists.
//! - A timeout (global budget or oracle-internal) keeps what was found and
//!   returns `PhaseStatus::Partial`.
//!
//! Code cross-refs: `frontier::NonDominatedFrontier::insert_supported`, `run::TwoPhase`

use nalgebra::Vector2;

use crate::budget::Budget;
use crate::error::{Stage, TpmError};
use crate::frontier::NonDominatedFrontier;
use crate::oracle::{Oracle, OracleSolution, SolveOutcome};
use crate::run::TwoPhaseCfg;
use crate::stats::PhaseWork;
use crate::types::{chord_weights, Objective, PhaseStatus, Solution};

/// Run phase one and seed `frontier.all()` with the supported points found.
pub fn phase_one<O: Oracle>(
    oracle: &mut O,
    frontier: &mut NonDominatedFrontier,
    cfg: &TwoPhaseCfg,
    budget: &Budget,
    work: &mut PhaseWork,
) -> Result<PhaseStatus, TpmError> {
    let status = Nise {
        oracle,
        frontier: &mut *frontier,
        cfg,
        budget,
        work,
    }
    .run()?;
    frontier.copy_supported_to_all();
    tracing::info!(
        supported = frontier.supported().len(),
        partial = status.is_partial(),
        "phase one finished"
    );
    Ok(status)
}

#[derive(Clone, Copy, Debug)]
enum Anchor {
    UpperLeft,
    LowerRight,
}

impl Anchor {
    fn stage(self) -> Stage {
        match self {
            Anchor::UpperLeft => Stage::UpperLeftAnchor,
            Anchor::LowerRight => Stage::LowerRightAnchor,
        }
    }

    /// (objective minimized first, its weights, tie-break weights)
    fn plan(self) -> (Objective, (f64, f64), (f64, f64)) {
        match self {
            Anchor::UpperLeft => (Objective::First, (1.0, 0.0), (0.0, 1.0)),
            Anchor::LowerRight => (Objective::Second, (0.0, 1.0), (1.0, 0.0)),
        }
    }
}

struct Nise<'a, O> {
    oracle: &'a mut O,
    frontier: &'a mut NonDominatedFrontier,
    cfg: &'a TwoPhaseCfg,
    budget: &'a Budget,
    work: &'a mut PhaseWork,
}

impl<O: Oracle> Nise<'_, O> {
    fn run(&mut self) -> Result<PhaseStatus, TpmError> {
        let Some(upper_left) = self.anchor(Anchor::UpperLeft)? else {
            return Ok(PhaseStatus::Partial);
        };
        let ul_z1 = upper_left.z1();
        self.frontier.insert_supported(upper_left);
        if self.timed_out("upper-left anchor") {
            return Ok(PhaseStatus::Partial);
        }

        let Some(lower_right) = self.anchor(Anchor::LowerRight)? else {
            return Ok(PhaseStatus::Partial);
        };
        if (lower_right.z1() - ul_z1).abs() <= self.cfg.tolerances.eps_tie {
            tracing::info!("anchors coincide: single non-dominated outcome");
            return Ok(PhaseStatus::Completed);
        }
        self.frontier.insert_supported(lower_right);
        if self.timed_out("lower-right anchor") {
            return Ok(PhaseStatus::Partial);
        }

        self.refine_chords()
    }

    /// Lexicographic minimum: optimize the primary objective, cap it, then
    /// optimize the other one. The temporary cap is always released.
    fn anchor(&mut self, anchor: Anchor) -> Result<Option<Solution>, TpmError> {
        let (primary, first_weights, second_weights) = anchor.plan();
        self.oracle
            .set_objective_weights(first_weights.0, first_weights.1);
        let level = match self.solve(anchor.stage())? {
            Some(sol) => match primary {
                Objective::First => sol.z1,
                Objective::Second => sol.z2,
            },
            None => return Ok(None),
        };
        if self.timed_out("anchor level solve") {
            return Ok(None);
        }

        self.oracle.set_bound(
            primary,
            f64::NEG_INFINITY,
            level + self.cfg.tolerances.eps_tie,
        );
        self.oracle
            .set_objective_weights(second_weights.0, second_weights.1);
        let second = self.solve(anchor.stage());
        self.oracle.clear_bound(primary);
        let Some(sol) = second? else {
            return Ok(None);
        };
        tracing::debug!(?anchor, z1 = sol.z1, z2 = sol.z2, "anchor found");
        Ok(Some(sol.into_solution(true, self.cfg.keep_decisions)))
    }

    /// Main NISE loop over the (plus, minus) cursor pair.
    fn refine_chords(&mut self) -> Result<PhaseStatus, TpmError> {
        let eps = self.cfg.tolerances.eps_tie;
        let mut plus = 0usize;
        let mut iteration = 1usize;
        while plus + 1 < self.frontier.supported().len() {
            if iteration >= self.cfg.max_nise_iterations {
                tracing::info!(iteration, "NISE iteration cap reached");
                break;
            }
            iteration += 1;

            let sup = self.frontier.supported();
            let w: Vector2<f64> = chord_weights(&sup[plus], &sup[plus + 1]);
            let chord_level = sup[plus].weighted(w);
            self.oracle.set_objective_weights(w.x, w.y);
            let Some(sol) = self.solve(Stage::Nise)? else {
                return Ok(PhaseStatus::Partial);
            };

            if sol.value <= chord_level - eps {
                tracing::debug!(z1 = sol.z1, z2 = sol.z2, "supported point below chord");
                let s = sol.into_solution(true, self.cfg.keep_decisions);
                self.frontier.insert_supported(s);
            } else {
                plus += 1;
            }
            if self.timed_out("NISE") {
                return Ok(PhaseStatus::Partial);
            }
        }
        Ok(PhaseStatus::Completed)
    }

    /// `Ok(None)` on an oracle-internal timeout, `Err` on infeasibility.
    fn solve(&mut self, stage: Stage) -> Result<Option<OracleSolution>, TpmError> {
        let out = self.oracle.solve();
        self.work.record(out.nodes());
        match out {
            SolveOutcome::Optimal(sol) => Ok(Some(sol)),
            SolveOutcome::Infeasible => Err(TpmError::OracleFailure {
                stage,
                detail: "weighted-sum solve reported infeasible".to_string(),
            }),
            SolveOutcome::TimedOut { .. } => {
                tracing::warn!(%stage, "oracle timed out in phase one");
                Ok(None)
            }
        }
    }

    fn timed_out(&self, at: &str) -> bool {
        let hit = self.budget.exceeded();
        if hit {
            tracing::warn!(at, "timeout in phase one; keeping partial frontier");
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::script::{optimal_at, ScriptedOracle};
    use crate::oracle::{BinaryProgram, EnumerationOracle, LinearConstraint, Sense};
    use std::time::Duration;

    fn run_on<O: Oracle>(
        oracle: &mut O,
        cfg: &TwoPhaseCfg,
    ) -> (Result<PhaseStatus, TpmError>, NonDominatedFrontier, PhaseWork) {
        let mut frontier = NonDominatedFrontier::new(cfg.tolerances.eps_dominance);
        let mut work = PhaseWork::default();
        let budget = Budget::start(cfg.time_limit);
        let status = phase_one(oracle, &mut frontier, cfg, &budget, &mut work);
        (status, frontier, work)
    }

    // Outcomes (0,10) (2,5) (4,4) (5,2) (10,0) (3,9): supported are all but (4,4), (3,9).
    fn staircase() -> BinaryProgram {
        BinaryProgram::new(
            vec![0.0, 2.0, 4.0, 5.0, 10.0, 3.0],
            vec![10.0, 5.0, 4.0, 2.0, 0.0, 9.0],
            vec![LinearConstraint::new(vec![1.0; 6], Sense::Equal, 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn nise_finds_exactly_the_supported_points() {
        let mut oracle = EnumerationOracle::new(staircase());
        let (status, frontier, work) = run_on(&mut oracle, &TwoPhaseCfg::default());
        assert_eq!(status.unwrap(), PhaseStatus::Completed);
        assert_eq!(
            frontier.outcomes(),
            vec![(0.0, 10.0), (2.0, 5.0), (5.0, 2.0), (10.0, 0.0)]
        );
        assert!(frontier.all().iter().all(|s| s.is_supported()));
        assert_eq!(frontier.supported().len(), 4);
        assert_eq!(work.calls, oracle.solves());
    }

    #[test]
    fn coinciding_anchors_yield_one_point() {
        // the single assignment x = (1, 0) dominates everything else
        let program = BinaryProgram::new(
            vec![1.0, 3.0],
            vec![1.0, 2.0],
            vec![LinearConstraint::new(vec![1.0, 1.0], Sense::Equal, 1.0)],
        )
        .unwrap();
        let mut oracle = EnumerationOracle::new(program);
        let (status, frontier, work) = run_on(&mut oracle, &TwoPhaseCfg::default());
        assert_eq!(status.unwrap(), PhaseStatus::Completed);
        assert_eq!(frontier.outcomes(), vec![(1.0, 1.0)]);
        assert_eq!(work.calls, 4);
    }

    #[test]
    fn infeasible_anchor_is_fatal() {
        let mut oracle = ScriptedOracle::new(2, []);
        let (status, frontier, _) = run_on(&mut oracle, &TwoPhaseCfg::default());
        assert!(matches!(
            status,
            Err(TpmError::OracleFailure {
                stage: Stage::UpperLeftAnchor,
                ..
            })
        ));
        assert!(frontier.is_empty());
    }

    #[test]
    fn anchor_bound_is_released_after_use() {
        let mut oracle = ScriptedOracle::new(
            1,
            [
                optimal_at(0.0, 10.0, (1.0, 0.0), vec![1.0]),
                optimal_at(0.0, 10.0, (0.0, 1.0), vec![1.0]),
                optimal_at(0.0, 10.0, (0.0, 1.0), vec![1.0]),
                optimal_at(0.0, 10.0, (1.0, 0.0), vec![1.0]),
            ],
        );
        let (status, frontier, _) = run_on(&mut oracle, &TwoPhaseCfg::default());
        assert_eq!(status.unwrap(), PhaseStatus::Completed);
        assert_eq!(frontier.len(), 1);
        assert_eq!(oracle.bounds, [None, None]);
        assert_eq!(
            oracle.weights,
            vec![(1.0, 0.0), (0.0, 1.0), (0.0, 1.0), (1.0, 0.0)]
        );
    }

    #[test]
    fn zero_budget_stops_after_first_anchor() {
        let mut oracle = EnumerationOracle::new(staircase());
        let cfg = TwoPhaseCfg::default().time_limit(Duration::ZERO);
        let (status, frontier, _) = run_on(&mut oracle, &cfg);
        assert_eq!(status.unwrap(), PhaseStatus::Partial);
        // the level solve already trips the budget
        assert!(frontier.is_empty());
        assert_eq!(oracle.solves(), 1);
    }

    #[test]
    fn oracle_timeout_keeps_anchors() {
        let mut oracle = ScriptedOracle::new(
            1,
            [
                optimal_at(0.0, 10.0, (1.0, 0.0), vec![0.0]),
                optimal_at(0.0, 10.0, (0.0, 1.0), vec![0.0]),
                optimal_at(10.0, 0.0, (0.0, 1.0), vec![1.0]),
                optimal_at(10.0, 0.0, (1.0, 0.0), vec![1.0]),
                SolveOutcome::TimedOut { nodes: 7 },
            ],
        );
        let (status, frontier, work) = run_on(&mut oracle, &TwoPhaseCfg::default());
        assert_eq!(status.unwrap(), PhaseStatus::Partial);
        assert_eq!(frontier.outcomes(), vec![(0.0, 10.0), (10.0, 0.0)]);
        assert_eq!(work.nodes, 4 + 7);
    }
}
