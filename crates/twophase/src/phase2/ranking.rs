//! Ranking search between adjacent supported points.
//!
//! Solutions inside a triangle are enumerated in order of their weighted value;
//! each one is cut off by a no-good so the next solve returns the next best.
//! Once the value reaches the worst local Nadir of the known points in the
//! triangle, nothing better can hide in any gap and the triangle is done.

use super::triangles;
use crate::budget::Budget;
use crate::frontier::NonDominatedFrontier;
use crate::oracle::{no_good, Oracle, SolveOutcome};
use crate::run::TwoPhaseCfg;
use crate::stats::PhaseWork;
use crate::types::{chord_weights, Objective, PhaseStatus, Solution};

/// Rank every triangle. A timeout abandons only the triangle it hits.
pub fn phase_two_ranking<O: Oracle>(
    oracle: &mut O,
    frontier: &mut NonDominatedFrontier,
    cfg: &TwoPhaseCfg,
    budget: &Budget,
    work: &mut PhaseWork,
) -> PhaseStatus {
    let pairs = triangles(frontier);
    let mut status = PhaseStatus::Completed;
    let mut iterations = 0u64;
    let mut previous = vec![0.0; oracle.num_variables()];

    for (k, (cur, next)) in pairs.iter().enumerate() {
        tracing::info!("triangle {} of {}", k + 1, pairs.len());
        oracle.set_bound(Objective::First, cur.z1(), next.z1() - 1.0);
        oracle.set_bound(Objective::Second, next.z2(), cur.z2() - 1.0);
        let w = chord_weights(cur, next);
        oracle.set_objective_weights(w.x, w.y);

        loop {
            let out = oracle.solve();
            work.record(out.nodes());
            let sol = match out {
                SolveOutcome::Optimal(sol) => sol,
                SolveOutcome::Infeasible => break,
                SolveOutcome::TimedOut { .. } => {
                    tracing::warn!(triangle = k + 1, "oracle timed out: leaving triangle");
                    status = PhaseStatus::Partial;
                    break;
                }
            };
            iterations += 1;

            let nadir = frontier.worst_local_nadir_within(w, cur.z1(), next.z1());
            if sol.value >= nadir {
                tracing::debug!(value = sol.value, nadir, "ranking reached the local Nadir");
                break;
            }

            let decisions: Vec<f64> = sol
                .decisions
                .iter()
                .map(|&v| if v >= 0.5 { 1.0 } else { 0.0 })
                .collect();
            let diff = decisions
                .iter()
                .zip(&previous)
                .filter(|(a, b)| a != b)
                .count();
            if cfg.print_progress {
                tracing::info!(
                    it = iterations,
                    ub = nadir,
                    lb = sol.value,
                    gap = (nadir - sol.value) / sol.value,
                    diff,
                    "ranking"
                );
            }

            let found = if cfg.keep_decisions {
                Solution::with_decisions(sol.z1, sol.z2, false, decisions.clone())
            } else {
                Solution::new(sol.z1, sol.z2, false)
            };
            frontier.update(found);
            oracle.add_exclusion_constraint(no_good(&decisions));
            previous = decisions;

            if budget.exceeded() {
                tracing::warn!(triangle = k + 1, "timeout: leaving triangle");
                status = PhaseStatus::Partial;
                break;
            }
        }
    }
    oracle.clear_bound(Objective::First);
    oracle.clear_bound(Objective::Second);
    status
}
