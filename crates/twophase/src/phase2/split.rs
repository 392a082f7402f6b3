//! Region-splitting search between adjacent supported points.
//!
//! Each triangle starts as the bounding box of its two corners. A solve with
//! the chord-perpendicular weights either proves a box empty or returns a point
//! `p`; the box minus the stair-step notch at `p` leaves two sub-boxes, which
//! are queued. With integral outcomes every lattice point of the triangle is
//! covered by exactly one box over the run.

use std::collections::VecDeque;

use super::types::{QueueOrder, Region};
use super::triangles;
use crate::budget::Budget;
use crate::frontier::NonDominatedFrontier;
use crate::oracle::{Oracle, SolveOutcome};
use crate::run::TwoPhaseCfg;
use crate::stats::PhaseWork;
use crate::types::{chord_weights, Objective, PhaseStatus, Solution};

/// Child boxes left after excising the point `(p1, p2)` from `region`.
///
/// Left keeps `f1 < p1, f2 > p2`; right keeps `f1 > p1, f2 < p2`. Empty children
/// are dropped.
pub fn split_region(region: &Region, p1: f64, p2: f64) -> (Option<Region>, Option<Region>) {
    let left = (p1 - 1.0 >= region.f1_lo && p2 + 1.0 <= region.f2_hi)
        .then(|| Region::new((region.f1_lo, p1 - 1.0), (p2 + 1.0, region.f2_hi)));
    let right = (p1 + 1.0 <= region.f1_hi && p2 - 1.0 >= region.f2_lo)
        .then(|| Region::new((p1 + 1.0, region.f1_hi), (region.f2_lo, p2 - 1.0)));
    (left, right)
}

/// Fill every triangle by region splitting. A timeout aborts the whole phase.
pub fn phase_two_split<O: Oracle>(
    oracle: &mut O,
    frontier: &mut NonDominatedFrontier,
    cfg: &TwoPhaseCfg,
    budget: &Budget,
    work: &mut PhaseWork,
) -> PhaseStatus {
    let pairs = triangles(frontier);
    let status = split_all(oracle, frontier, cfg, budget, work, &pairs);
    oracle.clear_bound(Objective::First);
    oracle.clear_bound(Objective::Second);
    status
}

fn split_all<O: Oracle>(
    oracle: &mut O,
    frontier: &mut NonDominatedFrontier,
    cfg: &TwoPhaseCfg,
    budget: &Budget,
    work: &mut PhaseWork,
    pairs: &[(Solution, Solution)],
) -> PhaseStatus {
    let mut queue: VecDeque<Region> = VecDeque::new();
    for (k, (cur, next)) in pairs.iter().enumerate() {
        if cfg.print_progress {
            tracing::info!("processing triangle {} of {}", k + 1, pairs.len());
        } else {
            tracing::debug!("processing triangle {} of {}", k + 1, pairs.len());
        }
        let w = chord_weights(cur, next);
        oracle.set_objective_weights(w.x, w.y);
        queue.push_back(Region::new((cur.z1(), next.z1()), (next.z2(), cur.z2())));

        loop {
            let region = match cfg.queue_order {
                QueueOrder::Fifo => queue.pop_front(),
                QueueOrder::Lifo => queue.pop_back(),
            };
            let Some(region) = region else {
                break;
            };
            if budget.exceeded() {
                tracing::warn!(triangle = k + 1, "timeout: abandoning region splitting");
                return PhaseStatus::Partial;
            }
            let (lo, hi) = region.bounds(Objective::First);
            oracle.set_bound(Objective::First, lo, hi);
            let (lo, hi) = region.bounds(Objective::Second);
            oracle.set_bound(Objective::Second, lo, hi);

            let out = oracle.solve();
            work.record(out.nodes());
            match out {
                SolveOutcome::Optimal(sol) => {
                    let (left, right) = split_region(&region, sol.z1, sol.z2);
                    frontier.update(sol.into_solution(false, cfg.keep_decisions));
                    queue.extend(left);
                    queue.extend(right);
                }
                SolveOutcome::Infeasible => {}
                SolveOutcome::TimedOut { .. } => {
                    tracing::warn!(triangle = k + 1, "oracle timed out: abandoning region splitting");
                    return PhaseStatus::Partial;
                }
            }
        }
    }
    PhaseStatus::Completed
}
