//! Phase two: complete the frontier between adjacent supported points.
//!
//! Purpose
//! - Every unsupported non-dominated point lies in a triangle spanned by two
//!   adjacent supported points. Two interchangeable strategies search them:
//!   `split` (rectangle decomposition, default) and `ranking` (no-good cuts
//!   with a worst-local-Nadir stopping rule).
//!
//! Timeout policy
//! - `split` abandons the whole phase on timeout.
//! - `ranking` abandons only the current triangle and moves on.
//!
//! Code cross-refs: `phase1`, `frontier::NonDominatedFrontier::update`

mod ranking;
mod split;
mod types;

pub use ranking::phase_two_ranking;
pub use split::{phase_two_split, split_region};
pub use types::{PhaseTwoVariant, QueueOrder, Region};

use crate::frontier::NonDominatedFrontier;
use crate::types::Solution;

/// Adjacent supported pairs `(cur, next)`, cloned so `all` can change meanwhile.
pub(crate) fn triangles(frontier: &NonDominatedFrontier) -> Vec<(Solution, Solution)> {
    frontier
        .supported()
        .windows(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}
