//! Work items and selectors for phase two.

use crate::types::Objective;

/// Which completion strategy runs after phase one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PhaseTwoVariant {
    #[default]
    RegionSplit,
    Ranking,
}

/// Processing order of pending regions in the split strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueueOrder {
    /// Breadth-first.
    #[default]
    Fifo,
    /// Depth-first.
    Lifo,
}

/// Closed objective-space rectangle `[f1_lo, f1_hi] × [f2_lo, f2_hi]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub f1_lo: f64,
    pub f1_hi: f64,
    pub f2_lo: f64,
    pub f2_hi: f64,
}

impl Region {
    #[inline]
    pub fn new(f1: (f64, f64), f2: (f64, f64)) -> Self {
        Self {
            f1_lo: f1.0,
            f1_hi: f1.1,
            f2_lo: f2.0,
            f2_hi: f2.1,
        }
    }

    #[inline]
    pub fn bounds(&self, objective: Objective) -> (f64, f64) {
        match objective {
            Objective::First => (self.f1_lo, self.f1_hi),
            Objective::Second => (self.f2_lo, self.f2_hi),
        }
    }
}
