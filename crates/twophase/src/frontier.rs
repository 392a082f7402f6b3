//! Non-dominated frontier for bi-objective minimization.
//!
//! Purpose
//! - Keep every retained outcome (`all`) and the subset known to be supported
//!   (`supported`), both sorted by ascending first objective.
//! - Provide domination-aware insertion and the worst local Nadir value used by
//!   the ranking phase.
//!
//! Invariants
//! - No member of `all` covers another within `eps_dominance`.
//! - Once stable, consecutive members have increasing z1 and decreasing z2.
//!
//! Code cross-refs: `types::Solution`, `phase1`, `phase2`

use nalgebra::Vector2;

use crate::types::Solution;

#[derive(Clone, Debug)]
pub struct NonDominatedFrontier {
    all: Vec<Solution>,
    supported: Vec<Solution>,
    eps: f64,
    worst_local_nadir: Option<f64>,
}

impl Default for NonDominatedFrontier {
    fn default() -> Self {
        Self::new(crate::types::Tolerances::default().eps_dominance)
    }
}

impl NonDominatedFrontier {
    /// Empty frontier whose `update` uses `eps` as domination slack.
    pub fn new(eps: f64) -> Self {
        Self {
            all: Vec::new(),
            supported: Vec::new(),
            eps,
            worst_local_nadir: None,
        }
    }

    #[inline]
    pub fn all(&self) -> &[Solution] {
        &self.all
    }

    #[inline]
    pub fn supported(&self) -> &[Solution] {
        &self.supported
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    #[inline]
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// Max over adjacent pairs of `next.z1 + prev.z2`; `None` below two points.
    #[inline]
    pub fn worst_local_nadir(&self) -> Option<f64> {
        self.worst_local_nadir
    }

    /// Outcome pairs of `all`, in order.
    pub fn outcomes(&self) -> Vec<(f64, f64)> {
        self.all.iter().map(|s| (s.z1(), s.z2())).collect()
    }

    /// Ordered insertion into the supported list, without any pruning.
    ///
    /// Pre: `s` is optimal for some positive weighting, hence not dominated.
    pub fn insert_supported(&mut self, s: Solution) {
        let at = self.supported.partition_point(|p| p.z1() < s.z1());
        self.supported.insert(at, s);
    }

    /// Replace `all` by the supported list (end of phase one).
    pub fn copy_supported_to_all(&mut self) {
        self.all = self.supported.clone();
        self.recompute_nadir();
    }

    /// Domination-aware insertion into `all`.
    ///
    /// Returns `true` iff `all` changed. Re-inserting a covered point is a no-op.
    pub fn update(&mut self, s: Solution) -> bool {
        if self.all.is_empty() {
            self.all.push(s);
            return true;
        }
        let mut i = 0usize;
        while i < self.all.len() {
            let e = &self.all[i];
            if e.covers(&s, self.eps) {
                return false;
            }
            if s.strictly_dominates(e) {
                // s takes e's slot, then sweeps every later point it covers.
                let mut j = i + 1;
                while j < self.all.len() {
                    if s.covers(&self.all[j], self.eps) {
                        self.all.remove(j);
                    } else {
                        j += 1;
                    }
                }
                self.all[i] = s;
                self.recompute_nadir();
                return true;
            }
            i += 1;
        }
        let at = self
            .all
            .iter()
            .position(|e| e.z1() > s.z1())
            .unwrap_or(self.all.len());
        self.all.insert(at, s);
        self.recompute_nadir();
        true
    }

    /// Worst local Nadir value under weights `w`, restricted to the triangle
    /// spanned by the supported corners with first coordinates `z1_lo` and `z1_hi`.
    ///
    /// Scans adjacent pairs `(a, b)` of `all` with `a.z1 >= z1_lo` and stops at the
    /// first pair with `b.z1 > z1_hi`. Returns `-inf` when no pair qualifies.
    pub fn worst_local_nadir_within(&self, w: Vector2<f64>, z1_lo: f64, z1_hi: f64) -> f64 {
        let mut worst = f64::NEG_INFINITY;
        for pair in self.all.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if b.z1() > z1_hi {
                break;
            }
            if a.z1() >= z1_lo {
                worst = worst.max(w.x * b.z1() + w.y * a.z2());
            }
        }
        worst
    }

    fn recompute_nadir(&mut self) {
        self.worst_local_nadir = self
            .all
            .windows(2)
            .map(|pair| pair[1].z1() + pair[0].z2())
            .reduce(f64::max);
    }
}
