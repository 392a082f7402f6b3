//! Bi-objective 0/1 knapsack instances.
//!
//! Both profit rows are maximized subject to `Σ w_i x_i ≤ capacity`. The
//! engines minimize, so `to_binary_program` negates the profits and frontier
//! coordinates of knapsack runs are negated profits.
//!
//! Code cross-refs: `oracle::enumerate::BinaryProgram`

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::TpmError;
use crate::oracle::{BinaryProgram, LinearConstraint, Sense};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnapsackInstance {
    weights: Vec<i64>,
    profits1: Vec<i64>,
    profits2: Vec<i64>,
    capacity: i64,
}

/// Random instance parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnapsackGenCfg {
    pub items: usize,
    pub weight: RangeInclusive<i64>,
    pub profit: RangeInclusive<i64>,
}

impl Default for KnapsackGenCfg {
    fn default() -> Self {
        Self {
            // small enough for the enumeration backend
            items: 16,
            weight: 10..=50,
            profit: 1..=100,
        }
    }
}

impl KnapsackInstance {
    pub fn new(
        weights: Vec<i64>,
        profits1: Vec<i64>,
        profits2: Vec<i64>,
        capacity: i64,
    ) -> Result<Self, TpmError> {
        if weights.is_empty() {
            return Err(TpmError::InvalidInstance("knapsack has no items".to_string()));
        }
        if profits1.len() != weights.len() || profits2.len() != weights.len() {
            return Err(TpmError::InvalidInstance(format!(
                "{} weights but {} and {} profits",
                weights.len(),
                profits1.len(),
                profits2.len()
            )));
        }
        if capacity < 0 {
            return Err(TpmError::InvalidInstance(format!(
                "negative capacity {capacity}"
            )));
        }
        Ok(Self {
            weights,
            profits1,
            profits2,
            capacity,
        })
    }

    /// Uniform weights and profits from `cfg`; capacity is half the total weight, rounded down.
    pub fn random(cfg: &KnapsackGenCfg, seed: u64) -> Result<Self, TpmError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut weights = Vec::with_capacity(cfg.items);
        let mut profits1 = Vec::with_capacity(cfg.items);
        let mut profits2 = Vec::with_capacity(cfg.items);
        for _ in 0..cfg.items {
            weights.push(rng.gen_range(cfg.weight.clone()));
            profits1.push(rng.gen_range(cfg.profit.clone()));
            profits2.push(rng.gen_range(cfg.profit.clone()));
        }
        let capacity = weights.iter().sum::<i64>() / 2;
        Self::new(weights, profits1, profits2, capacity)
    }

    #[inline]
    pub fn items(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    #[inline]
    pub fn weights(&self) -> &[i64] {
        &self.weights
    }

    #[inline]
    pub fn profits(&self) -> (&[i64], &[i64]) {
        (&self.profits1, &self.profits2)
    }

    /// Minimization form: objectives `-p1·x`, `-p2·x`, one packing row.
    pub fn to_binary_program(&self) -> Result<BinaryProgram, TpmError> {
        let neg = |row: &[i64]| row.iter().map(|&p| -(p as f64)).collect::<Vec<f64>>();
        let packing = LinearConstraint::new(
            self.weights.iter().map(|&w| w as f64).collect(),
            Sense::LessEq,
            self.capacity as f64,
        );
        BinaryProgram::new(neg(&self.profits1), neg(&self.profits2), vec![packing])
    }
}
