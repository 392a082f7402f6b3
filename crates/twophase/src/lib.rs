//! Two-phase method for bi-objective integer programs.
//!
//! Phase one (NISE) finds the supported non-dominated points through
//! weighted-sum solves; phase two fills every triangle between adjacent
//! supported points, either by region splitting or by ranking with no-good
//! cuts. The single-objective solver is abstracted behind `oracle::Oracle`.
//!
//! API Policy
//! - Internal crate; no stable public API. Breaking changes are fine when they
//!   improve the design.

pub mod budget;
pub mod error;
pub mod frontier;
pub mod knapsack;
pub mod oracle;
pub mod phase1;
pub mod phase2;
pub mod report;
pub mod run;
pub mod stats;
pub mod types;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::TpmError;
pub use frontier::NonDominatedFrontier;
pub use run::{RunOutcome, RunStatus, TwoPhase, TwoPhaseCfg};

/// Common exports for callers driving a run.
pub mod prelude {
    pub use crate::error::{Stage, TpmError};
    pub use crate::frontier::NonDominatedFrontier;
    pub use crate::knapsack::{KnapsackGenCfg, KnapsackInstance};
    pub use crate::oracle::{
        BinaryProgram, EnumerationOracle, ExclusionLiteral, LinearConstraint, Oracle,
        OracleSolution, Sense, SolveOutcome,
    };
    pub use crate::phase2::{PhaseTwoVariant, QueueOrder, Region};
    pub use crate::run::{RunOutcome, RunState, RunStatus, TwoPhase, TwoPhaseCfg};
    pub use crate::stats::RunStatistics;
    pub use crate::types::{Objective, Solution, Tolerances};
}
