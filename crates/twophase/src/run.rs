//! Orchestrator of a two-phase run.
//!
//! Purpose
//! - Sequence phase one and exactly one phase-two strategy on a shared frontier
//!   and oracle, own the wall-clock budget, and hand back the frontier together
//!   with the run statistics.
//!
//! State machine
//! - `Init → PhaseOne → PhaseTwo(variant) → Done`; `Failed` is reachable from
//!   any phase on a fatal oracle failure.
//!
//! Code cross-refs: `phase1::phase_one`, `phase2`, `report::persist`

use std::path::PathBuf;
use std::time::Duration;

use crate::budget::Budget;
use crate::error::TpmError;
use crate::frontier::NonDominatedFrontier;
use crate::oracle::Oracle;
use crate::phase1::phase_one;
use crate::phase2::{phase_two_ranking, phase_two_split, PhaseTwoVariant, QueueOrder};
use crate::report;
use crate::stats::{PhaseWork, RunStatistics};
use crate::types::{PhaseStatus, Tolerances};

/// Knobs of a run; set before `TwoPhase::run`.
#[derive(Clone, Debug, PartialEq)]
pub struct TwoPhaseCfg {
    /// Global wall-clock limit, measured from the start of the run.
    pub time_limit: Duration,
    /// Log per-triangle and per-iteration progress at info level.
    pub print_progress: bool,
    pub variant: PhaseTwoVariant,
    /// Only read by the region-split strategy.
    pub queue_order: QueueOrder,
    /// Result file, appended to after the run.
    pub output: Option<PathBuf>,
    pub tolerances: Tolerances,
    pub max_nise_iterations: usize,
    /// Keep decision vectors on frontier entries.
    pub keep_decisions: bool,
}

impl Default for TwoPhaseCfg {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(3600),
            print_progress: false,
            variant: PhaseTwoVariant::RegionSplit,
            queue_order: QueueOrder::Fifo,
            output: None,
            tolerances: Tolerances::default(),
            max_nise_iterations: 1000,
            keep_decisions: true,
        }
    }
}

impl TwoPhaseCfg {
    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn print_progress(mut self, on: bool) -> Self {
        self.print_progress = on;
        self
    }

    /// Use ranking instead of region splitting in phase two.
    pub fn ranking(mut self) -> Self {
        self.variant = PhaseTwoVariant::Ranking;
        self
    }

    /// Process split regions last-in first-out.
    pub fn depth_first(mut self) -> Self {
        self.queue_order = QueueOrder::Lifo;
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Init,
    PhaseOne,
    PhaseTwo(PhaseTwoVariant),
    Done,
    Failed,
}

/// Whether the returned frontier is complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// A timeout cut a phase short; the frontier may miss points.
    Partial,
}

impl From<PhaseStatus> for RunStatus {
    fn from(status: PhaseStatus) -> Self {
        match status {
            PhaseStatus::Completed => RunStatus::Completed,
            PhaseStatus::Partial => RunStatus::Partial,
        }
    }
}

/// Everything a finished run hands back.
#[derive(Debug)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub frontier: NonDominatedFrontier,
    pub statistics: RunStatistics,
    /// Set when writing `TwoPhaseCfg::output` failed; the rest stays valid.
    pub persist_error: Option<TpmError>,
}

/// Two-phase method driver.
#[derive(Debug)]
pub struct TwoPhase {
    cfg: TwoPhaseCfg,
    state: RunState,
    statistics: RunStatistics,
}

impl TwoPhase {
    pub fn new(cfg: TwoPhaseCfg) -> Self {
        Self {
            cfg,
            state: RunState::Init,
            statistics: RunStatistics::default(),
        }
    }

    #[inline]
    pub fn cfg(&self) -> &TwoPhaseCfg {
        &self.cfg
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Snapshot of the last run's statistics (zeroed before the first run).
    #[inline]
    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    /// Compute the non-dominated frontier reachable through `oracle`.
    ///
    /// `Err` only on an invalid instance or a fatal phase-one failure; timeouts
    /// come back as `RunStatus::Partial`.
    pub fn run<O: Oracle>(&mut self, mut oracle: O) -> Result<RunOutcome, TpmError> {
        self.state = RunState::Init;
        self.statistics = RunStatistics::default();
        let variables = oracle.num_variables();
        if variables == 0 {
            self.state = RunState::Failed;
            return Err(TpmError::InvalidInstance(
                "oracle exposes no decision variables".to_string(),
            ));
        }

        let budget = Budget::start(self.cfg.time_limit);
        let mut frontier = NonDominatedFrontier::new(self.cfg.tolerances.eps_dominance);
        let mut work = PhaseWork::default();

        self.state = RunState::PhaseOne;
        tracing::info!(variables, "phase one started");
        let first = match phase_one(&mut oracle, &mut frontier, &self.cfg, &budget, &mut work) {
            Ok(status) => status,
            Err(err) => {
                self.state = RunState::Failed;
                tracing::error!(%err, "run aborted");
                return Err(err);
            }
        };
        let phase_one_time = budget.elapsed();
        let phase_one_solutions = frontier.len();
        tracing::info!(
            secs = phase_one_time.as_secs_f64(),
            solutions = phase_one_solutions,
            "phase one time"
        );

        let variant = self.cfg.variant;
        self.state = RunState::PhaseTwo(variant);
        tracing::info!(?variant, "phase two started");
        let second = match variant {
            PhaseTwoVariant::RegionSplit => {
                phase_two_split(&mut oracle, &mut frontier, &self.cfg, &budget, &mut work)
            }
            PhaseTwoVariant::Ranking => {
                phase_two_ranking(&mut oracle, &mut frontier, &self.cfg, &budget, &mut work)
            }
        };
        let total_time = budget.elapsed();
        let status = RunStatus::from(first.and(second));

        self.statistics = RunStatistics {
            variables,
            branching_nodes: work.nodes,
            oracle_calls: work.calls,
            phase_one_solutions,
            phase_two_solutions: frontier.all().iter().filter(|s| !s.is_supported()).count(),
            total_solutions: frontier.len(),
            phase_one_time,
            phase_two_time: total_time.saturating_sub(phase_one_time),
            total_time,
        };
        tracing::info!(
            phase_two_secs = self.statistics.phase_two_time.as_secs_f64(),
            total_secs = total_time.as_secs_f64(),
            solutions = frontier.len(),
            ?status,
            "run finished"
        );

        let persist_error = match &self.cfg.output {
            Some(path) => report::persist(path, &self.statistics, &frontier).err(),
            None => None,
        };
        if let Some(err) = &persist_error {
            tracing::warn!(%err, "result file not written");
        }

        self.state = RunState::Done;
        Ok(RunOutcome {
            status,
            frontier,
            statistics: self.statistics.clone(),
            persist_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;
    use crate::oracle::script::ScriptedOracle;
    use crate::oracle::{BinaryProgram, EnumerationOracle, LinearConstraint, Sense};

    fn staircase() -> BinaryProgram {
        BinaryProgram::new(
            vec![0.0, 2.0, 4.0, 5.0, 10.0, 3.0],
            vec![10.0, 5.0, 4.0, 2.0, 0.0, 9.0],
            vec![LinearConstraint::new(vec![1.0; 6], Sense::Equal, 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn builder_setters_override_defaults() {
        let cfg = TwoPhaseCfg::default()
            .time_limit(Duration::from_secs(5))
            .print_progress(true)
            .ranking()
            .depth_first()
            .output("out.txt");
        assert_eq!(cfg.time_limit, Duration::from_secs(5));
        assert!(cfg.print_progress);
        assert_eq!(cfg.variant, PhaseTwoVariant::Ranking);
        assert_eq!(cfg.queue_order, QueueOrder::Lifo);
        assert_eq!(cfg.output, Some(PathBuf::from("out.txt")));
        assert_eq!(TwoPhaseCfg::default().time_limit, Duration::from_secs(3600));
    }

    #[test]
    fn full_run_reports_statistics() {
        let mut oracle = EnumerationOracle::new(staircase());
        let mut tpm = TwoPhase::new(TwoPhaseCfg::default());
        assert_eq!(tpm.state(), RunState::Init);
        let outcome = tpm.run(&mut oracle).unwrap();
        assert_eq!(tpm.state(), RunState::Done);
        assert_eq!(outcome.status, RunStatus::Completed);
        assert!(outcome.persist_error.is_none());
        assert_eq!(outcome.frontier.outcomes(), staircase().nondominated_outcomes());

        let stats = tpm.statistics();
        assert_eq!(stats, &outcome.statistics);
        assert_eq!(stats.variables, 6);
        assert_eq!(stats.phase_one_solutions, 4);
        assert_eq!(stats.phase_two_solutions, 1);
        assert_eq!(stats.total_solutions, 5);
        assert_eq!(stats.oracle_calls, oracle.solves());
        assert!(stats.branching_nodes >= stats.oracle_calls);
        assert_eq!(stats.total_time, stats.phase_one_time + stats.phase_two_time);
    }

    #[test]
    fn fatal_phase_one_failure_moves_to_failed() {
        let mut tpm = TwoPhase::new(TwoPhaseCfg::default());
        let err = tpm.run(ScriptedOracle::new(3, [])).unwrap_err();
        assert!(matches!(
            err,
            TpmError::OracleFailure {
                stage: Stage::UpperLeftAnchor,
                ..
            }
        ));
        assert_eq!(tpm.state(), RunState::Failed);
    }

    #[test]
    fn empty_instance_is_rejected_before_any_solve() {
        let mut oracle = ScriptedOracle::new(0, []);
        let mut tpm = TwoPhase::new(TwoPhaseCfg::default());
        let err = tpm.run(&mut oracle).unwrap_err();
        assert!(matches!(err, TpmError::InvalidInstance(_)));
        assert_eq!(oracle.solves, 0);
    }

    #[test]
    fn zero_time_limit_yields_partial_status() {
        for cfg in [
            TwoPhaseCfg::default(),
            TwoPhaseCfg::default().ranking(),
        ] {
            let mut tpm = TwoPhase::new(cfg.time_limit(Duration::ZERO));
            let outcome = tpm.run(EnumerationOracle::new(staircase())).unwrap();
            assert_eq!(outcome.status, RunStatus::Partial);
            assert_eq!(tpm.state(), RunState::Done);
        }
    }

    #[test]
    fn unwritable_output_keeps_the_frontier() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TwoPhaseCfg::default().output(dir.path().join("missing").join("out.txt"));
        let outcome = TwoPhase::new(cfg)
            .run(EnumerationOracle::new(staircase()))
            .unwrap();
        assert_eq!(outcome.status, RunStatus::Completed);
        assert!(matches!(
            outcome.persist_error,
            Some(TpmError::Persistence { .. })
        ));
        assert_eq!(outcome.frontier.len(), 5);
    }
}
