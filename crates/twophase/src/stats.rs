//! Run statistics gathered by the orchestrator.

use std::time::Duration;

/// Counters and timings of one run; returned by value once the run ends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Decision-vector dimension of the solved instance.
    pub variables: usize,
    /// Branching nodes reported by the oracle over all solves.
    pub branching_nodes: u64,
    /// Oracle calls issued over all phases.
    pub oracle_calls: u64,
    pub phase_one_solutions: usize,
    pub phase_two_solutions: usize,
    pub total_solutions: usize,
    pub phase_one_time: Duration,
    pub phase_two_time: Duration,
    pub total_time: Duration,
}

/// Oracle work performed inside a single phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseWork {
    pub calls: u64,
    pub nodes: u64,
}

impl PhaseWork {
    #[inline]
    pub(crate) fn record(&mut self, nodes: u64) {
        self.calls += 1;
        self.nodes += nodes;
    }
}

impl std::fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Run Statistics:")?;
        writeln!(f, "  Variables: {}", self.variables)?;
        writeln!(f, "  Branching Nodes: {}", self.branching_nodes)?;
        writeln!(f, "  Oracle Calls: {}", self.oracle_calls)?;
        writeln!(f, "  Phase One Solutions: {}", self.phase_one_solutions)?;
        writeln!(f, "  Phase Two Solutions: {}", self.phase_two_solutions)?;
        writeln!(f, "  Total Solutions: {}", self.total_solutions)?;
        writeln!(
            f,
            "  Phase One Time (secs): {:.3}",
            self.phase_one_time.as_secs_f64()
        )?;
        writeln!(
            f,
            "  Phase Two Time (secs): {:.3}",
            self.phase_two_time.as_secs_f64()
        )?;
        writeln!(f, "  Total Time (secs): {:.3}", self.total_time.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_counters() {
        let stats = RunStatistics {
            variables: 3,
            branching_nodes: 40,
            phase_one_solutions: 2,
            total_solutions: 2,
            phase_one_time: Duration::from_millis(1500),
            ..RunStatistics::default()
        };
        let text = stats.to_string();
        assert!(text.starts_with("Run Statistics:\n"));
        assert!(text.contains("  Branching Nodes: 40\n"));
        assert!(text.contains("  Phase One Time (secs): 1.500\n"));
    }

    #[test]
    fn phase_work_accumulates() {
        let mut w = PhaseWork::default();
        w.record(10);
        w.record(0);
        assert_eq!(w, PhaseWork { calls: 2, nodes: 10 });
    }
}
