//! Tab-separated result file.
//!
//! Layout of one appended record:
//! - header line with the eight statistic column names,
//! - the matching data line (times in seconds),
//! - the marker line `FRONTIER_MARKER`,
//! - one line per frontier point: `z1\tz2` followed by the decision values.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::TpmError;
use crate::frontier::NonDominatedFrontier;
use crate::stats::RunStatistics;

pub const STATS_HEADER: &str = "NumVar\tTotalTime\tPhaseOneTime\tPhaseTwoTime\tBranchingNodes\tNumberOfSolutions\tPhaseOneSol\tPhaseTwoSol";
pub const FRONTIER_MARKER: &str = "Frontier and corresponding solution";

/// Write one record to `out`.
pub fn write_report<W: Write>(
    out: &mut W,
    stats: &RunStatistics,
    frontier: &NonDominatedFrontier,
) -> io::Result<()> {
    writeln!(out, "{STATS_HEADER}")?;
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        stats.variables,
        stats.total_time.as_secs_f64(),
        stats.phase_one_time.as_secs_f64(),
        stats.phase_two_time.as_secs_f64(),
        stats.branching_nodes,
        stats.total_solutions,
        stats.phase_one_solutions,
        stats.phase_two_solutions
    )?;
    writeln!(out, "{FRONTIER_MARKER}")?;
    for s in frontier.all() {
        write!(out, "{}\t{}", s.z1(), s.z2())?;
        for v in s.decisions() {
            write!(out, "\t{v}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Append one record to the file at `path`, creating it if needed.
pub fn persist(
    path: &Path,
    stats: &RunStatistics,
    frontier: &NonDominatedFrontier,
) -> Result<(), TpmError> {
    let wrap = |source| TpmError::Persistence {
        path: path.to_path_buf(),
        source,
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(wrap)?;
    let mut out = BufWriter::new(file);
    write_report(&mut out, stats, frontier).map_err(wrap)?;
    out.flush().map_err(wrap)
}
