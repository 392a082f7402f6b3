use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;
use twophase::run::RunOutcome;

/// Summary of a run recorded next to its result file.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub status: String,
    pub variables: usize,
    pub oracle_calls: u64,
    pub branching_nodes: u64,
    pub phase_one_solutions: usize,
    pub phase_two_solutions: usize,
    pub total_solutions: usize,
    pub total_secs: f64,
}

impl RunSummary {
    pub fn of(outcome: &RunOutcome) -> Self {
        let s = &outcome.statistics;
        Self {
            status: format!("{:?}", outcome.status),
            variables: s.variables,
            oracle_calls: s.oracle_calls,
            branching_nodes: s.branching_nodes,
            phase_one_solutions: s.phase_one_solutions,
            phase_two_solutions: s.phase_two_solutions,
            total_solutions: s.total_solutions,
            total_secs: s.total_time.as_secs_f64(),
        }
    }
}

/// Write `<result-stem>.provenance.json` with git rev, call site, parameters and run summary.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(
    result: P,
    params: Value,
    summary: &RunSummary,
) -> Result<PathBuf> {
    let result = result.as_ref();
    let provenance_path = provenance_path(result);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "twophase_version": twophase::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "params": params,
        "run": summary,
        "outputs": [result.to_string_lossy()]
    });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    Ok(provenance_path)
}

fn provenance_path(result: &Path) -> PathBuf {
    let mut name = result
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("result"));
    name.push(".provenance.json");
    result.with_file_name(name)
}

pub fn current_git_rev() -> String {
    if let Some(from_env) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return from_env.to_string();
    }
    if let Ok(env_override) = std::env::var("GIT_COMMIT") {
        if !env_override.is_empty() {
            return env_override;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
