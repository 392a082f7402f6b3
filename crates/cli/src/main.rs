use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::fmt::SubscriberBuilder;
use twophase::oracle::EnumerationOracle;
use twophase::run::{RunStatus, TwoPhase, TwoPhaseCfg};

mod instance;
mod provenance;

use instance::InstanceArgs;

#[derive(Parser)]
#[command(name = "tpm")]
#[command(about = "Two-phase method for bi-objective 0/1 knapsacks")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Compute the non-dominated frontier with the two-phase method
    Solve {
        #[command(flatten)]
        instance: InstanceArgs,
        /// Use ranking instead of region splitting in phase two
        #[arg(long)]
        ranking: bool,
        /// Process split regions depth-first
        #[arg(long, conflicts_with = "ranking")]
        depth_first: bool,
        /// Wall-clock limit in seconds
        #[arg(long, default_value_t = 3600.0)]
        time_limit: f64,
        /// Log phase-two progress at info level
        #[arg(long)]
        progress: bool,
        /// Append statistics and frontier to this file
        #[arg(long)]
        out: Option<PathBuf>,
        /// Compare the frontier with brute-force enumeration
        #[arg(long)]
        verify: bool,
    },
    /// Print the brute-force frontier of an instance
    Brute {
        #[command(flatten)]
        instance: InstanceArgs,
    },
}

fn main() -> Result<ExitCode> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Solve {
            instance,
            ranking,
            depth_first,
            time_limit,
            progress,
            out,
            verify,
        } => {
            if !time_limit.is_finite() || time_limit < 0.0 {
                bail!("time limit must be a non-negative number of seconds");
            }
            let mut cfg = TwoPhaseCfg::default()
                .time_limit(Duration::from_secs_f64(time_limit))
                .print_progress(progress);
            if ranking {
                cfg = cfg.ranking();
            }
            if depth_first {
                cfg = cfg.depth_first();
            }
            if let Some(path) = &out {
                cfg = cfg.output(path);
            }
            solve(&instance, cfg, verify)
        }
        Action::Brute { instance } => brute(&instance),
    }
}

fn solve(args: &InstanceArgs, cfg: TwoPhaseCfg, verify: bool) -> Result<ExitCode> {
    let kp = args.load()?;
    let program = kp.to_binary_program()?;
    tracing::info!(
        items = kp.items(),
        capacity = kp.capacity(),
        variant = ?cfg.variant,
        order = ?cfg.queue_order,
        "solve"
    );
    let out = cfg.output.clone();
    let params = serde_json::json!({
        "csv": args.csv,
        "items": kp.items(),
        "seed": args.seed,
        "capacity": kp.capacity(),
        "variant": format!("{:?}", cfg.variant),
        "queue_order": format!("{:?}", cfg.queue_order),
        "time_limit_secs": cfg.time_limit.as_secs_f64(),
    });

    let outcome = TwoPhase::new(cfg).run(EnumerationOracle::new(program.clone()))?;
    for s in outcome.frontier.all() {
        println!(
            "{}\t{}\t{}",
            s.z1(),
            s.z2(),
            if s.is_supported() { "S" } else { "U" }
        );
    }
    print!("{}", outcome.statistics);

    if let Some(path) = &out {
        match &outcome.persist_error {
            Some(err) => tracing::warn!(%err, "no provenance written"),
            None => {
                let prov = provenance::write_sidecar(
                    path,
                    params,
                    &provenance::RunSummary::of(&outcome),
                )?;
                tracing::info!(provenance = %prov.display(), "wrote provenance");
            }
        }
    }

    if verify {
        let expected = program.nondominated_outcomes();
        if outcome.frontier.outcomes() != expected {
            bail!(
                "frontier differs from brute force: {} points found, {} expected",
                outcome.frontier.len(),
                expected.len()
            );
        }
        tracing::info!(points = expected.len(), "frontier verified");
    }

    Ok(match outcome.status {
        RunStatus::Completed => ExitCode::SUCCESS,
        RunStatus::Partial => {
            tracing::warn!("time limit reached: frontier may be incomplete");
            ExitCode::from(2)
        }
    })
}

fn brute(args: &InstanceArgs) -> Result<ExitCode> {
    let program = args.load()?.to_binary_program()?;
    for (z1, z2) in program.nondominated_outcomes() {
        println!("{z1}\t{z2}");
    }
    Ok(ExitCode::SUCCESS)
}
