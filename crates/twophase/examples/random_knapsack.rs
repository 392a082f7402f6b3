//! Solve one random bi-objective knapsack and print its frontier.
//!
//! Usage:
//!   cargo run -p twophase --example random_knapsack -- [items] [seed]
//!
//! Coordinates are negated profits.

use twophase::knapsack::{KnapsackGenCfg, KnapsackInstance};
use twophase::oracle::EnumerationOracle;
use twophase::run::{TwoPhase, TwoPhaseCfg};

fn main() -> Result<(), twophase::TpmError> {
    let mut args = std::env::args().skip(1);
    let items = args.next().and_then(|a| a.parse().ok()).unwrap_or(12);
    let seed = args.next().and_then(|a| a.parse().ok()).unwrap_or(0);
    let gen = KnapsackGenCfg {
        items,
        ..KnapsackGenCfg::default()
    };
    let instance = KnapsackInstance::random(&gen, seed)?;
    let oracle = EnumerationOracle::new(instance.to_binary_program()?);
    let outcome = TwoPhase::new(TwoPhaseCfg::default()).run(oracle)?;
    for s in outcome.frontier.all() {
        let tag = if s.is_supported() { "supported" } else { "" };
        println!("{:>8} {:>8} {tag}", s.z1(), s.z2());
    }
    print!("{}", outcome.statistics);
    Ok(())
}
