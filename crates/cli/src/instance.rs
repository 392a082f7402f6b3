use anyhow::{bail, Context, Result};
use clap::Args;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use twophase::knapsack::{KnapsackGenCfg, KnapsackInstance};

/// Where the knapsack instance comes from.
#[derive(Args, Clone, Debug)]
pub struct InstanceArgs {
    /// CSV with columns weight, profit1, profit2 (one row per item)
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Capacity for a CSV instance; defaults to half the total weight
    #[arg(long, requires = "csv")]
    pub capacity: Option<i64>,
    /// Items of a random instance
    #[arg(long, default_value_t = 16)]
    pub items: usize,
    /// Seed of a random instance
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

impl InstanceArgs {
    pub fn load(&self) -> Result<KnapsackInstance> {
        match &self.csv {
            Some(path) => read_csv(path, self.capacity),
            None => {
                let gen = KnapsackGenCfg {
                    items: self.items,
                    ..KnapsackGenCfg::default()
                };
                Ok(KnapsackInstance::random(&gen, self.seed)?)
            }
        }
    }
}

/// Read a knapsack from CSV via a lazy scan.
pub fn read_csv(path: &Path, capacity: Option<i64>) -> Result<KnapsackInstance> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("scanning {}", path.display()))?
        .select([
            col("weight").cast(DataType::Int64),
            col("profit1").cast(DataType::Int64),
            col("profit2").cast(DataType::Int64),
        ])
        .collect()
        .with_context(|| format!("reading columns weight, profit1, profit2 of {}", path.display()))?;
    tracing::info!(rows = df.height(), cols = df.width(), "instance csv");

    let column = |name: &str| -> Result<Vec<i64>> {
        df.column(name)?
            .i64()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| v.with_context(|| format!("missing {name} in row {row}")))
            .collect()
    };
    let weights = column("weight")?;
    let profits1 = column("profit1")?;
    let profits2 = column("profit2")?;
    if weights.iter().any(|&w| w < 0) {
        bail!("negative weight in {}", path.display());
    }
    let capacity = capacity.unwrap_or_else(|| weights.iter().sum::<i64>() / 2);
    Ok(KnapsackInstance::new(weights, profits1, profits2, capacity)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn csv_instance_round_trips_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kp.csv");
        fs::write(&path, "weight,profit1,profit2\n10,10,15\n20,20,10\n15,15,20\n").unwrap();
        let kp = read_csv(&path, Some(20)).unwrap();
        assert_eq!(kp.weights(), &[10, 20, 15]);
        assert_eq!(kp.profits(), (&[10i64, 20, 15][..], &[15i64, 10, 20][..]));
        assert_eq!(kp.capacity(), 20);
        assert_eq!(read_csv(&path, None).unwrap().capacity(), 22);
    }

    #[test]
    fn csv_without_profit_column_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "weight,profit1\n10,10\n").unwrap();
        assert!(read_csv(&path, None).is_err());
    }

    #[test]
    fn random_instance_uses_seed_and_items() {
        let args = InstanceArgs {
            csv: None,
            capacity: None,
            items: 7,
            seed: 3,
        };
        let kp = args.load().unwrap();
        assert_eq!(kp.items(), 7);
        assert_eq!(kp, args.load().unwrap());
    }
}
