//! Error taxonomy of the two-phase method.
//!
//! Timeouts are not errors: they surface as `RunStatus::Partial`.
//! Infeasible regions in phase two are absorbed where they occur.

use std::path::PathBuf;

/// Phase-one step at which an oracle failure is fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    UpperLeftAnchor,
    LowerRightAnchor,
    Nise,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::UpperLeftAnchor => write!(f, "upper-left anchor"),
            Stage::LowerRightAnchor => write!(f, "lower-right anchor"),
            Stage::Nise => write!(f, "NISE iteration"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TpmError {
    #[error("oracle failure during {stage}: {detail}")]
    OracleFailure { stage: Stage, detail: String },

    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    #[error("could not write results to {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
