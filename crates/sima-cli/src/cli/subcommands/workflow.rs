use clap::{Subcommand, ValueEnum};
use sima_core::enums::Decision;

/// Reviewer decision as typed on the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum DecisionArg {
    Approve,
    Reject,
}

impl From<DecisionArg> for Decision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Approve => Self::Approve,
            DecisionArg::Reject => Self::Reject,
        }
    }
}

/// Review workflow commands.
#[derive(Clone, Debug, Subcommand)]
pub enum WorkflowCommands {
    /// Show stage, version and history.
    Status { id: String },
    /// Move to the next stage.
    Advance {
        id: String,
        #[arg(long)]
        comment: String,
        #[arg(long, value_enum)]
        decision: Option<DecisionArg>,
        /// Version read earlier; when omitted the latest version is used and
        /// lost races are retried.
        #[arg(long)]
        expected_version: Option<i64>,
    },
    /// Send back to the initial review stage.
    Reopen {
        id: String,
        #[arg(long)]
        comment: String,
        /// Defaults to the current version.
        #[arg(long)]
        expected_version: Option<i64>,
    },
}
