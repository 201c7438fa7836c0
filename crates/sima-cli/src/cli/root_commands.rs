use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::subcommands::{ProjectCommands, WorkflowCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Project registration and lookup.
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Upload a project snapshot and score it.
    Upload(UploadArgs),
    /// Re-score the stored snapshot.
    Analyze(ProjectArgs),
    /// Show the current score report.
    Score(ScoreArgs),
    /// Rank improvement suggestions for the current score.
    Improve(ImproveArgs),
    /// Review workflow.
    Workflow {
        #[command(subcommand)]
        action: WorkflowCommands,
    },
    /// Show or export the audit timeline.
    Timeline(TimelineArgs),
    /// Issue (or fetch) the certificate of an approved project.
    Certify(ProjectArgs),
    /// Verify a certificate token.
    Verify(VerifyArgs),
    /// Print registered JSON schemas.
    Schema(SchemaArgs),
    /// Run the HTTP API.
    Serve(ServeArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ProjectArgs {
    /// Project ID (`prj-...`)
    pub id: String,
}

#[derive(Clone, Debug, Args)]
pub struct UploadArgs {
    pub id: String,
    /// Snapshot JSON file
    pub snapshot: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct ScoreArgs {
    pub id: String,
    /// Show every report version instead of the current one
    #[arg(long)]
    pub history: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ImproveArgs {
    pub id: String,
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Args)]
pub struct TimelineArgs {
    pub id: String,
    /// Write the timeline as JSONL instead of printing it
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct VerifyArgs {
    pub token: String,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Schema name; lists all names when omitted
    pub name: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Bind address (overrides `[server].bind`)
    #[arg(long)]
    pub bind: Option<String>,
}
