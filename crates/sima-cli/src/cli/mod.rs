use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `sima` binary.
#[derive(Debug, Parser)]
#[command(
    name = "sima",
    version,
    about = "SIMA - architectural compliance scoring and approval workflow"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Actor recorded on workflow moves, uploads and certificates
    #[arg(short, long, global = true)]
    pub actor: Option<String>,

    /// Store path (overrides `[database].path`; `:memory:` for a scratch store)
    #[arg(long = "config-db", global = true, value_name = "PATH")]
    pub config_db: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            actor: self.actor.clone(),
            config_db: self.config_db.clone(),
        }
    }
}
