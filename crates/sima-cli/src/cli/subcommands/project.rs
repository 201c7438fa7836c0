use clap::Subcommand;

/// Project commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    /// Register a project ahead of its first upload.
    New {
        #[arg(long)]
        title: String,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        function: Option<String>,
    },
    /// List projects, most recently updated first.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show a project by ID.
    Show { id: String },
}
