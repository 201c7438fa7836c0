use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Project { action } => commands::project::handle(&action, &ctx, flags).await,
        Commands::Upload(args) => commands::upload::handle(&args, &ctx, flags).await,
        Commands::Analyze(args) => commands::analyze::handle(&args, &ctx, flags).await,
        Commands::Score(args) => commands::score::handle(&args, &ctx, flags).await,
        Commands::Improve(args) => commands::improve::handle(&args, &ctx, flags).await,
        Commands::Workflow { action } => commands::workflow::handle(&action, &ctx, flags).await,
        Commands::Timeline(args) => commands::timeline::handle(&args, &ctx, flags).await,
        Commands::Certify(args) => commands::certify::handle(&args, &ctx, flags).await,
        Commands::Verify(args) => commands::verify::handle(&args, &ctx, flags).await,
        Commands::Serve(args) => commands::serve::handle(&args, ctx).await,
        Commands::Schema(_) => {
            unreachable!("schema is pre-dispatched in main")
        }
    }
}
