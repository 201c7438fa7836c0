use crate::cli::GlobalFlags;
use crate::cli::root_commands::ProjectArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `sima analyze <id>`.
pub async fn handle(args: &ProjectArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let outcome = ctx.service.analyze(&args.id).await?;
    output(&outcome, flags.format)
}
