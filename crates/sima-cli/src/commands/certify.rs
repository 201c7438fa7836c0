use crate::cli::GlobalFlags;
use crate::cli::root_commands::ProjectArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `sima certify <id>`. Returns the existing certificate when the
/// current report already has one.
pub async fn handle(args: &ProjectArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let certificate = ctx
        .service
        .issue_certificate(&args.id, ctx.actor(flags))
        .await?;
    output(&certificate, flags.format)
}
