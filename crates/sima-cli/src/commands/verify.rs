use crate::cli::GlobalFlags;
use crate::cli::root_commands::VerifyArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `sima verify <token>`.
pub async fn handle(args: &VerifyArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let certificate = ctx.service.verify_certificate(args.token.trim()).await?;
    output(&certificate, flags.format)
}
