use sima_core::enums::Dimension;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImproveArgs;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `sima improve <id>`.
pub async fn handle(args: &ImproveArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let all = u32::try_from(Dimension::ALL.len())?;
    let limit = effective_limit(args.limit, flags.limit, all);
    let response = ctx
        .service
        .improvements(&args.id, usize::try_from(limit)?)
        .await?;
    output(&response, flags.format)
}
