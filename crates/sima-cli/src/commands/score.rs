use crate::cli::GlobalFlags;
use crate::cli::root_commands::ScoreArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `sima score <id> [--history]`.
pub async fn handle(args: &ScoreArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.history {
        let reports = ctx.service.score_history(&args.id).await?;
        return output(&reports, flags.format);
    }
    let report = ctx.service.latest_score(&args.id).await?;
    output(&report, flags.format)
}
