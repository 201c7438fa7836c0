use serde::Serialize;
use sima_core::responses::TimelineResponse;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::TimelineArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ExportSummary<'a> {
    project_id: &'a str,
    path: String,
    events: usize,
}

/// Handle `sima timeline <id> [--export FILE]`.
pub async fn handle(args: &TimelineArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(path) = &args.export {
        let events = ctx.service.export_timeline_jsonl(&args.id, path).await?;
        tracing::info!(project_id = %args.id, events, path = %path.display(), "timeline exported");
        return output(
            &ExportSummary {
                project_id: &args.id,
                path: path.display().to_string(),
                events,
            },
            flags.format,
        );
    }
    let events = ctx.service.read_timeline(&args.id).await?;
    output(&TimelineResponse { events }, flags.format)
}
