use anyhow::Context;
use sima_core::entities::ProjectSnapshot;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::UploadArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `sima upload <id> <snapshot.json>`.
///
/// A snapshot whose dimensions cannot all be scored is still stored; the
/// outcome lists the failed dimensions and the previous report stays current.
pub async fn handle(args: &UploadArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("failed to read {}", args.snapshot.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", args.snapshot.display()))?;
    let snapshot: ProjectSnapshot = ctx
        .service
        .schema()
        .parse("project_snapshot", value)
        .with_context(|| format!("{} is not a valid project snapshot", args.snapshot.display()))?;

    let outcome = ctx
        .service
        .upload(&args.id, &snapshot, ctx.actor(flags))
        .await?;

    if !outcome.failed.is_empty() && !flags.quiet {
        let names: Vec<&str> = outcome.failed.iter().map(|f| f.dimension.as_str()).collect();
        eprintln!(
            "warning: snapshot stored but not scored; failed dimensions: {}",
            names.join(", ")
        );
    }
    output(&outcome, flags.format)
}
